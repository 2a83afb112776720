mod error;
pub mod memory;
pub mod pg;
pub mod providers;

pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use pg::{TestDatabase, env_dsn};
pub use providers::StubProviders;
