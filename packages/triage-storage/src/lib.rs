pub mod db;
pub mod models;
pub mod pg;
pub mod schema;
pub mod store;
pub mod vector;

mod error;

pub use error::Error;
pub use models::{NewTicket, SimilarTicket, Ticket, TicketFilter, TicketPatch};
pub use pg::PgTicketStore;
pub use store::{BoxFuture, SimilarityIndex, TicketStore};

pub type Result<T, E = Error> = std::result::Result<T, E>;
