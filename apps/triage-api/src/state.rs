use std::sync::Arc;

use triage_service::TriageService;
use triage_storage::{PgTicketStore, SimilarityIndex, db::Db};

#[derive(Clone)]
pub struct AppState {
	pub service: TriageService,
}
impl AppState {
	pub async fn new(config: triage_config::Config) -> color_eyre::Result<Self> {
		let vector_dim = config.providers.embedding.dimensions;
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(vector_dim).await?;

		let store = Arc::new(PgTicketStore::new(&db, vector_dim));
		let index: Arc<dyn SimilarityIndex> = store.clone();
		let service = TriageService::new(config, store, index);

		Ok(Self { service })
	}
}
