use crate::{ServiceError, ServiceResult, TriageService, embedding_text};
use triage_domain::normalize_category;
use triage_storage::TicketPatch;

impl TriageService {
	/// Synchronous single-ticket reclassification: recomputes the embedding
	/// and the category from the current subject and body, persists both,
	/// and returns the category. Provider failures propagate and leave the
	/// record unchanged.
	pub async fn classify_ticket(&self, id: i64) -> ServiceResult<String> {
		let ticket =
			self.store.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found(id))?;
		let text = embedding_text(&ticket.subject, &ticket.body);
		let embedding =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &text).await?;
		let label = self
			.providers
			.classifier
			.classify(&self.cfg.providers.classifier, &ticket.subject, &ticket.body)
			.await?;
		let category = normalize_category(&label);

		self.index.upsert_embedding(id, &embedding).await?;
		self.store
			.update(
				id,
				TicketPatch { category: Some(category.clone()), ..Default::default() },
			)
			.await?;

		tracing::info!(ticket_id = id, category = %category, "Ticket reclassified.");

		Ok(category)
	}
}
