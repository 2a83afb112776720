use crate::{ServiceError, ServiceResult, TriageService, embedding_text};
use triage_domain::{FALLBACK_CATEGORY, TicketStatus};
use triage_providers::SimilarContext;
use triage_storage::TicketPatch;

impl TriageService {
	/// Generates a reply draft from the ticket and its nearest historical
	/// neighbors, persists it, and moves the ticket to `AI-Drafted`.
	///
	/// The embedding is always recomputed first. That is a deliberate
	/// refresh, not a cache fill: a stale vector from an earlier
	/// subject/body must never anchor the similarity search. Both the
	/// refresh and the similarity query are independent best-effort side
	/// paths, so either may fail and the draft still proceeds, just without
	/// retrieved context. Only the draft call itself is fatal, and then the
	/// record is left unchanged.
	pub async fn generate_draft(&self, id: i64) -> ServiceResult<String> {
		let ticket =
			self.store.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found(id))?;
		let text = embedding_text(&ticket.subject, &ticket.body);
		let embedding =
			match self.providers.embedding.embed(&self.cfg.providers.embedding, &text).await {
				Ok(vector) => {
					if let Err(err) = self.index.upsert_embedding(id, &vector).await {
						tracing::warn!(
							error = %err,
							ticket_id = id,
							"Failed to persist the refreshed embedding."
						);
					}

					Some(vector)
				},
				Err(err) => {
					tracing::warn!(
						error = %err,
						ticket_id = id,
						"Failed to refresh the embedding. Drafting without similarity context."
					);

					None
				},
			};
		let similar = match embedding {
			Some(vector) => {
				match self.index.query_nearest(&vector, self.cfg.triage.similar_k).await {
					Ok(similar) => similar,
					Err(err) => {
						tracing::warn!(
							error = %err,
							ticket_id = id,
							"Similarity lookup failed. Drafting without similarity context."
						);

						Vec::new()
					},
				}
			},
			None => Vec::new(),
		};
		let context: Vec<SimilarContext> = similar
			.into_iter()
			.map(|ticket| SimilarContext {
				subject: ticket.subject,
				body: ticket.body,
				prior_response: ticket.ai_response,
			})
			.collect();
		let category = ticket.category.as_deref().unwrap_or(FALLBACK_CATEGORY);
		let draft = self
			.providers
			.drafter
			.draft(
				&self.cfg.providers.drafter,
				&ticket.subject,
				&ticket.body,
				category,
				&context,
			)
			.await?;

		self.store
			.update(
				id,
				TicketPatch {
					ai_response: Some(draft.clone()),
					status: Some(TicketStatus::AiDrafted.as_str().to_string()),
					..Default::default()
				},
			)
			.await?;

		tracing::info!(
			ticket_id = id,
			draft_chars = draft.len(),
			similar_used = context.len(),
			"AI draft generated."
		);

		Ok(draft)
	}

	/// The manual-edit path: overwrites `ai_response` in place with no
	/// status change. Distinct from generation; no providers are involved.
	pub async fn update_draft(&self, id: i64, text: &str) -> ServiceResult<()> {
		if text.trim().is_empty() {
			return Err(ServiceError::InvalidArgument {
				message: "Draft text must be non-empty.".to_string(),
			});
		}

		self.store
			.update(
				id,
				TicketPatch { ai_response: Some(text.to_string()), ..Default::default() },
			)
			.await?;

		tracing::info!(ticket_id = id, "Draft updated manually.");

		Ok(())
	}
}
