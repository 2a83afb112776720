use crate::{ServiceResult, TriageService, embedding_text};
use triage_domain::{TicketStatus, normalize_category, score_priority};
use triage_storage::TicketPatch;

#[derive(Clone, Debug)]
pub struct ProcessingOutcome {
	pub ticket_id: i64,
	pub category: String,
	pub priority: String,
	pub similar_found: usize,
}

impl TriageService {
	/// The automated pipeline: embed, classify, score priority, look up
	/// similar tickets, persist. Safe to call again for the same id; with
	/// deterministic providers a rerun converges on the same record.
	///
	/// Concurrent runs for one id are not mutually exclusive; the last
	/// write wins. That race is accepted, not guarded.
	pub async fn process_ticket(
		&self,
		id: i64,
		subject: &str,
		body: &str,
	) -> ServiceResult<ProcessingOutcome> {
		tracing::info!(ticket_id = id, "Starting automated ticket processing.");

		match self.run_pipeline(id, subject, body).await {
			Ok(outcome) => {
				tracing::info!(
					ticket_id = id,
					category = %outcome.category,
					priority = %outcome.priority,
					similar_found = outcome.similar_found,
					"Automated ticket processing completed."
				);

				Ok(outcome)
			},
			Err(err) => {
				// The record must not sit in New forever; mark it failed so a
				// human sees it. Best-effort: the original error is what the
				// caller's boundary logs.
				if let Err(update_err) = self
					.store
					.update(
						id,
						TicketPatch {
							status: Some(TicketStatus::ProcessingFailed.as_str().to_string()),
							..Default::default()
						},
					)
					.await
				{
					tracing::error!(
						error = %update_err,
						ticket_id = id,
						"Failed to mark ticket as Processing Failed."
					);
				}

				Err(err)
			},
		}
	}

	async fn run_pipeline(
		&self,
		id: i64,
		subject: &str,
		body: &str,
	) -> ServiceResult<ProcessingOutcome> {
		let text = embedding_text(subject, body);
		let embedding =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &text).await?;
		let label =
			self.providers.classifier.classify(&self.cfg.providers.classifier, subject, body).await?;
		let category = normalize_category(&label);
		let priority = score_priority(subject, body, Some(category.as_str()));

		// Reference material only; losing it must not fail the pipeline.
		let similar_found =
			match self.index.query_nearest(&embedding, self.cfg.triage.similar_k).await {
				Ok(similar) => similar.len(),
				Err(err) => {
					tracing::warn!(
						error = %err,
						ticket_id = id,
						"Similarity lookup failed during processing."
					);

					0
				},
			};

		self.index.upsert_embedding(id, &embedding).await?;
		self.store
			.update(
				id,
				TicketPatch {
					category: Some(category.clone()),
					priority: Some(priority.as_str().to_string()),
					status: Some(TicketStatus::Processed.as_str().to_string()),
					..Default::default()
				},
			)
			.await?;

		Ok(ProcessingOutcome {
			ticket_id: id,
			category,
			priority: priority.as_str().to_string(),
			similar_found,
		})
	}
}
