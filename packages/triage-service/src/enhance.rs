use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ServiceError, ServiceResult, TicketView, TriageService};
use triage_domain::{Priority, TicketStatus, workflow};
use triage_storage::SimilarTicket;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimilarTicketView {
	pub id: i64,
	pub subject: String,
	pub body: String,
	pub category: Option<String>,
	pub ai_response: Option<String>,
	pub status: String,
	pub similarity: f32,
}

/// The ticket plus everything a reviewer needs at a glance: similar past
/// tickets, whether drafting is available, and suggested next steps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnhancedTicket {
	#[serde(flatten)]
	pub ticket: TicketView,
	pub similar_tickets: Vec<SimilarTicketView>,
	pub has_similar_tickets: bool,
	pub can_generate_draft: bool,
	pub suggested_actions: Vec<String>,
}

impl From<SimilarTicket> for SimilarTicketView {
	fn from(similar: SimilarTicket) -> Self {
		Self {
			id: similar.id,
			subject: similar.subject,
			body: similar.body,
			category: similar.category,
			ai_response: similar.ai_response,
			status: similar.status,
			similarity: similar.similarity,
		}
	}
}

impl TriageService {
	pub async fn get_ticket(&self, id: i64) -> ServiceResult<TicketView> {
		let ticket =
			self.store.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found(id))?;

		Ok(ticket.into())
	}

	/// Read-only assembly; nothing here mutates the record. Both the
	/// embedding fetch and the similarity query are best-effort: a missing
	/// embedding or an unavailable index degrades to an empty similar list,
	/// never an error.
	pub async fn enhanced_ticket(&self, id: i64) -> ServiceResult<EnhancedTicket> {
		let ticket =
			self.store.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found(id))?;
		let embedding = match self.index.fetch_embedding(id).await {
			Ok(embedding) => embedding,
			Err(err) => {
				tracing::warn!(error = %err, ticket_id = id, "Failed to read the stored embedding.");

				None
			},
		};
		let similar_tickets: Vec<SimilarTicketView> = match embedding {
			Some(vector) => {
				match self.index.query_nearest(&vector, self.cfg.triage.similar_k).await {
					Ok(similar) => similar.into_iter().map(Into::into).collect(),
					Err(err) => {
						tracing::warn!(
							error = %err,
							ticket_id = id,
							"Similarity lookup failed. Returning the view without similar tickets."
						);

						Vec::new()
					},
				}
			},
			None => Vec::new(),
		};

		let status = TicketStatus::from_str(&ticket.status).ok();
		let priority = Priority::from_str(&ticket.priority).unwrap_or(Priority::Medium);
		let can_generate_draft = status.map(workflow::can_generate_draft).unwrap_or(false);
		let suggested_actions = status
			.map(|status| workflow::suggested_actions(status, priority))
			.unwrap_or_default()
			.into_iter()
			.map(ToString::to_string)
			.collect();

		Ok(EnhancedTicket {
			ticket: ticket.into(),
			has_similar_tickets: !similar_tickets.is_empty(),
			similar_tickets,
			can_generate_draft,
			suggested_actions,
		})
	}
}
