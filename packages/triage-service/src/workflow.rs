use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ServiceError, ServiceResult, TriageService};
use triage_domain::{TicketStatus, WorkflowAction, workflow};
use triage_storage::{Ticket, TicketPatch};

/// Per-status counts plus the unfiltered total, recomputed on every call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowStats {
	#[serde(rename = "New")]
	pub new: u64,
	#[serde(rename = "Processed")]
	pub processed: u64,
	#[serde(rename = "AI-Drafted")]
	pub ai_drafted: u64,
	#[serde(rename = "Pending Review")]
	pub pending_review: u64,
	#[serde(rename = "Sent")]
	pub sent: u64,
	#[serde(rename = "Escalated")]
	pub escalated: u64,
	#[serde(rename = "Processing Failed")]
	pub processing_failed: u64,
	pub total: u64,
}

impl TriageService {
	/// The one hard precondition in the whole lifecycle: approval requires a
	/// non-empty draft.
	pub async fn approve_ticket(&self, id: i64) -> ServiceResult<()> {
		let ticket =
			self.store.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found(id))?;
		let has_response = ticket
			.ai_response
			.as_deref()
			.map(|text| !text.trim().is_empty())
			.unwrap_or(false);

		if !has_response {
			return Err(ServiceError::InvalidOperation {
				message: "Cannot approve ticket without AI response.".to_string(),
			});
		}

		self.transition(ticket, WorkflowAction::Approve, TicketStatus::Sent).await
	}

	/// Escalation works from any state. The reason is logged for the audit
	/// trail but not persisted on the record.
	pub async fn escalate_ticket(&self, id: i64, reason: Option<&str>) -> ServiceResult<()> {
		let ticket =
			self.store.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found(id))?;

		match reason {
			Some(reason) => {
				tracing::info!(ticket_id = id, reason, "Escalating ticket.");
			},
			None => {
				tracing::info!(ticket_id = id, "Escalating ticket.");
			},
		}

		self.transition(ticket, WorkflowAction::Escalate, TicketStatus::Escalated).await
	}

	pub async fn set_pending_review(&self, id: i64) -> ServiceResult<()> {
		let ticket =
			self.store.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found(id))?;

		self.transition(ticket, WorkflowAction::SetPendingReview, TicketStatus::PendingReview)
			.await
	}

	pub async fn set_status(&self, id: i64, status: &str) -> ServiceResult<()> {
		let Ok(status) = TicketStatus::from_str(status) else {
			let valid = TicketStatus::ALL.map(|status| status.as_str()).join(", ");

			return Err(ServiceError::InvalidArgument {
				message: format!("Invalid status: {status}. Valid statuses are: {valid}."),
			});
		};
		let ticket =
			self.store.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found(id))?;

		self.transition(ticket, WorkflowAction::SetStatus, status).await
	}

	pub async fn workflow_stats(&self) -> ServiceResult<WorkflowStats> {
		let mut counts = [0_u64; 7];

		for (slot, status) in counts.iter_mut().zip(TicketStatus::ALL) {
			*slot = self.store.count_by_status(status.as_str()).await?;
		}

		let [new, processed, ai_drafted, pending_review, sent, escalated, processing_failed] =
			counts;
		let total = self.store.count_all().await?;

		Ok(WorkflowStats {
			new,
			processed,
			ai_drafted,
			pending_review,
			sent,
			escalated,
			processing_failed,
			total,
		})
	}

	/// Applies a status transition. The workflow is intentionally loose:
	/// transitions outside an operation's intended table still run, they are
	/// only flagged in the logs.
	async fn transition(
		&self,
		ticket: Ticket,
		action: WorkflowAction,
		to: TicketStatus,
	) -> ServiceResult<()> {
		if let Ok(from) = TicketStatus::from_str(&ticket.status)
			&& !workflow::is_intended(action, from)
		{
			tracing::warn!(
				ticket_id = ticket.id,
				%action,
				from = %from,
				to = %to,
				"Transition outside the intended workflow path."
			);
		}

		self.store
			.update(
				ticket.id,
				TicketPatch { status: Some(to.as_str().to_string()), ..Default::default() },
			)
			.await?;

		tracing::info!(ticket_id = ticket.id, status = %to, "Ticket status updated.");

		Ok(())
	}
}
