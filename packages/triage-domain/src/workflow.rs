use std::fmt;

use crate::{priority::Priority, status::TicketStatus};

/// Operations that mutate a ticket's status on human action.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WorkflowAction {
	Approve,
	Escalate,
	SetPendingReview,
	SetStatus,
}

impl fmt::Display for WorkflowAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Self::Approve => "approve",
			Self::Escalate => "escalate",
			Self::SetPendingReview => "set_pending_review",
			Self::SetStatus => "set_status",
		};

		f.write_str(label)
	}
}

/// The statuses an action is *intended* to run from, one table per operation.
///
/// The workflow is deliberately loose: actions outside their table are still
/// permitted (escalation in particular must work from anywhere a human can see
/// a ticket), and callers only log the deviation. Approve's single hard
/// precondition, a non-empty draft, is checked by the caller, not here.
pub fn intended_from(action: WorkflowAction) -> &'static [TicketStatus] {
	match action {
		WorkflowAction::Approve => &[TicketStatus::AiDrafted, TicketStatus::PendingReview],
		WorkflowAction::Escalate | WorkflowAction::SetStatus => &TicketStatus::ALL,
		WorkflowAction::SetPendingReview => &[TicketStatus::AiDrafted],
	}
}

pub fn is_intended(action: WorkflowAction, from: TicketStatus) -> bool {
	intended_from(action).contains(&from)
}

/// Whether a draft can be generated in the given state.
pub fn can_generate_draft(status: TicketStatus) -> bool {
	matches!(status, TicketStatus::Processed | TicketStatus::New | TicketStatus::AiDrafted)
}

/// Next-step suggestions shown alongside a ticket, keyed on status with one
/// priority-dependent extra.
pub fn suggested_actions(status: TicketStatus, priority: Priority) -> Vec<&'static str> {
	let mut actions = Vec::new();

	match status {
		TicketStatus::New => {
			actions.push("Wait for auto-processing");
		},
		TicketStatus::Processed => {
			actions.push("Generate AI Draft");
			actions.push("View Similar Tickets");

			if priority == Priority::High {
				actions.push("Prioritize Response");
			}
		},
		TicketStatus::AiDrafted => {
			actions.push("Review AI Response");
			actions.push("Edit Response");
			actions.push("Approve and Send");
			actions.push("Escalate to Human");
		},
		TicketStatus::ProcessingFailed => {
			actions.push("Retry Processing");
			actions.push("Manual Classification");
		},
		_ => {},
	}

	actions
}
