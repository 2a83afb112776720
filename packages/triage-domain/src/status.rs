use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Lifecycle state of a ticket. The labels are the human-facing strings the
/// store persists and the API returns.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TicketStatus {
	#[serde(rename = "New")]
	New,
	#[serde(rename = "Processed")]
	Processed,
	#[serde(rename = "AI-Drafted")]
	AiDrafted,
	#[serde(rename = "Pending Review")]
	PendingReview,
	#[serde(rename = "Sent")]
	Sent,
	#[serde(rename = "Escalated")]
	Escalated,
	#[serde(rename = "Processing Failed")]
	ProcessingFailed,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown ticket status: {0:?}.")]
pub struct ParseStatusError(pub String);

impl TicketStatus {
	pub const ALL: [Self; 7] = [
		Self::New,
		Self::Processed,
		Self::AiDrafted,
		Self::PendingReview,
		Self::Sent,
		Self::Escalated,
		Self::ProcessingFailed,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::New => "New",
			Self::Processed => "Processed",
			Self::AiDrafted => "AI-Drafted",
			Self::PendingReview => "Pending Review",
			Self::Sent => "Sent",
			Self::Escalated => "Escalated",
			Self::ProcessingFailed => "Processing Failed",
		}
	}
}

impl fmt::Display for TicketStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TicketStatus {
	type Err = ParseStatusError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|status| status.as_str() == raw)
			.ok_or_else(|| ParseStatusError(raw.to_string()))
	}
}
