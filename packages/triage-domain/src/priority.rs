use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Any of these appearing as a substring of the lowercased subject + body
/// forces High, regardless of category.
pub const URGENCY_KEYWORDS: [&str; 6] =
	["urgent", "emergency", "not working", "critical", "immediate", "asap"];

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
	Low,
	Medium,
	High,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown priority: {0:?}.")]
pub struct ParsePriorityError(pub String);

impl Priority {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Low => "low",
			Self::Medium => "medium",
			Self::High => "high",
		}
	}
}

impl fmt::Display for Priority {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Priority {
	type Err = ParsePriorityError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"low" => Ok(Self::Low),
			"medium" => Ok(Self::Medium),
			"high" => Ok(Self::High),
			other => Err(ParsePriorityError(other.to_string())),
		}
	}
}

/// Scores a ticket's priority from its content and category.
///
/// Total and side-effect-free: any input maps to a priority, and a caller
/// that cannot produce a category still gets Medium.
pub fn score_priority(subject: &str, body: &str, category: Option<&str>) -> Priority {
	let content = format!("{subject} {body}").to_lowercase();

	if URGENCY_KEYWORDS.iter().any(|keyword| content.contains(keyword)) {
		return Priority::High;
	}

	match category {
		Some("Payment Failure") => Priority::High,
		Some("Technical Issue") | Some("Refund") | Some("Account") => Priority::Medium,
		Some("Invoice") | Some("General") => Priority::Low,
		_ => Priority::Medium,
	}
}
