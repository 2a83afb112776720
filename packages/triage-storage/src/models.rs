use time::OffsetDateTime;

/// One persisted ticket row. The embedding column is deliberately absent:
/// it is only reachable through the [`crate::SimilarityIndex`] contract and
/// never rides along on row reads.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Ticket {
	pub id: i64,
	pub customer_name: String,
	pub email: String,
	pub subject: String,
	pub body: String,
	pub category: Option<String>,
	pub priority: String,
	pub status: String,
	pub ai_response: Option<String>,
	pub received_at: OffsetDateTime,
}

#[derive(Clone, Debug)]
pub struct NewTicket {
	pub customer_name: String,
	pub email: String,
	pub subject: String,
	pub body: String,
	pub category: Option<String>,
	pub priority: String,
	pub status: String,
}

/// Per-field patch; `None` leaves the column untouched. Last write wins,
/// there is no merge resolution across concurrent patches.
#[derive(Clone, Debug, Default)]
pub struct TicketPatch {
	pub category: Option<String>,
	pub priority: Option<String>,
	pub status: Option<String>,
	pub ai_response: Option<String>,
}

impl TicketPatch {
	pub fn is_empty(&self) -> bool {
		self.category.is_none()
			&& self.priority.is_none()
			&& self.status.is_none()
			&& self.ai_response.is_none()
	}
}

/// A nearest-neighbor hit: the summary fields a caller needs to build prompt
/// context or a view, plus the cosine similarity (`1 - cosine distance`).
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct SimilarTicket {
	pub id: i64,
	pub subject: String,
	pub body: String,
	pub category: Option<String>,
	pub ai_response: Option<String>,
	pub status: String,
	pub similarity: f32,
}

#[derive(Clone, Debug, Default)]
pub struct TicketFilter {
	pub status: Option<String>,
	pub category: Option<String>,
}
