use serde::{Deserialize, Serialize};

use crate::{ServiceResult, TicketView, TriageService};
use triage_storage::TicketFilter;

const DEFAULT_PAGE_LIMIT: u32 = 10;
const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListTicketsRequest {
	pub status: Option<String>,
	pub category: Option<String>,
	pub page: Option<u32>,
	pub limit: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pagination {
	pub page: u32,
	pub limit: u32,
	pub total: u64,
	pub total_pages: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListTicketsResponse {
	pub tickets: Vec<TicketView>,
	pub pagination: Pagination,
}

impl TriageService {
	/// Newest first, with optional status/category filters. Filters are
	/// free-form strings; an unknown status simply matches nothing.
	pub async fn list_tickets(&self, req: ListTicketsRequest) -> ServiceResult<ListTicketsResponse> {
		let page = req.page.unwrap_or(1).max(1);
		let limit = req.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
		let filter = TicketFilter {
			status: req.status.filter(|value| !value.trim().is_empty()),
			category: req.category.filter(|value| !value.trim().is_empty()),
		};
		let (tickets, total) = self.store.find_all(&filter, page, limit).await?;
		let total_pages = total.div_ceil(u64::from(limit));

		Ok(ListTicketsResponse {
			tickets: tickets.into_iter().map(Into::into).collect(),
			pagination: Pagination { page, limit, total, total_pages },
		})
	}
}
