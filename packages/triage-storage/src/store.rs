use std::{future::Future, pin::Pin};

use crate::{
	Result,
	models::{NewTicket, SimilarTicket, Ticket, TicketFilter, TicketPatch},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The persistent-store collaborator. The row is exclusively owned by the
/// store: everything else reads snapshots and writes back through `update`.
pub trait TicketStore
where
	Self: Send + Sync,
{
	fn create<'a>(&'a self, ticket: NewTicket) -> BoxFuture<'a, Result<Ticket>>;

	fn find_by_id<'a>(&'a self, id: i64) -> BoxFuture<'a, Result<Option<Ticket>>>;

	/// Pages are 1-based; results are ordered by `received_at` descending.
	/// Returns the page plus the total matching count.
	fn find_all<'a>(
		&'a self,
		filter: &'a TicketFilter,
		page: u32,
		limit: u32,
	) -> BoxFuture<'a, Result<(Vec<Ticket>, u64)>>;

	/// Applies the patch and returns the updated row; `NotFound` if the id
	/// does not exist.
	fn update<'a>(&'a self, id: i64, patch: TicketPatch) -> BoxFuture<'a, Result<Ticket>>;

	fn count_by_status<'a>(&'a self, status: &'a str) -> BoxFuture<'a, Result<u64>>;

	fn count_all<'a>(&'a self) -> BoxFuture<'a, Result<u64>>;
}

/// Nearest-neighbor queries over stored embeddings. All stored vectors share
/// the provider's fixed dimensionality; a mismatched upsert is rejected.
pub trait SimilarityIndex
where
	Self: Send + Sync,
{
	fn upsert_embedding<'a>(&'a self, id: i64, vector: &'a [f32]) -> BoxFuture<'a, Result<()>>;

	fn fetch_embedding<'a>(&'a self, id: i64) -> BoxFuture<'a, Result<Option<Vec<f32>>>>;

	/// Top-`k` by cosine similarity, descending; tie order is store-defined
	/// and callers must not depend on it. Fails with `IndexUnavailable` when
	/// the underlying store cannot run the query; callers degrade to "no
	/// similar tickets" rather than aborting.
	fn query_nearest<'a>(
		&'a self,
		vector: &'a [f32],
		k: u32,
	) -> BoxFuture<'a, Result<Vec<SimilarTicket>>>;
}
