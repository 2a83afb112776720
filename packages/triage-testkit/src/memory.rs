use std::{
	collections::BTreeMap,
	sync::{
		Mutex, MutexGuard,
		atomic::{AtomicBool, Ordering},
	},
};

use time::OffsetDateTime;

use triage_storage::{
	BoxFuture, Error, NewTicket, Result, SimilarTicket, SimilarityIndex, Ticket, TicketFilter,
	TicketPatch, TicketStore,
};

#[derive(Debug)]
struct StoredTicket {
	ticket: Ticket,
	embedding: Option<Vec<f32>>,
}

#[derive(Debug, Default)]
struct Inner {
	next_id: i64,
	tickets: BTreeMap<i64, StoredTicket>,
}

/// In-memory stand-in for the Postgres adapter, implementing both store
/// contracts with the same observable behavior: 1-based pages ordered
/// newest-first, per-field patches, cosine similarity descending. The
/// similarity path can be flipped to fail for degradation tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
	inner: Mutex<Inner>,
	similarity_unavailable: AtomicBool,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// When set, `query_nearest` fails with `IndexUnavailable`, the
	/// "vector extension missing" condition callers must degrade around.
	pub fn set_similarity_unavailable(&self, unavailable: bool) {
		self.similarity_unavailable.store(unavailable, Ordering::SeqCst);
	}

	/// Direct read of a stored embedding, for asserting refresh semantics.
	pub fn embedding_of(&self, id: i64) -> Option<Vec<f32>> {
		self.lock_inner().tickets.get(&id).and_then(|stored| stored.embedding.clone())
	}

	/// Direct write of a stored embedding, for seeding sentinels without
	/// going through the index contract.
	pub fn seed_embedding(&self, id: i64, embedding: Vec<f32>) {
		if let Some(stored) = self.lock_inner().tickets.get_mut(&id) {
			stored.embedding = Some(embedding);
		}
	}

	fn lock_inner(&self) -> MutexGuard<'_, Inner> {
		self.inner.lock().unwrap_or_else(|err| err.into_inner())
	}
}

fn matches_filter(ticket: &Ticket, filter: &TicketFilter) -> bool {
	if let Some(status) = &filter.status
		&& &ticket.status != status
	{
		return false;
	}

	if let Some(category) = &filter.category
		&& ticket.category.as_ref() != Some(category)
	{
		return false;
	}

	true
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	if a.len() != b.len() {
		return 0.0;
	}

	let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
	let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
	let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

	if norm_a == 0.0 || norm_b == 0.0 { 0.0 } else { dot / (norm_a * norm_b) }
}

impl TicketStore for MemoryStore {
	fn create<'a>(&'a self, ticket: NewTicket) -> BoxFuture<'a, Result<Ticket>> {
		Box::pin(async move {
			let mut inner = self.lock_inner();

			inner.next_id += 1;

			let id = inner.next_id;
			let row = Ticket {
				id,
				customer_name: ticket.customer_name,
				email: ticket.email,
				subject: ticket.subject,
				body: ticket.body,
				category: ticket.category,
				priority: ticket.priority,
				status: ticket.status,
				ai_response: None,
				received_at: OffsetDateTime::now_utc(),
			};

			inner.tickets.insert(id, StoredTicket { ticket: row.clone(), embedding: None });

			Ok(row)
		})
	}

	fn find_by_id<'a>(&'a self, id: i64) -> BoxFuture<'a, Result<Option<Ticket>>> {
		Box::pin(async move {
			Ok(self.lock_inner().tickets.get(&id).map(|stored| stored.ticket.clone()))
		})
	}

	fn find_all<'a>(
		&'a self,
		filter: &'a TicketFilter,
		page: u32,
		limit: u32,
	) -> BoxFuture<'a, Result<(Vec<Ticket>, u64)>> {
		Box::pin(async move {
			let page = page.max(1);
			let limit = limit.max(1);
			let inner = self.lock_inner();
			let mut matching: Vec<Ticket> = inner
				.tickets
				.values()
				.map(|stored| &stored.ticket)
				.filter(|ticket| matches_filter(ticket, filter))
				.cloned()
				.collect();

			matching.sort_by(|a, b| {
				b.received_at.cmp(&a.received_at).then_with(|| b.id.cmp(&a.id))
			});

			let total = matching.len() as u64;
			let offset = (page as usize - 1) * limit as usize;
			let tickets =
				matching.into_iter().skip(offset).take(limit as usize).collect();

			Ok((tickets, total))
		})
	}

	fn update<'a>(&'a self, id: i64, patch: TicketPatch) -> BoxFuture<'a, Result<Ticket>> {
		Box::pin(async move {
			let mut inner = self.lock_inner();
			let stored = inner
				.tickets
				.get_mut(&id)
				.ok_or_else(|| Error::NotFound(format!("Ticket {id} not found.")))?;

			if let Some(category) = patch.category {
				stored.ticket.category = Some(category);
			}
			if let Some(priority) = patch.priority {
				stored.ticket.priority = priority;
			}
			if let Some(status) = patch.status {
				stored.ticket.status = status;
			}
			if let Some(ai_response) = patch.ai_response {
				stored.ticket.ai_response = Some(ai_response);
			}

			Ok(stored.ticket.clone())
		})
	}

	fn count_by_status<'a>(&'a self, status: &'a str) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			let count = self
				.lock_inner()
				.tickets
				.values()
				.filter(|stored| stored.ticket.status == status)
				.count();

			Ok(count as u64)
		})
	}

	fn count_all<'a>(&'a self) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move { Ok(self.lock_inner().tickets.len() as u64) })
	}
}

impl SimilarityIndex for MemoryStore {
	fn upsert_embedding<'a>(&'a self, id: i64, vector: &'a [f32]) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut inner = self.lock_inner();
			let expected = inner
				.tickets
				.values()
				.filter_map(|stored| stored.embedding.as_ref())
				.map(Vec::len)
				.next();

			if let Some(expected) = expected
				&& expected != vector.len()
			{
				return Err(Error::InvalidArgument(format!(
					"Embedding dimension {} does not match the stored {expected}.",
					vector.len()
				)));
			}

			let stored = inner
				.tickets
				.get_mut(&id)
				.ok_or_else(|| Error::NotFound(format!("Ticket {id} not found.")))?;

			stored.embedding = Some(vector.to_vec());

			Ok(())
		})
	}

	fn fetch_embedding<'a>(&'a self, id: i64) -> BoxFuture<'a, Result<Option<Vec<f32>>>> {
		Box::pin(async move {
			Ok(self.lock_inner().tickets.get(&id).and_then(|stored| stored.embedding.clone()))
		})
	}

	fn query_nearest<'a>(
		&'a self,
		vector: &'a [f32],
		k: u32,
	) -> BoxFuture<'a, Result<Vec<SimilarTicket>>> {
		Box::pin(async move {
			if self.similarity_unavailable.load(Ordering::SeqCst) {
				return Err(Error::IndexUnavailable(
					"Similarity queries are disabled for this test.".to_string(),
				));
			}
			if k == 0 {
				return Ok(Vec::new());
			}

			let inner = self.lock_inner();
			let mut scored: Vec<SimilarTicket> = inner
				.tickets
				.values()
				.filter_map(|stored| {
					let embedding = stored.embedding.as_ref()?;
					let ticket = &stored.ticket;

					Some(SimilarTicket {
						id: ticket.id,
						subject: ticket.subject.clone(),
						body: ticket.body.clone(),
						category: ticket.category.clone(),
						ai_response: ticket.ai_response.clone(),
						status: ticket.status.clone(),
						similarity: cosine_similarity(vector, embedding),
					})
				})
				.collect();

			scored.sort_by(|a, b| {
				b.similarity
					.partial_cmp(&a.similarity)
					.unwrap_or(std::cmp::Ordering::Equal)
					.then_with(|| a.id.cmp(&b.id))
			});
			scored.truncate(k as usize);

			Ok(scored)
		})
	}
}
