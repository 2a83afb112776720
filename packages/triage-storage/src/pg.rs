use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
	Error, Result,
	db::Db,
	models::{NewTicket, SimilarTicket, Ticket, TicketFilter, TicketPatch},
	store::{BoxFuture, SimilarityIndex, TicketStore},
	vector,
};

const TICKET_COLUMNS: &str =
	"id, customer_name, email, subject, body, category, priority, status, ai_response, received_at";

/// The Postgres + pgvector adapter. Implements both store contracts over the
/// single `tickets` table; the embedding lives in a vector column on the row
/// and is reachable only through the [`SimilarityIndex`] methods.
pub struct PgTicketStore {
	pool: PgPool,
	vector_dim: u32,
}
impl PgTicketStore {
	pub fn new(db: &Db, vector_dim: u32) -> Self {
		Self { pool: db.pool.clone(), vector_dim }
	}

	async fn fetch_by_id(&self, id: i64) -> Result<Option<Ticket>> {
		let row = sqlx::query_as::<_, Ticket>(&format!(
			"SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"
		))
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		Ok(row)
	}
}

fn push_filters<'args>(builder: &mut QueryBuilder<'args, Postgres>, filter: &'args TicketFilter) {
	let mut clause = " WHERE ";

	if let Some(status) = &filter.status {
		builder.push(clause).push("status = ").push_bind(status.as_str());

		clause = " AND ";
	}
	if let Some(category) = &filter.category {
		builder.push(clause).push("category = ").push_bind(category.as_str());
	}
}

impl TicketStore for PgTicketStore {
	fn create<'a>(&'a self, ticket: NewTicket) -> BoxFuture<'a, Result<Ticket>> {
		Box::pin(async move {
			let row = sqlx::query_as::<_, Ticket>(&format!(
				"\
INSERT INTO tickets (customer_name, email, subject, body, category, priority, status)
VALUES ($1, $2, $3, $4, $5, $6, $7)
RETURNING {TICKET_COLUMNS}"
			))
			.bind(ticket.customer_name)
			.bind(ticket.email)
			.bind(ticket.subject)
			.bind(ticket.body)
			.bind(ticket.category)
			.bind(ticket.priority)
			.bind(ticket.status)
			.fetch_one(&self.pool)
			.await?;

			Ok(row)
		})
	}

	fn find_by_id<'a>(&'a self, id: i64) -> BoxFuture<'a, Result<Option<Ticket>>> {
		Box::pin(self.fetch_by_id(id))
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
			let offset = (i64::from(page) - 1) * i64::from(limit);

			let mut count_builder = QueryBuilder::new("SELECT count(*) FROM tickets");

			push_filters(&mut count_builder, filter);

			let total: i64 =
				count_builder.build_query_scalar().fetch_one(&self.pool).await?;

			let mut builder =
				QueryBuilder::new(format!("SELECT {TICKET_COLUMNS} FROM tickets"));

			push_filters(&mut builder, filter);

			builder.push(" ORDER BY received_at DESC, id DESC LIMIT ");
			builder.push_bind(i64::from(limit));
			builder.push(" OFFSET ");
			builder.push_bind(offset);

			let tickets =
				builder.build_query_as::<Ticket>().fetch_all(&self.pool).await?;

			Ok((tickets, total as u64))
		})
	}

	fn update<'a>(&'a self, id: i64, patch: TicketPatch) -> BoxFuture<'a, Result<Ticket>> {
		Box::pin(async move {
			if patch.is_empty() {
				return self
					.fetch_by_id(id)
					.await?
					.ok_or_else(|| Error::NotFound(format!("Ticket {id} not found.")));
			}

			let mut builder = QueryBuilder::new("UPDATE tickets SET ");
			let mut fields = builder.separated(", ");

			if let Some(category) = patch.category {
				fields.push("category = ");
				fields.push_bind_unseparated(category);
			}
			if let Some(priority) = patch.priority {
				fields.push("priority = ");
				fields.push_bind_unseparated(priority);
			}
			if let Some(status) = patch.status {
				fields.push("status = ");
				fields.push_bind_unseparated(status);
			}
			if let Some(ai_response) = patch.ai_response {
				fields.push("ai_response = ");
				fields.push_bind_unseparated(ai_response);
			}

			builder.push(" WHERE id = ");
			builder.push_bind(id);
			builder.push(format!(" RETURNING {TICKET_COLUMNS}"));

			builder
				.build_query_as::<Ticket>()
				.fetch_optional(&self.pool)
				.await?
				.ok_or_else(|| Error::NotFound(format!("Ticket {id} not found.")))
		})
	}

	fn count_by_status<'a>(&'a self, status: &'a str) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			let count: i64 =
				sqlx::query_scalar("SELECT count(*) FROM tickets WHERE status = $1")
					.bind(status)
					.fetch_one(&self.pool)
					.await?;

			Ok(count as u64)
		})
	}

	fn count_all<'a>(&'a self) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			let count: i64 = sqlx::query_scalar("SELECT count(*) FROM tickets")
				.fetch_one(&self.pool)
				.await?;

			Ok(count as u64)
		})
	}
}

impl SimilarityIndex for PgTicketStore {
	fn upsert_embedding<'a>(&'a self, id: i64, vector: &'a [f32]) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if vector.len() != self.vector_dim as usize {
				return Err(Error::InvalidArgument(format!(
					"Embedding dimension {} does not match the configured {}.",
					vector.len(),
					self.vector_dim
				)));
			}

			let result =
				sqlx::query("UPDATE tickets SET embedding = $1::text::vector WHERE id = $2")
					.bind(vector::to_pg_text(vector))
					.bind(id)
					.execute(&self.pool)
					.await?;

			if result.rows_affected() == 0 {
				return Err(Error::NotFound(format!("Ticket {id} not found.")));
			}

			Ok(())
		})
	}

	fn fetch_embedding<'a>(&'a self, id: i64) -> BoxFuture<'a, Result<Option<Vec<f32>>>> {
		Box::pin(async move {
			let text: Option<Option<String>> =
				sqlx::query_scalar("SELECT embedding::text FROM tickets WHERE id = $1")
					.bind(id)
					.fetch_optional(&self.pool)
					.await?;

			match text.flatten() {
				Some(text) => Ok(Some(vector::parse_pg_text(&text)?)),
				None => Ok(None),
			}
		})
	}

	fn query_nearest<'a>(
		&'a self,
		vector: &'a [f32],
		k: u32,
	) -> BoxFuture<'a, Result<Vec<SimilarTicket>>> {
		Box::pin(async move {
			if k == 0 {
				return Ok(Vec::new());
			}

			sqlx::query_as::<_, SimilarTicket>(
				"\
SELECT
	id,
	subject,
	body,
	category,
	ai_response,
	status,
	(1 - (embedding <=> $1::text::vector))::real AS similarity
FROM tickets
WHERE embedding IS NOT NULL
ORDER BY embedding <=> $1::text::vector
LIMIT $2",
			)
			.bind(vector::to_pg_text(vector))
			.bind(i64::from(k))
			.fetch_all(&self.pool)
			.await
			.map_err(|err| Error::IndexUnavailable(err.to_string()))
		})
	}
}
