pub mod classify;
pub mod create;
pub mod draft;
pub mod enhance;
pub mod list;
pub mod process;
pub mod time_serde;
pub mod workflow;

use std::{future::Future, pin::Pin, sync::Arc};

pub use create::CreateTicketRequest;
pub use enhance::{EnhancedTicket, SimilarTicketView};
pub use list::{ListTicketsRequest, ListTicketsResponse, Pagination};
pub use process::ProcessingOutcome;
pub use workflow::WorkflowStats;

use triage_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use triage_providers::{SimilarContext, classify as classify_provider, draft as draft_provider, embedding};
use triage_storage::{SimilarityIndex, Ticket, TicketStore};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, triage_providers::Result<Vec<f32>>>;
}

pub trait ClassifierProvider
where
	Self: Send + Sync,
{
	fn classify<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		subject: &'a str,
		body: &'a str,
	) -> BoxFuture<'a, triage_providers::Result<String>>;
}

pub trait DraftProvider
where
	Self: Send + Sync,
{
	fn draft<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		subject: &'a str,
		body: &'a str,
		category: &'a str,
		similar: &'a [SimilarContext],
	) -> BoxFuture<'a, triage_providers::Result<String>>;
}

#[derive(Debug)]
pub enum ServiceError {
	NotFound { message: String },
	InvalidArgument { message: String },
	InvalidOperation { message: String },
	Provider { message: String },
	ProviderTimeout { message: String },
	Storage { message: String },
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub classifier: Arc<dyn ClassifierProvider>,
	pub drafter: Arc<dyn DraftProvider>,
}

/// The orchestration core: the processing pipeline, the draft generator, and
/// the workflow controller, wired over the injected store/index/provider
/// collaborators. Cloning is cheap; the detached pipeline task clones the
/// service into its own error boundary.
#[derive(Clone)]
pub struct TriageService {
	pub cfg: Arc<Config>,
	pub store: Arc<dyn TicketStore>,
	pub index: Arc<dyn SimilarityIndex>,
	pub providers: Providers,
}

/// A ticket as the API surfaces it. The embedding never appears here; it is
/// an internal similarity artifact, not display data.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TicketView {
	pub id: i64,
	pub customer_name: String,
	pub email: String,
	pub subject: String,
	pub body: String,
	pub category: Option<String>,
	pub priority: String,
	pub status: String,
	pub ai_response: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub received_at: time::OffsetDateTime,
}

struct DefaultProviders;

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NotFound { message } => write!(f, "{message}"),
			Self::InvalidArgument { message } => write!(f, "Invalid argument: {message}"),
			Self::InvalidOperation { message } => write!(f, "{message}"),
			Self::Provider { message } => write!(f, "Provider error: {message}"),
			Self::ProviderTimeout { message } => write!(f, "Provider timeout: {message}"),
			Self::Storage { message } => write!(f, "Storage error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl ServiceError {
	pub(crate) fn not_found(id: i64) -> Self {
		Self::NotFound { message: format!("Ticket {id} not found.") }
	}
}

impl From<triage_storage::Error> for ServiceError {
	fn from(err: triage_storage::Error) -> Self {
		match err {
			triage_storage::Error::NotFound(message) => Self::NotFound { message },
			triage_storage::Error::InvalidArgument(message) => Self::InvalidArgument { message },
			other => Self::Storage { message: other.to_string() },
		}
	}
}

impl From<triage_providers::Error> for ServiceError {
	fn from(err: triage_providers::Error) -> Self {
		if err.is_timeout() {
			Self::ProviderTimeout { message: err.to_string() }
		} else {
			Self::Provider { message: err.to_string() }
		}
	}
}

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, triage_providers::Result<Vec<f32>>> {
		Box::pin(embedding::embed(cfg, text))
	}
}

impl ClassifierProvider for DefaultProviders {
	fn classify<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		subject: &'a str,
		body: &'a str,
	) -> BoxFuture<'a, triage_providers::Result<String>> {
		Box::pin(classify_provider::classify(cfg, subject, body))
	}
}

impl DraftProvider for DefaultProviders {
	fn draft<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		subject: &'a str,
		body: &'a str,
		category: &'a str,
		similar: &'a [SimilarContext],
	) -> BoxFuture<'a, triage_providers::Result<String>> {
		Box::pin(draft_provider::draft(cfg, subject, body, category, similar))
	}
}

impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		classifier: Arc<dyn ClassifierProvider>,
		drafter: Arc<dyn DraftProvider>,
	) -> Self {
		Self { embedding, classifier, drafter }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), classifier: provider.clone(), drafter: provider }
	}
}

impl TriageService {
	pub fn new(
		cfg: Config,
		store: Arc<dyn TicketStore>,
		index: Arc<dyn SimilarityIndex>,
	) -> Self {
		Self::with_providers(cfg, store, index, Providers::default())
	}

	pub fn with_providers(
		cfg: Config,
		store: Arc<dyn TicketStore>,
		index: Arc<dyn SimilarityIndex>,
		providers: Providers,
	) -> Self {
		Self { cfg: Arc::new(cfg), store, index, providers }
	}
}

impl From<Ticket> for TicketView {
	fn from(ticket: Ticket) -> Self {
		Self {
			id: ticket.id,
			customer_name: ticket.customer_name,
			email: ticket.email,
			subject: ticket.subject,
			body: ticket.body,
			category: ticket.category,
			priority: ticket.priority,
			status: ticket.status,
			ai_response: ticket.ai_response,
			received_at: ticket.received_at,
		}
	}
}

/// The text embeddings are computed from: subject and body, blank-line
/// separated. Every embedding in the index comes through here.
pub(crate) fn embedding_text(subject: &str, body: &str) -> String {
	format!("{subject}\n\n{body}")
}
