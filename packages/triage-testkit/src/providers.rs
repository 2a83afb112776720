use std::{
	collections::VecDeque,
	sync::{
		Arc, Mutex, MutexGuard,
		atomic::{AtomicUsize, Ordering},
	},
};

use triage_config::{EmbeddingProviderConfig, LlmProviderConfig};
use triage_providers::{Error, SimilarContext};
use triage_service::{BoxFuture, ClassifierProvider, DraftProvider, EmbeddingProvider, Providers};

#[derive(Clone, Debug)]
enum StubOutcome<T> {
	Value(T),
	Failure { message: String, timeout: bool },
}

impl<T> StubOutcome<T> {
	fn into_result(self) -> triage_providers::Result<T> {
		match self {
			Self::Value(value) => Ok(value),
			Self::Failure { message, timeout } =>
				if timeout {
					Err(Error::Timeout)
				} else {
					Err(Error::InvalidResponse { message })
				},
		}
	}
}

/// Deterministic substitute for the three provider calls. Each call pops a
/// queued outcome first and falls back to the configured default; with
/// neither, the call fails. Call counters make refresh semantics assertable.
#[derive(Debug, Default)]
pub struct StubProviders {
	embeddings: Mutex<VecDeque<StubOutcome<Vec<f32>>>>,
	labels: Mutex<VecDeque<StubOutcome<String>>>,
	drafts: Mutex<VecDeque<StubOutcome<String>>>,
	default_embedding: Mutex<Option<Vec<f32>>>,
	default_label: Mutex<Option<String>>,
	default_draft: Mutex<Option<String>>,
	pub embed_calls: AtomicUsize,
	pub classify_calls: AtomicUsize,
	pub draft_calls: AtomicUsize,
}

impl StubProviders {
	pub fn new() -> Self {
		Self::default()
	}

	/// A fully wired stub: every call succeeds with the given defaults.
	pub fn with_defaults(embedding: Vec<f32>, label: &str, draft: &str) -> Self {
		let stub = Self::default();

		stub.set_default_embedding(embedding);
		stub.set_default_label(label);
		stub.set_default_draft(draft);

		stub
	}

	pub fn providers(this: &Arc<Self>) -> Providers {
		Providers::new(this.clone(), this.clone(), this.clone())
	}

	pub fn set_default_embedding(&self, embedding: Vec<f32>) {
		*lock(&self.default_embedding) = Some(embedding);
	}

	pub fn set_default_label(&self, label: &str) {
		*lock(&self.default_label) = Some(label.to_string());
	}

	pub fn set_default_draft(&self, draft: &str) {
		*lock(&self.default_draft) = Some(draft.to_string());
	}

	pub fn push_embedding(&self, embedding: Vec<f32>) {
		lock(&self.embeddings).push_back(StubOutcome::Value(embedding));
	}

	pub fn push_embedding_failure(&self, message: &str) {
		lock(&self.embeddings)
			.push_back(StubOutcome::Failure { message: message.to_string(), timeout: false });
	}

	pub fn push_embedding_timeout(&self) {
		lock(&self.embeddings)
			.push_back(StubOutcome::Failure { message: String::new(), timeout: true });
	}

	pub fn push_label(&self, label: &str) {
		lock(&self.labels).push_back(StubOutcome::Value(label.to_string()));
	}

	pub fn push_label_failure(&self, message: &str) {
		lock(&self.labels)
			.push_back(StubOutcome::Failure { message: message.to_string(), timeout: false });
	}

	pub fn push_draft(&self, draft: &str) {
		lock(&self.drafts).push_back(StubOutcome::Value(draft.to_string()));
	}

	pub fn push_draft_failure(&self, message: &str) {
		lock(&self.drafts)
			.push_back(StubOutcome::Failure { message: message.to_string(), timeout: false });
	}

	fn next_embedding(&self) -> triage_providers::Result<Vec<f32>> {
		self.embed_calls.fetch_add(1, Ordering::SeqCst);

		if let Some(outcome) = lock(&self.embeddings).pop_front() {
			return outcome.into_result();
		}
		if let Some(default) = lock(&self.default_embedding).clone() {
			return Ok(default);
		}

		Err(Error::InvalidResponse { message: "No stubbed embedding response.".to_string() })
	}

	fn next_label(&self) -> triage_providers::Result<String> {
		self.classify_calls.fetch_add(1, Ordering::SeqCst);

		if let Some(outcome) = lock(&self.labels).pop_front() {
			return outcome.into_result();
		}
		if let Some(default) = lock(&self.default_label).clone() {
			return Ok(default);
		}

		Err(Error::InvalidResponse { message: "No stubbed classification response.".to_string() })
	}

	fn next_draft(&self) -> triage_providers::Result<String> {
		self.draft_calls.fetch_add(1, Ordering::SeqCst);

		if let Some(outcome) = lock(&self.drafts).pop_front() {
			return outcome.into_result();
		}
		if let Some(default) = lock(&self.default_draft).clone() {
			return Ok(default);
		}

		Err(Error::InvalidResponse { message: "No stubbed draft response.".to_string() })
	}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|err| err.into_inner())
}

impl EmbeddingProvider for StubProviders {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		_text: &'a str,
	) -> BoxFuture<'a, triage_providers::Result<Vec<f32>>> {
		let result = self.next_embedding();

		Box::pin(async move { result })
	}
}

impl ClassifierProvider for StubProviders {
	fn classify<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_subject: &'a str,
		_body: &'a str,
	) -> BoxFuture<'a, triage_providers::Result<String>> {
		let result = self.next_label();

		Box::pin(async move { result })
	}
}

impl DraftProvider for StubProviders {
	fn draft<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_subject: &'a str,
		_body: &'a str,
		_category: &'a str,
		_similar: &'a [SimilarContext],
	) -> BoxFuture<'a, triage_providers::Result<String>> {
		let result = self.next_draft();

		Box::pin(async move { result })
	}
}
