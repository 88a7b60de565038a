pub mod answer;
pub mod extract;
pub mod fuse;
pub mod ingest;
pub mod query;
pub mod translate;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

use digs_providers::{Mode, OllamaClient, StreamEvent};
use digs_storage::{LexicalIndex, VectorStore};
use tokio::sync::mpsc;

pub use error::{Error, Result};
pub use extract::{ExtractionEngine, RetryPolicy};
pub use fuse::{HybridResult, fuse};
pub use translate::translate;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The seam to the model-serving backend. Production code goes through
/// [`OllamaClient`]; tests substitute stubs.
pub trait InferenceProvider
where
	Self: Send + Sync,
{
	fn invoke<'a>(
		&'a self,
		mode: Mode,
		prompt: &'a str,
	) -> BoxFuture<'a, digs_providers::Result<String>>;

	fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, digs_providers::Result<Vec<f32>>>;

	fn stream<'a>(
		&'a self,
		mode: Mode,
		prompt: &'a str,
		tx: mpsc::Sender<StreamEvent>,
	) -> BoxFuture<'a, digs_providers::Result<String>>;
}

impl InferenceProvider for OllamaClient {
	fn invoke<'a>(
		&'a self,
		mode: Mode,
		prompt: &'a str,
	) -> BoxFuture<'a, digs_providers::Result<String>> {
		Box::pin(OllamaClient::invoke(self, mode, prompt))
	}

	fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, digs_providers::Result<Vec<f32>>> {
		Box::pin(OllamaClient::embed(self, text))
	}

	fn stream<'a>(
		&'a self,
		mode: Mode,
		prompt: &'a str,
		tx: mpsc::Sender<StreamEvent>,
	) -> BoxFuture<'a, digs_providers::Result<String>> {
		Box::pin(OllamaClient::stream(self, mode, prompt, tx))
	}
}

/// Ingestion and retrieval over the two stores. Stateless between calls;
/// the lexical writer is the only part that needs `&mut`.
pub struct DigsService {
	pub cfg: digs_config::Config,
	pub lexical: LexicalIndex,
	pub vectors: VectorStore,
	pub inference: Arc<dyn InferenceProvider>,
	query_template: String,
}

impl DigsService {
	pub fn new(
		cfg: digs_config::Config,
		lexical: LexicalIndex,
		vectors: VectorStore,
		inference: Arc<dyn InferenceProvider>,
		query_template: String,
	) -> Self {
		Self { cfg, lexical, vectors, inference, query_template }
	}

	pub(crate) fn text_mode(&self) -> Result<Mode> {
		Mode::from_name(&self.cfg.inference.mode)
			.ok_or_else(|| Error::UnknownMode { mode: self.cfg.inference.mode.clone() })
	}
}
