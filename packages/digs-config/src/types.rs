use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub app: App,
	pub inference: Inference,
	pub extraction: Extraction,
	pub storage: Storage,
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct App {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Inference {
	/// Scheme + host, e.g. "http://localhost". The port is kept separate so
	/// the endpoint can be assembled per API mode.
	pub server_address: String,
	pub server_port: u16,
	pub model: String,
	pub embed_model: String,
	/// "generate" or "chat".
	pub mode: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Extraction {
	pub prompt_path: PathBuf,
	pub query_prompt_path: PathBuf,
	pub max_attempts: u32,
	pub retry_delay_ms: Option<u64>,
	pub deadline_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub lexical: Lexical,
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Lexical {
	pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Search {
	pub top_k: u32,
	pub alpha: f32,
}
