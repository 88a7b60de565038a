use std::{
	path::PathBuf,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};

use digs_providers::Mode;
use digs_service::{
	BoxFuture, DigsService, Error, ExtractionEngine, InferenceProvider, RetryPolicy,
};
use digs_storage::{LexicalIndex, VectorStore};

/// Replays a fixed list of replies, then repeats the last one. Counts calls.
struct ScriptedInference {
	replies: Vec<digs_providers::Result<String>>,
	calls: AtomicUsize,
}

impl ScriptedInference {
	fn new(replies: Vec<digs_providers::Result<String>>) -> Arc<Self> {
		Arc::new(Self { replies, calls: AtomicUsize::new(0) })
	}

	fn always(reply: &str) -> Arc<Self> {
		Self::new(vec![Ok(reply.to_string())])
	}

	fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl InferenceProvider for ScriptedInference {
	fn invoke<'a>(
		&'a self,
		_mode: Mode,
		_prompt: &'a str,
	) -> BoxFuture<'a, digs_providers::Result<String>> {
		let call = self.calls.fetch_add(1, Ordering::SeqCst);
		let reply = match &self.replies[call.min(self.replies.len() - 1)] {
			Ok(text) => Ok(text.clone()),
			Err(_) => Err(digs_providers::Error::MissingField { field: "response" }),
		};

		Box::pin(async move { reply })
	}

	fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, digs_providers::Result<Vec<f32>>> {
		Box::pin(async { Ok(vec![0.0, 0.0, 0.0]) })
	}

	fn stream<'a>(
		&'a self,
		mode: Mode,
		prompt: &'a str,
		tx: tokio::sync::mpsc::Sender<digs_providers::StreamEvent>,
	) -> BoxFuture<'a, digs_providers::Result<String>> {
		Box::pin(async move {
			let text = self.invoke(mode, prompt).await?;

			tx.send(digs_providers::StreamEvent::Token(text.clone()))
				.await
				.map_err(|_| digs_providers::Error::ChannelClosed)?;
			tx.send(digs_providers::StreamEvent::Done { text: text.clone() })
				.await
				.map_err(|_| digs_providers::Error::ChannelClosed)?;

			Ok(text)
		})
	}
}

fn engine(inference: Arc<ScriptedInference>, retry: RetryPolicy) -> ExtractionEngine {
	ExtractionEngine::new(inference, Mode::Chat, "extract: {text}".to_string(), retry)
}

const VALID_REPLY: &str = r#"
	Here is the structured record you asked for:
	{
		"address": "台南市東區育樂街185號",
		"rent": {"minRental": 3000, "maxRental": 3500},
		"areas": [5.5, 3.5, 120],
		"layout": {"rooms": 2, "living_rooms": 0, "bathrooms": 1},
		"allow_pet": 0,
		"allow_cooking": "0",
		"contacts": [{"name": "unknown", "phones": ["0932-895-832"]}]
	}
"#;

#[tokio::test]
async fn retry_exhausts_after_exactly_max_attempts() {
	let inference = ScriptedInference::always("the model rambled and produced no JSON at all");
	let engine = engine(inference.clone(), RetryPolicy { max_attempts: 5, ..RetryPolicy::default() });

	let result = engine.extract_or_none("some rental post").await;

	assert!(result.is_none());
	assert_eq!(inference.calls(), 5);
}

#[tokio::test]
async fn recovers_on_a_later_attempt() {
	let inference = ScriptedInference::new(vec![
		Ok("no json".to_string()),
		Ok("still { broken".to_string()),
		Ok(VALID_REPLY.to_string()),
	]);
	let engine = engine(inference.clone(), RetryPolicy::default());

	let listing = engine.extract_or_none("some rental post").await.expect("third attempt parses");

	assert_eq!(inference.calls(), 3);
	assert_eq!(listing.areas, vec![5.5, 3.5, -1.0]);
	assert_eq!(listing.contacts[0].name, "");
	assert_eq!(listing.contacts[0].phones, vec!["0932895832".to_string()]);
}

#[tokio::test]
async fn transport_failure_surfaces_from_single_extract() {
	let inference =
		ScriptedInference::new(vec![Err(digs_providers::Error::MissingField { field: "response" })]);
	let engine = engine(inference, RetryPolicy::default());

	let err = engine.extract("some rental post").await.expect_err("transport failure");

	assert!(matches!(err, Error::Provider(_)));
}

#[tokio::test]
async fn missing_required_keys_fail_the_attempt() {
	let inference = ScriptedInference::always(r#"{"address": "x"}"#);
	let engine = engine(inference.clone(), RetryPolicy { max_attempts: 2, ..RetryPolicy::default() });

	assert!(engine.extract_or_none("post").await.is_none());
	assert_eq!(inference.calls(), 2);
}

fn test_config() -> digs_config::Config {
	digs_config::Config {
		app: digs_config::App { log_level: "info".to_string() },
		inference: digs_config::Inference {
			server_address: "http://localhost".to_string(),
			server_port: 11434,
			model: "llama3:8b".to_string(),
			embed_model: "nomic-embed-text".to_string(),
			mode: "chat".to_string(),
			timeout_ms: 1_000,
		},
		extraction: digs_config::Extraction {
			prompt_path: PathBuf::from("prompts/extract_prompt.txt"),
			query_prompt_path: PathBuf::from("prompts/query_prompt.txt"),
			max_attempts: 5,
			retry_delay_ms: None,
			deadline_ms: None,
		},
		storage: digs_config::Storage {
			lexical: digs_config::Lexical { dir: PathBuf::from("lexical_index") },
			qdrant: digs_config::Qdrant {
				url: "http://localhost:6334".to_string(),
				collection: "rental_posts".to_string(),
				vector_dim: 3,
			},
		},
		search: digs_config::Search { top_k: 20, alpha: 0.6 },
	}
}

fn test_service(inference: Arc<ScriptedInference>) -> DigsService {
	let cfg = test_config();
	let lexical = LexicalIndex::create_in_ram().expect("ram index");
	let vectors = VectorStore::new(&cfg.storage.qdrant).expect("vector store");

	DigsService::new(cfg, lexical, vectors, inference, "query: {query}".to_string())
}

#[tokio::test]
async fn parse_query_recovers_filter_from_prose_reply() {
	let inference = ScriptedInference::always(
		r#"Here you go: {"address": "台南", "allow_pet": 1, "other_requirements": "near campus"}"#,
	);
	let service = test_service(inference);

	let filter = service.parse_query("pet friendly place in Tainan").await.expect("filter");

	assert_eq!(filter.address.as_deref(), Some("台南"));
	assert_eq!(filter.allow_pet, digs_domain::Amenity::Yes);
	assert_eq!(filter.other_requirements, "near campus");
}

#[tokio::test]
async fn parse_query_fails_without_a_json_span() {
	let inference = ScriptedInference::always("I could not understand the request.");
	let service = test_service(inference);

	let err = service.parse_query("anything").await.expect_err("no span");

	assert!(matches!(err, Error::NoJsonSpan));
}
