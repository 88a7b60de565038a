use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::{Error, Result};

/// The three Ollama API modes. `Generate` and `Chat` yield text; `Embeddings`
/// yields a fixed-length float vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	Generate,
	Chat,
	Embeddings,
}

impl Mode {
	pub fn api_path(self) -> &'static str {
		match self {
			Self::Generate => "generate",
			Self::Chat => "chat",
			Self::Embeddings => "embeddings",
		}
	}

	pub fn from_name(name: &str) -> Option<Self> {
		match name {
			"generate" => Some(Self::Generate),
			"chat" => Some(Self::Chat),
			"embeddings" => Some(Self::Embeddings),
			_ => None,
		}
	}
}

/// One element of a token stream. Tokens arrive strictly in generation
/// order; `Done` is always last, delivered exactly once, and carries the
/// full concatenated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
	Token(String),
	Done { text: String },
}

pub struct OllamaClient {
	http: reqwest::Client,
	cfg: digs_config::Inference,
}

impl OllamaClient {
	pub fn new(cfg: &digs_config::Inference) -> Result<Self> {
		let http =
			reqwest::Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { http, cfg: cfg.clone() })
	}

	fn endpoint(&self, mode: Mode) -> String {
		format!("{}:{}/api/{}", self.cfg.server_address, self.cfg.server_port, mode.api_path())
	}

	/// Single-shot invocation of a text mode; returns the assistant text.
	pub async fn invoke(&self, mode: Mode, prompt: &str) -> Result<String> {
		let body = request_body(mode, &self.cfg.model, prompt, false);
		let value: Value = self
			.http
			.post(self.endpoint(mode))
			.json(&body)
			.send()
			.await?
			.error_for_status()?
			.json()
			.await?;

		reply_text(mode, &value)
	}

	pub async fn generate(&self, prompt: &str) -> Result<String> {
		self.invoke(Mode::Generate, prompt).await
	}

	pub async fn chat(&self, prompt: &str) -> Result<String> {
		self.invoke(Mode::Chat, prompt).await
	}

	/// Embeds `text` with the configured embedding model.
	pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
		let body = request_body(Mode::Embeddings, &self.cfg.embed_model, text, false);
		let value: Value = self
			.http
			.post(self.endpoint(Mode::Embeddings))
			.json(&body)
			.send()
			.await?
			.error_for_status()?
			.json()
			.await?;

		parse_embedding(&value)
	}

	/// Token-streamed invocation. The backend emits one JSON object per
	/// line; every token is forwarded to `tx` as it is received, and the
	/// terminal `done` marker becomes a single `StreamEvent::Done` carrying
	/// the concatenated text, which is also returned.
	pub async fn stream(
		&self,
		mode: Mode,
		prompt: &str,
		tx: mpsc::Sender<StreamEvent>,
	) -> Result<String> {
		let body = request_body(mode, &self.cfg.model, prompt, true);
		let mut res = self
			.http
			.post(self.endpoint(mode))
			.json(&body)
			.send()
			.await?
			.error_for_status()?;
		let mut pending = Vec::new();
		let mut text = String::new();

		while let Some(chunk) = res.chunk().await? {
			pending.extend_from_slice(&chunk);

			while let Some(newline) = pending.iter().position(|&byte| byte == b'\n') {
				let line: Vec<u8> = pending.drain(..=newline).collect();
				let line = String::from_utf8_lossy(&line);
				let line = line.trim();

				if line.is_empty() {
					continue;
				}

				let event = stream_line_event(mode, line, &mut text)?;
				let done = matches!(event, StreamEvent::Done { .. });

				tx.send(event).await.map_err(|_| Error::ChannelClosed)?;

				if done {
					return Ok(text);
				}
			}
		}

		// A body may end without a trailing newline on its last line.
		let line = String::from_utf8_lossy(&pending);
		let line = line.trim();

		if !line.is_empty() {
			let event = stream_line_event(mode, line, &mut text)?;
			let done = matches!(event, StreamEvent::Done { .. });

			tx.send(event).await.map_err(|_| Error::ChannelClosed)?;

			if done {
				return Ok(text);
			}
		}

		Err(Error::MissingField { field: "done" })
	}

	/// Lists the model names installed on the backend.
	pub async fn models(&self) -> Result<Vec<String>> {
		let url = format!("{}:{}/api/tags", self.cfg.server_address, self.cfg.server_port);
		let value: Value = self.http.get(url).send().await?.error_for_status()?.json().await?;
		let models = value
			.get("models")
			.and_then(Value::as_array)
			.ok_or(Error::MissingField { field: "models" })?;

		Ok(models
			.iter()
			.filter_map(|model| model.get("name").and_then(Value::as_str))
			.map(str::to_string)
			.collect())
	}
}

/// The request body always carries `{model, stream}`; chat mode wraps the
/// prompt as a single user turn, the other modes send it verbatim.
fn request_body(mode: Mode, model: &str, prompt: &str, stream: bool) -> Value {
	match mode {
		Mode::Chat => serde_json::json!({
			"model": model,
			"stream": stream,
			"messages": [{ "role": "user", "content": prompt }],
		}),
		Mode::Generate | Mode::Embeddings => serde_json::json!({
			"model": model,
			"stream": stream,
			"prompt": prompt,
		}),
	}
}

fn reply_text(mode: Mode, value: &Value) -> Result<String> {
	let text = match mode {
		Mode::Chat => value
			.get("message")
			.and_then(|message| message.get("content"))
			.and_then(Value::as_str)
			.ok_or(Error::MissingField { field: "message.content" })?,
		Mode::Generate => value
			.get("response")
			.and_then(Value::as_str)
			.ok_or(Error::MissingField { field: "response" })?,
		Mode::Embeddings => return Err(Error::MissingField { field: "response" }),
	};

	Ok(text.to_string())
}

fn parse_embedding(value: &Value) -> Result<Vec<f32>> {
	let raw = value
		.get("embedding")
		.and_then(Value::as_array)
		.ok_or(Error::MissingField { field: "embedding" })?;
	let mut embedding = Vec::with_capacity(raw.len());

	for item in raw {
		let number = item.as_f64().ok_or(Error::MissingField { field: "embedding" })?;

		embedding.push(number as f32);
	}

	Ok(embedding)
}

/// Turns one stream line into its event, appending token text to the
/// running buffer. The `done` marker yields the terminal event with the
/// full concatenation.
fn stream_line_event(mode: Mode, line: &str, text: &mut String) -> Result<StreamEvent> {
	let value: Value =
		serde_json::from_str(line).map_err(|err| Error::MalformedStreamLine { source: err })?;

	if value.get("done").and_then(Value::as_bool).unwrap_or(false) {
		return Ok(StreamEvent::Done { text: text.clone() });
	}

	let token = reply_text(mode, &value)?;

	text.push_str(&token);

	Ok(StreamEvent::Token(token))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn chat_body_wraps_prompt_as_user_turn() {
		let body = request_body(Mode::Chat, "llama3:8b", "hello", false);

		assert_eq!(body["model"], "llama3:8b");
		assert_eq!(body["stream"], false);
		assert_eq!(body["messages"][0]["role"], "user");
		assert_eq!(body["messages"][0]["content"], "hello");
	}

	#[test]
	fn generate_body_carries_prompt_verbatim() {
		let body = request_body(Mode::Generate, "llama3:8b", "hello", true);

		assert_eq!(body["prompt"], "hello");
		assert_eq!(body["stream"], true);
		assert!(body.get("messages").is_none());
	}

	#[test]
	fn extracts_reply_per_mode() {
		let chat = serde_json::json!({ "message": { "content": "hi" } });
		let generate = serde_json::json!({ "response": "hi" });

		assert_eq!(reply_text(Mode::Chat, &chat).expect("chat reply"), "hi");
		assert_eq!(reply_text(Mode::Generate, &generate).expect("generate reply"), "hi");
		assert!(reply_text(Mode::Chat, &generate).is_err());
	}

	#[test]
	fn parses_embedding_vector() {
		let value = serde_json::json!({ "embedding": [0.25, -1.0, 2.0] });

		assert_eq!(parse_embedding(&value).expect("embedding"), vec![0.25, -1.0, 2.0]);
	}

	#[test]
	fn rejects_non_numeric_embedding() {
		let value = serde_json::json!({ "embedding": [0.25, "x"] });

		assert!(parse_embedding(&value).is_err());
	}

	#[tokio::test]
	async fn stream_delivers_tokens_in_order_then_one_done() {
		let lines = [
			r#"{"response": "two", "done": false}"#,
			r#"{"response": " rooms", "done": false}"#,
			r#"{"response": " available", "done": false}"#,
			r#"{"done": true}"#,
		];
		let (tx, mut rx) = mpsc::channel(1);
		let producer = tokio::spawn(async move {
			let mut text = String::new();

			for line in lines {
				let event =
					stream_line_event(Mode::Generate, line, &mut text).expect("stream line");
				let done = matches!(event, StreamEvent::Done { .. });

				tx.send(event).await.expect("send");

				if done {
					break;
				}
			}
		});
		let mut events = Vec::new();

		while let Some(event) = rx.recv().await {
			events.push(event);
		}

		producer.await.expect("producer");

		assert_eq!(
			events,
			vec![
				StreamEvent::Token("two".to_string()),
				StreamEvent::Token(" rooms".to_string()),
				StreamEvent::Token(" available".to_string()),
				StreamEvent::Done { text: "two rooms available".to_string() },
			]
		);
	}

	#[test]
	fn malformed_stream_line_is_an_error() {
		let mut text = String::new();

		assert!(stream_line_event(Mode::Generate, "not json", &mut text).is_err());
	}
}
