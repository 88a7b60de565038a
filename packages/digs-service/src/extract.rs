use std::{
	sync::Arc,
	time::{Duration, Instant},
};

use digs_domain::Listing;
use digs_providers::Mode;

use crate::{Error, InferenceProvider, Result};

/// Bounds on the extraction retry loop. The model is non-deterministic and
/// occasionally emits prose around or instead of JSON; the ceiling keeps a
/// bad run from amplifying cost without bound.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
	pub max_attempts: u32,
	/// Pause between attempts. `None` retries immediately.
	pub delay: Option<Duration>,
	/// Upper bound on the whole loop, attempts included.
	pub deadline: Option<Duration>,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self { max_attempts: 5, delay: None, deadline: None }
	}
}

impl RetryPolicy {
	pub fn from_config(cfg: &digs_config::Extraction) -> Self {
		Self {
			max_attempts: cfg.max_attempts,
			delay: cfg.retry_delay_ms.map(Duration::from_millis),
			deadline: cfg.deadline_ms.map(Duration::from_millis),
		}
	}
}

/// Turns one raw listing post into a validated, normalized [`Listing`] by
/// driving the inference backend with the extraction prompt.
pub struct ExtractionEngine {
	inference: Arc<dyn InferenceProvider>,
	mode: Mode,
	template: String,
	retry: RetryPolicy,
}

impl ExtractionEngine {
	pub fn new(
		inference: Arc<dyn InferenceProvider>,
		mode: Mode,
		template: String,
		retry: RetryPolicy,
	) -> Self {
		Self { inference, mode, template, retry }
	}

	/// One attempt: prompt, recover the JSON span, validate, normalize.
	pub async fn extract(&self, raw_text: &str) -> Result<Listing> {
		let prompt = self.template.replace("{text}", raw_text);
		let reply = self.inference.invoke(self.mode, &prompt).await?;

		parse_listing(&reply)
	}

	/// The resilient variant: retries failed attempts up to the policy's
	/// ceiling and returns `None` only after exhausting it. Never yields a
	/// partially normalized record.
	pub async fn extract_or_none(&self, raw_text: &str) -> Option<Listing> {
		let deadline_at = self.retry.deadline.map(|deadline| Instant::now() + deadline);

		for attempt in 1..=self.retry.max_attempts {
			let attempt_result = match deadline_at {
				Some(deadline_at) => {
					let Some(remaining) = deadline_at.checked_duration_since(Instant::now())
					else {
						tracing::warn!(attempt, "Extraction deadline exhausted.");

						return None;
					};

					match tokio::time::timeout(remaining, self.extract(raw_text)).await {
						Ok(result) => result,
						Err(_) => {
							tracing::warn!(attempt, "Extraction deadline exhausted mid-attempt.");

							return None;
						},
					}
				},
				None => self.extract(raw_text).await,
			};

			match attempt_result {
				Ok(listing) => return Some(listing),
				Err(err) => {
					tracing::warn!(error = %err, attempt, "Extraction attempt failed.");
				},
			}

			if let Some(delay) = self.retry.delay
				&& attempt < self.retry.max_attempts
			{
				tokio::time::sleep(delay).await;
			}
		}

		None
	}
}

fn parse_listing(reply: &str) -> Result<Listing> {
	let span = json_span(reply).ok_or(Error::NoJsonSpan)?;
	let listing: Listing =
		serde_json::from_str(span).map_err(|err| Error::InvalidRecord { source: err })?;

	Ok(listing.normalized())
}

/// Best-effort recovery of a JSON object from a chat-style reply: the span
/// from the first `{` to its matching `}`, tracking nesting and string
/// literals. The model's output format is inherently unreliable, so anything
/// short of a balanced object is a failure, not a guess.
pub(crate) fn json_span(text: &str) -> Option<&str> {
	let start = text.find('{')?;
	let mut depth = 0_usize;
	let mut in_string = false;
	let mut escaped = false;

	for (offset, ch) in text[start..].char_indices() {
		if in_string {
			if escaped {
				escaped = false;
			} else if ch == '\\' {
				escaped = true;
			} else if ch == '"' {
				in_string = false;
			}

			continue;
		}

		match ch {
			'"' => in_string = true,
			'{' => depth += 1,
			'}' => {
				depth -= 1;

				if depth == 0 {
					return Some(&text[start..start + offset + ch.len_utf8()]);
				}
			},
			_ => {},
		}
	}

	None
}
