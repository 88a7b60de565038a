use std::{
	fs,
	io::{self, Write},
	path::Path,
	sync::Arc,
};

use color_eyre::{Result, eyre};
use digs_config::Config;
use digs_domain::Listing;
use digs_providers::{Mode, OllamaClient, StreamEvent};
use digs_service::{DigsService, ExtractionEngine, RetryPolicy};
use digs_storage::{LexicalIndex, VectorStore};
use tokio::sync::mpsc;

/// Batch extraction: one record per raw post. A post that never yields a
/// valid record is logged and skipped; the rest of the batch continues.
pub async fn extract(cfg: &Config, input: &Path, output: &Path) -> Result<()> {
	let template = fs::read_to_string(&cfg.extraction.prompt_path)?;
	let client = OllamaClient::new(&cfg.inference)?;
	let engine = ExtractionEngine::new(
		Arc::new(client),
		text_mode(cfg)?,
		template,
		RetryPolicy::from_config(&cfg.extraction),
	);
	let raw = fs::read_to_string(input)?;
	let posts: Vec<String> = serde_json::from_str(&raw)?;
	let mut records = Vec::new();

	for (index, post) in posts.iter().enumerate() {
		tracing::info!(post = index + 1, total = posts.len(), "Extracting post.");

		match engine.extract_or_none(post).await {
			Some(listing) => records.push(listing),
			None => {
				tracing::warn!(
					post = index + 1,
					"Skipping post that never produced a valid record."
				);
			},
		}
	}

	fs::write(output, serde_json::to_string_pretty(&records)?)?;
	tracing::info!(
		extracted = records.len(),
		total = posts.len(),
		output = %output.display(),
		"Extraction finished."
	);

	Ok(())
}

pub async fn ingest(cfg: Config, input: &Path) -> Result<()> {
	let raw = fs::read_to_string(input)?;
	let listings: Vec<Listing> = serde_json::from_str(&raw)?;
	let mut service = build_service(cfg).await?;
	let written = service.rebuild(&listings).await?;
	let stored = service.vectors.count().await?;

	tracing::info!(written, stored, "Rebuilt both stores.");

	Ok(())
}

pub async fn search(cfg: Config, query: &str, top_k: Option<u32>, alpha: Option<f32>) -> Result<()> {
	let top_k = top_k.unwrap_or(cfg.search.top_k) as usize;
	let alpha = alpha.unwrap_or(cfg.search.alpha);

	if !(0.0..=1.0).contains(&alpha) {
		return Err(eyre::eyre!("alpha must be in the range 0.0-1.0."));
	}

	let service = build_service(cfg).await?;
	let filter = service.parse_query(query).await?;

	if filter.is_empty() {
		tracing::warn!("Request produced no constraints; ranking is vector-only.");
	}

	tracing::info!(lexical_query = %digs_service::translate(&filter), "Translated query.");

	let results = service.hybrid_search(&filter, top_k, alpha).await?;

	for result in &results {
		println!(
			"{}",
			serde_json::json!({ "score": result.score, "content": result.content })
		);
	}

	Ok(())
}

pub async fn ask(
	cfg: Config,
	question: &str,
	prompt_path: &Path,
	top_k: Option<u32>,
	alpha: Option<f32>,
) -> Result<()> {
	let top_k = top_k.unwrap_or(cfg.search.top_k) as usize;
	let alpha = alpha.unwrap_or(cfg.search.alpha);
	let template = fs::read_to_string(prompt_path)?;
	let service = build_service(cfg).await?;
	let (tx, mut rx) = mpsc::channel(32);
	let printer = tokio::spawn(async move {
		while let Some(event) = rx.recv().await {
			match event {
				StreamEvent::Token(token) => {
					print!("{token}");

					let _ = io::stdout().flush();
				},
				StreamEvent::Done { .. } => println!(),
			}
		}
	});

	service.answer(question, &template, top_k, alpha, tx).await?;
	printer.await?;

	Ok(())
}

pub async fn models(cfg: &Config) -> Result<()> {
	let client = OllamaClient::new(&cfg.inference)?;

	for model in client.models().await? {
		println!("{model}");
	}

	Ok(())
}

fn text_mode(cfg: &Config) -> Result<Mode> {
	Mode::from_name(&cfg.inference.mode)
		.ok_or_else(|| eyre::eyre!("Unknown inference mode {:?}.", cfg.inference.mode))
}

async fn build_service(cfg: Config) -> Result<DigsService> {
	let query_template = fs::read_to_string(&cfg.extraction.query_prompt_path)?;
	let client = OllamaClient::new(&cfg.inference)?;
	let lexical = LexicalIndex::open(&cfg.storage.lexical.dir)?;
	let vectors = VectorStore::new(&cfg.storage.qdrant)?;

	vectors.ensure_collection().await?;

	Ok(DigsService::new(cfg, lexical, vectors, Arc::new(client), query_template))
}
