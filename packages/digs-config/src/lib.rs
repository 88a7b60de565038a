mod error;
mod types;

pub use error::{Error, Result};
pub use types::{App, Config, Extraction, Inference, Lexical, Qdrant, Search, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.inference.server_address.trim().is_empty() {
		return Err(Error::Validation {
			message: "inference.server_address must be non-empty.".to_string(),
		});
	}
	if !matches!(cfg.inference.mode.as_str(), "generate" | "chat") {
		return Err(Error::Validation {
			message: "inference.mode must be one of generate or chat.".to_string(),
		});
	}
	if cfg.inference.model.trim().is_empty() {
		return Err(Error::Validation { message: "inference.model must be non-empty.".to_string() });
	}
	if cfg.inference.embed_model.trim().is_empty() {
		return Err(Error::Validation {
			message: "inference.embed_model must be non-empty.".to_string(),
		});
	}
	if cfg.inference.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "inference.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.extraction.max_attempts == 0 {
		return Err(Error::Validation {
			message: "extraction.max_attempts must be greater than zero.".to_string(),
		});
	}

	if let Some(deadline_ms) = cfg.extraction.deadline_ms
		&& deadline_ms == 0
	{
		return Err(Error::Validation {
			message: "extraction.deadline_ms must be greater than zero.".to_string(),
		});
	}

	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.collection must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.vector_dim == 0 {
		return Err(Error::Validation {
			message: "storage.qdrant.vector_dim must be greater than zero.".to_string(),
		});
	}
	if cfg.search.top_k == 0 {
		return Err(Error::Validation {
			message: "search.top_k must be greater than zero.".to_string(),
		});
	}
	if !cfg.search.alpha.is_finite() {
		return Err(Error::Validation {
			message: "search.alpha must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.search.alpha) {
		return Err(Error::Validation {
			message: "search.alpha must be in the range 0.0-1.0.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	while cfg.inference.server_address.ends_with('/') {
		cfg.inference.server_address.pop();
	}
	if cfg.app.log_level.trim().is_empty() {
		cfg.app.log_level = "info".to_string();
	}
}
