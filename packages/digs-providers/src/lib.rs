mod error;
mod ollama;

pub use error::{Error, Result};
pub use ollama::{Mode, OllamaClient, StreamEvent};
