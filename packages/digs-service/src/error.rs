pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("No JSON object found in the model reply.")]
	NoJsonSpan,
	#[error("Model reply does not match the record schema.")]
	InvalidRecord { source: serde_json::Error },
	#[error("Unknown inference mode {mode:?}.")]
	UnknownMode { mode: String },
	#[error(transparent)]
	Provider(#[from] digs_providers::Error),
	#[error(transparent)]
	Storage(#[from] digs_storage::Error),
}
