pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Lexical(#[from] tantivy::TantivyError),
	#[error("Failed to prepare lexical index directory at {path:?}.")]
	IndexDirectory { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to open lexical index directory at {path:?}.")]
	OpenDirectory { path: std::path::PathBuf, source: tantivy::directory::error::OpenDirectoryError },
	#[error(transparent)]
	Qdrant(#[from] Box<qdrant_client::QdrantError>),
}
impl From<qdrant_client::QdrantError> for Error {
	fn from(err: qdrant_client::QdrantError) -> Self {
		Self::Qdrant(Box::new(err))
	}
}
