pub mod lexical;
pub mod qdrant;

mod error;

pub use error::Error;
pub use lexical::{LexicalIndex, ScoredDocument};
pub use qdrant::VectorStore;

pub type Result<T, E = Error> = std::result::Result<T, E>;
