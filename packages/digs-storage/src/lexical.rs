use std::path::Path;

use tantivy::{
	Index, IndexWriter, TantivyDocument,
	collector::TopDocs,
	directory::MmapDirectory,
	doc,
	query::QueryParser,
	schema::{Field, STORED, STRING, Schema, TEXT, Value},
};
use uuid::Uuid;

use crate::Result;

const WRITER_MEMORY_BYTES: usize = 50_000_000;

/// One lexical hit: the stored document text plus its BM25 relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
	pub content: String,
	pub score: f32,
}

/// BM25 inverted index over flattened listing text. Single writer; every
/// search opens a fresh reader and sees the last committed state.
pub struct LexicalIndex {
	index: Index,
	writer: IndexWriter,
	id: Field,
	content: Field,
}

impl LexicalIndex {
	pub fn open(dir: &Path) -> Result<Self> {
		std::fs::create_dir_all(dir)
			.map_err(|err| crate::Error::IndexDirectory { path: dir.to_path_buf(), source: err })?;

		let directory = MmapDirectory::open(dir)
			.map_err(|err| crate::Error::OpenDirectory { path: dir.to_path_buf(), source: err })?;
		let index = Index::open_or_create(directory, schema())?;

		Self::from_index(index)
	}

	/// In-memory index, used by tests.
	pub fn create_in_ram() -> Result<Self> {
		Self::from_index(Index::create_in_ram(schema()))
	}

	fn from_index(index: Index) -> Result<Self> {
		let writer = index.writer(WRITER_MEMORY_BYTES)?;
		let id = index.schema().get_field("id")?;
		let content = index.schema().get_field("content")?;

		Ok(Self { index, writer, id, content })
	}

	pub fn insert(&self, content: &str) -> Result<()> {
		self.writer.add_document(doc!(
			self.id => Uuid::new_v4().to_string(),
			self.content => content,
		))?;

		Ok(())
	}

	pub fn commit(&mut self) -> Result<()> {
		self.writer.commit()?;

		Ok(())
	}

	pub fn clear(&mut self) -> Result<()> {
		self.writer.delete_all_documents()?;
		self.writer.commit()?;

		Ok(())
	}

	/// Runs a `field:term` boolean query against the index. The query is
	/// parsed leniently so terms scoped to fields the schema does not know
	/// match nothing instead of failing the whole query; an empty query
	/// string matches nothing.
	pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredDocument>> {
		if top_k == 0 {
			return Ok(Vec::new());
		}

		let reader = self.index.reader()?;
		let searcher = reader.searcher();
		let parser = QueryParser::for_index(&self.index, vec![self.content]);
		let (parsed, _errors) = parser.parse_query_lenient(query);
		let top_docs = searcher.search(&parsed, &TopDocs::with_limit(top_k))?;
		let mut results = Vec::with_capacity(top_docs.len());

		for (score, address) in top_docs {
			let retrieved: TantivyDocument = searcher.doc(address)?;
			let Some(content) = retrieved.get_first(self.content).and_then(|value| value.as_str())
			else {
				continue;
			};

			results.push(ScoredDocument { content: content.to_string(), score });
		}

		Ok(results)
	}
}

fn schema() -> Schema {
	let mut builder = Schema::builder();

	builder.add_text_field("id", STRING | STORED);
	builder.add_text_field("content", TEXT | STORED);

	builder.build()
}
