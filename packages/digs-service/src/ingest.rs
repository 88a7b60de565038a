use digs_domain::Listing;

use crate::{DigsService, Result};

impl DigsService {
	/// Writes one record to both stores. Two-phase: the vector write runs
	/// first, and a failure there leaves the lexical index untouched so the
	/// stores cannot diverge. No identity is assigned, so re-ingesting the
	/// same record produces a duplicate entry in both stores.
	pub async fn ingest(&self, listing: &Listing) -> Result<()> {
		let text = listing.to_search_text();
		let embedding = self.inference.embed(&text).await?;

		self.vectors.insert(embedding, &text).await?;
		self.lexical.insert(&text)?;

		Ok(())
	}

	/// Ingests a batch and commits the lexical writer once at the end.
	/// Storage failures propagate; nothing past the failing record is
	/// written.
	pub async fn ingest_all(&mut self, listings: &[Listing]) -> Result<usize> {
		for (index, listing) in listings.iter().enumerate() {
			tracing::info!(record = index + 1, total = listings.len(), "Ingesting listing.");

			self.ingest(listing).await?;
		}

		self.lexical.commit()?;

		Ok(listings.len())
	}

	/// Drops both stores and reindexes the whole corpus.
	pub async fn rebuild(&mut self, listings: &[Listing]) -> Result<usize> {
		self.lexical.clear()?;
		self.vectors.drop_collection().await?;
		self.vectors.ensure_collection().await?;

		self.ingest_all(listings).await
	}
}
