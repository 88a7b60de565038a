use std::collections::{BTreeSet, HashMap};

use digs_domain::ListingFilter;
use digs_storage::ScoredDocument;

use crate::{DigsService, Result, translate::translate};

/// One fused hit. Ordering is a total order: fused score descending, then
/// lexical score descending, then content key ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridResult {
	pub content: String,
	pub score: f32,
}

/// Merges the two result sets by content key. Vector neighbors carry a
/// rank-based pseudo-score of `top_k - rank` so the two channels land in
/// comparable ranges before the convex combination; the vector store's
/// native similarity is deliberately unused.
pub fn fuse(
	vector_hits: &[String],
	lexical_hits: &[ScoredDocument],
	top_k: usize,
	alpha: f32,
) -> Vec<HybridResult> {
	let mut vector_scores: HashMap<&str, f32> = HashMap::new();

	for (rank, content) in vector_hits.iter().take(top_k).enumerate() {
		vector_scores.entry(content.as_str()).or_insert((top_k - rank) as f32);
	}

	let mut lexical_scores: HashMap<&str, f32> = HashMap::new();

	for hit in lexical_hits.iter().take(top_k) {
		lexical_scores.entry(hit.content.as_str()).or_insert(hit.score);
	}

	let contents: BTreeSet<&str> =
		vector_scores.keys().chain(lexical_scores.keys()).copied().collect();
	let mut fused: Vec<(f32, f32, &str)> = contents
		.into_iter()
		.map(|content| {
			let vector_score = vector_scores.get(content).copied().unwrap_or(0.0);
			let lexical_score = lexical_scores.get(content).copied().unwrap_or(0.0);
			let score = alpha * vector_score + (1.0 - alpha) * lexical_score;

			(score, lexical_score, content)
		})
		.collect();

	fused.sort_by(|a, b| {
		b.0.total_cmp(&a.0).then_with(|| b.1.total_cmp(&a.1)).then_with(|| a.2.cmp(b.2))
	});

	fused
		.into_iter()
		.take(top_k)
		.map(|(score, _, content)| HybridResult { content: content.to_string(), score })
		.collect()
}

impl DigsService {
	/// Hybrid retrieval for a structured filter: the filter's JSON text is
	/// embedded for the semantic channel while its translation queries the
	/// lexical channel, and both result sets are fused. Stateless between
	/// calls.
	pub async fn hybrid_search(
		&self,
		filter: &ListingFilter,
		top_k: usize,
		alpha: f32,
	) -> Result<Vec<HybridResult>> {
		let query_text = serde_json::json!(filter).to_string();
		let embedding = self.inference.embed(&query_text).await?;
		let vector_hits = self.vectors.search(embedding, top_k as u32).await?;
		let lexical_query = translate(filter);
		let lexical_hits = self.lexical.search(&lexical_query, top_k)?;

		Ok(fuse(&vector_hits, &lexical_hits, top_k, alpha))
	}
}
