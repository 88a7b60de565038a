use digs_providers::StreamEvent;
use tokio::sync::mpsc;

use crate::{DigsService, Result};

impl DigsService {
	/// Answers a free-text housing request grounded in the corpus: the
	/// request becomes a structured filter, the fused hits become context,
	/// and the reply is streamed token by token into `tx`. Returns the full
	/// reply once the stream completes.
	pub async fn answer(
		&self,
		question: &str,
		template: &str,
		top_k: usize,
		alpha: f32,
		tx: mpsc::Sender<StreamEvent>,
	) -> Result<String> {
		let filter = self.parse_query(question).await?;
		let results = self.hybrid_search(&filter, top_k, alpha).await?;
		let context =
			results.iter().map(|result| result.content.as_str()).collect::<Vec<_>>().join("\n");
		let prompt = template.replace("{context}", &context).replace("{question}", question);
		let mode = self.text_mode()?;

		Ok(self.inference.stream(mode, &prompt, tx).await?)
	}
}
