use digs_domain::ListingFilter;

use crate::{DigsService, Error, Result, extract::json_span};

impl DigsService {
	/// Turns a free-text housing request into a structured filter by way of
	/// the query prompt. The reply goes through the same best-effort JSON
	/// recovery as extraction; fields the model omits stay unconstrained.
	pub async fn parse_query(&self, text: &str) -> Result<ListingFilter> {
		let prompt = self.query_template.replace("{query}", text);
		let mode = self.text_mode()?;
		let reply = self.inference.invoke(mode, &prompt).await?;
		let span = json_span(&reply).ok_or(Error::NoJsonSpan)?;

		serde_json::from_str(span).map_err(|err| Error::InvalidRecord { source: err })
	}
}
