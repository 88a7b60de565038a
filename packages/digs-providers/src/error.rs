pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Http(#[from] reqwest::Error),
	#[error("Model reply is missing {field}.")]
	MissingField { field: &'static str },
	#[error("Stream line is not valid JSON.")]
	MalformedStreamLine { source: serde_json::Error },
	#[error("Token channel closed by the consumer.")]
	ChannelClosed,
}
