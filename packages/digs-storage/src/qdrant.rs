use std::collections::HashMap;

use qdrant_client::{
	Payload, Qdrant,
	qdrant::{
		CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, Query,
		QueryPointsBuilder, ScoredPoint, UpsertPointsBuilder, Value, VectorParamsBuilder,
		value::Kind,
	},
};
use uuid::Uuid;

use crate::Result;

/// Vector store over a single qdrant collection: one unnamed dense vector
/// per point, dot-product metric, the flattened listing text as payload.
pub struct VectorStore {
	pub client: Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}

impl VectorStore {
	pub fn new(cfg: &digs_config::Qdrant) -> Result<Self> {
		let client = Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(());
		}

		self.client
			.create_collection(CreateCollectionBuilder::new(self.collection.clone()).vectors_config(
				VectorParamsBuilder::new(u64::from(self.vector_dim), Distance::Dot),
			))
			.await?;

		Ok(())
	}

	pub async fn drop_collection(&self) -> Result<()> {
		if self.client.collection_exists(self.collection.clone()).await? {
			self.client.delete_collection(self.collection.clone()).await?;
		}

		Ok(())
	}

	pub async fn insert(&self, embedding: Vec<f32>, content: &str) -> Result<()> {
		let mut payload_map = HashMap::new();

		payload_map.insert("content".to_string(), Value::from(content.to_string()));

		let point =
			PointStruct::new(Uuid::new_v4().to_string(), embedding, Payload::from(payload_map));

		self.client
			.upsert_points(UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true))
			.await?;

		Ok(())
	}

	/// Returns up to `top_k` stored texts ordered by similarity, best first.
	pub async fn search(&self, embedding: Vec<f32>, top_k: u32) -> Result<Vec<String>> {
		let query = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(embedding))
			.with_payload(true)
			.limit(u64::from(top_k));
		let response = self.client.query(query).await?;

		Ok(response.result.iter().filter_map(payload_content).collect())
	}

	pub async fn count(&self) -> Result<u64> {
		let response = self
			.client
			.count(CountPointsBuilder::new(self.collection.clone()).exact(true))
			.await?;

		Ok(response.result.map(|result| result.count).unwrap_or(0))
	}
}

fn payload_content(point: &ScoredPoint) -> Option<String> {
	match point.payload.get("content").and_then(|value| value.kind.as_ref()) {
		Some(Kind::StringValue(text)) => Some(text.clone()),
		_ => None,
	}
}
