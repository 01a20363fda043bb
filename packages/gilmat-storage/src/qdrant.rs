use std::collections::HashMap;

use qdrant_client::qdrant::{
	Condition, Filter, PointId, Query, QueryPointsBuilder, ScoredPoint, Value,
	point_id::PointIdOptions, value::Kind,
};
use serde::{Deserialize, Serialize};

use gilmat_domain::MetadataFilter;

use crate::{Error, Result};

/// One nearest-neighbour match with its payload flattened to strings.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IndexHit {
	pub id: String,
	/// Cosine distance, `1 - similarity`. Smaller is closer.
	pub distance: f32,
	pub metadata: HashMap<String, String>,
}

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
	pub id_field: String,
}
impl QdrantStore {
	pub fn new(cfg: &gilmat_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self {
			client,
			collection: cfg.collection.clone(),
			vector_dim: cfg.vector_dim,
			id_field: cfg.id_field.clone(),
		})
	}

	pub async fn search(
		&self,
		vector: Vec<f32>,
		filter: Option<&MetadataFilter>,
		limit: u32,
	) -> Result<Vec<IndexHit>> {
		if vector.len() != self.vector_dim as usize {
			return Err(Error::InvalidArgument(format!(
				"Query vector has {} dimensions, expected {}.",
				vector.len(),
				self.vector_dim
			)));
		}

		let mut search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.with_payload(true)
			.limit(limit as u64);

		if let Some(filter) = filter.filter(|filter| !filter.is_empty()) {
			search = search.filter(to_qdrant_filter(filter));
		}

		let response = self.client.query(search).await?;

		Ok(hits_from_points(response.result, &self.id_field))
	}
}

pub fn to_qdrant_filter(filter: &MetadataFilter) -> Filter {
	Filter::all(filter.must.iter().map(|(key, value)| Condition::matches(key.clone(), value.clone())))
}

fn hits_from_points(points: Vec<ScoredPoint>, id_field: &str) -> Vec<IndexHit> {
	let mut hits = Vec::with_capacity(points.len());

	for point in points {
		let id = payload_text(point.payload.get(id_field))
			.or_else(|| point.id.as_ref().and_then(point_id_text));
		let Some(id) = id else {
			tracing::warn!(id_field, "Index hit is missing a restaurant ID.");

			continue;
		};
		let metadata = point
			.payload
			.iter()
			.filter(|(key, _)| key.as_str() != id_field)
			.filter_map(|(key, value)| payload_text(Some(value)).map(|text| (key.clone(), text)))
			.collect();

		hits.push(IndexHit { id, distance: 1.0 - point.score, metadata });
	}

	hits
}

fn point_id_text(point_id: &PointId) -> Option<String> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Num(num)) => Some(num.to_string()),
		Some(PointIdOptions::Uuid(uuid)) => Some(uuid.clone()),
		None => None,
	}
}

/// Booleans use the `"True"`/`"False"` literals the metadata filter matches against.
fn payload_text(value: Option<&Value>) -> Option<String> {
	match value?.kind.as_ref()? {
		Kind::StringValue(text) => Some(text.clone()),
		Kind::IntegerValue(number) => Some(number.to_string()),
		Kind::DoubleValue(number) => Some(number.to_string()),
		Kind::BoolValue(flag) => Some(if *flag { "True" } else { "False" }.to_string()),
		Kind::ListValue(list) => {
			let parts: Vec<String> =
				list.values.iter().filter_map(|item| payload_text(Some(item))).collect();

			Some(parts.join(", "))
		},
		Kind::NullValue(_) | Kind::StructValue(_) => None,
	}
}
