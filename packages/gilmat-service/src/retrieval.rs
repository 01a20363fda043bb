//! Stage 1: semantic candidate retrieval with metadata filtering and a heuristic match score.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use gilmat_config::Retrieval;
use gilmat_domain::{FilterMetadata, MetadataFilter};
use gilmat_storage::qdrant::IndexHit;

use crate::{GilmatService, Result};

const REWRITE_SYSTEM_PROMPT: &str = "\
Rewrite the traveller summary as a short search query for restaurant descriptions. \
Drop names, ages, nationalities and any other identifying facts. \
Keep only mood, occasion, company and food cues. Reply with the query text only.";

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RetrievalItem {
	pub id: String,
	pub distance: f32,
	pub filter_score: u32,
}

impl GilmatService {
	/// Ranked candidate IDs for a profile summary.
	///
	/// Backend failures are logged and reported as no candidates.
	pub async fn retrieve(
		&self,
		summary: &str,
		filter: &FilterMetadata,
		result_count: u32,
	) -> Vec<RetrievalItem> {
		let query = self.rewrite_query(summary).await;
		let pre_filter = filter.pre_filter();
		let hits = match self.query_with_relaxation(&query, pre_filter.as_ref(), result_count).await {
			Ok(hits) => hits,
			Err(err) => {
				tracing::warn!(error = %err, "Candidate retrieval failed.");

				return Vec::new();
			},
		};

		rank_hits(hits, filter, &self.cfg.retrieval)
	}

	async fn query_with_relaxation(
		&self,
		query: &str,
		pre_filter: Option<&MetadataFilter>,
		result_count: u32,
	) -> Result<Vec<IndexHit>> {
		if let Some(pre_filter) = pre_filter {
			let hits = self.index.query(query, result_count, Some(pre_filter)).await?;

			if !hits.is_empty() {
				tracing::debug!(hits = hits.len(), "Filtered retrieval returned candidates.");

				return Ok(hits);
			}

			tracing::info!(
				conditions = pre_filter.must.len(),
				"Filtered retrieval returned nothing, retrying without metadata filter."
			);
		}

		self.index.query(query, result_count, None).await
	}

	async fn rewrite_query(&self, summary: &str) -> String {
		let cfg = &self.cfg.providers.llm;
		let messages = [
			serde_json::json!({ "role": "system", "content": REWRITE_SYSTEM_PROMPT }),
			serde_json::json!({ "role": "user", "content": summary }),
		];

		match self.providers.llm.complete(cfg, &messages, cfg.rewrite_temperature).await {
			Ok(text) => {
				let query = text.trim().trim_matches(|c: char| c == '"' || c == '\'').trim();

				if query.is_empty() {
					truncate_chars(summary, self.cfg.retrieval.rewrite_fallback_chars)
				} else {
					query.to_string()
				}
			},
			Err(err) => {
				tracing::warn!(error = %err, "Query rewrite failed, using truncated summary.");

				truncate_chars(summary, self.cfg.retrieval.rewrite_fallback_chars)
			},
		}
	}
}

/// Drops image-less candidates, scores the rest and orders them by score, then distance.
pub fn rank_hits(
	hits: Vec<IndexHit>,
	filter: &FilterMetadata,
	cfg: &Retrieval,
) -> Vec<RetrievalItem> {
	let mut items: Vec<RetrievalItem> = hits
		.into_iter()
		.filter(|hit| !lacks_image(hit, cfg))
		.map(|hit| RetrievalItem {
			filter_score: filter.filter_score(&hit.metadata, &cfg.points),
			id: hit.id,
			distance: hit.distance,
		})
		.collect();

	items.sort_by(|a, b| {
		b.filter_score.cmp(&a.filter_score).then_with(|| cmp_distance_asc(a.distance, b.distance))
	});

	items
}

fn lacks_image(hit: &IndexHit, cfg: &Retrieval) -> bool {
	hit.metadata
		.get(&cfg.image_field)
		.map(|value| value.contains(cfg.no_image_marker.as_str()))
		.unwrap_or(false)
}

fn cmp_distance_asc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
	}
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
	text.chars().take(max_chars).collect()
}
