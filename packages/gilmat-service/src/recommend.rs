use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gilmat_config::ScoreWeights;
use gilmat_domain::{FilterMetadata, RestaurantRecord, UserProfile, price};

use crate::{Error, GilmatService, Result, RetrievalItem, ScoredCandidate};

const SUMMARY_SYSTEM_PROMPT: &str = "\
You turn a traveller profile given as JSON into a short first-person introduction. \
Write one connected paragraph that mentions every field. Describe the budget as \
affordable, moderate or upscale instead of its raw code.";

#[derive(Clone, Debug, Deserialize)]
pub struct RecommendRequest {
	pub profile: UserProfile,
	#[serde(default)]
	pub top_k: Option<u32>,
	/// Overrides `scoring.weights` for this request only.
	#[serde(default)]
	pub weights: Option<ScoreWeights>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
	/// Travel-aware Stage 2 ranking.
	Ranked,
	/// Stage 1 order because the routing service is down.
	Fallback,
	Empty,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeCode {
	RelaxFilters,
	TravelFrictionUnavailable,
}
impl NoticeCode {
	pub fn message(self) -> &'static str {
		match self {
			Self::RelaxFilters => "No restaurants matched. Try relaxing your filters.",
			Self::TravelFrictionUnavailable =>
				"Travel friction is unavailable right now, showing a simpler ranking.",
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Notice {
	pub code: NoticeCode,
	pub message: String,
}
impl From<NoticeCode> for Notice {
	fn from(code: NoticeCode) -> Self {
		Self { code, message: code.message().to_string() }
	}
}

/// A Stage 1 candidate presented without travel scoring.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RetrievedCandidate {
	#[serde(flatten)]
	pub restaurant: RestaurantRecord,
	pub distance: f32,
	pub filter_score: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecommendationItem {
	Scored(ScoredCandidate),
	Retrieved(RetrievedCandidate),
}
impl RecommendationItem {
	pub fn restaurant(&self) -> &RestaurantRecord {
		match self {
			Self::Scored(candidate) => &candidate.restaurant,
			Self::Retrieved(candidate) => &candidate.restaurant,
		}
	}
}

/// The full ordered result of one recommendation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
	pub status: RecommendationStatus,
	pub notice: Option<Notice>,
	pub summary: String,
	pub items: Vec<RecommendationItem>,
}
impl Recommendation {
	pub fn empty(summary: String) -> Self {
		Self {
			status: RecommendationStatus::Empty,
			notice: Some(NoticeCode::RelaxFilters.into()),
			summary,
			items: Vec::new(),
		}
	}

	pub fn top(&self, k: usize) -> &[RecommendationItem] {
		&self.items[..k.min(self.items.len())]
	}

	pub fn ids(&self) -> Vec<String> {
		self.items.iter().map(|item| item.restaurant().id.clone()).collect()
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct RecommendResponse {
	pub session_id: Uuid,
	pub status: RecommendationStatus,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notice: Option<Notice>,
	pub summary: String,
	pub total_count: usize,
	pub items: Vec<RecommendationItem>,
}
impl RecommendResponse {
	fn slice(session_id: Uuid, recommendation: &Recommendation, top_k: u32) -> Self {
		Self {
			session_id,
			status: recommendation.status,
			notice: recommendation.notice.clone(),
			summary: recommendation.summary.clone(),
			total_count: recommendation.items.len(),
			items: recommendation.top(top_k as usize).to_vec(),
		}
	}
}

impl GilmatService {
	/// Runs a recommendation and keeps the full result as a session for later re-slicing.
	pub async fn recommend(&self, req: RecommendRequest) -> Result<RecommendResponse> {
		let top_k = self.resolve_top_k(req.top_k)?;
		let recommendation = self.build_recommendation(&req.profile, req.weights).await?;
		let (session_id, recommendation) = self.sessions.insert(recommendation).await;

		tracing::info!(
			%session_id,
			status = ?recommendation.status,
			total = recommendation.items.len(),
			"Recommendation completed."
		);

		Ok(RecommendResponse::slice(session_id, &recommendation, top_k))
	}

	/// Re-slices a stored recommendation without recomputing it.
	pub async fn session(&self, session_id: Uuid, top_k: Option<u32>) -> Result<RecommendResponse> {
		let top_k = self.resolve_top_k(top_k)?;
		let recommendation = self.sessions.get(&session_id).await.ok_or_else(|| Error::NotFound {
			message: format!("Recommendation session {session_id} does not exist."),
		})?;

		Ok(RecommendResponse::slice(session_id, &recommendation, top_k))
	}

	/// Stage 1 followed by Stage 2, falling back to the Stage 1 order when routing is down.
	pub async fn build_recommendation(
		&self,
		profile: &UserProfile,
		weights: Option<ScoreWeights>,
	) -> Result<Recommendation> {
		let missing = profile.missing_attributes();

		if !missing.is_empty() {
			return Err(Error::IncompleteProfile {
				missing: missing.into_iter().map(str::to_string).collect(),
			});
		}

		let weights = match weights {
			Some(weights) => {
				gilmat_config::validate_weights("weights", &weights)?;

				weights
			},
			None => self.cfg.scoring.weights,
		};
		let summary = self.summarize(profile).await;
		let filter = FilterMetadata::from_profile(profile);
		let retrieved = self.retrieve(&summary, &filter, self.cfg.retrieval.candidate_k).await;

		if retrieved.is_empty() {
			tracing::info!("No candidates retrieved.");

			return Ok(Recommendation::empty(summary));
		}

		let requested = retrieved.len();
		let candidates = self.lookup_candidates(retrieved);

		if candidates.is_empty() {
			return Err(Error::CandidatesUnavailable { requested });
		}

		let origin = self.data.resolve_origin(profile.start_location.as_deref());
		let accepted = price::accepted_price_tiers(profile.budget.as_deref());
		let records = candidates.iter().map(|(_, record)| record.clone()).collect();

		match self.score_candidates(records, &origin, &accepted, &weights).await {
			Ok(scored) => Ok(Recommendation {
				status: RecommendationStatus::Ranked,
				notice: None,
				summary,
				items: scored.into_iter().map(RecommendationItem::Scored).collect(),
			}),
			Err(Error::RoutingServiceDown { failed, total }) => {
				tracing::warn!(failed, total, "Routing service is down, using Stage 1 order.");

				Ok(Recommendation {
					status: RecommendationStatus::Fallback,
					notice: Some(NoticeCode::TravelFrictionUnavailable.into()),
					summary,
					items: candidates
						.into_iter()
						.map(|(item, restaurant)| {
							RecommendationItem::Retrieved(RetrievedCandidate {
								restaurant,
								distance: item.distance,
								filter_score: item.filter_score,
							})
						})
						.collect(),
				})
			},
			Err(err) => Err(err),
		}
	}

	fn resolve_top_k(&self, top_k: Option<u32>) -> Result<u32> {
		match top_k {
			Some(0) => Err(Error::InvalidRequest {
				message: "top_k must be greater than zero.".to_string(),
			}),
			Some(top_k) => Ok(top_k),
			None => Ok(self.cfg.service.default_top_k),
		}
	}

	fn lookup_candidates(
		&self,
		retrieved: Vec<RetrievalItem>,
	) -> Vec<(RetrievalItem, RestaurantRecord)> {
		let mut candidates = Vec::with_capacity(retrieved.len());

		for item in retrieved {
			match self.data.catalog.get(&item.id) {
				Some(record) => candidates.push((item, record.clone())),
				None => {
					tracing::warn!(
						restaurant_id = %item.id,
						"Retrieved restaurant is not in the catalog."
					);
				},
			}
		}

		candidates
	}

	async fn summarize(&self, profile: &UserProfile) -> String {
		let cfg = &self.cfg.providers.llm;
		let profile_json = match serde_json::to_string_pretty(profile) {
			Ok(json) => json,
			Err(err) => {
				tracing::warn!(error = %err, "Failed to serialize profile for summary.");

				return profile.describe();
			},
		};
		let messages = [
			serde_json::json!({ "role": "system", "content": SUMMARY_SYSTEM_PROMPT }),
			serde_json::json!({ "role": "user", "content": profile_json }),
		];

		match self.providers.llm.complete(cfg, &messages, cfg.temperature).await {
			Ok(summary) => summary,
			Err(err) => {
				tracing::warn!(error = %err, "Profile summary failed, using plain description.");

				profile.describe()
			},
		}
	}
}
