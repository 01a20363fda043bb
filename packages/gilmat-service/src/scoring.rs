//! Stage 2: travel-aware final scoring.

use futures::{StreamExt, stream};
use serde::Serialize;

use gilmat_config::ScoreWeights;
use gilmat_domain::{ComponentScores, Coordinates, PriceTier, RestaurantRecord, price};

use crate::{Error, GilmatService, Result};

/// Per-candidate result of the routing fan-out.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TravelOutcome {
	Scored { score: f64 },
	/// The routing call failed or the candidate could not be routed at all.
	Failed { reason: String },
}
impl TravelOutcome {
	pub fn score(&self) -> f64 {
		match self {
			Self::Scored { score } => *score,
			Self::Failed { .. } => 0.0,
		}
	}

	pub fn is_failure(&self) -> bool {
		matches!(self, Self::Failed { .. })
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredCandidate {
	#[serde(flatten)]
	pub restaurant: RestaurantRecord,
	pub score_travel: f64,
	pub score_friendliness: f64,
	pub score_quality: f64,
	pub score_price: f64,
	pub final_score: f64,
	pub travel: TravelOutcome,
}

impl GilmatService {
	/// Scores candidates and orders them by final score, highest first.
	///
	/// Routing calls run concurrently, at most `scoring.max_concurrent_routes` at a time, and
	/// finish in any order. Outcomes are restored to input order before sorting, so ties keep
	/// their input order. Fails with [`Error::RoutingServiceDown`] when the outcomes indicate the
	/// routing service itself is unreachable.
	pub async fn score_candidates(
		&self,
		candidates: Vec<RestaurantRecord>,
		origin: &Coordinates,
		accepted_price_tiers: &[PriceTier],
		weights: &ScoreWeights,
	) -> Result<Vec<ScoredCandidate>> {
		let outcomes = self.route_all(&candidates, origin).await;

		if is_total_outage(&outcomes) {
			let failed = outcomes.iter().filter(|outcome| outcome.is_failure()).count();

			return Err(Error::RoutingServiceDown { failed, total: outcomes.len() });
		}

		let mut scored: Vec<ScoredCandidate> = candidates
			.into_iter()
			.zip(outcomes)
			.map(|(restaurant, travel)| {
				score_candidate(restaurant, travel, accepted_price_tiers, weights)
			})
			.collect();

		scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

		Ok(scored)
	}

	async fn route_all(
		&self,
		candidates: &[RestaurantRecord],
		origin: &Coordinates,
	) -> Vec<TravelOutcome> {
		let limit = self.cfg.scoring.max_concurrent_routes.max(1);
		let routes: Vec<_> = candidates
			.iter()
			.enumerate()
			.map(|(index, restaurant)| async move {
				(index, self.route_one(restaurant, origin).await)
			})
			.collect();
		let mut outcomes: Vec<(usize, TravelOutcome)> = stream::iter(routes)
			.buffer_unordered(limit)
			.collect()
			.await;

		outcomes.sort_unstable_by_key(|(index, _)| *index);

		outcomes.into_iter().map(|(_, outcome)| outcome).collect()
	}

	async fn route_one(&self, restaurant: &RestaurantRecord, origin: &Coordinates) -> TravelOutcome {
		let Some(destination) = restaurant.coordinates.as_ref() else {
			tracing::warn!(restaurant_id = %restaurant.id, "Candidate has no coordinates.");

			return TravelOutcome::Failed { reason: "Candidate has no coordinates.".to_string() };
		};

		match self
			.providers
			.routing
			.best_travel_score(&self.cfg.providers.routing, origin, destination)
			.await
		{
			Ok(score) if score.is_finite() => TravelOutcome::Scored { score: score.clamp(0.0, 1.0) },
			Ok(score) => TravelOutcome::Failed { reason: format!("Non-finite travel score {score}.") },
			Err(err) => {
				tracing::warn!(
					restaurant_id = %restaurant.id,
					error = %err,
					"Routing request failed."
				);

				TravelOutcome::Failed { reason: err.to_string() }
			},
		}
	}
}

/// Every candidate scored exactly zero and at least one routing call failed.
pub fn is_total_outage(outcomes: &[TravelOutcome]) -> bool {
	!outcomes.is_empty()
		&& outcomes.iter().any(TravelOutcome::is_failure)
		&& outcomes.iter().all(|outcome| outcome.score() == 0.0)
}

fn score_candidate(
	restaurant: RestaurantRecord,
	travel: TravelOutcome,
	accepted_price_tiers: &[PriceTier],
	weights: &ScoreWeights,
) -> ScoredCandidate {
	let components = ComponentScores {
		travel: travel.score(),
		friendliness: restaurant.friendliness,
		quality: restaurant.quality,
		price: price::price_match_score(restaurant.price_tier, accepted_price_tiers),
	};

	ScoredCandidate {
		score_travel: components.travel,
		score_friendliness: components.friendliness,
		score_quality: components.quality,
		score_price: components.price,
		final_score: components.weighted(weights),
		travel,
		restaurant,
	}
}
