use serde::{Deserialize, Serialize};

use gilmat_config::ScoreWeights;

use crate::{Coordinates, PriceTier};

/// One catalog entry. The same record flows through retrieval, scoring and presentation.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RestaurantRecord {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub address: Option<String>,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default)]
	pub image_url: Option<String>,
	#[serde(default)]
	pub coordinates: Option<Coordinates>,
	#[serde(default)]
	pub price_tier: Option<PriceTier>,
	/// Offline review-quality aggregate in `[0, 1]`.
	#[serde(default)]
	pub quality: f64,
	/// Offline foreigner-friendliness aggregate in `[0, 1]`.
	#[serde(default)]
	pub friendliness: f64,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ComponentScores {
	pub travel: f64,
	pub friendliness: f64,
	pub quality: f64,
	pub price: f64,
}
impl ComponentScores {
	pub fn weighted(&self, weights: &ScoreWeights) -> f64 {
		self.travel * weights.travel
			+ self.friendliness * weights.friendliness
			+ self.quality * weights.quality
			+ self.price * weights.price
	}
}
