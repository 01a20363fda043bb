//! Profile-to-metadata mapping for candidate retrieval.
//!
//! The vector index stores restaurant metadata as flat strings. Boolean flags are serialised as
//! `"True"`/`"False"` and multi-value fields as comma separated lists.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use gilmat_config::FilterPoints;

use crate::UserProfile;

/// Placeholder for an unanswered profile attribute.
pub const NOT_AVAILABLE: &str = "N/A";

pub const BUDGET_RANGE: &str = "budget_range";
pub const SPICY_AVAILABLE: &str = "spicy_available";
pub const VEGETARIAN_OPTIONS: &str = "vegetarian_options";
pub const MAIN_INGREDIENTS_LIST: &str = "main_ingredients_list";
pub const SUITABLE_FOR: &str = "suitable_for";
pub const HIGH_LEVEL_CATEGORY: &str = "high_level_category";

/// Exact-match conditions applied by the index before ranking. All must hold.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MetadataFilter {
	pub must: Vec<(String, String)>,
}
impl MetadataFilter {
	pub fn is_empty(&self) -> bool {
		self.must.is_empty()
	}
}

/// The six profile attributes that map onto indexed restaurant metadata.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FilterMetadata {
	pub budget_range: String,
	pub spicy_available: String,
	pub vegetarian_options: String,
	pub main_ingredients_list: String,
	pub suitable_for: String,
	pub food_category: String,
}
impl FilterMetadata {
	pub fn from_profile(profile: &UserProfile) -> Self {
		let field =
			|value: &Option<String>| value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

		Self {
			budget_range: field(&profile.budget),
			spicy_available: field(&profile.spicy_ok),
			vegetarian_options: field(&profile.is_vegetarian),
			main_ingredients_list: field(&profile.like_ingredients),
			suitable_for: field(&profile.travel_type),
			food_category: field(&profile.food_category),
		}
	}

	/// Pre-filter for the index query. `None` when no indexed attribute was answered.
	pub fn pre_filter(&self) -> Option<MetadataFilter> {
		let must: Vec<(String, String)> = self
			.indexed_values()
			.into_iter()
			.filter_map(|(key, value)| value.map(|value| (key.to_string(), value)))
			.collect();

		if must.is_empty() { None } else { Some(MetadataFilter { must }) }
	}

	/// Heuristic agreement between this filter and one candidate's metadata.
	///
	/// Every answered indexed attribute that equals the candidate's value earns its configured
	/// points. `suitable_for` earns its bonus only when every requested term appears in the
	/// candidate's list, while `main_ingredients_list` earns it when any term does.
	pub fn filter_score(&self, metadata: &HashMap<String, String>, points: &FilterPoints) -> u32 {
		let mut score = 0;

		for (key, value) in self.indexed_values() {
			let Some(value) = value else {
				continue;
			};

			if metadata.get(key).map(String::as_str) == Some(value.as_str()) {
				score += match key {
					HIGH_LEVEL_CATEGORY => points.category,
					BUDGET_RANGE => points.budget,
					SPICY_AVAILABLE => points.spicy,
					_ => points.vegetarian,
				};
			}
		}

		let suitable_for = split_terms(&self.suitable_for);

		if !suitable_for.is_empty() {
			let haystack = metadata.get(SUITABLE_FOR).map(String::as_str).unwrap_or_default();

			if suitable_for.iter().all(|term| haystack.contains(term)) {
				score += points.suitable_for;
			}
		}

		let ingredients = split_terms(&self.main_ingredients_list);

		if !ingredients.is_empty() {
			let haystack =
				metadata.get(MAIN_INGREDIENTS_LIST).map(String::as_str).unwrap_or_default();

			if ingredients.iter().any(|term| haystack.contains(term)) {
				score += points.ingredients;
			}
		}

		score
	}

	fn indexed_values(&self) -> [(&'static str, Option<String>); 4] {
		[
			(BUDGET_RANGE, answered(&self.budget_range).map(str::to_string)),
			(SPICY_AVAILABLE, answered(&self.spicy_available).map(flag_value)),
			(VEGETARIAN_OPTIONS, answered(&self.vegetarian_options).map(flag_value)),
			(HIGH_LEVEL_CATEGORY, answered(&self.food_category).map(str::to_string)),
		]
	}
}

fn answered(value: &str) -> Option<&str> {
	let trimmed = value.trim();

	if trimmed.is_empty() || trimmed == NOT_AVAILABLE { None } else { Some(trimmed) }
}

/// `O`/`X` answers are stored in the index as `"True"`/`"False"`.
fn flag_value(value: &str) -> String {
	match value {
		"O" => "True".to_string(),
		"X" => "False".to_string(),
		other => other.to_string(),
	}
}

fn split_terms(value: &str) -> Vec<&str> {
	let Some(value) = answered(value) else {
		return Vec::new();
	};

	value.split(',').map(str::trim).filter(|term| !term.is_empty()).collect()
}
