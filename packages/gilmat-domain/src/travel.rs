//! Travel friction scoring for one origin-destination itinerary.

use serde::{Deserialize, Serialize};

const TIME_BEST_MIN: f64 = 20.0;
const TIME_WORST_MIN: f64 = 50.0;
const WALK_BEST_M: f64 = 500.0;
const WALK_WORST_M: f64 = 1_200.0;
const ONE_TRANSFER_SCORE: f64 = 0.4;

const TIME_WEIGHT: f64 = 0.2;
const WALK_WEIGHT: f64 = 0.4;
const TRANSFER_WEIGHT: f64 = 0.4;

/// One itinerary offered by the routing service. Absent fields deserialize as zero.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ItineraryOption {
	/// Total duration in milliseconds.
	#[serde(default, rename = "time")]
	pub time_ms: f64,
	#[serde(default)]
	pub transfers: u32,
	/// Walking distance in meters.
	#[serde(default, rename = "distance")]
	pub walk_meters: f64,
}

/// Desirability of an itinerary in `[0, 1]`, 1.0 being the least friction.
pub fn travel_friction_score(option: &ItineraryOption) -> f64 {
	let minutes = non_negative(option.time_ms) / 60_000.0;
	let time = descending_ramp(minutes, TIME_BEST_MIN, TIME_WORST_MIN);
	let walk = descending_ramp(non_negative(option.walk_meters), WALK_BEST_M, WALK_WORST_M);
	let transfers = match option.transfers {
		0 => 1.0,
		1 => ONE_TRANSFER_SCORE,
		_ => 0.0,
	};
	let score = time * TIME_WEIGHT + walk * WALK_WEIGHT + transfers * TRANSFER_WEIGHT;

	score.clamp(0.0, 1.0)
}

/// Best friction score across the offered itineraries. No itinerary scores 0.0.
pub fn best_travel_score(options: &[ItineraryOption]) -> f64 {
	options.iter().map(travel_friction_score).fold(0.0, f64::max)
}

fn non_negative(value: f64) -> f64 {
	if value.is_nan() || value < 0.0 { 0.0 } else { value }
}

fn descending_ramp(value: f64, best: f64, worst: f64) -> f64 {
	if value <= best {
		1.0
	} else if value >= worst {
		0.0
	} else {
		1.0 - (value - best) / (worst - best)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ramp_is_linear_between_bounds() {
		assert_eq!(descending_ramp(35.0, 20.0, 50.0), 0.5);
		assert_eq!(descending_ramp(20.0, 20.0, 50.0), 1.0);
		assert_eq!(descending_ramp(50.0, 20.0, 50.0), 0.0);
	}

	#[test]
	fn missing_and_negative_inputs_count_as_zero() {
		assert_eq!(non_negative(f64::NAN), 0.0);
		assert_eq!(non_negative(-3.0), 0.0);
		assert_eq!(descending_ramp(non_negative(f64::INFINITY), 20.0, 50.0), 0.0);
	}
}
