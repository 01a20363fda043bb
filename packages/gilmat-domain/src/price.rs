use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum PriceTier {
	#[serde(rename = "$")]
	Low,
	#[serde(rename = "$$")]
	Mid,
	#[serde(rename = "$$$")]
	High,
	#[serde(rename = "$$$$")]
	Premium,
}
impl PriceTier {
	pub const ALL: [Self; 4] = [Self::Low, Self::Mid, Self::High, Self::Premium];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Low => "$",
			Self::Mid => "$$",
			Self::High => "$$$",
			Self::Premium => "$$$$",
		}
	}
}

impl FromStr for PriceTier {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.trim() {
			"$" => Ok(Self::Low),
			"$$" => Ok(Self::Mid),
			"$$$" => Ok(Self::High),
			"$$$$" => Ok(Self::Premium),
			other => Err(Error::InvalidPriceTier { value: other.to_string() }),
		}
	}
}

impl fmt::Display for PriceTier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Maps a profile budget answer to the price tiers a candidate may carry to earn the price match.
///
/// `저`/`중`/`고` (low/mid/high) select overlapping pairs; anything else accepts every tier.
pub fn accepted_price_tiers(budget: Option<&str>) -> Vec<PriceTier> {
	match budget.map(str::trim) {
		Some("저") => vec![PriceTier::Low, PriceTier::Mid],
		Some("중") => vec![PriceTier::Mid, PriceTier::High],
		Some("고") => vec![PriceTier::High, PriceTier::Premium],
		_ => PriceTier::ALL.to_vec(),
	}
}

/// 1.0 when the tier is present and accepted. A missing tier or an empty accepted set yields 0.0.
pub fn price_match_score(tier: Option<PriceTier>, accepted: &[PriceTier]) -> f64 {
	match tier {
		Some(tier) if accepted.contains(&tier) => 1.0,
		_ => 0.0,
	}
}
