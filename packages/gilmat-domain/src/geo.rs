use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// A WGS84 point. Rendered and parsed as `"lat,lon"`, the form the routing service expects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
	pub lat: f64,
	pub lon: f64,
}
impl Coordinates {
	pub fn new(lat: f64, lon: f64) -> Result<Self> {
		if !lat.is_finite() || !lon.is_finite() {
			return Err(Error::InvalidCoordinates {
				value: format!("{lat},{lon}"),
				reason: "values must be finite",
			});
		}
		if !(-90.0..=90.0).contains(&lat) {
			return Err(Error::InvalidCoordinates {
				value: format!("{lat},{lon}"),
				reason: "latitude must be within -90..=90",
			});
		}
		if !(-180.0..=180.0).contains(&lon) {
			return Err(Error::InvalidCoordinates {
				value: format!("{lat},{lon}"),
				reason: "longitude must be within -180..=180",
			});
		}

		Ok(Self { lat, lon })
	}
}

impl FromStr for Coordinates {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		let Some((lat, lon)) = raw.split_once(',') else {
			return Err(Error::InvalidCoordinates {
				value: raw.to_string(),
				reason: "expected a \"lat,lon\" pair",
			});
		};
		let parse = |part: &str| {
			part.trim().parse::<f64>().map_err(|_| Error::InvalidCoordinates {
				value: raw.to_string(),
				reason: "components must be numeric",
			})
		};

		Self::new(parse(lat)?, parse(lon)?)
	}
}

impl fmt::Display for Coordinates {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{},{}", self.lat, self.lon)
	}
}

impl Serialize for Coordinates {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Coordinates {
	fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		raw.parse().map_err(serde::de::Error::custom)
	}
}
