//! Restaurant catalog loaded once at startup and read-only afterwards.

use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

use gilmat_domain::{Coordinates, PriceTier, RestaurantRecord};

use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct CatalogEntry {
	id: String,
	name: String,
	#[serde(default)]
	address: Option<String>,
	#[serde(default)]
	category: Option<String>,
	#[serde(default)]
	image_url: Option<String>,
	#[serde(default)]
	lat: Option<f64>,
	#[serde(default)]
	lon: Option<f64>,
	#[serde(default)]
	price_tier: Option<String>,
	#[serde(default)]
	quality: Option<f64>,
	#[serde(default)]
	friendliness: Option<f64>,
}

pub fn load_catalog(path: &Path) -> Result<HashMap<String, RestaurantRecord>> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadCatalog { path: path.to_path_buf(), source: err })?;

	parse_catalog(&raw).map_err(|err| Error::ParseCatalog { path: path.to_path_buf(), source: err })
}

/// Builds the ID-keyed catalog. Entries with unusable coordinates or price tags are kept with
/// those fields cleared; blank and duplicate IDs are skipped.
pub fn parse_catalog(raw: &str) -> serde_json::Result<HashMap<String, RestaurantRecord>> {
	let entries: Vec<CatalogEntry> = serde_json::from_str(raw)?;
	let mut catalog = HashMap::with_capacity(entries.len());

	for entry in entries {
		let id = entry.id.trim().to_string();

		if id.is_empty() {
			tracing::warn!(name = %entry.name, "Skipping catalog entry without an ID.");

			continue;
		}
		if catalog.contains_key(&id) {
			tracing::warn!(restaurant_id = %id, "Skipping duplicate catalog entry.");

			continue;
		}

		let record = into_record(id.clone(), entry);

		catalog.insert(id, record);
	}

	Ok(catalog)
}

fn into_record(id: String, entry: CatalogEntry) -> RestaurantRecord {
	let coordinates = match (entry.lat, entry.lon) {
		(Some(lat), Some(lon)) => match Coordinates::new(lat, lon) {
			Ok(coordinates) => Some(coordinates),
			Err(err) => {
				tracing::warn!(restaurant_id = %id, error = %err, "Dropping invalid coordinates.");

				None
			},
		},
		_ => None,
	};
	let price_tier = entry.price_tier.as_deref().filter(|raw| !raw.trim().is_empty()).and_then(
		|raw| match raw.parse::<PriceTier>() {
			Ok(tier) => Some(tier),
			Err(err) => {
				tracing::warn!(restaurant_id = %id, error = %err, "Dropping unknown price tier.");

				None
			},
		},
	);

	RestaurantRecord {
		id,
		name: entry.name,
		address: entry.address,
		category: entry.category,
		image_url: entry.image_url,
		coordinates,
		price_tier,
		quality: unit_score(entry.quality),
		friendliness: unit_score(entry.friendliness),
	}
}

fn unit_score(value: Option<f64>) -> f64 {
	value.filter(|value| value.is_finite()).map(|value| value.clamp(0.0, 1.0)).unwrap_or(0.0)
}
