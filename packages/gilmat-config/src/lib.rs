mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Catalog, Config, EmbeddingProviderConfig, FilterPoints, LlmProviderConfig, Locations,
	Providers, Qdrant, Retrieval, RoutingProviderConfig, ScoreWeights, Scoring, Service, Storage,
};

use std::{fs, path::Path};

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.max_sessions == 0 {
		return Err(Error::Validation {
			message: "service.max_sessions must be greater than zero.".to_string(),
		});
	}
	if cfg.service.default_top_k == 0 {
		return Err(Error::Validation {
			message: "service.default_top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.collection must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.id_field.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.id_field must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}

	for (label, key) in
		[("embedding", &cfg.providers.embedding.api_key), ("llm", &cfg.providers.llm.api_key)]
	{
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}
	for (label, timeout_ms) in [
		("providers.embedding.timeout_ms", cfg.providers.embedding.timeout_ms),
		("providers.llm.timeout_ms", cfg.providers.llm.timeout_ms),
		("providers.routing.timeout_ms", cfg.providers.routing.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	validate_routing(&cfg.providers.routing)?;

	if cfg.retrieval.candidate_k == 0 {
		return Err(Error::Validation {
			message: "retrieval.candidate_k must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.image_field.trim().is_empty() {
		return Err(Error::Validation {
			message: "retrieval.image_field must be non-empty.".to_string(),
		});
	}
	if cfg.retrieval.no_image_marker.is_empty() {
		return Err(Error::Validation {
			message: "retrieval.no_image_marker must be non-empty.".to_string(),
		});
	}
	if cfg.retrieval.rewrite_fallback_chars == 0 {
		return Err(Error::Validation {
			message: "retrieval.rewrite_fallback_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.scoring.max_concurrent_routes == 0 {
		return Err(Error::Validation {
			message: "scoring.max_concurrent_routes must be greater than zero.".to_string(),
		});
	}

	validate_weights("scoring.weights", &cfg.scoring.weights)?;

	if lat_lon(&cfg.locations.default_origin).is_none() {
		return Err(Error::InvalidCoordinates {
			label: "locations.default_origin".to_string(),
			value: cfg.locations.default_origin.clone(),
		});
	}

	for (name, raw) in &cfg.locations.named {
		if name.trim().is_empty() {
			return Err(Error::Validation {
				message: "locations.named keys must be non-empty.".to_string(),
			});
		}
		if lat_lon(raw).is_none() {
			return Err(Error::InvalidCoordinates {
				label: format!("locations.named.{name}"),
				value: raw.clone(),
			});
		}
	}

	Ok(())
}

/// Checks a final-score weight vector. Used for the configured defaults and request overrides.
pub fn validate_weights(label: &str, weights: &ScoreWeights) -> Result<()> {
	let components = [
		("travel", weights.travel),
		("friendliness", weights.friendliness),
		("quality", weights.quality),
		("price", weights.price),
	];

	for (name, weight) in components {
		if !weight.is_finite() {
			return Err(Error::Validation {
				message: format!("{label}.{name} must be a finite number."),
			});
		}
		if weight < 0.0 {
			return Err(Error::Validation {
				message: format!("{label}.{name} must be zero or greater."),
			});
		}
	}

	if components.iter().all(|(_, weight)| *weight == 0.0) {
		return Err(Error::Validation {
			message: format!("{label} must contain at least one positive weight."),
		});
	}

	Ok(())
}

fn validate_routing(routing: &RoutingProviderConfig) -> Result<()> {
	if routing.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.routing.api_base must be non-empty.".to_string(),
		});
	}
	if !routing.path.starts_with('/') || !routing.health_path.starts_with('/') {
		return Err(Error::Validation {
			message: "providers.routing.path and health_path must start with '/'.".to_string(),
		});
	}
	if routing.profile.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.routing.profile must be non-empty.".to_string(),
		});
	}
	if OffsetDateTime::parse(&routing.earliest_departure_time, &Rfc3339).is_err() {
		return Err(Error::Validation {
			message: "providers.routing.earliest_departure_time must be an RFC 3339 timestamp."
				.to_string(),
		});
	}
	if routing.max_paths == 0 {
		return Err(Error::Validation {
			message: "providers.routing.max_paths must be greater than zero.".to_string(),
		});
	}
	if routing.health_probe_attempts == 0 {
		return Err(Error::Validation {
			message: "providers.routing.health_probe_attempts must be greater than zero."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.providers.routing.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.providers.routing.api_key = None;
	}

	for api_base in [
		&mut cfg.providers.embedding.api_base,
		&mut cfg.providers.llm.api_base,
		&mut cfg.providers.routing.api_base,
	] {
		let trimmed = api_base.trim().trim_end_matches('/').to_string();

		*api_base = trimmed;
	}

	cfg.locations.named = std::mem::take(&mut cfg.locations.named)
		.into_iter()
		.map(|(name, raw)| (name.trim().to_string(), raw))
		.collect();
}

/// Shape check only: two finite numbers separated by a comma. Range checks belong to
/// `gilmat_domain::Coordinates`, which the service applies when it builds its location table.
fn lat_lon(raw: &str) -> Option<(f64, f64)> {
	let (lat, lon) = raw.split_once(',')?;
	let lat: f64 = lat.trim().parse().ok()?;
	let lon: f64 = lon.trim().parse().ok()?;

	(lat.is_finite() && lon.is_finite()).then_some((lat, lon))
}
