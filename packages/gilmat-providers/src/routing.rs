//! Client for a GraphHopper-compatible public transit routing service.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use gilmat_config::RoutingProviderConfig;
use gilmat_domain::{Coordinates, ItineraryOption, travel};

use crate::{Error, Result};

#[derive(Debug, Default, Deserialize)]
pub struct RouteResponse {
	#[serde(default)]
	pub paths: Option<Vec<ItineraryOption>>,
}
impl RouteResponse {
	pub fn options(&self) -> &[ItineraryOption] {
		self.paths.as_deref().unwrap_or_default()
	}
}

/// Best travel friction score among the itineraries offered between two points.
///
/// Exactly one GET is issued and nothing is retried. A well-formed response without itineraries
/// scores 0.0; transport errors, non-2xx statuses and malformed bodies fail the call.
pub async fn best_travel_score(
	client: &Client,
	cfg: &RoutingProviderConfig,
	origin: &Coordinates,
	destination: &Coordinates,
) -> Result<f64> {
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let res = client
		.get(url)
		.timeout(Duration::from_millis(cfg.timeout_ms))
		.query(&route_query(cfg, origin, destination))
		.send()
		.await
		.map_err(request_failed)?;
	let body = res.error_for_status().map_err(request_failed)?.bytes().await.map_err(request_failed)?;
	let route = parse_route_response(&body)?;

	Ok(travel::best_travel_score(route.options()))
}

/// Liveness probe against the routing service's info endpoint.
pub async fn check_health(client: &Client, cfg: &RoutingProviderConfig) -> Result<()> {
	let url = format!("{}{}", cfg.api_base, cfg.health_path);

	client
		.get(url)
		.timeout(Duration::from_millis(cfg.timeout_ms))
		.send()
		.await
		.map_err(request_failed)?
		.error_for_status()
		.map_err(request_failed)?;

	Ok(())
}

fn route_query(
	cfg: &RoutingProviderConfig,
	origin: &Coordinates,
	destination: &Coordinates,
) -> Vec<(&'static str, String)> {
	let mut query = vec![
		("point", origin.to_string()),
		("point", destination.to_string()),
		("profile", cfg.profile.clone()),
		("pt.earliest_departure_time", cfg.earliest_departure_time.clone()),
		("algorithm", "alternative_route".to_string()),
		("alternative_route.max_paths", cfg.max_paths.to_string()),
	];

	if let Some(key) = cfg.api_key.as_ref() {
		query.push(("key", key.clone()));
	}

	query
}

fn parse_route_response(body: &[u8]) -> Result<RouteResponse> {
	serde_json::from_slice(body).map_err(|err| Error::RoutingRequestFailed {
		message: format!("Malformed routing response: {err}"),
	})
}

fn request_failed(err: reqwest::Error) -> Error {
	Error::RoutingRequestFailed { message: err.to_string() }
}
