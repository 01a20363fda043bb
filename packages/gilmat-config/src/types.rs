use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub retrieval: Retrieval,
	pub scoring: Scoring,
	pub locations: Locations,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Number of recommendation sessions retained for Top-K re-slicing.
	#[serde(default = "default_max_sessions")]
	pub max_sessions: u32,
	#[serde(default = "default_top_k")]
	pub default_top_k: u32,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
	pub catalog: Catalog,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
	/// Payload field holding the restaurant ID of a point.
	#[serde(default = "default_id_field")]
	pub id_field: String,
}

#[derive(Debug, Deserialize)]
pub struct Catalog {
	/// JSON array of restaurant records loaded once at startup.
	pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm: LlmProviderConfig,
	pub routing: RoutingProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	/// Sampling temperature for the profile summary.
	pub temperature: f32,
	/// Sampling temperature for the retrieval query rewrite.
	#[serde(default = "default_rewrite_temperature")]
	pub rewrite_temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct RoutingProviderConfig {
	pub api_base: String,
	#[serde(default = "default_routing_path")]
	pub path: String,
	#[serde(default = "default_routing_health_path")]
	pub health_path: String,
	#[serde(default = "default_routing_profile")]
	pub profile: String,
	/// RFC 3339 timestamp used as the public transit departure time.
	pub earliest_departure_time: String,
	#[serde(default = "default_max_paths")]
	pub max_paths: u32,
	pub timeout_ms: u64,
	pub api_key: Option<String>,
	#[serde(default = "default_health_probe_attempts")]
	pub health_probe_attempts: u32,
	#[serde(default = "default_health_probe_interval_ms")]
	pub health_probe_interval_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Retrieval {
	pub candidate_k: u32,
	#[serde(default = "default_image_field")]
	pub image_field: String,
	#[serde(default = "default_no_image_marker")]
	pub no_image_marker: String,
	#[serde(default = "default_rewrite_fallback_chars")]
	pub rewrite_fallback_chars: usize,
	#[serde(default)]
	pub points: FilterPoints,
}

/// Points awarded per metadata field that matches the user's filter value.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterPoints {
	pub category: u32,
	pub budget: u32,
	pub spicy: u32,
	pub vegetarian: u32,
	pub suitable_for: u32,
	pub ingredients: u32,
}
impl Default for FilterPoints {
	fn default() -> Self {
		Self { category: 3, budget: 2, spicy: 2, vegetarian: 2, suitable_for: 1, ingredients: 1 }
	}
}

#[derive(Debug, Deserialize)]
pub struct Scoring {
	#[serde(default = "default_max_concurrent_routes")]
	pub max_concurrent_routes: usize,
	#[serde(default)]
	pub weights: ScoreWeights,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ScoreWeights {
	pub travel: f64,
	pub friendliness: f64,
	pub quality: f64,
	pub price: f64,
}
impl Default for ScoreWeights {
	fn default() -> Self {
		Self { travel: 0.4, friendliness: 0.3, quality: 0.2, price: 0.1 }
	}
}

#[derive(Debug, Deserialize)]
pub struct Locations {
	/// Origin used when the profile's start location cannot be resolved.
	pub default_origin: String,
	/// Landmark name to "lat,lon".
	#[serde(default)]
	pub named: BTreeMap<String, String>,
}

fn default_max_sessions() -> u32 {
	1_024
}

fn default_top_k() -> u32 {
	10
}

fn default_id_field() -> String {
	"restaurant_id".to_string()
}

fn default_rewrite_temperature() -> f32 {
	0.2
}

fn default_routing_path() -> String {
	"/route".to_string()
}

fn default_routing_health_path() -> String {
	"/info".to_string()
}

fn default_routing_profile() -> String {
	"pt".to_string()
}

fn default_max_paths() -> u32 {
	3
}

fn default_health_probe_attempts() -> u32 {
	12
}

fn default_health_probe_interval_ms() -> u64 {
	10_000
}

fn default_image_field() -> String {
	"image_url".to_string()
}

fn default_no_image_marker() -> String {
	"no_image".to_string()
}

fn default_rewrite_fallback_chars() -> usize {
	150
}

fn default_max_concurrent_routes() -> usize {
	32
}
