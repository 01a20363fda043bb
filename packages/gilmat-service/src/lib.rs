pub mod recommend;
pub mod retrieval;
pub mod scoring;
pub mod sessions;

mod error;

pub use error::{Error, Result};
pub use recommend::{
	Notice, NoticeCode, RecommendRequest, RecommendResponse, Recommendation, RecommendationItem,
	RecommendationStatus, RetrievedCandidate,
};
pub use retrieval::RetrievalItem;
pub use scoring::{ScoredCandidate, TravelOutcome};

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc, time::Duration};

use reqwest::Client;
use serde_json::Value;

use gilmat_config::{Config, EmbeddingProviderConfig, LlmProviderConfig, RoutingProviderConfig};
use gilmat_domain::{Coordinates, MetadataFilter, RestaurantRecord};
use gilmat_providers::{embedding, llm, routing};
use gilmat_storage::qdrant::{IndexHit, QdrantStore};

use crate::sessions::SessionStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Nearest-neighbour search over restaurant descriptions.
pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn query<'a>(
		&'a self,
		text: &'a str,
		top_n: u32,
		filter: Option<&'a MetadataFilter>,
	) -> BoxFuture<'a, Result<Vec<IndexHit>>>;
}

pub trait RoutingProvider
where
	Self: Send + Sync,
{
	fn best_travel_score<'a>(
		&'a self,
		cfg: &'a RoutingProviderConfig,
		origin: &'a Coordinates,
		destination: &'a Coordinates,
	) -> BoxFuture<'a, Result<f64>>;

	fn check_health<'a>(&'a self, cfg: &'a RoutingProviderConfig) -> BoxFuture<'a, Result<()>>;
}

pub trait LanguageModel
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
		temperature: f32,
	) -> BoxFuture<'a, Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub routing: Arc<dyn RoutingProvider>,
	pub llm: Arc<dyn LanguageModel>,
}
impl Providers {
	pub fn new(routing: Arc<dyn RoutingProvider>, llm: Arc<dyn LanguageModel>) -> Self {
		Self { routing, llm }
	}

	/// HTTP-backed providers sharing one connection pool.
	pub fn http() -> Result<Self> {
		let provider = Arc::new(DefaultProviders { client: http_client()? });

		Ok(Self { routing: provider.clone(), llm: provider })
	}
}

/// Immutable lookup tables built once at startup and shared by every request.
#[derive(Debug)]
pub struct DataContext {
	pub catalog: HashMap<String, RestaurantRecord>,
	pub locations: HashMap<String, Coordinates>,
	pub default_origin: Coordinates,
}
impl DataContext {
	pub fn new(
		catalog: HashMap<String, RestaurantRecord>,
		locations: &gilmat_config::Locations,
	) -> Result<Self> {
		let default_origin = locations.default_origin.parse().map_err(|err| {
			Error::InvalidConfig { message: format!("locations.default_origin: {err}") }
		})?;
		let mut named = HashMap::with_capacity(locations.named.len());

		for (name, raw) in &locations.named {
			let coordinates = raw.parse().map_err(|err| Error::InvalidConfig {
				message: format!("locations.named.{name}: {err}"),
			})?;

			named.insert(name.clone(), coordinates);
		}

		Ok(Self { catalog, locations: named, default_origin })
	}

	pub fn load(cfg: &Config) -> Result<Self> {
		let catalog = gilmat_storage::catalog::load_catalog(&cfg.storage.catalog.path)?;

		tracing::info!(restaurants = catalog.len(), "Restaurant catalog loaded.");

		Self::new(catalog, &cfg.locations)
	}

	/// A named landmark, then a literal `"lat,lon"`, then the configured default.
	pub fn resolve_origin(&self, start_location: Option<&str>) -> Coordinates {
		let Some(raw) = start_location.map(str::trim).filter(|raw| !raw.is_empty()) else {
			return self.default_origin;
		};

		if let Some(coordinates) = self.locations.get(raw) {
			return *coordinates;
		}

		match raw.parse() {
			Ok(coordinates) => coordinates,
			Err(_) => {
				tracing::info!(start_location = raw, "Unknown start location, using default origin.");

				self.default_origin
			},
		}
	}
}

pub struct QdrantIndex {
	store: QdrantStore,
	embedding: EmbeddingProviderConfig,
	client: Client,
}
impl QdrantIndex {
	pub fn new(store: QdrantStore, embedding: EmbeddingProviderConfig) -> Result<Self> {
		Ok(Self { store, embedding, client: http_client()? })
	}
}

impl VectorIndex for QdrantIndex {
	fn query<'a>(
		&'a self,
		text: &'a str,
		top_n: u32,
		filter: Option<&'a MetadataFilter>,
	) -> BoxFuture<'a, Result<Vec<IndexHit>>> {
		Box::pin(async move {
			let texts = [text.to_string()];
			let vector = embedding::embed(&self.client, &self.embedding, &texts)
				.await?
				.into_iter()
				.next()
				.ok_or_else(|| Error::Provider {
					message: "Embedding provider returned no vector.".to_string(),
				})?;

			Ok(self.store.search(vector, filter, top_n).await?)
		})
	}
}

pub struct GilmatService {
	pub cfg: Config,
	pub data: Arc<DataContext>,
	pub index: Arc<dyn VectorIndex>,
	pub providers: Providers,
	sessions: SessionStore,
}
impl GilmatService {
	pub fn new(cfg: Config, data: Arc<DataContext>, index: Arc<dyn VectorIndex>) -> Result<Self> {
		Ok(Self::with_providers(cfg, data, index, Providers::http()?))
	}

	pub fn with_providers(
		cfg: Config,
		data: Arc<DataContext>,
		index: Arc<dyn VectorIndex>,
		providers: Providers,
	) -> Self {
		let sessions = SessionStore::new(cfg.service.max_sessions as usize);

		Self { cfg, data, index, providers, sessions }
	}

	pub fn restaurant(&self, id: &str) -> Result<RestaurantRecord> {
		self.data
			.catalog
			.get(id)
			.cloned()
			.ok_or_else(|| Error::NotFound { message: format!("Restaurant {id} does not exist.") })
	}

	/// Polls the routing service until it answers or the configured attempts run out.
	pub async fn wait_for_routing(&self) -> bool {
		let cfg = &self.cfg.providers.routing;

		for attempt in 1..=cfg.health_probe_attempts {
			match self.providers.routing.check_health(cfg).await {
				Ok(()) => {
					tracing::info!(attempt, "Routing service is reachable.");

					return true;
				},
				Err(err) => {
					tracing::warn!(
						attempt,
						attempts = cfg.health_probe_attempts,
						error = %err,
						"Routing service is not reachable yet."
					);
				},
			}

			if attempt < cfg.health_probe_attempts {
				tokio::time::sleep(Duration::from_millis(cfg.health_probe_interval_ms)).await;
			}
		}

		false
	}
}

struct DefaultProviders {
	client: Client,
}

impl RoutingProvider for DefaultProviders {
	fn best_travel_score<'a>(
		&'a self,
		cfg: &'a RoutingProviderConfig,
		origin: &'a Coordinates,
		destination: &'a Coordinates,
	) -> BoxFuture<'a, Result<f64>> {
		Box::pin(async move {
			Ok(routing::best_travel_score(&self.client, cfg, origin, destination).await?)
		})
	}

	fn check_health<'a>(&'a self, cfg: &'a RoutingProviderConfig) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(routing::check_health(&self.client, cfg).await?) })
	}
}

impl LanguageModel for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
		temperature: f32,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(llm::complete(&self.client, cfg, messages, temperature).await?) })
	}
}

fn http_client() -> Result<Client> {
	Client::builder().build().map_err(|err| Error::Provider { message: err.to_string() })
}
