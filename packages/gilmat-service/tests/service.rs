use std::{
	collections::{BTreeMap, HashMap},
	path::PathBuf,
	sync::{Arc, Mutex},
	time::Duration,
};

use serde_json::{Map, Value};
use tokio::sync::Notify;

use gilmat_config::{
	Catalog, Config, EmbeddingProviderConfig, FilterPoints, LlmProviderConfig, Locations, Qdrant,
	Retrieval, RoutingProviderConfig, ScoreWeights, Scoring, Service, Storage,
};
use gilmat_domain::{Coordinates, MetadataFilter, PriceTier, RestaurantRecord, UserProfile};
use gilmat_service::{
	BoxFuture, DataContext, Error, GilmatService, LanguageModel, NoticeCode, Providers,
	RecommendRequest, RecommendationItem, RecommendationStatus, Result, RoutingProvider,
	TravelOutcome, VectorIndex,
};
use gilmat_storage::qdrant::IndexHit;

const ORIGIN: &str = "37.5630,126.9830";

struct ScriptedIndex {
	filtered: Vec<IndexHit>,
	unfiltered: Vec<IndexHit>,
	fail: bool,
	calls: Mutex<Vec<Option<MetadataFilter>>>,
}
impl ScriptedIndex {
	fn new(filtered: Vec<IndexHit>, unfiltered: Vec<IndexHit>) -> Self {
		Self { filtered, unfiltered, fail: false, calls: Mutex::new(Vec::new()) }
	}

	fn failing() -> Self {
		Self { fail: true, ..Self::new(Vec::new(), Vec::new()) }
	}

	fn calls(&self) -> Vec<Option<MetadataFilter>> {
		self.calls.lock().expect("Index calls lock poisoned.").clone()
	}
}

impl VectorIndex for ScriptedIndex {
	fn query<'a>(
		&'a self,
		_text: &'a str,
		top_n: u32,
		filter: Option<&'a MetadataFilter>,
	) -> BoxFuture<'a, Result<Vec<IndexHit>>> {
		Box::pin(async move {
			self.calls.lock().expect("Index calls lock poisoned.").push(filter.cloned());

			if self.fail {
				return Err(Error::Qdrant { message: "connection refused".to_string() });
			}

			let hits = if filter.is_some() { &self.filtered } else { &self.unfiltered };

			Ok(hits.iter().take(top_n as usize).cloned().collect())
		})
	}
}

/// Travel score per destination `"lat,lon"`; `None` fails the call.
struct ScriptedRouting {
	scores: HashMap<String, Option<f64>>,
	healthy: bool,
}
impl ScriptedRouting {
	fn new(scores: &[(&str, Option<f64>)]) -> Self {
		Self {
			scores: scores.iter().map(|(key, score)| (key.to_string(), *score)).collect(),
			healthy: true,
		}
	}

	fn down() -> Self {
		Self { scores: HashMap::new(), healthy: false }
	}
}

impl RoutingProvider for ScriptedRouting {
	fn best_travel_score<'a>(
		&'a self,
		_cfg: &'a RoutingProviderConfig,
		_origin: &'a Coordinates,
		destination: &'a Coordinates,
	) -> BoxFuture<'a, Result<f64>> {
		Box::pin(async move {
			match self.scores.get(&destination.to_string()).copied().flatten() {
				Some(score) => Ok(score),
				None => Err(Error::Provider {
					message: "Routing request failed: connection refused".to_string(),
				}),
			}
		})
	}

	fn check_health<'a>(&'a self, _cfg: &'a RoutingProviderConfig) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if self.healthy {
				Ok(())
			} else {
				Err(Error::Provider { message: "Routing request failed: 503".to_string() })
			}
		})
	}
}

/// Holds the first destination until the third one is routed.
struct GatedRouting {
	gate: Notify,
}

impl RoutingProvider for GatedRouting {
	fn best_travel_score<'a>(
		&'a self,
		_cfg: &'a RoutingProviderConfig,
		_origin: &'a Coordinates,
		destination: &'a Coordinates,
	) -> BoxFuture<'a, Result<f64>> {
		Box::pin(async move {
			match destination.to_string().as_str() {
				"37.56,126.98" => {
					self.gate.notified().await;

					Ok(0.9)
				},
				"37.562,126.982" => {
					self.gate.notify_one();

					Ok(0.3)
				},
				_ => Ok(0.5),
			}
		})
	}

	fn check_health<'a>(&'a self, _cfg: &'a RoutingProviderConfig) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(()) })
	}
}

struct OfflineLlm;

impl LanguageModel for OfflineLlm {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_messages: &'a [Value],
		_temperature: f32,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Err(Error::Provider { message: "no api key".to_string() }) })
	}
}

fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			max_sessions: 8,
			default_top_k: 2,
		},
		storage: Storage {
			qdrant: Qdrant {
				url: "http://127.0.0.1:6334".to_string(),
				collection: "restaurants".to_string(),
				vector_dim: 4,
				id_field: "restaurant_id".to_string(),
			},
			catalog: Catalog { path: PathBuf::from("restaurants.json") },
		},
		providers: gilmat_config::Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/embeddings".to_string(),
				model: "test".to_string(),
				dimensions: 4,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			llm: LlmProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/chat/completions".to_string(),
				model: "test".to_string(),
				temperature: 0.7,
				rewrite_temperature: 0.2,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			routing: RoutingProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				path: "/route".to_string(),
				health_path: "/info".to_string(),
				profile: "pt".to_string(),
				earliest_departure_time: "2023-01-01T09:00:00Z".to_string(),
				max_paths: 3,
				timeout_ms: 1_000,
				api_key: None,
				health_probe_attempts: 2,
				health_probe_interval_ms: 1,
			},
		},
		retrieval: Retrieval {
			candidate_k: 10,
			image_field: "image_url".to_string(),
			no_image_marker: "no_image".to_string(),
			rewrite_fallback_chars: 150,
			points: FilterPoints::default(),
		},
		scoring: Scoring { max_concurrent_routes: 2, weights: ScoreWeights::default() },
		locations: Locations {
			default_origin: ORIGIN.to_string(),
			named: BTreeMap::from([("명동역".to_string(), ORIGIN.to_string())]),
		},
	}
}

fn record(
	id: &str,
	coordinates: &str,
	tier: PriceTier,
	quality: f64,
	friendliness: f64,
) -> RestaurantRecord {
	RestaurantRecord {
		id: id.to_string(),
		name: format!("Restaurant {id}"),
		address: None,
		category: Some("한식".to_string()),
		image_url: Some(format!("https://img.example/{id}.jpg")),
		coordinates: Some(coordinates.parse().expect("Invalid test coordinates.")),
		price_tier: Some(tier),
		quality,
		friendliness,
	}
}

fn catalog() -> HashMap<String, RestaurantRecord> {
	[
		record("r1", "37.5600,126.9800", PriceTier::Mid, 0.8, 0.5),
		record("r2", "37.5610,126.9810", PriceTier::Premium, 0.9, 0.9),
		record("r3", "37.5620,126.9820", PriceTier::High, 0.9, 0.9),
	]
	.into_iter()
	.map(|record| (record.id.clone(), record))
	.collect()
}

fn hit(id: &str, distance: f32, metadata: &[(&str, &str)]) -> IndexHit {
	IndexHit {
		id: id.to_string(),
		distance,
		metadata: metadata.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect(),
	}
}

fn default_hits() -> Vec<IndexHit> {
	vec![hit("r1", 0.1, &[]), hit("r2", 0.2, &[]), hit("r3", 0.3, &[])]
}

fn profile() -> UserProfile {
	serde_json::from_value(serde_json::json!({
		"name": "Charlie",
		"age": 29,
		"gender": "male",
		"nationality": "Canada",
		"travel_type": "친구",
		"party_size": 2,
		"can_wait": "X",
		"budget": "중",
		"spicy_ok": "O",
		"is_vegetarian": "X",
		"avoid_ingredients": [],
		"like_ingredients": ["돼지고기"],
		"food_category": "한식",
		"start_location": "명동역"
	}))
	.expect("Failed to parse profile.")
}

fn service(index: Arc<ScriptedIndex>, routing: impl RoutingProvider + 'static) -> GilmatService {
	let cfg = test_config();
	let data = DataContext::new(catalog(), &cfg.locations).expect("Failed to build data context.");
	let providers = Providers::new(Arc::new(routing), Arc::new(OfflineLlm));

	GilmatService::with_providers(cfg, Arc::new(data), index, providers)
}

fn healthy_routing() -> ScriptedRouting {
	ScriptedRouting::new(&[
		("37.56,126.98", Some(1.0)),
		("37.561,126.981", Some(0.2)),
		("37.562,126.982", Some(0.6)),
	])
}

fn ids(items: &[RecommendationItem]) -> Vec<&str> {
	items.iter().map(|item| item.restaurant().id.as_str()).collect()
}

#[tokio::test]
async fn retrieval_retries_without_filter_when_filtered_query_is_empty() {
	let index = Arc::new(ScriptedIndex::new(Vec::new(), default_hits()));
	let service = service(index.clone(), healthy_routing());
	let filter = gilmat_domain::FilterMetadata::from_profile(&profile());
	let items = service.retrieve("summary", &filter, 10).await;
	let calls = index.calls();

	assert_eq!(items.len(), 3);
	assert_eq!(calls.len(), 2);
	assert!(calls[0].as_ref().is_some_and(|filter| !filter.is_empty()));
	assert!(calls[1].is_none());
}

#[tokio::test]
async fn retrieval_drops_image_less_candidates_and_ranks_by_filter_score() {
	let hits = vec![
		hit("r1", 0.1, &[("image_url", "no_image")]),
		hit("r2", 0.4, &[("high_level_category", "한식"), ("budget_range", "중")]),
		hit("r3", 0.2, &[("high_level_category", "한식")]),
	];
	let service = service(Arc::new(ScriptedIndex::new(hits, Vec::new())), healthy_routing());
	let filter = gilmat_domain::FilterMetadata::from_profile(&profile());
	let items = service.retrieve("summary", &filter, 10).await;

	assert_eq!(items.iter().map(|item| item.id.as_str()).collect::<Vec<_>>(), ["r2", "r3"]);
	assert_eq!(items[0].filter_score, 5);
	assert_eq!(items[1].filter_score, 3);
}

#[tokio::test]
async fn retrieval_backend_failure_yields_no_candidates() {
	let service = service(Arc::new(ScriptedIndex::failing()), healthy_routing());
	let filter = gilmat_domain::FilterMetadata::from_profile(&profile());

	assert!(service.retrieve("summary", &filter, 10).await.is_empty());
}

#[tokio::test]
async fn scoring_orders_by_final_score_and_matches_reference_weights() {
	let service = service(Arc::new(ScriptedIndex::new(Vec::new(), Vec::new())), healthy_routing());
	let origin: Coordinates = ORIGIN.parse().expect("Invalid origin.");
	let accepted = gilmat_domain::price::accepted_price_tiers(Some("중"));
	let candidates = ["r1", "r2", "r3"].map(|id| catalog()[id].clone()).to_vec();
	let scored = service
		.score_candidates(candidates, &origin, &accepted, &ScoreWeights::default())
		.await
		.expect("Scoring should succeed.");

	let order: Vec<&str> = scored.iter().map(|candidate| candidate.restaurant.id.as_str()).collect();

	assert_eq!(order, ["r1", "r3", "r2"]);
	assert!((scored[0].final_score - 0.81).abs() < 1e-9);
	assert!((scored[1].final_score - 0.79).abs() < 1e-9);
	assert_eq!(scored[0].score_price, 1.0);
	assert_eq!(scored[2].score_price, 0.0);
	assert_eq!(scored[0].travel, TravelOutcome::Scored { score: 1.0 });
	assert!(scored.windows(2).all(|pair| pair[0].final_score >= pair[1].final_score));
}

#[test]
fn retrieval_breaks_filter_score_ties_by_distance() {
	let category = [("high_level_category", "한식")];
	let hits =
		vec![hit("r3", 0.9, &category), hit("r1", 0.3, &category), hit("r2", 0.5, &category)];
	let filter = gilmat_domain::FilterMetadata::from_profile(&profile());
	let items = gilmat_service::retrieval::rank_hits(hits, &filter, &test_config().retrieval);

	assert_eq!(items.iter().map(|item| item.id.as_str()).collect::<Vec<_>>(), ["r1", "r2", "r3"]);
	assert!(items.iter().all(|item| item.filter_score == items[0].filter_score));
}

#[tokio::test]
async fn scoring_keeps_input_order_for_equal_final_scores() {
	let routing =
		ScriptedRouting::new(&[("37.561,126.981", Some(0.5)), ("37.562,126.982", Some(0.5))]);
	let service = service(Arc::new(ScriptedIndex::new(Vec::new(), Vec::new())), routing);
	let origin: Coordinates = ORIGIN.parse().expect("Invalid origin.");

	for input in [["r3", "r2"], ["r2", "r3"]] {
		let candidates = input.map(|id| catalog()[id].clone()).to_vec();
		let scored = service
			.score_candidates(candidates, &origin, &PriceTier::ALL, &ScoreWeights::default())
			.await
			.expect("Scoring should succeed.");
		let order: Vec<&str> =
			scored.iter().map(|candidate| candidate.restaurant.id.as_str()).collect();

		assert_eq!(order, input);
		assert_eq!(scored[0].final_score, scored[1].final_score);
	}
}

#[tokio::test]
async fn slow_route_does_not_hold_back_later_candidates() {
	let routing = GatedRouting { gate: Notify::new() };
	let service = service(Arc::new(ScriptedIndex::new(Vec::new(), Vec::new())), routing);
	let origin: Coordinates = ORIGIN.parse().expect("Invalid origin.");
	let candidates = ["r1", "r2", "r3"].map(|id| catalog()[id].clone()).to_vec();
	let scored = tokio::time::timeout(
		Duration::from_secs(5),
		service.score_candidates(candidates, &origin, &PriceTier::ALL, &ScoreWeights::default()),
	)
	.await
	.expect("Routing stalled behind the slow candidate.")
	.expect("Scoring should succeed.");
	let travel: Vec<(&str, f64)> = scored
		.iter()
		.map(|candidate| (candidate.restaurant.id.as_str(), candidate.score_travel))
		.collect();

	assert_eq!(travel, [("r1", 0.9), ("r2", 0.5), ("r3", 0.3)]);
}

#[tokio::test]
async fn scoring_is_idempotent() {
	let service = service(Arc::new(ScriptedIndex::new(Vec::new(), Vec::new())), healthy_routing());
	let origin: Coordinates = ORIGIN.parse().expect("Invalid origin.");
	let candidates: Vec<_> = ["r1", "r2", "r3"].map(|id| catalog()[id].clone()).to_vec();
	let first = service
		.score_candidates(candidates.clone(), &origin, &PriceTier::ALL, &ScoreWeights::default())
		.await
		.expect("Scoring should succeed.");
	let second = service
		.score_candidates(candidates, &origin, &PriceTier::ALL, &ScoreWeights::default())
		.await
		.expect("Scoring should succeed.");

	assert_eq!(first, second);
}

#[tokio::test]
async fn scoring_reports_outage_when_every_route_fails() {
	let service =
		service(Arc::new(ScriptedIndex::new(Vec::new(), Vec::new())), ScriptedRouting::down());
	let origin: Coordinates = ORIGIN.parse().expect("Invalid origin.");
	let candidates = ["r1", "r2"].map(|id| catalog()[id].clone()).to_vec();
	let err = service
		.score_candidates(candidates, &origin, &PriceTier::ALL, &ScoreWeights::default())
		.await
		.expect_err("Expected an outage.");

	assert!(matches!(err, Error::RoutingServiceDown { failed: 2, total: 2 }));
}

#[tokio::test]
async fn scoring_keeps_partial_failures_at_zero_travel() {
	let routing = ScriptedRouting::new(&[("37.56,126.98", Some(0.7)), ("37.561,126.981", None)]);
	let service = service(Arc::new(ScriptedIndex::new(Vec::new(), Vec::new())), routing);
	let origin: Coordinates = ORIGIN.parse().expect("Invalid origin.");
	let candidates = ["r1", "r2"].map(|id| catalog()[id].clone()).to_vec();
	let scored = service
		.score_candidates(candidates, &origin, &PriceTier::ALL, &ScoreWeights::default())
		.await
		.expect("Partial failures should not raise.");
	let failed = scored
		.iter()
		.find(|candidate| candidate.restaurant.id == "r2")
		.expect("Missing failed candidate.");

	assert_eq!(failed.score_travel, 0.0);
	assert!(matches!(failed.travel, TravelOutcome::Failed { .. }));
}

#[tokio::test]
async fn candidate_without_coordinates_counts_as_failed_route() {
	let service = service(Arc::new(ScriptedIndex::new(Vec::new(), Vec::new())), healthy_routing());
	let origin: Coordinates = ORIGIN.parse().expect("Invalid origin.");
	let mut unroutable = catalog()["r1"].clone();

	unroutable.coordinates = None;

	let err = service
		.score_candidates(vec![unroutable], &origin, &PriceTier::ALL, &ScoreWeights::default())
		.await
		.expect_err("Expected an outage.");

	assert!(matches!(err, Error::RoutingServiceDown { failed: 1, total: 1 }));
}

#[tokio::test]
async fn recommend_ranks_and_slices_top_k() {
	let service = service(Arc::new(ScriptedIndex::new(default_hits(), Vec::new())), healthy_routing());
	let response = service
		.recommend(RecommendRequest { profile: profile(), top_k: None, weights: None })
		.await
		.expect("Recommendation should succeed.");

	assert_eq!(response.status, RecommendationStatus::Ranked);
	assert!(response.notice.is_none());
	assert_eq!(response.total_count, 3);
	assert_eq!(ids(&response.items), ["r1", "r3"]);
	assert!(response.summary.contains("name: Charlie"));

	let resliced = service
		.session(response.session_id, Some(3))
		.await
		.expect("Session should exist.");

	assert_eq!(ids(&resliced.items), ["r1", "r3", "r2"]);
}

#[tokio::test]
async fn recommend_falls_back_to_stage_one_order_when_routing_is_down() {
	let service =
		service(Arc::new(ScriptedIndex::new(default_hits(), Vec::new())), ScriptedRouting::down());
	let response = service
		.recommend(RecommendRequest { profile: profile(), top_k: Some(3), weights: None })
		.await
		.expect("Fallback should not fail.");

	assert_eq!(response.status, RecommendationStatus::Fallback);
	assert_eq!(
		response.notice.map(|notice| notice.code),
		Some(NoticeCode::TravelFrictionUnavailable)
	);
	assert_eq!(ids(&response.items), ["r1", "r2", "r3"]);
	assert!(matches!(response.items[0], RecommendationItem::Retrieved(_)));
}

#[tokio::test]
async fn recommend_reports_relax_filters_when_nothing_is_retrieved() {
	let service = service(Arc::new(ScriptedIndex::new(Vec::new(), Vec::new())), healthy_routing());
	let response = service
		.recommend(RecommendRequest { profile: profile(), top_k: None, weights: None })
		.await
		.expect("Empty recommendation should not fail.");

	assert_eq!(response.status, RecommendationStatus::Empty);
	assert_eq!(response.notice.map(|notice| notice.code), Some(NoticeCode::RelaxFilters));
	assert_eq!(response.total_count, 0);
}

#[tokio::test]
async fn recommend_rejects_incomplete_profile() {
	let service = service(Arc::new(ScriptedIndex::new(default_hits(), Vec::new())), healthy_routing());
	let mut profile = profile();

	profile.budget = None;

	let err = service
		.recommend(RecommendRequest { profile, top_k: None, weights: None })
		.await
		.expect_err("Expected an incomplete profile.");

	assert!(matches!(err, Error::IncompleteProfile { ref missing } if missing == &["budget"]));
}

#[tokio::test]
async fn recommend_skips_ids_missing_from_catalog() {
	let hits = vec![hit("ghost", 0.05, &[]), hit("r3", 0.3, &[])];
	let service = service(Arc::new(ScriptedIndex::new(hits, Vec::new())), healthy_routing());
	let response = service
		.recommend(RecommendRequest { profile: profile(), top_k: None, weights: None })
		.await
		.expect("Recommendation should succeed.");

	assert_eq!(ids(&response.items), ["r3"]);
}

#[tokio::test]
async fn recommend_fails_when_no_retrieved_id_is_in_catalog() {
	let hits = vec![hit("ghost", 0.05, &[]), hit("phantom", 0.1, &[])];
	let service = service(Arc::new(ScriptedIndex::new(hits, Vec::new())), healthy_routing());
	let err = service
		.recommend(RecommendRequest { profile: profile(), top_k: None, weights: None })
		.await
		.expect_err("Expected unavailable candidates.");

	assert!(matches!(err, Error::CandidatesUnavailable { requested: 2 }));
}

#[tokio::test]
async fn recommend_validates_weight_overrides_and_top_k() {
	let service = service(Arc::new(ScriptedIndex::new(default_hits(), Vec::new())), healthy_routing());
	let zero = ScoreWeights { travel: 0.0, friendliness: 0.0, quality: 0.0, price: 0.0 };
	let err = service
		.recommend(RecommendRequest { profile: profile(), top_k: None, weights: Some(zero) })
		.await
		.expect_err("Expected invalid weights.");

	assert!(matches!(err, Error::InvalidRequest { .. }));

	let err = service
		.recommend(RecommendRequest { profile: profile(), top_k: Some(0), weights: None })
		.await
		.expect_err("Expected invalid top_k.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
}

#[tokio::test]
async fn travel_only_weights_follow_routing_scores() {
	let service = service(Arc::new(ScriptedIndex::new(default_hits(), Vec::new())), healthy_routing());
	let travel_only = ScoreWeights { travel: 1.0, friendliness: 0.0, quality: 0.0, price: 0.0 };
	let response = service
		.recommend(RecommendRequest {
			profile: profile(),
			top_k: Some(3),
			weights: Some(travel_only),
		})
		.await
		.expect("Recommendation should succeed.");

	assert_eq!(ids(&response.items), ["r1", "r3", "r2"]);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
	let service = service(Arc::new(ScriptedIndex::new(Vec::new(), Vec::new())), healthy_routing());
	let err = service
		.session(uuid::Uuid::new_v4(), None)
		.await
		.expect_err("Expected a missing session.");

	assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn origin_resolution_prefers_named_locations() {
	let service = service(Arc::new(ScriptedIndex::new(Vec::new(), Vec::new())), healthy_routing());
	let default_origin: Coordinates = ORIGIN.parse().expect("Invalid origin.");

	assert_eq!(service.data.resolve_origin(Some("명동역")), default_origin);
	assert_eq!(
		service.data.resolve_origin(Some("37.5, 127.0")),
		Coordinates::new(37.5, 127.0).expect("Invalid coordinates.")
	);
	assert_eq!(service.data.resolve_origin(Some("어딘가")), default_origin);
	assert_eq!(service.data.resolve_origin(None), default_origin);
}

#[test]
fn location_table_rejects_unusable_configured_coordinates() {
	let mut locations = test_config().locations;

	locations.default_origin = "nowhere".to_string();

	let err = DataContext::new(catalog(), &locations).expect_err("Expected a bad origin.");

	assert!(matches!(
		err,
		Error::InvalidConfig { ref message } if message.starts_with("locations.default_origin")
	));

	let mut locations = test_config().locations;

	locations.named.insert("북극".to_string(), "95.0,127.0".to_string());

	let err =
		DataContext::new(catalog(), &locations).expect_err("Expected an out-of-range location.");

	assert!(matches!(
		err,
		Error::InvalidConfig { ref message } if message.starts_with("locations.named.북극")
	));
}

#[tokio::test]
async fn routing_probe_gives_up_after_configured_attempts() {
	let healthy = service(Arc::new(ScriptedIndex::new(Vec::new(), Vec::new())), healthy_routing());
	let down =
		service(Arc::new(ScriptedIndex::new(Vec::new(), Vec::new())), ScriptedRouting::down());

	assert!(healthy.wait_for_routing().await);
	assert!(!down.wait_for_routing().await);
}
