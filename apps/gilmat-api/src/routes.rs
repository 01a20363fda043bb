use axum::{
	Json, Router,
	extract::{
		Path, Query, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gilmat_domain::RestaurantRecord;
use gilmat_service::{Error, RecommendRequest, RecommendResponse};

use crate::state::AppState;

const RECOMMENDATION_FAILED: &str = "recommendation failed, try again";

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
	pub top_k: Option<u32>,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/recommendations", post(recommend))
		.route("/v1/recommendations/{session_id}", get(session))
		.route("/v1/restaurants/{id}", get(restaurant))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn recommend(
	State(state): State<AppState>,
	payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
	let Json(payload) = payload.map_err(|rejection| invalid_request(rejection.body_text()))?;
	let response = state.service.recommend(payload).await?;

	Ok(Json(response))
}

async fn session(
	State(state): State<AppState>,
	Path(session_id): Path<String>,
	query: Result<Query<SessionQuery>, QueryRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
	let Query(query) = query.map_err(|rejection| invalid_request(rejection.body_text()))?;
	let session_id = Uuid::parse_str(&session_id)
		.map_err(|_| invalid_request(format!("Session id {session_id:?} is not a UUID.")))?;
	let response = state.service.session(session_id, query.top_k).await?;

	Ok(Json(response))
}

async fn restaurant(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<RestaurantRecord>, ApiError> {
	Ok(Json(state.service.restaurant(&id)?))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			Error::IncompleteProfile { ref missing } => ApiError::new(
				StatusCode::BAD_REQUEST,
				"incomplete_profile",
				err.to_string(),
				Some(missing.clone()),
			),
			Error::NotFound { message } =>
				ApiError::new(StatusCode::NOT_FOUND, "not_found", message, None),
			other => {
				tracing::error!(error = %other, "Recommendation request failed.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"recommendation_failed",
					RECOMMENDATION_FAILED,
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

fn invalid_request(message: impl Into<String>) -> ApiError {
	ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message, None)
}
