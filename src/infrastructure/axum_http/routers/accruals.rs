use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    application::usecases::accrual_ingest::AccrualIngestUseCase,
    config::config_model::DotEnvyConfig,
    domain::entities::video_accruals::VideoAccrualEntity,
    domain::value_objects::accruals::AccrualDelta,
    infrastructure::axum_http::error_responses::AppError,
};

// The accrual feed is a machine caller; it authenticates with the shared
// internal token rather than a per-user JWT.
//
// Run example
//   curl -X POST "http://localhost:$SERVER_PORT_BACKEND/internal/v1/accruals/videos/$VIDEO_ID/delta" \
//     -H "Authorization: Bearer $ACCRUAL_FEED_TOKEN" \
//     -H "Content-Type: application/json" \
//     -d '{"earnings_minor":1250,"views":40,"premium_views":4}'

#[derive(Clone)]
pub struct AccrualRouteState {
    config: Arc<DotEnvyConfig>,
    usecase: Arc<AccrualIngestUseCase>,
}

pub fn routes(config: Arc<DotEnvyConfig>, usecase: Arc<AccrualIngestUseCase>) -> Router {
    Router::new()
        .route("/videos", post(register_video))
        .route("/videos/:video_id/delta", post(apply_delta))
        .with_state(AccrualRouteState { config, usecase })
}

#[derive(Debug, Deserialize)]
pub struct RegisterVideoRequest {
    pub video_id: Uuid,
    pub creator_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AccrualResponse {
    pub video_id: Uuid,
    pub creator_id: Uuid,
    pub period_views: i64,
    pub period_premium_views: i64,
    pub period_earnings_minor: i64,
    pub lifetime_earnings_minor: i64,
}

impl From<VideoAccrualEntity> for AccrualResponse {
    fn from(entity: VideoAccrualEntity) -> Self {
        Self {
            video_id: entity.video_id,
            creator_id: entity.creator_id,
            period_views: entity.period_views,
            period_premium_views: entity.period_premium_views,
            period_earnings_minor: entity.period_earnings_minor,
            lifetime_earnings_minor: entity.lifetime_earnings_minor,
        }
    }
}

pub async fn register_video(
    State(state): State<AccrualRouteState>,
    headers: HeaderMap,
    Json(payload): Json<RegisterVideoRequest>,
) -> Response {
    if let Err(status) = authorize_feed(&state, &headers) {
        return (status, "unauthorized").into_response();
    }

    match state
        .usecase
        .register_video(payload.video_id, payload.creator_id)
        .await
    {
        Ok(accrual) => (StatusCode::CREATED, Json(AccrualResponse::from(accrual))).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn apply_delta(
    State(state): State<AccrualRouteState>,
    Path(video_id): Path<Uuid>,
    headers: HeaderMap,
    Json(delta): Json<AccrualDelta>,
) -> Response {
    if let Err(status) = authorize_feed(&state, &headers) {
        return (status, "unauthorized").into_response();
    }

    match state.usecase.apply_delta(video_id, delta).await {
        Ok(accrual) => Json(AccrualResponse::from(accrual)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

fn authorize_feed(state: &AccrualRouteState, headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected_token = state
        .config
        .accrual_feed
        .internal_token
        .as_deref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if token == expected_token {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}
