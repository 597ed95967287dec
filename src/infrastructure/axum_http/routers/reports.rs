use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    application::usecases::{
        lock_unlocker::LockUnlockerUseCase, report_generation::ReportGenerationUseCase,
    },
    domain::value_objects::batch::ReportGenerationTally,
    domain::value_objects::periods::Period,
    domain::value_objects::reports::ReportDto,
    infrastructure::axum_http::{auth::AuthOperator, error_responses::AppError},
};

#[derive(Clone)]
pub struct ReportsRouteState {
    report_generation: Arc<ReportGenerationUseCase>,
    lock_unlocker: Arc<LockUnlockerUseCase>,
}

pub fn routes(
    report_generation: Arc<ReportGenerationUseCase>,
    lock_unlocker: Arc<LockUnlockerUseCase>,
) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .route("/:report_id/unlock", post(manual_unlock))
        .with_state(ReportsRouteState {
            report_generation,
            lock_unlocker,
        })
}

#[derive(Debug, Deserialize)]
pub struct GenerateReportsRequest {
    /// `YYYY-MM`; defaults to the most recently completed period. The run
    /// is idempotent, so retrying an interrupted rollover is safe.
    pub period: Option<String>,
}

pub async fn generate(
    State(state): State<ReportsRouteState>,
    _auth: AuthOperator,
    Json(payload): Json<GenerateReportsRequest>,
) -> Result<Json<ReportGenerationTally>, AppError> {
    let period = match payload.period {
        Some(raw) => Period::from_str(&raw).ok_or_else(|| {
            AppError::BadRequest("period must be formatted as YYYY-MM".to_string())
        })?,
        None => Period::preceding(Utc::now()),
    };

    let tally = state.report_generation.run(period).await?;
    Ok(Json(tally))
}

pub async fn manual_unlock(
    State(state): State<ReportsRouteState>,
    auth: AuthOperator,
    Path(report_id): Path<Uuid>,
) -> Result<Json<ReportDto>, AppError> {
    let report = state
        .lock_unlocker
        .manual_unlock(report_id, auth.operator_id)
        .await?;
    Ok(Json(report.into()))
}
