use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    application::usecases::reconciliation::ReconciliationUseCase,
    domain::entities::audit_entries::AuditEntryEntity,
    domain::repositories::audit_log::AuditLogRepository,
    domain::value_objects::reconciliation::ReconciliationReport,
    infrastructure::axum_http::{auth::AuthOperator, error_responses::AppError},
};

const DEFAULT_AUDIT_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct ReconciliationRouteState {
    usecase: Arc<ReconciliationUseCase>,
    audit_log: Arc<dyn AuditLogRepository + Send + Sync>,
}

pub fn routes(
    usecase: Arc<ReconciliationUseCase>,
    audit_log: Arc<dyn AuditLogRepository + Send + Sync>,
) -> Router {
    Router::new()
        .route("/", get(run_sweep))
        .route("/audit/:target", get(list_audit_entries))
        .with_state(ReconciliationRouteState { usecase, audit_log })
}

pub async fn run_sweep(
    State(state): State<ReconciliationRouteState>,
    _auth: AuthOperator,
) -> Result<Json<ReconciliationReport>, AppError> {
    let report = state.usecase.run().await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AuditEntryResponse {
    pub action: String,
    pub actor: String,
    pub target: String,
    pub before_state: serde_json::Value,
    pub after_state: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<AuditEntryEntity> for AuditEntryResponse {
    fn from(entity: AuditEntryEntity) -> Self {
        Self {
            action: entity.action,
            actor: entity.actor,
            target: entity.target,
            before_state: entity.before_state,
            after_state: entity.after_state,
            created_at: entity.created_at,
        }
    }
}

/// Drill-down for a flagged creator: the balance-affecting history that
/// explains (or fails to explain) a reported drift.
pub async fn list_audit_entries(
    State(state): State<ReconciliationRouteState>,
    _auth: AuthOperator,
    Path(target): Path<String>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntryResponse>>, AppError> {
    let limit = query.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_AUDIT_LIMIT);
    let entries = state.audit_log.list_for_target(&target, limit).await?;
    Ok(Json(
        entries.into_iter().map(AuditEntryResponse::from).collect(),
    ))
}
