use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    application::usecases::withdrawals::WithdrawalUseCase,
    domain::value_objects::batch::BulkItemOutcome,
    domain::value_objects::withdrawals::{BulkAction, RequestWithdrawalModel, WithdrawalDto},
    infrastructure::axum_http::{
        auth::{AuthCreator, AuthOperator},
        error_responses::AppError,
    },
};

pub fn routes(withdrawal_usecase: Arc<WithdrawalUseCase>) -> Router {
    Router::new()
        .route("/", post(request_withdrawal))
        .route("/pending", get(list_pending))
        .route("/:request_id/approve", post(approve))
        .route("/:request_id/reject", post(reject))
        .route("/bulk", post(bulk_process))
        .with_state(withdrawal_usecase)
}

pub async fn request_withdrawal(
    State(usecase): State<Arc<WithdrawalUseCase>>,
    auth: AuthCreator,
    Json(model): Json<RequestWithdrawalModel>,
) -> Result<(StatusCode, Json<WithdrawalDto>), AppError> {
    let request = usecase.request_withdrawal(auth.creator_id, model).await?;
    Ok((StatusCode::CREATED, Json(request.into())))
}

pub async fn list_pending(
    State(usecase): State<Arc<WithdrawalUseCase>>,
    _auth: AuthOperator,
) -> Result<Json<Vec<WithdrawalDto>>, AppError> {
    let pending = usecase.list_pending().await?;
    Ok(Json(pending.into_iter().map(WithdrawalDto::from).collect()))
}

pub async fn approve(
    State(usecase): State<Arc<WithdrawalUseCase>>,
    auth: AuthOperator,
    Path(request_id): Path<Uuid>,
) -> Result<Json<WithdrawalDto>, AppError> {
    let request = usecase.approve(request_id, auth.operator_id).await?;
    Ok(Json(request.into()))
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

pub async fn reject(
    State(usecase): State<Arc<WithdrawalUseCase>>,
    auth: AuthOperator,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> Result<Json<WithdrawalDto>, AppError> {
    let request = usecase
        .reject(request_id, auth.operator_id, &payload.reason)
        .await?;
    Ok(Json(request.into()))
}

#[derive(Debug, Deserialize)]
pub struct BulkProcessRequest {
    pub request_ids: Vec<Uuid>,
    pub action: BulkAction,
    pub reason: Option<String>,
}

pub async fn bulk_process(
    State(usecase): State<Arc<WithdrawalUseCase>>,
    auth: AuthOperator,
    Json(payload): Json<BulkProcessRequest>,
) -> Json<Vec<BulkItemOutcome>> {
    let outcomes = usecase
        .bulk_process(
            payload.request_ids,
            payload.action,
            auth.operator_id,
            payload.reason,
        )
        .await;
    Json(outcomes)
}
