use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    application::usecases::onboarding::OnboardingUseCase,
    infrastructure::axum_http::{auth::AuthOperator, error_responses::AppError},
};

pub fn routes(onboarding_usecase: Arc<OnboardingUseCase>) -> Router {
    Router::new()
        .route("/", post(onboard))
        .with_state(onboarding_usecase)
}

#[derive(Debug, Deserialize)]
pub struct OnboardCreatorRequest {
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatorResponse {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub status: String,
}

pub async fn onboard(
    State(usecase): State<Arc<OnboardingUseCase>>,
    _auth: AuthOperator,
    Json(payload): Json<OnboardCreatorRequest>,
) -> Result<(StatusCode, Json<CreatorResponse>), AppError> {
    let creator = usecase.onboard(payload.display_name).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatorResponse {
            id: creator.id,
            display_name: creator.display_name,
            status: creator.status,
        }),
    ))
}
