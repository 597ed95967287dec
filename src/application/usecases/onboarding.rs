use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::creators::{CreatorEntity, InsertCreatorEntity};
use crate::domain::errors::PayoutResult;
use crate::domain::repositories::creators::CreatorRepository;
use crate::domain::value_objects::enums::creator_statuses::CreatorStatus;

pub struct OnboardingUseCase {
    creator_repo: Arc<dyn CreatorRepository + Send + Sync>,
}

impl OnboardingUseCase {
    pub fn new(creator_repo: Arc<dyn CreatorRepository + Send + Sync>) -> Self {
        Self { creator_repo }
    }

    pub async fn onboard(&self, display_name: Option<String>) -> PayoutResult<CreatorEntity> {
        let creator = self
            .creator_repo
            .onboard(InsertCreatorEntity {
                id: Uuid::new_v4(),
                display_name,
                status: CreatorStatus::Active.to_string(),
            })
            .await?;

        info!(creator_id = %creator.id, "onboarding: creator onboarded with zeroed ledger");

        Ok(creator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::creators::MockCreatorRepository;
    use chrono::Utc;

    #[tokio::test]
    async fn onboards_an_active_creator() {
        let mut creator_repo = MockCreatorRepository::new();
        creator_repo
            .expect_onboard()
            .withf(|entity| entity.status == "active")
            .returning(|entity| {
                Box::pin(async move {
                    Ok(CreatorEntity {
                        id: entity.id,
                        display_name: entity.display_name,
                        status: entity.status,
                        created_at: Utc::now(),
                    })
                })
            });

        let usecase = OnboardingUseCase::new(Arc::new(creator_repo));
        let creator = usecase.onboard(Some("Creator".to_string())).await.unwrap();

        assert_eq!(creator.status, "active");
        assert_eq!(creator.display_name.as_deref(), Some("Creator"));
    }
}
