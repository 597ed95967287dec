use std::sync::Arc;

use futures_util::{StreamExt, stream};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::notifier::{CreatorNotifier, NotificationKind};
use crate::domain::entities::withdrawal_requests::{
    InsertWithdrawalRequestEntity, WithdrawalRequestEntity,
};
use crate::domain::errors::{PayoutError, PayoutResult};
use crate::domain::repositories::ledger::LedgerRepository;
use crate::domain::repositories::withdrawal_request::WithdrawalRequestRepository;
use crate::domain::value_objects::batch::BulkItemOutcome;
use crate::domain::value_objects::enums::withdrawal_statuses::WithdrawalStatus;
use crate::domain::value_objects::withdrawals::{BulkAction, RequestWithdrawalModel};

const DEFAULT_BULK_REJECTION_REASON: &str = "rejected by operator";

pub struct WithdrawalUseCase {
    withdrawal_repo: Arc<dyn WithdrawalRequestRepository + Send + Sync>,
    ledger_repo: Arc<dyn LedgerRepository + Send + Sync>,
    notifier: Arc<dyn CreatorNotifier + Send + Sync>,
    minimum_withdrawal_minor: i64,
    concurrency: usize,
}

impl WithdrawalUseCase {
    pub fn new(
        withdrawal_repo: Arc<dyn WithdrawalRequestRepository + Send + Sync>,
        ledger_repo: Arc<dyn LedgerRepository + Send + Sync>,
        notifier: Arc<dyn CreatorNotifier + Send + Sync>,
        minimum_withdrawal_minor: i64,
        concurrency: usize,
    ) -> Self {
        Self {
            withdrawal_repo,
            ledger_repo,
            notifier,
            minimum_withdrawal_minor,
            concurrency,
        }
    }

    /// The balance check here is advisory: it stops obviously bad requests
    /// at submission time, while the authoritative check runs inside the
    /// approval transaction against the then-current balance.
    pub async fn request_withdrawal(
        &self,
        creator_id: Uuid,
        model: RequestWithdrawalModel,
    ) -> PayoutResult<WithdrawalRequestEntity> {
        if model.amount_minor <= 0 {
            warn!(%creator_id, amount_minor = model.amount_minor, "withdrawals: non-positive amount");
            return Err(PayoutError::InvalidAmount);
        }
        if model.amount_minor < self.minimum_withdrawal_minor {
            warn!(
                %creator_id,
                amount_minor = model.amount_minor,
                minimum_minor = self.minimum_withdrawal_minor,
                "withdrawals: amount below minimum"
            );
            return Err(PayoutError::BelowMinimum {
                minimum_minor: self.minimum_withdrawal_minor,
            });
        }

        let ledger = self.ledger_repo.find_by_creator(creator_id).await?;
        if ledger.available_balance_minor < model.amount_minor {
            warn!(
                %creator_id,
                amount_minor = model.amount_minor,
                available_minor = ledger.available_balance_minor,
                "withdrawals: requested more than available"
            );
            return Err(PayoutError::InsufficientAvailable);
        }

        let request = self
            .withdrawal_repo
            .create(InsertWithdrawalRequestEntity {
                id: Uuid::new_v4(),
                creator_id,
                amount_minor: model.amount_minor,
                method: model.method.to_string(),
                details: model.details,
                status: WithdrawalStatus::Pending.to_string(),
            })
            .await?;

        info!(
            request_id = %request.id,
            %creator_id,
            amount_minor = request.amount_minor,
            method = %request.method,
            "withdrawals: request created"
        );

        Ok(request)
    }

    pub async fn approve(
        &self,
        request_id: Uuid,
        operator_id: Uuid,
    ) -> PayoutResult<WithdrawalRequestEntity> {
        let request = self
            .withdrawal_repo
            .approve(request_id, operator_id)
            .await
            .map_err(|err| {
                warn!(
                    %request_id,
                    %operator_id,
                    error = ?err,
                    "withdrawals: approval failed"
                );
                err
            })?;

        info!(
            %request_id,
            creator_id = %request.creator_id,
            amount_minor = request.amount_minor,
            %operator_id,
            "withdrawals: request approved"
        );

        self.notify(
            &request,
            NotificationKind::WithdrawalApproved,
            json!({ "amount_minor": request.amount_minor, "method": request.method }),
        )
        .await;

        Ok(request)
    }

    pub async fn reject(
        &self,
        request_id: Uuid,
        operator_id: Uuid,
        reason: &str,
    ) -> PayoutResult<WithdrawalRequestEntity> {
        let request = self
            .withdrawal_repo
            .reject(request_id, operator_id, reason)
            .await
            .map_err(|err| {
                warn!(
                    %request_id,
                    %operator_id,
                    error = ?err,
                    "withdrawals: rejection failed"
                );
                err
            })?;

        info!(
            %request_id,
            creator_id = %request.creator_id,
            %operator_id,
            reason,
            "withdrawals: request rejected"
        );

        self.notify(
            &request,
            NotificationKind::WithdrawalRejected,
            json!({ "amount_minor": request.amount_minor, "reason": reason }),
        )
        .await;

        Ok(request)
    }

    /// Applies one action to each id independently; a failure on one id
    /// (already processed elsewhere, insufficient balance, ...) never
    /// blocks the others. No processing order is guaranteed.
    pub async fn bulk_process(
        &self,
        request_ids: Vec<Uuid>,
        action: BulkAction,
        operator_id: Uuid,
        reason: Option<String>,
    ) -> Vec<BulkItemOutcome> {
        let reason = reason.unwrap_or_else(|| DEFAULT_BULK_REJECTION_REASON.to_string());

        let outcomes = stream::iter(request_ids.into_iter().map(|request_id| {
            let reason = reason.clone();
            async move {
                let result = match action {
                    BulkAction::Approve => self.approve(request_id, operator_id).await,
                    BulkAction::Reject => self.reject(request_id, operator_id, &reason).await,
                };

                match result {
                    Ok(_) => BulkItemOutcome {
                        request_id,
                        ok: true,
                        error: None,
                    },
                    Err(err) => {
                        error!(
                            %request_id,
                            %operator_id,
                            error = ?err,
                            "withdrawals: bulk item failed; continuing with the rest"
                        );
                        BulkItemOutcome {
                            request_id,
                            ok: false,
                            error: Some(err.to_string()),
                        }
                    }
                }
            }
        }))
        .buffer_unordered(self.concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

        info!(
            %operator_id,
            total = outcomes.len(),
            succeeded = outcomes.iter().filter(|o| o.ok).count(),
            "withdrawals: bulk processing completed"
        );

        outcomes
    }

    pub async fn list_pending(&self) -> PayoutResult<Vec<WithdrawalRequestEntity>> {
        self.withdrawal_repo.list_pending().await
    }

    async fn notify(
        &self,
        request: &WithdrawalRequestEntity,
        kind: NotificationKind,
        params: serde_json::Value,
    ) {
        if let Err(err) = self.notifier.notify(request.creator_id, kind, params).await {
            warn!(
                request_id = %request.id,
                creator_id = %request.creator_id,
                error = ?err,
                "withdrawals: notification request failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::notifier::MockCreatorNotifier;
    use crate::domain::entities::creator_ledgers::CreatorLedgerEntity;
    use crate::domain::repositories::ledger::MockLedgerRepository;
    use crate::domain::repositories::withdrawal_request::MockWithdrawalRequestRepository;
    use crate::domain::value_objects::enums::withdrawal_methods::WithdrawalMethod;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn ledger_with_available(creator_id: Uuid, available_minor: i64) -> CreatorLedgerEntity {
        CreatorLedgerEntity {
            creator_id,
            total_earnings_minor: available_minor,
            locked_balance_minor: 0,
            available_balance_minor: available_minor,
            total_withdrawn_minor: 0,
            updated_at: Utc::now(),
        }
    }

    fn pending_request(creator_id: Uuid, amount_minor: i64) -> WithdrawalRequestEntity {
        WithdrawalRequestEntity {
            id: Uuid::new_v4(),
            creator_id,
            amount_minor,
            method: WithdrawalMethod::Paypal.to_string(),
            details: json!({ "email": "creator@example.com" }),
            status: WithdrawalStatus::Pending.to_string(),
            requested_at: Utc::now(),
            processed_at: None,
            processed_by: None,
            rejection_reason: None,
        }
    }

    fn approved(request: &WithdrawalRequestEntity, operator_id: Uuid) -> WithdrawalRequestEntity {
        WithdrawalRequestEntity {
            status: WithdrawalStatus::Approved.to_string(),
            processed_at: Some(Utc::now()),
            processed_by: Some(operator_id),
            ..request.clone()
        }
    }

    fn request_model(amount_minor: i64) -> RequestWithdrawalModel {
        RequestWithdrawalModel {
            amount_minor,
            method: WithdrawalMethod::Paypal,
            details: json!({ "email": "creator@example.com" }),
        }
    }

    fn usecase(
        withdrawal_repo: MockWithdrawalRequestRepository,
        ledger_repo: MockLedgerRepository,
        notifier: MockCreatorNotifier,
    ) -> WithdrawalUseCase {
        WithdrawalUseCase::new(
            Arc::new(withdrawal_repo),
            Arc::new(ledger_repo),
            Arc::new(notifier),
            500,
            4,
        )
    }

    #[tokio::test]
    async fn request_is_created_pending_with_the_submitted_fields() {
        let creator_id = Uuid::new_v4();

        let mut ledger_repo = MockLedgerRepository::new();
        ledger_repo
            .expect_find_by_creator()
            .with(eq(creator_id))
            .returning(move |creator_id| {
                Box::pin(async move { Ok(ledger_with_available(creator_id, 1250)) })
            });

        let mut withdrawal_repo = MockWithdrawalRequestRepository::new();
        withdrawal_repo
            .expect_create()
            .withf(move |entity| {
                entity.creator_id == creator_id
                    && entity.amount_minor == 1000
                    && entity.method == "paypal"
                    && entity.status == "pending"
            })
            .returning(|entity| {
                Box::pin(async move {
                    Ok(WithdrawalRequestEntity {
                        id: entity.id,
                        creator_id: entity.creator_id,
                        amount_minor: entity.amount_minor,
                        method: entity.method,
                        details: entity.details,
                        status: entity.status,
                        requested_at: Utc::now(),
                        processed_at: None,
                        processed_by: None,
                        rejection_reason: None,
                    })
                })
            });

        let notifier = MockCreatorNotifier::new();

        let request = usecase(withdrawal_repo, ledger_repo, notifier)
            .request_withdrawal(creator_id, request_model(1000))
            .await
            .unwrap();

        assert_eq!(request.status, "pending");
        assert_eq!(request.amount_minor, 1000);
    }

    #[tokio::test]
    async fn request_below_minimum_is_rejected() {
        let withdrawal_repo = MockWithdrawalRequestRepository::new();
        let ledger_repo = MockLedgerRepository::new();
        let notifier = MockCreatorNotifier::new();

        let result = usecase(withdrawal_repo, ledger_repo, notifier)
            .request_withdrawal(Uuid::new_v4(), request_model(499))
            .await;

        assert!(matches!(
            result,
            Err(PayoutError::BelowMinimum { minimum_minor: 500 })
        ));
    }

    #[tokio::test]
    async fn request_beyond_available_balance_is_rejected() {
        let creator_id = Uuid::new_v4();

        let mut ledger_repo = MockLedgerRepository::new();
        ledger_repo
            .expect_find_by_creator()
            .returning(move |creator_id| {
                Box::pin(async move { Ok(ledger_with_available(creator_id, 900)) })
            });

        let withdrawal_repo = MockWithdrawalRequestRepository::new();
        let notifier = MockCreatorNotifier::new();

        let result = usecase(withdrawal_repo, ledger_repo, notifier)
            .request_withdrawal(creator_id, request_model(1000))
            .await;

        assert!(matches!(result, Err(PayoutError::InsufficientAvailable)));
    }

    #[tokio::test]
    async fn approval_debits_and_marks_the_request() {
        let creator_id = Uuid::new_v4();
        let operator_id = Uuid::new_v4();
        let request = pending_request(creator_id, 1000);
        let approved_request = approved(&request, operator_id);

        let mut withdrawal_repo = MockWithdrawalRequestRepository::new();
        withdrawal_repo
            .expect_approve()
            .with(eq(request.id), eq(operator_id))
            .returning(move |_, _| {
                let approved_request = approved_request.clone();
                Box::pin(async move { Ok(approved_request) })
            });

        let ledger_repo = MockLedgerRepository::new();

        let mut notifier = MockCreatorNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let result = usecase(withdrawal_repo, ledger_repo, notifier)
            .approve(request.id, operator_id)
            .await
            .unwrap();

        assert_eq!(result.status, "approved");
        assert_eq!(result.processed_by, Some(operator_id));
    }

    #[tokio::test]
    async fn approval_with_insufficient_balance_leaves_request_pending() {
        let mut withdrawal_repo = MockWithdrawalRequestRepository::new();
        withdrawal_repo
            .expect_approve()
            .returning(|_, _| Box::pin(async { Err(PayoutError::InsufficientAvailable) }));

        let ledger_repo = MockLedgerRepository::new();
        let mut notifier = MockCreatorNotifier::new();
        notifier.expect_notify().never();

        let result = usecase(withdrawal_repo, ledger_repo, notifier)
            .approve(Uuid::new_v4(), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(PayoutError::InsufficientAvailable)));
    }

    #[tokio::test]
    async fn terminal_request_cannot_be_processed_again() {
        let mut withdrawal_repo = MockWithdrawalRequestRepository::new();
        withdrawal_repo
            .expect_approve()
            .returning(|_, _| Box::pin(async { Err(PayoutError::AlreadyProcessed) }));

        let ledger_repo = MockLedgerRepository::new();
        let mut notifier = MockCreatorNotifier::new();
        notifier.expect_notify().never();

        let result = usecase(withdrawal_repo, ledger_repo, notifier)
            .approve(Uuid::new_v4(), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(PayoutError::AlreadyProcessed)));
    }

    #[tokio::test]
    async fn rejection_records_the_reason_without_ledger_change() {
        let creator_id = Uuid::new_v4();
        let operator_id = Uuid::new_v4();
        let request = pending_request(creator_id, 1000);

        let mut withdrawal_repo = MockWithdrawalRequestRepository::new();
        let rejected = WithdrawalRequestEntity {
            status: WithdrawalStatus::Rejected.to_string(),
            processed_at: Some(Utc::now()),
            processed_by: Some(operator_id),
            rejection_reason: Some("details mismatch".to_string()),
            ..request.clone()
        };
        let request_id = request.id;
        withdrawal_repo
            .expect_reject()
            .withf(move |id, op, reason| {
                *id == request_id && *op == operator_id && reason == "details mismatch"
            })
            .returning(move |_, _, _| {
                let rejected = rejected.clone();
                Box::pin(async move { Ok(rejected) })
            });

        let ledger_repo = MockLedgerRepository::new();

        let mut notifier = MockCreatorNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let result = usecase(withdrawal_repo, ledger_repo, notifier)
            .reject(request.id, operator_id, "details mismatch")
            .await
            .unwrap();

        assert_eq!(result.status, "rejected");
        assert_eq!(result.rejection_reason.as_deref(), Some("details mismatch"));
    }

    #[tokio::test]
    async fn bulk_processing_reports_one_outcome_per_id() {
        let operator_id = Uuid::new_v4();
        let healthy = Uuid::new_v4();
        let already_processed = Uuid::new_v4();

        let mut withdrawal_repo = MockWithdrawalRequestRepository::new();
        withdrawal_repo
            .expect_approve()
            .returning(move |request_id, operator_id| {
                Box::pin(async move {
                    if request_id == already_processed {
                        Err(PayoutError::AlreadyProcessed)
                    } else {
                        Ok(approved(&pending_request(Uuid::new_v4(), 800), operator_id))
                    }
                })
            });

        let ledger_repo = MockLedgerRepository::new();

        let mut notifier = MockCreatorNotifier::new();
        notifier
            .expect_notify()
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let outcomes = usecase(withdrawal_repo, ledger_repo, notifier)
            .bulk_process(
                vec![healthy, already_processed],
                BulkAction::Approve,
                operator_id,
                None,
            )
            .await;

        assert_eq!(outcomes.len(), 2);
        let ok = outcomes.iter().find(|o| o.request_id == healthy).unwrap();
        let failed = outcomes
            .iter()
            .find(|o| o.request_id == already_processed)
            .unwrap();
        assert!(ok.ok);
        assert!(!failed.ok);
        assert!(failed.error.is_some());
    }
}
