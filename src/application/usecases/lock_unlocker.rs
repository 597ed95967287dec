use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::{StreamExt, stream};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::notifier::{CreatorNotifier, NotificationKind};
use crate::domain::entities::monthly_reports::MonthlyReportEntity;
use crate::domain::errors::{PayoutError, PayoutResult};
use crate::domain::repositories::monthly_report::MonthlyReportRepository;
use crate::domain::value_objects::batch::{ItemFailure, UnlockSweepTally};
use crate::domain::value_objects::reports::UnlockActor;

/// Daily batch job moving elapsed reports from locked to available, plus
/// the operator-triggered unlock of a single report. Both paths funnel into
/// the same transactional unlock, so an overlapping sweep and manual action
/// produce exactly one ledger credit.
pub struct LockUnlockerUseCase {
    report_repo: Arc<dyn MonthlyReportRepository + Send + Sync>,
    notifier: Arc<dyn CreatorNotifier + Send + Sync>,
    concurrency: usize,
}

impl LockUnlockerUseCase {
    pub fn new(
        report_repo: Arc<dyn MonthlyReportRepository + Send + Sync>,
        notifier: Arc<dyn CreatorNotifier + Send + Sync>,
        concurrency: usize,
    ) -> Self {
        Self {
            report_repo,
            notifier,
            concurrency,
        }
    }

    pub async fn sweep(&self, now: DateTime<Utc>) -> PayoutResult<UnlockSweepTally> {
        let due = self.report_repo.list_due_for_unlock(now).await.map_err(|err| {
            error!(error = ?err, "lock_unlocker: failed to list due reports");
            err
        })?;

        let mut tally = UnlockSweepTally {
            due: due.len(),
            ..Default::default()
        };
        info!(due = tally.due, "lock_unlocker: sweep started");

        let outcomes = stream::iter(due.into_iter().map(|report| {
            let report_id = report.id;
            async move {
                let result = self.unlock_and_notify(report_id, UnlockActor::Sweep).await;
                (report_id, result)
            }
        }))
        .buffer_unordered(self.concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

        for (report_id, result) in outcomes {
            match result {
                Ok(_) => tally.unlocked += 1,
                // Lost the race against a manual unlock; the money moved
                // exactly once, so nothing to record.
                Err(PayoutError::AlreadyProcessed) => tally.already_unlocked += 1,
                Err(err) => {
                    if matches!(err, PayoutError::InsufficientLocked) {
                        error!(
                            %report_id,
                            "lock_unlocker: locked balance below report payout; record needs manual audit review"
                        );
                    } else {
                        error!(
                            %report_id,
                            error = ?err,
                            "lock_unlocker: unlock failed; continuing with the rest"
                        );
                    }
                    tally.failed.push(ItemFailure {
                        id: report_id,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            due = tally.due,
            unlocked = tally.unlocked,
            already_unlocked = tally.already_unlocked,
            failed = tally.failed.len(),
            "lock_unlocker: sweep completed"
        );

        Ok(tally)
    }

    /// Operator-triggered unlock of a single report. Unlike the sweep this
    /// surfaces `AlreadyProcessed` and `StillLocked` to the caller.
    pub async fn manual_unlock(
        &self,
        report_id: Uuid,
        operator_id: Uuid,
    ) -> PayoutResult<MonthlyReportEntity> {
        info!(%report_id, %operator_id, "lock_unlocker: manual unlock requested");

        let report = self
            .unlock_and_notify(report_id, UnlockActor::Operator(operator_id))
            .await
            .map_err(|err| {
                warn!(
                    %report_id,
                    %operator_id,
                    error = ?err,
                    "lock_unlocker: manual unlock rejected"
                );
                err
            })?;

        info!(
            %report_id,
            creator_id = %report.creator_id,
            payout_minor = report.payout_minor,
            "lock_unlocker: manual unlock completed"
        );

        Ok(report)
    }

    async fn unlock_and_notify(
        &self,
        report_id: Uuid,
        actor: UnlockActor,
    ) -> PayoutResult<MonthlyReportEntity> {
        let report = self.report_repo.unlock(report_id, actor).await?;

        if let Err(err) = self
            .notifier
            .notify(
                report.creator_id,
                NotificationKind::ReportUnlocked,
                json!({
                    "period": report.period,
                    "payout_minor": report.payout_minor,
                }),
            )
            .await
        {
            warn!(
                %report_id,
                creator_id = %report.creator_id,
                error = ?err,
                "lock_unlocker: notification request failed"
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::notifier::MockCreatorNotifier;
    use crate::domain::repositories::monthly_report::MockMonthlyReportRepository;
    use crate::domain::value_objects::enums::report_statuses::ReportStatus;
    use chrono::Duration;
    use mockall::predicate::eq;

    fn locked_report(payout_minor: i64) -> MonthlyReportEntity {
        let now = Utc::now();
        MonthlyReportEntity {
            id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            period: "2026-04".to_string(),
            payout_minor,
            status: ReportStatus::Locked.to_string(),
            locked_until: now - Duration::days(1),
            unlocked_at: None,
            unlocked_by: None,
            video_breakdown: json!([]),
            created_at: now - Duration::days(91),
        }
    }

    fn unlocked(report: &MonthlyReportEntity, actor: UnlockActor) -> MonthlyReportEntity {
        MonthlyReportEntity {
            status: ReportStatus::Unlocked.to_string(),
            unlocked_at: Some(Utc::now()),
            unlocked_by: Some(actor.audit_actor()),
            ..report.clone()
        }
    }

    fn usecase(
        report_repo: MockMonthlyReportRepository,
        notifier: MockCreatorNotifier,
    ) -> LockUnlockerUseCase {
        LockUnlockerUseCase::new(Arc::new(report_repo), Arc::new(notifier), 4)
    }

    #[tokio::test]
    async fn sweep_unlocks_each_due_report_once() {
        let report = locked_report(1250);
        let due = vec![report.clone()];

        let mut report_repo = MockMonthlyReportRepository::new();
        report_repo
            .expect_list_due_for_unlock()
            .returning(move |_| {
                let due = due.clone();
                Box::pin(async move { Ok(due) })
            });
        let unlocked_report = unlocked(&report, UnlockActor::Sweep);
        report_repo
            .expect_unlock()
            .with(eq(report.id), eq(UnlockActor::Sweep))
            .times(1)
            .returning(move |_, _| {
                let unlocked_report = unlocked_report.clone();
                Box::pin(async move { Ok(unlocked_report) })
            });

        let mut notifier = MockCreatorNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let tally = usecase(report_repo, notifier).sweep(Utc::now()).await.unwrap();

        assert_eq!(tally.due, 1);
        assert_eq!(tally.unlocked, 1);
        assert_eq!(tally.already_unlocked, 0);
        assert!(tally.failed.is_empty());
    }

    #[tokio::test]
    async fn sweep_treats_concurrent_unlock_as_benign() {
        let report = locked_report(1250);
        let due = vec![report.clone()];

        let mut report_repo = MockMonthlyReportRepository::new();
        report_repo
            .expect_list_due_for_unlock()
            .returning(move |_| {
                let due = due.clone();
                Box::pin(async move { Ok(due) })
            });
        report_repo
            .expect_unlock()
            .returning(|_, _| Box::pin(async { Err(PayoutError::AlreadyProcessed) }));

        let mut notifier = MockCreatorNotifier::new();
        notifier.expect_notify().never();

        let tally = usecase(report_repo, notifier).sweep(Utc::now()).await.unwrap();

        assert_eq!(tally.unlocked, 0);
        assert_eq!(tally.already_unlocked, 1);
        assert!(tally.failed.is_empty());
    }

    #[tokio::test]
    async fn sweep_records_ledger_inconsistency_as_failure() {
        let report = locked_report(1250);
        let report_id = report.id;
        let due = vec![report];

        let mut report_repo = MockMonthlyReportRepository::new();
        report_repo
            .expect_list_due_for_unlock()
            .returning(move |_| {
                let due = due.clone();
                Box::pin(async move { Ok(due) })
            });
        report_repo
            .expect_unlock()
            .returning(|_, _| Box::pin(async { Err(PayoutError::InsufficientLocked) }));

        let mut notifier = MockCreatorNotifier::new();
        notifier.expect_notify().never();

        let tally = usecase(report_repo, notifier).sweep(Utc::now()).await.unwrap();

        assert_eq!(tally.failed.len(), 1);
        assert_eq!(tally.failed[0].id, report_id);
    }

    #[tokio::test]
    async fn manual_unlock_propagates_still_locked() {
        let locked_until = Utc::now() + Duration::days(30);

        let mut report_repo = MockMonthlyReportRepository::new();
        report_repo
            .expect_unlock()
            .returning(move |_, _| Box::pin(async move { Err(PayoutError::StillLocked(locked_until)) }));

        let mut notifier = MockCreatorNotifier::new();
        notifier.expect_notify().never();

        let result = usecase(report_repo, notifier)
            .manual_unlock(Uuid::new_v4(), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(PayoutError::StillLocked(_))));
    }

    #[tokio::test]
    async fn manual_unlock_surfaces_already_processed_as_error() {
        let mut report_repo = MockMonthlyReportRepository::new();
        report_repo
            .expect_unlock()
            .returning(|_, _| Box::pin(async { Err(PayoutError::AlreadyProcessed) }));

        let mut notifier = MockCreatorNotifier::new();
        notifier.expect_notify().never();

        let result = usecase(report_repo, notifier)
            .manual_unlock(Uuid::new_v4(), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(PayoutError::AlreadyProcessed)));
    }

    #[tokio::test]
    async fn manual_unlock_records_the_operator() {
        let operator_id = Uuid::new_v4();
        let report = locked_report(700);
        let expected = unlocked(&report, UnlockActor::Operator(operator_id));

        let mut report_repo = MockMonthlyReportRepository::new();
        let returned = expected.clone();
        report_repo
            .expect_unlock()
            .with(eq(report.id), eq(UnlockActor::Operator(operator_id)))
            .returning(move |_, _| {
                let returned = returned.clone();
                Box::pin(async move { Ok(returned) })
            });

        let mut notifier = MockCreatorNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let result = usecase(report_repo, notifier)
            .manual_unlock(report.id, operator_id)
            .await
            .unwrap();

        assert_eq!(result.unlocked_by, Some(operator_id.to_string()));
    }
}
