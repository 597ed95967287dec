use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::errors::PayoutResult;
use crate::domain::repositories::ledger::LedgerRepository;
use crate::domain::repositories::monthly_report::MonthlyReportRepository;
use crate::domain::repositories::withdrawal_request::WithdrawalRequestRepository;
use crate::domain::value_objects::reconciliation::{
    CreatorPayoutTotals, LedgerDrift, ReconciliationReport,
};

/// Read-only consistency sweep, off the hot path. Recomputes each creator's
/// totals from the report and withdrawal tables and compares them to the
/// stored ledger. Mismatches are reported for manual audit-log review,
/// never auto-corrected.
pub struct ReconciliationUseCase {
    ledger_repo: Arc<dyn LedgerRepository + Send + Sync>,
    report_repo: Arc<dyn MonthlyReportRepository + Send + Sync>,
    withdrawal_repo: Arc<dyn WithdrawalRequestRepository + Send + Sync>,
}

impl ReconciliationUseCase {
    pub fn new(
        ledger_repo: Arc<dyn LedgerRepository + Send + Sync>,
        report_repo: Arc<dyn MonthlyReportRepository + Send + Sync>,
        withdrawal_repo: Arc<dyn WithdrawalRequestRepository + Send + Sync>,
    ) -> Self {
        Self {
            ledger_repo,
            report_repo,
            withdrawal_repo,
        }
    }

    pub async fn run(&self) -> PayoutResult<ReconciliationReport> {
        let ledgers = self.ledger_repo.list_all().await?;
        let payout_totals: HashMap<Uuid, CreatorPayoutTotals> = self
            .report_repo
            .payout_totals()
            .await?
            .into_iter()
            .map(|totals| (totals.creator_id, totals))
            .collect();
        let approved_totals: HashMap<Uuid, i64> = self
            .withdrawal_repo
            .approved_totals()
            .await?
            .into_iter()
            .map(|totals| (totals.creator_id, totals.approved_minor))
            .collect();

        let mut report = ReconciliationReport {
            checked: ledgers.len(),
            ..Default::default()
        };

        for ledger in ledgers {
            let totals = payout_totals.get(&ledger.creator_id);
            let reported_minor = totals.map(|t| t.reported_minor).unwrap_or(0);
            let unlocked_minor = totals.map(|t| t.unlocked_minor).unwrap_or(0);
            let approved_minor = approved_totals
                .get(&ledger.creator_id)
                .copied()
                .unwrap_or(0);
            let expected_available_minor = unlocked_minor - approved_minor;

            let earnings_drift = reported_minor != ledger.total_earnings_minor;
            let available_drift = expected_available_minor != ledger.available_balance_minor;

            if earnings_drift || available_drift {
                warn!(
                    creator_id = %ledger.creator_id,
                    total_earnings_minor = ledger.total_earnings_minor,
                    reported_payout_minor = reported_minor,
                    available_balance_minor = ledger.available_balance_minor,
                    expected_available_minor,
                    "reconciliation: ledger drift detected; manual audit review required"
                );
                report.drifts.push(LedgerDrift {
                    creator_id: ledger.creator_id,
                    total_earnings_minor: ledger.total_earnings_minor,
                    reported_payout_minor: reported_minor,
                    available_balance_minor: ledger.available_balance_minor,
                    expected_available_minor,
                });
            }
        }

        info!(
            checked = report.checked,
            drifts = report.drifts.len(),
            "reconciliation: sweep completed"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::creator_ledgers::CreatorLedgerEntity;
    use crate::domain::repositories::ledger::MockLedgerRepository;
    use crate::domain::repositories::monthly_report::MockMonthlyReportRepository;
    use crate::domain::repositories::withdrawal_request::MockWithdrawalRequestRepository;
    use crate::domain::value_objects::reconciliation::CreatorApprovedTotals;
    use chrono::Utc;

    fn ledger(
        creator_id: Uuid,
        total: i64,
        locked: i64,
        available: i64,
        withdrawn: i64,
    ) -> CreatorLedgerEntity {
        CreatorLedgerEntity {
            creator_id,
            total_earnings_minor: total,
            locked_balance_minor: locked,
            available_balance_minor: available,
            total_withdrawn_minor: withdrawn,
            updated_at: Utc::now(),
        }
    }

    fn usecase(
        ledger_repo: MockLedgerRepository,
        report_repo: MockMonthlyReportRepository,
        withdrawal_repo: MockWithdrawalRequestRepository,
    ) -> ReconciliationUseCase {
        ReconciliationUseCase::new(
            Arc::new(ledger_repo),
            Arc::new(report_repo),
            Arc::new(withdrawal_repo),
        )
    }

    #[tokio::test]
    async fn consistent_ledger_produces_no_drift() {
        let creator_id = Uuid::new_v4();

        let mut ledger_repo = MockLedgerRepository::new();
        ledger_repo.expect_list_all().returning(move || {
            Box::pin(async move { Ok(vec![ledger(creator_id, 5000, 2000, 2000, 1000)]) })
        });

        let mut report_repo = MockMonthlyReportRepository::new();
        report_repo.expect_payout_totals().returning(move || {
            Box::pin(async move {
                Ok(vec![CreatorPayoutTotals {
                    creator_id,
                    reported_minor: 5000,
                    unlocked_minor: 3000,
                }])
            })
        });

        let mut withdrawal_repo = MockWithdrawalRequestRepository::new();
        withdrawal_repo.expect_approved_totals().returning(move || {
            Box::pin(async move {
                Ok(vec![CreatorApprovedTotals {
                    creator_id,
                    approved_minor: 1000,
                }])
            })
        });

        let report = usecase(ledger_repo, report_repo, withdrawal_repo)
            .run()
            .await
            .unwrap();

        assert_eq!(report.checked, 1);
        assert!(report.drifts.is_empty());
    }

    #[tokio::test]
    async fn drifting_ledger_is_reported_with_both_sides() {
        let creator_id = Uuid::new_v4();

        let mut ledger_repo = MockLedgerRepository::new();
        ledger_repo.expect_list_all().returning(move || {
            Box::pin(async move { Ok(vec![ledger(creator_id, 5000, 2000, 2500, 500)]) })
        });

        let mut report_repo = MockMonthlyReportRepository::new();
        report_repo.expect_payout_totals().returning(move || {
            Box::pin(async move {
                Ok(vec![CreatorPayoutTotals {
                    creator_id,
                    reported_minor: 4000,
                    unlocked_minor: 2000,
                }])
            })
        });

        let mut withdrawal_repo = MockWithdrawalRequestRepository::new();
        withdrawal_repo
            .expect_approved_totals()
            .returning(|| Box::pin(async { Ok(vec![]) }));

        let report = usecase(ledger_repo, report_repo, withdrawal_repo)
            .run()
            .await
            .unwrap();

        assert_eq!(report.drifts.len(), 1);
        let drift = &report.drifts[0];
        assert_eq!(drift.creator_id, creator_id);
        assert_eq!(drift.total_earnings_minor, 5000);
        assert_eq!(drift.reported_payout_minor, 4000);
        assert_eq!(drift.available_balance_minor, 2500);
        assert_eq!(drift.expected_available_minor, 2000);
    }

    #[tokio::test]
    async fn creator_with_no_reports_checks_against_zero() {
        let creator_id = Uuid::new_v4();

        let mut ledger_repo = MockLedgerRepository::new();
        ledger_repo.expect_list_all().returning(move || {
            Box::pin(async move { Ok(vec![ledger(creator_id, 0, 0, 0, 0)]) })
        });

        let mut report_repo = MockMonthlyReportRepository::new();
        report_repo
            .expect_payout_totals()
            .returning(|| Box::pin(async { Ok(vec![]) }));

        let mut withdrawal_repo = MockWithdrawalRequestRepository::new();
        withdrawal_repo
            .expect_approved_totals()
            .returning(|| Box::pin(async { Ok(vec![]) }));

        let report = usecase(ledger_repo, report_repo, withdrawal_repo)
            .run()
            .await
            .unwrap();

        assert!(report.drifts.is_empty());
    }
}
