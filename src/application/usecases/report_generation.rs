use std::sync::Arc;

use chrono::{Duration, Utc};
use futures_util::{StreamExt, stream};
use serde_json::json;
use tracing::{error, info, warn};

use crate::application::notifier::{CreatorNotifier, NotificationKind};
use crate::domain::errors::{PayoutError, PayoutResult};
use crate::domain::repositories::creators::CreatorRepository;
use crate::domain::repositories::monthly_report::MonthlyReportRepository;
use crate::domain::value_objects::batch::{ItemFailure, ReportGenerationTally};
use crate::domain::value_objects::periods::Period;

/// Monthly batch job: one immutable report per creator per period, with the
/// payout credited into the locked balance. Creators are processed
/// independently; one creator's failure never aborts the run, and a retried
/// run skips creators whose report already exists.
pub struct ReportGenerationUseCase {
    creator_repo: Arc<dyn CreatorRepository + Send + Sync>,
    report_repo: Arc<dyn MonthlyReportRepository + Send + Sync>,
    notifier: Arc<dyn CreatorNotifier + Send + Sync>,
    lock_period_days: i64,
    concurrency: usize,
}

impl ReportGenerationUseCase {
    pub fn new(
        creator_repo: Arc<dyn CreatorRepository + Send + Sync>,
        report_repo: Arc<dyn MonthlyReportRepository + Send + Sync>,
        notifier: Arc<dyn CreatorNotifier + Send + Sync>,
        lock_period_days: i64,
        concurrency: usize,
    ) -> Self {
        Self {
            creator_repo,
            report_repo,
            notifier,
            lock_period_days,
            concurrency,
        }
    }

    pub async fn run(&self, period: Period) -> PayoutResult<ReportGenerationTally> {
        let period_label = period.to_string();
        info!(period = %period_label, "report_generation: run started");

        let creator_ids = self.creator_repo.list_active_ids().await.map_err(|err| {
            error!(error = ?err, "report_generation: failed to list creators");
            err
        })?;

        let locked_until = Utc::now() + Duration::days(self.lock_period_days);

        let outcomes = stream::iter(creator_ids.into_iter().map(|creator_id| {
            let period_label = period_label.clone();
            async move {
                let result = self
                    .report_repo
                    .generate_for_creator(creator_id, &period_label, locked_until)
                    .await;

                if let Ok(Some(report)) = &result {
                    info!(
                        %creator_id,
                        period = %report.period,
                        payout_minor = report.payout_minor,
                        "report_generation: report generated"
                    );
                    if let Err(err) = self
                        .notifier
                        .notify(
                            creator_id,
                            NotificationKind::ReportGenerated,
                            json!({
                                "period": report.period,
                                "payout_minor": report.payout_minor,
                            }),
                        )
                        .await
                    {
                        warn!(
                            %creator_id,
                            error = ?err,
                            "report_generation: notification request failed"
                        );
                    }
                }

                (creator_id, result)
            }
        }))
        .buffer_unordered(self.concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

        let mut tally = ReportGenerationTally {
            period: period_label.clone(),
            ..Default::default()
        };

        for (creator_id, result) in outcomes {
            match result {
                Ok(Some(_)) => tally.generated += 1,
                Ok(None) => tally.skipped_empty += 1,
                Err(PayoutError::AlreadyProcessed) => tally.skipped_existing += 1,
                Err(err) => {
                    error!(
                        %creator_id,
                        period = %period_label,
                        error = ?err,
                        "report_generation: creator failed; continuing with the rest"
                    );
                    tally.failed.push(ItemFailure {
                        id: creator_id,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            period = %period_label,
            generated = tally.generated,
            skipped_existing = tally.skipped_existing,
            skipped_empty = tally.skipped_empty,
            failed = tally.failed.len(),
            "report_generation: run completed"
        );

        Ok(tally)
    }
}
