//! Background loops for the two batch triggers: period rollover (report
//! generation) and the daily unlock sweep. Every run is idempotent, so an
//! interrupted loop simply catches up on its next tick.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info};

use crate::application::usecases::{
    lock_unlocker::LockUnlockerUseCase, report_generation::ReportGenerationUseCase,
};
use crate::domain::value_objects::periods::Period;

/// Generates reports for the most recently completed period on every tick.
/// Creators already reported are skipped by the uniqueness guard, so running
/// well inside the month is cheap and a crashed run heals itself.
pub async fn run_report_rollover_loop(
    usecase: Arc<ReportGenerationUseCase>,
    interval: Duration,
) -> Result<()> {
    loop {
        let period = Period::preceding(Utc::now());

        match usecase.run(period).await {
            Ok(tally) => {
                if tally.generated > 0 || !tally.failed.is_empty() {
                    info!(
                        period = %tally.period,
                        generated = tally.generated,
                        failed = tally.failed.len(),
                        "scheduler: rollover tick finished"
                    );
                }
            }
            Err(e) => error!("Error while generating reports for {}: {}", period, e),
        }

        tokio::time::sleep(interval).await;
    }
}

pub async fn run_unlock_sweep_loop(
    usecase: Arc<LockUnlockerUseCase>,
    interval: Duration,
) -> Result<()> {
    loop {
        match usecase.sweep(Utc::now()).await {
            Ok(tally) => {
                if tally.due > 0 {
                    info!(
                        unlocked = tally.unlocked,
                        failed = tally.failed.len(),
                        "scheduler: unlock sweep tick finished"
                    );
                }
            }
            Err(e) => error!("Error while sweeping locked reports: {}", e),
        }

        tokio::time::sleep(interval).await;
    }
}
