use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info};
use url::Url;

use creator_payouts::application::notifier::{CreatorNotifier, WebhookNotifier};
use creator_payouts::application::usecases::{
    accrual_ingest::AccrualIngestUseCase, lock_unlocker::LockUnlockerUseCase,
    onboarding::OnboardingUseCase, reconciliation::ReconciliationUseCase,
    report_generation::ReportGenerationUseCase, withdrawals::WithdrawalUseCase,
};
use creator_payouts::config::config_loader;
use creator_payouts::domain::repositories::{
    audit_log::AuditLogRepository, creators::CreatorRepository, ledger::LedgerRepository,
    monthly_report::MonthlyReportRepository, video_accrual::VideoAccrualRepository,
    withdrawal_request::WithdrawalRequestRepository,
};
use creator_payouts::infrastructure::axum_http::http_serve::{self, AppUseCases};
use creator_payouts::infrastructure::postgres::postgres_connection;
use creator_payouts::infrastructure::postgres::repositories::{
    audit_log::AuditLogPostgres, creators::CreatorPostgres, ledger::LedgerPostgres,
    monthly_report::MonthlyReportPostgres, video_accrual::VideoAccrualPostgres,
    withdrawal_request::WithdrawalRequestPostgres,
};
use creator_payouts::observability;
use creator_payouts::scheduler;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Backend exited with error: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("backend")?;

    let dotenvy_env = Arc::new(config_loader::load()?);
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool_arc = Arc::new(postgres_pool);

    let creator_repository: Arc<dyn CreatorRepository + Send + Sync> =
        Arc::new(CreatorPostgres::new(Arc::clone(&db_pool_arc)));
    let ledger_repository: Arc<dyn LedgerRepository + Send + Sync> =
        Arc::new(LedgerPostgres::new(Arc::clone(&db_pool_arc)));
    let report_repository: Arc<dyn MonthlyReportRepository + Send + Sync> =
        Arc::new(MonthlyReportPostgres::new(Arc::clone(&db_pool_arc)));
    let withdrawal_repository: Arc<dyn WithdrawalRequestRepository + Send + Sync> =
        Arc::new(WithdrawalRequestPostgres::new(Arc::clone(&db_pool_arc)));
    let accrual_repository: Arc<dyn VideoAccrualRepository + Send + Sync> =
        Arc::new(VideoAccrualPostgres::new(Arc::clone(&db_pool_arc)));
    let audit_log_repository: Arc<dyn AuditLogRepository + Send + Sync> =
        Arc::new(AuditLogPostgres::new(Arc::clone(&db_pool_arc)));

    let webhook_url = match dotenvy_env.notifications.webhook_url.as_deref() {
        Some(raw) => Some(Url::parse(raw)?),
        None => None,
    };
    let notifier: Arc<dyn CreatorNotifier + Send + Sync> =
        Arc::new(WebhookNotifier::new(webhook_url));

    let payout = &dotenvy_env.payout;

    let report_generation_usecase = Arc::new(ReportGenerationUseCase::new(
        Arc::clone(&creator_repository),
        Arc::clone(&report_repository),
        Arc::clone(&notifier),
        payout.lock_period_days,
        payout.batch_concurrency,
    ));
    let lock_unlocker_usecase = Arc::new(LockUnlockerUseCase::new(
        Arc::clone(&report_repository),
        Arc::clone(&notifier),
        payout.batch_concurrency,
    ));
    let withdrawal_usecase = Arc::new(WithdrawalUseCase::new(
        Arc::clone(&withdrawal_repository),
        Arc::clone(&ledger_repository),
        Arc::clone(&notifier),
        payout.minimum_withdrawal_minor,
        payout.batch_concurrency,
    ));
    let accrual_ingest_usecase = Arc::new(AccrualIngestUseCase::new(
        Arc::clone(&accrual_repository),
        Arc::clone(&creator_repository),
    ));
    let onboarding_usecase = Arc::new(OnboardingUseCase::new(Arc::clone(&creator_repository)));
    let reconciliation_usecase = Arc::new(ReconciliationUseCase::new(
        Arc::clone(&ledger_repository),
        Arc::clone(&report_repository),
        Arc::clone(&withdrawal_repository),
    ));

    let rollover_loop = tokio::spawn(scheduler::run_report_rollover_loop(
        Arc::clone(&report_generation_usecase),
        Duration::from_secs(dotenvy_env.scheduler.rollover_interval_secs),
    ));
    let sweep_loop = tokio::spawn(scheduler::run_unlock_sweep_loop(
        Arc::clone(&lock_unlocker_usecase),
        Duration::from_secs(dotenvy_env.scheduler.sweep_interval_secs),
    ));

    let server_config = Arc::clone(&dotenvy_env);
    let server = tokio::spawn(async move {
        http_serve::start(
            server_config,
            AppUseCases {
                accrual_ingest: accrual_ingest_usecase,
                onboarding: onboarding_usecase,
                withdrawals: withdrawal_usecase,
                report_generation: report_generation_usecase,
                lock_unlocker: lock_unlocker_usecase,
                reconciliation: reconciliation_usecase,
                audit_log: audit_log_repository,
            },
        )
        .await
    });

    tokio::select! {
        result = server => result??,
        result = rollover_loop => result??,
        result = sweep_loop => result??,
    };

    Ok(())
}
