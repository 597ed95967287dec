use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    application::usecases::{
        accrual_ingest::AccrualIngestUseCase, lock_unlocker::LockUnlockerUseCase,
        onboarding::OnboardingUseCase, reconciliation::ReconciliationUseCase,
        report_generation::ReportGenerationUseCase, withdrawals::WithdrawalUseCase,
    },
    config::config_model::DotEnvyConfig,
    domain::repositories::audit_log::AuditLogRepository,
    infrastructure::axum_http::{default_routers, routers},
};

pub struct AppUseCases {
    pub accrual_ingest: Arc<AccrualIngestUseCase>,
    pub onboarding: Arc<OnboardingUseCase>,
    pub withdrawals: Arc<WithdrawalUseCase>,
    pub report_generation: Arc<ReportGenerationUseCase>,
    pub lock_unlocker: Arc<LockUnlockerUseCase>,
    pub reconciliation: Arc<ReconciliationUseCase>,
    pub audit_log: Arc<dyn AuditLogRepository + Send + Sync>,
}

pub async fn start(config: Arc<DotEnvyConfig>, usecases: AppUseCases) -> Result<()> {
    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/internal/v1/accruals",
            routers::accruals::routes(Arc::clone(&config), usecases.accrual_ingest),
        )
        .nest(
            "/api/v1/creators",
            routers::creators::routes(usecases.onboarding),
        )
        .nest(
            "/api/v1/withdrawals",
            routers::withdrawals::routes(usecases.withdrawals),
        )
        .nest(
            "/api/v1/reports",
            routers::reports::routes(usecases.report_generation, usecases.lock_unlocker),
        )
        .nest(
            "/api/v1/reconciliation",
            routers::reconciliation::routes(usecases.reconciliation, usecases.audit_log),
        )
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
