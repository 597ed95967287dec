use anyhow::{Ok, Result};

use super::config_model::{
    AccrualFeed, AuthSecret, BackendServer, Database, DotEnvyConfig, Notifications, PayoutPolicy,
    Scheduler,
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: std::env::var("SERVER_PORT_BACKEND")
            .expect("SERVER_PORT_BACKEND is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let payout = PayoutPolicy {
        lock_period_days: std::env::var("PAYOUT_LOCK_PERIOD_DAYS")
            .unwrap_or_else(|_| "90".to_string())
            .parse()?,
        minimum_withdrawal_minor: std::env::var("PAYOUT_MINIMUM_WITHDRAWAL_MINOR")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()?,
        batch_concurrency: std::env::var("PAYOUT_BATCH_CONCURRENCY")
            .unwrap_or_else(|_| "8".to_string())
            .parse()?,
    };

    let accrual_feed = AccrualFeed {
        internal_token: std::env::var("ACCRUAL_FEED_TOKEN").ok(),
    };

    let scheduler = Scheduler {
        rollover_interval_secs: std::env::var("SCHEDULER_ROLLOVER_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()?,
        sweep_interval_secs: std::env::var("SCHEDULER_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()?,
    };

    let notifications = Notifications {
        webhook_url: std::env::var("NOTIFY_WEBHOOK_URL").ok(),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        payout,
        accrual_feed,
        scheduler,
        notifications,
    })
}

pub fn get_auth_secret() -> Result<AuthSecret> {
    dotenvy::dotenv().ok();

    Ok(AuthSecret {
        secret: std::env::var("JWT_AUTH_SECRET").expect("JWT_AUTH_SECRET is invalid"),
    })
}
