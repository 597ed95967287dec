#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub payout: PayoutPolicy,
    pub accrual_feed: AccrualFeed,
    pub scheduler: Scheduler,
    pub notifications: Notifications,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct PayoutPolicy {
    /// Days a report's payout stays in the locked balance before the sweep
    /// may move it to available.
    pub lock_period_days: i64,
    pub minimum_withdrawal_minor: i64,
    /// Upper bound on per-item parallelism inside batch jobs.
    pub batch_concurrency: usize,
}

#[derive(Debug, Clone)]
pub struct AccrualFeed {
    /// Shared bearer token for the internal accrual endpoints; unset
    /// disables the feed surface entirely.
    pub internal_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    pub rollover_interval_secs: u64,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Notifications {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthSecret {
    pub secret: String,
}
