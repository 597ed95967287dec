use std::fmt::Display;
use std::time::Duration;

use anyhow::{Result as AnyResult, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    ReportGenerated,
    ReportUnlocked,
    WithdrawalApproved,
    WithdrawalRejected,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ReportGenerated => "report_generated",
            NotificationKind::ReportUnlocked => "report_unlocked",
            NotificationKind::WithdrawalApproved => "withdrawal_approved",
            NotificationKind::WithdrawalRejected => "withdrawal_rejected",
        }
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound seam to the notification collaborator. Delivery and message
/// formatting live outside the core; callers treat failures as log-only and
/// never let them fail the triggering operation.
#[async_trait]
#[mockall::automock]
pub trait CreatorNotifier: Send + Sync {
    async fn notify(
        &self,
        creator_id: Uuid,
        kind: NotificationKind,
        params: serde_json::Value,
    ) -> AnyResult<()>;
}

/// Posts notification requests to a configured webhook. With no URL
/// configured the notifier degrades to a debug log, which keeps local and
/// test environments free of network traffic.
pub struct WebhookNotifier {
    webhook_url: Option<Url>,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: Option<Url>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .expect("reqwest client must build");

        Self {
            webhook_url,
            client,
        }
    }
}

#[async_trait]
impl CreatorNotifier for WebhookNotifier {
    async fn notify(
        &self,
        creator_id: Uuid,
        kind: NotificationKind,
        params: serde_json::Value,
    ) -> AnyResult<()> {
        let Some(webhook_url) = self.webhook_url.clone() else {
            debug!(%creator_id, kind = %kind, "notifier: no webhook configured; dropping request");
            return Ok(());
        };

        let response = self
            .client
            .post(webhook_url)
            .json(&json!({
                "creator_id": creator_id,
                "kind": kind.as_str(),
                "params": params,
            }))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(anyhow!(
            "notification webhook returned non-success status: {}",
            response.status()
        ))
    }
}
