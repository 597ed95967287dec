use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::withdrawal_requests::WithdrawalRequestEntity;
use crate::domain::value_objects::enums::withdrawal_methods::WithdrawalMethod;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestWithdrawalModel {
    pub amount_minor: i64,
    pub method: WithdrawalMethod,
    /// Method-specific payout coordinates (PayPal email, bank fields, ...);
    /// opaque to the core, forwarded to the operator.
    pub details: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WithdrawalDto {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub amount_minor: i64,
    pub method: String,
    pub status: String,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
}

impl From<WithdrawalRequestEntity> for WithdrawalDto {
    fn from(entity: WithdrawalRequestEntity) -> Self {
        Self {
            id: entity.id,
            creator_id: entity.creator_id,
            amount_minor: entity.amount_minor,
            method: entity.method,
            status: entity.status,
            requested_at: entity.requested_at,
            processed_at: entity.processed_at,
            processed_by: entity.processed_by,
            rejection_reason: entity.rejection_reason,
        }
    }
}
