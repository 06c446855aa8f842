use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Payment order lifecycle. Orders start `pending` and only move to a
/// terminal state through signature verification; terminal states are
/// never mutated again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Amount in the currency's minor unit (paise for INR).
    pub amount_paise: i64,
    pub currency: String,
    pub plan_type: String,
    /// Order id assigned by the payment provider; the local record is
    /// keyed by it during verification.
    pub provider_order_id: String,
    /// Provider payment id, filled in once the payment is verified.
    pub payment_id: Option<String>,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn is_completed(&self) -> bool {
        self.payment_status == PaymentStatus::Completed.as_str()
    }
}
