use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub plan_type: String,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// Minor units (paise), as the checkout widget expects.
    pub amount: i64,
    pub currency: String,
    /// Public key id the client hands to the checkout widget.
    pub key_id: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub plan_type: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub plan_type: String,
    pub plan_expiry: Option<DateTime<Utc>>,
}
