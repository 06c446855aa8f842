use chrono::Utc;
use common::{
    env_config::RazorpayConfig,
    error::{AppError, Res},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ORDERS_URL: &str = "https://api.razorpay.com/v1/orders";

/// Thin, explicitly-typed client for the Razorpay orders REST API. The
/// orchestration logic only ever sees [`ProviderOrder`], never the raw
/// provider payload.
pub(crate) struct RazorpayClient<'a> {
    http: &'a reqwest::Client,
    config: &'a RazorpayConfig,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    /// Minor units (paise).
    amount: i64,
    currency: &'a str,
    receipt: String,
    notes: OrderNotes<'a>,
}

#[derive(Serialize)]
struct OrderNotes<'a> {
    user_id: Uuid,
    plan_type: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

impl<'a> RazorpayClient<'a> {
    pub(crate) fn new(http: &'a reqwest::Client, config: &'a RazorpayConfig) -> Self {
        Self { http, config }
    }

    /// Mints a provider-side order. Nothing is persisted locally here;
    /// a failed provider call therefore leaves no half-created state.
    pub(crate) async fn create_order(
        &self,
        amount_paise: i64,
        currency: &str,
        user_id: Uuid,
        plan_type: &str,
    ) -> Res<ProviderOrder> {
        if self.config.key_id.is_empty() || self.config.key_secret.is_empty() {
            return Err(AppError::Internal(
                "Payment gateway is not configured".to_string(),
            ));
        }

        let body = CreateOrderBody {
            amount: amount_paise,
            currency,
            receipt: format!("order_{}_{}", user_id, Utc::now().timestamp_millis()),
            notes: OrderNotes { user_id, plan_type },
        };

        let response = self
            .http
            .post(ORDERS_URL)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(AppError::from)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            log::error!("Razorpay order creation failed ({}): {}", status, detail);
            return Err(AppError::Internal(
                "Failed to create payment order".to_string(),
            ));
        }

        response
            .json::<ProviderOrder>()
            .await
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_body_matches_the_provider_wire_shape() {
        let user_id = Uuid::new_v4();
        let body = CreateOrderBody {
            amount: 3000,
            currency: "INR",
            receipt: format!("order_{}_0", user_id),
            notes: OrderNotes {
                user_id,
                plan_type: "weekly",
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["amount"], 3000);
        assert_eq!(json["currency"], "INR");
        assert_eq!(json["notes"]["plan_type"], "weekly");
        assert!(json["receipt"].as_str().unwrap().starts_with("order_"));
    }

    #[test]
    fn provider_order_parses_the_fields_we_rely_on() {
        let raw = r#"{
            "id": "order_Nxy123",
            "entity": "order",
            "amount": 10000,
            "amount_paid": 0,
            "currency": "INR",
            "status": "created"
        }"#;
        let order: ProviderOrder = serde_json::from_str(raw).unwrap();
        assert_eq!(order.id, "order_Nxy123");
        assert_eq!(order.amount, 10000);
        assert_eq!(order.currency, "INR");
    }
}
