use chrono::{Duration, Utc};
use common::{
    env_config::Config,
    error::{AppError, Res},
};
use db::dtos::payment::NewPayment;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::pay::{CreateOrderResponse, VerifyRequest, VerifyResponse},
    misc::razorpay::RazorpayClient,
    models::plan,
};

type HmacSha256 = Hmac<Sha256>;

/// Recomputes the HMAC-SHA256 over `"{order_id}|{payment_id}"` with the
/// server-held key secret and compares it to the client-supplied hex
/// signature. The comparison runs in constant time via `verify_slice`.
/// Anything malformed (bad hex, wrong length) fails verification.
pub(crate) fn verify_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    secret: &str,
) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());

    let Ok(provided) = hex::decode(signature) else {
        return false;
    };
    mac.verify_slice(&provided).is_ok()
}

/// Validates the plan against the price table, mints the provider order
/// and persists the local `pending` record keyed by the provider order
/// id. Either the provider call fails and nothing is persisted, or it
/// succeeds and the pending record exists.
pub(crate) async fn create_order(
    pool: &PgPool,
    config: &Config,
    http: &reqwest::Client,
    user_id: Uuid,
    raw_plan: &str,
) -> Res<CreateOrderResponse> {
    let plan_type = plan::parse_paid_plan(raw_plan)?;
    let Some(amount_paise) = plan::price_paise(plan_type) else {
        return Err(AppError::BadRequest("Invalid plan type".to_string()));
    };

    let client = RazorpayClient::new(http, &config.razorpay);
    let order = client
        .create_order(amount_paise, plan::CURRENCY, user_id, plan_type.as_str())
        .await?;

    db::payment::insert_pending(
        pool,
        NewPayment {
            user_id,
            amount_paise: order.amount,
            currency: order.currency.clone(),
            plan_type,
            provider_order_id: order.id.clone(),
        },
    )
    .await?;

    log::info!(
        "created payment order {} for user {} ({})",
        order.id,
        user_id,
        plan_type
    );

    Ok(CreateOrderResponse {
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        key_id: config.razorpay.key_id.clone(),
    })
}

/// Verifies a completed checkout and grants the plan.
///
/// The signature check is the security boundary: on mismatch the order
/// stays pending and no entitlement changes. On match, the order state
/// transition and the plan grant run in one transaction, so a payment
/// can never be marked completed with the grant missing — if the grant
/// write fails everything rolls back and the request fails loudly,
/// leaving the order pending for reconciliation (re-running the verify
/// is safe).
///
/// Replays of an already-completed order are a no-op reporting the
/// existing grant; the conditional order transition makes granting
/// single-shot.
pub(crate) async fn verify_payment(
    pool: &PgPool,
    config: &Config,
    user_id: Uuid,
    req: &VerifyRequest,
) -> Res<VerifyResponse> {
    if req.razorpay_order_id.is_empty()
        || req.razorpay_payment_id.is_empty()
        || req.razorpay_signature.is_empty()
    {
        return Err(AppError::BadRequest(
            "Missing required payment details".to_string(),
        ));
    }
    let plan_type = plan::parse_paid_plan(&req.plan_type)?;
    let Some(duration) = plan::duration_days(plan_type) else {
        return Err(AppError::BadRequest("Invalid plan type".to_string()));
    };

    if !verify_signature(
        &req.razorpay_order_id,
        &req.razorpay_payment_id,
        &req.razorpay_signature,
        &config.razorpay.key_secret,
    ) {
        log::error!(
            "signature verification failed for order {} (user {})",
            req.razorpay_order_id,
            user_id
        );
        return Err(AppError::BadRequest(
            "Invalid payment signature".to_string(),
        ));
    }

    let mut tx = pool.begin().await.map_err(AppError::from)?;
    let completed = db::payment::complete_if_pending(
        &mut *tx,
        &req.razorpay_order_id,
        user_id,
        &req.razorpay_payment_id,
    )
    .await?;

    if !completed {
        // nothing transitioned: the order is either a replay, a terminal
        // failure, or unknown
        tx.rollback().await.map_err(AppError::from)?;
        let existing =
            db::payment::find_by_provider_order(pool, &req.razorpay_order_id, user_id).await?;
        return match existing {
            Some(payment) if payment.is_completed() => {
                let profile = db::profile::get_profile(pool, user_id).await?;
                Ok(VerifyResponse {
                    success: true,
                    plan_type: plan_type.as_str().to_string(),
                    plan_expiry: profile.plan_expiry,
                })
            }
            Some(_) => Err(AppError::BadRequest(
                "Payment order is not verifiable".to_string(),
            )),
            None => Err(AppError::NotFound("Payment order not found".to_string())),
        };
    }

    let plan_expiry = Utc::now() + Duration::days(duration);
    db::profile::grant_plan(&mut *tx, user_id, plan_type, plan_expiry).await?;
    tx.commit().await.map_err(AppError::from)?;

    log::info!(
        "granted {} plan to user {} until {}",
        plan_type,
        user_id,
        plan_expiry
    );

    Ok(VerifyResponse {
        success: true,
        plan_type: plan_type.as_str().to_string(),
        plan_expiry: Some(plan_expiry),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "rzp_test_secret";

    fn sign(order_id: &str, payment_id: &str, secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_verifies() {
        let signature = sign("order_123", "pay_456", SECRET);
        assert!(verify_signature("order_123", "pay_456", &signature, SECRET));
    }

    #[test]
    fn tampered_signature_fails_regardless_of_valid_ids() {
        let mut signature = sign("order_123", "pay_456", SECRET);
        // flip the last hex digit
        let last = signature.pop().unwrap();
        signature.push(if last == '0' { '1' } else { '0' });
        assert!(!verify_signature("order_123", "pay_456", &signature, SECRET));
    }

    #[test]
    fn signature_for_another_order_fails() {
        let signature = sign("order_123", "pay_456", SECRET);
        assert!(!verify_signature("order_999", "pay_456", &signature, SECRET));
        assert!(!verify_signature("order_123", "pay_999", &signature, SECRET));
    }

    #[test]
    fn signature_with_wrong_secret_fails() {
        let signature = sign("order_123", "pay_456", "other_secret");
        assert!(!verify_signature("order_123", "pay_456", &signature, SECRET));
    }

    #[test]
    fn malformed_signature_fails_instead_of_erroring() {
        assert!(!verify_signature("order_123", "pay_456", "not-hex", SECRET));
        assert!(!verify_signature("order_123", "pay_456", "abcd", SECRET));
        assert!(!verify_signature("order_123", "pay_456", "", SECRET));
    }
}
