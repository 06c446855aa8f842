use std::sync::Arc;

use actix_web::{Responder, get, post, web};
use common::{env_config::Config, error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;

use crate::{
    dtos::pay::{CreateOrderRequest, VerifyRequest},
    services,
};

const PAYMENT_HISTORY_LIMIT: i64 = 10;

/// Creates a payment order for a subscription plan.
///
/// Mints the order on the payment provider side and persists a local
/// `pending` record. The response carries everything the checkout
/// widget needs to collect the payment.
///
/// # Input
/// - `claims`: JWT claims of the authenticated caller
/// - `req`: JSON payload with `plan_type` ("weekly" or "monthly")
///
/// # Output
/// - Success: `{ order_id, amount, currency, key_id }`
/// - Error: 400 for an invalid plan type, 500 when the provider is
///   unreachable (nothing is persisted in that case)
///
/// # Frontend Example
/// ```javascript
/// const { order_id, amount, currency, key_id } = await (await fetch('/api/pay/create-order', {
///   method: 'POST',
///   headers: {
///     'Content-Type': 'application/json',
///     'Authorization': `Bearer ${localStorage.getItem('authToken')}`
///   },
///   body: JSON.stringify({ plan_type: 'monthly' })
/// })).json();
///
/// // hand order_id/amount/currency/key_id to the Razorpay checkout widget;
/// // its completion callback posts back to /api/pay/verify
/// ```
#[post("/create-order")]
async fn post_create_order(
    claims: web::ReqData<JwtClaims>,
    req: web::Json<CreateOrderRequest>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
    http: web::Data<reqwest::Client>,
) -> Res<impl Responder> {
    let response =
        services::pay::create_order(&pool, &config, &http, claims.user_id, &req.plan_type).await?;
    Success::ok(response)
}

/// Verifies a completed checkout handshake and activates the plan.
///
/// The provider signature is recomputed server-side from the order and
/// payment ids; a mismatch fails the request and changes nothing.
/// Verifying the same order twice grants the plan at most once.
///
/// # Input
/// - `claims`: JWT claims of the authenticated caller
/// - `req`: JSON payload with `razorpay_order_id`, `razorpay_payment_id`,
///   `razorpay_signature` and `plan_type`
///
/// # Output
/// - Success: `{ success: true, plan_type, plan_expiry }`
/// - Error: 400 for a missing field, unknown plan or invalid signature
#[post("/verify")]
async fn post_verify(
    claims: web::ReqData<JwtClaims>,
    req: web::Json<VerifyRequest>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let response = services::pay::verify_payment(&pool, &config, claims.user_id, &req).await?;
    Success::ok(response)
}

/// Lists the caller's recent payment orders, newest first.
#[get("/history")]
async fn get_history(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &pool;
    let payments =
        db::payment::list_for_user(pg_pool, claims.user_id, PAYMENT_HISTORY_LIMIT).await?;
    Success::ok(payments)
}
