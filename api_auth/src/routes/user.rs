use std::sync::Arc;

use actix_web::{Responder, get, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;

use crate::services;

/// Returns the entitlement summary for the authenticated caller only:
/// credit balance, plan, plan expiry and whether the plan is currently
/// active.
///
/// # Input
/// - `claims`: The JWT claims extracted from the authentication token
/// - `pool`: A database connection pool
///
/// # Output
/// - Success: `{ credits, plan_type, plan_expiry, has_active_plan }`
/// - Error: Returns 401 Unauthorized if no valid token is provided
#[get("/status")]
async fn get_status(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let status = services::user::get_status(&pool, claims.user_id).await?;
    Success::ok(status)
}
