use std::sync::Arc;

use actix_web::{Responder, post, web};
use common::env_config::Config;
use common::error::{AppError, Res};
use common::http::Success;
use sqlx::PgPool;

use crate::dtos::auth::{LoginRequest, RegisterRequest};
use crate::services;

/// Registers a new user with email and password authentication.
///
/// Registration also provisions the user's entitlement row with the
/// starting credit balance, so a fresh account can generate right away.
///
/// # Input
/// - `req`: JSON payload containing email and password
/// - `pool`: Database connection pool
///
/// # Output
/// - Success: Returns the created user object with 201 Created status
/// - Error: Returns 400 Bad Request if the email already exists or the
///   payload fails validation
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/auth/register', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({
///     email: 'user@example.com',
///     password: 'securepassword'
///   })
/// });
/// ```
#[post("/register")]
async fn post_register(
    req: web::Json<RegisterRequest>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &pool;
    let email_exists = db::user::exists_user_by_email(pg_pool, &req.email).await?;
    if email_exists {
        return Err(AppError::BadRequest("Email already registered".to_string()));
    }
    let user = services::auth::register(pg_pool, &req).await?;
    Success::created(user)
}

/// Authenticates a user with email and password.
///
/// # Input
/// - `req`: JSON payload containing email and password
/// - `config`: Application configuration for JWT generation
/// - `pool`: Database connection pool
///
/// # Output
/// - Success: Returns an auth response with JWT token and user details
/// - Error: Returns 401 Unauthorized for invalid credentials
#[post("/login")]
async fn post_login(
    req: web::Json<LoginRequest>,
    config: web::Data<Arc<Config>>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let response = services::auth::login(&pool, &config, &req).await?;
    Success::ok(response)
}
