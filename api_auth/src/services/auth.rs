use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use common::{
    env_config::Config,
    error::{AppError, Res},
    jwt::{self, ClaimsSpec},
};
use db::models::user::{AuthCredentials, User};
use sqlx::PgPool;

use crate::dtos::auth::{AuthResponse, LoginRequest, RegisterRequest};

/// Creates the user, their credentials and their entitlement row (with
/// the starting credit balance) in one transaction, so a half-registered
/// account can never exist.
pub(crate) async fn register(pool: &PgPool, req: &RegisterRequest) -> Res<User> {
    validate_registration(req)?;
    let password_hash = hash_password(&req.password)?;

    let mut tx = pool.begin().await.map_err(AppError::from)?;
    let user = db::user::insert_user(&mut *tx, &req.email).await?;
    db::user::insert_credentials(
        &mut *tx,
        AuthCredentials {
            user_id: user.id,
            password_hash,
        },
    )
    .await?;
    db::profile::create_profile(&mut *tx, user.id).await?;
    tx.commit().await.map_err(AppError::from)?;

    log::info!("registered user {}", user.id);
    Ok(user)
}

pub(crate) async fn login(pool: &PgPool, config: &Config, req: &LoginRequest) -> Res<AuthResponse> {
    let Some((user, credentials)) =
        db::user::find_user_with_password_hash(pool, &req.email).await?
    else {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    };

    if !verify_password(&req.password, &credentials.password_hash) {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = jwt::generate_jwt(
        ClaimsSpec {
            user_id: user.id,
            email: user.email.clone(),
        },
        &config.jwt_config,
    )?;

    Ok(AuthResponse { token, user })
}

fn validate_registration(req: &RegisterRequest) -> Res<()> {
    if !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

fn hash_password(password: &str) -> Res<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn registration_validation() {
        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
        };
        assert!(validate_registration(&bad_email).is_err());

        let short_password = RegisterRequest {
            email: "user@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(validate_registration(&short_password).is_err());

        let ok = RegisterRequest {
            email: "user@example.com".to_string(),
            password: "longenough".to_string(),
        };
        assert!(validate_registration(&ok).is_ok());
    }
}
