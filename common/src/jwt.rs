use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    env_config::JwtConfig,
    error::{AppError, Res},
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub user_id: Uuid,
    pub email: String,
    pub exp: usize,
}

pub struct ClaimsSpec {
    pub user_id: Uuid,
    pub email: String,
}

/// Generates JWT token based on user object and JWT configuration options
pub fn generate_jwt(spec: ClaimsSpec, config: &JwtConfig) -> Res<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(config.expiration_hours))
        .expect("valid timestamp")
        .timestamp();

    let claims = JwtClaims {
        user_id: spec.user_id,
        email: spec.email,
        exp: expiration as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(AppError::from)
}

/// Extracts claims object from JWT token.
/// Requires JWT secret.
pub fn validate_jwt(token: &str, secret: &str) -> Res<JwtClaims> {
    let token_data = jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
        }
    }

    #[test]
    fn round_trips_claims() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let token = generate_jwt(
            ClaimsSpec {
                user_id,
                email: "user@example.com".to_string(),
            },
            &config,
        )
        .unwrap();

        let claims = validate_jwt(&token, &config.secret).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "user@example.com");
    }

    #[test]
    fn rejects_wrong_secret() {
        let config = test_config();
        let token = generate_jwt(
            ClaimsSpec {
                user_id: Uuid::new_v4(),
                email: "user@example.com".to_string(),
            },
            &config,
        )
        .unwrap();

        assert!(validate_jwt(&token, "other-secret").is_err());
    }
}
