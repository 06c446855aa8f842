use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::user::{AuthCredentials, User};

pub async fn exists_user_by_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_user_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<User> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn insert_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<User> {
    sqlx::query_as::<_, User>("INSERT INTO users (email) VALUES ($1) RETURNING *")
        .bind(email)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn insert_credentials<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: AuthCredentials,
) -> Res<()> {
    sqlx::query("INSERT INTO auth_credentials (user_id, password_hash) VALUES ($1, $2)")
        .bind(data.user_id)
        .bind(&data.password_hash)
        .execute(executor)
        .await?;
    Ok(())
}

/// Looks up a user together with their password hash for login. `None`
/// keeps "unknown email" indistinguishable from "wrong password" at the
/// route layer.
pub async fn find_user_with_password_hash<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<Option<(User, AuthCredentials)>> {
    let row = sqlx::query_as::<_, UserWithHash>(
        r#"
        SELECT u.id, u.email, u.created_at, u.updated_at, ac.password_hash
        FROM users u
        JOIN auth_credentials ac ON u.id = ac.user_id
        WHERE u.email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)?;

    Ok(row.map(|r| {
        (
            User {
                id: r.id,
                email: r.email,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
            AuthCredentials {
                user_id: r.id,
                password_hash: r.password_hash,
            },
        )
    }))
}

#[derive(sqlx::FromRow)]
struct UserWithHash {
    id: Uuid,
    email: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    password_hash: String,
}
