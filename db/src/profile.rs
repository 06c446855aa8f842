use chrono::{DateTime, Utc};
use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::profile::{PlanType, Profile};

/// Provisions the entitlement row for a new user. Starting balance and
/// plan come from the column defaults (50 credits, free plan).
pub async fn create_profile<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Profile> {
    sqlx::query_as::<_, Profile>("INSERT INTO profiles (user_id) VALUES ($1) RETURNING *")
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_profile<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Profile> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

/// Atomic conditional decrement. The balance check and the subtraction
/// are one statement, so two concurrent deductions can never both succeed
/// when only one charge's worth of balance remains.
///
/// Returns `false` (and leaves the balance untouched) when the balance is
/// short; the caller decides how to surface that.
pub async fn try_deduct_credits<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    amount: i32,
) -> Res<bool> {
    let result = sqlx::query(
        "UPDATE profiles SET credits = credits - $2, updated_at = now() \
         WHERE user_id = $1 AND credits >= $2",
    )
    .bind(user_id)
    .bind(amount)
    .execute(executor)
    .await
    .map_err(AppError::from)?;

    Ok(result.rows_affected() == 1)
}

/// Sets the plan and its expiry. Only called after payment verification;
/// idempotence against replays is guarded by the order state transition
/// in the payment layer.
pub async fn grant_plan<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    plan: PlanType,
    expiry: DateTime<Utc>,
) -> Res<()> {
    let result = sqlx::query(
        "UPDATE profiles SET plan_type = $2, plan_expiry = $3, updated_at = now() \
         WHERE user_id = $1",
    )
    .bind(user_id)
    .bind(plan.as_str())
    .bind(expiry)
    .execute(executor)
    .await
    .map_err(AppError::from)?;

    if result.rows_affected() == 0 {
        return Err(AppError::Internal(format!(
            "no entitlement row for user {} while granting plan",
            user_id
        )));
    }
    Ok(())
}
