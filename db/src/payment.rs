use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::payment::NewPayment,
    models::payment::{Payment, PaymentStatus},
};

pub async fn insert_pending<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: NewPayment,
) -> Res<Payment> {
    sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (user_id, amount_paise, currency, plan_type, provider_order_id, payment_status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(data.user_id)
    .bind(data.amount_paise)
    .bind(&data.currency)
    .bind(data.plan_type.as_str())
    .bind(&data.provider_order_id)
    .bind(PaymentStatus::Pending.as_str())
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn find_by_provider_order<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    provider_order_id: &str,
    user_id: Uuid,
) -> Res<Option<Payment>> {
    sqlx::query_as::<_, Payment>(
        "SELECT * FROM payments WHERE provider_order_id = $1 AND user_id = $2",
    )
    .bind(provider_order_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

/// Transitions a `pending` order to `completed`, recording the provider
/// payment id. The status guard in the WHERE clause makes the transition
/// single-shot: a replayed verification matches zero rows and the caller
/// treats the order as already processed.
pub async fn complete_if_pending<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    provider_order_id: &str,
    user_id: Uuid,
    payment_id: &str,
) -> Res<bool> {
    let result = sqlx::query(
        "UPDATE payments SET payment_status = $4, payment_id = $3 \
         WHERE provider_order_id = $1 AND user_id = $2 AND payment_status = $5",
    )
    .bind(provider_order_id)
    .bind(user_id)
    .bind(payment_id)
    .bind(PaymentStatus::Completed.as_str())
    .bind(PaymentStatus::Pending.as_str())
    .execute(executor)
    .await
    .map_err(AppError::from)?;

    Ok(result.rows_affected() == 1)
}

pub async fn list_for_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    limit: i64,
) -> Res<Vec<Payment>> {
    sqlx::query_as::<_, Payment>(
        "SELECT * FROM payments WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}
