use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{dtos::thumbnail::NewThumbnail, models::thumbnail::Thumbnail};

pub async fn insert<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: NewThumbnail,
) -> Res<Thumbnail> {
    sqlx::query_as::<_, Thumbnail>(
        r#"
        INSERT INTO thumbnails (user_id, text_input, template_used, overlay_text, text_position, image_url, credits_used)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(data.user_id)
    .bind(&data.text_input)
    .bind(&data.template_used)
    .bind(&data.overlay_text)
    .bind(&data.text_position)
    .bind(&data.image_url)
    .bind(data.credits_used)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn list_for_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    limit: i64,
) -> Res<Vec<Thumbnail>> {
    sqlx::query_as::<_, Thumbnail>(
        "SELECT * FROM thumbnails WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

/// Deletes a history entry, scoped to the owning user. Returns whether a
/// row was actually removed.
pub async fn delete_for_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: Uuid,
    user_id: Uuid,
) -> Res<bool> {
    let result = sqlx::query("DELETE FROM thumbnails WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(executor)
        .await
        .map_err(AppError::from)?;

    Ok(result.rows_affected() == 1)
}
