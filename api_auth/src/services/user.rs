use chrono::Utc;
use common::error::Res;
use db::models::profile::UserStatus;
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) async fn get_status(pool: &PgPool, user_id: Uuid) -> Res<UserStatus> {
    let profile = db::profile::get_profile(pool, user_id).await?;
    Ok(profile.status(Utc::now()))
}
