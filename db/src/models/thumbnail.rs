use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One generation history entry. Immutable after insert; deletable by the
/// owning user only.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Thumbnail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text_input: String,
    pub template_used: String,
    pub overlay_text: Option<String>,
    pub text_position: Option<String>,
    pub image_url: String,
    pub credits_used: i32,
    pub created_at: DateTime<Utc>,
}
