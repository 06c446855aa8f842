use uuid::Uuid;

/// Data for one successful generation, persisted after credits are
/// charged.
#[derive(Debug, Clone)]
pub struct NewThumbnail {
    pub user_id: Uuid,
    pub text_input: String,
    pub template_used: String,
    pub overlay_text: Option<String>,
    pub text_position: Option<String>,
    pub image_url: String,
    pub credits_used: i32,
}
