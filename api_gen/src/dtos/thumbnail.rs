use compositor::OverlayStyle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub text_input: String,
    pub template: String,
    pub overlay_text: Option<String>,
    pub text_position: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub image_url: String,
    pub prompt: String,
    pub template: String,
    pub text_input: String,
    pub overlay_text: Option<String>,
    pub text_position: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub image_data: String,
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnhanceResponse {
    pub enhanced_image_url: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub image_data: String,
    pub overlay_text: Option<String>,
    pub text_position: Option<String>,
    pub text_style: Option<OverlayStyle>,
}
