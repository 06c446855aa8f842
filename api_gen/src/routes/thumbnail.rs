use std::sync::Arc;

use actix_web::{Responder, delete, get, post, web};
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::Success,
    jwt::JwtClaims,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::thumbnail::{EnhanceRequest, ExportRequest, GenerateRequest},
    services,
};

const HISTORY_LIMIT: i64 = 20;

/// Generates a thumbnail background for the given topic and template.
///
/// Eligibility is checked before the provider is called: subscribers
/// pass while their plan is active, everyone else needs 10 credits. A
/// failed generation never charges credits.
///
/// # Input
/// - `claims`: JWT claims of the authenticated caller
/// - `req`: JSON payload:
///   - `text_input`: The thumbnail topic
///   - `template`: One of "minimal", "gaming", "tech", "cinematic", "custom"
///   - `overlay_text`: (Optional) Text to overlay later
///   - `text_position`: (Optional) "top", "center" or "bottom"
///
/// # Output
/// - Success: `{ image_url, prompt, template, text_input, overlay_text, text_position }`
/// - Error: 402 when credits are insufficient or the provider quota is
///   exhausted, 429 on provider rate limits, 500 otherwise
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/thumbnails/generate', {
///   method: 'POST',
///   headers: {
///     'Content-Type': 'application/json',
///     'Authorization': `Bearer ${localStorage.getItem('authToken')}`
///   },
///   body: JSON.stringify({
///     text_input: '10 AI Tools That Will Change Your Life',
///     template: 'cinematic',
///     overlay_text: 'WATCH NOW',
///     text_position: 'bottom'
///   })
/// });
/// ```
#[post("/generate")]
async fn post_generate(
    claims: web::ReqData<JwtClaims>,
    req: web::Json<GenerateRequest>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
    http: web::Data<reqwest::Client>,
) -> Res<impl Responder> {
    let response =
        services::generate::generate(&pool, &config, &http, claims.user_id, req.into_inner())
            .await?;
    Success::ok(response)
}

/// Runs an uploaded image through the AI enhancement backend.
///
/// # Input
/// - `req`: JSON payload with `image_data` (data URI) and an optional
///   `prompt` overriding the default enhancement instruction
///
/// # Output
/// - Success: `{ enhanced_image_url, message }`
/// - Error: 400 on missing image data, 429/402 on provider limits
#[post("/enhance")]
async fn post_enhance(
    _claims: web::ReqData<JwtClaims>,
    req: web::Json<EnhanceRequest>,
    config: web::Data<Arc<Config>>,
    http: web::Data<reqwest::Client>,
) -> Res<impl Responder> {
    let response = services::generate::enhance(&config, &http, req.into_inner()).await?;
    Success::ok(response)
}

/// Exports the final 1280x720 PNG: background, legibility gradient and
/// the optional shadowed text overlay.
///
/// # Input
/// - `req`: JSON payload:
///   - `image_data`: The background as a data URI
///   - `overlay_text` / `text_position` / `text_style`: (Optional) overlay
///
/// # Output
/// - Success: the PNG bytes with `image/png` content type
/// - Error: 400 when the background cannot be decoded
#[post("/export")]
async fn post_export(
    _claims: web::ReqData<JwtClaims>,
    req: web::Json<ExportRequest>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let config = Arc::clone(&config);
    let png = web::block(move || services::generate::export(&config, req.into_inner()))
        .await
        .map_err(|e| AppError::Internal(format!("Export task failed: {}", e)))??;
    Success::png(png)
}

/// Lists the caller's generation history, newest first.
#[get("")]
async fn get_history(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &pool;
    let thumbnails =
        db::thumbnail::list_for_user(pg_pool, claims.user_id, HISTORY_LIMIT).await?;
    Success::ok(thumbnails)
}

/// Deletes one of the caller's generation history entries. Deleting
/// another user's entry is indistinguishable from a missing one.
#[delete("/{id}")]
async fn delete_thumbnail(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<Uuid>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let id = path.into_inner();
    let pg_pool: &PgPool = &pool;
    let deleted = db::thumbnail::delete_for_user(pg_pool, id, claims.user_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Thumbnail not found".to_string()));
    }
    Success::ok(serde_json::json!({ "deleted": id }))
}
