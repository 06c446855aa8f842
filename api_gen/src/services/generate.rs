use std::{path::Path, time::Duration};

use chrono::Utc;
use common::{
    env_config::Config,
    error::{AppError, Res},
};
use compositor::{ComposeError, Overlay, TextPosition};
use db::dtos::thumbnail::NewThumbnail;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::thumbnail::{EnhanceRequest, EnhanceResponse, ExportRequest, GenerateRequest, GenerateResponse},
    gateway,
    misc::{
        data_uri,
        prompt::{self, Template},
        retry::{self, Backoff},
    },
    services::entitlement,
};

/// Total provider attempts per generation, including the first.
const PROVIDER_ATTEMPTS: u32 = 2;
const PROVIDER_BASE_DELAY: Duration = Duration::from_millis(400);

/// The credit-gated generation workflow: eligibility precheck, prompt
/// composition, provider call with bounded retry, then charge + history
/// insert in one transaction.
///
/// Order matters: an ineligible user is denied before any provider call
/// is made, and a failed provider call never charges credits. The charge
/// itself re-checks the balance atomically, so a concurrent generation
/// racing for the last credits fails cleanly instead of going negative.
pub(crate) async fn generate(
    pool: &PgPool,
    config: &Config,
    http: &reqwest::Client,
    user_id: Uuid,
    req: GenerateRequest,
) -> Res<GenerateResponse> {
    if req.text_input.trim().is_empty() {
        return Err(AppError::BadRequest("Text input is required".to_string()));
    }
    if let Some(position) = &req.text_position {
        position.parse::<TextPosition>().map_err(|_| {
            AppError::BadRequest(format!("Invalid text position: {}", position))
        })?;
    }

    let now = Utc::now();
    let profile = db::profile::get_profile(pool, user_id).await?;
    entitlement::check_eligibility(&profile, now)?;

    let template: Template = req.template.parse().unwrap_or(Template::Custom);
    let prompt = prompt::compose_prompt(&req.text_input, template);
    log::debug!("composed prompt for user {}: {}", user_id, prompt);

    let policy = Backoff {
        attempts: PROVIDER_ATTEMPTS,
        base_delay: PROVIDER_BASE_DELAY,
    };
    let image_url = retry::with_backoff(policy, |_| {
        gateway::image_api::fetch_background(http, &config.generation, &prompt)
    })
    .await?;

    // Charge and record in one transaction: either the credits are
    // deducted and the history row exists, or neither happened.
    let mut tx = pool.begin().await.map_err(AppError::from)?;
    let credits_used = entitlement::charge(&mut *tx, &profile, user_id, now).await?;
    db::thumbnail::insert(
        &mut *tx,
        NewThumbnail {
            user_id,
            text_input: req.text_input.clone(),
            template_used: template.as_str().to_string(),
            overlay_text: req.overlay_text.clone(),
            text_position: req.text_position.clone(),
            image_url: image_url.clone(),
            credits_used,
        },
    )
    .await?;
    tx.commit().await.map_err(AppError::from)?;

    log::info!(
        "generated thumbnail for user {} ({} credits)",
        user_id,
        credits_used
    );

    Ok(GenerateResponse {
        image_url,
        prompt,
        template: template.as_str().to_string(),
        text_input: req.text_input,
        overlay_text: req.overlay_text,
        text_position: req.text_position,
    })
}

pub(crate) async fn enhance(
    config: &Config,
    http: &reqwest::Client,
    req: EnhanceRequest,
) -> Res<EnhanceResponse> {
    if req.image_data.trim().is_empty() {
        return Err(AppError::BadRequest("Image data is required".to_string()));
    }

    let enhanced_image_url = gateway::enhance::enhance_image(
        http,
        &config.generation,
        &req.image_data,
        req.prompt.as_deref(),
    )
    .await?;

    Ok(EnhanceResponse {
        enhanced_image_url,
        message: "Image enhanced successfully".to_string(),
    })
}

/// Flattens the background and the optional overlay into the final PNG.
/// CPU-bound; callers run it on the blocking pool.
pub(crate) fn export(config: &Config, req: ExportRequest) -> Res<Vec<u8>> {
    let background = data_uri::decode(&req.image_data)?;

    let overlay = match req.overlay_text {
        Some(text) if !text.trim().is_empty() => {
            let position = req
                .text_position
                .as_deref()
                .map(|p| {
                    p.parse::<TextPosition>().map_err(|_| {
                        AppError::BadRequest(format!("Invalid text position: {}", p))
                    })
                })
                .transpose()?
                .unwrap_or(TextPosition::Bottom);

            Some(Overlay {
                text,
                position,
                style: req.text_style.unwrap_or_default(),
            })
        }
        _ => None,
    };

    compositor::compose(&background, overlay.as_ref(), Path::new(&config.fonts_dir))
        .map_err(map_compose_error)
}

fn map_compose_error(err: ComposeError) -> AppError {
    match err {
        ComposeError::Decode(e) => {
            AppError::BadRequest(format!("Background image could not be decoded: {}", e))
        }
        ComposeError::Color(c) => AppError::BadRequest(format!("Invalid color: {}", c)),
        other => AppError::Internal(other.to_string()),
    }
}
