use common::{
    env_config::GenerationConfig,
    error::{AppError, Res},
};
use reqwest::StatusCode;

use crate::misc::data_uri;

/// Output resolution requested from the text-to-image backend; matches
/// the compositor canvas.
const IMAGE_WIDTH: u32 = 1280;
const IMAGE_HEIGHT: u32 = 720;

/// Fetches a background image for the prompt and returns it as a data
/// URI suitable for direct display.
///
/// Provider outcomes are mapped to distinct error categories so the
/// caller can choose between "retry", "upgrade" and "contact support":
/// 429 is a rate limit, 402/403 a usage or billing cap, everything else
/// (including an empty payload) a generic failure.
pub(crate) async fn fetch_background(
    http: &reqwest::Client,
    config: &GenerationConfig,
    prompt: &str,
) -> Res<String> {
    let url = build_url(&config.image_api_url, prompt)?;

    let response = http.get(url).send().await.map_err(AppError::from)?;
    let status = response.status();

    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            return Err(AppError::TooManyRequests(
                "Rate limit exceeded. Please try again later.".to_string(),
            ));
        }
        StatusCode::PAYMENT_REQUIRED | StatusCode::FORBIDDEN => {
            return Err(AppError::PaymentRequired(
                "Usage limit reached. Please upgrade your plan.".to_string(),
            ));
        }
        status if !status.is_success() => {
            return Err(AppError::Internal(format!(
                "Image generation failed: {}",
                status
            )));
        }
        _ => {}
    }

    let bytes = response.bytes().await.map_err(AppError::from)?;
    if bytes.is_empty() {
        return Err(AppError::Internal(
            "Image generation returned no payload".to_string(),
        ));
    }

    Ok(data_uri::encode("image/jpeg", &bytes))
}

/// Builds `{base}/prompt/{encoded prompt}?width=..&height=..&nologo=true`.
/// Path-segment encoding is handled by the url crate.
fn build_url(base: &str, prompt: &str) -> Res<url::Url> {
    let mut url = url::Url::parse(base)
        .map_err(|e| AppError::Internal(format!("Invalid image API URL: {}", e)))?;

    url.path_segments_mut()
        .map_err(|_| AppError::Internal("Image API URL cannot be a base".to_string()))?
        .push("prompt")
        .push(prompt);

    url.query_pairs_mut()
        .append_pair("width", &IMAGE_WIDTH.to_string())
        .append_pair("height", &IMAGE_HEIGHT.to_string())
        .append_pair("nologo", "true");

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_prompt_and_resolution() {
        let url = build_url("https://image.pollinations.ai", "a red fox, 4K quality").unwrap();
        let rendered = url.as_str();

        assert!(rendered.starts_with("https://image.pollinations.ai/prompt/"));
        assert!(!rendered.contains("a red fox"), "prompt must be encoded");
        assert!(rendered.contains("width=1280"));
        assert!(rendered.contains("height=720"));
        assert!(rendered.contains("nologo=true"));
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(build_url("not a url", "prompt").is_err());
    }
}
