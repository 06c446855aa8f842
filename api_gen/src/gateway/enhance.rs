use common::{
    env_config::GenerationConfig,
    error::{AppError, Res},
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const ENHANCE_MODEL: &str = "google/gemini-2.5-flash-image-preview";

const DEFAULT_INSTRUCTION: &str = "Enhance this image for a YouTube thumbnail: improve \
                                   lighting, increase sharpness, make colors more vibrant, and \
                                   ensure professional quality suitable for thumbnails.";

// The chat-completions wire shape, narrowed to exactly what the
// enhancement call needs.

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    modalities: [&'a str; 2],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrlRef<'a> },
}

#[derive(Serialize)]
struct ImageUrlRef<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    images: Vec<ImageOut>,
}

#[derive(Deserialize)]
struct ImageOut {
    image_url: ImageUrlOut,
}

#[derive(Deserialize)]
struct ImageUrlOut {
    url: String,
}

/// Sends the uploaded image through the enhancement backend and returns
/// the enhanced image URL. Status mapping matches the generation
/// gateway: 429 → rate limit, 402 → usage cap.
pub(crate) async fn enhance_image(
    http: &reqwest::Client,
    config: &GenerationConfig,
    image_data: &str,
    instruction: Option<&str>,
) -> Res<String> {
    if config.enhance_api_key.is_empty() {
        return Err(AppError::Internal(
            "Enhancement backend is not configured".to_string(),
        ));
    }

    let request = ChatRequest {
        model: ENHANCE_MODEL,
        messages: vec![Message {
            role: "user",
            content: vec![
                ContentPart::Text {
                    text: instruction.unwrap_or(DEFAULT_INSTRUCTION),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrlRef { url: image_data },
                },
            ],
        }],
        modalities: ["image", "text"],
    };

    let response = http
        .post(&config.enhance_api_url)
        .bearer_auth(&config.enhance_api_key)
        .json(&request)
        .send()
        .await
        .map_err(AppError::from)?;

    match response.status() {
        StatusCode::TOO_MANY_REQUESTS => {
            return Err(AppError::TooManyRequests(
                "Rate limit exceeded. Please try again later.".to_string(),
            ));
        }
        StatusCode::PAYMENT_REQUIRED => {
            return Err(AppError::PaymentRequired(
                "Usage limit reached. Please upgrade your plan.".to_string(),
            ));
        }
        status if !status.is_success() => {
            return Err(AppError::Internal(format!(
                "Image enhancement failed: {}",
                status
            )));
        }
        _ => {}
    }

    let body: ChatResponse = response.json().await.map_err(AppError::from)?;

    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.images.into_iter().next())
        .map(|image| image.image_url.url)
        .ok_or_else(|| AppError::Internal("No enhanced image was generated".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_the_chat_wire_shape() {
        let request = ChatRequest {
            model: ENHANCE_MODEL,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentPart::Text { text: "sharpen" },
                    ContentPart::ImageUrl {
                        image_url: ImageUrlRef {
                            url: "data:image/png;base64,AAAA",
                        },
                    },
                ],
            }],
            modalities: ["image", "text"],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
        assert_eq!(json["messages"][0]["content"][1]["type"], "image_url");
        assert_eq!(
            json["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
        assert_eq!(json["modalities"][0], "image");
    }

    #[test]
    fn response_image_url_is_extracted() {
        let raw = r#"{
            "choices": [
                { "message": { "images": [ { "image_url": { "url": "data:image/png;base64,BBBB" } } ] } }
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let url = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.images.into_iter().next())
            .map(|i| i.image_url.url);
        assert_eq!(url.as_deref(), Some("data:image/png;base64,BBBB"));
    }
}
