use base64::{Engine, engine::general_purpose::STANDARD};
use common::error::{AppError, Res};

/// Wraps raw image bytes into a `data:` URI suitable for direct display.
pub(crate) fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Extracts the raw bytes from a `data:` URI. Plain base64 without the
/// scheme prefix is accepted too, since some clients strip it.
pub(crate) fn decode(input: &str) -> Res<Vec<u8>> {
    let payload = match input.split_once(";base64,") {
        Some((header, payload)) if header.starts_with("data:") => payload,
        Some(_) => {
            return Err(AppError::BadRequest(
                "Unsupported image data encoding".to_string(),
            ));
        }
        None if input.starts_with("data:") => {
            return Err(AppError::BadRequest(
                "Unsupported image data encoding".to_string(),
            ));
        }
        None => input,
    };

    STANDARD
        .decode(payload.trim())
        .map_err(|_| AppError::BadRequest("Image data is not valid base64".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let bytes = b"\x89PNG\r\n\x1a\n";
        let uri = encode("image/png", bytes);
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(decode(&uri).unwrap(), bytes);
    }

    #[test]
    fn bare_base64_is_accepted() {
        let encoded = STANDARD.encode(b"hello");
        assert_eq!(decode(&encoded).unwrap(), b"hello");
    }

    #[test]
    fn non_base64_data_uri_is_rejected() {
        assert!(decode("data:image/png,rawbytes").is_err());
        assert!(decode("data:text/plain;base64,!!!").is_err());
    }
}
