use serde_json::Value;

use crate::error::GenerateError;

/// Prefix of the data URI built from a generated payload. The space after the
/// comma matches what the web client always produced; decoders trim it.
pub const DATA_URI_PREFIX: &str = "data:image/png;base64, ";

/// Successful response from the generate-image endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    /// Echo of the submitted prompt, if the server sent one.
    pub prompt: Option<String>,
    /// Base64 PNG bytes without any data URI prefix.
    pub img_base64: String,
}

/// What the image slot currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Placeholder(String),
    DataUri { payload: String },
}

impl ImageSource {
    pub fn from_payload(payload: impl Into<String>) -> Self {
        Self::DataUri {
            payload: payload.into(),
        }
    }

    /// The value an `<img src>` would carry.
    pub fn src(&self) -> String {
        match self {
            Self::Placeholder(url) => url.clone(),
            Self::DataUri { payload } => format!("{DATA_URI_PREFIX}{payload}"),
        }
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Placeholder(_) => None,
            Self::DataUri { payload } => Some(payload.trim()),
        }
    }
}

/// Events sent from generate tasks to the app loop.
#[derive(Debug)]
pub enum GeneratorEvent {
    Finished {
        request_id: u64,
        outcome: Result<GeneratedImage, GenerateError>,
    },
}

/// Validate a response body. Extra fields are ignored; `prompt` is optional,
/// `img_base64` must be a string.
pub fn parse_response(body: &str) -> Result<GeneratedImage, GenerateError> {
    let parsed: Value = serde_json::from_str(body)?;

    let img_base64 = parsed
        .get("img_base64")
        .and_then(|v| v.as_str())
        .ok_or(GenerateError::MissingField("img_base64"))?
        .to_string();

    let prompt = parsed
        .get("prompt")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    Ok(GeneratedImage { prompt, img_base64 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_keeps_space_after_comma() {
        let src = ImageSource::from_payload("Zm9v");
        assert_eq!(src.src(), "data:image/png;base64, Zm9v");
        assert_eq!(src.payload(), Some("Zm9v"));
    }

    #[test]
    fn test_placeholder_src_is_url() {
        let src = ImageSource::Placeholder("https://picsum.photos/640".into());
        assert_eq!(src.src(), "https://picsum.photos/640");
        assert_eq!(src.payload(), None);
    }

    #[test]
    fn test_parse_full_response() {
        let image = parse_response(r#"{"prompt": "cat", "img_base64": "Zm9v"}"#).unwrap();
        assert_eq!(image.prompt.as_deref(), Some("cat"));
        assert_eq!(image.img_base64, "Zm9v");
    }

    #[test]
    fn test_parse_without_prompt_echo() {
        let image = parse_response(r#"{"img_base64": "Zm9v", "extra": 1}"#).unwrap();
        assert_eq!(image.prompt, None);
        assert_eq!(image.img_base64, "Zm9v");
    }

    #[test]
    fn test_parse_missing_payload() {
        let err = parse_response(r#"{"prompt": "cat"}"#).unwrap_err();
        assert!(matches!(err, GenerateError::MissingField("img_base64")));
    }

    #[test]
    fn test_parse_non_string_payload() {
        let err = parse_response(r#"{"prompt": "cat", "img_base64": 42}"#).unwrap_err();
        assert!(matches!(err, GenerateError::MissingField("img_base64")));
    }

    #[test]
    fn test_parse_non_json() {
        let err = parse_response("Internal Server Error").unwrap_err();
        assert!(matches!(err, GenerateError::Json(_)));
    }
}
