pub mod classify;
pub mod draft;
pub mod embedding;

mod error;

pub use draft::SimilarContext;
pub use error::{Error, Result};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(
		AUTHORIZATION,
		format!("Bearer {api_key}").parse().map_err(Error::InvalidHeaderValue)?,
	);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(
			HeaderName::from_bytes(key.as_bytes())?,
			raw.parse().map_err(Error::InvalidHeaderValue)?,
		);
	}

	Ok(headers)
}

/// Pulls `choices[0].message.content` out of a chat-completions response and
/// trims it. The caller decides what an empty result means.
pub(crate) fn parse_chat_content(json: &Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Chat response is missing message content.".to_string(),
		})?;

	Ok(content.trim().to_string())
}
