use std::{fmt::Write, time::Duration};

use reqwest::Client;
use serde_json::Value;

use crate::Result;
use triage_domain::RECOMMENDED_CATEGORIES;

const SYSTEM_PROMPT: &str =
	"You are a customer support email classifier. Respond with only the category name.";

/// Asks the provider for a single category label. The response is trimmed but
/// otherwise raw; callers run it through `triage_domain::normalize_category`
/// to absorb drift (empty output, quoting, case).
pub async fn classify(
	cfg: &triage_config::LlmProviderConfig,
	subject: &str,
	body: &str,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let request = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
		"messages": [
			{ "role": "system", "content": SYSTEM_PROMPT },
			{ "role": "user", "content": classification_prompt(subject, body) },
		],
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&request)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	crate::parse_chat_content(&json)
}

fn classification_prompt(subject: &str, body: &str) -> String {
	let mut prompt =
		String::from("Classify the following customer support email into one of these categories:\n");

	for (name, description) in RECOMMENDED_CATEGORIES {
		let _ = writeln!(prompt, "- {name}: {description}");
	}

	let _ = write!(
		prompt,
		"\nEmail Subject: {subject}\nEmail Body: {body}\n\n\
		Respond with only the category name (e.g., \"Refund\", \"Payment Failure\", etc.)."
	);

	prompt
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prompt_lists_every_recommended_category() {
		let prompt = classification_prompt("Broken login", "I cannot sign in.");

		for (name, _) in RECOMMENDED_CATEGORIES {
			assert!(prompt.contains(name), "Prompt is missing category {name}.");
		}

		assert!(prompt.contains("Email Subject: Broken login"));
		assert!(prompt.contains("Email Body: I cannot sign in."));
	}
}
