use std::{fmt::Write, time::Duration};

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

const SYSTEM_PROMPT: &str = "You are a professional customer support agent. Generate helpful, \
	empathetic responses. Do not include subject lines or 'Re:' prefixes in your responses. Start \
	directly with the greeting and provide a complete, professional response.";

/// A prior ticket injected into the draft prompt as reference material.
#[derive(Clone, Debug)]
pub struct SimilarContext {
	pub subject: String,
	pub body: String,
	pub prior_response: Option<String>,
}

/// Generates a reply draft conditioned on the ticket and up to a handful of
/// similar past tickets. Output length is bounded by `cfg.max_tokens`; the
/// trimmed text is returned, and an empty draft is an invalid response (an
/// empty `ai_response` would make the ticket unapprovable).
pub async fn draft(
	cfg: &triage_config::LlmProviderConfig,
	subject: &str,
	body: &str,
	category: &str,
	similar: &[SimilarContext],
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let request = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
		"messages": [
			{ "role": "system", "content": SYSTEM_PROMPT },
			{ "role": "user", "content": draft_prompt(subject, body, category, similar) },
		],
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&request)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;
	let text = crate::parse_chat_content(&json)?;

	if text.is_empty() {
		return Err(Error::InvalidResponse {
			message: "Draft provider returned an empty response.".to_string(),
		});
	}

	Ok(text)
}

fn draft_prompt(
	subject: &str,
	body: &str,
	category: &str,
	similar: &[SimilarContext],
) -> String {
	let mut prompt = format!(
		"Generate a helpful, empathetic response to the following customer email.\n\n\
		Customer Email:\nSubject: {subject}\nBody: {body}\nCategory: {category}\n"
	);

	if !similar.is_empty() {
		prompt.push_str("\nHere are some similar past tickets and their responses for reference:\n");

		for ticket in similar {
			let response = ticket.prior_response.as_deref().unwrap_or("No response available");
			let _ = write!(
				prompt,
				"\nSimilar Ticket:\nSubject: {}\nBody: {}\nResponse: {}\n",
				ticket.subject, ticket.body, response
			);
		}
	}

	prompt.push_str(
		"\nGuidelines:\n\
		- Be professional, empathetic, and helpful\n\
		- Address the customer's specific concern\n\
		- Keep the response concise but comprehensive\n\
		- Use a friendly but professional tone\n\
		- If you need more information, ask for it politely\n\
		- Don't make promises you can't keep\n\
		- Do NOT include a subject line or \"Re:\" prefix\n\
		- Start directly with the greeting and response content\n\
		- End with a professional signature\n\n\
		Generate a response:",
	);

	prompt
}
