/// The label a drifting or empty classifier response falls back to.
pub const FALLBACK_CATEGORY: &str = "General";

/// The recommended closed set, with the one-line descriptions the classifier
/// prompt presents. `category` itself stays an open string column; tickets
/// submitted with a custom label keep it.
pub const RECOMMENDED_CATEGORIES: [(&str, &str); 6] = [
	("Refund", "Requests for money back, refunds, returns"),
	("Payment Failure", "Failed payments, declined cards, billing issues"),
	("Invoice", "Invoice requests, billing questions, payment confirmations"),
	("Technical Issue", "Software bugs, login problems, feature requests"),
	("Account", "Account management, password resets, profile changes"),
	("General", "General inquiries, feedback, other"),
];

/// Cleans up a classifier label: strips whitespace and stray quoting, maps an
/// empty result to [`FALLBACK_CATEGORY`], and canonicalizes case drift against
/// the recommended set. Labels outside the set pass through as-is.
pub fn normalize_category(label: &str) -> String {
	let trimmed = label.trim().trim_matches(|c| matches!(c, '"' | '\'' | '.' | '`')).trim();

	if trimmed.is_empty() {
		return FALLBACK_CATEGORY.to_string();
	}

	for (name, _) in RECOMMENDED_CATEGORIES {
		if name.eq_ignore_ascii_case(trimmed) {
			return name.to_string();
		}
	}

	trimmed.to_string()
}
