mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Postgres, Providers, Service, Storage,
	Triage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, provider) in
		[("classifier", &cfg.providers.classifier), ("drafter", &cfg.providers.drafter)]
	{
		if provider.timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("providers.{label}.timeout_ms must be greater than zero."),
			});
		}
		if provider.max_tokens == 0 {
			return Err(Error::Validation {
				message: format!("providers.{label}.max_tokens must be greater than zero."),
			});
		}
		if !provider.temperature.is_finite() || !(0.0..=2.0).contains(&provider.temperature) {
			return Err(Error::Validation {
				message: format!("providers.{label}.temperature must be between 0.0 and 2.0."),
			});
		}
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("classifier", &cfg.providers.classifier.api_key),
		("drafter", &cfg.providers.drafter.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	if cfg.triage.similar_k == 0 {
		return Err(Error::Validation {
			message: "triage.similar_k must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for api_base in [
		&mut cfg.providers.embedding.api_base,
		&mut cfg.providers.classifier.api_base,
		&mut cfg.providers.drafter.api_base,
	] {
		while api_base.ends_with('/') {
			api_base.pop();
		}
	}
}
