use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::format::{Currency, FormatOptions, Locale};

/// Formatting settings read from a JSON file such as
/// `{ "locale": "de-DE", "currency": "EUR" }`. Missing keys fall through to
/// the host locale and US dollars.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub locale: Option<String>,
    pub currency: Option<String>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        log::debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Values from `overrides` win over values in `self`.
    pub fn merge(self, overrides: AppConfig) -> Self {
        Self {
            locale: overrides.locale.or(self.locale),
            currency: overrides.currency.or(self.currency),
        }
    }

    /// Resolves the formatter options, using `host` when no locale is set.
    pub fn format_options(&self, host: Locale) -> Result<FormatOptions, ConfigError> {
        let locale = match &self.locale {
            Some(tag) => tag.parse()?,
            None => host,
        };
        let currency = match &self.currency {
            Some(code) => code.parse()?,
            None => Currency::default(),
        };
        Ok(FormatOptions { locale, currency })
    }
}
