//! Client Config

use std::time::Duration;

use clap::Args;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

/// Errors raised while interpreting client settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The currency code is not an ISO 4217 code.
    #[error("unknown currency `{0}`")]
    UnknownCurrency(String),
}

/// Client settings, usually flattened into a front end's own CLI.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Base URL of the Tiffin JSON API
    #[arg(long, env = "TIFFIN_API_URL", default_value = "http://localhost:9000")]
    pub api_url: String,

    /// Per request timeout in seconds, at least one
    #[arg(
        long,
        env = "TIFFIN_TIMEOUT_SECONDS",
        default_value_t = 15,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_seconds: u64,

    /// Extra attempts for idempotent GET requests
    #[arg(long, env = "TIFFIN_GET_RETRIES", default_value_t = 1)]
    pub get_retries: usize,

    /// ISO 4217 code prices are shown in
    #[arg(long, env = "TIFFIN_CURRENCY", default_value = "LKR")]
    pub currency: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:9000".to_string(),
            timeout_seconds: 15,
            get_retries: 1,
            currency: "LKR".to_string(),
        }
    }
}

impl ClientConfig {
    /// Per request timeout. Zero is raised to one second.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }

    /// Currency used to render prices.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for codes rusty-money does not
    /// know.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        iso::find(&self.currency.to_uppercase())
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        client: ClientConfig,
    }

    #[test]
    fn flag_defaults_match_default_impl() -> TestResult {
        let parsed = Cli::try_parse_from(["tiffin"])?.client;
        let default = ClientConfig::default();

        assert_eq!(parsed.timeout(), Duration::from_secs(15));
        assert_eq!(parsed.get_retries, default.get_retries);
        assert_eq!(parsed.currency()?.iso_alpha_code, "LKR");

        Ok(())
    }

    #[test]
    fn zero_timeout_flag_is_rejected() {
        let result = Cli::try_parse_from(["tiffin", "--timeout-seconds", "0"]);

        assert!(result.is_err(), "a zero timeout must not parse");
    }

    #[test]
    fn zero_timeout_field_is_raised_to_one_second() {
        let config = ClientConfig {
            timeout_seconds: 0,
            ..ClientConfig::default()
        };

        assert_eq!(config.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn currency_codes_are_case_insensitive() -> TestResult {
        let config = ClientConfig {
            currency: "gbp".to_string(),
            ..ClientConfig::default()
        };

        assert_eq!(config.currency()?.iso_alpha_code, "GBP");

        Ok(())
    }

    #[test]
    fn unknown_currency_is_an_error() {
        let config = ClientConfig {
            currency: "XYZ1".to_string(),
            ..ClientConfig::default()
        };

        assert!(matches!(
            config.currency(),
            Err(ConfigError::UnknownCurrency(code)) if code == "XYZ1"
        ));
    }
}
