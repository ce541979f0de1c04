use std::env;
use std::time::Duration;

use ipn::provider::ProviderTableError;
use ipn::ProviderTable;
use url::Url;

const DEFAULT_PORT: u16 = 8080;

#[derive(Clone)]
pub struct ServerConfig {
    /// Gateway API key, substituted into outbound URLs
    pub api_key: String,
    /// Shared secret for the notification signature chain
    pub secret: Vec<u8>,
    /// Gateway API base URL
    pub api_base: String,
    /// Value for the `{period}` placeholder
    pub period: String,
    /// Per-provider request timeout
    pub fetch_timeout: Duration,
    /// Providers queried by `/give`
    pub providers: ProviderTable,
    /// Label used by `/give` when the caller gives none
    pub default_label: String,
    /// Server port
    pub port: u16,
    /// CORS allowed origins (empty = localhost only)
    pub allowed_origins: Vec<String>,
    /// Bearer token required for /metrics
    pub metrics_token: Option<String>,
    /// Serve /metrics without a token when none is configured
    pub public_metrics: bool,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("api_key", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("period", &self.period)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("providers", &self.providers.names().collect::<Vec<_>>())
            .field("default_label", &self.default_label)
            .field("port", &self.port)
            .field("allowed_origins", &self.allowed_origins)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("public_metrics", &self.public_metrics)
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

        // Required: API key
        let api_key = var("IPN_API_KEY").ok_or(ConfigError::MissingRequired("IPN_API_KEY"))?;

        // Optional: signature secret, the gateway signs with the API key by default
        let secret = match var("IPN_SECRET") {
            Some(s) => s.into_bytes(),
            None => {
                tracing::info!("IPN_SECRET not set, verifying notifications with IPN_API_KEY");
                api_key.clone().into_bytes()
            }
        };

        // Optional: API base URL
        let api_base = var("IPN_API_BASE").unwrap_or_else(|| ipn::API_BASE_URL.to_string());
        Url::parse(&api_base).map_err(|_| ConfigError::InvalidUrl(api_base.clone()))?;

        let period = var("IPN_PERIOD").unwrap_or_else(|| ipn::DEFAULT_PERIOD.to_string());

        let fetch_timeout = match var("IPN_FETCH_TIMEOUT_SECS") {
            Some(s) => Duration::from_secs(parse_number("IPN_FETCH_TIMEOUT_SECS", &s)?),
            None => ipn::FETCH_TIMEOUT,
        };

        // Optional: provider table override
        let providers = match var("IPN_PROVIDERS") {
            Some(entries) => ProviderTable::parse(&entries)?,
            None => ProviderTable::default(),
        };

        let default_label =
            var("IPN_DEFAULT_LABEL").unwrap_or_else(|| ipn::DEFAULT_LABEL.to_string());

        let port = match var("PORT") {
            Some(s) => parse_number("PORT", &s)?,
            None => DEFAULT_PORT,
        };

        let allowed_origins: Vec<String> = var("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let metrics_token = var("METRICS_TOKEN");

        let public_metrics = var("IPN_PUBLIC_METRICS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        if metrics_token.is_none() && !public_metrics {
            tracing::warn!(
                "METRICS_TOKEN not set; /metrics is disabled (set IPN_PUBLIC_METRICS=true to expose it)"
            );
        }

        Ok(Self {
            api_key,
            secret,
            api_base,
            period,
            fetch_timeout,
            providers,
            default_label,
            port,
            allowed_origins,
            metrics_token,
            public_metrics,
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid number in {name}: {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("invalid provider table: {0}")]
    InvalidProviders(#[from] ProviderTableError),
}
