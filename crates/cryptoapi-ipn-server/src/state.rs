use ipn::{AddressFetcher, FetchError, LegacySignature, ProviderTable, SignatureScheme};

use crate::config::ServerConfig;
use crate::metrics::MeteredSource;

/// Shared application state. Read-only once built.
pub struct AppState {
    /// Verifies notification signatures.
    pub scheme: Box<dyn SignatureScheme>,
    /// Issues deposit addresses, one provider at a time.
    pub addresses: MeteredSource<AddressFetcher>,
    pub providers: ProviderTable,
    pub default_label: String,
    /// Bearer token for /metrics.
    pub metrics_token: Option<Vec<u8>>,
    pub public_metrics: bool,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self, FetchError> {
        let fetcher = AddressFetcher::builder(config.api_key.clone())
            .base_url(config.api_base.clone())
            .period(config.period.clone())
            .timeout(config.fetch_timeout)
            .build()?;

        Ok(Self {
            scheme: Box::new(LegacySignature::new(&config.secret)),
            addresses: MeteredSource::new(fetcher),
            providers: config.providers.clone(),
            default_label: config.default_label.clone(),
            metrics_token: config.metrics_token.as_ref().map(|t| t.as_bytes().to_vec()),
            public_metrics: config.public_metrics,
        })
    }
}
