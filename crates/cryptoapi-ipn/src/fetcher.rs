use std::time::Duration;

use crate::aggregator::AddressSource;
use crate::error::FetchError;
use crate::provider::ProviderEndpoint;
use crate::wallet::{GiveEnvelope, Wallet};
use crate::{API_BASE_URL, DEFAULT_PERIOD, FETCH_TIMEOUT};

/// Redirect hops followed per provider call.
pub const MAX_REDIRECTS: usize = 3;

/// Requests deposit addresses from the gateway over HTTP.
///
/// Wraps a `reqwest::Client` with a per-request timeout. Up to
/// [`MAX_REDIRECTS`] redirects are followed while they stay on the original
/// host; a redirect to another host is not followed and surfaces as
/// [`FetchError::Status`], so the key-bearing URL never leaves the gateway.
/// The API key is only ever placed into the request URL, which is never
/// logged or included in errors.
#[derive(Clone)]
pub struct AddressFetcher {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    period: String,
}

impl AddressFetcher {
    /// Fetcher against the production API with the default period and timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> AddressFetcherBuilder {
        AddressFetcherBuilder {
            api_key: api_key.into(),
            base_url: API_BASE_URL.to_string(),
            period: DEFAULT_PERIOD.to_string(),
            timeout: FETCH_TIMEOUT,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for AddressFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressFetcher")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("period", &self.period)
            .finish()
    }
}

/// Builder for [`AddressFetcher`].
pub struct AddressFetcherBuilder {
    api_key: String,
    base_url: String,
    period: String,
    timeout: Duration,
}

impl AddressFetcherBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.period = period.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<AddressFetcher, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(same_host_redirects())
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(AddressFetcher {
            http,
            base_url: self.base_url,
            api_key: self.api_key,
            period: self.period,
        })
    }
}

fn same_host_redirects() -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(|attempt| {
        let origin_host = attempt
            .previous()
            .first()
            .and_then(|url| url.host_str())
            .map(str::to_owned);
        if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if attempt.url().host_str() != origin_host.as_deref() {
            attempt.stop()
        } else {
            attempt.follow()
        }
    })
}

impl AddressSource for AddressFetcher {
    async fn fetch(&self, endpoint: &ProviderEndpoint, label: &str) -> Result<Wallet, FetchError> {
        let url = endpoint.render(&self.base_url, &self.api_key, label, &self.period);

        // reqwest errors embed the URL; strip it so the key cannot leak.
        let resp = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let envelope: GiveEnvelope = resp
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.without_url().to_string()))?;

        tracing::debug!(provider = %endpoint.name, "deposit address received");
        Ok(envelope.into_wallet(&endpoint.name))
    }
}
