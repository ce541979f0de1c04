use ipn::{AddressSource, FetchError, ProviderEndpoint, Wallet};
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::{LazyLock, Once};

pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// Notification outcomes
pub static NOTIFICATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new("ipn_notifications_total", "Inbound notifications by outcome"),
        &["outcome"],
    )
    .unwrap()
});

pub static DEPOSITS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("ipn_deposits_total", "Verified incoming deposits").unwrap()
});

// Address fan-out
pub static PROVIDER_FETCH_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "ipn_provider_fetch_total",
            "Deposit address requests per provider and result",
        ),
        &["provider", "result"],
    )
    .unwrap()
});

pub static GIVE_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "ipn_give_duration_seconds",
            "Latency of a full deposit address round",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
    )
    .unwrap()
});

static REGISTER: Once = Once::new();

/// Register all metrics with the registry. Later calls are no-ops.
pub fn register_metrics() {
    REGISTER.call_once(|| {
        REGISTRY
            .register(Box::new(NOTIFICATIONS_TOTAL.clone()))
            .unwrap();
        REGISTRY.register(Box::new(DEPOSITS_TOTAL.clone())).unwrap();
        REGISTRY
            .register(Box::new(PROVIDER_FETCH_TOTAL.clone()))
            .unwrap();
        REGISTRY.register(Box::new(GIVE_DURATION.clone())).unwrap();
    });
}

pub fn metrics_output() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&REGISTRY.gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Counts every provider call made through the wrapped source.
#[derive(Debug, Clone)]
pub struct MeteredSource<S> {
    inner: S,
}

impl<S> MeteredSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: AddressSource> AddressSource for MeteredSource<S> {
    async fn fetch(&self, endpoint: &ProviderEndpoint, label: &str) -> Result<Wallet, FetchError> {
        let result = self.inner.fetch(endpoint, label).await;
        let outcome = match &result {
            Ok(_) => "success",
            Err(FetchError::Status(_)) => "status",
            Err(FetchError::Transport(_)) => "transport",
            Err(FetchError::Decode(_)) => "decode",
        };
        PROVIDER_FETCH_TOTAL
            .with_label_values(&[endpoint.name.as_str(), outcome])
            .inc();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl AddressSource for Failing {
        async fn fetch(&self, _: &ProviderEndpoint, _: &str) -> Result<Wallet, FetchError> {
            Err(FetchError::Status(502))
        }
    }

    #[tokio::test]
    async fn metered_source_counts_failures() {
        let endpoint = ProviderEndpoint::new("metered-test", "/x");
        let before = PROVIDER_FETCH_TOTAL
            .with_label_values(&["metered-test", "status"])
            .get();

        let source = MeteredSource::new(Failing);
        assert!(source.fetch(&endpoint, "l").await.is_err());

        let after = PROVIDER_FETCH_TOTAL
            .with_label_values(&["metered-test", "status"])
            .get();
        assert_eq!(after, before + 1);
    }

    #[test]
    fn register_is_idempotent() {
        register_metrics();
        register_metrics();
        NOTIFICATIONS_TOTAL.with_label_values(&["verified"]).inc();
        assert!(metrics_output().contains("ipn_notifications_total"));
    }
}
