//! Concurrent deposit-address round across every configured provider.

use futures::future::join_all;

use crate::error::FetchError;
use crate::provider::{ProviderEndpoint, ProviderTable};
use crate::wallet::Wallet;

/// Source of deposit addresses for one provider endpoint.
pub trait AddressSource: Send + Sync {
    /// Request one address for `label` from `endpoint`. A single attempt.
    fn fetch(
        &self,
        endpoint: &ProviderEndpoint,
        label: &str,
    ) -> impl std::future::Future<Output = Result<Wallet, FetchError>> + Send;
}

/// Fetch one address per provider concurrently and keep the successes.
///
/// Every call is started before any is awaited and the round waits for all of
/// them. Each call writes into its own slot, so no shared collection is
/// mutated concurrently. A failed provider is logged and left out; the round
/// itself never fails, and an empty result is a valid answer.
///
/// Callers must not rely on the order of the returned wallets.
pub async fn fan_out<S: AddressSource>(
    source: &S,
    table: &ProviderTable,
    label: &str,
) -> Vec<Wallet> {
    let calls = table.endpoints().iter().map(|endpoint| async move {
        let result = source.fetch(endpoint, label).await;
        (endpoint.name.as_str(), result)
    });

    let slots = join_all(calls).await;

    let wallets: Vec<Wallet> = slots
        .into_iter()
        .filter_map(|(provider, result)| match result {
            Ok(wallet) => Some(wallet),
            Err(e) => {
                tracing::warn!(provider, error = %e, "address fetch failed, provider skipped");
                None
            }
        })
        .collect();

    tracing::debug!(
        requested = table.len(),
        received = wallets.len(),
        "address round complete"
    );
    wallets
}
