//! Payment-notification (IPN) handling for the cryptocurrencyapi.net gateway.
//!
//! Two independent flows live here:
//!
//! - **Inbound notifications**: a [`Notification`] is reduced to a canonical
//!   string ([`canonical`]), authenticated with the gateway's legacy hash chain
//!   ([`LegacySignature`]) and gated by confirmation count and protocol version
//!   ([`classify`]).
//! - **Deposit addresses**: one [`AddressSource::fetch`] per configured
//!   provider, run concurrently by [`fan_out`]; failed providers are dropped
//!   from the round instead of failing it.
//!
//! # Quick example
//!
//! ```
//! use ipn::{classify, LegacySignature, Notification, Outcome, SignatureScheme};
//!
//! let scheme = LegacySignature::new(b"api-key");
//! let mut n = Notification {
//!     protocol_version: 3,
//!     confirmation: 4,
//!     kind: "out".to_string(),
//!     ..Default::default()
//! };
//! n.sign = scheme.sign(&n.canonical_string());
//!
//! assert!(matches!(
//!     classify(&n, &scheme),
//!     Ok(Outcome::Verified { deposit: None })
//! ));
//! ```

// Inbound notifications
pub mod canonical;
pub mod classifier;
pub mod constants;
pub mod error;
pub mod notification;
pub mod security;
pub mod signature;

// Deposit address fan-out
pub mod aggregator;
#[cfg(feature = "http")]
pub mod fetcher;
pub mod provider;
pub mod wallet;

// Re-exports
pub use aggregator::{fan_out, AddressSource};
pub use canonical::canonical_string;
pub use classifier::{classify, Deposit, Outcome};
pub use constants::*;
pub use error::{FetchError, IpnError};
pub use notification::{Notification, SIGNED_FIELDS};
pub use provider::{ProviderEndpoint, ProviderTable};
pub use signature::{LegacySignature, SignatureScheme};
pub use wallet::{GiveEnvelope, Wallet};

#[cfg(feature = "http")]
pub use fetcher::AddressFetcher;
