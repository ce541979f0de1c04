use std::time::Duration;

/// Base URL of the gateway's REST API. Endpoint templates are appended to it.
pub const API_BASE_URL: &str = "https://new.cryptocurrencyapi.net/api";

/// Value substituted for `{period}` in endpoint templates.
pub const DEFAULT_PERIOD: &str = "10";

/// Label used when a caller does not supply one.
pub const DEFAULT_LABEL: &str = "user_id";

/// Upper bound on a single provider call.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Oldest notification format this crate understands.
pub const MIN_PROTOCOL_VERSION: i64 = 3;

/// Notifications at or below this confirmation count are acknowledged
/// without verification. 0 = mempool, 1 = first block.
pub const PENDING_CONFIRMATIONS: i64 = 1;

/// Wire name of the field that carries the signature.
pub const SIGN_FIELD: &str = "sign";

/// Notification `type` value for incoming deposits.
pub const DIRECTION_IN: &str = "in";
