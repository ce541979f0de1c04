//! Gate a notification before and after signature verification.
//!
//! Gates run in a fixed order and each one returns early:
//!
//! 1. confirmation count at or below [`PENDING_CONFIRMATIONS`] is acknowledged
//!    without looking at the signature. The gateway pings early for mempool
//!    and first-block states; those callbacks are unauthenticated and must not
//!    trigger anything beyond the acknowledgement.
//! 2. protocol version below [`MIN_PROTOCOL_VERSION`] is acknowledged.
//! 3. the signature is verified.
//!
//! Verified incoming deposits additionally have their amount and label parsed.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::IpnError;
use crate::notification::Notification;
use crate::signature::SignatureScheme;
use crate::{MIN_PROTOCOL_VERSION, PENDING_CONFIRMATIONS};

/// A verified incoming deposit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deposit {
    pub user_id: i64,
    pub amount: Decimal,
    pub currency: String,
    pub txid: String,
}

/// Result of a notification that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Too few confirmations; signature not checked.
    AwaitingConfirmation(i64),
    /// Notification format older than this service understands.
    UnsupportedVersion(i64),
    /// Signature verified. `deposit` is set for `type == "in"`.
    Verified { deposit: Option<Deposit> },
}

impl Outcome {
    /// Informational message returned to the gateway.
    pub fn message(&self) -> String {
        match self {
            Outcome::AwaitingConfirmation(n) => format!("confirmation: {n}"),
            Outcome::UnsupportedVersion(v) => format!("cryptocurrencyapi.net: {v}"),
            Outcome::Verified { .. } => "OK".to_string(),
        }
    }

    /// Stable label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::AwaitingConfirmation(_) => "awaiting_confirmation",
            Outcome::UnsupportedVersion(_) => "unsupported_version",
            Outcome::Verified { .. } => "verified",
        }
    }
}

/// Run every gate over `notification`.
pub fn classify(
    notification: &Notification,
    scheme: &dyn SignatureScheme,
) -> Result<Outcome, IpnError> {
    if notification.confirmation <= PENDING_CONFIRMATIONS {
        return Ok(Outcome::AwaitingConfirmation(notification.confirmation));
    }

    if notification.protocol_version < MIN_PROTOCOL_VERSION {
        return Ok(Outcome::UnsupportedVersion(notification.protocol_version));
    }

    if !scheme.verify(&notification.canonical_string(), &notification.sign) {
        return Err(IpnError::SignatureMismatch);
    }

    let deposit = if notification.is_deposit() {
        Some(parse_deposit(notification)?)
    } else {
        None
    };

    Ok(Outcome::Verified { deposit })
}

fn parse_deposit(notification: &Notification) -> Result<Deposit, IpnError> {
    let amount = Decimal::from_str(&notification.amount)
        .or_else(|_| Decimal::from_scientific(&notification.amount))
        .map_err(|e| IpnError::InvalidAmount {
            value: notification.amount.clone(),
            reason: e.to_string(),
        })?;

    let user_id = notification
        .label
        .parse::<i64>()
        .map_err(|e| IpnError::InvalidLabel {
            value: notification.label.clone(),
            reason: e.to_string(),
        })?;

    Ok(Deposit {
        user_id,
        amount,
        currency: notification.currency.clone(),
        txid: notification.txid.clone(),
    })
}
