use serde::{Deserialize, Deserializer, Serialize};

use crate::canonical;
use crate::error::IpnError;

/// Wire names of every field covered by the signature, in declaration order.
///
/// This list is the canonicalization contract: adding, removing or renaming
/// an entry invalidates every signature the gateway has issued.
pub const SIGNED_FIELDS: [&str; 15] = [
    "cryptocurrencyapi.net",
    "chain",
    "currency",
    "type",
    "date",
    "from",
    "to",
    "token",
    "tokenContract",
    "amount",
    "fee",
    "txid",
    "pos",
    "confirmation",
    "label",
];

/// One payment notification as posted by the gateway.
///
/// Absent and `null` fields bind to their zero value and are signed as such.
/// A field of any other wrong JSON type is rejected at deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    /// Notification format version.
    #[serde(rename = "cryptocurrencyapi.net", deserialize_with = "null_as_default")]
    pub protocol_version: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub chain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    /// Direction: `"in"` for incoming deposits.
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    /// Unix timestamp in seconds.
    #[serde(deserialize_with = "null_as_default")]
    pub date: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub from: String,
    #[serde(deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(deserialize_with = "null_as_default")]
    pub token: String,
    #[serde(rename = "tokenContract", deserialize_with = "null_as_default")]
    pub token_contract: String,
    /// Decimal string, parsed only for incoming deposits.
    #[serde(deserialize_with = "null_as_default")]
    pub amount: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fee: String,
    #[serde(deserialize_with = "null_as_default")]
    pub txid: String,
    /// Output index within the transaction.
    #[serde(deserialize_with = "null_as_default")]
    pub pos: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub confirmation: i64,
    /// Opaque label set when the address was issued; a user id for deposits.
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    /// Lowercase hex SHA-1 signature. Never part of the canonical string.
    #[serde(deserialize_with = "null_as_default")]
    pub sign: String,
}

/// Reads `null` as the type's zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Notification {
    /// Parse a raw callback body.
    pub fn from_json(body: &[u8]) -> Result<Self, IpnError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Every signed field as `(wire name, text)`, integers in decimal.
    pub fn signed_fields(&self) -> impl Iterator<Item = (&'static str, String)> {
        // Same order as SIGNED_FIELDS.
        let values = [
            self.protocol_version.to_string(),
            self.chain.clone(),
            self.currency.clone(),
            self.kind.clone(),
            self.date.to_string(),
            self.from.clone(),
            self.to.clone(),
            self.token.clone(),
            self.token_contract.clone(),
            self.amount.clone(),
            self.fee.clone(),
            self.txid.clone(),
            self.pos.to_string(),
            self.confirmation.to_string(),
            self.label.clone(),
        ];
        SIGNED_FIELDS.into_iter().zip(values)
    }

    /// The string the gateway signed for this notification.
    pub fn canonical_string(&self) -> String {
        canonical::canonical_string(self.signed_fields())
    }

    pub fn is_deposit(&self) -> bool {
        self.kind == crate::DIRECTION_IN
    }
}
