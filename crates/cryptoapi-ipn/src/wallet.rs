use serde::{Deserialize, Serialize};

/// A deposit address handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Provider name from the endpoint table.
    pub name: String,
    /// QR payload for the address.
    pub qrcode: String,
    pub address: String,
}

/// Body of a provider's `.give` response.
#[derive(Deserialize)]
pub struct GiveEnvelope {
    #[serde(default)]
    pub result: GiveResult,
}

/// The envelope's `result` object.
///
/// The gateway may include the address's key pair. Those fields are parsed so
/// the body decodes, but they never leave this type: [`GiveEnvelope::into_wallet`]
/// drops them and `Debug` redacts them.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct GiveResult {
    pub address: String,
    #[serde(rename = "publicKey")]
    public_key: String,
    #[serde(rename = "privateKey")]
    private_key: String,
    #[serde(rename = "QR")]
    pub qr: String,
}

impl GiveEnvelope {
    /// Normalize into a [`Wallet`] owned by `provider`.
    pub fn into_wallet(self, provider: &str) -> Wallet {
        Wallet {
            name: provider.to_string(),
            qrcode: self.result.qr,
            address: self.result.address,
        }
    }
}

impl std::fmt::Debug for GiveResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GiveResult")
            .field("address", &self.address)
            .field(
                "public_key",
                &(!self.public_key.is_empty()).then_some("[REDACTED]"),
            )
            .field(
                "private_key",
                &(!self.private_key.is_empty()).then_some("[REDACTED]"),
            )
            .field("qr", &self.qr)
            .finish()
    }
}

impl std::fmt::Debug for GiveEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GiveEnvelope")
            .field("result", &self.result)
            .finish()
    }
}
