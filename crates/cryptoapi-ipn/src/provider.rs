//! Provider endpoint table for deposit address requests.
//!
//! Each endpoint is a path template relative to the API base URL carrying
//! three placeholders: `{key}`, `{label}` and `{period}`.

use std::collections::HashSet;

/// Placeholder for the API key.
pub const KEY_PLACEHOLDER: &str = "{key}";
/// Placeholder for the caller's opaque label.
pub const LABEL_PLACEHOLDER: &str = "{label}";
/// Placeholder for the polling period.
pub const PERIOD_PLACEHOLDER: &str = "{period}";

/// One named provider and its endpoint template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    pub name: String,
    pub template: String,
}

impl ProviderEndpoint {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }

    /// Full request URL. Only the first occurrence of each placeholder is
    /// replaced; key and label are percent-encoded.
    pub fn render(&self, base_url: &str, api_key: &str, label: &str, period: &str) -> String {
        let path = self
            .template
            .replacen(KEY_PLACEHOLDER, &urlencoding::encode(api_key), 1)
            .replacen(LABEL_PLACEHOLDER, &urlencoding::encode(label), 1)
            .replacen(PERIOD_PLACEHOLDER, period, 1);
        format!("{}{}", base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProviderTableError {
    #[error("provider table is empty")]
    Empty,

    #[error("malformed provider entry {0:?} (expected Name=template)")]
    Malformed(String),

    #[error("duplicate provider name: {0}")]
    Duplicate(String),
}

/// Read-only list of provider endpoints, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTable {
    endpoints: Vec<ProviderEndpoint>,
}

impl ProviderTable {
    pub fn new(endpoints: Vec<ProviderEndpoint>) -> Result<Self, ProviderTableError> {
        if endpoints.is_empty() {
            return Err(ProviderTableError::Empty);
        }
        let mut seen = HashSet::new();
        for endpoint in &endpoints {
            if !seen.insert(endpoint.name.as_str()) {
                return Err(ProviderTableError::Duplicate(endpoint.name.clone()));
            }
        }
        Ok(Self { endpoints })
    }

    /// Parse `Name=template,Name=template`. Names are split on the first `=`.
    pub fn parse(entries: &str) -> Result<Self, ProviderTableError> {
        let endpoints = entries
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (name, template) = entry
                    .split_once('=')
                    .ok_or_else(|| ProviderTableError::Malformed(entry.to_string()))?;
                let (name, template) = (name.trim(), template.trim());
                if name.is_empty() || template.is_empty() {
                    return Err(ProviderTableError::Malformed(entry.to_string()));
                }
                Ok(ProviderEndpoint::new(name, template))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(endpoints)
    }

    pub fn endpoints(&self) -> &[ProviderEndpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.iter().map(|e| e.name.as_str())
    }
}

impl Default for ProviderTable {
    /// The coins enabled on the gateway account.
    fn default() -> Self {
        Self {
            endpoints: vec![
                ProviderEndpoint::new(
                    "USDT",
                    "/trx/.give?key={key}&label={label}&period={period}&token=USDT",
                ),
                ProviderEndpoint::new(
                    "Bitcoin",
                    "/btc/.give?key={key}&label={label}&period={period}&token=BTC",
                ),
                ProviderEndpoint::new(
                    "Ethereum",
                    "/eth/.give?key={key}&label={label}&period={period}",
                ),
                ProviderEndpoint::new(
                    "Litecoin",
                    "/ltc/.give?key={key}&label={label}&period={period}&token=LTC",
                ),
            ],
        }
    }
}
