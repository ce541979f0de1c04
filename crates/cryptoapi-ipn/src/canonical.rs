//! Canonical encoding of a notification's field set.
//!
//! Values are ordered by ascending byte-wise field name and joined with `:`.
//! No escaping is done, so the encoding is deterministic but not reversible:
//! a `:` inside a value is indistinguishable from a field boundary.

use std::collections::BTreeMap;

use crate::SIGN_FIELD;

/// Separator between values, and between the canonical string and the secret
/// digest.
pub const SEPARATOR: char = ':';

/// Encode a field set into its canonical string.
///
/// The field named [`SIGN_FIELD`] is skipped. Input order is irrelevant; for a
/// repeated name the last value wins. Empty values are kept as empty text.
pub fn canonical_string<N, V, I>(fields: I) -> String
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: Into<String>,
{
    let sorted: BTreeMap<String, String> = fields
        .into_iter()
        .filter(|(name, _)| name.as_ref() != SIGN_FIELD)
        .map(|(name, value)| (name.as_ref().to_owned(), value.into()))
        .collect();

    let mut out = String::new();
    for (i, value) in sorted.values().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(value);
    }
    out
}
