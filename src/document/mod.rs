//! Typed representation of a parsed NFC-e document
//!
//! A [`Document`] is built once per input source by [`parse_document`] and then
//! handed, read-only, to the load pipeline.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::{
    error::{ImportError, ImportResult},
    models::nfce::validators::validate_access_key,
};

pub mod parse;
pub mod xml;

pub use parse::parse_document;

/// Number of characters in front of the access key inside `infNFe/@Id` (`NFe`).
pub const ACCESS_KEY_PREFIX_LEN: usize = 3;

/// Length of a canonical access key.
pub const ACCESS_KEY_LEN: usize = 44;

/// The 44-digit canonical identifier of a fiscal document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccessKey(String);

impl AccessKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the access key from the raw `infNFe/@Id` value.
///
/// Exactly [`ACCESS_KEY_PREFIX_LEN`] characters are stripped; the rest must be
/// 44 ASCII digits. The check digit is not verified.
pub fn derive_access_key(raw_id: &str) -> ImportResult<AccessKey> {
    let split_at = raw_id
        .char_indices()
        .nth(ACCESS_KEY_PREFIX_LEN)
        .map(|(idx, _)| idx)
        .ok_or_else(|| {
            ImportError::invalid_key(raw_id, "identifier is too short to carry an access key")
        })?;

    let candidate = raw_id[split_at..].to_string();
    validate_access_key(&candidate).map_err(|err| match err {
        ImportError::Validation(reason) => ImportError::invalid_key(raw_id, reason),
        other => other,
    })?;

    Ok(AccessKey(candidate))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub access_key: AccessKey,
    pub number: i32,
    pub series: i32,
    pub issue_date: DateTime<FixedOffset>,
    pub total_value: Decimal,
    pub issuer: Issuer,
    pub line_items: Vec<LineItem>,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issuer {
    pub tax_id: String,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub code: String,
    pub description: String,
    pub quantity: Decimal,
    pub unit_value: Decimal,
    pub total_value: Decimal,
    /// Ordered PIS, COFINS, ICMS; each kind at most once.
    pub taxes: Vec<TaxDetail>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TaxKind {
    #[serde(rename = "PIS")]
    Pis,
    #[serde(rename = "COFINS")]
    Cofins,
    #[serde(rename = "ICMS")]
    Icms,
}

impl TaxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxKind::Pis => "PIS",
            TaxKind::Cofins => "COFINS",
            TaxKind::Icms => "ICMS",
        }
    }
}

impl fmt::Display for TaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxDetail {
    pub kind: TaxKind,
    pub situation_code: String,
    pub tax_base: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub method: String,
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_access_key_strips_prefix() {
        let key = derive_access_key("NFe35240112345678000199650010000012341234567890").unwrap();
        assert_eq!(key.as_str(), "35240112345678000199650010000012341234567890");
        assert_eq!(key.as_str().len(), ACCESS_KEY_LEN);
    }

    #[test]
    fn test_derive_access_key_rejects_short_remainder() {
        let err = derive_access_key("NFe3524011234").unwrap_err();
        assert!(matches!(err, ImportError::InvalidKey { .. }));
        assert!(err.to_string().contains("44"));
    }

    #[test]
    fn test_derive_access_key_rejects_non_digits() {
        let err = derive_access_key("NFe3524011234567800019965001000001234123456789X").unwrap_err();
        assert!(matches!(err, ImportError::InvalidKey { .. }));
    }

    #[test]
    fn test_derive_access_key_rejects_missing_prefix() {
        // 44 digits with nothing in front: stripping 3 characters leaves 41
        let err = derive_access_key("35240112345678000199650010000012341234567890").unwrap_err();
        assert!(matches!(err, ImportError::InvalidKey { .. }));
    }

    #[test]
    fn test_derive_access_key_rejects_tiny_input() {
        assert!(matches!(
            derive_access_key("NF"),
            Err(ImportError::InvalidKey { .. })
        ));
        assert!(matches!(
            derive_access_key("NFe"),
            Err(ImportError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_tax_kind_labels() {
        assert_eq!(TaxKind::Pis.as_str(), "PIS");
        assert_eq!(TaxKind::Cofins.to_string(), "COFINS");
        assert_eq!(TaxKind::Icms.as_str(), "ICMS");
    }
}
