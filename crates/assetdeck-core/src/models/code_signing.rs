use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AssetRecord, DatasetKind};
use crate::utils::{cmp_ignore_case, cmp_instants};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub enum CodeSigningStatus {
    #[default]
    Active,
    Expired,
    Revoked,
}

impl CodeSigningStatus {
    pub const ALL: [CodeSigningStatus; 3] = [
        CodeSigningStatus::Active,
        CodeSigningStatus::Expired,
        CodeSigningStatus::Revoked,
    ];
}

impl fmt::Display for CodeSigningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeSigningStatus::Active => write!(f, "Active"),
            CodeSigningStatus::Expired => write!(f, "Expired"),
            CodeSigningStatus::Revoked => write!(f, "Revoked"),
        }
    }
}

/// Trust level, ordered from most to least trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub enum TrustLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustLevel::High => write!(f, "High"),
            TrustLevel::Medium => write!(f, "Medium"),
            TrustLevel::Low => write!(f, "Low"),
        }
    }
}

/// Where the private key material lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub enum Protection {
    Hsm,
    #[default]
    Software,
    CloudKms,
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protection::Hsm => write!(f, "HSM"),
            Protection::Software => write!(f, "Software"),
            Protection::CloudKms => write!(f, "Cloud KMS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSigningSort {
    ExpiryDate,
    Name,
    /// Most trusted first
    TrustLevel,
}

impl fmt::Display for CodeSigningSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeSigningSort::ExpiryDate => write!(f, "Expiry"),
            CodeSigningSort::Name => write!(f, "Name"),
            CodeSigningSort::TrustLevel => write!(f, "Trust"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct CodeSigningKey {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub algorithm: String,
    #[serde(default)]
    pub created_date: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub status: CodeSigningStatus,
    #[serde(default)]
    pub trust_level: TrustLevel,
    #[serde(default)]
    pub protection: Protection,
    #[serde(default)]
    pub signature_count: u64,
}

impl AssetRecord for CodeSigningKey {
    type Category = CodeSigningStatus;
    type SortKey = CodeSigningSort;

    const KIND: DatasetKind = DatasetKind::CodeSigningKeys;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> CodeSigningStatus {
        self.status
    }

    fn categories() -> &'static [CodeSigningStatus] {
        &CodeSigningStatus::ALL
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.owner.as_str(), self.algorithm.as_str()]
    }

    fn sort_keys() -> &'static [CodeSigningSort] {
        &[CodeSigningSort::ExpiryDate, CodeSigningSort::Name, CodeSigningSort::TrustLevel]
    }

    fn default_sort() -> CodeSigningSort {
        CodeSigningSort::ExpiryDate
    }

    fn compare(a: &Self, b: &Self, key: CodeSigningSort) -> Ordering {
        match key {
            CodeSigningSort::ExpiryDate => cmp_instants(&a.expiry_date, &b.expiry_date),
            CodeSigningSort::Name => cmp_ignore_case(&a.name, &b.name),
            CodeSigningSort::TrustLevel => a.trust_level.cmp(&b.trust_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trust_level_orders_high_first() {
        assert!(TrustLevel::High < TrustLevel::Medium);
        assert!(TrustLevel::Medium < TrustLevel::Low);
    }

    #[test]
    fn test_protection_wire_format() {
        let parsed: Protection = serde_json::from_str("\"cloudKms\"").unwrap();
        assert_eq!(parsed, Protection::CloudKms);
        assert_eq!(parsed.to_string(), "Cloud KMS");
    }
}
