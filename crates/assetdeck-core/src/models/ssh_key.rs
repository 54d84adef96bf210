use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AssetRecord, DatasetKind};
use crate::utils::{cmp_ignore_case, cmp_instants};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub enum SshKeyStatus {
    #[default]
    Active,
    Inactive,
    Revoked,
}

impl SshKeyStatus {
    pub const ALL: [SshKeyStatus; 3] = [
        SshKeyStatus::Active,
        SshKeyStatus::Inactive,
        SshKeyStatus::Revoked,
    ];
}

impl fmt::Display for SshKeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SshKeyStatus::Active => write!(f, "Active"),
            SshKeyStatus::Inactive => write!(f, "Inactive"),
            SshKeyStatus::Revoked => write!(f, "Revoked"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub enum KeyType {
    Rsa,
    #[default]
    Ed25519,
    Ecdsa,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Rsa => write!(f, "RSA"),
            KeyType::Ed25519 => write!(f, "ED25519"),
            KeyType::Ecdsa => write!(f, "ECDSA"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SshKeySort {
    Name,
    /// Most recently used first
    LastUsed,
    CreatedDate,
}

impl fmt::Display for SshKeySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SshKeySort::Name => write!(f, "Name"),
            SshKeySort::LastUsed => write!(f, "Last used"),
            SshKeySort::CreatedDate => write!(f, "Created"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct SshKey {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub key_type: KeyType,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default)]
    pub created_date: String,
    #[serde(default)]
    pub last_used: String,
    #[serde(default)]
    pub status: SshKeyStatus,
    #[serde(default)]
    pub servers: Vec<String>,
}

impl AssetRecord for SshKey {
    type Category = SshKeyStatus;
    type SortKey = SshKeySort;

    const KIND: DatasetKind = DatasetKind::SshKeys;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> SshKeyStatus {
        self.status
    }

    fn categories() -> &'static [SshKeyStatus] {
        &SshKeyStatus::ALL
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.owner.as_str(), self.fingerprint.as_str()]
    }

    fn sort_keys() -> &'static [SshKeySort] {
        &[SshKeySort::Name, SshKeySort::LastUsed, SshKeySort::CreatedDate]
    }

    fn default_sort() -> SshKeySort {
        SshKeySort::Name
    }

    fn compare(a: &Self, b: &Self, key: SshKeySort) -> Ordering {
        match key {
            SshKeySort::Name => cmp_ignore_case(&a.name, &b.name),
            // Reversed so the most recent use comes first; never-used keys stay last
            SshKeySort::LastUsed => match (a.last_used.is_empty(), b.last_used.is_empty()) {
                (false, false) => cmp_instants(&b.last_used, &a.last_used),
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (true, true) => Ordering::Equal,
            },
            SshKeySort::CreatedDate => cmp_instants(&a.created_date, &b.created_date),
        }
    }
}
