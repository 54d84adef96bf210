use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AssetRecord, DatasetKind};
use crate::utils::{cmp_ignore_case, cmp_instants, parse_instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub enum CertificateStatus {
    #[default]
    Active,
    Expiring,
    Expired,
    Revoked,
}

impl CertificateStatus {
    pub const ALL: [CertificateStatus; 4] = [
        CertificateStatus::Active,
        CertificateStatus::Expiring,
        CertificateStatus::Expired,
        CertificateStatus::Revoked,
    ];
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificateStatus::Active => write!(f, "Active"),
            CertificateStatus::Expiring => write!(f, "Expiring"),
            CertificateStatus::Expired => write!(f, "Expired"),
            CertificateStatus::Revoked => write!(f, "Revoked"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateSort {
    /// Soonest (or most past) expiry first
    ExpiryDate,
    Name,
    Domain,
}

impl fmt::Display for CertificateSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificateSort::ExpiryDate => write!(f, "Expiry"),
            CertificateSort::Name => write!(f, "Name"),
            CertificateSort::Domain => write!(f, "Domain"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub issued_date: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub status: CertificateStatus,
    #[serde(default)]
    pub key_algorithm: String,
    #[serde(default)]
    pub serial_number: String,
    /// Servers this certificate is deployed on
    #[serde(default)]
    pub servers: Vec<String>,
}

impl Certificate {
    /// Whole days until expiry, negative once expired.
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        parse_instant(&self.expiry_date).map(|expiry| (expiry - now).num_days())
    }

    /// Short expiry description for list rows: "in 12d", "3d ago", "today"
    pub fn expiry_display(&self, now: DateTime<Utc>) -> String {
        match self.days_until_expiry(now) {
            Some(0) => "today".to_string(),
            Some(days) if days > 0 => format!("in {}d", days),
            Some(days) => format!("{}d ago", -days),
            None => "unknown".to_string(),
        }
    }
}

impl AssetRecord for Certificate {
    type Category = CertificateStatus;
    type SortKey = CertificateSort;

    const KIND: DatasetKind = DatasetKind::Certificates;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> CertificateStatus {
        self.status
    }

    fn categories() -> &'static [CertificateStatus] {
        &CertificateStatus::ALL
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.domain.as_str(), self.issuer.as_str()]
    }

    fn sort_keys() -> &'static [CertificateSort] {
        &[CertificateSort::ExpiryDate, CertificateSort::Name, CertificateSort::Domain]
    }

    fn default_sort() -> CertificateSort {
        CertificateSort::ExpiryDate
    }

    fn compare(a: &Self, b: &Self, key: CertificateSort) -> Ordering {
        match key {
            CertificateSort::ExpiryDate => cmp_instants(&a.expiry_date, &b.expiry_date),
            CertificateSort::Name => cmp_ignore_case(&a.name, &b.name),
            CertificateSort::Domain => cmp_ignore_case(&a.domain, &b.domain),
        }
    }
}
