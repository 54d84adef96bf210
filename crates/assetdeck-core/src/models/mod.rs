//! Data models for identity-security assets.
//!
//! This module contains the record types shown by the dashboard:
//!
//! - `Certificate`: TLS certificates and the servers they are deployed on
//! - `SshKey`: SSH keys with owner and usage information
//! - `CodeSigningKey`: signing keys with trust and protection levels
//! - `AuditLogEntry`: audit events carrying an opaque metadata blob
//!
//! Every record type implements [`AssetRecord`], which is what the list
//! pipeline and the cache are generic over.

pub mod audit;
pub mod certificate;
pub mod code_signing;
pub mod ssh_key;

use std::cmp::Ordering;
use std::fmt;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

pub use audit::{AuditLogEntry, AuditSort, Severity};
pub use certificate::{Certificate, CertificateSort, CertificateStatus};
pub use code_signing::{CodeSigningKey, CodeSigningSort, CodeSigningStatus, Protection, TrustLevel};
pub use ssh_key::{KeyType, SshKey, SshKeySort, SshKeyStatus};

use crate::pipeline::WindowPolicy;

/// Quiet period before a debounced search term takes effect.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// The four dataset classes, each with its own fixture, cache key and
/// pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Certificates,
    SshKeys,
    CodeSigningKeys,
    AuditLogs,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Certificates,
        DatasetKind::SshKeys,
        DatasetKind::CodeSigningKeys,
        DatasetKind::AuditLogs,
    ];

    /// Logical cache key for this dataset.
    pub fn cache_name(&self) -> &'static str {
        match self {
            DatasetKind::Certificates => "certificates",
            DatasetKind::SshKeys => "sshKeys",
            DatasetKind::CodeSigningKeys => "codeSigningKeys",
            DatasetKind::AuditLogs => "auditLogs",
        }
    }

    /// Display title for this dataset.
    pub fn title(&self) -> &'static str {
        match self {
            DatasetKind::Certificates => "Certificates",
            DatasetKind::SshKeys => "SSH Keys",
            DatasetKind::CodeSigningKeys => "Code Signing",
            DatasetKind::AuditLogs => "Audit Logs",
        }
    }

    /// How the filtered list is windowed for display.
    pub fn window_policy(&self) -> WindowPolicy {
        match self {
            DatasetKind::Certificates => WindowPolicy::Paged,
            DatasetKind::AuditLogs => WindowPolicy::Reveal,
            DatasetKind::SshKeys | DatasetKind::CodeSigningKeys => WindowPolicy::Unbounded,
        }
    }

    /// Only the audit log view debounces its search term.
    pub fn search_debounce(&self) -> Option<Duration> {
        match self {
            DatasetKind::AuditLogs => Some(SEARCH_DEBOUNCE),
            _ => None,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cache_name())
    }
}

/// A record that can flow through the cache and the list pipeline.
pub trait AssetRecord:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Enumerated field the categorical filter selects on.
    type Category: Copy + Eq + Ord + fmt::Debug + fmt::Display + 'static;

    /// Sort modes available for this record type.
    type SortKey: Copy + Eq + fmt::Debug + fmt::Display + 'static;

    /// Dataset class this record belongs to.
    const KIND: DatasetKind;

    /// Identifier, unique within the dataset.
    fn id(&self) -> &str;

    fn category(&self) -> Self::Category;

    /// Every category value, in display order.
    fn categories() -> &'static [Self::Category];

    /// Text fields the free-text search matches against.
    fn search_fields(&self) -> Vec<&str>;

    /// Every sort mode, in the order the view cycles through them.
    fn sort_keys() -> &'static [Self::SortKey];

    fn default_sort() -> Self::SortKey;

    fn compare(a: &Self, b: &Self, key: Self::SortKey) -> Ordering;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_names() {
        let names: Vec<&str> = DatasetKind::ALL.iter().map(|k| k.cache_name()).collect();
        assert_eq!(names, vec!["certificates", "sshKeys", "codeSigningKeys", "auditLogs"]);
    }

    #[test]
    fn test_window_policies() {
        assert_eq!(DatasetKind::Certificates.window_policy(), WindowPolicy::Paged);
        assert_eq!(DatasetKind::AuditLogs.window_policy(), WindowPolicy::Reveal);
        assert_eq!(DatasetKind::SshKeys.window_policy(), WindowPolicy::Unbounded);
    }

    #[test]
    fn test_only_audit_logs_debounce() {
        assert!(DatasetKind::AuditLogs.search_debounce().is_some());
        assert!(DatasetKind::Certificates.search_debounce().is_none());
        assert!(DatasetKind::SshKeys.search_debounce().is_none());
        assert!(DatasetKind::CodeSigningKeys.search_debounce().is_none());
    }
}
