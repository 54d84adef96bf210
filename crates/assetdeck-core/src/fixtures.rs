//! Bundled datasets.
//!
//! The dashboard has no backend; these JSON collections are the canonical
//! data every load resolves to.

use crate::error::SourceError;
use crate::models::{AssetRecord, DatasetKind};

const CERTIFICATES: &str = include_str!("../fixtures/certificates.json");
const SSH_KEYS: &str = include_str!("../fixtures/ssh_keys.json");
const CODE_SIGNING_KEYS: &str = include_str!("../fixtures/code_signing_keys.json");
const AUDIT_LOGS: &str = include_str!("../fixtures/audit_logs.json");

/// Raw JSON for a dataset class.
pub fn raw(kind: DatasetKind) -> &'static str {
    match kind {
        DatasetKind::Certificates => CERTIFICATES,
        DatasetKind::SshKeys => SSH_KEYS,
        DatasetKind::CodeSigningKeys => CODE_SIGNING_KEYS,
        DatasetKind::AuditLogs => AUDIT_LOGS,
    }
}

/// Parse the bundled dataset for `T`.
pub fn load<T: AssetRecord>() -> Result<Vec<T>, SourceError> {
    serde_json::from_str(raw(T::KIND)).map_err(|source| SourceError::Malformed {
        kind: T::KIND,
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::models::{AuditLogEntry, Certificate, CodeSigningKey, SshKey};

    fn assert_unique_ids<T: AssetRecord>(records: &[T]) {
        let ids: HashSet<&str> = records.iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), records.len(), "duplicate id in {}", T::KIND);
    }

    #[test]
    fn test_all_fixtures_parse_with_unique_ids() {
        let certs = load::<Certificate>().unwrap();
        let keys = load::<SshKey>().unwrap();
        let signing = load::<CodeSigningKey>().unwrap();
        let logs = load::<AuditLogEntry>().unwrap();

        assert!(certs.len() > 10, "certificates should span more than one page");
        assert!(logs.len() > 20, "audit logs should need several reveals");
        assert!(!keys.is_empty());
        assert!(!signing.is_empty());

        assert_unique_ids(&certs);
        assert_unique_ids(&keys);
        assert_unique_ids(&signing);
        assert_unique_ids(&logs);
    }

    #[test]
    fn test_fixture_dates_parse() {
        use crate::utils::parse_instant;

        for cert in load::<Certificate>().unwrap() {
            assert!(parse_instant(&cert.expiry_date).is_some(), "{}", cert.id);
        }
        for entry in load::<AuditLogEntry>().unwrap() {
            assert!(parse_instant(&entry.timestamp).is_some(), "{}", entry.id);
        }
    }
}
