use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AssetRecord, DatasetKind};
use crate::utils::{cmp_ignore_case, cmp_instants};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Info, Severity::Warning, Severity::Critical];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "Info"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Critical => write!(f, "Critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditSort {
    Newest,
    Oldest,
    User,
}

impl fmt::Display for AuditSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditSort::Newest => write!(f, "Newest"),
            AuditSort::Oldest => write!(f, "Oldest"),
            AuditSort::User => write!(f, "User"),
        }
    }
}

/// A single audit event.
///
/// `metadata` is whatever structured value the producer attached. It is kept
/// verbatim through the cache and the pipeline and only interpreted when a
/// row is expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub metadata: Value,
}

impl AuditLogEntry {
    /// Flatten the metadata blob into `key: value` lines for display.
    pub fn metadata_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        flatten_value(&self.metadata, "", &mut lines);
        lines
    }
}

fn flatten_value(value: &Value, prefix: &str, out: &mut Vec<String>) {
    match value {
        Value::Null => {
            if !prefix.is_empty() {
                out.push(format!("{}: null", prefix));
            }
        }
        Value::Object(map) => {
            for (key, inner) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_value(inner, &path, out);
            }
        }
        Value::Array(items) => {
            for (i, inner) in items.iter().enumerate() {
                flatten_value(inner, &format!("{}[{}]", prefix, i), out);
            }
        }
        Value::String(s) => out.push(format!("{}: {}", prefix, s)),
        other => out.push(format!("{}: {}", prefix, other)),
    }
}

impl AssetRecord for AuditLogEntry {
    type Category = Severity;
    type SortKey = AuditSort;

    const KIND: DatasetKind = DatasetKind::AuditLogs;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> Severity {
        self.severity
    }

    fn categories() -> &'static [Severity] {
        &Severity::ALL
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.user.as_str(), self.action.as_str(), self.resource.as_str()]
    }

    fn sort_keys() -> &'static [AuditSort] {
        &[AuditSort::Newest, AuditSort::Oldest, AuditSort::User]
    }

    fn default_sort() -> AuditSort {
        AuditSort::Newest
    }

    fn compare(a: &Self, b: &Self, key: AuditSort) -> Ordering {
        match key {
            AuditSort::Newest => cmp_instants(&b.timestamp, &a.timestamp),
            AuditSort::Oldest => cmp_instants(&a.timestamp, &b.timestamp),
            AuditSort::User => cmp_ignore_case(&a.user, &b.user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_preserved_verbatim() {
        let raw = json!({
            "id": "a1",
            "timestamp": "2024-05-01T10:00:00Z",
            "metadata": {"ip": "10.0.0.1", "tags": ["x", 2], "nested": {"ok": true}}
        });
        let entry: AuditLogEntry = serde_json::from_value(raw.clone()).unwrap();
        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["metadata"], raw["metadata"]);
    }

    #[test]
    fn test_metadata_lines() {
        let entry = AuditLogEntry {
            id: "a1".to_string(),
            timestamp: String::new(),
            user: String::new(),
            action: String::new(),
            resource: String::new(),
            severity: Severity::Info,
            details: String::new(),
            metadata: json!({"ip": "10.0.0.1", "tags": ["x", 2], "nested": {"ok": true}}),
        };
        let lines = entry.metadata_lines();
        assert!(lines.contains(&"ip: 10.0.0.1".to_string()));
        assert!(lines.contains(&"tags[0]: x".to_string()));
        assert!(lines.contains(&"tags[1]: 2".to_string()));
        assert!(lines.contains(&"nested.ok: true".to_string()));
    }

    #[test]
    fn test_missing_metadata_is_null() {
        let entry: AuditLogEntry = serde_json::from_str(r#"{"id":"a2"}"#).unwrap();
        assert!(entry.metadata.is_null());
        assert!(entry.metadata_lines().is_empty());
    }
}
