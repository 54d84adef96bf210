use crate::models::AssetRecord;

/// Next sort key in the record type's cycle order, wrapping at the end.
pub fn cycle<T: AssetRecord>(current: T::SortKey) -> T::SortKey {
    let keys = T::sort_keys();
    keys.iter()
        .position(|k| *k == current)
        .and_then(|i| keys.get((i + 1) % keys.len()))
        .copied()
        .unwrap_or_else(T::default_sort)
}

/// Stable sort of record indices by `key`. Ties keep their incoming order.
pub fn sort_indices<T: AssetRecord>(records: &[T], indices: &mut [usize], key: T::SortKey) {
    indices.sort_by(|&a, &b| T::compare(&records[a], &records[b], key));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuditLogEntry, AuditSort, CodeSigningKey, CodeSigningSort, SshKey, SshKeySort};
    use serde_json::json;

    fn keys(values: serde_json::Value) -> Vec<SshKey> {
        serde_json::from_value(values).unwrap()
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(cycle::<SshKey>(SshKeySort::Name), SshKeySort::LastUsed);
        assert_eq!(cycle::<SshKey>(SshKeySort::LastUsed), SshKeySort::CreatedDate);
        assert_eq!(cycle::<SshKey>(SshKeySort::CreatedDate), SshKeySort::Name);
        assert_eq!(cycle::<AuditLogEntry>(AuditSort::User), AuditSort::Newest);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let records = keys(json!([
            {"id": "k1", "name": "deploy"},
            {"id": "k2", "name": "backup"},
            {"id": "k3", "name": "Deploy"},
            {"id": "k4", "name": "backup"},
        ]));
        let mut idx: Vec<usize> = (0..records.len()).collect();
        sort_indices(&records, &mut idx, SshKeySort::Name);
        let ids: Vec<&str> = idx.iter().map(|&i| records[i].id.as_str()).collect();
        assert_eq!(ids, vec!["k2", "k4", "k1", "k3"]);
    }

    #[test]
    fn test_last_used_most_recent_first() {
        let records = keys(json!([
            {"id": "old", "lastUsed": "2024-01-01T00:00:00Z"},
            {"id": "never", "lastUsed": ""},
            {"id": "new", "lastUsed": "2024-06-01T00:00:00Z"},
        ]));
        let mut idx: Vec<usize> = (0..records.len()).collect();
        sort_indices(&records, &mut idx, SshKeySort::LastUsed);
        let ids: Vec<&str> = idx.iter().map(|&i| records[i].id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "never"]);
    }

    #[test]
    fn test_trust_level_high_first() {
        let records: Vec<CodeSigningKey> = serde_json::from_value(json!([
            {"id": "a", "trustLevel": "low"},
            {"id": "b", "trustLevel": "high"},
            {"id": "c", "trustLevel": "medium"},
        ]))
        .unwrap();
        let mut idx: Vec<usize> = (0..records.len()).collect();
        sort_indices(&records, &mut idx, CodeSigningSort::TrustLevel);
        let ids: Vec<&str> = idx.iter().map(|&i| records[i].id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }
}
