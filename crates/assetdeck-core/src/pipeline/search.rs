use std::time::{Duration, Instant};

use crate::models::AssetRecord;
use crate::utils::contains_ignore_case;

/// Check if a record matches the search query.
/// Query should already be lowercased; an empty query matches everything.
pub fn matches<T: AssetRecord>(record: &T, query: &str) -> bool {
    query.is_empty()
        || record
            .search_fields()
            .into_iter()
            .any(|field| contains_ignore_case(field, query))
}

/// Two-stage search term.
///
/// `raw` follows every keystroke. `effective` is what the pipeline filters
/// on: it follows `raw` immediately, or, when a debounce delay is set, only
/// once `raw` has been quiet for that long. Each keystroke restarts the wait.
#[derive(Debug, Clone)]
pub struct SearchTerm {
    raw: String,
    effective: String,
    debounce: Option<Duration>,
    last_input: Option<Instant>,
}

impl SearchTerm {
    pub fn new(debounce: Option<Duration>) -> Self {
        Self {
            raw: String::new(),
            effective: String::new(),
            debounce,
            last_input: None,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn effective(&self) -> &str {
        &self.effective
    }

    /// Whether a debounced value is still waiting to be applied.
    pub fn is_pending(&self) -> bool {
        self.last_input.is_some()
    }

    /// Record new input. Returns true if the effective term changed.
    pub fn input(&mut self, raw: &str, now: Instant) -> bool {
        self.raw = raw.to_string();
        match self.debounce {
            Some(_) => {
                self.last_input = Some(now);
                false
            }
            None => self.apply(),
        }
    }

    /// Apply a pending value once the quiet period has elapsed.
    /// Returns true if the effective term changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match (self.debounce, self.last_input) {
            (Some(delay), Some(at)) if now.saturating_duration_since(at) >= delay => {
                self.last_input = None;
                self.apply()
            }
            _ => false,
        }
    }

    fn apply(&mut self) -> bool {
        if self.effective == self.raw {
            return false;
        }
        self.effective = self.raw.clone();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Certificate;

    const DELAY: Duration = Duration::from_millis(300);

    fn cert(name: &str, domain: &str, issuer: &str) -> Certificate {
        serde_json::from_value(serde_json::json!({
            "id": "c", "name": name, "domain": domain, "issuer": issuer
        }))
        .unwrap()
    }

    #[test]
    fn test_matches_any_field_case_insensitive() {
        let c = cert("Primary Web", "www.example.com", "DigiCert");
        assert!(matches(&c, "primary"));
        assert!(matches(&c, "example.com"));
        assert!(matches(&c, "digi"));
        assert!(matches(&c, ""));
        assert!(!matches(&c, "sectigo"));
    }

    #[test]
    fn test_immediate_without_debounce() {
        let mut term = SearchTerm::new(None);
        assert!(term.input("abc", Instant::now()));
        assert_eq!(term.effective(), "abc");
        assert!(!term.is_pending());
    }

    #[test]
    fn test_debounce_applies_after_quiet_period() {
        let start = Instant::now();
        let mut term = SearchTerm::new(Some(DELAY));
        assert!(!term.input("a", start));
        assert_eq!(term.raw(), "a");
        assert_eq!(term.effective(), "");

        assert!(!term.tick(start + Duration::from_millis(299)));
        assert_eq!(term.effective(), "");

        assert!(term.tick(start + DELAY));
        assert_eq!(term.effective(), "a");
        assert!(!term.is_pending());
    }

    #[test]
    fn test_debounce_restarts_on_each_keystroke() {
        let start = Instant::now();
        let mut term = SearchTerm::new(Some(DELAY));
        term.input("a", start);
        term.input("ad", start + Duration::from_millis(200));
        term.input("adm", start + Duration::from_millis(400));

        // 300ms after the first keystroke, but only 100ms after the last
        assert!(!term.tick(start + Duration::from_millis(500)));
        assert_eq!(term.effective(), "");

        assert!(term.tick(start + Duration::from_millis(700)));
        assert_eq!(term.effective(), "adm");
    }

    #[test]
    fn test_debounce_no_change_when_value_returns() {
        let start = Instant::now();
        let mut term = SearchTerm::new(Some(DELAY));
        term.input("x", start);
        term.input("", start + Duration::from_millis(10));
        assert!(!term.tick(start + Duration::from_secs(1)));
        assert_eq!(term.effective(), "");
    }
}
