use std::fmt;

use crate::models::AssetRecord;

/// Categorical filter: everything, or records whose category equals one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter<C> {
    #[default]
    All,
    Only(C),
}

impl<C: Copy + Eq + fmt::Display> CategoryFilter<C> {
    pub fn matches<T: AssetRecord<Category = C>>(&self, record: &T) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(value) => record.category() == *value,
        }
    }

    /// Next selection in `All -> first -> ... -> last -> All` order.
    pub fn cycle(self, categories: &[C]) -> Self {
        match self {
            CategoryFilter::All => categories
                .first()
                .map(|c| CategoryFilter::Only(*c))
                .unwrap_or(CategoryFilter::All),
            CategoryFilter::Only(current) => {
                let pos = categories.iter().position(|c| *c == current);
                match pos.and_then(|i| categories.get(i + 1)) {
                    Some(next) => CategoryFilter::Only(*next),
                    None => CategoryFilter::All,
                }
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            CategoryFilter::All => "All".to_string(),
            CategoryFilter::Only(value) => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Severity, SshKey};

    #[test]
    fn test_cycle_wraps_through_all() {
        let cats = Severity::ALL;
        let mut f = CategoryFilter::All;
        f = f.cycle(&cats);
        assert_eq!(f, CategoryFilter::Only(Severity::Info));
        f = f.cycle(&cats);
        assert_eq!(f, CategoryFilter::Only(Severity::Warning));
        f = f.cycle(&cats);
        assert_eq!(f, CategoryFilter::Only(Severity::Critical));
        f = f.cycle(&cats);
        assert_eq!(f, CategoryFilter::All);
    }

    #[test]
    fn test_cycle_with_no_categories_stays_all() {
        let f: CategoryFilter<Severity> = CategoryFilter::All;
        assert_eq!(f.cycle(&[]), CategoryFilter::All);
    }

    #[test]
    fn test_matches_on_category() {
        let key: SshKey = serde_json::from_str(r#"{"id":"k1","status":"revoked"}"#).unwrap();
        assert!(CategoryFilter::All.matches(&key));
        assert!(CategoryFilter::Only(crate::models::SshKeyStatus::Revoked).matches(&key));
        assert!(!CategoryFilter::Only(crate::models::SshKeyStatus::Active).matches(&key));
    }

    #[test]
    fn test_label() {
        assert_eq!(CategoryFilter::<Severity>::All.label(), "All");
        assert_eq!(CategoryFilter::Only(Severity::Critical).label(), "Critical");
    }
}
