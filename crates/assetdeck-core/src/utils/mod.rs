//! Utility functions for string and date handling.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{cmp_ignore_case, cmp_instants, contains_ignore_case, format_date, parse_instant, truncate};
