//! Utility functions for date and string formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_date, short_time, strip_html, today, truncate_string};
