//! Utility functions for string formatting and URL building.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{contains_ignore_case, format_count, proxy_image_url, truncate};
