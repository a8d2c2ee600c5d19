/// Image proxy used for all post images
pub const IMAGE_PROXY_URL: &str = "https://images.weserv.nl/";

/// Build the proxied URL for an image.
/// Any query string is dropped from the original before it is encoded.
pub fn proxy_image_url(original: &str) -> String {
    let base = original.split('?').next().unwrap_or(original);
    format!(
        "{}?url={}&default=placeholder",
        IMAGE_PROXY_URL,
        urlencoding::encode(base)
    )
}

/// Case-insensitive substring check.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Compact count for profile stats: 999, 1.2K, 3.4M
pub fn format_count(n: u64) -> String {
    match n {
        0..=999 => n.to_string(),
        1_000..=999_999 => format!("{:.1}K", n as f64 / 1_000.0),
        _ => format!("{:.1}M", n as f64 / 1_000_000.0),
    }
}
