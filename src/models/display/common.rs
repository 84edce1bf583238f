//! Common display utilities and helpers

use chrono::{DateTime, Utc};

/// Placeholder for missing values in tables
pub const NONE: &str = "--";

/// Truncate string to max characters with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Normalize an API timestamp (RFC 3339, often with nanoseconds) to
/// `YYYY-MM-DDTHH:MM:SSZ`. Unparseable values are returned as-is.
pub fn format_timestamp(timestamp: &str) -> String {
    match timestamp.parse::<DateTime<Utc>>() {
        Ok(dt) => dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

pub fn format_optional_timestamp(timestamp: Option<&str>) -> String {
    timestamp
        .filter(|t| !t.is_empty())
        .map(format_timestamp)
        .unwrap_or_else(|| NONE.to_string())
}

/// Human-friendly byte count (`512 B`, `1.5 KB`, `3.2 MB`).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}
