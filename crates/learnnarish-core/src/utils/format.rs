use chrono::{DateTime, Utc};

/// Human age of a timestamp relative to `now`: "just now", "5m ago",
/// "2h ago", "3d ago". Hours and days round to the nearest unit.
pub fn format_age(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - at).num_minutes();
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = (minutes + 30) / 60;
        if hours >= 24 {
            "1d ago".to_string()
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = (minutes + 720) / 1440;
        format!("{}d ago", days)
    }
}

/// Truncate to at most `max_len` characters, adding an ellipsis if needed.
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

/// Format an RFC 3339 timestamp as "Jan 02, 2024"; anything else keeps its
/// first ten characters.
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else {
        date.chars().take(10).collect()
    }
}
