//! Small formatting helpers for the activity list.

use chrono::{DateTime, Utc};

/// "Just now", "5m ago", "3h ago", otherwise "Jan 5, 3:07 PM".
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_milliseconds();

    if diff < 60_000 {
        return "Just now".to_string();
    }
    if diff < 3_600_000 {
        return format!("{}m ago", diff / 60_000);
    }
    if diff < 86_400_000 {
        return format!("{}h ago", diff / 3_600_000);
    }

    timestamp.format("%b %-d, %-I:%M %p").to_string()
}

/// "0 events", "1 event", "12 events".
pub fn event_count_label(count: usize) -> String {
    if count == 1 {
        "1 event".to_string()
    } else {
        format!("{count} events")
    }
}
