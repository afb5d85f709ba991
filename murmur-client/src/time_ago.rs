use crate::api::Time;

/// Coarse relative timestamp for comment headers, falling back to an
/// absolute date after a week
pub fn time_ago(t: &Time, now: Time) -> String {
    let diff = now.signed_duration_since(*t);
    let minutes = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} minutes ago")
    } else if hours < 24 {
        format!("{hours} hours ago")
    } else if days < 7 {
        format!("{days} days ago")
    } else {
        t.format("%Y-%m-%d").to_string()
    }
}
