//! Notification text for alerts.

/// Append the dashboard link, if any.
pub(crate) fn with_link(mut text: String, dashboard_url: &str) -> String {
    if !dashboard_url.is_empty() {
        text.push_str("\n\n👉 ");
        text.push_str(dashboard_url);
    }
    text
}

/// Text of a silence alert.
pub fn silence_message(label: &str, hours: &str, dashboard_url: &str) -> String {
    with_link(
        format!(
            "🚨 Blog monitor alert!\n\n{label} has not posted for {hours} hours.\nPlease check."
        ),
        dashboard_url,
    )
}

/// Text of a goal alert.
pub fn goal_message(label: &str, count: u32, dashboard_url: &str) -> String {
    with_link(
        format!(
            "🚨 Blog monitor alert!\n\n{label} published {count} posts today.\nPlease check the publishing program."
        ),
        dashboard_url,
    )
}

/// Hours shown in a silence alert: whole hours, or "?" when unknown.
pub fn format_hours(hours: Option<f64>) -> String {
    match hours {
        Some(h) => format!("{}", h.floor() as i64),
        None => "?".to_string(),
    }
}
