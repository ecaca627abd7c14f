//! Configuration file loading tests.

use std::io::Write;

use blogmon::config::{Config, StoreBackend};
use blogmon::BlogmonError;

const SAMPLE: &str = r#"
[server]
port = 8080

[monitor]
warn_hours = 8
daily_goal = 12
dashboard_url = "https://dash.example.com"

[[feeds]]
id = "alpha"
label = "Alpha"

[[feeds]]
id = "beta"

[store]
backend = "disabled"

[scheduler]
enabled = true
report_hour = 9
"#;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_sample_file() {
    let file = write_config(SAMPLE);
    let config = Config::load(file.path()).unwrap();
    config.validate().unwrap();

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.monitor.warn_hours, 8.0);
    assert_eq!(config.monitor.alert_interval_hours, 3.0);
    assert_eq!(config.monitor.daily_goal, 12);
    assert_eq!(config.feeds.len(), 2);
    assert_eq!(config.feeds[1].display_label(), "beta");
    assert_eq!(config.store.backend, StoreBackend::Disabled);
    assert_eq!(config.scheduler.report_hour, Some(9));
}

#[test]
fn test_env_overrides_on_loaded_file() {
    let file = write_config(SAMPLE);
    let mut config = Config::load(file.path()).unwrap();
    config
        .apply_overrides_from(|key| match key {
            "BLOG1" => Some("gamma".to_string()),
            "LABEL1" => Some("Gamma".to_string()),
            "DAILY_GOAL" => Some("5".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.feeds.len(), 1);
    assert_eq!(config.feeds[0].id, "gamma");
    assert_eq!(config.monitor.daily_goal, 5);
    assert_eq!(config.monitor.warn_hours, 8.0);
}

#[test]
fn test_missing_file() {
    let result = Config::load("/nonexistent/blogmon.toml");
    assert!(matches!(result, Err(BlogmonError::Io(_))));
}

#[test]
fn test_invalid_file_rejected_by_validate() {
    let file = write_config(
        r#"
[[feeds]]
id = "alpha"

[[feeds]]
id = "alpha"
"#,
    );
    let config = Config::load(file.path()).unwrap();
    assert!(matches!(config.validate(), Err(BlogmonError::Validation(_))));
}
