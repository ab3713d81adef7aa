use std::io::Write;

use serial_test::serial;

use super::*;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.connection.url, "vm://default");
    assert_eq!(settings.connection.client_id, None);
    assert!(!settings.session.transacted);
    assert_eq!(settings.session.acknowledge_mode, "auto_acknowledge");
    assert_eq!(settings.producer.delivery_mode, "persistent");
    assert_eq!(settings.producer.priority, 4);
    assert_eq!(settings.producer.time_to_live_ms, 0);
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = load_config_from(dir.path().join("absent")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
#[serial]
fn test_file_values_merge_over_defaults() {
    let file = write_config(
        r#"
[connection]
url = "vm://orders"
client_id = "billing"

[producer]
priority = 7
"#,
    );
    let settings = load_config_from(file.path()).unwrap();
    assert_eq!(settings.connection.url, "vm://orders");
    assert_eq!(settings.connection.client_id.as_deref(), Some("billing"));
    assert_eq!(settings.producer.priority, 7);
    assert_eq!(settings.producer.delivery_mode, "persistent");
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let file = write_config("[session]\nacknowledge_mode = \"client\"\n");
    temp_env::with_vars(
        [
            ("MINIJMS__SESSION__TRANSACTED", Some("true")),
            ("MINIJMS__LOGGING__LEVEL", Some("debug")),
            ("MINIJMS__PRODUCER__TIME_TO_LIVE_MS", Some("5000")),
        ],
        || {
            let settings = load_config_from(file.path()).unwrap();
            assert!(settings.session.transacted);
            assert_eq!(settings.session.acknowledge_mode, "client");
            assert_eq!(settings.logging.level, "debug");
            assert_eq!(settings.producer.time_to_live_ms, 5000);
        },
    );
}

#[test]
#[serial]
fn test_malformed_value_is_a_config_error() {
    let file = write_config("[producer]\npriority = \"high\"\n");
    assert!(load_config_from(file.path()).is_err());
}
