use super::error::JmsError;
use super::logging;
use crate::config::LoggingSettings;

#[test]
fn test_logging_init_can_repeat() {
    logging::init("info");
    logging::init("debug");
    logging::init_from(&LoggingSettings {
        level: "warn".into(),
    });
}

#[test]
fn test_parse_level_falls_back_to_info() {
    assert_eq!(logging::parse_level("WARNING"), tracing::Level::WARN);
    assert_eq!(logging::parse_level(" trace "), tracing::Level::TRACE);
    assert_eq!(logging::parse_level("chatty"), tracing::Level::INFO);
}

#[test]
fn test_eof_is_distinguished_from_format() {
    assert!(JmsError::Eof("short read".into()).is_eof());
    assert!(!JmsError::Format("bad tag".into()).is_eof());
}

#[test]
fn test_serde_errors_become_format_errors() {
    let err = serde_json::from_str::<u32>("not json").unwrap_err();
    assert!(matches!(JmsError::from(err), JmsError::Format(_)));
}
