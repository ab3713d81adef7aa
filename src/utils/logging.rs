use tracing::Level;

use crate::config::LoggingSettings;

/// Installs the global fmt subscriber at `level` (see [`parse_level`]).
/// Later calls leave the first subscriber in place.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .try_init();
}

/// Same as [`init`], reading the level from the `logging` settings section.
pub fn init_from(settings: &LoggingSettings) {
    init(&settings.level);
}

/// Level for a configured name; unknown names mean `INFO`.
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_lowercase().as_str() {
        "error" => Level::ERROR,
        "warn" | "warning" => Level::WARN,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    }
}
