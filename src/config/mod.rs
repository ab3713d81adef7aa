mod settings;

use std::path::Path;

use config::{Config, ConfigError, Environment, File};

pub use settings::{
    ConnectionSettings, LoggingSettings, PartialSettings, ProducerSettings, SessionSettings,
    Settings,
};

#[cfg(test)]
mod tests;

/// Prefix of environment variables, e.g. `MINIJMS__CONNECTION__URL`.
pub const ENV_PREFIX: &str = "MINIJMS";

/// Loads the configuration from `config/default` and environment variables
/// Returns a `Settings` struct with defaults for everything neither source sets
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from("config/default")
}

/// Loads the configuration from the given file (extension optional, the file may be
/// missing) and the environment, then merges it over the defaults
/// A `.env` file in the working directory is read first when present
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();

    let path = path.as_ref().to_string_lossy().into_owned();
    let builder = Config::builder()
        .add_source(File::with_name(&path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(Settings::default().merge(partial))
}
