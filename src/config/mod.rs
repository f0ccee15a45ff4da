//! The `config` module loads the relay's settings.
//!
//! Sources, lowest precedence first: built-in defaults, the optional file
//! `config/default.toml`, `CHATRELAY_*` environment variables (nested keys
//! separated by `__`, e.g. `CHATRELAY_SERVER__PORT`), and the bare `PORT`
//! variable.

mod settings;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{LogSettings, RelaySettings, ServerSettings, Settings, StorageSettings};

pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("CHATRELAY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;
    let mut settings = Settings::merge(partial);

    if let Ok(port) = std::env::var("PORT") {
        if !port.is_empty() {
            settings.server.port = port
                .parse()
                .map_err(|e| ConfigError::Message(format!("invalid PORT '{port}': {e}")))?;
        }
    }

    Ok(settings)
}

#[cfg(test)]
mod tests;
