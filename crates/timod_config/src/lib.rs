use config::{Config, ConfigError, Environment};
use once_cell::sync::OnceCell;
use std::env;
use tracing::debug;

pub mod models;
pub use models::*;

/// The default prefix for settings environment variables
pub const DEFAULT_PREFIX: &str = "TIMOD_FIREBASE";

/// The separator for settings environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Get the prefix for settings environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Loads the module settings.
///
/// Sources, lowest priority first: built-in defaults, then environment
/// variables such as `TIMOD_FIREBASE__LOG_LEVEL`. A dotenv file is loaded
/// into the environment beforehand when present.
pub fn load_settings() -> Result<ModuleSettings, ConfigError> {
    ensure_dotenv_loaded();
    load_settings_with_prefix(&get_config_prefix())
}

/// Loads the module settings from defaults and variables named `{prefix}__{KEY}`.
pub fn load_settings_with_prefix(prefix: &str) -> Result<ModuleSettings, ConfigError> {
    let builder = Config::builder()
        .set_default("name", DEFAULT_MODULE_NAME)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("fcm_base_url", DEFAULT_FCM_BASE_URL)?
        .set_default("http_timeout_secs", DEFAULT_HTTP_TIMEOUT_SECS)?
        .add_source(
            Environment::with_prefix(prefix)
                .prefix_separator(CONFIG_SEPARATOR)
                .separator(CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let settings: ModuleSettings = builder.build()?.try_deserialize()?;
    debug!("Loaded module settings: {:?}", settings);
    Ok(settings)
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The path defaults to `.env` and can be overridden with `DOTENV_OVERRIDE`.
/// A missing file is not an error. Returns the path that was tried.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = std::env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment() {
        let settings = load_settings_with_prefix("TIMOD_TEST_DEFAULTS").unwrap();
        assert_eq!(settings, ModuleSettings::default());
        assert_eq!(settings.name, "firebase");
        assert_eq!(settings.fcm_base_url, "https://fcm.googleapis.com");
    }

    #[test]
    fn environment_overrides_defaults() {
        std::env::set_var("TIMOD_TEST_OVERRIDE__LOG_LEVEL", "debug");
        std::env::set_var("TIMOD_TEST_OVERRIDE__HTTP_TIMEOUT_SECS", "5");
        std::env::set_var("TIMOD_TEST_OVERRIDE__FCM_BASE_URL", "http://127.0.0.1:9000");

        let settings = load_settings_with_prefix("TIMOD_TEST_OVERRIDE").unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.http_timeout_secs, 5);
        assert_eq!(settings.fcm_base_url, "http://127.0.0.1:9000");
        assert_eq!(settings.name, DEFAULT_MODULE_NAME);
    }
}
