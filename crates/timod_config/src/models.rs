// --- File: crates/timod_config/src/models.rs ---

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODULE_NAME: &str = "firebase";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_FCM_BASE_URL: &str = "https://fcm.googleapis.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// --- Module process settings ---
// Credentials are not part of these; the host sends them in the
// configuration package.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ModuleSettings {
    /// Name the host registered the module under, used in log lines.
    #[serde(default = "default_name")]
    pub name: String,
    /// Default tracing level for the module crates (`RUST_LOG` still applies).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Root of the FCM HTTP v1 API.
    #[serde(default = "default_fcm_base_url")]
    pub fcm_base_url: String,
    /// Timeout for every call to the messaging provider.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for ModuleSettings {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            fcm_base_url: default_fcm_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_name() -> String {
    DEFAULT_MODULE_NAME.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_fcm_base_url() -> String {
    DEFAULT_FCM_BASE_URL.to_string()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}
