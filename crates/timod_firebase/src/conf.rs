//! Configuration handling: validates the host's credentials and installs
//! the messaging client.

use std::sync::Arc;
use thiserror::Error;
use timod_common::ModuleError;
use timod_proto::unpack;
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::FirebaseConf;
use crate::service::{Messenger, MessengerBuilder};

/// Reasons a configuration package is rejected.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing or invalid Firebase configuration ({0})")]
    Decode(String),

    #[error("Firebase credentials must not be empty")]
    Empty,

    #[error("Failed to initialize Firebase client ({0})")]
    ClientInit(String),
}

/// Holder of the process wide messaging client.
///
/// Installing and reading go through one mutex, so a reader never sees a
/// client that is still being built. A later configuration replaces the
/// client; a rejected one leaves it as it was.
pub struct ClientSlot {
    builder: Arc<dyn MessengerBuilder>,
    client: Mutex<Option<Arc<dyn Messenger>>>,
}

impl ClientSlot {
    pub fn new(builder: Arc<dyn MessengerBuilder>) -> Self {
        Self {
            builder,
            client: Mutex::new(None),
        }
    }

    /// Applies a configuration package payload.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Decode`] when the payload is not a configuration map
    /// * [`ConfigError::Empty`] when `credentials` is absent or empty
    /// * [`ConfigError::ClientInit`] when the client cannot be built from the credentials
    pub async fn apply_config(&self, raw: &[u8]) -> Result<(), ConfigError> {
        let mut client = self.client.lock().await;

        let conf: FirebaseConf = unpack(raw).map_err(|e| ConfigError::Decode(e.to_string()))?;
        let credentials = conf
            .credentials
            .filter(|credentials| !credentials.is_empty())
            .ok_or(ConfigError::Empty)?;

        let messenger = self
            .builder
            .build(&credentials)
            .await
            .map_err(|e| ConfigError::ClientInit(e.to_string()))?;

        if client.replace(messenger).is_some() {
            debug!("Replaced previously configured Firebase client");
        }
        Ok(())
    }

    /// The installed client, or [`ModuleError::NotConfigured`] before the
    /// first accepted configuration.
    pub async fn client(&self) -> Result<Arc<dyn Messenger>, ModuleError> {
        self.client
            .lock()
            .await
            .clone()
            .ok_or(ModuleError::NotConfigured)
    }

    pub async fn is_configured(&self) -> bool {
        self.client.lock().await.is_some()
    }

    /// Drops the installed client, if any.
    pub async fn clear(&self) {
        self.client.lock().await.take();
    }
}
