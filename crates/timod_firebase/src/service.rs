//! Messaging service abstractions.
//!
//! The dispatcher only talks to [`Messenger`] trait objects, so the FCM
//! client can be swapped for a recording fake in tests. A [`MessengerBuilder`]
//! turns the host's credentials into a messenger during configuration.

use async_trait::async_trait;
use std::sync::Arc;
use timod_common::create_client;
use timod_config::ModuleSettings;
use tracing::info;

use crate::auth::{service_account_key, ServiceAccountTokenSource};
use crate::client::{BatchResponse, FirebaseClient, FirebaseError, Message, MulticastMessage};
use crate::models::Credentials;

/// Push notification provider.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends one message, returning the provider's message name.
    async fn send(&self, message: Message) -> Result<String, FirebaseError>;

    /// Sends the message to every token, reporting the outcome per token.
    async fn send_each_for_multicast(
        &self,
        message: MulticastMessage,
    ) -> Result<BatchResponse, FirebaseError>;
}

#[async_trait]
impl Messenger for FirebaseClient {
    async fn send(&self, message: Message) -> Result<String, FirebaseError> {
        self.send_message(&message).await
    }

    async fn send_each_for_multicast(
        &self,
        message: MulticastMessage,
    ) -> Result<BatchResponse, FirebaseError> {
        self.send_multicast(&message).await
    }
}

/// Constructs a messenger from host supplied credentials.
#[async_trait]
pub trait MessengerBuilder: Send + Sync {
    async fn build(&self, credentials: &Credentials) -> Result<Arc<dyn Messenger>, FirebaseError>;
}

/// Builds [`FirebaseClient`]s from service account credentials.
#[derive(Debug, Clone)]
pub struct FirebaseClientBuilder {
    base_url: String,
    timeout_secs: u64,
}

impl FirebaseClientBuilder {
    pub fn new(settings: &ModuleSettings) -> Self {
        Self {
            base_url: settings.fcm_base_url.clone(),
            timeout_secs: settings.http_timeout_secs,
        }
    }
}

#[async_trait]
impl MessengerBuilder for FirebaseClientBuilder {
    async fn build(&self, credentials: &Credentials) -> Result<Arc<dyn Messenger>, FirebaseError> {
        let json = credentials
            .to_json()
            .map_err(|e| FirebaseError::ConfigError(e.to_string()))?;
        let key = service_account_key(&json)
            .map_err(|e| FirebaseError::ConfigError(format!("invalid service account key: {}", e)))?;
        let project_id = key
            .project_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                FirebaseError::ConfigError("Missing project_id in credentials".to_string())
            })?;

        let tokens = ServiceAccountTokenSource::new(key)
            .await
            .map_err(|e| FirebaseError::AuthError(e.to_string()))?;
        let http = create_client(self.timeout_secs, false)?;

        info!("Firebase client created for project {}", project_id);
        Ok(Arc::new(FirebaseClient::new(
            http,
            self.base_url.clone(),
            project_id,
            Arc::new(tokens),
        )))
    }
}
