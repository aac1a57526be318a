//! Firebase Cloud Messaging client module
//!
//! This module provides a client for the Firebase Cloud Messaging (FCM) HTTP v1 API.
//! It sends push notifications to single devices by registration token and fans
//! multicast sends out as one request per token.
//!
//! The main component is the `FirebaseClient` struct, which handles authentication and
//! communication with the FCM API. It also includes data structures for representing
//! FCM messages, notifications, and responses.

use crate::auth::TokenSource;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Maximum number of tokens accepted in one multicast send
pub const MAX_MULTICAST_TOKENS: usize = 500;

/// Errors that can occur when interacting with the Firebase Cloud Messaging API
#[derive(Error, Debug)]
pub enum FirebaseError {
    /// Error during authentication with Firebase
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error during HTTP request to Firebase API
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Missing or invalid client configuration
    #[error("Missing configuration: {0}")]
    ConfigError(String),

    /// Error returned by the Firebase API
    ///
    /// `status` is the FCM error code (e.g. `UNREGISTERED`) when the response
    /// carries one, otherwise the generic API status.
    #[error("{status}: {message}")]
    ApiError { status: String, message: String },

    /// The message was rejected before it was sent
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// A send task of a multicast batch did not complete
    #[error("Send task failed: {0}")]
    TaskError(String),
}

/// Request body of the FCM send endpoint
#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    message: &'a Message,
}

/// A message to a single device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Registration token of the target device
    pub token: String,

    /// The notification to be displayed on the user's device
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,

    /// Custom key-value data to be sent with the message
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
}

/// A message to a list of devices, sent as one message per token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MulticastMessage {
    pub tokens: Vec<String>,
    pub notification: Option<Notification>,
    pub data: HashMap<String, String>,
}

impl MulticastMessage {
    /// One [`Message`] per token, in token order.
    pub fn to_messages(&self) -> Vec<Message> {
        self.tokens
            .iter()
            .map(|token| Message {
                token: token.clone(),
                notification: self.notification.clone(),
                data: self.data.clone(),
            })
            .collect()
    }
}

/// The notification to be displayed on the user's device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// The title of the notification
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// The body text of the notification
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

/// Response from the Firebase Cloud Messaging API
///
/// `name` is a string in the format "projects/{project_id}/messages/{message_id}"
#[derive(Debug, Deserialize)]
struct FcmResponse {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct FcmErrorResponse {
    #[serde(default)]
    error: FcmErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct FcmErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<FcmErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct FcmErrorDetail {
    #[serde(rename = "errorCode", default)]
    error_code: Option<String>,
}

impl FcmErrorResponse {
    fn into_error(self, http_status: reqwest::StatusCode, raw: String) -> FirebaseError {
        let body = self.error;
        let status = body
            .details
            .into_iter()
            .find_map(|detail| detail.error_code)
            .filter(|code| !code.is_empty())
            .unwrap_or(body.status);

        let status = if status.is_empty() {
            http_status.as_u16().to_string()
        } else {
            status
        };
        let message = if body.message.is_empty() { raw } else { body.message };

        FirebaseError::ApiError { status, message }
    }
}

/// Outcome of one message within a multicast send
///
/// Keys are serialized as `Success`, `MessageID` and `Error`, the names
/// ThingsDB code reads from the Firebase Admin SDK's batch response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendResponse {
    /// Whether the message was accepted by FCM
    pub success: bool,

    /// The message name if it was sent successfully
    #[serde(rename = "MessageID")]
    pub message_id: Option<String>,

    /// Error message if the message failed to send
    pub error: Option<String>,
}

impl From<Result<String, FirebaseError>> for SendResponse {
    fn from(result: Result<String, FirebaseError>) -> Self {
        match result {
            Ok(name) => SendResponse {
                success: true,
                message_id: Some(name),
                error: None,
            },
            Err(err) => SendResponse {
                success: false,
                message_id: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Result of a multicast send, one response per token in request order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchResponse {
    pub success_count: usize,
    pub failure_count: usize,
    pub responses: Vec<SendResponse>,
}

impl BatchResponse {
    pub fn from_responses(responses: Vec<SendResponse>) -> Self {
        let success_count = responses.iter().filter(|r| r.success).count();
        Self {
            success_count,
            failure_count: responses.len() - success_count,
            responses,
        }
    }
}

/// Client for interacting with the Firebase Cloud Messaging API
///
/// Cloning is cheap; clones share the HTTP connection pool and token cache.
#[derive(Clone)]
pub struct FirebaseClient {
    /// HTTP client for making requests to the FCM API
    client: Client,

    /// Root of the FCM API, e.g. `https://fcm.googleapis.com`
    base_url: String,

    /// Firebase project the messages are sent through
    project_id: String,

    tokens: Arc<dyn TokenSource>,
}

impl FirebaseClient {
    /// Creates a new Firebase client
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for all API calls
    /// * `base_url` - Root of the FCM API
    /// * `project_id` - The Firebase project id from the service account
    /// * `tokens` - Source of OAuth2 bearer tokens
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            project_id: project_id.into(),
            tokens,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.base_url.trim_end_matches('/'),
            self.project_id
        )
    }

    /// Sends a push notification message to one device
    ///
    /// # Returns
    ///
    /// * `Result<String, FirebaseError>` - On success, returns the message name.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// * The message has no token
    /// * Authentication fails
    /// * The HTTP request fails
    /// * The FCM API returns an error response
    pub async fn send_message(&self, message: &Message) -> Result<String, FirebaseError> {
        validate_token(&message.token)?;
        self.post(message).await
    }

    /// Sends a message to each token of a multicast message
    ///
    /// The sends run concurrently. Failures of individual tokens are reported
    /// in the returned [`BatchResponse`]; only an invalid message as a whole
    /// fails the call.
    pub async fn send_multicast(
        &self,
        message: &MulticastMessage,
    ) -> Result<BatchResponse, FirebaseError> {
        if message.tokens.is_empty() {
            return Err(FirebaseError::InvalidMessage(
                "tokens must not be empty".to_string(),
            ));
        }
        if message.tokens.len() > MAX_MULTICAST_TOKENS {
            return Err(FirebaseError::InvalidMessage(format!(
                "tokens must not contain more than {} elements",
                MAX_MULTICAST_TOKENS
            )));
        }
        for token in &message.tokens {
            validate_token(token)?;
        }

        let messages = message.to_messages();
        let count = messages.len();
        let mut tasks = JoinSet::new();
        for (index, msg) in messages.into_iter().enumerate() {
            let client = self.clone();
            tasks.spawn(async move { (index, client.post(&msg).await) });
        }

        let mut responses: Vec<Option<SendResponse>> = (0..count).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined.map_err(|e| FirebaseError::TaskError(e.to_string()))?;
            if let Err(err) = &result {
                warn!("Multicast send to token #{} failed: {}", index, err);
            }
            responses[index] = Some(SendResponse::from(result));
        }

        Ok(BatchResponse::from_responses(
            responses.into_iter().flatten().collect(),
        ))
    }

    async fn post(&self, message: &Message) -> Result<String, FirebaseError> {
        let token = self
            .tokens
            .token()
            .await
            .map_err(|e| FirebaseError::AuthError(e.to_string()))?;

        let response = self
            .client
            .post(self.send_url())
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .json(&FcmMessage { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            let parsed: FcmErrorResponse = serde_json::from_str(&error_text).unwrap_or_default();
            return Err(parsed.into_error(status, error_text));
        }

        let fcm_response: FcmResponse = response.json().await?;
        debug!("Message sent: {}", fcm_response.name);
        Ok(fcm_response.name)
    }
}

fn validate_token(token: &str) -> Result<(), FirebaseError> {
    if token.is_empty() {
        return Err(FirebaseError::InvalidMessage(
            "token must not be empty".to_string(),
        ));
    }
    Ok(())
}
