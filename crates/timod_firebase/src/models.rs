//! Models for the Firebase module
//!
//! Payload shapes the host sends in configuration and request packages. All
//! of them arrive as msgpack maps; unknown keys are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use timod_proto::{unpack, ProtoError};

/// Handler name for a single device send
pub const SEND_MESSAGE: &str = "send-message";

/// Handler name for a send to a list of devices
pub const SEND_MULTICAST_MESSAGE: &str = "send-multicast-message";

/// Configuration package payload: `{credentials: ...}`
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct FirebaseConf {
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

/// Service account credentials supplied by the host.
///
/// Either the fields of the service account key file as a map, or the key
/// file's JSON document as a single string.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Credentials {
    Fields(Map<String, Value>),
    Json(String),
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        match self {
            Credentials::Fields(fields) => fields.is_empty(),
            Credentials::Json(json) => json.trim().is_empty(),
        }
    }

    /// The credentials as a service account JSON document.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Credentials::Fields(fields) => serde_json::to_vec(fields),
            Credentials::Json(json) => Ok(json.as_bytes().to_vec()),
        }
    }
}

/// Request for [`SEND_MESSAGE`]
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SendRequest {
    /// Registration token of the target device
    pub token: String,
    pub title: String,
    pub body: String,
    /// Custom key-value data delivered to the app
    pub data: Option<HashMap<String, String>>,
}

/// Request for [`SEND_MULTICAST_MESSAGE`]
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct MulticastSendRequest {
    /// Registration tokens of the target devices, in delivery order
    pub tokens: Vec<String>,
    pub title: String,
    pub body: String,
    pub data: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct RequestHandler {
    #[serde(default)]
    handler: Option<String>,
}

/// A request package decoded by its `handler` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirebaseRequest {
    /// No `handler` in the payload
    Missing,
    SendMessage(SendRequest),
    SendMulticastMessage(MulticastSendRequest),
    /// A handler name this module does not serve
    Unknown(String),
}

impl FirebaseRequest {
    /// Decodes a request payload.
    ///
    /// The handler name is read first; the remaining fields are only decoded
    /// for a known handler, so an unknown handler never fails on its fields.
    pub fn decode(data: &[u8]) -> Result<Self, ProtoError> {
        let RequestHandler { handler } = unpack(data)?;
        let request = match handler.as_deref() {
            None => FirebaseRequest::Missing,
            Some(SEND_MESSAGE) => FirebaseRequest::SendMessage(unpack(data)?),
            Some(SEND_MULTICAST_MESSAGE) => FirebaseRequest::SendMulticastMessage(unpack(data)?),
            Some(name) => FirebaseRequest::Unknown(name.to_string()),
        };
        Ok(request)
    }
}
