//! Messaging bridge: maps decoded requests onto provider messages.

use timod_common::{Context, ModuleError};

use crate::client::{BatchResponse, Message, MulticastMessage, Notification};
use crate::models::{MulticastSendRequest, SendRequest};
use crate::service::Messenger;

pub fn to_message(req: SendRequest) -> Message {
    Message {
        token: req.token,
        notification: Some(Notification {
            title: req.title,
            body: req.body,
        }),
        data: req.data.unwrap_or_default(),
    }
}

pub fn to_multicast_message(req: MulticastSendRequest) -> MulticastMessage {
    MulticastMessage {
        tokens: req.tokens,
        notification: Some(Notification {
            title: req.title,
            body: req.body,
        }),
        data: req.data.unwrap_or_default(),
    }
}

/// Sends a single device message, returning the provider's message name.
pub async fn send_message(messenger: &dyn Messenger, req: SendRequest) -> Result<String, ModuleError> {
    messenger
        .send(to_message(req))
        .await
        .provider_context("Failed to send message")
}

pub async fn send_multicast_message(
    messenger: &dyn Messenger,
    req: MulticastSendRequest,
) -> Result<BatchResponse, ModuleError> {
    messenger
        .send_each_for_multicast(to_multicast_message(req))
        .await
        .provider_context("Failed to send multicast message")
}
