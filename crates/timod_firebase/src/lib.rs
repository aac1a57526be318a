//! Firebase Cloud Messaging module for ThingsDB
//!
//! This crate implements a ThingsDB module that sends push notifications
//! using the Firebase Cloud Messaging (FCM) HTTP v1 API.
//!
//! # Features
//!
//! - Configuration with service account credentials sent by the host
//! - Sending push notifications to a single device token (`send-message`)
//! - Sending push notifications to a list of device tokens (`send-multicast-message`)
//! - Support for notification payload (title and body)
//! - Support for custom data payload
//!
//! # Requests
//!
//! ```text
//! {handler: "send-message", token, title, body, data}
//! {handler: "send-multicast-message", tokens, title, body, data}
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use timod_config::ModuleSettings;
//! use timod_firebase::{run, FirebaseClientBuilder, FirebaseModule};
//! use timod_proto::{read_pkgs, PkgWriter};
//! use tokio::sync::mpsc;
//!
//! async fn start() {
//!     let settings = ModuleSettings::default();
//!     let module = FirebaseModule::new(Arc::new(FirebaseClientBuilder::new(&settings)));
//!
//!     let (pkg_tx, pkg_rx) = mpsc::channel(64);
//!     let (err_tx, err_rx) = mpsc::channel(1);
//!     tokio::spawn(read_pkgs(tokio::io::stdin(), pkg_tx, err_tx));
//!
//!     let mut writer = PkgWriter::new(tokio::io::stdout());
//!     let _ = run(&module, pkg_rx, err_rx, &mut writer).await;
//! }
//! ```

pub mod auth;
pub mod client;
#[cfg(test)]
mod client_test;
pub mod conf;
pub mod handlers;
pub mod logic;
pub mod models;
pub mod module;
pub mod service;

pub use client::{BatchResponse, FirebaseClient, FirebaseError, SendResponse};
pub use conf::{ClientSlot, ConfigError};
pub use handlers::Dispatcher;
pub use models::{FirebaseRequest, MulticastSendRequest, SendRequest};
pub use module::{run, FirebaseModule};
pub use service::{FirebaseClientBuilder, Messenger, MessengerBuilder};
