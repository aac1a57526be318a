use std::fmt;
use thiserror::Error;
use timod_proto::{Ex, Pkg};

/// The base error type for everything a module reports to the host.
///
/// The `Display` output of the per-request variants is exactly the message
/// the host receives, so it carries no prefix.
#[derive(Error, Debug)]
pub enum ModuleError {
    /// Malformed or semantically invalid request payload
    #[error("{0}")]
    BadData(String),

    /// The external messaging provider rejected or failed the call
    #[error("{0}")]
    Provider(String),

    /// A request arrived before any configuration was accepted
    #[error("Firebase client not configured")]
    NotConfigured,

    /// The host channel itself failed
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ModuleError {
    /// ThingsDB exception code used when this error is sent as a reply.
    pub fn ex(&self) -> Ex {
        match self {
            ModuleError::BadData(_) => Ex::BadData,
            ModuleError::Provider(_) => Ex::BadData,
            ModuleError::NotConfigured => Ex::Operation,
            ModuleError::Transport(_) => Ex::Internal,
        }
    }

    /// Error reply addressed to `pid`.
    pub fn to_pkg(&self, pid: u16) -> Pkg {
        Pkg::error(pid, self.ex(), self.to_string())
    }
}

/// Adds request context to lower level errors.
///
/// Messages take the form `"{context} ({error})"`.
pub trait Context<T> {
    /// Wraps the error as [`ModuleError::BadData`].
    fn context<C>(self, context: C) -> Result<T, ModuleError>
    where
        C: fmt::Display;

    /// Wraps the error as [`ModuleError::Provider`].
    fn provider_context<C>(self, context: C) -> Result<T, ModuleError>
    where
        C: fmt::Display;
}

impl<T, E: fmt::Display> Context<T> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, ModuleError>
    where
        C: fmt::Display,
    {
        self.map_err(|error| ModuleError::BadData(format!("{} ({})", context, error)))
    }

    fn provider_context<C>(self, context: C) -> Result<T, ModuleError>
    where
        C: fmt::Display,
    {
        self.map_err(|error| ModuleError::Provider(format!("{} ({})", context, error)))
    }
}

impl From<timod_proto::ProtoError> for ModuleError {
    fn from(err: timod_proto::ProtoError) -> Self {
        if err.is_transport() {
            ModuleError::Transport(err.to_string())
        } else {
            ModuleError::BadData(err.to_string())
        }
    }
}

// Utility functions for error handling
pub fn bad_data<T: fmt::Display>(message: T) -> ModuleError {
    ModuleError::BadData(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use timod_proto::Proto;

    #[test]
    fn bad_data_message_is_unprefixed() {
        let err = bad_data("Missing handler");
        assert_eq!(err.to_string(), "Missing handler");
        assert_eq!(err.ex(), Ex::BadData);
    }

    #[test]
    fn provider_errors_reach_host_as_bad_data() {
        let result: Result<(), &str> = Err("UNREGISTERED");
        let err = result.provider_context("Failed to send message").unwrap_err();
        assert_eq!(err.to_string(), "Failed to send message (UNREGISTERED)");
        assert_eq!(err.ex(), Ex::BadData);
    }

    #[test]
    fn not_configured_is_an_operation_error() {
        let pkg = ModuleError::NotConfigured.to_pkg(11);
        assert_eq!(pkg.pid, 11);
        assert_eq!(pkg.proto(), Ok(Proto::ModuleErr));
        let (code, msg): (i8, String) = pkg.unpack().unwrap();
        assert_eq!(code, Ex::Operation.code());
        assert_eq!(msg, "Firebase client not configured");
    }

    #[test]
    fn channel_errors_become_transport_errors() {
        let err = ModuleError::from(timod_proto::ProtoError::Closed);
        assert!(matches!(err, ModuleError::Transport(_)));
        assert_eq!(err.ex(), Ex::Internal);
        assert_eq!(err.to_string(), "Transport error: module channel closed by host");
    }
}
