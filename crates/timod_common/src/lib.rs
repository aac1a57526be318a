// --- File: crates/timod_common/src/lib.rs ---

pub mod error;   // Error taxonomy shared by the module crates
pub mod http;    // HTTP utilities
pub mod logging; // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{bad_data, Context, ModuleError};

// Re-export HTTP utilities for easier access
pub use http::{create_client, DEFAULT_TIMEOUT_SECS};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_error};
