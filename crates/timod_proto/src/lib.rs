//! ThingsDB module protocol
//!
//! A ThingsDB module is a separate process driven by the ThingsDB host over
//! its stdin and stdout. Both directions carry the same package format: an
//! 8 byte header (data size, correlation id, type and check bit) followed by
//! a msgpack encoded payload.
//!
//! This crate provides:
//!
//! - [`Proto`] package types and [`Ex`] exception codes
//! - [`Pkg`] with the constructors for every reply a module sends
//! - [`PkgBuffer`] for splitting a byte stream into packages
//! - [`read_pkgs`] and [`PkgWriter`] for async pipes

pub mod buffer;
pub mod error;
pub mod pkg;
#[cfg(test)]
mod pkg_proptest;
pub mod proto;
pub mod transport;

pub use buffer::PkgBuffer;
pub use error::ProtoError;
pub use pkg::{pack, unpack, Pkg, PkgHeader, HEADER_SIZE, MAX_DATA_SIZE};
pub use proto::{Ex, Proto};
pub use transport::{read_pkgs, PkgWriter};
