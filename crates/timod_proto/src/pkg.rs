//! Package header and payload packing.
//!
//! Each package is an 8 byte little-endian header followed by `n` bytes of
//! msgpack data:
//!
//! ```text
//! | n: u32 | pid: u16 | tp: u8 | ntp: u8 | data: [u8; n] |
//! ```
//!
//! `ntp` is a check bit and must always equal `tp ^ 0xff`.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::ProtoError;
use crate::proto::{Ex, Proto};

/// Size of a package header in bytes.
pub const HEADER_SIZE: usize = 8;

/// Maximum accepted package data size (16 MiB).
pub const MAX_DATA_SIZE: u32 = 16 * 1024 * 1024;

/// Decoded package header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PkgHeader {
    pub size: u32,
    pub pid: u16,
    pub tp: u8,
}

impl PkgHeader {
    pub fn decode(buf: &[u8; HEADER_SIZE]) -> Result<Self, ProtoError> {
        let size = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let pid = u16::from_le_bytes([buf[4], buf[5]]);
        let tp = buf[6];
        let ntp = buf[7];

        if tp ^ 0xff != ntp {
            return Err(ProtoError::InvalidCheckBit { tp, ntp });
        }
        if size > MAX_DATA_SIZE {
            return Err(ProtoError::TooLarge {
                size,
                limit: MAX_DATA_SIZE,
            });
        }

        Ok(Self { size, pid, tp })
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.size.to_le_bytes());
        buf[4..6].copy_from_slice(&self.pid.to_le_bytes());
        buf[6] = self.tp;
        buf[7] = self.tp ^ 0xff;
        buf
    }
}

/// A complete package: correlation id, type tag and raw msgpack data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pkg {
    pub pid: u16,
    pub tp: u8,
    pub data: Vec<u8>,
}

impl Pkg {
    pub fn new(tp: Proto, pid: u16, data: Vec<u8>) -> Self {
        Self {
            pid,
            tp: tp.as_u8(),
            data,
        }
    }

    /// Package type, or the raw byte when the host sent a type we do not know.
    pub fn proto(&self) -> Result<Proto, u8> {
        Proto::try_from(self.tp)
    }

    pub fn conf_ok(pid: u16) -> Self {
        Self::new(Proto::ModuleConfOk, pid, Vec::new())
    }

    pub fn conf_err(pid: u16) -> Self {
        Self::new(Proto::ModuleConfErr, pid, Vec::new())
    }

    /// Success response carrying `value` packed as msgpack.
    pub fn response<T: Serialize + ?Sized>(pid: u16, value: &T) -> Result<Self, ProtoError> {
        Ok(Self::new(Proto::ModuleRes, pid, pack(value)?))
    }

    /// Error response; the body is the msgpack array `[code, message]`.
    pub fn error(pid: u16, ex: Ex, msg: impl AsRef<str>) -> Self {
        // packing (i8, &str) cannot fail
        let data = pack(&(ex.code(), msg.as_ref())).unwrap_or_default();
        Self::new(Proto::ModuleErr, pid, data)
    }

    /// Unpacks the data of this package into `T`.
    pub fn unpack<T: DeserializeOwned>(&self) -> Result<T, ProtoError> {
        unpack(&self.data)
    }

    pub fn header(&self) -> PkgHeader {
        PkgHeader {
            size: self.data.len() as u32,
            pid: self.pid,
            tp: self.tp,
        }
    }

    /// Header followed by data, ready to be written to the host.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.data.len());
        out.extend_from_slice(&self.header().encode());
        out.extend_from_slice(&self.data);
        out
    }
}

/// Packs a value as msgpack with named map keys.
pub fn pack<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ProtoError> {
    Ok(rmp_serde::to_vec_named(value)?)
}

/// Unpacks msgpack data into `T`.
pub fn unpack<T: DeserializeOwned>(data: &[u8]) -> Result<T, ProtoError> {
    Ok(rmp_serde::from_slice(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_little_endian() {
        let header = PkgHeader {
            size: 0x0102_0304,
            pid: 0x0a0b,
            tp: Proto::ModuleRes.as_u8(),
        };
        let buf = header.encode();
        assert_eq!(buf, [0x04, 0x03, 0x02, 0x01, 0x0b, 0x0a, 81, 81 ^ 0xff]);
    }

    #[test]
    fn rejects_invalid_check_bit() {
        let mut buf = Pkg::conf_ok(1).header().encode();
        buf[7] = 0;
        let err = PkgHeader::decode(&buf).unwrap_err();
        assert!(matches!(err, ProtoError::InvalidCheckBit { tp: 65, ntp: 0 }));
    }

    #[test]
    fn rejects_oversized_package() {
        let header = PkgHeader {
            size: MAX_DATA_SIZE + 1,
            pid: 0,
            tp: Proto::ModuleReq.as_u8(),
        };
        let err = PkgHeader::decode(&header.encode()).unwrap_err();
        assert!(matches!(err, ProtoError::TooLarge { .. }));
    }

    #[test]
    fn error_body_is_code_and_message() {
        let pkg = Pkg::error(7, Ex::BadData, "Missing handler");
        assert_eq!(pkg.pid, 7);
        assert_eq!(pkg.proto(), Ok(Proto::ModuleErr));

        let (code, msg): (i8, String) = pkg.unpack().unwrap();
        assert_eq!(code, -53);
        assert_eq!(msg, "Missing handler");
    }

    #[test]
    fn response_keeps_pid_and_payload() {
        let pkg = Pkg::response(513, "projects/p/messages/1").unwrap();
        let bytes = pkg.encode();

        let mut head = [0u8; HEADER_SIZE];
        head.copy_from_slice(&bytes[..HEADER_SIZE]);
        let header = PkgHeader::decode(&head).unwrap();
        assert_eq!(header.pid, 513);
        assert_eq!(header.size as usize, bytes.len() - HEADER_SIZE);

        let name: String = unpack(&bytes[HEADER_SIZE..]).unwrap();
        assert_eq!(name, "projects/p/messages/1");
    }

    #[test]
    fn conf_replies_have_no_data() {
        assert!(Pkg::conf_ok(0).data.is_empty());
        assert_eq!(Pkg::conf_err(3).proto(), Ok(Proto::ModuleConfErr));
    }
}
