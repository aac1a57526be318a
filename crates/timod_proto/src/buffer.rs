use crate::error::ProtoError;
use crate::pkg::{Pkg, PkgHeader, HEADER_SIZE};

/// Accumulates raw bytes from the host and splits them into packages.
///
/// Reads from the host pipe may end anywhere inside a package, so bytes are
/// kept until a full header and its data are available.
#[derive(Debug, Default)]
pub struct PkgBuffer {
    buf: Vec<u8>,
}

impl PkgBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Number of buffered bytes not yet returned as a package.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Takes the next complete package from the buffer.
    ///
    /// Returns `Ok(None)` when more bytes are needed. A corrupt header is an
    /// error; the buffer is unusable afterwards since package boundaries are
    /// lost.
    pub fn next_pkg(&mut self) -> Result<Option<Pkg>, ProtoError> {
        if self.buf.len() < HEADER_SIZE {
            return Ok(None);
        }

        let mut head = [0u8; HEADER_SIZE];
        head.copy_from_slice(&self.buf[..HEADER_SIZE]);
        let header = PkgHeader::decode(&head)?;

        let total = HEADER_SIZE + header.size as usize;
        if self.buf.len() < total {
            return Ok(None);
        }

        let data = self.buf[HEADER_SIZE..total].to_vec();
        self.buf.drain(..total);

        Ok(Some(Pkg {
            pid: header.pid,
            tp: header.tp,
            data,
        }))
    }
}
