//! Async plumbing between the host pipes and the module event loop.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::buffer::PkgBuffer;
use crate::error::ProtoError;
use crate::pkg::Pkg;

const READ_CHUNK: usize = 8 * 1024;

/// Reads packages from `reader` and forwards them to `pkg_tx`.
///
/// Runs until the channel breaks. Exactly one [`ProtoError`] is sent on
/// `err_tx` when reading stops because of end of input, an I/O error or a
/// framing error. Nothing is sent when the package receiver was dropped.
pub async fn read_pkgs<R>(reader: R, pkg_tx: mpsc::Sender<Pkg>, err_tx: mpsc::Sender<ProtoError>)
where
    R: AsyncRead + Unpin,
{
    if let Some(err) = pump(reader, &pkg_tx).await {
        debug!("Stopped reading packages: {}", err);
        // the event loop may already be gone
        let _ = err_tx.send(err).await;
    }
}

async fn pump<R>(mut reader: R, pkg_tx: &mpsc::Sender<Pkg>) -> Option<ProtoError>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = PkgBuffer::new();
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        let n = match reader.read(&mut chunk).await {
            Ok(0) => return Some(ProtoError::Closed),
            Ok(n) => n,
            Err(e) => return Some(ProtoError::Io(e)),
        };
        buffer.extend(&chunk[..n]);

        loop {
            match buffer.next_pkg() {
                Ok(Some(pkg)) => {
                    trace!(pid = pkg.pid, tp = pkg.tp, size = pkg.data.len(), "Received package");
                    if pkg_tx.send(pkg).await.is_err() {
                        return None;
                    }
                }
                Ok(None) => break,
                Err(e) => return Some(e),
            }
        }
    }
}

/// Writes packages to the host, flushing after each one.
#[derive(Debug)]
pub struct PkgWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> PkgWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub async fn write(&mut self, pkg: &Pkg) -> Result<(), ProtoError> {
        self.inner.write_all(&pkg.encode()).await?;
        self.inner.flush().await?;
        trace!(pid = pkg.pid, tp = pkg.tp, size = pkg.data.len(), "Sent package");
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
