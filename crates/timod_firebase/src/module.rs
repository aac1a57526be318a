//! The module event loop.
//!
//! Packages are handled one at a time in arrival order. Each configuration
//! package gets a `ModuleConfOk` or `ModuleConfErr`, each request package
//! gets one reply, other package types are ignored. A transport error ends
//! the loop; the caller is expected to exit so the host restarts the module.

use std::sync::Arc;
use timod_common::ModuleError;
use timod_proto::{Pkg, PkgWriter, Proto, ProtoError};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::conf::ClientSlot;
use crate::handlers::Dispatcher;
use crate::service::MessengerBuilder;

/// Module state: the client slot and the dispatcher reading from it.
pub struct FirebaseModule {
    slot: Arc<ClientSlot>,
    dispatcher: Dispatcher,
}

impl FirebaseModule {
    pub fn new(builder: Arc<dyn MessengerBuilder>) -> Self {
        let slot = Arc::new(ClientSlot::new(builder));
        Self {
            dispatcher: Dispatcher::new(slot.clone()),
            slot,
        }
    }

    pub fn slot(&self) -> &ClientSlot {
        &self.slot
    }

    /// Handles one inbound package, returning the reply to send, if any.
    pub async fn on_pkg(&self, pkg: Pkg) -> Option<Pkg> {
        match pkg.proto() {
            Ok(Proto::ModuleConf) => Some(self.on_conf(&pkg).await),
            Ok(Proto::ModuleReq) => Some(self.dispatcher.handle(&pkg).await),
            _ => {
                warn!("Unexpected package type: {}", pkg.tp);
                None
            }
        }
    }

    async fn on_conf(&self, pkg: &Pkg) -> Pkg {
        match self.slot.apply_config(&pkg.data).await {
            Ok(()) => {
                info!("Firebase configuration accepted");
                Pkg::conf_ok(pkg.pid)
            }
            Err(err) => {
                error!("{}", err);
                Pkg::conf_err(pkg.pid)
            }
        }
    }

    /// Releases the messaging client before the process exits.
    pub async fn shutdown(&self) {
        self.slot.clear().await;
        info!("Firebase module shut down");
    }
}

/// Runs the event loop until the host channel fails.
///
/// Waits on inbound packages and on transport errors reported by the
/// reader. Pending packages are handled before a reported error. Returns
/// the [`ModuleError::Transport`] that ended the loop (a reported channel
/// error or a failed reply write), after the module has been shut down.
pub async fn run<W>(
    module: &FirebaseModule,
    mut pkg_rx: mpsc::Receiver<Pkg>,
    mut err_rx: mpsc::Receiver<ProtoError>,
    writer: &mut PkgWriter<W>,
) -> ModuleError
where
    W: AsyncWrite + Unpin,
{
    let err = loop {
        tokio::select! {
            biased;

            Some(pkg) = pkg_rx.recv() => {
                if let Some(reply) = module.on_pkg(pkg).await {
                    if let Err(err) = writer.write(&reply).await {
                        break err;
                    }
                }
            }
            err = err_rx.recv() => break err.unwrap_or(ProtoError::Closed),
        }
    };

    error!("Error: {}", err);
    module.shutdown().await;
    ModuleError::from(err)
}
