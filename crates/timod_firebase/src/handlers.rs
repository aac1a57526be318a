//! Request dispatch for Firebase module requests
//!
//! Every request package produces exactly one reply package addressed to the
//! request's pid: a `ModuleRes` with the provider's answer or a `ModuleErr`.

use std::sync::Arc;
use timod_common::{bad_data, Context, ModuleError};
use timod_proto::Pkg;
use tracing::{debug, warn};

use crate::conf::ClientSlot;
use crate::logic::{send_message, send_multicast_message};
use crate::models::FirebaseRequest;

/// Routes request packages to the messaging bridge.
pub struct Dispatcher {
    slot: Arc<ClientSlot>,
}

impl Dispatcher {
    pub fn new(slot: Arc<ClientSlot>) -> Self {
        Self { slot }
    }

    /// Handles one request package and returns its reply.
    pub async fn handle(&self, pkg: &Pkg) -> Pkg {
        match self.dispatch(pkg).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(pid = pkg.pid, ex = %err.ex(), "Request failed: {}", err);
                err.to_pkg(pkg.pid)
            }
        }
    }

    async fn dispatch(&self, pkg: &Pkg) -> Result<Pkg, ModuleError> {
        let request =
            FirebaseRequest::decode(&pkg.data).context("Failed to unpack Firebase request")?;

        match request {
            FirebaseRequest::Missing => Err(bad_data("Missing handler")),
            FirebaseRequest::Unknown(name) => Err(bad_data(format!("Unknown handler: {}", name))),
            FirebaseRequest::SendMessage(req) => {
                debug!(pid = pkg.pid, "send-message to 1 device");
                let client = self.slot.client().await?;
                let name = send_message(client.as_ref(), req).await?;
                Ok(Pkg::response(pkg.pid, &name)?)
            }
            FirebaseRequest::SendMulticastMessage(req) => {
                debug!(pid = pkg.pid, "send-multicast-message to {} devices", req.tokens.len());
                let client = self.slot.client().await?;
                let batch = send_multicast_message(client.as_ref(), req).await?;
                Ok(Pkg::response(pkg.pid, &batch)?)
            }
        }
    }
}
