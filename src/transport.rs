use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::message::Message;

/// Component address on the bus.
pub type Address = String;

/// A message in flight: the correlation id minted by the requester, the
/// address replies should go to, and the payload itself.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub request_id: u64,
    pub reply_to: Address,
    pub payload: Message,
}

/// Best-effort in-process transport: addressed mpsc endpoints. Delivery may
/// fail silently (full or closed inbox), mirroring a lossy network; senders
/// never block and never observe an error. Handlers must not assume any
/// ordering among deliveries.
#[derive(Clone, Default)]
pub struct Bus {
    endpoints: Arc<Mutex<HashMap<Address, mpsc::Sender<Envelope>>>>,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint and hand back its inbox.
    pub fn register(&self, address: &str, capacity: usize) -> mpsc::Receiver<Envelope> {
        let (tx, rx) = mpsc::channel(capacity);
        if let Ok(mut endpoints) = self.endpoints.lock() {
            endpoints.insert(address.to_string(), tx);
        }
        rx
    }

    /// Fire-and-forget send. A missing endpoint or a full inbox drops the
    /// message, which is within the transport contract.
    pub fn send(&self, to: &str, envelope: Envelope) {
        let Ok(endpoints) = self.endpoints.lock() else {
            return;
        };
        if let Some(tx) = endpoints.get(to) {
            if let Err(e) = tx.try_send(envelope) {
                tracing::warn!(to = %to, error = %e, "Dropped message in transit");
            }
        } else {
            tracing::warn!(to = %to, "No endpoint registered, message dropped");
        }
    }
}
