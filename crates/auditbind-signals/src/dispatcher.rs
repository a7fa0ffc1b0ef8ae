//! Signal dispatcher: sends a signal to every matching receiver.
//!
//! - Receivers run inline, in the task that sent the signal, so anything the
//!   sending task carries in task-local storage is visible to them.
//! - Receivers run in connection order.
//! - The first receiver error stops the dispatch and is returned to the
//!   sender. There are no retries and no timeouts.

use std::sync::Arc;

use tracing::{debug, warn};

use auditbind_core::result::AppResult;
use auditbind_core::types::ContentType;
use auditbind_entity::Model;

use super::definitions::{DispatchUid, Signal, SignalEvent};
use super::registry::{Receiver, ReceiverKey, ReceiverRegistration, SignalRegistry};

/// Injectable signal bus shared by the object store and request middleware.
#[derive(Debug, Clone, Default)]
pub struct SignalBus {
    /// Receiver registry.
    registry: Arc<SignalRegistry>,
}

impl SignalBus {
    /// Creates a bus with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects `receiver` to `signal` for records of kind `sender`.
    ///
    /// The returned guard disconnects the receiver when dropped.
    pub fn connect(
        &self,
        signal: Signal,
        sender: ContentType,
        receiver: Arc<dyn Receiver>,
        dispatch_uid: DispatchUid,
    ) -> AppResult<ReceiverRegistration> {
        ReceiverRegistration::connect(
            Arc::clone(&self.registry),
            ReceiverKey::new(signal, sender, dispatch_uid),
            receiver,
        )
    }

    /// Disconnects the receiver connected under `dispatch_uid`, if any.
    pub fn disconnect(
        &self,
        signal: Signal,
        sender: ContentType,
        dispatch_uid: DispatchUid,
    ) -> bool {
        self.registry
            .disconnect(&ReceiverKey::new(signal, sender, dispatch_uid))
    }

    /// Sends `signal` for `instance` to every receiver connected for its kind.
    pub async fn send(&self, signal: Signal, instance: &mut dyn Model) -> AppResult<()> {
        let sender = instance.content_type();
        let receivers = self.registry.receivers_for(signal, &sender);

        if receivers.is_empty() {
            return Ok(());
        }

        debug!(
            signal = %signal,
            sender = %sender,
            receiver_count = receivers.len(),
            "Dispatching signal"
        );

        for (dispatch_uid, receiver) in receivers {
            let mut event = SignalEvent {
                signal,
                sender: sender.clone(),
                dispatch_uid,
                instance: &mut *instance,
            };

            if let Err(e) = receiver.receive(&mut event).await {
                warn!(
                    signal = %signal,
                    sender = %sender,
                    receiver = %receiver.name(),
                    error = %e,
                    "Receiver failed, aborting dispatch"
                );
                return Err(e);
            }
        }

        Ok(())
    }

    /// Returns the number of receivers connected for a signal and kind.
    pub fn receiver_count(&self, signal: Signal, sender: &ContentType) -> usize {
        self.registry.receiver_count(signal, sender)
    }
}
