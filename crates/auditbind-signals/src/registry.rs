//! Receiver registry keyed by signal, sender kind, and dispatch uid.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

use auditbind_core::error::AppError;
use auditbind_core::result::AppResult;
use auditbind_core::types::ContentType;

use super::definitions::{DispatchUid, Signal, SignalEvent};

/// Trait for signal receiver implementations.
#[async_trait]
pub trait Receiver: Send + Sync + fmt::Debug {
    /// Handles one signal dispatch. Returning an error aborts the dispatch
    /// and the operation that sent the signal.
    async fn receive(&self, event: &mut SignalEvent<'_>) -> AppResult<()>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

/// Identity of one registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiverKey {
    /// Signal the receiver listens to.
    pub signal: Signal,
    /// Record kind the receiver is filtered to.
    pub sender: ContentType,
    /// Disambiguator of the registration.
    pub dispatch_uid: DispatchUid,
}

impl ReceiverKey {
    /// Builds a key.
    pub fn new(signal: Signal, sender: ContentType, dispatch_uid: DispatchUid) -> Self {
        Self {
            signal,
            sender,
            dispatch_uid,
        }
    }
}

/// Entry in the receiver registry.
#[derive(Debug)]
struct ReceiverEntry {
    /// Connection order, used to dispatch in registration order.
    seq: u64,
    /// The receiver.
    receiver: Arc<dyn Receiver>,
}

/// Registry of receivers.
///
/// Safe to mutate from any number of concurrently handled requests.
#[derive(Debug, Default)]
pub struct SignalRegistry {
    /// Key → receiver.
    receivers: DashMap<ReceiverKey, ReceiverEntry>,
    /// Next connection sequence number.
    next_seq: AtomicU64,
}

impl SignalRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects a receiver under `key`.
    ///
    /// Fails with a conflict if a receiver is already connected under the
    /// same key.
    pub fn connect(&self, key: ReceiverKey, receiver: Arc<dyn Receiver>) -> AppResult<()> {
        match self.receivers.entry(key) {
            Entry::Occupied(occupied) => Err(AppError::conflict(format!(
                "A receiver is already connected for {} on {} with uid {}",
                occupied.key().signal,
                occupied.key().sender,
                occupied.key().dispatch_uid
            ))),
            Entry::Vacant(vacant) => {
                info!(
                    signal = %vacant.key().signal,
                    sender = %vacant.key().sender,
                    dispatch_uid = %vacant.key().dispatch_uid,
                    receiver = %receiver.name(),
                    "Receiver connected"
                );
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                vacant.insert(ReceiverEntry { seq, receiver });
                Ok(())
            }
        }
    }

    /// Disconnects the receiver under `key`.
    ///
    /// Returns whether a receiver was removed. Disconnecting an absent key
    /// is a no-op.
    pub fn disconnect(&self, key: &ReceiverKey) -> bool {
        let removed = self.receivers.remove(key).is_some();
        if removed {
            info!(
                signal = %key.signal,
                sender = %key.sender,
                dispatch_uid = %key.dispatch_uid,
                "Receiver disconnected"
            );
        } else {
            debug!(
                dispatch_uid = %key.dispatch_uid,
                "No receiver connected under uid, nothing to disconnect"
            );
        }
        removed
    }

    /// Returns whether a receiver is connected under `key`.
    pub fn is_connected(&self, key: &ReceiverKey) -> bool {
        self.receivers.contains_key(key)
    }

    /// Returns the receivers for a signal and sender kind, in connection order,
    /// paired with the uid each was connected under.
    pub fn receivers_for(
        &self,
        signal: Signal,
        sender: &ContentType,
    ) -> Vec<(DispatchUid, Arc<dyn Receiver>)> {
        let mut matching: Vec<(u64, DispatchUid, Arc<dyn Receiver>)> = self
            .receivers
            .iter()
            .filter(|entry| entry.key().signal == signal && &entry.key().sender == sender)
            .map(|entry| {
                (
                    entry.value().seq,
                    entry.key().dispatch_uid.clone(),
                    Arc::clone(&entry.value().receiver),
                )
            })
            .collect();

        matching.sort_by_key(|(seq, _, _)| *seq);
        matching
            .into_iter()
            .map(|(_, uid, receiver)| (uid, receiver))
            .collect()
    }

    /// Returns the number of receivers for a signal and sender kind.
    pub fn receiver_count(&self, signal: Signal, sender: &ContentType) -> usize {
        self.receivers
            .iter()
            .filter(|entry| entry.key().signal == signal && &entry.key().sender == sender)
            .count()
    }

    /// Returns the total number of connected receivers.
    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    /// Returns whether no receivers are connected.
    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }
}

/// A live connection. Disconnects its receiver when dropped.
///
/// Dropping happens on every way out of the owning scope: normal return,
/// early return, panic unwind, and cancellation of the owning future.
#[derive(Debug)]
#[must_use = "dropping the registration disconnects the receiver immediately"]
pub struct ReceiverRegistration {
    registry: Arc<SignalRegistry>,
    key: ReceiverKey,
}

impl ReceiverRegistration {
    /// Connects `receiver` under `key` and returns the guard.
    pub fn connect(
        registry: Arc<SignalRegistry>,
        key: ReceiverKey,
        receiver: Arc<dyn Receiver>,
    ) -> AppResult<Self> {
        registry.connect(key.clone(), receiver)?;
        Ok(Self { registry, key })
    }

    /// Key the receiver is connected under.
    pub fn key(&self) -> &ReceiverKey {
        &self.key
    }
}

impl Drop for ReceiverRegistration {
    fn drop(&mut self) {
        self.registry.disconnect(&self.key);
    }
}
