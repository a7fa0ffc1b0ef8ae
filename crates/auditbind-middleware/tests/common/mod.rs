//! Shared fixtures for request-binding tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use auditbind_core::config::audit::AuditConfig;
use auditbind_core::error::AppError;
use auditbind_core::result::AppResult;
use auditbind_core::types::ContentType;
use auditbind_entity::{LogAction, LogEntry, Record, User};
use auditbind_middleware::{AuditBinding, ModelBackend};
use auditbind_signals::{DispatchUid, Receiver, ReceiverRegistration, Signal, SignalBus, SignalEvent};
use auditbind_store::{AuditOptions, AuditRegistry, MemoryStore, ModelRegistry, ObjectStore};

/// Test harness wiring a memory store to a binding.
pub struct Harness {
    pub binding: Arc<AuditBinding>,
    pub store: Arc<MemoryStore>,
    pub bus: SignalBus,
    pub audit: Arc<AuditRegistry>,
}

pub fn article_kind() -> ContentType {
    ContentType::new("blog", "article")
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(AuditConfig::default())
    }

    pub fn with_config(config: AuditConfig) -> Self {
        let bus = SignalBus::new();
        let audit = Arc::new(AuditRegistry::new());
        audit.register(article_kind(), AuditOptions::default());

        let models = Arc::new(ModelRegistry::new());
        models.register_model(article_kind());

        let store = Arc::new(MemoryStore::new(bus.clone(), Arc::clone(&audit)));
        let binding = Arc::new(AuditBinding {
            config,
            bus: bus.clone(),
            store: store.clone(),
            models,
            audit: Arc::clone(&audit),
            permissions: Arc::new(ModelBackend),
        });

        Self {
            binding,
            store,
            bus,
            audit,
        }
    }

    /// Number of receivers stamping log entries.
    pub fn stamping_receivers(&self) -> usize {
        self.bus
            .receiver_count(Signal::PreSave, &ContentType::log_entry())
    }

    /// Saves an article outside of any request.
    pub async fn seed_article(&self, pk: &str, title: &str) -> Record {
        let mut article = Record::new(article_kind(), pk).with_attr("title", json!(title));
        self.store.save(&mut article).await.unwrap();
        article
    }

    /// Counts saves of articles.
    pub fn count_article_saves(&self) -> (Arc<AtomicUsize>, ReceiverRegistration) {
        let counter = Arc::new(AtomicUsize::new(0));
        let registration = self
            .bus
            .connect(
                Signal::PostSave,
                article_kind(),
                Arc::new(SaveCounter(Arc::clone(&counter))),
                DispatchUid::issue("test.save_counter"),
            )
            .unwrap();
        (counter, registration)
    }

    /// Makes every article save fail.
    pub fn fail_article_saves(&self) -> ReceiverRegistration {
        self.bus
            .connect(
                Signal::PreSave,
                article_kind(),
                Arc::new(FailingSave),
                DispatchUid::issue("test.failing_save"),
            )
            .unwrap()
    }
}

/// A pending review entry for an article.
pub fn review_entry(pk: &str, old: &str, new: &str) -> LogEntry {
    let article = Record::new(article_kind(), pk);
    LogEntry::new(&article, LogAction::Update).with_change("title", json!(old), json!(new))
}

pub fn reviewer() -> User {
    User::new("reviewer").with_permission("review_article")
}

#[derive(Debug)]
struct SaveCounter(Arc<AtomicUsize>);

#[async_trait]
impl Receiver for SaveCounter {
    async fn receive(&self, _event: &mut SignalEvent<'_>) -> AppResult<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "test.save_counter"
    }
}

#[derive(Debug)]
struct FailingSave;

#[async_trait]
impl Receiver for FailingSave {
    async fn receive(&self, _event: &mut SignalEvent<'_>) -> AppResult<()> {
        Err(AppError::storage("disk full"))
    }

    fn name(&self) -> &str {
        "test.failing_save"
    }
}
