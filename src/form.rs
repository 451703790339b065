//! Listing-draft session store with write-through persistence

use crate::draft::{
    BasicInfoPatch, MediaPatch, PricingPatch, PropertyDetailPatch, PropertyDraft, SectionPatch,
    TimingPatch,
};
use crate::observer::SessionObserver;
use crate::storage::{keys, KeyValueStore};
use std::sync::Arc;

/// Multi-step draft store.
///
/// Every mutation path ends in a persistence attempt. Persistence failures
/// are recorded and reported, never returned: the in-memory draft stays
/// authoritative even when durable storage is unavailable.
pub struct FormSession {
    storage: Arc<dyn KeyValueStore>,
    observer: Arc<dyn SessionObserver>,
    draft: std::sync::RwLock<PropertyDraft>,
    last_persist_error: std::sync::RwLock<Option<String>>,
}

impl FormSession {
    pub fn new(storage: Arc<dyn KeyValueStore>, observer: Arc<dyn SessionObserver>) -> Self {
        Self {
            storage,
            observer,
            draft: std::sync::RwLock::new(PropertyDraft::default()),
            last_persist_error: std::sync::RwLock::new(None),
        }
    }

    /// Snapshot of the current draft
    pub fn draft(&self) -> PropertyDraft {
        self.draft.read().map(|d| d.clone()).unwrap_or_default()
    }

    /// Read the live draft without cloning it
    pub fn read_with<R>(&self, f: impl FnOnce(&PropertyDraft) -> R) -> R {
        match self.draft.read() {
            Ok(draft) => f(&draft),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    /// Shallow-merge a section patch into the draft, then persist
    pub async fn apply(&self, patch: SectionPatch) {
        if let Ok(mut draft) = self.draft.write() {
            patch.apply(&mut draft);
        }
        self.persist().await;
    }

    // === Section-scoped updaters ===

    pub async fn update_basic_info(&self, patch: BasicInfoPatch) {
        self.apply(SectionPatch::BasicInfo(patch)).await;
    }

    pub async fn update_property_detail(&self, patch: PropertyDetailPatch) {
        self.apply(SectionPatch::PropertyDetail(patch)).await;
    }

    pub async fn update_timing(&self, patch: TimingPatch) {
        self.apply(SectionPatch::Timing(patch)).await;
    }

    pub async fn update_pricing(&self, patch: PricingPatch) {
        self.apply(SectionPatch::Pricing(patch)).await;
    }

    pub async fn update_media(&self, patch: MediaPatch) {
        self.apply(SectionPatch::Media(patch)).await;
    }

    /// Serialize the draft to storage under its fixed key
    pub async fn persist(&self) {
        let snapshot = self.draft();
        let raw = match serde_json::to_string(&snapshot) {
            Ok(raw) => raw,
            Err(e) => {
                self.record_persist_error(&e.to_string());
                return;
            }
        };
        match self.storage.set(keys::PROPERTY_DRAFT, &raw).await {
            Ok(()) => {
                self.set_last_error(None);
                self.observer.on_draft_persisted();
            }
            Err(e) => self.record_persist_error(&e.message()),
        }
    }

    /// Load a previously persisted draft; a missing or corrupt entry is
    /// ignored and the defaults stay in place.
    pub async fn restore(&self) {
        let raw = match self.storage.get(keys::PROPERTY_DRAFT).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                self.record_persist_error(&e.message());
                return;
            }
        };
        match serde_json::from_str::<PropertyDraft>(&raw) {
            Ok(saved) => {
                if let Ok(mut draft) = self.draft.write() {
                    *draft = saved;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring corrupt persisted draft");
            }
        }
    }

    /// Back to defaults, and purge the persisted entry
    pub async fn reset(&self) {
        if let Ok(mut draft) = self.draft.write() {
            *draft = PropertyDraft::default();
        }
        if let Err(e) = self.storage.remove(keys::PROPERTY_DRAFT).await {
            self.record_persist_error(&e.message());
        }
        self.observer.on_draft_reset();
    }

    /// Most recent persistence failure, if the last attempt failed
    pub fn last_persistence_error(&self) -> Option<String> {
        self.last_persist_error
            .read()
            .ok()
            .and_then(|e| e.clone())
    }

    fn record_persist_error(&self, message: &str) {
        tracing::warn!(key = %keys::PROPERTY_DRAFT, error = %message, "Draft persistence failed");
        self.observer.on_persistence_error(keys::PROPERTY_DRAFT, message);
        self.set_last_error(Some(message.to_string()));
    }

    fn set_last_error(&self, value: Option<String>) {
        if let Ok(mut slot) = self.last_persist_error.write() {
            *slot = value;
        }
    }
}
