use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::edinet::records::{OfficerRecord, ShareholderRecord};

/// Store for extracted record lists, keyed by document id. A filing's
/// records are stored whole or not at all; the extractors never hand over
/// a partially built list.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists the officer list extracted from `doc_id`.
    async fn store_officers(&self, doc_id: &str, officers: &[OfficerRecord]) -> Result<()>;

    /// Persists the shareholder list extracted from `doc_id`.
    async fn store_shareholders(
        &self,
        doc_id: &str,
        shareholders: &[ShareholderRecord],
    ) -> Result<()>;

    /// Whether `doc_id` already has records. Processed filings are
    /// skipped on later runs, not reprocessed.
    async fn contains(&self, doc_id: &str) -> Result<bool>;
}

/// Ephemeral in-memory store; the testing and dry-run backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    officers: RwLock<HashMap<String, Vec<OfficerRecord>>>,
    shareholders: RwLock<HashMap<String, Vec<ShareholderRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored officers for `doc_id`, empty when none were stored.
    pub fn officers(&self, doc_id: &str) -> Vec<OfficerRecord> {
        self.officers
            .read()
            .unwrap()
            .get(doc_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Stored shareholders for `doc_id`, empty when none were stored.
    pub fn shareholders(&self, doc_id: &str) -> Vec<ShareholderRecord> {
        self.shareholders
            .read()
            .unwrap()
            .get(doc_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn store_officers(&self, doc_id: &str, officers: &[OfficerRecord]) -> Result<()> {
        self.officers
            .write()
            .unwrap()
            .insert(doc_id.to_string(), officers.to_vec());
        log::debug!("Stored {} officer record(s) for {}", officers.len(), doc_id);
        Ok(())
    }

    async fn store_shareholders(
        &self,
        doc_id: &str,
        shareholders: &[ShareholderRecord],
    ) -> Result<()> {
        self.shareholders
            .write()
            .unwrap()
            .insert(doc_id.to_string(), shareholders.to_vec());
        log::debug!(
            "Stored {} shareholder record(s) for {}",
            shareholders.len(),
            doc_id
        );
        Ok(())
    }

    async fn contains(&self, doc_id: &str) -> Result<bool> {
        let seen = self.officers.read().unwrap().contains_key(doc_id)
            || self.shareholders.read().unwrap().contains_key(doc_id);
        Ok(seen)
    }
}
