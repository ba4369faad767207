//! In-memory object store
//!
//! Backs unit and integration tests, and local runs that have no object
//! store available. Semantics mirror the S3 client: `put` overwrites,
//! `list` matches on key prefix.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::{calculate_sha256, ObjectStore, PutResult};

/// One stored object with its body and metadata
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
    pub metadata: HashMap<String, String>,
}

/// Map-backed [`ObjectStore`] implementation
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored keys, in lexicographic order
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Fetch one stored object with its metadata
    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().ok().and_then(|m| m.get(key).cloned())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: HashMap<String, String>,
    ) -> Result<PutResult> {
        let checksum = calculate_sha256(&body);
        let size = body.len() as i64;

        let mut objects = self.objects.lock().map_err(|_| anyhow!("store poisoned"))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
                metadata,
            },
        );

        Ok(PutResult {
            key: key.to_string(),
            checksum,
            size,
        })
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let objects = self.objects.lock().map_err(|_| anyhow!("store poisoned"))?;
        objects
            .get(key)
            .map(|o| o.body.clone())
            .ok_or_else(|| anyhow!("object not found: {}", key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let objects = self.objects.lock().map_err(|_| anyhow!("store poisoned"))?;
        Ok(objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
