// PicStash - Self-Hosted Image Server
// Copyright (C) 2026 PicStash Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! In-memory mock object store for testing
//!
//! Thread-safe [`ObjectStore`] implementation over `Arc<RwLock<HashMap>>`,
//! with knobs the adapter tests need: request-failure injection with a
//! chosen status code, a configurable bucket probe status, per-key
//! last-modified overrides, and a counter of batch-delete calls.
//!
//! # Examples
//!
//! ```rust,no_run
//! use picstash_storage::{mock::MockStore, ObjectStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), picstash_storage::ObjectStoreError> {
//!     let store = MockStore::new();
//!
//!     store.put_object("a/b/c", b"data").await?;
//!     assert_eq!(store.get_object("a/b/c").await?, b"data");
//!
//!     // Every subsequent request fails with status 500.
//!     store.fail_requests(Some(500)).await;
//!     assert!(store.get_object("a/b/c").await.is_err());
//!
//!     Ok(())
//! }
//! ```

use crate::error::ObjectStoreError;
use crate::{ObjectMetadata, ObjectStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
struct StoredObject {
    data: Vec<u8>,
    last_modified: Option<DateTime<Utc>>,
}

struct State {
    objects: HashMap<String, StoredObject>,
    failure: Option<Option<u16>>,
    batch_failure: Option<Option<u16>>,
    bucket_status: u16,
    batch_delete_calls: usize,
}

impl Default for State {
    fn default() -> Self {
        State {
            objects: HashMap::new(),
            failure: None,
            batch_failure: None,
            bucket_status: 200,
            batch_delete_calls: 0,
        }
    }
}

/// In-memory [`ObjectStore`] for unit and integration tests
///
/// Clones share state, so a test can hold one handle and hand another to the
/// adapter under test.
#[derive(Clone, Default)]
pub struct MockStore {
    state: Arc<RwLock<State>>,
}

impl MockStore {
    /// Create a new empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently stored
    pub async fn len(&self) -> usize {
        self.state.read().await.objects.len()
    }

    /// Whether no objects are stored
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.objects.is_empty()
    }

    /// All stored keys, sorted
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.state.read().await.objects.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Remove every stored object
    pub async fn clear(&self) {
        self.state.write().await.objects.clear();
    }

    /// Make every subsequent request fail with the given status code
    /// (`None` for a status-less transport error)
    pub async fn fail_requests(&self, status: Option<u16>) {
        self.state.write().await.failure = Some(status);
    }

    /// Make only subsequent batch deletes fail with the given status code
    pub async fn fail_batch_deletes(&self, status: Option<u16>) {
        self.state.write().await.batch_failure = Some(status);
    }

    /// Stop injecting failures
    pub async fn restore(&self) {
        let mut state = self.state.write().await;
        state.failure = None;
        state.batch_failure = None;
    }

    /// Set the status the bucket probe reports
    pub async fn set_bucket_status(&self, status: u16) {
        self.state.write().await.bucket_status = status;
    }

    /// Override the last-modified timestamp of a stored object; `None`
    /// simulates a backend response with no usable timestamp
    pub async fn set_last_modified(&self, key: &str, last_modified: Option<DateTime<Utc>>) {
        if let Some(object) = self.state.write().await.objects.get_mut(key) {
            object.last_modified = last_modified;
        }
    }

    /// How many batch-delete calls have been issued
    pub async fn batch_delete_calls(&self) -> usize {
        self.state.read().await.batch_delete_calls
    }

    fn injected(status: Option<u16>) -> ObjectStoreError {
        ObjectStoreError::request(status, "injected failure")
    }

    async fn check_failure(&self) -> Result<(), ObjectStoreError> {
        match self.state.read().await.failure {
            Some(status) => Err(Self::injected(status)),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for MockStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockStore").finish()
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn put_object(&self, key: &str, body: &[u8]) -> Result<(), ObjectStoreError> {
        self.check_failure().await?;
        self.state.write().await.objects.insert(
            key.to_string(),
            StoredObject {
                data: body.to_vec(),
                last_modified: Some(Utc::now()),
            },
        );
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        self.check_failure().await?;
        self.state
            .read()
            .await
            .objects
            .get(key)
            .map(|object| object.data.clone())
            .ok_or_else(|| ObjectStoreError::not_found(key))
    }

    async fn head_object(&self, key: &str) -> Result<ObjectMetadata, ObjectStoreError> {
        self.check_failure().await?;
        self.state
            .read()
            .await
            .objects
            .get(key)
            .map(|object| ObjectMetadata {
                last_modified: object.last_modified,
            })
            .ok_or_else(|| ObjectStoreError::not_found(key))
    }

    async fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError> {
        self.check_failure().await?;
        // Idempotent, as in S3: deleting an absent key succeeds.
        self.state.write().await.objects.remove(key);
        Ok(())
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<(), ObjectStoreError> {
        self.check_failure().await?;
        let mut state = self.state.write().await;
        state.batch_delete_calls += 1;
        if let Some(status) = state.batch_failure {
            return Err(Self::injected(status));
        }
        for key in keys {
            state.objects.remove(key);
        }
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, ObjectStoreError> {
        self.check_failure().await?;
        let mut keys: Vec<String> = self
            .state
            .read()
            .await
            .objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn head_bucket(&self) -> Result<u16, ObjectStoreError> {
        self.check_failure().await?;
        Ok(self.state.read().await.bucket_status)
    }
}
