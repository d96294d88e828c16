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

//! Storage adapter for original images, keyed by `(user, image id)`

use crate::adapter::StorageAdapter;
use crate::error::{StorageError, StorageResult};
use crate::key::ResourceKind;
use crate::ObjectStore;
use chrono::{DateTime, Utc};

/// Stores one blob per `(user, image id)` in the injected [`ObjectStore`]
///
/// # Examples
///
/// ```no_run
/// use picstash_storage::{mock::MockStore, ImageStorage};
///
/// # #[tokio::main]
/// # async fn main() -> picstash_storage::StorageResult<()> {
/// let storage = ImageStorage::new(MockStore::new());
/// storage.store("42", "abcdef", b"raw bytes").await?;
/// let modified = storage.get_last_modified("42", "abcdef").await?;
/// println!("last written at {modified}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ImageStorage<S> {
    adapter: StorageAdapter<S>,
}

impl<S: ObjectStore> ImageStorage<S> {
    /// Create an image adapter on top of the given object store
    pub fn new(store: S) -> Self {
        ImageStorage {
            adapter: StorageAdapter::new(store, ResourceKind::Image),
        }
    }

    /// Write the image blob, silently overwriting any previous version
    pub async fn store(&self, user: &str, image_id: &str, data: &[u8]) -> StorageResult<()> {
        self.adapter
            .put(user, image_id, None, data, "unable to store image")
            .await
    }

    /// Read the image blob
    ///
    /// Returns [`StorageError::NotFound`] when the backend reports the object
    /// as absent.
    pub async fn get_image(&self, user: &str, image_id: &str) -> StorageResult<Vec<u8>> {
        self.adapter
            .get(user, image_id, None, "unable to get image")
            .await
    }

    /// The last-modified timestamp the backend reports for the image
    ///
    /// Fails with [`StorageError::Backend`] if the metadata lacks a
    /// well-formed timestamp.
    pub async fn get_last_modified(
        &self,
        user: &str,
        image_id: &str,
    ) -> StorageResult<DateTime<Utc>> {
        let metadata = self
            .adapter
            .head(user, image_id, "unable to get image metadata")
            .await?;

        metadata
            .last_modified
            .ok_or_else(|| StorageError::backend("unable to get image metadata", None))
    }

    /// Whether the image exists
    ///
    /// Never errors: any backend failure, transient or not, folds into
    /// `false`. "Confirmed absent" and "could not check" are
    /// indistinguishable here.
    pub async fn image_exists(&self, user: &str, image_id: &str) -> bool {
        self.adapter
            .head(user, image_id, "unable to get image metadata")
            .await
            .is_ok()
    }

    /// Whether the backing bucket exists and responds cleanly
    ///
    /// `true` only for a 200 probe response; never errors.
    pub async fn get_status(&self) -> bool {
        matches!(self.adapter.store().head_bucket().await, Ok(200))
    }

    /// Delete the image
    ///
    /// Returns [`StorageError::NotFound`] when the image does not exist,
    /// established by an existence pre-check before the delete is attempted.
    pub async fn delete(&self, user: &str, image_id: &str) -> StorageResult<()> {
        if !self.image_exists(user, image_id).await {
            return Err(StorageError::NotFound);
        }

        self.adapter
            .delete_one(user, image_id, None, "unable to delete image")
            .await
    }
}
