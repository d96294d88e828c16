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

//! Generic adapter core shared by the image and variation façades
//!
//! Each operation derives the object key, issues one call (two for the bulk
//! delete) into the injected [`ObjectStore`], and rewrites the error: a
//! backend 404 becomes [`StorageError::NotFound`], everything else becomes
//! [`StorageError::Backend`] with an operation-specific message and the
//! original error attached. No retry, caching or buffering happens here.

use crate::error::{ObjectStoreError, StorageResult};
use crate::key::{object_key, ResourceKind};
use crate::{ObjectMetadata, ObjectStore, StorageError};
use tracing::debug;

/// The shared single-object and bulk-delete operations, parameterized by
/// which entity the owning façade addresses.
#[derive(Clone, Debug)]
pub(crate) struct StorageAdapter<S> {
    store: S,
    kind: ResourceKind,
}

impl<S: ObjectStore> StorageAdapter<S> {
    pub(crate) fn new(store: S, kind: ResourceKind) -> Self {
        StorageAdapter { store, kind }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    fn key(&self, user: &str, image_id: &str, width: Option<u32>) -> StorageResult<String> {
        object_key(self.kind, user, image_id, width)
    }

    fn backend(message: &str, source: ObjectStoreError) -> StorageError {
        StorageError::backend(message, source)
    }

    pub(crate) async fn put(
        &self,
        user: &str,
        image_id: &str,
        width: Option<u32>,
        data: &[u8],
        failure: &str,
    ) -> StorageResult<()> {
        let key = self.key(user, image_id, width)?;
        debug!(%key, bytes = data.len(), "storing object");
        self.store
            .put_object(&key, data)
            .await
            .map_err(|e| Self::backend(failure, e))
    }

    pub(crate) async fn get(
        &self,
        user: &str,
        image_id: &str,
        width: Option<u32>,
        failure: &str,
    ) -> StorageResult<Vec<u8>> {
        let key = self.key(user, image_id, width)?;
        debug!(%key, "fetching object");
        match self.store.get_object(&key).await {
            Ok(body) => Ok(body),
            Err(e) if e.is_not_found() => Err(StorageError::NotFound),
            Err(e) => Err(Self::backend(failure, e)),
        }
    }

    pub(crate) async fn head(
        &self,
        user: &str,
        image_id: &str,
        failure: &str,
    ) -> StorageResult<ObjectMetadata> {
        let key = self.key(user, image_id, None)?;
        debug!(%key, "fetching object metadata");
        match self.store.head_object(&key).await {
            Ok(metadata) => Ok(metadata),
            Err(e) if e.is_not_found() => Err(StorageError::NotFound),
            Err(e) => Err(Self::backend(failure, e)),
        }
    }

    pub(crate) async fn delete_one(
        &self,
        user: &str,
        image_id: &str,
        width: Option<u32>,
        failure: &str,
    ) -> StorageResult<()> {
        let key = self.key(user, image_id, width)?;
        debug!(%key, "deleting object");
        match self.store.delete_object(&key).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Err(StorageError::NotFound),
            Err(e) => Err(Self::backend(failure, e)),
        }
    }

    /// List every key under the image-level prefix and batch-delete them.
    ///
    /// An empty listing is a success with no delete issued. A batch failure
    /// fails the whole operation; per-key results are not inspected.
    pub(crate) async fn delete_prefix(
        &self,
        user: &str,
        image_id: &str,
        failure: &str,
    ) -> StorageResult<()> {
        let prefix = self.key(user, image_id, None)?;
        let keys = self
            .store
            .list_objects(&prefix)
            .await
            .map_err(|e| Self::backend(failure, e))?;

        if keys.is_empty() {
            debug!(%prefix, "no objects under prefix, nothing to delete");
            return Ok(());
        }

        debug!(%prefix, count = keys.len(), "bulk deleting objects");
        self.store
            .delete_objects(&keys)
            .await
            .map_err(|e| Self::backend(failure, e))
    }
}
