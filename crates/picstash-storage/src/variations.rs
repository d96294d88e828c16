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

//! Storage adapter for image variations, keyed by `(user, image id, width)`
//!
//! A variation is a resized derivative of a stored image at a given pixel
//! width. Variations are independent blobs; no derivative chain is tracked.
//! All widths of one image share a key prefix, which the bulk delete path
//! lists to find its targets.

use crate::adapter::StorageAdapter;
use crate::error::StorageResult;
use crate::key::ResourceKind;
use crate::ObjectStore;

/// Stores one blob per `(user, image id, width)` in the injected
/// [`ObjectStore`]
///
/// # Examples
///
/// ```no_run
/// use picstash_storage::{mock::MockStore, ImageVariationStorage};
///
/// # #[tokio::main]
/// # async fn main() -> picstash_storage::StorageResult<()> {
/// let storage = ImageVariationStorage::new(MockStore::new());
/// storage.store_image_variation("42", "abcdef", b"resized", 100).await?;
///
/// // No width: remove every variation of the image.
/// storage.delete_image_variations("42", "abcdef", None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ImageVariationStorage<S> {
    adapter: StorageAdapter<S>,
}

impl<S: ObjectStore> ImageVariationStorage<S> {
    /// Create a variation adapter on top of the given object store
    pub fn new(store: S) -> Self {
        ImageVariationStorage {
            adapter: StorageAdapter::new(store, ResourceKind::ImageVariation),
        }
    }

    /// Write the variation blob for the given width, overwriting silently
    pub async fn store_image_variation(
        &self,
        user: &str,
        image_id: &str,
        data: &[u8],
        width: u32,
    ) -> StorageResult<()> {
        self.adapter
            .put(
                user,
                image_id,
                Some(width),
                data,
                "unable to store image variation",
            )
            .await
    }

    /// Read the variation blob at the given width
    ///
    /// Returns [`StorageError::NotFound`](crate::StorageError::NotFound) when
    /// the backend reports the object as absent.
    pub async fn get_image_variation(
        &self,
        user: &str,
        image_id: &str,
        width: u32,
    ) -> StorageResult<Vec<u8>> {
        self.adapter
            .get(
                user,
                image_id,
                Some(width),
                "unable to get image variation",
            )
            .await
    }

    /// Delete variations of an image
    ///
    /// With a width, deletes exactly that variation's object. With `None`,
    /// lists every object under the image-level prefix and removes them in
    /// one batch call; an empty listing succeeds without issuing a delete.
    pub async fn delete_image_variations(
        &self,
        user: &str,
        image_id: &str,
        width: Option<u32>,
    ) -> StorageResult<()> {
        match width {
            Some(width) => {
                self.adapter
                    .delete_one(
                        user,
                        image_id,
                        Some(width),
                        "unable to delete image variations",
                    )
                    .await
            }
            None => {
                self.adapter
                    .delete_prefix(user, image_id, "unable to delete image variations")
                    .await
            }
        }
    }
}
