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

//! S3 storage adapters for PicStash
//!
//! This crate persists and retrieves binary image data, and derived image
//! variations (pre-resized copies), in an S3-compatible object store. Two
//! thin façades share one generic core:
//!
//! - [`ImageStorage`]: one blob per `(user, image id)`, with existence,
//!   last-modified and health probes.
//! - [`ImageVariationStorage`]: one blob per `(user, image id, width)`, with
//!   bulk delete of every width for an image.
//!
//! Both are parameterized by an [`ObjectStore`], the capability contract of
//! the underlying object-store client. [`S3Store`] implements it over the
//! AWS SDK (and S3-compatible services such as MinIO or LocalStack via a
//! custom endpoint); [`mock::MockStore`] is an in-memory implementation for
//! tests.
//!
//! # Examples
//!
//! ```no_run
//! use picstash_storage::{mock::MockStore, ImageStorage};
//!
//! #[tokio::main]
//! async fn main() -> picstash_storage::StorageResult<()> {
//!     let storage = ImageStorage::new(MockStore::new());
//!
//!     storage.store("42", "abcdef", b"image data").await?;
//!     let data = storage.get_image("42", "abcdef").await?;
//!     assert_eq!(data, b"image data");
//!
//!     assert!(storage.image_exists("42", "abcdef").await);
//!
//!     storage.delete("42", "abcdef").await?;
//!     assert!(storage.get_image("42", "abcdef").await.unwrap_err().is_not_found());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error handling
//!
//! Adapter operations return [`StorageResult`], collapsing provider-specific
//! failures into [`StorageError::NotFound`] (the addressed object is absent)
//! and [`StorageError::Backend`] (anything else, original error attached).
//! The two boolean probes, [`ImageStorage::image_exists`] and
//! [`ImageStorage::get_status`], never error: any backend failure folds into
//! `false`. That deliberately conflates "confirmed absent" with "could not
//! check"; callers that need the distinction must use the erroring
//! operations instead.
//!
//! # Concurrency
//!
//! The adapters hold no mutable state of their own and add no ordering
//! guarantees: concurrent `store` calls race with last-writer-wins, and a
//! `get` concurrent with a `store` or `delete` may observe either state.
//! Whatever consistency the backend provides is what callers get.

pub mod error;
mod key;

mod adapter;
mod images;
mod variations;

pub mod mock;
pub mod s3;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

pub use error::{ObjectStoreError, StorageError, StorageResult};
pub use images::ImageStorage;
pub use key::ResourceKind;
pub use s3::{S3Config, S3Store};
pub use variations::ImageVariationStorage;

/// Metadata returned by a lightweight, body-less object fetch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// When the object was last written, as reported by the backend
    pub last_modified: Option<DateTime<Utc>>,
}

/// Capability contract of the object-store client the adapters are built on
///
/// Implementations must be `Send + Sync + Debug` and safe to share across
/// concurrent callers; the bucket they address is fixed at construction.
/// Every operation is a single logical request. Errors expose an HTTP-like
/// status code via [`ObjectStoreError::status`] so the adapters can tell
/// "not found" (404) apart from other failures. Retry, timeout and
/// pagination policy all live behind this seam, not above it.
#[async_trait]
pub trait ObjectStore: Send + Sync + Debug {
    /// Write an object, silently overwriting any existing one at the key
    async fn put_object(&self, key: &str, body: &[u8]) -> Result<(), ObjectStoreError>;

    /// Read an object's full body; absent objects yield a 404-status error
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError>;

    /// Fetch an object's metadata without its body; absent objects yield a
    /// 404-status error
    async fn head_object(&self, key: &str) -> Result<ObjectMetadata, ObjectStoreError>;

    /// Delete one object; deleting an absent key succeeds (S3 semantics)
    async fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError>;

    /// Delete a batch of objects in one call; per-key results are not
    /// reported back
    async fn delete_objects(&self, keys: &[String]) -> Result<(), ObjectStoreError>;

    /// List all keys starting with the prefix, sorted; implementations page
    /// exhaustively so the caller sees one complete listing
    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, ObjectStoreError>;

    /// Probe the bucket and report the HTTP status of the probe
    async fn head_bucket(&self) -> Result<u16, ObjectStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_store_is_object_safe() {
        fn _check(_: &dyn ObjectStore) {}
    }
}
