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

//! Object key derivation
//!
//! Maps `(user, image id [, width])` to a hierarchical object key. The first
//! three characters of the (zero-padded) user and of the image identifier are
//! split into individual path segments, spreading objects across
//! directory-like partitions in backends that shard by key prefix, while
//! keeping the keys readable:
//!
//! ```text
//! 0/4/2/42/a/b/c/abcdef                       image, user "42", id "abcdef"
//! imageVariation/0/4/2/42/a/b/c/abcdef/100    variation at width 100
//! ```
//!
//! Derivation is pure and deterministic: the same tuple always yields the
//! same key, and the variation key without a width is a strict prefix of
//! every width-qualified key for the same image. The bulk delete path relies
//! on both properties.

use crate::error::{StorageError, StorageResult};

/// Root segment prepended to every image variation key
const VARIATION_ROOT: &str = "imageVariation";

/// Characters each identifier contributes to its sharding prefix; users
/// shorter than this are left-padded with '0'
const SHARD_PREFIX_LEN: usize = 3;

/// The two entities the adapters address, selecting the key layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    /// One blob per `(user, image id)`
    Image,
    /// One blob per `(user, image id, width)`
    ImageVariation,
}

/// Derive the object key for the given identifying tuple.
///
/// A `width` is only meaningful for [`ResourceKind::ImageVariation`]; omitting
/// it there yields the image-level prefix shared by all widths. Identifiers
/// shorter than the sharding prefix requires are rejected rather than padded:
/// `user` must be non-empty, `image_id` at least three characters.
pub(crate) fn object_key(
    kind: ResourceKind,
    user: &str,
    image_id: &str,
    width: Option<u32>,
) -> StorageResult<String> {
    if user.is_empty() {
        return Err(StorageError::invalid_identifier("user must not be empty"));
    }

    let id_shard: Vec<char> = image_id.chars().take(SHARD_PREFIX_LEN).collect();
    if id_shard.len() < SHARD_PREFIX_LEN {
        return Err(StorageError::invalid_identifier(format!(
            "image identifier '{image_id}' must be at least {SHARD_PREFIX_LEN} characters"
        )));
    }

    let padded_user = format!("{user:0>SHARD_PREFIX_LEN$}");

    let mut segments: Vec<String> = Vec::with_capacity(10);
    if kind == ResourceKind::ImageVariation {
        segments.push(VARIATION_ROOT.to_string());
    }
    for c in padded_user.chars().take(SHARD_PREFIX_LEN) {
        segments.push(c.to_string());
    }
    segments.push(user.to_string());
    for c in id_shard {
        segments.push(c.to_string());
    }
    segments.push(image_id.to_string());
    if let Some(width) = width {
        segments.push(width.to_string());
    }

    Ok(segments.join("/"))
}
