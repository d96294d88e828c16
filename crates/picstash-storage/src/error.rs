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

//! Storage error types and utilities
//!
//! Two layers of errors live here:
//!
//! - [`ObjectStoreError`]: raised by [`ObjectStore`](crate::ObjectStore)
//!   implementations. Carries the backend's HTTP-like status code when one is
//!   known, so callers can tell a provider 404 apart from other failures.
//! - [`StorageError`]: the adapter-level taxonomy surfaced to the
//!   application. Collapses every provider-specific failure into `NotFound`,
//!   `Backend` or `InvalidIdentifier`.

use thiserror::Error;

/// Result type alias for adapter-level storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by [`ObjectStore`](crate::ObjectStore) implementations
#[derive(Error, Debug)]
pub enum ObjectStoreError {
    /// The object addressed by the key does not exist
    #[error("object not found: {0}")]
    NotFound(String),

    /// The backend rejected or failed the request
    #[error("object store request failed: {message}")]
    Request {
        /// HTTP-like status reported by the backend, when known
        status: Option<u16>,
        /// Description of the failed request
        message: String,
    },

    /// Any other failure (client construction, response decoding, ...)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ObjectStoreError {
    /// Create a NotFound error for the given key
    pub fn not_found<S: Into<String>>(key: S) -> Self {
        ObjectStoreError::NotFound(key.into())
    }

    /// Create a Request error with an optional status code
    pub fn request<S: Into<String>>(status: Option<u16>, message: S) -> Self {
        ObjectStoreError::Request {
            status,
            message: message.into(),
        }
    }

    /// Create a generic error from any error type that can convert to anyhow::Error
    pub fn other<E: Into<anyhow::Error>>(error: E) -> Self {
        ObjectStoreError::Other(error.into())
    }

    /// The HTTP-like status code reported by the backend, when known
    pub fn status(&self) -> Option<u16> {
        match self {
            ObjectStoreError::NotFound(_) => Some(404),
            ObjectStoreError::Request { status, .. } => *status,
            ObjectStoreError::Other(_) => None,
        }
    }

    /// Check if the backend reported the object as absent
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Errors surfaced to the application by the storage adapters
#[derive(Error, Debug)]
pub enum StorageError {
    /// The addressed image or variation does not exist
    #[error("file not found")]
    NotFound,

    /// The backend failed for any reason other than a clean "not found"
    #[error("{message}")]
    Backend {
        /// Operation-specific description, e.g. "unable to store image"
        message: String,
        /// The original backend error, kept for diagnostics
        #[source]
        source: Option<ObjectStoreError>,
    },

    /// An identifying field does not satisfy the key derivation rules
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

impl StorageError {
    /// Create a Backend error with an optional source
    pub fn backend<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: Into<Option<ObjectStoreError>>,
    {
        StorageError::Backend {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Create an InvalidIdentifier error with context
    pub fn invalid_identifier<S: Into<String>>(msg: S) -> Self {
        StorageError::InvalidIdentifier(msg.into())
    }

    /// The HTTP-like status code callers map this error to
    pub fn status_code(&self) -> u16 {
        match self {
            StorageError::NotFound => 404,
            StorageError::Backend { .. } => 500,
            StorageError::InvalidIdentifier(_) => 400,
        }
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound)
    }
}
