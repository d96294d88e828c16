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

//! AWS S3 object store implementation
//!
//! Implements [`ObjectStore`] over `aws-sdk-s3`. Works against AWS itself
//! (ambient credential chain and region detection) and against S3-compatible
//! services such as MinIO or LocalStack via a custom endpoint, static
//! credentials and path-style addressing.
//!
//! Construction does not touch the network; [`ObjectStore::head_bucket`] is
//! the liveness probe. Retry and timeout policy is the SDK's own; nothing is
//! retried here.
//!
//! # Examples
//!
//! ```rust,no_run
//! use picstash_storage::s3::{S3Config, S3Store};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), picstash_storage::ObjectStoreError> {
//! // Against AWS, using the ambient credential chain:
//! let store = S3Store::new("my-bucket").await?;
//!
//! // Against MinIO:
//! let store = S3Store::with_config(S3Config {
//!     bucket: "images".to_string(),
//!     endpoint: Some("http://localhost:9000".to_string()),
//!     access_key: Some("minioadmin".to_string()),
//!     secret_key: Some("minioadmin".to_string()),
//!     force_path_style: true,
//!     ..Default::default()
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use crate::error::ObjectStoreError;
use crate::{ObjectMetadata, ObjectStore};
use anyhow::anyhow;
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Configuration for the S3 object store
#[derive(Clone, Debug, Default)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,

    /// AWS region; when absent, the SDK's region detection applies
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services (MinIO, LocalStack, ...)
    pub endpoint: Option<String>,

    /// Static access key; when absent, the SDK's credential chain applies
    pub access_key: Option<String>,

    /// Static secret key, paired with `access_key`
    pub secret_key: Option<String>,

    /// Use path-style addressing; required by most S3-compatible services
    pub force_path_style: bool,
}

/// [`ObjectStore`] implementation backed by an S3 bucket
///
/// Cheap to clone; the client and configuration are shared. Safe to use from
/// concurrent tasks, it carries no per-call mutable state.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    config: Arc<S3Config>,
}

impl S3Store {
    /// Create a store for the given bucket using the SDK's ambient
    /// credential chain and region detection
    pub async fn new(bucket: impl Into<String>) -> Result<Self, ObjectStoreError> {
        Self::with_config(S3Config {
            bucket: bucket.into(),
            ..Default::default()
        })
        .await
    }

    /// Create a store with explicit configuration
    ///
    /// With an `endpoint` set, the client is built directly instead of going
    /// through `aws_config::defaults().load()`, which would attempt IMDS
    /// region discovery and stall outside AWS.
    pub async fn with_config(config: S3Config) -> Result<Self, ObjectStoreError> {
        validate_bucket_name(&config.bucket)?;

        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => Some(Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                None,
                None,
                "picstash-storage",
            )),
            (None, None) => None,
            _ => {
                return Err(ObjectStoreError::other(anyhow!(
                    "access key and secret key must be provided together"
                )))
            }
        };

        let client = if let Some(endpoint) = &config.endpoint {
            let mut builder = aws_sdk_s3::config::Builder::new()
                .behavior_version(BehaviorVersion::latest())
                .endpoint_url(endpoint)
                .force_path_style(config.force_path_style)
                .region(Region::new(
                    config.region.clone().unwrap_or_else(|| "us-east-1".to_string()),
                ));
            if let Some(credentials) = credentials {
                builder = builder.credentials_provider(credentials);
            }
            Client::from_conf(builder.build())
        } else {
            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if let Some(region) = config.region.clone() {
                loader = loader.region(Region::new(region));
            }
            if let Some(credentials) = credentials {
                loader = loader.credentials_provider(credentials);
            }
            let sdk_config = loader.load().await;
            let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
            if config.force_path_style {
                builder = builder.force_path_style(true);
            }
            Client::from_conf(builder.build())
        };

        debug!(
            bucket = %config.bucket,
            endpoint = config.endpoint.as_deref().unwrap_or("default"),
            "created S3 object store client"
        );

        Ok(S3Store {
            client,
            config: Arc::new(config),
        })
    }
}

impl fmt::Debug for S3Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Store")
            .field("bucket", &self.config.bucket)
            .field("endpoint", &self.config.endpoint)
            .field("force_path_style", &self.config.force_path_style)
            .finish()
    }
}

/// S3 bucket naming rules, the subset every provider agrees on
fn validate_bucket_name(bucket: &str) -> Result<(), ObjectStoreError> {
    if bucket.is_empty() {
        return Err(ObjectStoreError::other(anyhow!(
            "bucket name cannot be empty"
        )));
    }
    if bucket.len() > 63 {
        return Err(ObjectStoreError::other(anyhow!(
            "bucket name must be 63 characters or less"
        )));
    }
    if !bucket
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ObjectStoreError::other(anyhow!(
            "bucket name must contain only lowercase letters, numbers, and hyphens"
        )));
    }
    if bucket.starts_with('-') || bucket.ends_with('-') {
        return Err(ObjectStoreError::other(anyhow!(
            "bucket name cannot start or end with a hyphen"
        )));
    }
    Ok(())
}

/// Rewrite an SDK error, pulling the HTTP status off the raw response so the
/// adapters can distinguish 404 from everything else
fn map_sdk_error<E>(action: &str, subject: &str, err: SdkError<E>) -> ObjectStoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let status = err.raw_response().map(|response| response.status().as_u16());
    if status == Some(404) {
        return ObjectStoreError::not_found(subject);
    }
    ObjectStoreError::request(
        status,
        format!("{action} '{subject}': {}", DisplayErrorContext(&err)),
    )
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, key: &str, body: &[u8]) -> Result<(), ObjectStoreError> {
        debug!(bucket = %self.config.bucket, %key, bytes = body.len(), "put object");

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .body(ByteStream::from(Bytes::copy_from_slice(body)))
            .send()
            .await
            .map_err(|e| map_sdk_error("put object", key, e))?;

        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        debug!(bucket = %self.config.bucket, %key, "get object");

        let response = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error("get object", key, e))?;

        let body = response.body.collect().await.map_err(|e| {
            ObjectStoreError::request(None, format!("read body of object '{key}': {e}"))
        })?;

        Ok(body.into_bytes().to_vec())
    }

    async fn head_object(&self, key: &str) -> Result<ObjectMetadata, ObjectStoreError> {
        debug!(bucket = %self.config.bucket, %key, "head object");

        let response = self
            .client
            .head_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error("head object", key, e))?;

        let last_modified = response
            .last_modified()
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts.secs(), ts.subsec_nanos()));

        Ok(ObjectMetadata { last_modified })
    }

    async fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError> {
        debug!(bucket = %self.config.bucket, %key, "delete object");

        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error("delete object", key, e))?;

        Ok(())
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<(), ObjectStoreError> {
        debug!(bucket = %self.config.bucket, count = keys.len(), "delete objects");

        let objects = keys
            .iter()
            .map(|key| {
                ObjectIdentifier::builder()
                    .key(key)
                    .build()
                    .map_err(ObjectStoreError::other)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(ObjectStoreError::other)?;

        self.client
            .delete_objects()
            .bucket(&self.config.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| map_sdk_error("delete objects", "batch", e))?;

        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>, ObjectStoreError> {
        debug!(bucket = %self.config.bucket, %prefix, "list objects");

        let mut keys = vec![];
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.config.bucket)
                .prefix(prefix);

            if let Some(token) = continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| map_sdk_error("list objects", prefix, e))?;

            for object in response.contents() {
                if let Some(key) = object.key() {
                    keys.push(key.to_string());
                }
            }

            if response.is_truncated() == Some(true) {
                continuation_token = response.next_continuation_token().map(|t| t.to_string());
            } else {
                break;
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn head_bucket(&self) -> Result<u16, ObjectStoreError> {
        debug!(bucket = %self.config.bucket, "head bucket");

        self.client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error("head bucket", &self.config.bucket, e))?;

        Ok(200)
    }
}
