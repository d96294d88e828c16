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

//! Integration tests against LocalStack
//!
//! These run the adapters against a real S3-compatible service and are
//! `#[ignore]`d by default. Start LocalStack first:
//!
//! ```bash
//! docker run --rm -p 4566:4566 localstack/localstack
//! awslocal s3 mb s3://picstash-test
//! ```
//!
//! then run `cargo test -- --ignored`.

use picstash_storage::s3::{S3Config, S3Store};
use picstash_storage::{ImageStorage, ImageVariationStorage};

async fn localstack_store() -> S3Store {
    S3Store::with_config(S3Config {
        bucket: "picstash-test".to_string(),
        region: Some("us-east-1".to_string()),
        endpoint: Some("http://127.0.0.1:4566".to_string()),
        access_key: Some("test".to_string()),
        secret_key: Some("test".to_string()),
        force_path_style: true,
    })
    .await
    .expect("failed to build S3 store for LocalStack")
}

#[tokio::test]
#[ignore] // Requires LocalStack to be running
async fn image_round_trip_and_delete() {
    let storage = ImageStorage::new(localstack_store().await);

    storage
        .store("42", "localstack-image", b"image bytes")
        .await
        .expect("store failed");
    assert_eq!(
        storage.get_image("42", "localstack-image").await.expect("get failed"),
        b"image bytes"
    );
    assert!(storage.image_exists("42", "localstack-image").await);

    let modified = storage
        .get_last_modified("42", "localstack-image")
        .await
        .expect("last-modified failed");
    assert!(modified.timestamp() > 0);

    storage
        .delete("42", "localstack-image")
        .await
        .expect("delete failed");
    assert!(storage
        .get_image("42", "localstack-image")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
#[ignore] // Requires LocalStack to be running
async fn bucket_probe_succeeds() {
    let storage = ImageStorage::new(localstack_store().await);
    assert!(storage.get_status().await);
}

#[tokio::test]
#[ignore] // Requires LocalStack to be running
async fn variation_bulk_delete_clears_all_widths() {
    let storage = ImageVariationStorage::new(localstack_store().await);

    for width in [100u32, 200, 400] {
        storage
            .store_image_variation("42", "localstack-var", b"resized", width)
            .await
            .expect("store variation failed");
    }

    storage
        .delete_image_variations("42", "localstack-var", None)
        .await
        .expect("bulk delete failed");

    for width in [100u32, 200, 400] {
        assert!(storage
            .get_image_variation("42", "localstack-var", width)
            .await
            .unwrap_err()
            .is_not_found());
    }
}
