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

//! Integration tests for the variation adapter against the mock object store

use picstash_storage::{mock::MockStore, ImageVariationStorage, StorageError};

fn adapter() -> (ImageVariationStorage<MockStore>, MockStore) {
    let store = MockStore::new();
    (ImageVariationStorage::new(store.clone()), store)
}

#[tokio::test]
async fn store_then_get_round_trips() {
    let (storage, _) = adapter();
    let data = b"resized bytes".to_vec();

    storage
        .store_image_variation("42", "abcdef", &data, 100)
        .await
        .unwrap();
    assert_eq!(
        storage.get_image_variation("42", "abcdef", 100).await.unwrap(),
        data
    );
}

#[tokio::test]
async fn store_writes_the_width_qualified_key() {
    let (storage, store) = adapter();
    storage
        .store_image_variation("42", "abcdef", b"data", 100)
        .await
        .unwrap();
    assert_eq!(store.keys().await, vec!["imageVariation/0/4/2/42/a/b/c/abcdef/100"]);
}

#[tokio::test]
async fn widths_are_independent_blobs() {
    let (storage, _) = adapter();
    storage
        .store_image_variation("42", "abcdef", b"small", 100)
        .await
        .unwrap();
    storage
        .store_image_variation("42", "abcdef", b"large", 200)
        .await
        .unwrap();

    assert_eq!(
        storage.get_image_variation("42", "abcdef", 100).await.unwrap(),
        b"small"
    );
    assert_eq!(
        storage.get_image_variation("42", "abcdef", 200).await.unwrap(),
        b"large"
    );
}

#[tokio::test]
async fn get_missing_variation_is_not_found() {
    let (storage, _) = adapter();
    let err = storage
        .get_image_variation("42", "abcdef", 100)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn get_failure_maps_to_backend_error() {
    let (storage, store) = adapter();
    store.fail_requests(Some(500)).await;

    let err = storage
        .get_image_variation("42", "abcdef", 100)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Backend { .. }));
    assert_eq!(err.to_string(), "unable to get image variation");
}

#[tokio::test]
async fn delete_specific_width_leaves_other_widths() {
    let (storage, store) = adapter();
    storage
        .store_image_variation("42", "abcdef", b"small", 100)
        .await
        .unwrap();
    storage
        .store_image_variation("42", "abcdef", b"large", 200)
        .await
        .unwrap();

    storage
        .delete_image_variations("42", "abcdef", Some(100))
        .await
        .unwrap();

    assert!(storage
        .get_image_variation("42", "abcdef", 100)
        .await
        .unwrap_err()
        .is_not_found());
    assert_eq!(
        storage.get_image_variation("42", "abcdef", 200).await.unwrap(),
        b"large"
    );
    // Single-object path, no batch call.
    assert_eq!(store.batch_delete_calls().await, 0);
}

#[tokio::test]
async fn bulk_delete_removes_only_the_targeted_image() {
    let (storage, store) = adapter();
    storage
        .store_image_variation("user1", "image1", b"a", 100)
        .await
        .unwrap();
    storage
        .store_image_variation("user1", "image1", b"b", 200)
        .await
        .unwrap();
    storage
        .store_image_variation("user2", "image2", b"c", 100)
        .await
        .unwrap();

    storage
        .delete_image_variations("user1", "image1", None)
        .await
        .unwrap();

    assert!(storage
        .get_image_variation("user1", "image1", 100)
        .await
        .unwrap_err()
        .is_not_found());
    assert!(storage
        .get_image_variation("user1", "image1", 200)
        .await
        .unwrap_err()
        .is_not_found());
    assert_eq!(
        storage.get_image_variation("user2", "image2", 100).await.unwrap(),
        b"c"
    );
    assert_eq!(store.batch_delete_calls().await, 1);
}

#[tokio::test]
async fn bulk_delete_with_nothing_stored_is_a_quiet_success() {
    let (storage, store) = adapter();

    storage
        .delete_image_variations("42", "abcdef", None)
        .await
        .unwrap();

    assert_eq!(store.batch_delete_calls().await, 0);
}

#[tokio::test]
async fn bulk_delete_listing_failure_maps_to_backend_error() {
    let (storage, store) = adapter();
    store.fail_requests(Some(500)).await;

    let err = storage
        .delete_image_variations("42", "abcdef", None)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Backend { .. }));
    assert_eq!(err.to_string(), "unable to delete image variations");
}

#[tokio::test]
async fn bulk_delete_batch_failure_maps_to_backend_error() {
    let (storage, store) = adapter();
    storage
        .store_image_variation("42", "abcdef", b"a", 100)
        .await
        .unwrap();
    store.fail_batch_deletes(Some(500)).await;

    let err = storage
        .delete_image_variations("42", "abcdef", None)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Backend { .. }));
    assert_eq!(err.to_string(), "unable to delete image variations");
}

#[tokio::test]
async fn deleting_an_absent_width_succeeds() {
    // S3 delete of a missing key is a clean success; the variation adapter
    // does no existence pre-check.
    let (storage, _) = adapter();
    storage
        .delete_image_variations("42", "abcdef", Some(100))
        .await
        .unwrap();
}

#[tokio::test]
async fn short_identifiers_are_rejected() {
    let (storage, _) = adapter();
    let err = storage
        .store_image_variation("42", "ab", b"data", 100)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidIdentifier(_)));
    assert_eq!(err.status_code(), 400);
}
