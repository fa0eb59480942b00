//  Copyright (c) 2026 Metaform Systems, Inc
//
//  This program and the accompanying materials are made available under the
//  terms of the Apache License, Version 2.0 which is available at
//  https://www.apache.org/licenses/LICENSE-2.0
//
//  SPDX-License-Identifier: Apache-2.0
//
//  Contributors:
//       Metaform Systems, Inc. - initial API and implementation
//

//! Unit tests for secret-id resolution

use crate::error::SecretIdError;
use crate::secret_id::SecretIdSource;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tokio::fs;

/// Test that a plain secret-id file is read verbatim (modulo whitespace)
#[tokio::test]
async fn test_file_source_success() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let file_path = temp_file.path().to_path_buf();

    fs::write(&file_path, "s1-secret-id\n")
        .await
        .expect("Failed to write secret-id");

    let source = SecretIdSource::File(file_path);
    let material = source.resolve().await.expect("Resolution should succeed");

    assert_eq!(material.value(), "s1-secret-id");
    assert!(!material.is_wrapped());
}

/// Test that resolving a plain file source twice yields identical material
#[tokio::test]
async fn test_file_source_idempotent() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let file_path = temp_file.path().to_path_buf();

    fs::write(&file_path, "stable-secret-id")
        .await
        .expect("Failed to write secret-id");

    let source = SecretIdSource::File(file_path);
    let first = source.resolve().await.expect("First resolution should succeed");
    let second = source.resolve().await.expect("Second resolution should succeed");

    assert_eq!(first.value(), second.value());
}

/// Test that a missing file is reported as NotFound, not a read failure
#[tokio::test]
async fn test_file_source_not_found() {
    let file_path = PathBuf::from("/tmp/nonexistent-approle-secret-id-98765");

    let source = SecretIdSource::File(file_path.clone());
    let result = source.resolve().await;

    match result.unwrap_err() {
        SecretIdError::NotFound(path) => assert_eq!(path, file_path),
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
}

/// Test that an empty plain secret-id file is rejected
#[tokio::test]
async fn test_file_source_empty() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let file_path = temp_file.path().to_path_buf();

    fs::write(&file_path, "  \n\t  ")
        .await
        .expect("Failed to write whitespace");

    let source = SecretIdSource::File(file_path);
    let result = source.resolve().await;

    assert!(
        matches!(result.unwrap_err(), SecretIdError::EmptyToken(_)),
        "Whitespace-only secret-id should be rejected"
    );
}

/// Test that a wrapped token file with a valid token field resolves
#[tokio::test]
async fn test_wrapped_source_success() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let file_path = temp_file.path().to_path_buf();

    fs::write(&file_path, r#"{"token":"wrap-xyz"}"#)
        .await
        .expect("Failed to write token file");

    let source = SecretIdSource::WrappedTokenFile(file_path);
    let material = source.resolve().await.expect("Resolution should succeed");

    assert_eq!(material.value(), "wrap-xyz");
    assert!(material.is_wrapped());
}

/// Test that a wrapped token file missing the token field fails to parse
#[tokio::test]
async fn test_wrapped_source_missing_token_field() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let file_path = temp_file.path().to_path_buf();

    fs::write(&file_path, r#"{"other":"value"}"#)
        .await
        .expect("Failed to write token file");

    let source = SecretIdSource::WrappedTokenFile(file_path);
    let result = source.resolve().await;

    match result.unwrap_err() {
        SecretIdError::ParseFailed { reason, .. } => {
            assert!(reason.contains("token"), "Parse error should name the missing field");
        }
        other => panic!("Expected ParseFailed error, got: {:?}", other),
    }
}

/// Test that a wrapped token file with invalid JSON fails to parse
#[tokio::test]
async fn test_wrapped_source_invalid_json() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let file_path = temp_file.path().to_path_buf();

    fs::write(&file_path, "not json at all")
        .await
        .expect("Failed to write token file");

    let source = SecretIdSource::WrappedTokenFile(file_path);
    let result = source.resolve().await;

    assert!(matches!(
        result.unwrap_err(),
        SecretIdError::ParseFailed { .. }
    ));
}

/// Test that an empty wrapping token does not silently proceed to login
#[tokio::test]
async fn test_wrapped_source_empty_token() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let file_path = temp_file.path().to_path_buf();

    fs::write(&file_path, r#"{"token":""}"#)
        .await
        .expect("Failed to write token file");

    let source = SecretIdSource::WrappedTokenFile(file_path);
    let result = source.resolve().await;

    assert!(matches!(result.unwrap_err(), SecretIdError::EmptyToken(_)));
}

/// Test that a missing wrapped token file is reported as NotFound
#[tokio::test]
async fn test_wrapped_source_not_found() {
    let file_path = PathBuf::from("/tmp/nonexistent-wrapped-token-98765.json");

    let source = SecretIdSource::WrappedTokenFile(file_path.clone());
    let result = source.resolve().await;

    match result.unwrap_err() {
        SecretIdError::NotFound(path) => assert_eq!(path, file_path),
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
}

/// Test that the redacting Debug impl never exposes the resolved material
#[tokio::test]
async fn test_material_debug_redacts_value() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let file_path = temp_file.path().to_path_buf();

    fs::write(&file_path, "super-sensitive-value")
        .await
        .expect("Failed to write secret-id");

    let source = SecretIdSource::File(file_path);
    let material = source.resolve().await.expect("Resolution should succeed");

    let rendered = format!("{:?}", material);
    assert!(!rendered.contains("super-sensitive-value"));
    assert!(rendered.contains("***"));
}
