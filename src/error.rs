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

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while validating configuration or constructing the transport.
///
/// All of these are fatal: nothing proceeds without a usable transport.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no vault address was configured")]
    MissingAddress,

    #[error("vault address {0:?} is not a valid URL: {1}")]
    InvalidAddress(String, String),

    #[error("TLS was enabled but neither certificate material nor the insecure override is configured")]
    IncompleteTls,

    #[error("failed to load TLS material from {}: {}", .path.display(), .reason)]
    TlsMaterial { path: PathBuf, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Errors raised while resolving secret-id material from the local filesystem.
///
/// A missing file is reported separately from an unreadable or malformed one
/// because operators need different remediation for each.
#[derive(Debug, Error)]
pub enum SecretIdError {
    #[error("secret-id file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read secret-id file {}: {}", .path.display(), .reason)]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to parse wrapped token file {}: {}", .path.display(), .reason)]
    ParseFailed { path: PathBuf, reason: String },

    #[error("secret-id material in {} is empty", .0.display())]
    EmptyToken(PathBuf),
}

/// Errors raised during the AppRole login handshake.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no role id was provided")]
    RoleIdMissing,

    #[error(transparent)]
    SecretId(#[from] SecretIdError),

    #[error("failed to unwrap secret-id: {0}")]
    UnwrapFailed(String),

    #[error("unable to login to AppRole auth method: {0}")]
    LoginFailed(String),

    #[error("no auth info was returned after login")]
    NoAuthInfo,
}

/// Errors raised while reading and extracting a secret value.
///
/// A transport failure means the store could not be reached or rejected the
/// request; a shape mismatch means it answered with a payload that does not
/// carry the expected KV v2 envelope.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("unable to read secret: {0}")]
    TransportFailed(String),

    #[error("secret payload shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: &'static str, actual: String },

    #[error("secret key {key:?} missing or not a string: found {actual}")]
    KeyMissing { key: String, actual: String },
}

/// Failure of a single credential fetch (login followed by read).
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Aggregate failure of the bootstrap sequence.
///
/// The orchestrator never short-circuits: both credential fetches run to
/// completion and their failures are reported together.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("credential bootstrap failed:{}", describe_failures(.username, .password))]
    Credentials {
        username: Option<CredentialError>,
        password: Option<CredentialError>,
    },
}

fn describe_failures(username: &Option<CredentialError>, password: &Option<CredentialError>) -> String {
    let mut out = String::new();
    if let Some(err) = username {
        out.push_str(&format!(" username: {}", err));
    }
    if let Some(err) = password {
        if !out.is_empty() {
            out.push(';');
        }
        out.push_str(&format!(" password: {}", err));
    }
    out
}
