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

use crate::error::SecretIdError;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Where the secret-id for an AppRole login comes from.
///
/// Both variants point at local files so that delivery failures are caught
/// before any network call is made.
#[derive(Debug, Clone)]
pub enum SecretIdSource {
    /// A file containing the raw secret-id string verbatim.
    File(PathBuf),
    /// A file containing a JSON document with a single-use wrapping `token`
    /// field. The token is exchanged for the real secret-id server-side
    /// during login.
    WrappedTokenFile(PathBuf),
}

/// Secret-id material resolved from the filesystem.
///
/// Holds either a raw secret-id or a wrapping token still to be exchanged.
pub struct SecretIdMaterial {
    value: String,
    wrapped: bool,
}

impl SecretIdMaterial {
    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn into_value(self) -> String {
        self.value
    }

    /// True if the material is a wrapping token that must be unwrapped
    /// server-side before it can be used as a secret-id.
    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }
}

impl std::fmt::Debug for SecretIdMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretIdMaterial")
            .field("value", &"***")
            .field("wrapped", &self.wrapped)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct WrappedTokenInfo {
    token: String,
}

impl SecretIdSource {
    /// The file path the source reads from.
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::WrappedTokenFile(path) => path,
        }
    }

    /// Resolves the secret-id material from the filesystem.
    ///
    /// The file's existence is verified before it is read so that a missing
    /// file is reported as [`SecretIdError::NotFound`], distinct from a read
    /// or parse failure.
    pub async fn resolve(&self) -> Result<SecretIdMaterial, SecretIdError> {
        let path = self.path();
        if !path.exists() {
            return Err(SecretIdError::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)
            .await
            .map_err(|e| SecretIdError::ReadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        match self {
            Self::File(_) => {
                let value = contents.trim();
                if value.is_empty() {
                    return Err(SecretIdError::EmptyToken(path.to_path_buf()));
                }
                debug!("resolved secret-id from {}", path.display());
                Ok(SecretIdMaterial {
                    value: value.to_string(),
                    wrapped: false,
                })
            }
            Self::WrappedTokenFile(_) => {
                let info: WrappedTokenInfo =
                    serde_json::from_str(&contents).map_err(|e| SecretIdError::ParseFailed {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    })?;
                if info.token.is_empty() {
                    return Err(SecretIdError::EmptyToken(path.to_path_buf()));
                }
                debug!("resolved wrapping token from {}", path.display());
                Ok(SecretIdMaterial {
                    value: info.token,
                    wrapped: true,
                })
            }
        }
    }
}
