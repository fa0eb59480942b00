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

//! Bootstrap credential client for HashiCorp Vault's AppRole auth method.
//!
//! Authenticates a workload against a Vault server twice, once per secret-id
//! delivery mode (a plain secret-id file and a response-wrapped, single-use
//! token file), and reads one named value per login from a KV v2 secret path.

#[cfg(test)]
mod tests;

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod reader;
pub mod secret_id;
pub mod transport;

pub use auth::{AppRoleAuth, Session};
pub use bootstrap::{Bootstrap, Credentials, DEFAULT_SECRET_PATH};
pub use config::VaultConfig;
pub use error::{
    AuthError, BootstrapError, ConfigError, CredentialError, ReadError, SecretIdError,
};
pub use reader::read_secret;
pub use secret_id::{SecretIdMaterial, SecretIdSource};
pub use transport::Transport;
