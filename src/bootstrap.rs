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

use crate::auth::AppRoleAuth;
use crate::config::VaultConfig;
use crate::error::{BootstrapError, CredentialError};
use crate::reader::read_secret;
use crate::secret_id::SecretIdSource;
use crate::transport::Transport;
use bon::Builder;
use log::{debug, error};
use std::path::PathBuf;

/// Default secret path read by both storage instances.
pub const DEFAULT_SECRET_PATH: &str = "secret/data/k11s/demo/app/service";
pub(crate) const DEFAULT_USERNAME_KEY: &str = "username";
pub(crate) const DEFAULT_PASSWORD_KEY: &str = "password";

/// The two values produced by a successful bootstrap.
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// One AppRole credential bound to the path and key it exists to read.
struct StorageInstance {
    auth: AppRoleAuth,
    secret_path: String,
    secret_key: String,
}

impl StorageInstance {
    async fn fetch(&self, transport: &Transport) -> Result<String, CredentialError> {
        let session = self.auth.login(transport).await?;
        let value = read_secret(transport, &session, &self.secret_path, &self.secret_key).await?;
        Ok(value)
    }
}

/// Orchestrates the two-credential bootstrap: a plain-delivery secret-id for
/// the username and a response-wrapped one for the password, both read from
/// the same secret path over a shared transport.
#[derive(Builder)]
pub struct Bootstrap {
    config: VaultConfig,
    #[builder(into)]
    role_id: String,
    /// File containing the raw secret-id for the username instance.
    #[builder(into)]
    secret_id_file: PathBuf,
    /// File containing the JSON `{"token": ...}` wrapping token for the
    /// password instance.
    #[builder(into)]
    wrapped_token_file: PathBuf,
    #[builder(into, default = DEFAULT_SECRET_PATH.to_string())]
    secret_path: String,
    #[builder(into, default = DEFAULT_USERNAME_KEY.to_string())]
    username_key: String,
    #[builder(into, default = DEFAULT_PASSWORD_KEY.to_string())]
    password_key: String,
}

impl Bootstrap {
    /// Runs both storage instances sequentially and returns the fetched
    /// credentials.
    ///
    /// Failures are accumulated rather than short-circuited: both instances
    /// always execute, and [`BootstrapError::Credentials`] reports each
    /// failed credential separately. Exit policy belongs to the caller; this
    /// method never terminates the process.
    pub async fn run(&self) -> Result<Credentials, BootstrapError> {
        let transport = Transport::new(&self.config)?;

        let username_instance = StorageInstance {
            auth: AppRoleAuth::builder()
                .role_id(&self.role_id)
                .secret_id_source(SecretIdSource::File(self.secret_id_file.clone()))
                .build(),
            secret_path: self.secret_path.clone(),
            secret_key: self.username_key.clone(),
        };

        let password_instance = StorageInstance {
            auth: AppRoleAuth::builder()
                .role_id(&self.role_id)
                .secret_id_source(SecretIdSource::WrappedTokenFile(
                    self.wrapped_token_file.clone(),
                ))
                .build(),
            secret_path: self.secret_path.clone(),
            secret_key: self.password_key.clone(),
        };

        let username = username_instance.fetch(&transport).await;
        let password = password_instance.fetch(&transport).await;

        if let Err(err) = &username {
            error!("failed to fetch {} credential: {}", self.username_key, err);
        }
        if let Err(err) = &password {
            error!("failed to fetch {} credential: {}", self.password_key, err);
        }

        match (username, password) {
            (Ok(username), Ok(password)) => {
                debug!("bootstrap completed for role {}", self.role_id);
                Ok(Credentials { username, password })
            }
            (username, password) => Err(BootstrapError::Credentials {
                username: username.err(),
                password: password.err(),
            }),
        }
    }
}
