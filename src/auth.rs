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

use crate::error::AuthError;
use crate::secret_id::SecretIdSource;
use crate::transport::Transport;
use bon::Builder;
use log::debug;
use reqwest::Response;
use serde::{Deserialize, Serialize};

pub(crate) const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";

/// An authenticated Vault session holding a short-lived client token.
pub struct Session {
    client_token: String,
}

impl Session {
    pub(crate) fn token(&self) -> &str {
        &self.client_token
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("client_token", &"***").finish()
    }
}

/// AppRole credential: a role id paired with a secret-id delivery source.
///
/// Consumed once per login. A wrapped source cannot be logged in twice with
/// the same file contents; the server invalidates the wrapping token on first
/// use regardless of outcome.
#[derive(Builder, Debug)]
pub struct AppRoleAuth {
    #[builder(into)]
    role_id: String,
    secret_id_source: SecretIdSource,
}

#[derive(Debug, Serialize)]
struct AppRoleLoginRequest {
    role_id: String,
    secret_id: String,
}

#[derive(Debug, Deserialize)]
struct AppRoleLoginResponse {
    auth: Option<AuthInfo>,
}

#[derive(Debug, Deserialize)]
struct AuthInfo {
    client_token: String,
}

#[derive(Debug, Deserialize)]
struct UnwrapResponse {
    data: Option<UnwrapData>,
}

#[derive(Debug, Deserialize)]
struct UnwrapData {
    secret_id: String,
}

impl AppRoleAuth {
    /// Performs the AppRole login handshake and returns an authenticated
    /// session.
    ///
    /// The role id and the secret-id file are validated before any network
    /// call. A wrapping token is exchanged for the real secret-id server-side
    /// via `sys/wrapping/unwrap`; the secret-id is never unwrapped locally.
    pub async fn login(&self, transport: &Transport) -> Result<Session, AuthError> {
        if self.role_id.is_empty() {
            return Err(AuthError::RoleIdMissing);
        }

        let material = self.secret_id_source.resolve().await?;
        let secret_id = if material.is_wrapped() {
            self.unwrap_secret_id(transport, material.value()).await?
        } else {
            material.into_value()
        };

        let url = transport.url("auth/approle/login");
        let request = AppRoleLoginRequest {
            role_id: self.role_id.clone(),
            secret_id,
        };

        let req = transport
            .client()
            .post(&url)
            .json(&request)
            .build()
            .map_err(|e| AuthError::LoginFailed(e.to_string()))?;
        let response = transport
            .send(req)
            .await
            .map_err(|e| AuthError::LoginFailed(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AuthError::LoginFailed(
                error_context(response, "AppRole login").await,
            ));
        }

        let login: AppRoleLoginResponse = response
            .json()
            .await
            .map_err(|e| AuthError::LoginFailed(format!("failed to parse login response: {}", e)))?;

        match login.auth {
            Some(auth) if !auth.client_token.is_empty() => {
                debug!("approle login succeeded for role {}", self.role_id);
                Ok(Session {
                    client_token: auth.client_token,
                })
            }
            _ => Err(AuthError::NoAuthInfo),
        }
    }

    /// Exchanges a single-use wrapping token for the real secret-id.
    async fn unwrap_secret_id(
        &self,
        transport: &Transport,
        wrapping_token: &str,
    ) -> Result<String, AuthError> {
        let url = transport.url("sys/wrapping/unwrap");
        let req = transport
            .client()
            .put(&url)
            .header(VAULT_TOKEN_HEADER, wrapping_token)
            .build()
            .map_err(|e| AuthError::UnwrapFailed(e.to_string()))?;
        let response = transport
            .send(req)
            .await
            .map_err(|e| AuthError::UnwrapFailed(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AuthError::UnwrapFailed(
                error_context(response, "secret-id unwrap").await,
            ));
        }

        let unwrap: UnwrapResponse = response.json().await.map_err(|e| {
            AuthError::UnwrapFailed(format!("failed to parse unwrap response: {}", e))
        })?;

        match unwrap.data {
            Some(data) if !data.secret_id.is_empty() => Ok(data.secret_id),
            _ => Err(AuthError::UnwrapFailed(
                "no secret_id was returned in the unwrap response".to_string(),
            )),
        }
    }
}

/// Helper to extract error details from an HTTP response.
pub(crate) async fn error_context(response: Response, context: &str) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("{} failed with status {}: {}", context, status, body)
}
