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

use crate::config::VaultConfig;
use crate::error::ConfigError;
use log::debug;
use rand::Rng;
use reqwest::redirect::Policy;
use reqwest::{Certificate, Client, Identity, Request, Response, StatusCode, Url};
use std::path::Path;
use std::time::Duration;

/// Immutable handle binding the pooled HTTP client, the store address, and
/// the retry policy.
///
/// Safe to share across storage instances: the underlying connection pool has
/// no session affinity.
#[derive(Clone)]
pub struct Transport {
    client: Client,
    address: String,
    retry_wait_min: Duration,
    retry_wait_max: Duration,
    max_retries: u32,
}

impl Transport {
    /// Validates the configuration and constructs the hardened HTTP client.
    ///
    /// Redirects are never followed automatically so a request carrying a
    /// vault token is never re-issued to another host; the redirect response
    /// is surfaced to the caller instead.
    pub fn new(config: &VaultConfig) -> Result<Self, ConfigError> {
        if config.address.is_empty() {
            return Err(ConfigError::MissingAddress);
        }
        Url::parse(&config.address)
            .map_err(|e| ConfigError::InvalidAddress(config.address.clone(), e.to_string()))?;

        let mut builder = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.handshake_timeout)
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .redirect(Policy::none());

        if config.tls_enabled {
            if !config.insecure && config.ca_cert.is_none() && config.client_cert.is_none() {
                return Err(ConfigError::IncompleteTls);
            }

            if config.insecure {
                debug!("vault TLS certificate verification is disabled");
                builder = builder.danger_accept_invalid_certs(true);
            }

            if let Some(path) = &config.ca_cert {
                let cert = Certificate::from_pem(&read_pem(path)?)
                    .map_err(|e| tls_material_error(path, e))?;
                builder = builder.add_root_certificate(cert);
            }

            if let (Some(cert_path), Some(key_path)) = (&config.client_cert, &config.client_key) {
                let mut pem = read_pem(cert_path)?;
                pem.extend_from_slice(&read_pem(key_path)?);
                let identity =
                    Identity::from_pem(&pem).map_err(|e| tls_material_error(cert_path, e))?;
                builder = builder.identity(identity);
            }
        }

        let client = builder
            .build()
            .map_err(|e| ConfigError::ClientBuild(e.to_string()))?;

        debug!("initialized vault transport for {}", config.address);

        Ok(Self {
            client,
            address: config.address.trim_end_matches('/').to_string(),
            retry_wait_min: config.retry_wait_min,
            retry_wait_max: config.retry_wait_max,
            max_retries: config.max_retries,
        })
    }

    /// Returns the underlying HTTP client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Constructs the URL for an API path under the `/v1` prefix.
    pub fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.address, path.trim_start_matches('/'))
    }

    /// Executes a request, retrying transient failures with a jittered linear
    /// backoff.
    ///
    /// A failure is transient if the connection could not be established, the
    /// request timed out, or the store answered 429 or 5xx. At most
    /// `max_retries` retries are issued after the initial attempt.
    pub(crate) async fn send(&self, request: Request) -> Result<Response, reqwest::Error> {
        let mut attempt: u32 = 0;
        loop {
            let outcome = match request.try_clone() {
                Some(cloned) => self.client.execute(cloned).await,
                // Non-clonable (streaming) bodies cannot be re-issued
                None => return self.client.execute(request).await,
            };

            let transient = match &outcome {
                Ok(response) => {
                    let status = response.status();
                    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
                }
                Err(err) => err.is_connect() || err.is_timeout(),
            };

            if !transient || attempt >= self.max_retries {
                return outcome;
            }

            attempt += 1;
            let wait = jittered_wait(self.retry_wait_min, self.retry_wait_max);
            debug!("retrying vault request, attempt {} after {:?}", attempt, wait);
            tokio::time::sleep(wait).await;
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("address", &self.address)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Picks a uniformly random wait in `[min, max]` so concurrent clients do not
/// retry in lockstep against a recovering store.
pub(crate) fn jittered_wait(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let span = (max - min).as_millis() as u64;
    let offset = rand::thread_rng().gen_range(0..=span);
    min + Duration::from_millis(offset)
}

fn read_pem(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|e| tls_material_error(path, e))
}

fn tls_material_error(path: &Path, error: impl std::fmt::Display) -> ConfigError {
    ConfigError::TlsMaterial {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}
