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

use bon::Builder;
use std::path::PathBuf;
use std::time::Duration;

// Default values for configurable parameters
pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub(crate) const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const DEFAULT_RETRY_WAIT_MIN: Duration = Duration::from_millis(1000);
pub(crate) const DEFAULT_RETRY_WAIT_MAX: Duration = Duration::from_millis(1500);
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 2;

/// Configuration for the Vault transport.
///
/// Only describes how to reach the store; no network I/O happens until a
/// [`Transport`](crate::transport::Transport) is built from it.
#[derive(Builder, Clone)]
pub struct VaultConfig {
    /// The Vault server URL (e.g., "https://vault.example.com:8200")
    #[builder(into)]
    pub address: String,
    /// HTTP request timeout for Vault operations (defaults to 60 seconds)
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
    /// TCP/TLS handshake timeout (defaults to 10 seconds)
    #[builder(default = DEFAULT_HANDSHAKE_TIMEOUT)]
    pub handshake_timeout: Duration,
    /// Minimum wait between retries of a transient failure (defaults to 1000ms)
    #[builder(default = DEFAULT_RETRY_WAIT_MIN)]
    pub retry_wait_min: Duration,
    /// Maximum wait between retries of a transient failure (defaults to 1500ms)
    #[builder(default = DEFAULT_RETRY_WAIT_MAX)]
    pub retry_wait_max: Duration,
    /// Maximum number of retries after the initial attempt (defaults to 2)
    #[builder(default = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,
    /// Whether the TLS settings below are applied at all
    #[builder(default)]
    pub tls_enabled: bool,
    /// Optional PEM-encoded CA certificate to trust in addition to the system roots
    #[builder(into)]
    pub ca_cert: Option<PathBuf>,
    /// Optional PEM-encoded client certificate for mutual TLS
    #[builder(into)]
    pub client_cert: Option<PathBuf>,
    /// Optional PEM-encoded client key for mutual TLS
    #[builder(into)]
    pub client_key: Option<PathBuf>,
    /// Disables server certificate verification.
    ///
    /// This is a deliberately dangerous opt-in for development setups only,
    /// never a default.
    #[builder(default)]
    pub insecure: bool,
}

impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfig")
            .field("address", &self.address)
            .field("request_timeout", &self.request_timeout)
            .field("handshake_timeout", &self.handshake_timeout)
            .field("retry_wait_min", &self.retry_wait_min)
            .field("retry_wait_max", &self.retry_wait_max)
            .field("max_retries", &self.max_retries)
            .field("tls_enabled", &self.tls_enabled)
            .field("ca_cert", &self.ca_cert)
            .field("client_cert", &self.client_cert)
            .field("client_key", &self.client_key.as_ref().map(|_| "***"))
            .field("insecure", &self.insecure)
            .finish()
    }
}
