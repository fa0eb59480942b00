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

use crate::auth::{error_context, Session, VAULT_TOKEN_HEADER};
use crate::error::ReadError;
use crate::transport::Transport;
use serde_json::Value;

/// Reads the secret at `path` with the session token and extracts the string
/// value under `key` from the KV v2 `data.data` envelope.
///
/// The payload shape is validated strictly: a missing or non-object `data`
/// field signals a wrong path, a KV v1 engine behind a v2 path assumption, or
/// a permissions issue masked as empty data, and is reported as
/// [`ReadError::ShapeMismatch`] rather than coerced to an empty string.
pub async fn read_secret(
    transport: &Transport,
    session: &Session,
    path: &str,
    key: &str,
) -> Result<String, ReadError> {
    let url = transport.url(path);
    let req = transport
        .client()
        .get(&url)
        .header(VAULT_TOKEN_HEADER, session.token())
        .build()
        .map_err(|e| ReadError::TransportFailed(e.to_string()))?;
    let response = transport
        .send(req)
        .await
        .map_err(|e| ReadError::TransportFailed(format!("request to {} failed: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(ReadError::TransportFailed(
            error_context(response, "secret read").await,
        ));
    }

    let payload: Value = response.json().await.map_err(|e| {
        ReadError::TransportFailed(format!("failed to parse secret response: {}", e))
    })?;

    extract_value(&payload, key)
}

/// Validates the double-nested KV v2 envelope and extracts `key` as a string.
pub(crate) fn extract_value(payload: &Value, key: &str) -> Result<String, ReadError> {
    let outer = match payload.get("data") {
        Some(Value::Object(map)) => map,
        other => {
            return Err(ReadError::ShapeMismatch {
                expected: "object under \"data\"",
                actual: json_type(other),
            })
        }
    };

    let inner = match outer.get("data") {
        Some(Value::Object(map)) => map,
        other => {
            return Err(ReadError::ShapeMismatch {
                expected: "object under \"data.data\"",
                actual: json_type(other),
            })
        }
    };

    match inner.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        other => Err(ReadError::KeyMissing {
            key: key.to_string(),
            actual: json_type(other),
        }),
    }
}

fn json_type(value: Option<&Value>) -> String {
    match value {
        None => "absent".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(_)) => "boolean".to_string(),
        Some(Value::Number(_)) => "number".to_string(),
        Some(Value::String(_)) => "string".to_string(),
        Some(Value::Array(_)) => "array".to_string(),
        Some(Value::Object(_)) => "object".to_string(),
    }
}
