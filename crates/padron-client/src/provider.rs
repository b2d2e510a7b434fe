//! # Document Registry Providers
//!
//! [`DocumentProvider`] abstracts the registry transport. Production uses
//! [`HttpDocumentProvider`]; tests substitute scripted implementations.
//! Implementations are `Send + Sync` and shared via `Arc` across tasks.
//!
//! ## Endpoints
//!
//! | Kind | Method | Path |
//! |------|--------|------|
//! | DNI  | GET | `{base}/v1/reniec/dni?numero={dni}` |
//! | RUC  | GET | `{base}/v1/sunat/ruc?numero={ruc}` |
//!
//! ## Status mapping
//!
//! - 404 → [`LookupError::NotFound`]
//! - 5xx → [`LookupError::ServiceUnavailable`]
//! - other 4xx → [`LookupError::Rejected`]
//! - transport failure → [`LookupError::Network`] (or `Timeout`)
//! - 2xx with `{ "ok": false }` → [`LookupError::Rejected`]
//!
//! Retries and timeouts are NOT built into the provider. The autocomplete
//! service owns that policy.

use async_trait::async_trait;
use padron_core::{DocumentKind, Identifier};

use crate::config::{ClientConfig, ConfigError};
use crate::error::LookupError;
use crate::types::RegistryPayload;

/// Longest response-body excerpt carried in error reasons.
const BODY_EXCERPT_LEN: usize = 200;

/// A source of raw registry records.
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    /// Fetch the raw record for a validated identifier.
    async fn fetch(&self, identifier: &Identifier) -> Result<RegistryPayload, LookupError>;
}

/// Registry gateway over HTTP.
#[derive(Debug)]
pub struct HttpDocumentProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentProvider {
    /// Create a provider from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = &config.api_token {
            let bearer = format!("Bearer {}", token.as_str());
            let mut value = reqwest::header::HeaderValue::from_str(&bearer)
                .map_err(|_| ConfigError::InvalidToken("invalid API token characters".into()))?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let base_url = config.base_url.as_str().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, kind: DocumentKind) -> String {
        match kind {
            DocumentKind::Dni => format!("{}/v1/reniec/dni", self.base_url),
            DocumentKind::Ruc => format!("{}/v1/sunat/ruc", self.base_url),
        }
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_LEN).collect()
}

/// Unwrap an optional `{ ok, data, message }` envelope.
fn unwrap_envelope(value: serde_json::Value) -> Result<serde_json::Value, LookupError> {
    let ok = value.get("ok").and_then(serde_json::Value::as_bool);
    match ok {
        Some(false) => {
            let reason = value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("respuesta sin detalle")
                .to_string();
            Err(LookupError::Rejected {
                status: None,
                reason,
            })
        }
        Some(true) => match value.get("data") {
            Some(data) if data.is_object() => Ok(data.clone()),
            _ => Err(LookupError::InvalidResponse {
                reason: "envelope without data object".into(),
            }),
        },
        None if value.is_object() => Ok(value),
        None => Err(LookupError::InvalidResponse {
            reason: "expected a JSON object".into(),
        }),
    }
}

#[async_trait]
impl DocumentProvider for HttpDocumentProvider {
    async fn fetch(&self, identifier: &Identifier) -> Result<RegistryPayload, LookupError> {
        let url = self.endpoint(identifier.kind());
        let resp = self
            .client
            .get(&url)
            .query(&[("numero", identifier.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LookupError::Timeout { elapsed_ms: 0 }
                } else {
                    LookupError::Network {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound {
                kind: identifier.kind(),
                identifier: identifier.as_str().to_string(),
            });
        }
        if status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LookupError::ServiceUnavailable {
                status: status.as_u16(),
                reason: excerpt(&body),
            });
        }
        if status.is_client_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LookupError::Rejected {
                status: Some(status.as_u16()),
                reason: format!("HTTP {status}: {}", excerpt(&body)),
            });
        }

        let body = resp.text().await.map_err(|e| LookupError::Network {
            reason: e.to_string(),
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| LookupError::InvalidResponse {
                reason: format!("response deserialization failed: {e}"),
            })?;
        let data = unwrap_envelope(value)?;
        serde_json::from_value(data).map_err(|e| LookupError::InvalidResponse {
            reason: format!("unexpected record shape: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_follow_kind() {
        let config = ClientConfig::local("http://127.0.0.1:9000/").unwrap();
        let provider = HttpDocumentProvider::new(&config).unwrap();
        assert_eq!(
            provider.endpoint(DocumentKind::Dni),
            "http://127.0.0.1:9000/v1/reniec/dni"
        );
        assert_eq!(
            provider.endpoint(DocumentKind::Ruc),
            "http://127.0.0.1:9000/v1/sunat/ruc"
        );
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let config = ClientConfig::local("http://127.0.0.1:9000")
            .unwrap()
            .with_token("bad\ntoken");
        assert!(matches!(
            HttpDocumentProvider::new(&config),
            Err(ConfigError::InvalidToken(_))
        ));
    }

    // -- envelope -----------------------------------------------------------

    #[test]
    fn envelope_ok_false_is_rejected() {
        let err = unwrap_envelope(serde_json::json!({"ok": false, "message": "RUC no válido"}))
            .unwrap_err();
        assert_eq!(
            err,
            LookupError::Rejected {
                status: None,
                reason: "RUC no válido".into()
            }
        );
    }

    #[test]
    fn envelope_ok_true_is_unwrapped() {
        let data = unwrap_envelope(serde_json::json!({"ok": true, "data": {"razon_social": "X"}}))
            .unwrap();
        assert_eq!(data["razon_social"], "X");
    }

    #[test]
    fn bare_object_passes_through() {
        let data = unwrap_envelope(serde_json::json!({"razon_social": "X"})).unwrap();
        assert_eq!(data["razon_social"], "X");
        assert!(unwrap_envelope(serde_json::json!([1, 2])).is_err());
    }
}
