//! Lookup error types.
//!
//! `Display` output is Spanish and goes straight into
//! `AutocompleteResult::error`. [`LookupError::code`] gives the stable
//! machine code forms branch on.

use padron_core::DocumentKind;

/// Errors from a registry lookup.
///
/// `Clone` so a single settled outcome can be handed to every caller that
/// joined the same in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The identifier failed local validation; no request was sent.
    #[error("{message}")]
    Validation {
        /// Spanish validator message.
        message: String,
        /// Validator machine code (`INVALID_LENGTH`, ...).
        code: String,
    },

    /// The registry has no record for the identifier (HTTP 404).
    #[error("No se encontró información para el {kind} {identifier}")]
    NotFound {
        kind: DocumentKind,
        identifier: String,
    },

    /// The registry returned a 5xx status.
    #[error("El servicio de consulta no está disponible (HTTP {status})")]
    ServiceUnavailable {
        status: u16,
        /// Response body excerpt, for logs.
        reason: String,
    },

    /// Transport failure: connection refused, DNS, TLS, reset.
    #[error("No se pudo conectar con el servicio de consulta: {reason}")]
    Network { reason: String },

    /// A single attempt exceeded the configured timeout.
    #[error("La consulta excedió el tiempo de espera ({elapsed_ms} ms)")]
    Timeout { elapsed_ms: u64 },

    /// The lookup was cancelled by the caller.
    #[error("La consulta fue cancelada")]
    Cancelled,

    /// Terminal refusal: a 4xx other than 404, or an `{ "ok": false }`
    /// envelope.
    #[error("El servicio rechazó la consulta: {reason}")]
    Rejected {
        /// HTTP status, `None` for envelope rejections.
        status: Option<u16>,
        reason: String,
    },

    /// The response body could not be interpreted.
    #[error("Respuesta inválida del servicio de consulta: {reason}")]
    InvalidResponse { reason: String },

    /// The record lacks a field required to use it.
    #[error("Datos incompletos del registro: falta {missing}")]
    IncompleteRecord {
        /// Comma-separated missing field labels.
        missing: String,
    },
}

impl LookupError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Cancelled => "CANCELLED",
            Self::Rejected { .. } => "REJECTED",
            Self::InvalidResponse { .. } => "INVALID_RESPONSE",
            Self::IncompleteRecord { .. } => "INCOMPLETE_RECORD",
        }
    }

    /// Whether another attempt may succeed. Only 5xx and transport failures
    /// qualify; timeouts and cancellations need the caller to re-initiate.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable { .. } | Self::Network { .. })
    }
}

impl From<padron_core::ValidationError> for LookupError {
    fn from(err: padron_core::ValidationError) -> Self {
        Self::Validation {
            message: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(LookupError::ServiceUnavailable {
            status: 503,
            reason: String::new()
        }
        .is_retryable());
        assert!(LookupError::Network {
            reason: "connection refused".into()
        }
        .is_retryable());
        assert!(!LookupError::Timeout { elapsed_ms: 10 }.is_retryable());
        assert!(!LookupError::Cancelled.is_retryable());
        assert!(!LookupError::NotFound {
            kind: DocumentKind::Dni,
            identifier: "87654321".into()
        }
        .is_retryable());
        assert!(!LookupError::Rejected {
            status: Some(422),
            reason: "x".into()
        }
        .is_retryable());
    }

    #[test]
    fn not_found_message_names_the_document() {
        let err = LookupError::NotFound {
            kind: DocumentKind::Ruc,
            identifier: "20131312955".into(),
        };
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(
            err.to_string(),
            "No se encontró información para el RUC 20131312955"
        );
    }

    #[test]
    fn validation_errors_keep_their_code_and_message() {
        let err: LookupError = padron_core::ValidationError::ChecksumMismatch {
            expected: 5,
            actual: 6,
        }
        .into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        match &err {
            LookupError::Validation { code, .. } => assert_eq!(code, "CHECKSUM_MISMATCH"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.to_string().contains("dígito verificador"));
    }
}
