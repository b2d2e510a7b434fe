//! # Validation Errors
//!
//! Defines the validation errors raised by the identifier newtypes and the
//! address checks. All errors use `thiserror` for derive-based `Display`.
//!
//! ## Design
//!
//! - Every variant maps to a stable machine code via [`ValidationError::code`]
//!   (`INVALID_LENGTH`, `CHECKSUM_MISMATCH`, ...). Callers branch on the code,
//!   never on the message text.
//! - `Display` output is Spanish and suitable for inline display next to the
//!   offending form field.
//! - The `validate_*` functions never return these as `Err`; they fold them
//!   into a [`ValidationResult`]. Only the newtype constructors propagate them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A local, synchronous validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The cleaned identifier does not have the required number of digits.
    #[error("El {document} debe tener {expected} dígitos (se recibieron {actual})")]
    InvalidLength {
        /// Document label ("DNI" or "RUC").
        document: &'static str,
        /// Required digit count.
        expected: usize,
        /// Digit count after stripping separators.
        actual: usize,
    },

    /// The identifier is all zeros or a single repeated digit.
    #[error("El {document} no es válido: {reason}")]
    InvalidValue {
        /// Document label ("DNI" or "RUC").
        document: &'static str,
        /// Which degenerate pattern was detected.
        reason: &'static str,
    },

    /// The DNI numeric value falls outside the issued range.
    #[error("El DNI {value} está fuera del rango permitido (1000000 - 99999999)")]
    OutOfRange {
        /// Numeric value of the cleaned DNI.
        value: u64,
    },

    /// The RUC check digit does not match the weighted mod-11 computation.
    #[error("El dígito verificador del RUC no es válido (se esperaba {expected}, se recibió {actual})")]
    ChecksumMismatch {
        /// Check digit computed from the first ten digits.
        expected: u8,
        /// Eleventh digit as entered.
        actual: u8,
    },

    /// Address text is empty or whitespace-only.
    #[error("La dirección es obligatoria")]
    EmptyAddress,

    /// Address text is shorter than the minimum length.
    #[error("La dirección debe tener al menos {min} caracteres")]
    AddressTooShort {
        /// Minimum accepted length after trimming.
        min: usize,
        /// Length found after trimming.
        actual: usize,
    },

    /// Address text is (or contains) a generic placeholder phrase.
    #[error("La dirección no puede ser un texto genérico como \"{phrase}\"")]
    PlaceholderAddress {
        /// The denylisted phrase that matched.
        phrase: String,
    },

    /// Address text is a single character repeated.
    #[error("La dirección no puede contener un mismo carácter repetido")]
    DegenerateAddress,

    /// Address text has no street number.
    #[error("La dirección debe incluir un número (ej: Av. Principal 123)")]
    AddressMissingNumber,

    /// Address text does not match enough physical-address pattern classes.
    #[error("La dirección debe ser más específica: incluya tipo de vía (Av., Jr., Calle), número y/o referencia (cuadra, km)")]
    AddressNotSpecific,

    /// No department selected.
    #[error("Seleccione un departamento")]
    MissingDepartment,

    /// No province selected.
    #[error("Seleccione una provincia")]
    MissingProvince,

    /// No district selected.
    #[error("Se recomienda seleccionar un distrito")]
    MissingDistrict,

    /// A selected UBIGEO code does not exist in the reference data.
    #[error("No existe el {level} con código {code}")]
    UnknownLocation {
        /// "departamento", "provincia" or "distrito".
        level: &'static str,
        /// The code that was not found.
        code: String,
    },

    /// A selected child unit does not belong to the selected parent unit.
    #[error("El {child} {code} no pertenece al {parent} {parent_code}")]
    InconsistentLocation {
        /// Child level label.
        child: &'static str,
        /// Child code.
        code: String,
        /// Parent level label.
        parent: &'static str,
        /// Parent code the child was expected to reference.
        parent_code: String,
    },
}

impl ValidationError {
    /// Stable machine-readable code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidLength { .. } => "INVALID_LENGTH",
            Self::InvalidValue { .. } => "INVALID_VALUE",
            Self::OutOfRange { .. } => "OUT_OF_RANGE",
            Self::ChecksumMismatch { .. } => "CHECKSUM_MISMATCH",
            Self::EmptyAddress => "EMPTY_ADDRESS",
            Self::AddressTooShort { .. } => "ADDRESS_TOO_SHORT",
            Self::PlaceholderAddress { .. } => "PLACEHOLDER_ADDRESS",
            Self::DegenerateAddress => "DEGENERATE_ADDRESS",
            Self::AddressMissingNumber => "ADDRESS_MISSING_NUMBER",
            Self::AddressNotSpecific => "ADDRESS_NOT_SPECIFIC",
            Self::MissingDepartment => "MISSING_DEPARTMENT",
            Self::MissingProvince => "MISSING_PROVINCE",
            Self::MissingDistrict => "MISSING_DISTRICT",
            Self::UnknownLocation { .. } => "UNKNOWN_LOCATION",
            Self::InconsistentLocation { .. } => "INCONSISTENT_LOCATION",
        }
    }
}

/// Outcome of a validator call. Immutable, created fresh per call.
///
/// Serializes as `{ "valido": bool, "mensaje"?: string, "codigo"?: string }`,
/// the shape form consumers display directly. Deserialization also accepts
/// the English `valid` / `message` / `code` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the input passed every check.
    #[serde(rename = "valido", alias = "valid")]
    pub valid: bool,
    /// Human-readable (Spanish) message for failures.
    #[serde(
        rename = "mensaje",
        alias = "message",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
    /// Machine code of the first failure (see [`ValidationError::code`]).
    #[serde(
        rename = "codigo",
        alias = "code",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub code: Option<String>,
}

impl ValidationResult {
    /// A passing result with no message.
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
            code: None,
        }
    }

    /// A failing result carrying the error's code and message.
    pub fn fail(err: &ValidationError) -> Self {
        Self {
            valid: false,
            message: Some(err.to_string()),
            code: Some(err.code().to_string()),
        }
    }

    /// Whether this result failed with the given machine code.
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

impl From<ValidationError> for ValidationResult {
    fn from(err: ValidationError) -> Self {
        Self::fail(&err)
    }
}

impl<T> From<Result<T, ValidationError>> for ValidationResult {
    fn from(result: Result<T, ValidationError>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(e) => Self::fail(&e),
        }
    }
}
