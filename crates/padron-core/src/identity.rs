//! # Identity Newtypes and Checksum Validators
//!
//! Domain-primitive newtypes for Peruvian identity documents. Each
//! identifier is a distinct type: you cannot pass a [`Dni`] where a [`Ruc`]
//! is expected.
//!
//! ## Validation
//!
//! Both types validate at construction time and store the canonical
//! digits-only form. Separators (`-`, spaces, dots) are stripped first, so
//! `"20-131312-955"` and `"20131312955"` are the same RUC.
//!
//! - DNI: exactly 8 digits, not all the same digit, numeric value within
//!   `1_000_000..=99_999_999`.
//! - RUC: exactly 11 digits, not all the same digit, and the 11th digit must
//!   equal the weighted mod-11 check digit of the first ten (see
//!   [`ruc_check_digit`]).
//!
//! The free functions [`validate_dni`] / [`validate_ruc`] wrap the
//! constructors and never fail: they return a [`ValidationResult`].

use serde::{Deserialize, Serialize};

use crate::classifier::{entity_kind_for_ruc, DocumentKind, EntityKind};
use crate::error::{ValidationError, ValidationResult};

/// Weights applied to the first ten RUC digits.
pub const RUC_WEIGHTS: [u32; 10] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];

/// Lowest DNI value in circulation.
pub const DNI_MIN: u64 = 1_000_000;

/// Highest representable DNI value.
pub const DNI_MAX: u64 = 99_999_999;

/// Routes `Deserialize` through the type's validating `new()` constructor so
/// invalid values are rejected at deserialization time.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Strip every non-digit character.
pub fn clean_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize document-field input: digits only, truncated to 11.
pub fn normalize_input(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(DocumentKind::Ruc.expected_len())
        .collect()
}

fn digit_values(digits: &str) -> Vec<u8> {
    digits.bytes().map(|b| b - b'0').collect()
}

/// `Some(reason)` when every digit is the same.
fn degenerate_reason(digits: &str) -> Option<&'static str> {
    let first = digits.as_bytes().first()?;
    if !digits.bytes().all(|b| b == *first) {
        return None;
    }
    if *first == b'0' {
        Some("no puede estar compuesto solo de ceros")
    } else {
        Some("no puede tener todos los dígitos iguales")
    }
}

/// Compute the RUC check digit from the first ten digits.
///
/// `sum = Σ digit[i] * RUC_WEIGHTS[i]`, `r = sum mod 11`; the check digit is
/// `r` when `r < 2`, otherwise `11 - r`.
pub fn ruc_check_digit(first_ten: &[u8]) -> u8 {
    let sum: u32 = first_ten
        .iter()
        .zip(RUC_WEIGHTS.iter())
        .map(|(d, w)| u32::from(*d) * w)
        .sum();
    let remainder = sum % 11;
    let check = if remainder < 2 {
        remainder
    } else {
        11 - remainder
    };
    check as u8
}

// ---------------------------------------------------------------------------
// DNI
// ---------------------------------------------------------------------------

/// Peruvian national identity document number (RENIEC), 8 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Dni(String);

impl_validating_deserialize!(Dni);

impl Dni {
    /// Create a DNI, stripping separators and validating.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidLength`] if the cleaned value is not 8 digits.
    /// - [`ValidationError::InvalidValue`] if all digits are the same.
    /// - [`ValidationError::OutOfRange`] if the value is below 1,000,000.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let digits = clean_digits(&value.into());
        let expected = DocumentKind::Dni.expected_len();
        if digits.len() != expected {
            return Err(ValidationError::InvalidLength {
                document: "DNI",
                expected,
                actual: digits.len(),
            });
        }
        if let Some(reason) = degenerate_reason(&digits) {
            return Err(ValidationError::InvalidValue {
                document: "DNI",
                reason,
            });
        }
        let numeric: u64 = digits
            .parse()
            .map_err(|_| ValidationError::OutOfRange { value: 0 })?;
        if !(DNI_MIN..=DNI_MAX).contains(&numeric) {
            return Err(ValidationError::OutOfRange { value: numeric });
        }
        Ok(Self(digits))
    }

    /// Access the canonical 8-digit value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Dni {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RUC
// ---------------------------------------------------------------------------

/// Peruvian taxpayer registry number (SUNAT), 11 digits with a mod-11 check
/// digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Ruc(String);

impl_validating_deserialize!(Ruc);

impl Ruc {
    /// Create a RUC, stripping separators and validating the check digit.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidLength`] if the cleaned value is not 11 digits.
    /// - [`ValidationError::InvalidValue`] if all digits are the same.
    /// - [`ValidationError::ChecksumMismatch`] if the 11th digit is wrong.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let digits = clean_digits(&value.into());
        let expected = DocumentKind::Ruc.expected_len();
        if digits.len() != expected {
            return Err(ValidationError::InvalidLength {
                document: "RUC",
                expected,
                actual: digits.len(),
            });
        }
        if let Some(reason) = degenerate_reason(&digits) {
            return Err(ValidationError::InvalidValue {
                document: "RUC",
                reason,
            });
        }
        let values = digit_values(&digits);
        let expected_check = ruc_check_digit(&values[..10]);
        if values[10] != expected_check {
            return Err(ValidationError::ChecksumMismatch {
                expected: expected_check,
                actual: values[10],
            });
        }
        Ok(Self(digits))
    }

    /// Access the canonical 11-digit value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two-digit taxpayer-type prefix (`10`, `15`, `17`, `20`, ...).
    pub fn prefix(&self) -> &str {
        &self.0[..2]
    }

    /// Natural person for prefix `10`, legal entity otherwise.
    pub fn entity_kind(&self) -> EntityKind {
        entity_kind_for_ruc(&self.0)
    }
}

impl std::fmt::Display for Ruc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifier (kind + value)
// ---------------------------------------------------------------------------

/// A validated identifier of either kind.
///
/// Invariant: `kind == Dni ⇒ value.len() == 8`, `kind == Ruc ⇒ value.len() == 11`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIdentifier")]
pub struct Identifier {
    value: String,
    kind: DocumentKind,
}

/// Wire shape of [`Identifier`] before validation.
#[derive(Deserialize)]
struct RawIdentifier {
    value: String,
    kind: DocumentKind,
}

impl TryFrom<RawIdentifier> for Identifier {
    type Error = ValidationError;

    fn try_from(raw: RawIdentifier) -> Result<Self, Self::Error> {
        Self::parse(&raw.value, Some(raw.kind))
    }
}

impl Identifier {
    /// Validate raw input as an identifier.
    ///
    /// The kind is inferred from the digit count unless `kind` is given.
    pub fn parse(raw: &str, kind: Option<DocumentKind>) -> Result<Self, ValidationError> {
        let kind = kind.unwrap_or_else(|| DocumentKind::from_digit_count(clean_digits(raw).len()));
        let value = match kind {
            DocumentKind::Dni => Dni::new(raw)?.0,
            DocumentKind::Ruc => Ruc::new(raw)?.0,
        };
        Ok(Self { value, kind })
    }

    /// Canonical digits.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Document kind.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Entity kind: always natural person for DNI, prefix-derived for RUC.
    pub fn entity_kind(&self) -> EntityKind {
        match self.kind {
            DocumentKind::Dni => EntityKind::NaturalPerson,
            DocumentKind::Ruc => entity_kind_for_ruc(&self.value),
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.value)
    }
}

// ---------------------------------------------------------------------------
// Result-returning validators
// ---------------------------------------------------------------------------

/// Validate a DNI. Never fails; see [`Dni::new`] for the rules.
pub fn validate_dni(input: &str) -> ValidationResult {
    Dni::new(input).into()
}

/// Validate a RUC. Never fails; see [`Ruc::new`] for the rules.
pub fn validate_ruc(input: &str) -> ValidationResult {
    Ruc::new(input).into()
}

/// Validate as the given kind, or as the kind implied by the digit count.
pub fn validate_document(input: &str, kind: Option<DocumentKind>) -> ValidationResult {
    Identifier::parse(input, kind).into()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn expected_valid(s: &str) -> bool {
        let values = digit_values(s);
        let degenerate = values.iter().all(|d| *d == values[0]);
        !degenerate && ruc_check_digit(&values[..10]) == values[10]
    }

    proptest! {
        #[test]
        fn ruc_valid_iff_check_digit_matches(s in "[0-9]{11}") {
            prop_assert_eq!(validate_ruc(&s).valid, expected_valid(&s));
        }

        #[test]
        fn ruc_with_computed_check_digit_is_valid(body in "[1-9][0-9]{9}") {
            let values = digit_values(&body);
            let check = ruc_check_digit(&values);
            let ruc = format!("{body}{check}");
            prop_assume!(!values.iter().all(|d| *d == values[0]) || check != values[0]);
            prop_assert!(validate_ruc(&ruc).valid);
        }

        #[test]
        fn valid_dni_always_has_eight_digits(s in ".{0,20}") {
            if validate_dni(&s).valid {
                prop_assert_eq!(clean_digits(&s).len(), 8);
            }
        }

        #[test]
        fn separators_never_change_the_verdict(s in "[0-9]{11}") {
            let dashed = format!("{}-{}-{}", &s[..2], &s[2..10], &s[10..]);
            prop_assert_eq!(validate_ruc(&dashed).valid, validate_ruc(&s).valid);
        }
    }
}
