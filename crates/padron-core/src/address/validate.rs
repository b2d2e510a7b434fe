//! Address plausibility rules.
//!
//! Three strengths of check:
//!
//! - [`validate_structured_address`]: a form's full address. Street text must
//!   be at least 10 characters, not a placeholder, and contain a digit;
//!   department and province are required, district only recommended.
//! - [`validate_physical_address_text`]: free text that must look like a
//!   real street address (at least two of street keyword, digit, distance
//!   keyword).
//! - [`validate_lenient_address_text`]: optional addresses such as supplier
//!   records. Only empty, too-short or degenerate text is rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::StructuredAddress;
use crate::error::{ValidationError, ValidationResult};
use crate::ubigeo::{fold_name, validate_location};

/// Minimum trimmed length of a structured address's street part.
pub const MIN_SPECIFIC_ADDRESS_LEN: usize = 10;

/// Minimum trimmed length accepted by the lenient check.
pub const MIN_LENIENT_ADDRESS_LEN: usize = 3;

/// Phrases users type instead of an address. Matched after folding.
pub const PLACEHOLDER_PHRASES: &[&str] = &[
    "sin dirección",
    "no tiene",
    "n/a",
    "ninguna",
    "no aplica",
    "sin datos",
];

static STREET_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(av|avenida|jr|jir[oó]n|calle|ca|psje|pasaje|mz|manzana|lt|lote|urb|urbanizaci[oó]n|pueblo|villa|sector|zona)\b",
    )
    .expect("street keyword pattern is valid")
});

static DISTANCE_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(cuadra|cdra|km|kil[oó]metros?|metros?|mts)\b")
        .expect("distance keyword pattern is valid")
});

/// A failed rule attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Field name as exposed to forms (`specificAddress`, `department`, ...).
    pub field: String,
    pub message: String,
    pub code: String,
}

impl FieldError {
    fn new(field: &str, err: &ValidationError) -> Self {
        Self {
            field: field.to_string(),
            message: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

/// Outcome of [`validate_structured_address`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressReport {
    /// The street part passed every text rule.
    pub address_complete: bool,
    /// Department and province are present and the selection is consistent.
    pub location_valid: bool,
    pub errors: Vec<FieldError>,
}

impl AddressReport {
    /// Street text and location both pass.
    pub fn is_valid(&self) -> bool {
        self.address_complete && self.location_valid
    }

    /// First error for `field`, if any.
    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

fn placeholder_in(text: &str) -> Option<&'static str> {
    let folded = fold_name(text);
    PLACEHOLDER_PHRASES
        .iter()
        .find(|phrase| folded.contains(&fold_name(phrase)))
        .copied()
}

/// Non-empty text made of one repeated character, ignoring whitespace.
fn is_degenerate(text: &str) -> bool {
    let mut chars = text.chars().filter(|c| !c.is_whitespace());
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => false,
    }
}

fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

fn check_specific_address(text: &str) -> Result<(), ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyAddress);
    }
    let len = trimmed.chars().count();
    if len < MIN_SPECIFIC_ADDRESS_LEN {
        return Err(ValidationError::AddressTooShort {
            min: MIN_SPECIFIC_ADDRESS_LEN,
            actual: len,
        });
    }
    if let Some(phrase) = placeholder_in(trimmed) {
        return Err(ValidationError::PlaceholderAddress {
            phrase: phrase.to_string(),
        });
    }
    if !has_digit(trimmed) {
        return Err(ValidationError::AddressMissingNumber);
    }
    Ok(())
}

fn selected(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Validate a form's address.
///
/// A missing district is reported but does not make `location_valid` false.
pub fn validate_structured_address(addr: &StructuredAddress) -> AddressReport {
    let mut errors = Vec::new();

    let address_complete = match check_specific_address(&addr.specific_address) {
        Ok(()) => true,
        Err(e) => {
            errors.push(FieldError::new("specificAddress", &e));
            false
        }
    };

    let department = selected(&addr.department);
    let province = selected(&addr.province);
    let district = selected(&addr.district);
    let mut location_valid = true;

    if department.is_none() {
        errors.push(FieldError::new("department", &ValidationError::MissingDepartment));
        location_valid = false;
    }
    if province.is_none() {
        errors.push(FieldError::new("province", &ValidationError::MissingProvince));
        location_valid = false;
    }
    if district.is_none() {
        errors.push(FieldError::new("district", &ValidationError::MissingDistrict));
    }

    if let Err(e) = validate_location(department, province, district) {
        let field = match &e {
            ValidationError::UnknownLocation { level, .. }
            | ValidationError::InconsistentLocation { child: level, .. } => match *level {
                "departamento" => "department",
                "provincia" => "province",
                _ => "district",
            },
            _ => "district",
        };
        errors.push(FieldError::new(field, &e));
        location_valid = false;
    }

    AddressReport {
        address_complete,
        location_valid,
        errors,
    }
}

/// Require free text to look like a physical street address.
pub fn validate_physical_address_text(text: &str) -> ValidationResult {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ValidationError::EmptyAddress.into();
    }
    if let Some(phrase) = placeholder_in(trimmed) {
        return ValidationError::PlaceholderAddress {
            phrase: phrase.to_string(),
        }
        .into();
    }
    if is_degenerate(trimmed) {
        return ValidationError::DegenerateAddress.into();
    }

    let matched = [
        STREET_KEYWORD.is_match(trimmed),
        has_digit(trimmed),
        DISTANCE_KEYWORD.is_match(trimmed),
    ]
    .iter()
    .filter(|m| **m)
    .count();

    if matched < 2 {
        return ValidationError::AddressNotSpecific.into();
    }
    ValidationResult::ok()
}

/// Reject only empty, too-short or degenerate text.
pub fn validate_lenient_address_text(text: &str) -> ValidationResult {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ValidationError::EmptyAddress.into();
    }
    let len = trimmed.chars().count();
    if len < MIN_LENIENT_ADDRESS_LEN {
        return ValidationError::AddressTooShort {
            min: MIN_LENIENT_ADDRESS_LEN,
            actual: len,
        }
        .into();
    }
    if is_degenerate(trimmed) {
        return ValidationError::DegenerateAddress.into();
    }
    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(
        text: &str,
        dept: Option<&str>,
        prov: Option<&str>,
        dist: Option<&str>,
    ) -> StructuredAddress {
        StructuredAddress {
            specific_address: text.to_string(),
            department: dept.map(String::from),
            province: prov.map(String::from),
            district: dist.map(String::from),
            ..StructuredAddress::default()
        }
    }

    // -- structured ---------------------------------------------------------

    #[test]
    fn complete_text_without_location() {
        let report = validate_structured_address(&address("Av. Uno 123", None, None, None));
        assert!(report.address_complete);
        assert!(!report.location_valid);
        assert_eq!(
            report.error_for("department").map(|e| e.code.as_str()),
            Some("MISSING_DEPARTMENT")
        );
        assert_eq!(
            report.error_for("province").map(|e| e.code.as_str()),
            Some("MISSING_PROVINCE")
        );
    }

    #[test]
    fn missing_district_is_only_a_recommendation() {
        let report =
            validate_structured_address(&address("Av. Uno 123", Some("15"), Some("1501"), None));
        assert!(report.location_valid);
        assert!(report.is_valid());
        let district = report.error_for("district").expect("district reported");
        assert_eq!(district.code, "MISSING_DISTRICT");
    }

    #[test]
    fn fully_selected_address_has_no_errors() {
        let report = validate_structured_address(&address(
            "Jr. Junín 455 Of. 3",
            Some("15"),
            Some("1501"),
            Some("150101"),
        ));
        assert!(report.is_valid());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn short_text_is_incomplete() {
        let report = validate_structured_address(&address("Av. 1", Some("15"), Some("1501"), None));
        assert!(!report.address_complete);
        assert_eq!(
            report.error_for("specificAddress").map(|e| e.code.as_str()),
            Some("ADDRESS_TOO_SHORT")
        );
    }

    #[test]
    fn placeholder_text_is_rejected() {
        let report = validate_structured_address(&address(
            "SIN DIRECCION 000",
            Some("15"),
            Some("1501"),
            None,
        ));
        assert_eq!(
            report.error_for("specificAddress").map(|e| e.code.as_str()),
            Some("PLACEHOLDER_ADDRESS")
        );
    }

    #[test]
    fn text_without_number_is_rejected() {
        let report = validate_structured_address(&address(
            "Avenida Principal",
            Some("15"),
            Some("1501"),
            None,
        ));
        assert_eq!(
            report.error_for("specificAddress").map(|e| e.code.as_str()),
            Some("ADDRESS_MISSING_NUMBER")
        );
    }

    #[test]
    fn inconsistent_selection_invalidates_location() {
        let report = validate_structured_address(&address(
            "Av. Uno 123",
            Some("04"),
            Some("1501"),
            None,
        ));
        assert!(!report.location_valid);
        assert_eq!(
            report.error_for("province").map(|e| e.code.as_str()),
            Some("INCONSISTENT_LOCATION")
        );
    }

    // -- physical text ------------------------------------------------------

    #[test]
    fn street_keyword_and_number_pass() {
        assert!(validate_physical_address_text("Av. Arequipa 1234").valid);
        assert!(validate_physical_address_text("Jirón Puno 455").valid);
    }

    #[test]
    fn keyword_and_distance_pass_without_number() {
        assert!(
            validate_physical_address_text("Carretera Central km treinta, sector La Era").valid
        );
    }

    #[test]
    fn single_pattern_class_is_not_specific() {
        let result = validate_physical_address_text("Frente al parque principal");
        assert!(result.has_code("ADDRESS_NOT_SPECIFIC"));
        assert!(validate_physical_address_text("Casa 5").has_code("ADDRESS_NOT_SPECIFIC"));
    }

    #[test]
    fn placeholders_and_degenerate_text_are_rejected() {
        assert!(validate_physical_address_text("No aplica").has_code("PLACEHOLDER_ADDRESS"));
        assert!(validate_physical_address_text("n/a calle 1").has_code("PLACEHOLDER_ADDRESS"));
        assert!(validate_physical_address_text("xxxxxxxx").has_code("DEGENERATE_ADDRESS"));
        assert!(validate_physical_address_text("   ").has_code("EMPTY_ADDRESS"));
    }

    // -- lenient text -------------------------------------------------------

    #[test]
    fn lenient_accepts_plain_text() {
        assert!(validate_lenient_address_text("Mercado central, puesto doce").valid);
    }

    #[test]
    fn lenient_rejects_short_and_degenerate() {
        assert!(validate_lenient_address_text("ab").has_code("ADDRESS_TOO_SHORT"));
        assert!(validate_lenient_address_text("------").has_code("DEGENERATE_ADDRESS"));
        assert!(validate_lenient_address_text("").has_code("EMPTY_ADDRESS"));
    }
}
