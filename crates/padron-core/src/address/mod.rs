//! # Structured Addresses
//!
//! [`StructuredAddress`] is the form-owned address record: a UBIGEO
//! selection (department, province, district codes) plus the free-text
//! street part. It is mutated field by field, and every mutation recomputes
//! `validated`.
//!
//! - [`parse`]: best-effort extraction of district/province hints from
//!   registry free text, and assembly of registry address components.
//! - [`validate`]: completeness and plausibility rules.

pub mod parse;
pub mod validate;

use serde::{Deserialize, Serialize};

pub use parse::{
    build_complete_address, parse_freeform_address, CompleteAddress, ParsedAddress,
    RegistryAddressFields,
};
pub use validate::{
    validate_lenient_address_text, validate_physical_address_text, validate_structured_address,
    AddressReport, FieldError,
};

/// Where the address data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    /// Autocompleted from the person registry (RENIEC).
    RegistryPerson,
    /// Autocompleted from the taxpayer registry (SUNAT).
    RegistryBusiness,
    /// Typed by the user.
    Manual,
}

/// Address as held by a form.
///
/// Invariant: `province` set ⇒ `department` set and consistent;
/// `district` set ⇒ `province` set and consistent. The setters enforce it by
/// clearing dependent levels when a parent changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default)]
    pub specific_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default)]
    pub is_autocompleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSource>,
    #[serde(default)]
    pub validated: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl StructuredAddress {
    /// Empty manual address.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a department. Province and district are cleared when it changes.
    pub fn set_department(&mut self, code: Option<String>) -> AddressReport {
        let code = non_empty(code);
        if code != self.department {
            self.province = None;
            self.district = None;
        }
        self.department = code;
        self.revalidate()
    }

    /// Select a province. The district is cleared when it changes.
    pub fn set_province(&mut self, code: Option<String>) -> AddressReport {
        let code = non_empty(code);
        if code != self.province {
            self.district = None;
        }
        self.province = code;
        self.revalidate()
    }

    /// Select a district.
    pub fn set_district(&mut self, code: Option<String>) -> AddressReport {
        self.district = non_empty(code);
        self.revalidate()
    }

    /// Replace the street part. Marks the address as manually edited.
    pub fn set_specific_address(&mut self, text: impl Into<String>) -> AddressReport {
        self.specific_address = text.into();
        self.is_autocompleted = false;
        self.data_source = Some(DataSource::Manual);
        self.revalidate()
    }

    /// Set or clear the optional reference ("frente al parque").
    pub fn set_reference(&mut self, text: Option<String>) -> AddressReport {
        self.reference = non_empty(text);
        self.revalidate()
    }

    /// Run the structured validator and store the verdict in `validated`.
    pub fn revalidate(&mut self) -> AddressReport {
        let report = validate_structured_address(self);
        self.validated = report.is_valid();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changing_department_clears_children() {
        let mut addr = StructuredAddress::new();
        addr.set_department(Some("15".into()));
        addr.set_province(Some("1501".into()));
        addr.set_district(Some("150122".into()));
        addr.set_department(Some("04".into()));
        assert_eq!(addr.department.as_deref(), Some("04"));
        assert!(addr.province.is_none());
        assert!(addr.district.is_none());
    }

    #[test]
    fn reselecting_same_department_keeps_children() {
        let mut addr = StructuredAddress::new();
        addr.set_department(Some("15".into()));
        addr.set_province(Some("1501".into()));
        addr.set_department(Some("15".into()));
        assert_eq!(addr.province.as_deref(), Some("1501"));
    }

    #[test]
    fn validated_is_recomputed_on_every_mutation() {
        let mut addr = StructuredAddress::new();
        addr.set_specific_address("Av. Arequipa 1234");
        assert!(!addr.validated);
        addr.set_department(Some("15".into()));
        addr.set_province(Some("1501".into()));
        assert!(addr.validated);
        addr.set_specific_address("sin datos");
        assert!(!addr.validated);
    }

    #[test]
    fn manual_edit_clears_autocomplete_flag() {
        let mut addr = StructuredAddress {
            is_autocompleted: true,
            data_source: Some(DataSource::RegistryBusiness),
            ..StructuredAddress::default()
        };
        addr.set_specific_address("Jr. Junín 455");
        assert!(!addr.is_autocompleted);
        assert_eq!(addr.data_source, Some(DataSource::Manual));
    }

    #[test]
    fn serializes_camel_case() {
        let addr = StructuredAddress {
            specific_address: "Av. Uno 123".into(),
            data_source: Some(DataSource::RegistryPerson),
            ..StructuredAddress::default()
        };
        let json = serde_json::to_value(&addr).expect("serialize");
        assert_eq!(json["specificAddress"], "Av. Uno 123");
        assert_eq!(json["dataSource"], "REGISTRY_PERSON");
        assert_eq!(json["isAutocompleted"], false);
        assert!(json.get("department").is_none());
    }
}
