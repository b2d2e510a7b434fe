//! Registry payloads and mapped results.
//!
//! [`RegistryPayload`] mirrors the gateway's JSON. Every field defaults so
//! that schema drift upstream degrades into warnings instead of parse
//! failures. [`MappedDocumentRecord`] is the normalized shape forms consume.

use chrono::{DateTime, Utc};
use padron_core::ubigeo::resolve_ubigeo;
use padron_core::{DataSource, DocumentKind, EntityKind, StructuredAddress};
use serde::{Deserialize, Deserializer, Serialize};

/// Raw record from the person or taxpayer registry.
///
/// Person responses use `first_name` / `first_last_name` style keys,
/// taxpayer responses the Spanish ones; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryPayload {
    #[serde(deserialize_with = "lenient_string")]
    pub razon_social: String,
    #[serde(alias = "document_number", deserialize_with = "lenient_string")]
    pub numero_documento: String,
    #[serde(deserialize_with = "lenient_string")]
    pub estado: String,
    #[serde(deserialize_with = "lenient_string")]
    pub condicion: String,
    #[serde(deserialize_with = "lenient_string")]
    pub direccion: String,
    #[serde(deserialize_with = "lenient_string")]
    pub ubigeo: String,
    #[serde(deserialize_with = "lenient_string")]
    pub via_tipo: String,
    #[serde(deserialize_with = "lenient_string")]
    pub via_nombre: String,
    #[serde(deserialize_with = "lenient_string")]
    pub zona_codigo: String,
    #[serde(deserialize_with = "lenient_string")]
    pub zona_tipo: String,
    #[serde(deserialize_with = "lenient_string")]
    pub numero: String,
    #[serde(deserialize_with = "lenient_string")]
    pub interior: String,
    #[serde(deserialize_with = "lenient_string")]
    pub lote: String,
    #[serde(deserialize_with = "lenient_string")]
    pub dpto: String,
    #[serde(deserialize_with = "lenient_string")]
    pub manzana: String,
    #[serde(deserialize_with = "lenient_string")]
    pub kilometro: String,
    #[serde(deserialize_with = "lenient_string")]
    pub distrito: String,
    #[serde(deserialize_with = "lenient_string")]
    pub provincia: String,
    #[serde(deserialize_with = "lenient_string")]
    pub departamento: String,
    #[serde(deserialize_with = "lenient_bool")]
    pub es_agente_retencion: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub es_buen_contribuyente: bool,
    #[serde(alias = "first_name", deserialize_with = "lenient_string")]
    pub nombres: String,
    #[serde(alias = "first_last_name", deserialize_with = "lenient_string")]
    pub apellido_paterno: String,
    #[serde(alias = "second_last_name", deserialize_with = "lenient_string")]
    pub apellido_materno: String,
    #[serde(alias = "nombre_completo", deserialize_with = "lenient_string")]
    pub full_name: String,
}

/// Accept strings, numbers and `null` (as empty text).
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Accept `true`/`false`, `"SI"`/`"NO"`, `"true"`/`"false"`, `1`/`0` and `null`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64().map_or(false, |n| n != 0),
        serde_json::Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "si" | "sí" | "true" | "1" | "s"
        ),
        _ => false,
    })
}

/// Normalized registry record.
///
/// Created once per successful lookup and never mutated; a fresh lookup
/// yields a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedDocumentRecord {
    pub legal_name: String,
    pub document_number: String,
    pub identifier_kind: DocumentKind,
    pub entity_kind: EntityKind,
    pub status: String,
    pub condition: String,
    /// Address text exactly as the registry sent it.
    pub raw_address: String,
    /// Street part, built from components or parsed from `raw_address`.
    pub street_address: String,
    /// Street part plus location suffix.
    pub formatted_address: String,
    pub district: String,
    pub province: String,
    pub department: String,
    /// Six-digit UBIGEO when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ubigeo_code: Option<String>,
    pub is_withholding_agent: bool,
    pub is_good_taxpayer: bool,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_names: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paternal_surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maternal_surname: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl MappedDocumentRecord {
    /// Surnames joined with a space, if any.
    pub fn surnames(&self) -> Option<String> {
        let joined = [&self.paternal_surname, &self.maternal_surname]
            .iter()
            .filter_map(|s| s.as_deref())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }

    /// Autocompleted form address. UBIGEO levels are filled from
    /// `ubigeo_code` as far as the reference data resolves it.
    pub fn to_structured_address(&self) -> StructuredAddress {
        let resolved = self.ubigeo_code.as_deref().and_then(resolve_ubigeo);
        let mut address = StructuredAddress {
            department: resolved.map(|r| r.department.code.to_string()),
            province: resolved
                .and_then(|r| r.province)
                .map(|p| p.code.to_string()),
            district: resolved
                .and_then(|r| r.district)
                .map(|d| d.code.to_string()),
            specific_address: self.street_address.clone(),
            reference: None,
            is_autocompleted: true,
            data_source: Some(match self.identifier_kind {
                DocumentKind::Dni => DataSource::RegistryPerson,
                DocumentKind::Ruc => DataSource::RegistryBusiness,
            }),
            validated: false,
        };
        address.revalidate();
        address
    }
}

/// Outcome of an autocomplete call, shaped for direct form consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<MappedDocumentRecord>,
    /// Spanish message for failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine code for failures (`NOT_FOUND`, `TIMEOUT`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub cached: bool,
    /// Wall time of the call in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
}

impl AutocompleteResult {
    /// Successful result; `cached` marks cache hits and stale fallbacks.
    pub fn success(data: MappedDocumentRecord, warnings: Vec<String>, cached: bool) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
            warnings,
            cached,
            response_time: None,
        }
    }

    /// Failed result carrying the error's message and code.
    pub fn failure(err: &crate::error::LookupError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            error_code: Some(err.code().to_string()),
            warnings: Vec::new(),
            cached: false,
            response_time: None,
        }
    }

    pub(crate) fn timed(mut self, elapsed_ms: u64) -> Self {
        self.response_time = Some(elapsed_ms);
        self
    }

    /// Whether this failed with the given machine code.
    pub fn has_error_code(&self, code: &str) -> bool {
        self.error_code.as_deref() == Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MappedDocumentRecord {
        MappedDocumentRecord {
            legal_name: "ACME SAC".into(),
            document_number: "20131312955".into(),
            identifier_kind: DocumentKind::Ruc,
            entity_kind: EntityKind::LegalEntity,
            status: "ACTIVO".into(),
            condition: "HABIDO".into(),
            raw_address: "AV. JAVIER PRADO ESTE NRO. 123".into(),
            street_address: "AV. JAVIER PRADO ESTE NRO. 123".into(),
            formatted_address: "AV. JAVIER PRADO ESTE NRO. 123 - SAN ISIDRO, LIMA".into(),
            district: "SAN ISIDRO".into(),
            province: "LIMA".into(),
            department: "LIMA".into(),
            ubigeo_code: Some("150131".into()),
            is_withholding_agent: false,
            is_good_taxpayer: true,
            is_active: true,
            given_names: None,
            paternal_surname: None,
            maternal_surname: None,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn payload_tolerates_missing_and_unknown_fields() {
        let payload: RegistryPayload = serde_json::from_value(serde_json::json!({
            "razon_social": "ACME SAC",
            "numero_documento": "20131312955",
            "campo_nuevo": {"x": 1}
        }))
        .expect("parse");
        assert_eq!(payload.razon_social, "ACME SAC");
        assert!(payload.estado.is_empty());
        assert!(!payload.es_agente_retencion);
    }

    #[test]
    fn payload_accepts_person_keys() {
        let payload: RegistryPayload = serde_json::from_value(serde_json::json!({
            "first_name": "JUAN CARLOS",
            "first_last_name": "PEREZ",
            "second_last_name": "QUISPE",
            "full_name": "PEREZ QUISPE JUAN CARLOS",
            "document_number": "87654321"
        }))
        .expect("parse");
        assert_eq!(payload.nombres, "JUAN CARLOS");
        assert_eq!(payload.apellido_paterno, "PEREZ");
        assert_eq!(payload.numero_documento, "87654321");
    }

    #[test]
    fn flags_accept_string_forms() {
        let payload: RegistryPayload = serde_json::from_value(serde_json::json!({
            "es_agente_retencion": "SI",
            "es_buen_contribuyente": null
        }))
        .expect("parse");
        assert!(payload.es_agente_retencion);
        assert!(!payload.es_buen_contribuyente);
    }

    #[test]
    fn null_and_numeric_components_become_text() {
        let payload: RegistryPayload = serde_json::from_value(serde_json::json!({
            "razon_social": "ACME SAC",
            "numero_documento": "20131312955",
            "interior": null,
            "manzana": null,
            "numero": 123,
            "first_name": null
        }))
        .expect("parse");
        assert_eq!(payload.razon_social, "ACME SAC");
        assert!(payload.interior.is_empty());
        assert!(payload.manzana.is_empty());
        assert!(payload.nombres.is_empty());
        assert_eq!(payload.numero, "123");
    }

    #[test]
    fn structured_address_resolves_ubigeo() {
        let addr = record().to_structured_address();
        assert_eq!(addr.department.as_deref(), Some("15"));
        assert_eq!(addr.province.as_deref(), Some("1501"));
        assert_eq!(addr.district.as_deref(), Some("150131"));
        assert!(addr.is_autocompleted);
        assert_eq!(addr.data_source, Some(DataSource::RegistryBusiness));
        assert!(addr.validated);
    }

    #[test]
    fn result_serializes_camel_case() {
        let result = AutocompleteResult::success(record(), Vec::new(), true).timed(12);
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["success"], true);
        assert_eq!(json["cached"], true);
        assert_eq!(json["responseTime"], 12);
        assert_eq!(json["data"]["legalName"], "ACME SAC");
        assert_eq!(json["data"]["entityKind"], "LEGAL_ENTITY");
        assert!(json.get("warnings").is_none());
    }
}
