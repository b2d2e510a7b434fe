//! Raw registry payload → [`MappedDocumentRecord`].
//!
//! ## Rules
//!
//! - `legal_name` is `razon_social`, falling back to `full_name`, then to
//!   the name parts. It and `document_number` are mandatory: a record
//!   without them is [`LookupError::IncompleteRecord`].
//! - `entity_kind` is always natural person for DNI; for RUC it follows the
//!   prefix of the returned number.
//! - `is_active` is `estado == ACTIVO && condicion == HABIDO` (English
//!   spellings accepted).
//! - Taxpayer records missing status, condition or address produce
//!   warnings, not errors.
//! - The street part is assembled from the structured components. When the
//!   registry sends only free text, [`parse_freeform_address`] supplies the
//!   street part and location guesses.

use chrono::Utc;
use padron_core::classifier::entity_kind_for_ruc;
use padron_core::ubigeo::{
    find_department_by_name, find_district_by_name, find_province_by_name,
};
use padron_core::{
    build_complete_address, parse_freeform_address, DocumentKind, EntityKind, Identifier,
    RegistryAddressFields,
};

use crate::error::LookupError;
use crate::types::{MappedDocumentRecord, RegistryPayload};

/// A mapped record plus non-fatal findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapped {
    pub record: MappedDocumentRecord,
    pub warnings: Vec<String>,
}

fn clean(value: &str) -> String {
    let v = value.trim();
    if v == "-" {
        String::new()
    } else {
        v.to_string()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn is_active(status: &str, condition: &str) -> bool {
    let status = status.to_ascii_uppercase();
    let condition = condition.to_ascii_uppercase();
    matches!(status.as_str(), "ACTIVO" | "ACTIVE")
        && matches!(condition.as_str(), "HABIDO" | "FOUND")
}

/// Six-digit UBIGEO from the payload, or from the location names.
fn ubigeo_code(
    payload_code: &str,
    department: &str,
    province: &str,
    district: &str,
) -> Option<String> {
    let code = payload_code.trim();
    if code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
        return Some(code.to_string());
    }
    let department = find_department_by_name(department)?;
    let province = find_province_by_name(Some(department.code), province)?;
    let district = find_district_by_name(Some(province.code), district)?;
    Some(district.code.to_string())
}

/// Map a raw payload fetched for `identifier`.
pub fn map_payload(
    payload: RegistryPayload,
    identifier: &Identifier,
) -> Result<Mapped, LookupError> {
    let kind = identifier.kind();
    let mut warnings = Vec::new();

    let given_names = non_empty(clean(&payload.nombres));
    let paternal_surname = non_empty(clean(&payload.apellido_paterno));
    let maternal_surname = non_empty(clean(&payload.apellido_materno));

    let legal_name = [clean(&payload.razon_social), clean(&payload.full_name)]
        .into_iter()
        .find(|n| !n.is_empty())
        .unwrap_or_else(|| {
            [&paternal_surname, &maternal_surname, &given_names]
                .iter()
                .filter_map(|p| p.as_deref())
                .collect::<Vec<_>>()
                .join(" ")
        });
    let document_number = padron_core::clean_digits(&payload.numero_documento);

    let mut missing = Vec::new();
    if legal_name.is_empty() {
        missing.push("nombre o razón social");
    }
    if document_number.is_empty() {
        missing.push("número de documento");
    }
    if !missing.is_empty() {
        return Err(LookupError::IncompleteRecord {
            missing: missing.join(", "),
        });
    }
    if document_number != identifier.as_str() {
        tracing::warn!(
            identifier = identifier.as_str(),
            returned = %document_number,
            "registry returned a different document number"
        );
        warnings.push(format!(
            "El registro devolvió el documento {document_number} en lugar de {}",
            identifier.as_str()
        ));
    }

    let entity_kind = match kind {
        DocumentKind::Dni => EntityKind::NaturalPerson,
        DocumentKind::Ruc => entity_kind_for_ruc(&document_number),
    };

    let status = clean(&payload.estado).to_uppercase();
    let condition = clean(&payload.condicion).to_uppercase();
    let raw_address = clean(&payload.direccion);

    let fields = RegistryAddressFields {
        way_type: payload.via_tipo,
        way_name: payload.via_nombre,
        number: payload.numero,
        interior: payload.interior,
        apartment: payload.dpto,
        block: payload.manzana,
        lot: payload.lote,
        kilometer: payload.kilometro,
        zone_code: payload.zona_codigo,
        zone_type: payload.zona_tipo,
        district: clean(&payload.distrito),
        province: clean(&payload.provincia),
        department: clean(&payload.departamento),
    };

    let mut district = fields.district.clone();
    let mut province = fields.province.clone();
    let department = fields.department.clone();

    let built = build_complete_address(&fields);
    let (street_address, formatted_address) = if !built.full_address.is_empty() {
        (built.full_address, built.formatted_address_with_location)
    } else if !raw_address.is_empty() {
        let parsed = parse_freeform_address(&raw_address);
        if district.is_empty() {
            district = parsed.guessed_district.unwrap_or_default();
        }
        if province.is_empty() {
            province = parsed.guessed_province.unwrap_or_default();
        }
        (parsed.specific_address, raw_address.clone())
    } else {
        (String::new(), built.formatted_address_with_location)
    };

    if kind == DocumentKind::Ruc {
        if status.is_empty() {
            warnings.push("El registro no incluye el estado del contribuyente".to_string());
        }
        if condition.is_empty() {
            warnings.push("El registro no incluye la condición del contribuyente".to_string());
        }
        if street_address.is_empty() {
            warnings.push("El registro no incluye la dirección fiscal".to_string());
        }
    }

    let ubigeo_code = ubigeo_code(&payload.ubigeo, &department, &province, &district);

    let record = MappedDocumentRecord {
        is_active: is_active(&status, &condition),
        legal_name,
        document_number,
        identifier_kind: kind,
        entity_kind,
        status,
        condition,
        raw_address,
        street_address,
        formatted_address,
        district,
        province,
        department,
        ubigeo_code,
        is_withholding_agent: payload.es_agente_retencion,
        is_good_taxpayer: payload.es_buen_contribuyente,
        given_names,
        paternal_surname,
        maternal_surname,
        fetched_at: Utc::now(),
    };

    Ok(Mapped { record, warnings })
}
