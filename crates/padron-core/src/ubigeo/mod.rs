//! # Address Reference Store (UBIGEO)
//!
//! Static, read-only geography reference: departments → provinces →
//! districts, keyed by INEI UBIGEO codes (2, 4 and 6 digits).
//!
//! The tables live in `static` arrays, so every operation is a pure read and
//! safe to call from any number of threads.
//!
//! ## Partial data
//!
//! All 25 departments are present. Provinces and districts are populated
//! only for Lima, Callao and Arequipa; listing the children of any other
//! unit returns an empty sequence. Swapping in a complete dataset only
//! requires replacing [`data`].
//!
//! ## Name matching
//!
//! Filters and name lookups compare [`fold_name`] forms: lowercased with
//! Spanish diacritics removed, so registry spellings such as `"JESUS MARIA"`
//! match `"Jesús María"`.

mod data;

use serde::Serialize;

use crate::error::ValidationError;

/// Top-level administrative unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Department {
    /// Two-digit code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
}

/// Second-level unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Province {
    /// Four-digit code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Owning department.
    pub department_code: &'static str,
}

/// Third-level unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
    /// Six-digit code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Owning province.
    pub province_code: &'static str,
    /// Owning department.
    pub department_code: &'static str,
}

/// A UBIGEO code resolved against the reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedUbigeo {
    /// Always present: the first two digits.
    pub department: &'static Department,
    /// Present for 4 and 6 digit codes.
    pub province: Option<&'static Province>,
    /// Present for 6 digit codes.
    pub district: Option<&'static District>,
}

/// Lowercase and strip Spanish diacritics.
pub fn fold_name(name: &str) -> String {
    name.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

fn name_contains(name: &str, term: &str) -> bool {
    let term = fold_name(term);
    term.is_empty() || fold_name(name).contains(&term)
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// All departments in canonical display order.
pub fn list_departments() -> &'static [Department] {
    &data::DEPARTMENTS
}

/// Provinces of a department; empty for unknown or unpopulated departments.
pub fn list_provinces(department_code: &str) -> Vec<&'static Province> {
    data::PROVINCES
        .iter()
        .filter(|p| p.department_code == department_code)
        .collect()
}

/// Districts of a province; empty for unknown or unpopulated provinces.
pub fn list_districts(province_code: &str) -> Vec<&'static District> {
    data::DISTRICTS
        .iter()
        .filter(|d| d.province_code == province_code)
        .collect()
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Departments whose name contains `term`. An empty term matches all.
pub fn filter_departments(term: &str) -> Vec<&'static Department> {
    data::DEPARTMENTS
        .iter()
        .filter(|d| name_contains(d.name, term))
        .collect()
}

/// Provinces of `department_code` whose name contains `term`.
pub fn filter_provinces(department_code: &str, term: &str) -> Vec<&'static Province> {
    list_provinces(department_code)
        .into_iter()
        .filter(|p| name_contains(p.name, term))
        .collect()
}

/// Districts of `province_code` whose name contains `term`.
pub fn filter_districts(province_code: &str, term: &str) -> Vec<&'static District> {
    list_districts(province_code)
        .into_iter()
        .filter(|d| name_contains(d.name, term))
        .collect()
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Department by two-digit code.
pub fn find_department(code: &str) -> Option<&'static Department> {
    data::DEPARTMENTS.iter().find(|d| d.code == code)
}

/// Province by four-digit code.
pub fn find_province(code: &str) -> Option<&'static Province> {
    data::PROVINCES.iter().find(|p| p.code == code)
}

/// District by six-digit code.
pub fn find_district(code: &str) -> Option<&'static District> {
    data::DISTRICTS.iter().find(|d| d.code == code)
}

/// Department whose folded name equals the folded `name`.
pub fn find_department_by_name(name: &str) -> Option<&'static Department> {
    let folded = fold_name(name);
    data::DEPARTMENTS.iter().find(|d| fold_name(d.name) == folded)
}

/// Province by exact folded name, optionally restricted to a department.
pub fn find_province_by_name(
    department_code: Option<&str>,
    name: &str,
) -> Option<&'static Province> {
    let folded = fold_name(name);
    data::PROVINCES.iter().find(|p| {
        department_code.map_or(true, |d| p.department_code == d) && fold_name(p.name) == folded
    })
}

/// District by exact folded name, optionally restricted to a province.
///
/// District names repeat across provinces (Miraflores exists in Lima and
/// Arequipa); without a province the first match in code order wins.
pub fn find_district_by_name(
    province_code: Option<&str>,
    name: &str,
) -> Option<&'static District> {
    let folded = fold_name(name);
    data::DISTRICTS.iter().find(|d| {
        province_code.map_or(true, |p| d.province_code == p) && fold_name(d.name) == folded
    })
}

/// Resolve a 2, 4 or 6 digit UBIGEO code.
///
/// Returns `None` when the department is unknown. Deeper levels missing
/// from the partial tables resolve to `None` rather than failing.
pub fn resolve_ubigeo(code: &str) -> Option<ResolvedUbigeo> {
    let code = code.trim();
    if !matches!(code.len(), 2 | 4 | 6) || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let department = find_department(&code[..2])?;
    let province = if code.len() >= 4 {
        find_province(&code[..4])
    } else {
        None
    };
    let district = if code.len() == 6 {
        find_district(code)
    } else {
        None
    };
    Some(ResolvedUbigeo {
        department,
        province,
        district,
    })
}

// ---------------------------------------------------------------------------
// Consistency
// ---------------------------------------------------------------------------

/// Check that the selected codes exist and nest correctly.
///
/// Only consistency is checked here: absent levels are not errors. Presence
/// rules belong to the address validator.
pub fn validate_location(
    department: Option<&str>,
    province: Option<&str>,
    district: Option<&str>,
) -> Result<(), ValidationError> {
    if let Some(code) = department {
        if find_department(code).is_none() {
            return Err(ValidationError::UnknownLocation {
                level: "departamento",
                code: code.to_string(),
            });
        }
    }

    if let Some(code) = province {
        let found = find_province(code).ok_or_else(|| ValidationError::UnknownLocation {
            level: "provincia",
            code: code.to_string(),
        })?;
        if let Some(dept) = department {
            if found.department_code != dept {
                return Err(ValidationError::InconsistentLocation {
                    child: "provincia",
                    code: code.to_string(),
                    parent: "departamento",
                    parent_code: dept.to_string(),
                });
            }
        }
    }

    if let Some(code) = district {
        let found = find_district(code).ok_or_else(|| ValidationError::UnknownLocation {
            level: "distrito",
            code: code.to_string(),
        })?;
        if let Some(prov) = province {
            if found.province_code != prov {
                return Err(ValidationError::InconsistentLocation {
                    child: "distrito",
                    code: code.to_string(),
                    parent: "provincia",
                    parent_code: prov.to_string(),
                });
            }
        } else if let Some(dept) = department {
            if found.department_code != dept {
                return Err(ValidationError::InconsistentLocation {
                    child: "distrito",
                    code: code.to_string(),
                    parent: "departamento",
                    parent_code: dept.to_string(),
                });
            }
        }
    }

    Ok(())
}
