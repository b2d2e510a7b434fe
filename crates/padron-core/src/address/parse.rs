//! Registry address text handling.
//!
//! [`parse_freeform_address`] is a heuristic, not a grammar. It pulls out
//! whatever follows a `distrito`/`provincia` keyword and falls back to the
//! `lima`/`callao` tokens for the province. Guesses may be wrong or absent;
//! callers must present them as suggestions to confirm, never as facts.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ubigeo::fold_name;

/// `distrito`, `dist.`, `provincia`, `prov.`, `departamento`, followed by an
/// optional `:` and an optional `de`.
static LOCATION_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(distrito\b|dist\.|provincia\b|prov\.|departamento\b)(?:\s*:)?\s*(?:de\s+)?")
        .expect("location keyword pattern is valid")
});

static PROVINCE_FALLBACK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(lima|callao)\b").expect("province fallback pattern is valid")
});

const VALUE_TERMINATORS: &[char] = &[',', ';', '-', '/'];

/// Result of [`parse_freeform_address`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedAddress {
    /// Input with the recognised location fragments removed.
    pub specific_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guessed_district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guessed_province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guessed_department: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Level {
    District,
    Province,
    Department,
}

impl Level {
    fn from_keyword(keyword: &str) -> Self {
        let k = keyword.to_ascii_lowercase();
        if k.starts_with("dist") {
            Self::District
        } else if k.starts_with("prov") {
            Self::Province
        } else {
            Self::Department
        }
    }
}

/// Split registry free text into street part and location guesses.
pub fn parse_freeform_address(raw: &str) -> ParsedAddress {
    let keywords: Vec<(usize, usize, Level)> = LOCATION_KEYWORD
        .captures_iter(raw)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let keyword = caps.get(1)?;
            Some((
                whole.start(),
                whole.end(),
                Level::from_keyword(keyword.as_str()),
            ))
        })
        .collect();

    let mut parsed = ParsedAddress::default();
    let mut removed: Vec<(usize, usize)> = Vec::with_capacity(keywords.len());

    for (i, &(start, value_start, level)) in keywords.iter().enumerate() {
        let next_keyword = keywords.get(i + 1).map_or(raw.len(), |k| k.0);
        let value_end = raw[value_start..next_keyword]
            .find(VALUE_TERMINATORS)
            .map_or(next_keyword, |offset| value_start + offset);
        removed.push((start, value_end));

        let value = raw[value_start..value_end]
            .trim()
            .trim_end_matches('.')
            .trim();
        if value.is_empty() {
            continue;
        }
        let slot = match level {
            Level::District => &mut parsed.guessed_district,
            Level::Province => &mut parsed.guessed_province,
            Level::Department => &mut parsed.guessed_department,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    if parsed.guessed_province.is_none() {
        parsed.guessed_province = PROVINCE_FALLBACK.captures(raw).and_then(|caps| {
            let token = caps.get(1)?.as_str().to_ascii_lowercase();
            Some(if token == "lima" { "Lima" } else { "Callao" }.to_string())
        });
    }

    let mut remaining = String::with_capacity(raw.len());
    let mut cursor = 0;
    for (start, end) in removed {
        remaining.push_str(&raw[cursor..start]);
        remaining.push(' ');
        cursor = end;
    }
    remaining.push_str(&raw[cursor..]);
    parsed.specific_address = tidy(&remaining);
    parsed
}

/// Collapse whitespace, drop empty comma-separated segments and trim
/// leading/trailing separators. Idempotent.
fn tidy(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let joined = collapsed
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    joined
        .trim_matches(|c: char| c == ',' || c == '-' || c.is_whitespace())
        .to_string()
}

// ---------------------------------------------------------------------------
// Registry components
// ---------------------------------------------------------------------------

/// Address components as returned by the taxpayer registry.
///
/// Empty strings and the `"-"` sentinel both mean "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryAddressFields {
    pub way_type: String,
    pub way_name: String,
    pub number: String,
    pub interior: String,
    pub apartment: String,
    pub block: String,
    pub lot: String,
    pub kilometer: String,
    pub zone_code: String,
    pub zone_type: String,
    pub district: String,
    pub province: String,
    pub department: String,
}

/// Output of [`build_complete_address`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteAddress {
    /// Street part only.
    pub full_address: String,
    /// Street part plus ` - district, province, department`.
    pub formatted_address_with_location: String,
}

fn present(value: &str) -> Option<&str> {
    let v = value.trim();
    if v.is_empty() || v == "-" {
        None
    } else {
        Some(v)
    }
}

/// Assemble registry components in fixed order, skipping absent ones.
///
/// Province is omitted from the location suffix when it equals the district,
/// department when it equals the province.
pub fn build_complete_address(fields: &RegistryAddressFields) -> CompleteAddress {
    let labelled: [(&str, &str); 10] = [
        ("", &fields.way_type),
        ("", &fields.way_name),
        ("NRO.", &fields.number),
        ("INT.", &fields.interior),
        ("DPTO.", &fields.apartment),
        ("MZA.", &fields.block),
        ("LOTE", &fields.lot),
        ("KM.", &fields.kilometer),
        ("", &fields.zone_code),
        ("", &fields.zone_type),
    ];
    let full_address = labelled
        .iter()
        .filter_map(|(label, value)| {
            present(value).map(|v| {
                if label.is_empty() {
                    v.to_string()
                } else {
                    format!("{label} {v}")
                }
            })
        })
        .collect::<Vec<_>>()
        .join(" ");

    let district = present(&fields.district);
    let province = present(&fields.province);
    let department = present(&fields.department);
    let same = |a: Option<&str>, b: &str| a.map_or(false, |a| fold_name(a) == fold_name(b));

    let mut location: Vec<&str> = Vec::with_capacity(3);
    if let Some(d) = district {
        location.push(d);
    }
    if let Some(p) = province {
        if !same(district, p) {
            location.push(p);
        }
    }
    if let Some(dep) = department {
        if !same(province, dep) {
            location.push(dep);
        }
    }

    let formatted_address_with_location = match (full_address.is_empty(), location.is_empty()) {
        (_, true) => full_address.clone(),
        (true, false) => location.join(", "),
        (false, false) => format!("{} - {}", full_address, location.join(", ")),
    };

    CompleteAddress {
        full_address,
        formatted_address_with_location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- parse_freeform_address ---------------------------------------------

    #[test]
    fn extracts_district_and_province_keywords() {
        let parsed = parse_freeform_address(
            "Av. Los Próceres 123 distrito de Santiago de Surco, provincia Lima",
        );
        assert_eq!(parsed.specific_address, "Av. Los Próceres 123");
        assert_eq!(
            parsed.guessed_district.as_deref(),
            Some("Santiago de Surco")
        );
        assert_eq!(parsed.guessed_province.as_deref(), Some("Lima"));
    }

    #[test]
    fn abbreviated_keywords_stop_at_next_keyword() {
        let parsed = parse_freeform_address("Calle Las Flores 456 dist. Miraflores prov. Arequipa");
        assert_eq!(parsed.specific_address, "Calle Las Flores 456");
        assert_eq!(parsed.guessed_district.as_deref(), Some("Miraflores"));
        assert_eq!(parsed.guessed_province.as_deref(), Some("Arequipa"));
    }

    #[test]
    fn lima_token_is_province_fallback() {
        let parsed = parse_freeform_address("Jr. Huallaga 320 Cercado de Lima");
        assert_eq!(parsed.specific_address, "Jr. Huallaga 320 Cercado de Lima");
        assert!(parsed.guessed_district.is_none());
        assert_eq!(parsed.guessed_province.as_deref(), Some("Lima"));
    }

    #[test]
    fn callao_token_is_province_fallback() {
        let parsed = parse_freeform_address("AV. SAENZ PEÑA 250 CALLAO");
        assert_eq!(parsed.guessed_province.as_deref(), Some("Callao"));
    }

    #[test]
    fn no_hints_leaves_guesses_empty() {
        let parsed = parse_freeform_address("Mz. B Lt. 4 Urb. Las Palmeras");
        assert_eq!(parsed.specific_address, "Mz. B Lt. 4 Urb. Las Palmeras");
        assert!(parsed.guessed_district.is_none());
        assert!(parsed.guessed_province.is_none());
    }

    #[test]
    fn trailing_separators_are_trimmed() {
        let parsed = parse_freeform_address("  AV. PERU   123 ,, - ");
        assert_eq!(parsed.specific_address, "AV. PERU 123");
    }

    #[test]
    fn department_keyword_is_removed() {
        let parsed = parse_freeform_address("Calle Mercaderes 110, departamento: Arequipa");
        assert_eq!(parsed.specific_address, "Calle Mercaderes 110");
        assert_eq!(parsed.guessed_department.as_deref(), Some("Arequipa"));
    }

    #[test]
    fn empty_input() {
        let parsed = parse_freeform_address("");
        assert_eq!(parsed, ParsedAddress::default());
    }

    // -- build_complete_address ---------------------------------------------

    fn sunat_fields() -> RegistryAddressFields {
        RegistryAddressFields {
            way_type: "AV.".into(),
            way_name: "JAVIER PRADO ESTE".into(),
            number: "123".into(),
            interior: "-".into(),
            district: "SAN ISIDRO".into(),
            province: "LIMA".into(),
            department: "LIMA".into(),
            ..RegistryAddressFields::default()
        }
    }

    #[test]
    fn skips_empty_and_sentinel_components() {
        let built = build_complete_address(&sunat_fields());
        assert_eq!(built.full_address, "AV. JAVIER PRADO ESTE NRO. 123");
        assert_eq!(
            built.formatted_address_with_location,
            "AV. JAVIER PRADO ESTE NRO. 123 - SAN ISIDRO, LIMA"
        );
    }

    #[test]
    fn components_follow_fixed_order() {
        let fields = RegistryAddressFields {
            way_type: "CAL.".into(),
            way_name: "LOS PINOS".into(),
            interior: "2".into(),
            apartment: "301".into(),
            block: "C".into(),
            lot: "7".into(),
            kilometer: "4.5".into(),
            zone_code: "URB.".into(),
            zone_type: "SANTA CATALINA".into(),
            ..RegistryAddressFields::default()
        };
        let built = build_complete_address(&fields);
        assert_eq!(
            built.full_address,
            "CAL. LOS PINOS INT. 2 DPTO. 301 MZA. C LOTE 7 KM. 4.5 URB. SANTA CATALINA"
        );
        assert_eq!(built.formatted_address_with_location, built.full_address);
    }

    #[test]
    fn redundant_location_levels_collapse() {
        let fields = RegistryAddressFields {
            way_name: "JR. UNION".into(),
            district: "LIMA".into(),
            province: "LIMA".into(),
            department: "LIMA".into(),
            ..RegistryAddressFields::default()
        };
        assert_eq!(
            build_complete_address(&fields).formatted_address_with_location,
            "JR. UNION - LIMA"
        );
    }

    #[test]
    fn location_only() {
        let fields = RegistryAddressFields {
            district: "CAYMA".into(),
            province: "AREQUIPA".into(),
            department: "AREQUIPA".into(),
            ..RegistryAddressFields::default()
        };
        let built = build_complete_address(&fields);
        assert!(built.full_address.is_empty());
        assert_eq!(built.formatted_address_with_location, "CAYMA, AREQUIPA");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn has_keyword(s: &str) -> bool {
        LOCATION_KEYWORD.is_match(s)
    }

    proptest! {
        #[test]
        fn reparsing_cleaned_text_is_a_no_op(raw in "[A-Za-z0-9 ,.\\-]{0,60}") {
            prop_assume!(!has_keyword(&raw));
            let once = parse_freeform_address(&raw).specific_address;
            let twice = parse_freeform_address(&once).specific_address;
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn tidy_is_idempotent(raw in "[a-z ,\\-]{0,40}") {
            let once = tidy(&raw);
            prop_assert_eq!(tidy(&once), once.clone());
        }
    }
}
