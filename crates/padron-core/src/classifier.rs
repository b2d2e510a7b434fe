//! # Document Classifier
//!
//! Infers the identifier kind (DNI vs RUC) from the digit count and the
//! legal-entity kind (natural person vs legal entity) from the RUC prefix.
//!
//! ## Typing-time heuristic
//!
//! Classification runs on every keystroke, before the user has finished
//! entering the number. Input is normalized to digits and truncated to 11;
//! nine or more digits means RUC, anything shorter means DNI.
//!
//! [`classify`] is stateless and re-evaluates on every call, so deleting back
//! below nine digits flips the kind back to DNI. [`KindTracker`] with
//! [`ClassificationPolicy::Sticky`] keeps RUC once reached until the field is
//! cleared.
//!
//! ## RUC prefixes
//!
//! | Prefix | Entity kind |
//! |--------|-------------|
//! | `10`   | Natural person with business activity |
//! | other (`15`, `17`, `20`, ...) | Legal entity |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::normalize_input;

/// Digit count at which input is treated as a RUC.
pub const RUC_THRESHOLD: usize = 9;

/// RUC prefix reserved for natural persons.
pub const NATURAL_PERSON_RUC_PREFIX: &str = "10";

/// Kind of Peruvian identity document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    /// Documento Nacional de Identidad. 8 digits, natural persons (RENIEC).
    Dni,
    /// Registro Único de Contribuyentes. 11 digits, taxpayers (SUNAT).
    Ruc,
}

impl DocumentKind {
    /// Exact digit count of a complete identifier of this kind.
    pub fn expected_len(self) -> usize {
        match self {
            Self::Dni => 8,
            Self::Ruc => 11,
        }
    }

    /// Display label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dni => "DNI",
            Self::Ruc => "RUC",
        }
    }

    /// Kind implied by a digit count (`>= 9` means RUC).
    pub fn from_digit_count(len: usize) -> Self {
        if len >= RUC_THRESHOLD {
            Self::Ruc
        } else {
            Self::Dni
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dni" => Ok(Self::Dni),
            "ruc" => Ok(Self::Ruc),
            other => Err(format!("unknown document kind '{other}' (expected dni or ruc)")),
        }
    }
}

/// Legal nature of the identified party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// Individual (persona natural).
    NaturalPerson,
    /// Company or other juridical person (persona jurídica).
    LegalEntity,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NaturalPerson => write!(f, "Persona natural"),
            Self::LegalEntity => write!(f, "Persona jurídica"),
        }
    }
}

/// Entity kind implied by a RUC's leading digits.
///
/// Inputs shorter than two digits cannot carry a prefix and are reported as
/// natural persons.
pub fn entity_kind_for_ruc(digits: &str) -> EntityKind {
    if digits.len() < 2 || digits.starts_with(NATURAL_PERSON_RUC_PREFIX) {
        EntityKind::NaturalPerson
    } else {
        EntityKind::LegalEntity
    }
}

/// Result of classifying a (possibly partial) identifier input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Digits-only input, truncated to 11 characters.
    pub normalized: String,
    /// Inferred document kind.
    pub kind: DocumentKind,
    /// Entity kind implied by the kind and, for RUC, the prefix.
    pub entity_kind_hint: EntityKind,
    /// Whether `normalized` has exactly the digit count `kind` requires.
    pub complete: bool,
}

/// Classify raw input by digit count.
pub fn classify(raw: &str) -> Classification {
    let normalized = normalize_input(raw);
    let kind = DocumentKind::from_digit_count(normalized.len());
    build(normalized, kind)
}

/// Classify with a caller-chosen kind instead of the digit-count heuristic.
pub fn classify_as(raw: &str, kind: DocumentKind) -> Classification {
    build(normalize_input(raw), kind)
}

fn build(normalized: String, kind: DocumentKind) -> Classification {
    let entity_kind_hint = match kind {
        DocumentKind::Dni => EntityKind::NaturalPerson,
        DocumentKind::Ruc => entity_kind_for_ruc(&normalized),
    };
    let complete = normalized.len() == kind.expected_len();
    Classification {
        normalized,
        kind,
        entity_kind_hint,
        complete,
    }
}

/// How kind detection behaves while the user edits the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationPolicy {
    /// Re-evaluate from the digit count on every change.
    #[default]
    Immediate,
    /// Once RUC is detected, keep it until the field is cleared.
    Sticky,
}

/// Stateful classifier for a single input field.
#[derive(Debug, Clone, Default)]
pub struct KindTracker {
    policy: ClassificationPolicy,
    latched_ruc: bool,
}

impl KindTracker {
    /// Create a tracker with the given policy.
    pub fn new(policy: ClassificationPolicy) -> Self {
        Self {
            policy,
            latched_ruc: false,
        }
    }

    /// Classify the field's current content.
    pub fn observe(&mut self, raw: &str) -> Classification {
        let detected = classify(raw);
        match self.policy {
            ClassificationPolicy::Immediate => detected,
            ClassificationPolicy::Sticky => {
                if detected.normalized.is_empty() {
                    self.latched_ruc = false;
                    return detected;
                }
                if detected.kind == DocumentKind::Ruc {
                    self.latched_ruc = true;
                }
                if self.latched_ruc {
                    build(detected.normalized, DocumentKind::Ruc)
                } else {
                    detected
                }
            }
        }
    }

    /// Forget any latched kind.
    pub fn reset(&mut self) {
        self.latched_ruc = false;
    }
}
