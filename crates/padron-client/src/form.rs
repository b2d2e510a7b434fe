//! # Form Reconciliation
//!
//! [`DocumentForm`] is a headless state machine for a form with a document
//! number field and the fields autocompletion fills. It owns no timers and
//! performs no I/O: the host feeds it events and carries out the
//! [`FormCommand`]s it returns.
//!
//! ## Lookup states
//!
//! ```text
//! Idle ──input──► Validating ──complete & valid──► Debouncing
//!   ▲                 ▲                               │ debounce_elapsed
//!   │                 └──────────input────────────────┤
//!   └──── clear / kind switch                          ▼
//!                                    Success ◄──── Requesting ────► Error
//! ```
//!
//! ## Merge policy
//!
//! - A successful lookup fills target fields only when they are empty.
//!   Content the user typed is never overwritten.
//! - In locked (edit) mode the document field is read-only and lookups are
//!   suppressed entirely.
//! - Switching the document kind by hand clears the kind-specific fields
//!   (names, legal name, status, condition) and resets lookup and
//!   validation state.
//! - Every message shown comes from a `ValidationResult` or an
//!   `AutocompleteResult`; the form adds none of its own.

use std::time::{Duration, Instant};

use padron_core::{
    normalize_input, validate_document, ClassificationPolicy, DocumentKind, KindTracker,
    ValidationResult,
};
use serde::{Deserialize, Serialize};

use crate::types::AutocompleteResult;

/// Default quiet period between the last keystroke and the lookup.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);

/// Lookup progress for the current document number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupState {
    /// Field empty, or reset.
    Idle,
    /// Input present but not (yet) a complete, valid document number.
    Validating,
    /// Waiting for the input to settle.
    Debouncing { due: Instant },
    /// Lookup dispatched for `identifier`.
    Requesting { identifier: String },
    /// Fields filled; `warnings` come from the lookup.
    Success { warnings: Vec<String> },
    /// Lookup failed or the input is invalid.
    Error {
        message: String,
        code: Option<String>,
    },
}

/// Fields autocompletion may fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    LegalName,
    GivenNames,
    Surnames,
    Address,
    Department,
    Province,
    District,
    Status,
    Condition,
}

impl FormField {
    /// Fields whose meaning depends on the document kind.
    pub const KIND_SPECIFIC: [FormField; 5] = [
        FormField::LegalName,
        FormField::GivenNames,
        FormField::Surnames,
        FormField::Status,
        FormField::Condition,
    ];
}

/// Target field values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub legal_name: String,
    pub given_names: String,
    pub surnames: String,
    pub address: String,
    pub department: String,
    pub province: String,
    pub district: String,
    pub status: String,
    pub condition: String,
}

impl FormFields {
    /// Current value of `field`.
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::LegalName => &self.legal_name,
            FormField::GivenNames => &self.given_names,
            FormField::Surnames => &self.surnames,
            FormField::Address => &self.address,
            FormField::Department => &self.department,
            FormField::Province => &self.province,
            FormField::District => &self.district,
            FormField::Status => &self.status,
            FormField::Condition => &self.condition,
        }
    }

    fn slot(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::LegalName => &mut self.legal_name,
            FormField::GivenNames => &mut self.given_names,
            FormField::Surnames => &mut self.surnames,
            FormField::Address => &mut self.address,
            FormField::Department => &mut self.department,
            FormField::Province => &mut self.province,
            FormField::District => &mut self.district,
            FormField::Status => &mut self.status,
            FormField::Condition => &mut self.condition,
        }
    }

    /// Set `field` to `value` if it is currently blank and `value` is not.
    fn fill_if_empty(&mut self, field: FormField, value: &str) -> bool {
        let value = value.trim();
        let slot = self.slot(field);
        if value.is_empty() || !slot.trim().is_empty() {
            return false;
        }
        *slot = value.to_string();
        true
    }
}

/// Instruction for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    /// (Re)arm the debounce timer; call `debounce_elapsed` at `at`.
    ScheduleLookup { at: Instant },
    /// Cancel the lookup dispatched for `identifier`.
    CancelLookup { identifier: String },
}

/// A lookup the host should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub identifier: String,
    pub kind: DocumentKind,
}

/// Headless document form.
#[derive(Debug, Clone)]
pub struct DocumentForm {
    input: String,
    kind: DocumentKind,
    manual_kind: Option<DocumentKind>,
    tracker: KindTracker,
    field_error: Option<ValidationResult>,
    state: LookupState,
    fields: FormFields,
    locked: bool,
    debounce: Duration,
}

impl Default for DocumentForm {
    fn default() -> Self {
        Self::new(ClassificationPolicy::default())
    }
}

impl DocumentForm {
    /// Empty form in create mode.
    pub fn new(policy: ClassificationPolicy) -> Self {
        Self {
            input: String::new(),
            kind: DocumentKind::Dni,
            manual_kind: None,
            tracker: KindTracker::new(policy),
            field_error: None,
            state: LookupState::Idle,
            fields: FormFields::default(),
            locked: false,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Form in edit mode over an existing record: the document field is
    /// read-only and no lookups run.
    pub fn locked(identifier: &str, kind: DocumentKind, fields: FormFields) -> Self {
        Self {
            input: normalize_input(identifier),
            kind,
            manual_kind: Some(kind),
            fields,
            locked: true,
            ..Self::default()
        }
    }

    /// Override the quiet period before a lookup fires.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Normalized document field contents.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Kind currently assumed for the document field.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Validation result for the document field, `None` when valid or empty.
    pub fn field_error(&self) -> Option<&ValidationResult> {
        self.field_error.as_ref()
    }

    /// Lookup state as shown next to the document field.
    pub fn state(&self) -> &LookupState {
        &self.state
    }

    /// Values of the autofilled fields.
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Edit mode: the document field cannot change.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn in_flight_identifier(&self) -> Option<&str> {
        match &self.state {
            LookupState::Requesting { identifier } => Some(identifier),
            _ => None,
        }
    }

    // -- events -------------------------------------------------------------

    /// The document field changed. Normalizes, reclassifies, revalidates and
    /// (re)arms the debounce when the value is a complete, valid number.
    pub fn input_changed(&mut self, raw: &str, now: Instant) -> Vec<FormCommand> {
        if self.locked {
            return Vec::new();
        }
        let mut commands = Vec::new();
        let normalized = normalize_input(raw);
        let detected = self.tracker.observe(raw).kind;
        self.kind = self.manual_kind.unwrap_or(detected);

        if let Some(pending) = self.in_flight_identifier() {
            if pending != normalized {
                commands.push(FormCommand::CancelLookup {
                    identifier: pending.to_string(),
                });
            }
        }
        let unchanged_request = self.in_flight_identifier() == Some(normalized.as_str());
        self.input = normalized;

        if self.input.is_empty() {
            self.field_error = None;
            self.state = LookupState::Idle;
            return commands;
        }

        let result = validate_document(&self.input, Some(self.kind));
        let complete = self.input.len() == self.kind.expected_len();
        self.field_error = if result.valid { None } else { Some(result) };

        if unchanged_request {
            return commands;
        }
        if complete && self.field_error.is_none() {
            let due = now + self.debounce;
            self.state = LookupState::Debouncing { due };
            commands.push(FormCommand::ScheduleLookup { at: due });
        } else {
            self.state = LookupState::Validating;
        }
        commands
    }

    /// The debounce timer fired. Returns the lookup to perform, if the
    /// timer is still current.
    pub fn debounce_elapsed(&mut self, now: Instant) -> Option<LookupRequest> {
        if self.locked {
            return None;
        }
        match self.state {
            LookupState::Debouncing { due } if now >= due => {
                self.state = LookupState::Requesting {
                    identifier: self.input.clone(),
                };
                Some(LookupRequest {
                    identifier: self.input.clone(),
                    kind: self.kind,
                })
            }
            _ => None,
        }
    }

    /// A lookup finished. Results for anything but the current request are
    /// ignored. Returns the fields that were filled.
    pub fn lookup_settled(
        &mut self,
        identifier: &str,
        result: &AutocompleteResult,
    ) -> Vec<FormField> {
        if self.in_flight_identifier() != Some(identifier) {
            return Vec::new();
        }

        let record = match (&result.data, result.success) {
            (Some(record), true) => record,
            _ => {
                self.state = if result.has_error_code("CANCELLED") {
                    LookupState::Idle
                } else {
                    LookupState::Error {
                        message: result.error.clone().unwrap_or_default(),
                        code: result.error_code.clone(),
                    }
                };
                return Vec::new();
            }
        };

        let surnames = record.surnames().unwrap_or_default();
        let address = if record.street_address.is_empty() {
            record.formatted_address.as_str()
        } else {
            record.street_address.as_str()
        };
        let candidates: [(FormField, &str); 9] = [
            (FormField::LegalName, record.legal_name.as_str()),
            (FormField::GivenNames, record.given_names.as_deref().unwrap_or_default()),
            (FormField::Surnames, surnames.as_str()),
            (FormField::Address, address),
            (FormField::Department, record.department.as_str()),
            (FormField::Province, record.province.as_str()),
            (FormField::District, record.district.as_str()),
            (FormField::Status, record.status.as_str()),
            (FormField::Condition, record.condition.as_str()),
        ];

        let filled = candidates
            .iter()
            .filter(|(field, value)| self.fields.fill_if_empty(*field, value))
            .map(|(field, _)| *field)
            .collect();

        self.state = LookupState::Success {
            warnings: result.warnings.clone(),
        };
        filled
    }

    /// The user picked the document kind by hand.
    pub fn kind_switched(&mut self, kind: DocumentKind) -> Vec<FormCommand> {
        if self.locked {
            return Vec::new();
        }
        let mut commands = Vec::new();
        if let Some(pending) = self.in_flight_identifier() {
            commands.push(FormCommand::CancelLookup {
                identifier: pending.to_string(),
            });
        }
        self.manual_kind = Some(kind);
        self.kind = kind;
        self.tracker.reset();
        for field in FormField::KIND_SPECIFIC {
            self.fields.slot(field).clear();
        }
        self.field_error = None;
        self.state = LookupState::Idle;
        commands
    }

    /// The user typed into a target field. Non-empty content is protected
    /// from later autocompletion.
    pub fn field_edited(&mut self, field: FormField, value: &str) {
        *self.fields.slot(field) = value.to_string();
    }
}
