//! # padron-core: Peruvian Document and Address Rules
//!
//! Pure, synchronous domain logic shared by the lookup client, forms and the
//! `padron` CLI. Nothing here performs I/O.
//!
//! ## Modules
//!
//! - **Identity** ([`identity`]): `Dni` and `Ruc` validated newtypes, the
//!   RUC weighted mod-11 check digit, and the `validate_*` functions that
//!   fold failures into a [`ValidationResult`].
//!
//! - **Classifier** ([`classifier`]): DNI vs RUC by digit count while the
//!   user types, natural person vs legal entity by RUC prefix.
//!
//! - **UBIGEO** ([`ubigeo`]): static department → province → district
//!   reference with listing, filtering, code and name lookups.
//!
//! - **Address** ([`address`]): the form-owned [`StructuredAddress`], the
//!   best-effort registry text parser, registry component assembly and the
//!   address plausibility rules.
//!
//! - **Errors** ([`error`]): [`ValidationError`] with stable machine codes
//!   and Spanish messages.

pub mod address;
pub mod classifier;
pub mod error;
pub mod identity;
pub mod ubigeo;

// Re-export primary types.
pub use address::{
    build_complete_address, parse_freeform_address, validate_lenient_address_text,
    validate_physical_address_text, validate_structured_address, AddressReport, CompleteAddress,
    DataSource, FieldError, ParsedAddress, RegistryAddressFields, StructuredAddress,
};
pub use classifier::{
    classify, classify_as, Classification, ClassificationPolicy, DocumentKind, EntityKind,
    KindTracker,
};
pub use error::{ValidationError, ValidationResult};
pub use identity::{
    clean_digits, normalize_input, ruc_check_digit, validate_dni, validate_document, validate_ruc,
    Dni, Identifier, Ruc,
};
pub use ubigeo::{Department, District, Province, ResolvedUbigeo};
