//! # padron-client: Registry Lookup Client
//!
//! Async client for the Peruvian person registry (RENIEC, by DNI) and
//! taxpayer registry (SUNAT, by RUC), shaped for form autocompletion.
//!
//! ## Architecture
//!
//! ```text
//! DocumentForm (headless state machine, no I/O)
//!        │ LookupRequest / FormCommand
//!        ▼
//! AutocompleteService ── LookupCache (TTL, stale fallback)
//!        │             └─ in-flight map (one request per identifier)
//!        ▼
//! dyn DocumentProvider ── HttpDocumentProvider (reqwest)
//!        │
//!        ▼
//! map_payload ──► MappedDocumentRecord
//! ```
//!
//! Identifier validation, classification, UBIGEO and address rules live in
//! `padron-core`; this crate re-exports nothing from it.
//!
//! ## Configuration
//!
//! [`ClientConfig::from_env`] reads `PADRON_API_URL`, `PADRON_API_TOKEN`,
//! `PADRON_TIMEOUT_MS`, `PADRON_RETRIES`, `PADRON_RETRY_DELAY_MS` and
//! `PADRON_CACHE_TTL_SECS`.

pub mod autocomplete;
pub mod cache;
pub mod config;
pub mod error;
pub mod form;
pub mod mapping;
pub mod provider;
mod retry;
pub mod types;

pub use autocomplete::{AutocompleteService, STALE_CACHE_WARNING};
pub use cache::{CacheEntry, CacheLookup, CacheStats, LookupCache};
pub use config::{AutocompleteOptions, ClientConfig, ConfigError};
pub use error::LookupError;
pub use form::{
    DocumentForm, FormCommand, FormField, FormFields, LookupRequest, LookupState, DEFAULT_DEBOUNCE,
};
pub use mapping::{map_payload, Mapped};
pub use provider::{DocumentProvider, HttpDocumentProvider};
pub use types::{AutocompleteResult, MappedDocumentRecord, RegistryPayload};
