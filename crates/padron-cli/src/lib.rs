//! # padron-cli: Command Line for Peruvian Document Tooling
//!
//! Provides the `padron` binary. Everything except `lookup` runs offline
//! against the rules and reference data in `padron-core`.
//!
//! ## Subcommands
//!
//! - `padron validate`: DNI/RUC structure and check digit.
//! - `padron lookup`: registry lookup through the configured gateway.
//! - `padron address`: free-text address parsing and plausibility checks.
//! - `padron ubigeo`: department / province / district browsing.
//!
//! ```bash
//! padron validate 20131312955 87654321
//! padron validate --file clientes.txt --json
//! PADRON_API_TOKEN=... padron lookup 20131312955
//! padron address check "Av. Arequipa 1234, Lince"
//! padron ubigeo districts 1501 --filter mira
//! ```
//!
//! Handlers return the process exit code: 0 on success, 1 when any input
//! failed validation or the lookup did not succeed. Usage and I/O errors
//! exit with 2.

pub mod address;
pub mod lookup;
pub mod ubigeo;
pub mod validate;

use clap::ValueEnum;
use padron_core::DocumentKind;

/// `--kind` values accepted by document subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Dni,
    Ruc,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Dni => DocumentKind::Dni,
            KindArg::Ruc => DocumentKind::Ruc,
        }
    }
}

/// Exit code for runs where some input was rejected.
pub const EXIT_REJECTED: u8 = 1;
