//! # Validate Subcommand
//!
//! Offline structural validation of DNI and RUC numbers. Numbers come from
//! positional arguments and, with `--file`, one per line from a file
//! (blank lines and `#` comments skipped).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use padron_core::{clean_digits, validate_document, DocumentKind, ValidationResult};
use serde::Serialize;

use crate::{KindArg, EXIT_REJECTED};

/// Arguments for the `padron validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document numbers to validate. Separators are ignored.
    pub documents: Vec<String>,

    /// Validate as this kind instead of inferring it from the digit count.
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    /// Read additional document numbers from a file, one per line.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Print one JSON object per document.
    #[arg(long)]
    pub json: bool,
}

/// Outcome for one input line.
#[derive(Debug, Serialize)]
pub struct ValidationLine {
    pub document: String,
    pub kind: DocumentKind,
    #[serde(flatten)]
    pub result: ValidationResult,
}

impl ValidationLine {
    /// One human-readable line: `OK` or `FAIL` with the reason.
    pub fn render(&self) -> String {
        match (&self.result.code, &self.result.message) {
            (Some(code), Some(message)) => {
                format!("FAIL  {} {}: {message} [{code}]", self.kind, self.document)
            }
            _ => format!("OK    {} {}", self.kind, self.document),
        }
    }
}

/// Validate each document, inferring the kind unless one is forced.
pub fn check_documents(documents: &[String], kind: Option<DocumentKind>) -> Vec<ValidationLine> {
    documents
        .iter()
        .map(|doc| ValidationLine {
            document: doc.clone(),
            kind: kind.unwrap_or_else(|| DocumentKind::from_digit_count(clean_digits(doc).len())),
            result: validate_document(doc, kind),
        })
        .collect()
}

fn read_document_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let mut documents = args.documents.clone();
    if let Some(path) = &args.file {
        documents.extend(read_document_file(path)?);
    }
    if documents.is_empty() {
        bail!("no document numbers given (pass them as arguments or with --file)");
    }

    let lines = check_documents(&documents, args.kind.map(DocumentKind::from));
    for line in &lines {
        if args.json {
            println!("{}", serde_json::to_string(line)?);
        } else {
            println!("{}", line.render());
        }
    }

    let rejected = lines.iter().filter(|l| !l.result.valid).count();
    tracing::info!(checked = lines.len(), rejected, "validation finished");
    if rejected > 0 {
        if !args.json {
            eprintln!("{rejected} of {} document(s) rejected", lines.len());
        }
        return Ok(EXIT_REJECTED);
    }
    Ok(0)
}
