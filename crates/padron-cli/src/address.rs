//! # Address Subcommand
//!
//! - `parse`: split registry free text into street part and location guesses,
//!   resolving the guesses against the UBIGEO tables where possible.
//! - `check`: physical-address plausibility (`--lenient` for the relaxed
//!   rule used on optional fields).

use anyhow::Result;
use clap::{Args, Subcommand};
use padron_core::ubigeo::{
    find_department_by_name, find_district_by_name, find_province_by_name,
};
use padron_core::{
    parse_freeform_address, validate_lenient_address_text, validate_physical_address_text,
    ParsedAddress, ValidationResult,
};

use crate::EXIT_REJECTED;

/// Arguments for the `padron address` subcommand.
#[derive(Args, Debug)]
pub struct AddressArgs {
    #[command(subcommand)]
    pub command: AddressCommand,
}

/// Address operations.
#[derive(Subcommand, Debug)]
pub enum AddressCommand {
    /// Parse registry free text into street part and location guesses.
    Parse {
        /// Address text, e.g. "AV. LARCO 345 DIST. MIRAFLORES PROV. LIMA".
        text: String,
        /// Print the parsed address as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check that text looks like a physical address.
    Check {
        /// Address text.
        text: String,
        /// Only reject empty, very short or degenerate text.
        #[arg(long)]
        lenient: bool,
    },
}

/// UBIGEO code for the guessed location, as deep as it resolves.
pub fn guessed_ubigeo(parsed: &ParsedAddress) -> Option<&'static str> {
    let department = parsed
        .guessed_department
        .as_deref()
        .and_then(find_department_by_name);
    let province = parsed
        .guessed_province
        .as_deref()
        .and_then(|name| find_province_by_name(department.map(|d| d.code), name));
    let district = parsed
        .guessed_district
        .as_deref()
        .and_then(|name| find_district_by_name(province.map(|p| p.code), name));

    district
        .map(|d| d.code)
        .or(province.map(|p| p.code))
        .or(department.map(|d| d.code))
}

fn render_parsed(parsed: &ParsedAddress) -> String {
    let mut out = vec![format!("  street:     {}", parsed.specific_address)];
    let guesses = [
        ("district:", &parsed.guessed_district),
        ("province:", &parsed.guessed_province),
        ("department:", &parsed.guessed_department),
    ];
    for (label, value) in guesses {
        if let Some(value) = value {
            out.push(format!("  {label:<12}{value}"));
        }
    }
    if let Some(code) = guessed_ubigeo(parsed) {
        out.push(format!("  ubigeo:     {code}"));
    }
    out.join("\n")
}

/// Run the address check for `text`.
pub fn check_address(text: &str, lenient: bool) -> ValidationResult {
    if lenient {
        validate_lenient_address_text(text)
    } else {
        validate_physical_address_text(text)
    }
}

/// Execute the address subcommand.
pub fn run_address(args: &AddressArgs) -> Result<u8> {
    match &args.command {
        AddressCommand::Parse { text, json } => {
            let parsed = parse_freeform_address(text);
            if *json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                println!("{}", render_parsed(&parsed));
            }
            Ok(0)
        }
        AddressCommand::Check { text, lenient } => {
            let result = check_address(text, *lenient);
            match (&result.message, &result.code) {
                (Some(message), Some(code)) => {
                    eprintln!("FAIL  {message} [{code}]");
                    Ok(EXIT_REJECTED)
                }
                _ => {
                    println!("OK");
                    Ok(0)
                }
            }
        }
    }
}
