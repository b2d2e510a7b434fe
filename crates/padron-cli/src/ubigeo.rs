//! # UBIGEO Subcommand
//!
//! Browse the department → province → district reference tables. Filters
//! are case- and accent-insensitive substring matches.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use padron_core::ubigeo::{
    filter_departments, filter_districts, filter_provinces, find_department, find_province,
    resolve_ubigeo,
};

/// Arguments for the `padron ubigeo` subcommand.
#[derive(Args, Debug)]
pub struct UbigeoArgs {
    #[command(subcommand)]
    pub command: UbigeoCommand,
}

/// Reference table listings.
#[derive(Subcommand, Debug)]
pub enum UbigeoCommand {
    /// List departments.
    Departments {
        #[arg(long, default_value = "")]
        filter: String,
    },

    /// List the provinces of a department.
    Provinces {
        /// Two-digit department code.
        department: String,
        #[arg(long, default_value = "")]
        filter: String,
    },

    /// List the districts of a province.
    Districts {
        /// Four-digit province code.
        province: String,
        #[arg(long, default_value = "")]
        filter: String,
    },

    /// Resolve a 2, 4 or 6 digit code to its names.
    Resolve { code: String },
}

/// `(code, name)` rows for the requested listing.
pub fn list_rows(command: &UbigeoCommand) -> Result<Vec<(&'static str, &'static str)>> {
    let rows: Vec<(&'static str, &'static str)> = match command {
        UbigeoCommand::Departments { filter } => filter_departments(filter)
            .into_iter()
            .map(|d| (d.code, d.name))
            .collect(),
        UbigeoCommand::Provinces { department, filter } => {
            if find_department(department).is_none() {
                bail!("unknown department code {department}");
            }
            filter_provinces(department, filter)
                .into_iter()
                .map(|p| (p.code, p.name))
                .collect()
        }
        UbigeoCommand::Districts { province, filter } => {
            if find_province(province).is_none() {
                bail!("unknown province code {province}");
            }
            filter_districts(province, filter)
                .into_iter()
                .map(|d| (d.code, d.name))
                .collect()
        }
        UbigeoCommand::Resolve { code } => {
            let Some(resolved) = resolve_ubigeo(code) else {
                bail!("unknown UBIGEO code {code}");
            };
            let mut rows = vec![(resolved.department.code, resolved.department.name)];
            rows.extend(resolved.province.map(|p| (p.code, p.name)));
            rows.extend(resolved.district.map(|d| (d.code, d.name)));
            rows
        }
    };
    Ok(rows)
}

/// Execute the ubigeo subcommand.
pub fn run_ubigeo(args: &UbigeoArgs) -> Result<u8> {
    let rows = list_rows(&args.command)?;
    if rows.is_empty() {
        println!("No matches.");
    }
    for (code, name) in rows {
        println!("{code}  {name}");
    }
    Ok(0)
}
