//! # Lookup Subcommand
//!
//! One-shot registry lookup through the gateway configured by the
//! `PADRON_*` environment variables. The number is validated locally
//! first; invalid numbers never reach the network.

use anyhow::{Context, Result};
use clap::Args;
use padron_client::{
    AutocompleteResult, AutocompleteService, ClientConfig, MappedDocumentRecord,
};
use padron_core::DocumentKind;

use crate::{KindArg, EXIT_REJECTED};

/// Arguments for the `padron lookup` subcommand.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// DNI or RUC to look up.
    pub document: String,

    /// Look up as this kind instead of inferring it from the digit count.
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    /// Per-attempt timeout in milliseconds (overrides PADRON_TIMEOUT_MS).
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Retries after the first attempt (overrides PADRON_RETRIES).
    #[arg(long)]
    pub retries: Option<u32>,

    /// Print the full result as JSON.
    #[arg(long)]
    pub json: bool,
}

fn push_field(out: &mut Vec<String>, label: &str, value: &str) {
    if !value.is_empty() {
        out.push(format!("  {label:<14}{value}"));
    }
}

fn render_record(record: &MappedDocumentRecord) -> Vec<String> {
    let mut out = vec![format!("{} {}", record.identifier_kind, record.document_number)];
    push_field(&mut out, "name:", &record.legal_name);
    if record.identifier_kind == DocumentKind::Ruc {
        push_field(&mut out, "entity:", &record.entity_kind.to_string());
        push_field(&mut out, "status:", &record.status);
        push_field(&mut out, "condition:", &record.condition);
        push_field(
        &mut out,
        "active:",
        if record.is_active { "yes" } else { "no" },
    );
    }
    push_field(&mut out, "address:", &record.formatted_address);
    push_field(&mut out, "district:", &record.district);
    push_field(&mut out, "province:", &record.province);
    push_field(&mut out, "department:", &record.department);
    push_field(
        &mut out,
        "ubigeo:",
        record.ubigeo_code.as_deref().unwrap_or_default(),
    );
    if record.is_withholding_agent {
        push_field(&mut out, "withholding:", "yes");
    }
    if record.is_good_taxpayer {
        push_field(&mut out, "good payer:", "yes");
    }
    out
}

/// Human-readable rendering of a lookup result.
pub fn render_result(result: &AutocompleteResult) -> String {
    let mut out = match (&result.data, result.success) {
        (Some(record), true) => render_record(record),
        _ => vec![format!(
            "FAIL  {} [{}]",
            result.error.as_deref().unwrap_or("lookup failed"),
            result.error_code.as_deref().unwrap_or("UNKNOWN")
        )],
    };
    for warning in &result.warnings {
        out.push(format!("  warning: {warning}"));
    }
    if result.cached {
        out.push("  (cached)".to_string());
    }
    out.join("\n")
}

/// Execute the lookup subcommand.
pub fn run_lookup(args: &LookupArgs) -> Result<u8> {
    let mut config = ClientConfig::from_env()
        .context("invalid lookup configuration")?;
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(retries) = args.retries {
        config.retries = retries;
    }
    tracing::debug!(?config, "lookup configuration");

    let service = AutocompleteService::from_config(&config)
        .context("failed to build registry client")?;
    let mut options = service.defaults();
    options.kind = args.kind.map(DocumentKind::from);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let result = runtime.block_on(service.autocomplete_with(&args.document, options));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        println!("{}", render_result(&result));
    } else {
        eprintln!("{}", render_result(&result));
    }

    if result.success {
        Ok(0)
    } else {
        Ok(EXIT_REJECTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padron_client::LookupError;
    use padron_core::EntityKind;

    fn record() -> MappedDocumentRecord {
        MappedDocumentRecord {
            legal_name: "DISTRIBUIDORA ANDINA S.A.C.".into(),
            document_number: "20131312955".into(),
            identifier_kind: DocumentKind::Ruc,
            entity_kind: EntityKind::LegalEntity,
            status: "ACTIVO".into(),
            condition: "HABIDO".into(),
            raw_address: String::new(),
            street_address: "AV. JAVIER PRADO ESTE NRO. 123".into(),
            formatted_address: "AV. JAVIER PRADO ESTE NRO. 123 - SAN ISIDRO, LIMA, LIMA".into(),
            district: "SAN ISIDRO".into(),
            province: "LIMA".into(),
            department: "LIMA".into(),
            ubigeo_code: Some("150131".into()),
            is_withholding_agent: true,
            is_good_taxpayer: false,
            is_active: true,
            given_names: None,
            paternal_surname: None,
            maternal_surname: None,
            fetched_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn renders_taxpayer_fields() {
        let result = AutocompleteResult::success(record(), vec!["aviso".into()], true);
        let text = render_result(&result);
        assert!(text.starts_with("RUC 20131312955"));
        assert!(text.contains("DISTRIBUIDORA ANDINA S.A.C."));
        assert!(text.contains("ACTIVO"));
        assert!(text.contains("150131"));
        assert!(text.contains("withholding:"));
        assert!(!text.contains("good payer:"));
        assert!(text.contains("warning: aviso"));
        assert!(text.ends_with("(cached)"));
    }

    #[test]
    fn person_records_skip_taxpayer_fields() {
        let mut person = record();
        person.identifier_kind = DocumentKind::Dni;
        person.document_number = "87654321".into();
        let text = render_result(&AutocompleteResult::success(person, Vec::new(), false));
        assert!(text.starts_with("DNI 87654321"));
        assert!(!text.contains("status:"));
    }

    #[test]
    fn renders_failure_with_code() {
        let result = AutocompleteResult::failure(&LookupError::Cancelled);
        assert!(render_result(&result).contains("[CANCELLED]"));
    }

    fn args(document: &str) -> LookupArgs {
        LookupArgs {
            document: document.into(),
            kind: None,
            timeout_ms: Some(2_000),
            retries: Some(0),
            json: false,
        }
    }

    // run_lookup builds its own runtime, so the gateway mock is set up on a
    // separate one and the lookups run outside any runtime context.
    #[test]
    fn run_lookup_exit_codes_follow_gateway() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/v1/sunat/ruc"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "razon_social": "DISTRIBUIDORA ANDINA S.A.C.",
                    "numero_documento": "20131312955",
                    "estado": "ACTIVO",
                    "condicion": "HABIDO"
                })))
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/v1/reniec/dni"))
                .respond_with(ResponseTemplate::new(404))
                .expect(1)
                .mount(&server)
                .await;
            server
        });

        std::env::set_var("PADRON_API_URL", server.uri());
        std::env::remove_var("PADRON_API_TOKEN");

        assert_eq!(run_lookup(&args("20131312955")).unwrap(), 0);
        assert_eq!(run_lookup(&args("87654321")).unwrap(), EXIT_REJECTED);
        // Invalid input is rejected before any request.
        assert_eq!(run_lookup(&args("1234")).unwrap(), EXIT_REJECTED);

        std::env::remove_var("PADRON_API_URL");
        runtime.block_on(server.verify());
    }
}
