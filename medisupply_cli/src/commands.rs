//! Command implementations
//!
//! Each command writes its report to the given writer so tests can capture it.

use crate::cli::Command;
use crate::error::CliError;
use medisupply_contract::snapshot::load_snapshot_with;
use medisupply_contract::{
    build_path, error_shape, validate_with, ContractRegistry, EntityKind, ErrorKind, Method,
    ValidationConfig,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;

pub fn run(
    command: &Command,
    config: &ValidationConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Validate { kind, file } => validate_document(kind, file, config, out),
        Command::Describe { group, operation } => describe(group, operation, out),
        Command::Routes => routes(out),
        Command::Path { template, params } => path(template, params, out),
        Command::Match { method, path } => match_path(method, path, out),
        Command::ErrorShape { kind } => print_error_shape(kind, out),
        Command::CheckState { file } => check_state(file, config, out),
    }
}

/// Pretty-print a value; failures here are output problems, not bad documents
fn print_json(out: &mut impl Write, value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value).map_err(CliError::Render)?;
    writeln!(out, "{}", rendered)?;
    Ok(())
}

fn read_document(file: &Path) -> Result<String, CliError> {
    log::debug!("Reading {}", file.display());
    std::fs::read_to_string(file).map_err(|source| CliError::Read {
        path: file.to_path_buf(),
        source,
    })
}

fn validate_document(
    kind: &str,
    file: &Path,
    config: &ValidationConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let kind: EntityKind = kind.parse()?;
    let document: Value = serde_json::from_str(&read_document(file)?)?;

    validate_with(kind, &document, config)?;
    writeln!(out, "ok: {} is a valid {}", file.display(), kind)?;
    Ok(())
}

fn describe(group: &str, operation: &str, out: &mut impl Write) -> Result<(), CliError> {
    let descriptor = ContractRegistry::standard().describe_operation(group, operation)?;
    print_json(out, descriptor.as_ref())
}

fn routes(out: &mut impl Write) -> Result<(), CliError> {
    for descriptor in ContractRegistry::standard().operations() {
        writeln!(
            out,
            "{:<7}{:<40}{}",
            descriptor.method,
            descriptor.path,
            descriptor.id()
        )?;
    }
    Ok(())
}

fn parse_param(raw: &str) -> Result<(&str, &str), CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(CliError::usage(format!(
            "Expected key=value parameter, got '{}'",
            raw
        ))),
    }
}

fn path(template: &str, params: &[String], out: &mut impl Write) -> Result<(), CliError> {
    let params = params
        .iter()
        .map(|raw| parse_param(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let built = if template.starts_with('/') {
        build_path(template, params)
    } else {
        let (group, name) = template.rsplit_once('.').ok_or_else(|| {
            CliError::usage(format!(
                "Expected a '/...' template or a group.name operation id, got '{}'",
                template
            ))
        })?;
        ContractRegistry::standard()
            .describe_operation(group, name)?
            .build_path(params)
    };

    if built.split('/').any(|segment| segment.starts_with(':')) {
        log::warn!("Path '{}' still has unfilled placeholders", built);
    }
    writeln!(out, "{}", built)?;
    Ok(())
}

fn match_path(method: &str, path: &str, out: &mut impl Write) -> Result<(), CliError> {
    let method: Method = method.parse()?;
    let matched = ContractRegistry::standard().find_by_path(method, path)?;

    let params: Vec<String> = matched
        .params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    if params.is_empty() {
        writeln!(out, "{}", matched.descriptor.id())?;
    } else {
        writeln!(out, "{} {}", matched.descriptor.id(), params.join(" "))?;
    }
    Ok(())
}

fn print_error_shape(kind: &str, out: &mut impl Write) -> Result<(), CliError> {
    let kind: ErrorKind = kind.parse()?;
    let report = json!({
        "kind": kind.as_str(),
        "status": kind.status_code(),
        "code": kind.code().as_str(),
        "shape": error_shape(kind),
    });
    print_json(out, &report)
}

fn check_state(
    file: &Path,
    config: &ValidationConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let state = load_snapshot_with(&read_document(file)?, config)?;

    writeln!(out, "ok: snapshot version {}", state.version)?;
    for (label, count) in [
        ("medicines", state.medicines.len()),
        ("suppliers", state.suppliers.len()),
        ("pharmacies", state.pharmacies.len()),
        ("supplierMedicines", state.supplier_medicines.len()),
        ("orders", state.orders.len()),
        ("notifications", state.notifications.len()),
    ] {
        writeln!(out, "  {:<18}{}", label, count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use medisupply_contract::types::AppState;
    use medisupply_contract::ContractError;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn run_to_string(command: Command) -> Result<String, CliError> {
        let mut out = Vec::new();
        run(&command, &ValidationConfig::default(), &mut out)?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }

    fn document(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn test_validate_accepts_valid_medicine() {
        let file = document(
            r#"{ "id": "M1", "name": "Ibuprofen", "dosage": "200mg", "form": "tablet" }"#,
        );
        let output = run_to_string(Command::Validate {
            kind: "medicine".to_string(),
            file: file.path().to_path_buf(),
        })
        .expect("valid medicine");
        assert!(output.starts_with("ok:"));
    }

    #[test]
    fn test_validate_reports_failing_field() {
        let file =
            document(r#"{ "id": "M1", "name": "", "dosage": "200mg", "form": "tablet" }"#);
        let err = run_to_string(Command::Validate {
            kind: "medicine".to_string(),
            file: file.path().to_path_buf(),
        })
        .unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert_matches!(
            err,
            CliError::Contract(ContractError::Validation { field: Some(ref f), .. }) if f == "name"
        );
    }

    #[test]
    fn test_validate_unknown_kind_and_missing_file() {
        let err = run_to_string(Command::Validate {
            kind: "prescription".to_string(),
            file: PathBuf::from("unused.json"),
        })
        .unwrap_err();
        assert_matches!(err, CliError::Contract(ContractError::NotFound { .. }));

        let err = run_to_string(Command::Validate {
            kind: "medicine".to_string(),
            file: PathBuf::from("/nonexistent/medicine.json"),
        })
        .unwrap_err();
        assert_matches!(err, CliError::Read { .. });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_describe_prints_descriptor_json() {
        let output = run_to_string(Command::Describe {
            group: "entities.supplierMedicines".to_string(),
            operation: "listBySupplier".to_string(),
        })
        .expect("registered");

        let descriptor: Value = serde_json::from_str(&output).expect("json output");
        assert_eq!(descriptor["method"], "GET");
        assert_eq!(descriptor["path"], "/api/suppliers/:supplierId/medicines");
        assert!(descriptor["responses"].get("404").is_some());
    }

    #[test]
    fn test_routes_lists_every_operation() {
        let output = run_to_string(Command::Routes).expect("routes");
        assert_eq!(output.lines().count(), ContractRegistry::standard().len());
        assert!(output.contains("/api/health"));
        assert!(output.contains("entities.notifications.list"));
    }

    #[test]
    fn test_path_from_template_and_operation_id() {
        let from_template = run_to_string(Command::Path {
            template: "/api/suppliers/:supplierId/medicines".to_string(),
            params: vec!["supplierId=S1".to_string()],
        })
        .expect("builds");
        assert_eq!(from_template.trim(), "/api/suppliers/S1/medicines");

        let from_id = run_to_string(Command::Path {
            template: "entities.supplierMedicines.listBySupplier".to_string(),
            params: vec!["supplierId=S2".to_string()],
        })
        .expect("builds");
        assert_eq!(from_id.trim(), "/api/suppliers/S2/medicines");
    }

    #[test]
    fn test_path_rejects_malformed_param() {
        let err = run_to_string(Command::Path {
            template: "/api/suppliers/:supplierId/medicines".to_string(),
            params: vec!["supplierId".to_string()],
        })
        .unwrap_err();
        assert_matches!(err, CliError::Usage(_));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_match_resolves_operation() {
        let output = run_to_string(Command::Match {
            method: "get".to_string(),
            path: "/api/suppliers/S1/medicines".to_string(),
        })
        .expect("matches");
        assert_eq!(
            output.trim(),
            "entities.supplierMedicines.listBySupplier supplierId=S1"
        );

        let err = run_to_string(Command::Match {
            method: "POST".to_string(),
            path: "/api/health".to_string(),
        })
        .unwrap_err();
        assert_matches!(err, CliError::Contract(ContractError::NotFound { .. }));
    }

    #[test]
    fn test_error_shape_output() {
        let output = run_to_string(Command::ErrorShape {
            kind: "validation".to_string(),
        })
        .expect("known kind");
        let report: Value = serde_json::from_str(&output).expect("json output");
        assert_eq!(report["status"], 400);
        assert_eq!(report["code"], "MSC-V001");
        assert_eq!(report["shape"]["type"], "object");
    }

    struct Unprintable;

    impl Serialize for Unprintable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot render"))
        }
    }

    #[test]
    fn test_render_failure_is_an_output_error() {
        let mut out = Vec::new();
        let err = print_json(&mut out, &Unprintable).unwrap_err();
        assert_matches!(err, CliError::Render(_));
        assert_eq!(err.exit_code(), 2);
        assert!(out.is_empty());
    }

    #[test]
    fn test_check_state() {
        let raw = AppState::current().to_json().expect("serializes");
        let file = document(&raw);
        let output = run_to_string(Command::CheckState {
            file: file.path().to_path_buf(),
        })
        .expect("current snapshot loads");
        assert!(output.starts_with("ok: snapshot version 1"));

        let stale = document(&AppState::empty(0).to_json().expect("serializes"));
        let err = run_to_string(Command::CheckState {
            file: stale.path().to_path_buf(),
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
