use std::path::Path;
use std::time::Duration;

use crate::cli::config::{AppConfig, build_submitter_config, parse_assignment};
use crate::form::form_model::{FieldKind, FileInput, FormField};
use crate::form::validation::validate_required;
use crate::page::document::{Document, PageSurface};
use crate::report::console::{format_scan_report, format_submission_report};
use crate::submit::submitter::FormSubmitter;
use crate::submit::transport::{HttpTransport, Transport};
use crate::trace::logger::TraceLogger;

// ============================================================================
// scan subcommand
// ============================================================================

pub fn cmd_scan(page_path: &str, config: &AppConfig, verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let document = load_page(page_path, config)?;
    let mut submitter = FormSubmitter::new(build_submitter_config(config), build_transport(config)?);
    let count = submitter.register_all(&document);

    if verbose > 0 {
        eprintln!(
            "Registered {} of {} forms (marker class '{}')",
            count,
            document.forms.len(),
            config.submitter.marker_class
        );
    }

    print!("{}", format_scan_report(&document, &submitter));
    Ok(())
}

// ============================================================================
// validate subcommand
// ============================================================================

/// Returns whether every required field is filled.
pub fn cmd_validate(page_path: &str, form_key: &str, config: &AppConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let document = load_page(page_path, config)?;
    let form = document
        .form(form_key)
        .ok_or_else(|| format!("Form '{}' not found in {}", form_key, page_path))?;

    let report = validate_required(form);
    if report.is_valid() {
        println!("{}: all required fields filled", form_key);
    } else {
        println!("{}: {}", form_key, config.messages.validation);
        for name in &report.missing {
            println!("  - {}", name);
        }
    }

    Ok(report.is_valid())
}

// ============================================================================
// submit subcommand
// ============================================================================

/// Submit one form over HTTP. Returns false when the outcome is an error.
pub fn cmd_submit(
    page_path: &str,
    form_key: &str,
    fields: &[String],
    files: &[String],
    base_url: Option<&str>,
    config: &AppConfig,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut document = load_page(page_path, config)?;
    if let Some(url) = base_url {
        document.url = url.to_string();
    }
    apply_overrides(&mut document, form_key, fields, files)?;

    let transport = build_transport(config)?;
    let tracer = match &config.trace.file {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    let mut submitter = FormSubmitter::new(build_submitter_config(config), transport).with_tracer(tracer);
    submitter.register_all(&document);

    if verbose > 0 {
        eprintln!("Submitting '{}' from {}...", form_key, document.url);
    }

    let result = submitter.submit(&mut document, form_key);
    print!("{}", format_submission_report(form_key, &result, &document));

    Ok(matches!(result, Ok(ref outcome) if !outcome.is_error()))
}

// ============================================================================
// Helpers
// ============================================================================

fn build_transport(config: &AppConfig) -> Result<Box<dyn Transport>, Box<dyn std::error::Error>> {
    let timeout = config.transport.timeout_secs.map(Duration::from_secs);
    Ok(Box::new(HttpTransport::new(timeout)?))
}

fn load_page(path: &str, config: &AppConfig) -> Result<Document, Box<dyn std::error::Error>> {
    let document = Document::load(path)?;
    Ok(document.with_notification_dwell(Duration::from_millis(config.submitter.notification_dwell_ms)))
}

/// Apply `name=value` and `name=path` overrides to a form before it is
/// submitted. Unknown field names are appended as text fields.
pub fn apply_overrides(
    document: &mut Document,
    form_key: &str,
    fields: &[String],
    files: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let form = document
        .form_mut(form_key)
        .ok_or_else(|| format!("Form '{}' not found", form_key))?;

    for raw in fields {
        let (name, value) = parse_assignment(raw)?;
        match form.field_mut(&name) {
            Some(field) => match field.kind {
                FieldKind::Checkbox | FieldKind::Radio => {
                    field.checked = true;
                    field.value = value;
                }
                FieldKind::Select if !field.values.is_empty() => field.values = vec![value],
                _ => field.value = value,
            },
            None => form.fields.push(FormField::text(&name, &value)),
        }
    }

    for raw in files {
        let (name, path) = parse_assignment(raw)?;
        let bytes = std::fs::read(&path)?;
        let file_name = Path::new(&path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let input = FileInput::from_bytes(&file_name, bytes);

        match form.field_mut(&name) {
            Some(field) => {
                field.kind = FieldKind::File;
                field.file = Some(input);
            }
            None => {
                let mut field = FormField::text(&name, "");
                field.kind = FieldKind::File;
                field.file = Some(input);
                form.fields.push(field);
            }
        }
    }

    Ok(())
}
