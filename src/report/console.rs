use crate::form::form_model::{FormElement, HttpMethod};
use crate::page::document::Document;
use crate::submit::error::SubmitError;
use crate::submit::outcome::SubmissionOutcome;
use crate::submit::submitter::FormSubmitter;

// ============================================================================
// Console reporter — formatted terminal output
// ============================================================================

/// Format the forms found on a page.
///
/// Produces output like:
/// ```text
/// === Page: Sign up (http://localhost:5000/auth) ===
///
/// [ajax]   signup  POST /signup (3 fields)
/// [native] search  GET /search (1 field)
/// ```
pub fn format_scan_report(document: &Document, submitter: &FormSubmitter) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Page: {} ({}) ===\n\n", document.title, document.url));

    for (key, form) in document.keyed_forms() {
        let marker = if submitter.is_registered(&key) {
            "[ajax]  "
        } else {
            "[native]"
        };
        out.push_str(&format!("{} {}  {}\n", marker, key, describe_form(form)));
    }

    if document.forms.is_empty() {
        out.push_str("(no forms)\n");
    }

    out
}

/// Format one submission and the page state it left behind.
///
/// Produces output like:
/// ```text
/// === Submit: signup ===
/// Outcome: ApplicationError
///   [error] username taken
/// Control: "Sign up" (enabled)
/// ```
pub fn format_submission_report(
    key: &str,
    result: &Result<SubmissionOutcome, SubmitError>,
    document: &Document,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Submit: {} ===\n", key));

    match result {
        Ok(SubmissionOutcome::Redirect { location }) => {
            out.push_str(&format!("Outcome: Redirect -> {}\n", location));
        }
        Ok(outcome) => {
            let name = match outcome {
                SubmissionOutcome::Success { .. } => "Success",
                SubmissionOutcome::ApplicationError { .. } => "ApplicationError",
                _ => "NetworkError",
            };
            out.push_str(&format!("Outcome: {}\n", name));
        }
        Err(e) => out.push_str(&format!("[ERROR] {}\n", e)),
    }

    for n in document.notifications.visible() {
        out.push_str(&format!("  [{}] {}\n", n.category.as_str(), n.message));
    }

    if let Some((_, form)) = document.keyed_forms().into_iter().find(|(k, _)| k == key) {
        out.push_str(&format!(
            "Control: \"{}\" ({})\n",
            form.submit.label,
            if form.submit.disabled { "disabled" } else { "enabled" }
        ));
    }

    out
}

fn describe_form(form: &FormElement) -> String {
    let method = HttpMethod::parse(&form.method);
    let action = if form.action.is_empty() { "(self)" } else { &form.action };
    let count = form.fields.len();
    format!(
        "{} {} ({} field{})",
        method,
        action,
        count,
        if count == 1 { "" } else { "s" }
    )
}
