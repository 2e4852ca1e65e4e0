use crate::form::form_model::{FieldKind, FormElement, FormField};

pub const DEFAULT_VALIDATION_MESSAGE: &str = "Please fill in all required fields";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Names of required fields left blank, in form order
    pub missing: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }
}

pub fn validate_required(form: &FormElement) -> ValidationReport {
    let missing = form
        .fields
        .iter()
        .filter(|f| f.required && !f.disabled && is_blank(f))
        .map(|f| f.name.clone())
        .collect();

    ValidationReport { missing }
}

fn is_blank(field: &FormField) -> bool {
    match field.kind {
        FieldKind::Checkbox | FieldKind::Radio => !field.checked,
        FieldKind::File => field.file.as_ref().map_or(true, |f| f.file_name.is_empty()),
        FieldKind::Select if !field.values.is_empty() => {
            field.values.iter().all(|v| v.trim().is_empty())
        }
        _ => field.value.trim().is_empty(),
    }
}

/// Flag exactly the named fields as invalid; clear the rest.
pub fn apply_invalid_markers(form: &mut FormElement, names: &[String]) {
    for field in &mut form.fields {
        field.invalid = names.iter().any(|n| n == &field.name);
    }
}
