use serde::{Deserialize, Serialize};

// ============================================================================
// Page-side form model (what a fixture or DOM snapshot describes)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Password,
    Email,
    Hidden,
    Textarea,
    Checkbox,
    Radio,
    Select,
    File,
    #[serde(other)]
    Other,
}

/// A file chosen in a file input. Fixtures carry text content inline;
/// files attached at runtime carry raw bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInput {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(skip)]
    pub bytes: Option<Vec<u8>>,
}

impl FileInput {
    pub fn from_bytes(file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: None,
            content: String::new(),
            bytes: Some(bytes),
        }
    }

    pub fn data(&self) -> Vec<u8> {
        match &self.bytes {
            Some(b) => b.clone(),
            None => self.content.clone().into_bytes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,

    #[serde(default)]
    pub kind: FieldKind,

    #[serde(default)]
    pub value: String,

    /// Selected options of a multi-select
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,

    #[serde(default)]
    pub checked: bool,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub disabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileInput>,

    /// Set by required-field validation, cleared once the field is filled
    #[serde(default)]
    pub invalid: bool,
}

impl FormField {
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Text,
            value: value.to_string(),
            values: vec![],
            checked: false,
            required: false,
            disabled: false,
            file: None,
            invalid: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Label and enabled flag of a form's submit control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitControlState {
    pub label: String,
    #[serde(default)]
    pub disabled: bool,
}

impl Default for SubmitControlState {
    fn default() -> Self {
        Self {
            label: "Submit".to_string(),
            disabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormElement {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub classes: Vec<String>,

    #[serde(default)]
    pub action: String,

    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub fields: Vec<FormField>,

    #[serde(default)]
    pub submit: SubmitControlState,
}

impl FormElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Snapshot current field state as FormData would see it.
    pub fn capture(&self, resolved_action: &str) -> FormDescriptor {
        let mut fields = FormFields::new();

        for field in &self.fields {
            if field.disabled || field.name.is_empty() {
                continue;
            }

            match field.kind {
                FieldKind::Checkbox | FieldKind::Radio => {
                    if field.checked {
                        let value = if field.value.is_empty() { "on" } else { &field.value };
                        fields.append(&field.name, FieldValue::Text(value.to_string()));
                    }
                }
                FieldKind::Select if !field.values.is_empty() => {
                    for v in &field.values {
                        fields.append(&field.name, FieldValue::Text(v.clone()));
                    }
                }
                FieldKind::File => {
                    let payload = match &field.file {
                        Some(f) => FilePayload {
                            file_name: f.file_name.clone(),
                            content_type: f.content_type.clone(),
                            data: f.data(),
                        },
                        None => FilePayload::empty(),
                    };
                    fields.append(&field.name, FieldValue::File(payload));
                }
                _ => fields.append(&field.name, FieldValue::Text(field.value.clone())),
            }
        }

        FormDescriptor {
            action: resolved_action.to_string(),
            method: HttpMethod::parse(&self.method),
            fields,
        }
    }
}

/// Stable key for a form: its id, or a fingerprint of where it posts.
pub fn form_key(form: &FormElement, index: usize) -> String {
    match form.id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            use sha1::{Digest, Sha1};

            let mut hasher = Sha1::new();
            hasher.update(format!("{}|{}|{}", form.action, form.method.to_lowercase(), index).as_bytes());
            let digest = format!("{:x}", hasher.finalize());
            format!("form-{}", &digest[..12])
        }
    }
}

// ============================================================================
// Submission-side model (rebuilt on every submit)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Case-insensitive. Missing or unknown methods fall back to GET like an
    /// HTML form does.
    pub fn parse(method: &str) -> Self {
        match method.trim().to_ascii_uppercase().as_str() {
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            _ => HttpMethod::Get,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl FilePayload {
    pub fn empty() -> Self {
        Self {
            file_name: String::new(),
            content_type: None,
            data: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(FilePayload),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::File(_) => None,
        }
    }
}

/// Ordered name/value pairs. A name may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormFields {
    entries: Vec<(String, FieldValue)>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: &str, value: FieldValue) {
        self.entries.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_all(&self, name: &str) -> Vec<&FieldValue> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything needed to send one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDescriptor {
    pub action: String,
    pub method: HttpMethod,
    pub fields: FormFields,
}
