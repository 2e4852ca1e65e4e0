use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::page::notification::DEFAULT_DWELL_MS;
use crate::submit::outcome::OutcomeMessages;
use crate::submit::submitter::{DEFAULT_BUSY_LABEL, DEFAULT_MARKER_CLASS, SubmitterConfig};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "ajax-forms",
    version,
    about = "Submit page forms asynchronously and render the outcome"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: ajax-forms.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the forms on a page and which ones submit via ajax
    Scan {
        /// Page fixture (YAML)
        #[arg(long)]
        page: String,
    },

    /// Check a form's required fields without submitting
    Validate {
        /// Page fixture (YAML)
        #[arg(long)]
        page: String,

        /// Form key (id, or the generated key shown by `scan`)
        #[arg(long)]
        form: String,
    },

    /// Submit one form over HTTP and show what the page would render
    Submit {
        /// Page fixture (YAML)
        #[arg(long)]
        page: String,

        /// Form key (id, or the generated key shown by `scan`)
        #[arg(long)]
        form: String,

        /// Override a field value: name=value (repeatable)
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,

        /// Attach a file to a file field: name=path (repeatable)
        #[arg(long = "file", value_name = "NAME=PATH")]
        files: Vec<String>,

        /// Resolve the form action against this URL instead of the page URL
        #[arg(long)]
        base_url: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `ajax-forms.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub submitter: SubmitterSection,
    #[serde(default)]
    pub messages: OutcomeMessages,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitterSection {
    #[serde(default = "default_marker")]
    pub marker_class: String,

    #[serde(default = "default_busy_label")]
    pub busy_label: String,

    #[serde(default)]
    pub validate_required: bool,

    #[serde(default = "default_dwell_ms")]
    pub notification_dwell_ms: u64,
}

impl Default for SubmitterSection {
    fn default() -> Self {
        Self {
            marker_class: DEFAULT_MARKER_CLASS.to_string(),
            busy_label: DEFAULT_BUSY_LABEL.to_string(),
            validate_required: false,
            notification_dwell_ms: DEFAULT_DWELL_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TransportConfig {
    /// Request timeout; unset leaves the HTTP client's default in place
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    /// JSONL file for submission traces; unset disables tracing
    pub file: Option<String>,
}

// Serde default helpers
fn default_marker() -> String { DEFAULT_MARKER_CLASS.to_string() }
fn default_busy_label() -> String { DEFAULT_BUSY_LABEL.to_string() }
fn default_dwell_ms() -> u64 { DEFAULT_DWELL_MS }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("ajax-forms.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders
// ============================================================================

pub fn build_submitter_config(config: &AppConfig) -> SubmitterConfig {
    SubmitterConfig {
        marker_class: config.submitter.marker_class.clone(),
        busy_label: config.submitter.busy_label.clone(),
        validate_required: config.submitter.validate_required,
        messages: config.messages.clone(),
    }
}

/// Split a `name=value` override. The value may itself contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}
