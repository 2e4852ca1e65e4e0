use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    form::form_model::FormDescriptor,
    submit::outcome::Classified,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TracePhase {
    Begin,
    Rejected,
    Complete,
}

#[derive(Debug, Serialize)]
pub struct SubmissionTrace {
    pub timestamp_ms: u128,
    pub phase: TracePhase,
    pub form: String,

    pub method: Option<String>,
    pub url: Option<String>,
    pub field_count: Option<usize>,

    pub outcome: Option<String>,
    pub status: Option<u16>,
    pub body_parsed: Option<bool>,
    pub elapsed_ms: Option<u128>,

    pub reason: Option<String>,
}

impl SubmissionTrace {
    pub fn now(phase: TracePhase, form: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            phase,
            form: form.to_string(),
            method: None,
            url: None,
            field_count: None,
            outcome: None,
            status: None,
            body_parsed: None,
            elapsed_ms: None,
            reason: None,
        }
    }

    pub fn with_request(mut self, request: &FormDescriptor) -> Self {
        self.method = Some(request.method.to_string());
        self.url = Some(request.action.clone());
        self.field_count = Some(request.fields.len());
        self
    }

    pub fn with_classified(mut self, classified: &Classified) -> Self {
        self.outcome = Some(classified.outcome.kind().to_string());
        self.status = classified.status;
        self.body_parsed = Some(classified.body_parsed);
        self
    }

    pub fn with_elapsed(mut self, elapsed_ms: u128) -> Self {
        self.elapsed_ms = Some(elapsed_ms);
        self
    }

    pub fn with_reason(mut self, reason: impl ToString) -> Self {
        self.reason = Some(reason.to_string());
        self
    }
}
