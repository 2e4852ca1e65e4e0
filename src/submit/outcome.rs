use serde::{Deserialize, Serialize};

use crate::{
    form::validation::DEFAULT_VALIDATION_MESSAGE,
    page::notification::NotificationCategory,
    submit::transport::{TransportError, TransportResponse},
};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Your request was submitted successfully.";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";
pub const DEFAULT_NETWORK_MESSAGE: &str = "Network error. Please check your connection and try again.";

/// Fixed user-facing texts for outcomes the server does not describe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMessages {
    #[serde(default = "default_success")]
    pub success: String,

    #[serde(default = "default_failure")]
    pub failure: String,

    #[serde(default = "default_network")]
    pub network: String,

    #[serde(default = "default_validation")]
    pub validation: String,
}

impl Default for OutcomeMessages {
    fn default() -> Self {
        Self {
            success: default_success(),
            failure: default_failure(),
            network: default_network(),
            validation: default_validation(),
        }
    }
}

fn default_success() -> String { DEFAULT_SUCCESS_MESSAGE.to_string() }
fn default_failure() -> String { DEFAULT_FAILURE_MESSAGE.to_string() }
fn default_network() -> String { DEFAULT_NETWORK_MESSAGE.to_string() }
fn default_validation() -> String { DEFAULT_VALIDATION_MESSAGE.to_string() }

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum SubmissionOutcome {
    Redirect { location: String },
    Success { message: String },
    ApplicationError { message: String },
    NetworkError { message: String },
}

impl SubmissionOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionOutcome::Redirect { .. } => "redirect",
            SubmissionOutcome::Success { .. } => "success",
            SubmissionOutcome::ApplicationError { .. } => "application_error",
            SubmissionOutcome::NetworkError { .. } => "network_error",
        }
    }

    /// Category of the notification this outcome renders as. `None` for a
    /// redirect, which navigates instead.
    pub fn notification(&self) -> Option<(NotificationCategory, &str)> {
        match self {
            SubmissionOutcome::Redirect { .. } => None,
            SubmissionOutcome::Success { message } => Some((NotificationCategory::Success, message)),
            SubmissionOutcome::ApplicationError { message }
            | SubmissionOutcome::NetworkError { message } => Some((NotificationCategory::Error, message)),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::ApplicationError { .. } | SubmissionOutcome::NetworkError { .. }
        )
    }
}

/// The parts of a response body the submitter understands. Anything else in
/// the body is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ResponseBody {
    #[serde(default)]
    pub redirect: Option<serde_json::Value>,

    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl ResponseBody {
    /// `None` when the body is not a JSON object.
    pub fn parse(body: &str) -> Option<Self> {
        match serde_json::from_str::<serde_json::Value>(body).ok()? {
            value @ serde_json::Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }

    pub fn redirect(&self) -> Option<&str> {
        self.redirect
            .as_ref()
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn error(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Result of classifying a transport result, plus whether the body parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub outcome: SubmissionOutcome,
    pub status: Option<u16>,
    pub body_parsed: bool,
}

pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

pub fn classify(
    result: &Result<TransportResponse, TransportError>,
    messages: &OutcomeMessages,
) -> Classified {
    let response = match result {
        Ok(r) => r,
        Err(_) => {
            return Classified {
                outcome: SubmissionOutcome::NetworkError {
                    message: messages.network.clone(),
                },
                status: None,
                body_parsed: false,
            };
        }
    };

    let body = ResponseBody::parse(&response.body);
    let body_parsed = body.is_some();
    let body = body.unwrap_or_default();

    let outcome = if is_success_status(response.status) {
        match body.redirect() {
            Some(location) => SubmissionOutcome::Redirect {
                location: location.to_string(),
            },
            None => SubmissionOutcome::Success {
                message: messages.success.clone(),
            },
        }
    } else {
        SubmissionOutcome::ApplicationError {
            message: body
                .error()
                .map(str::to_string)
                .unwrap_or_else(|| messages.failure.clone()),
        }
    };

    Classified {
        outcome,
        status: Some(response.status),
        body_parsed,
    }
}
