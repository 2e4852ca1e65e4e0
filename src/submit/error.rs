use std::fmt;

/// Failures of the submission pipeline itself. These are distinct from
/// `SubmissionOutcome`: an outcome is what the user is shown, a
/// `SubmitError` means the submission could not start or the page could
/// not be updated.
#[derive(Debug)]
pub enum SubmitError {
    /// Form exists but was not registered as an ajax form
    NotRegistered(String),

    /// No form with this key on the page
    FormNotFound(String),

    /// A previous submission of this form has not completed yet
    AlreadyInFlight(String),

    /// Required fields were left blank
    Validation { form: String, missing: Vec<String> },

    /// Action URL could not be resolved against the page URL
    InvalidAction { action: String, reason: String },

    /// Page surface refused an update (notification, navigation, control)
    Render(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::NotRegistered(form) => {
                write!(f, "Form '{}' is not registered for ajax submission", form)
            }
            SubmitError::FormNotFound(form) => {
                write!(f, "Form '{}' not found on page", form)
            }
            SubmitError::AlreadyInFlight(form) => {
                write!(f, "Form '{}' already has a submission in flight", form)
            }
            SubmitError::Validation { form, missing } => {
                write!(f, "Form '{}' is missing required fields: {}", form, missing.join(", "))
            }
            SubmitError::InvalidAction { action, reason } => {
                write!(f, "Invalid form action '{}': {}", action, reason)
            }
            SubmitError::Render(msg) => {
                write!(f, "Page update failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for SubmitError {}
