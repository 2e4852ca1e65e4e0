use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use crate::{
    form::{
        form_model::{FormDescriptor, FormElement, SubmitControlState},
        validation::validate_required,
    },
    page::{
        document::{Document, PageSurface, resolve_action},
        notification::NotificationCategory,
    },
    submit::{
        error::SubmitError,
        outcome::{OutcomeMessages, SubmissionOutcome, classify},
        transport::{Transport, TransportError, TransportErrorKind, TransportResponse},
    },
    trace::{
        logger::TraceLogger,
        trace::{SubmissionTrace, TracePhase},
    },
};

pub const DEFAULT_MARKER_CLASS: &str = "ajax-form";
pub const DEFAULT_BUSY_LABEL: &str = "Processing...";

// ============================================================================
// Submitter configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitterConfig {
    /// Class that opts a form into ajax submission
    pub marker_class: String,

    /// Submit control label while a request is in flight
    pub busy_label: String,

    /// Check required fields before sending
    pub validate_required: bool,

    pub messages: OutcomeMessages,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            marker_class: DEFAULT_MARKER_CLASS.to_string(),
            busy_label: DEFAULT_BUSY_LABEL.to_string(),
            validate_required: false,
            messages: OutcomeMessages::default(),
        }
    }
}

// ============================================================================
// Submission lifecycle
// ============================================================================

/// A submission between dispatch and completion. Holds the control
/// snapshot that `complete` puts back.
#[derive(Debug)]
pub struct PendingSubmission {
    pub form: String,
    pub request: FormDescriptor,
    pub snapshot: SubmitControlState,

    /// Set when the action did not resolve to a URL. Such a request is
    /// never sent and completes as this transport failure.
    pub blocked: Option<TransportError>,

    started: Instant,
}

/// Turns submits of registered forms into async requests and renders what
/// comes back onto a `PageSurface`.
///
/// Every dispatched submission is bracketed: `begin` puts the control into
/// its busy state before anything is sent, `complete` restores the
/// snapshot after the outcome is known, whatever it is.
pub struct FormSubmitter {
    config: SubmitterConfig,
    transport: Box<dyn Transport>,
    tracer: TraceLogger,
    registered: BTreeSet<String>,
    in_flight: HashSet<String>,
}

impl FormSubmitter {
    pub fn new(config: SubmitterConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            tracer: TraceLogger::disabled(),
            registered: BTreeSet::new(),
            in_flight: HashSet::new(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    /// One-time scan: registers every marked form currently on the page.
    /// Forms added later need an explicit `register`.
    pub fn register_all(&mut self, document: &Document) -> usize {
        document
            .keyed_forms()
            .into_iter()
            .filter(|(key, form)| self.register(key, form))
            .count()
    }

    /// Register a single form. Returns true if it carries the marker and
    /// was not registered before.
    pub fn register(&mut self, key: &str, form: &FormElement) -> bool {
        if !form.has_class(&self.config.marker_class) {
            return false;
        }
        self.registered.insert(key.to_string())
    }

    pub fn is_registered(&self, key: &str) -> bool {
        self.registered.contains(key)
    }

    pub fn registered(&self) -> impl Iterator<Item = &str> {
        self.registered.iter().map(String::as_str)
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.in_flight.contains(key)
    }

    /// Full cycle for one submit event.
    pub fn submit(&mut self, page: &mut dyn PageSurface, key: &str) -> Result<SubmissionOutcome, SubmitError> {
        let pending = self.begin(page, key)?;
        let result = match &pending.blocked {
            Some(e) => Err(e.clone()),
            None => self.transport.send(&pending.request),
        };
        self.complete(page, pending, result)
    }

    /// Capture the form, snapshot its control and switch it to busy.
    /// Nothing is sent yet.
    pub fn begin(&mut self, page: &mut dyn PageSurface, key: &str) -> Result<PendingSubmission, SubmitError> {
        let form = match page.form(key) {
            Some(f) => f,
            None => return Err(self.reject(key, SubmitError::FormNotFound(key.to_string()))),
        };

        if !self.registered.contains(key) {
            return Err(self.reject(key, SubmitError::NotRegistered(key.to_string())));
        }

        if self.in_flight.contains(key) {
            return Err(self.reject(key, SubmitError::AlreadyInFlight(key.to_string())));
        }

        let report = self.config.validate_required.then(|| validate_required(form));
        // An action that does not resolve fails like an unreachable server
        let (request, blocked) = match resolve_action(page.base_url(), &form.action) {
            Ok(action) => (form.capture(&action), None),
            Err(e) => (
                form.capture(&form.action),
                Some(TransportError::new(TransportErrorKind::Other, &e.to_string())),
            ),
        };
        let snapshot = form.submit.clone();

        if let Some(report) = report {
            if let Err(e) = page.mark_invalid(key, &report.missing) {
                return Err(self.reject(key, e));
            }
            if !report.is_valid() {
                if let Err(e) = page.insert_notification(NotificationCategory::Error, &self.config.messages.validation) {
                    return Err(self.reject(key, e));
                }
                return Err(self.reject(
                    key,
                    SubmitError::Validation {
                        form: key.to_string(),
                        missing: report.missing,
                    },
                ));
            }
        }

        let busy = SubmitControlState {
            label: self.config.busy_label.clone(),
            disabled: true,
        };
        if let Err(e) = page.set_submit_control(key, &busy) {
            return Err(self.reject(key, e));
        }
        self.in_flight.insert(key.to_string());

        self.tracer
            .log(&SubmissionTrace::now(TracePhase::Begin, key).with_request(&request));

        Ok(PendingSubmission {
            form: key.to_string(),
            request,
            snapshot,
            blocked,
            started: Instant::now(),
        })
    }

    /// Classify and render the result, then restore the control. The
    /// restore runs even when rendering fails; a render error is reported
    /// only afterwards.
    pub fn complete(
        &mut self,
        page: &mut dyn PageSurface,
        pending: PendingSubmission,
        result: Result<TransportResponse, TransportError>,
    ) -> Result<SubmissionOutcome, SubmitError> {
        let classified = classify(&result, &self.config.messages);

        let rendered = render(page, &classified.outcome);
        let restored = page.set_submit_control(&pending.form, &pending.snapshot);
        self.in_flight.remove(&pending.form);

        let mut event = SubmissionTrace::now(TracePhase::Complete, &pending.form)
            .with_request(&pending.request)
            .with_classified(&classified)
            .with_elapsed(pending.started.elapsed().as_millis());
        if let Err(e) = rendered.as_ref().and(restored.as_ref()) {
            event = event.with_reason(e);
        }
        self.tracer.log(&event);

        rendered?;
        restored?;
        Ok(classified.outcome)
    }

    fn reject(&self, key: &str, error: SubmitError) -> SubmitError {
        self.tracer
            .log(&SubmissionTrace::now(TracePhase::Rejected, key).with_reason(&error));
        error
    }
}

fn render(page: &mut dyn PageSurface, outcome: &SubmissionOutcome) -> Result<(), SubmitError> {
    match outcome {
        SubmissionOutcome::Redirect { location } => page.navigate(location),
        other => match other.notification() {
            Some((category, message)) => page.insert_notification(category, message),
            None => Ok(()),
        },
    }
}
