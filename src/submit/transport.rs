use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};

use crate::form::form_model::{FieldValue, FormDescriptor, HttpMethod};

/// What came back once an HTTP status was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Connect,
    Timeout,
    Other,
}

/// No HTTP status was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }

    pub fn connection_refused() -> Self {
        Self::new(TransportErrorKind::Connect, "connection refused")
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} error: {}", self.kind, self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            TransportErrorKind::Timeout
        } else if e.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        };
        Self {
            kind,
            message: e.to_string(),
        }
    }
}

pub trait Transport {
    fn send(&self, request: &FormDescriptor) -> Result<TransportResponse, TransportError>;
}

// ============================================================================
// HTTP Transport
// ============================================================================

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// `timeout` of `None` keeps reqwest's own default.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    fn multipart(request: &FormDescriptor) -> Result<Form, TransportError> {
        let mut form = Form::new();
        for (name, value) in request.fields.iter() {
            form = match value {
                FieldValue::Text(text) => form.text(name.to_string(), text.clone()),
                FieldValue::File(file) => {
                    let mut part = Part::bytes(file.data.clone()).file_name(file.file_name.clone());
                    if let Some(ct) = &file.content_type {
                        part = part.mime_str(ct)?;
                    }
                    form.part(name.to_string(), part)
                }
            };
        }
        Ok(form)
    }

    fn query_pairs(request: &FormDescriptor) -> Vec<(String, String)> {
        request
            .fields
            .iter()
            .map(|(name, value)| {
                let v = match value {
                    FieldValue::Text(text) => text.clone(),
                    FieldValue::File(file) => file.file_name.clone(),
                };
                (name.to_string(), v)
            })
            .collect()
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &FormDescriptor) -> Result<TransportResponse, TransportError> {
        let builder = match request.method {
            HttpMethod::Get => {
                let mut url = reqwest::Url::parse(&request.action)
                    .map_err(|e| TransportError::new(TransportErrorKind::Other, &e.to_string()))?;
                // The form's fields replace whatever query the action carried
                url.set_query(None);
                self.client.get(url).query(&Self::query_pairs(request))
            }
            method => {
                let m = reqwest::Method::from_bytes(method.as_str().as_bytes())
                    .map_err(|e| TransportError::new(TransportErrorKind::Other, &e.to_string()))?;
                self.client
                    .request(m, &request.action)
                    .multipart(Self::multipart(request)?)
            }
        };

        let response = builder.send()?;
        let status = response.status().as_u16();
        // A status was obtained, so an unreadable body is just empty
        let body = response.text().unwrap_or_default();

        Ok(TransportResponse { status, body })
    }
}

// ============================================================================
// Mock Transport (scripted, records what was sent)
// ============================================================================

/// Clones share the same script and request log, so a test can keep one
/// handle while the submitter owns another.
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Rc<RefCell<VecDeque<Result<TransportResponse, TransportError>>>>,
    sent: Rc<RefCell<Vec<FormDescriptor>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.script
            .borrow_mut()
            .push_back(Ok(TransportResponse::new(status, body)));
        self
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.script.borrow_mut().push_back(Err(error));
        self
    }

    pub fn sent(&self) -> Vec<FormDescriptor> {
        self.sent.borrow().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &FormDescriptor) -> Result<TransportResponse, TransportError> {
        self.sent.borrow_mut().push(request.clone());
        // An exhausted script behaves like an unreachable server
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::connection_refused()))
    }
}
