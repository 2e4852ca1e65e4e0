use std::time::{Duration, Instant};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{
    form::{
        form_model::{FormElement, SubmitControlState, form_key},
        validation::apply_invalid_markers,
    },
    page::notification::{NotificationArea, NotificationCategory},
    submit::error::SubmitError,
};

/// Everything the submitter reads from or writes to the page.
///
/// `Document` is the in-memory implementation. Anything else that can show
/// a notification, navigate and toggle a submit control can stand in for it.
pub trait PageSurface {
    /// URL relative form actions are resolved against
    fn base_url(&self) -> &str;

    fn form(&self, key: &str) -> Option<&FormElement>;

    fn set_submit_control(&mut self, key: &str, state: &SubmitControlState) -> Result<(), SubmitError>;

    fn mark_invalid(&mut self, key: &str, names: &[String]) -> Result<(), SubmitError>;

    fn insert_notification(&mut self, category: NotificationCategory, message: &str) -> Result<(), SubmitError>;

    fn navigate(&mut self, location: &str) -> Result<(), SubmitError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub url: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub forms: Vec<FormElement>,

    #[serde(skip)]
    pub notifications: NotificationArea,

    /// Set once a redirect has been followed
    #[serde(skip)]
    pub navigated_to: Option<String>,
}

impl Document {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            forms: vec![],
            notifications: NotificationArea::default(),
            navigated_to: None,
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml(&content)?)
    }

    pub fn with_notification_dwell(mut self, dwell: Duration) -> Self {
        self.notifications = NotificationArea::with_dwell(dwell);
        self
    }

    /// Append a form after load. Returns its key.
    pub fn add_form(&mut self, form: FormElement) -> String {
        let key = form_key(&form, self.forms.len());
        self.forms.push(form);
        key
    }

    /// (key, form) for every form in page order.
    pub fn keyed_forms(&self) -> Vec<(String, &FormElement)> {
        self.forms
            .iter()
            .enumerate()
            .map(|(i, f)| (form_key(f, i), f))
            .collect()
    }

    pub fn form_mut(&mut self, key: &str) -> Option<&mut FormElement> {
        let index = self.index_of(key)?;
        self.forms.get_mut(index)
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.forms
            .iter()
            .enumerate()
            .position(|(i, f)| form_key(f, i) == key)
    }

    /// Drop notifications whose dwell time has run out.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.notifications.expire(now)
    }
}

impl PageSurface for Document {
    fn base_url(&self) -> &str {
        &self.url
    }

    fn form(&self, key: &str) -> Option<&FormElement> {
        let index = self.index_of(key)?;
        self.forms.get(index)
    }

    fn set_submit_control(&mut self, key: &str, state: &SubmitControlState) -> Result<(), SubmitError> {
        let form = self
            .form_mut(key)
            .ok_or_else(|| SubmitError::FormNotFound(key.to_string()))?;
        form.submit = state.clone();
        Ok(())
    }

    fn mark_invalid(&mut self, key: &str, names: &[String]) -> Result<(), SubmitError> {
        let form = self
            .form_mut(key)
            .ok_or_else(|| SubmitError::FormNotFound(key.to_string()))?;
        apply_invalid_markers(form, names);
        Ok(())
    }

    fn insert_notification(&mut self, category: NotificationCategory, message: &str) -> Result<(), SubmitError> {
        self.notifications.insert(category, message, Instant::now());
        Ok(())
    }

    fn navigate(&mut self, location: &str) -> Result<(), SubmitError> {
        self.navigated_to = Some(location.to_string());
        Ok(())
    }
}

/// Resolve a form action against the page URL. An empty action targets the
/// page itself.
pub fn resolve_action(base: &str, action: &str) -> Result<String, SubmitError> {
    let invalid = |reason: String| SubmitError::InvalidAction {
        action: action.to_string(),
        reason,
    };

    let action = action.trim();

    match Url::parse(base) {
        Ok(base_url) if action.is_empty() => Ok(base_url.to_string()),
        Ok(base_url) => base_url
            .join(action)
            .map(|u| u.to_string())
            .map_err(|e| invalid(e.to_string())),
        // No usable page URL: only absolute actions can be resolved
        Err(e) => Url::parse(action)
            .map(|u| u.to_string())
            .map_err(|_| invalid(format!("page URL '{}' is not absolute ({})", base, e))),
    }
}
