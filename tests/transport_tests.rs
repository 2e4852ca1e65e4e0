mod common;

use std::time::Duration;

use ajax_forms::form::form_model::{
    FieldValue, FilePayload, FormDescriptor, FormFields, HttpMethod,
};
use ajax_forms::page::document::Document;
use ajax_forms::submit::outcome::SubmissionOutcome;
use ajax_forms::submit::submitter::{FormSubmitter, SubmitterConfig};
use ajax_forms::submit::transport::{HttpTransport, Transport, TransportErrorKind};
use common::utils::{closed_port_url, serve_once, signup_form};

fn descriptor(method: HttpMethod, url: &str) -> FormDescriptor {
    let mut fields = FormFields::new();
    fields.append("username", FieldValue::Text("alice".into()));
    FormDescriptor {
        action: url.to_string(),
        method,
        fields,
    }
}

#[test]
fn post_sends_multipart_fields() {
    let (base, server) = serve_once(200, "{}");
    let transport = HttpTransport::new(Some(Duration::from_secs(10))).unwrap();

    let response = transport
        .send(&descriptor(HttpMethod::Post, &format!("{}/signup", base)))
        .unwrap();
    let request = server.join().unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "{}");
    assert!(request.starts_with("POST /signup HTTP/1.1"));
    assert!(request.to_lowercase().contains("content-type: multipart/form-data; boundary="));
    assert!(request.contains("name=\"username\""));
    assert!(request.contains("alice"));
}

#[test]
fn post_sends_file_parts_with_name_and_type() {
    let (base, server) = serve_once(201, "{}");
    let transport = HttpTransport::new(None).unwrap();

    let mut fields = FormFields::new();
    fields.append("caption", FieldValue::Text("me".into()));
    fields.append(
        "avatar",
        FieldValue::File(FilePayload {
            file_name: "me.txt".into(),
            content_type: Some("text/plain".into()),
            data: b"hello avatar".to_vec(),
        }),
    );
    let request = FormDescriptor {
        action: format!("{}/avatar", base),
        method: HttpMethod::Put,
        fields,
    };

    let response = transport.send(&request).unwrap();
    let raw = server.join().unwrap();

    assert_eq!(response.status, 201);
    assert!(raw.starts_with("PUT /avatar HTTP/1.1"));
    assert!(raw.contains("name=\"avatar\"; filename=\"me.txt\""));
    assert!(raw.to_lowercase().contains("content-type: text/plain"));
    assert!(raw.contains("hello avatar"));
    assert!(raw.contains("name=\"caption\""));
}

#[test]
fn get_sends_query_string() {
    let (base, server) = serve_once(200, "{}");
    let transport = HttpTransport::new(None).unwrap();

    let mut request = descriptor(HttpMethod::Get, &format!("{}/search", base));
    request.fields.append("q", FieldValue::Text("apple pie".into()));
    transport.send(&request).unwrap();
    let raw = server.join().unwrap();

    assert!(raw.starts_with("GET /search?username=alice&q=apple+pie HTTP/1.1"));
}

#[test]
fn get_replaces_query_already_on_action() {
    let (base, server) = serve_once(200, "{}");
    let transport = HttpTransport::new(None).unwrap();

    let mut fields = FormFields::new();
    fields.append("q", FieldValue::Text("apple".into()));
    let request = FormDescriptor {
        action: format!("{}/search?page=2", base),
        method: HttpMethod::Get,
        fields,
    };
    transport.send(&request).unwrap();
    let raw = server.join().unwrap();

    assert!(raw.starts_with("GET /search?q=apple HTTP/1.1"));
}

#[test]
fn error_status_is_a_response_not_a_transport_error() {
    let (base, server) = serve_once(400, r#"{"error": "username taken"}"#);
    let transport = HttpTransport::new(None).unwrap();

    let response = transport
        .send(&descriptor(HttpMethod::Post, &format!("{}/signup", base)))
        .unwrap();
    server.join().unwrap();

    assert_eq!(response.status, 400);
    assert_eq!(response.body, r#"{"error": "username taken"}"#);
}

#[test]
fn connection_refused_is_connect_error() {
    let transport = HttpTransport::new(Some(Duration::from_secs(5))).unwrap();

    let error = transport
        .send(&descriptor(HttpMethod::Post, &format!("{}/signup", closed_port_url())))
        .unwrap_err();

    assert_eq!(error.kind, TransportErrorKind::Connect);
    assert!(!error.message.is_empty());
}

// ============================================================================
// End to end: submitter over real HTTP
// ============================================================================

#[test]
fn submitter_over_http_follows_redirect_field() {
    let (base, server) = serve_once(200, r#"{"redirect": "/welcome"}"#);
    let mut doc = Document::new(&format!("{}/auth", base));
    doc.add_form(signup_form());

    let transport = HttpTransport::new(Some(Duration::from_secs(10))).unwrap();
    let mut submitter = FormSubmitter::new(SubmitterConfig::default(), Box::new(transport));
    submitter.register_all(&doc);

    let outcome = submitter.submit(&mut doc, "signup").unwrap();
    let raw = server.join().unwrap();

    assert_eq!(
        outcome,
        SubmissionOutcome::Redirect {
            location: "/welcome".into()
        }
    );
    assert!(raw.starts_with("POST /signup HTTP/1.1"));
    assert_eq!(doc.navigated_to.as_deref(), Some("/welcome"));
    assert!(doc.notifications.is_empty());
}

#[test]
fn submitter_over_http_reports_unreachable_server() {
    let mut doc = Document::new(&format!("{}/auth", closed_port_url()));
    doc.add_form(signup_form());

    let transport = HttpTransport::new(Some(Duration::from_secs(5))).unwrap();
    let mut submitter = FormSubmitter::new(SubmitterConfig::default(), Box::new(transport));
    submitter.register_all(&doc);

    let outcome = submitter.submit(&mut doc, "signup").unwrap();

    assert!(matches!(outcome, SubmissionOutcome::NetworkError { .. }));
    assert_eq!(doc.notifications.len(), 1);
    assert_eq!(doc.form_mut("signup").unwrap().submit.label, "Sign up");
    assert!(!doc.form_mut("signup").unwrap().submit.disabled);
}
