#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;
use std::time::Duration;

use ajax_forms::form::form_model::{FormElement, FormField, SubmitControlState};
use ajax_forms::page::document::Document;

pub fn fixture(name: &str) -> String {
    let base = std::env::current_dir().unwrap();
    let path = base.join("tests").join("fixtures").join(name);

    path.display().to_string()
}

/// `/signup` form posting `username=alice`, marked for ajax submission.
pub fn signup_form() -> FormElement {
    FormElement {
        id: Some("signup".into()),
        classes: vec!["ajax-form".into()],
        action: "/signup".into(),
        method: "POST".into(),
        fields: vec![FormField::text("username", "alice")],
        submit: SubmitControlState {
            label: "Sign up".into(),
            disabled: false,
        },
    }
}

pub fn signup_document() -> Document {
    let mut doc = Document::new("http://localhost:5000/auth");
    doc.add_form(signup_form());
    doc
}

pub fn control_of(doc: &Document, key: &str) -> SubmitControlState {
    doc.keyed_forms()
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, f)| f.submit.clone())
        .unwrap()
}

// ============================================================================
// Throwaway HTTP server
// ============================================================================

/// Serve exactly one request with a canned response. The join handle yields
/// the raw request as text.
pub fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let body = body.to_string();

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        let request = read_request(&mut stream);

        let response = format!(
            "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();

        request
    });

    (base, handle)
}

/// URL of a port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn read_request(stream: &mut std::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        data.extend_from_slice(&buf[..n]);
        if request_complete(&data) {
            break;
        }
    }

    String::from_utf8_lossy(&data).to_string()
}

fn request_complete(data: &[u8]) -> bool {
    let text = String::from_utf8_lossy(data);
    let header_end = match text.find("\r\n\r\n") {
        Some(i) => i,
        None => return false,
    };
    let headers = text[..header_end].to_lowercase();
    let body_len = data.len() - (header_end + 4);

    if let Some(line) = headers.lines().find(|l| l.starts_with("content-length:")) {
        let expected: usize = line["content-length:".len()..].trim().parse().unwrap_or(0);
        return body_len >= expected;
    }
    if headers.contains("transfer-encoding: chunked") {
        return text.ends_with("0\r\n\r\n");
    }
    true
}
