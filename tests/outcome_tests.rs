use ajax_forms::page::notification::NotificationCategory;
use ajax_forms::submit::outcome::{
    DEFAULT_FAILURE_MESSAGE, DEFAULT_NETWORK_MESSAGE, DEFAULT_SUCCESS_MESSAGE, OutcomeMessages,
    ResponseBody, SubmissionOutcome, classify, is_success_status,
};
use ajax_forms::submit::transport::{TransportError, TransportErrorKind, TransportResponse};

fn classify_response(status: u16, body: &str) -> SubmissionOutcome {
    classify(&Ok(TransportResponse::new(status, body)), &OutcomeMessages::default()).outcome
}

// ============================================================================
// Success path
// ============================================================================

#[test]
fn ok_with_redirect_is_redirect() {
    assert_eq!(
        classify_response(200, r#"{"redirect": "/welcome"}"#),
        SubmissionOutcome::Redirect {
            location: "/welcome".into()
        }
    );
}

#[test]
fn ok_with_empty_object_is_generic_success() {
    assert_eq!(
        classify_response(200, "{}"),
        SubmissionOutcome::Success {
            message: DEFAULT_SUCCESS_MESSAGE.into()
        }
    );
}

#[test]
fn ok_with_empty_or_non_string_redirect_is_success() {
    assert!(matches!(
        classify_response(200, r#"{"redirect": ""}"#),
        SubmissionOutcome::Success { .. }
    ));
    assert!(matches!(
        classify_response(201, r#"{"redirect": null}"#),
        SubmissionOutcome::Success { .. }
    ));
    assert!(matches!(
        classify_response(204, r#"{"redirect": 42}"#),
        SubmissionOutcome::Success { .. }
    ));
}

#[test]
fn ok_ignores_error_field() {
    assert!(matches!(
        classify_response(200, r#"{"error": "ignored"}"#),
        SubmissionOutcome::Success { .. }
    ));
}

#[test]
fn ok_with_unparseable_body_is_success_but_flagged() {
    let classified = classify(
        &Ok(TransportResponse::new(200, "<html>thanks</html>")),
        &OutcomeMessages::default(),
    );
    assert!(matches!(classified.outcome, SubmissionOutcome::Success { .. }));
    assert!(!classified.body_parsed);
    assert_eq!(classified.status, Some(200));
}

#[test]
fn json_array_body_is_not_parsed() {
    assert!(ResponseBody::parse(r#"["/welcome"]"#).is_none());
    assert!(ResponseBody::parse("null").is_none());
    assert!(ResponseBody::parse(r#"{"redirect": "/x", "extra": true}"#).is_some());
}

// ============================================================================
// Application errors
// ============================================================================

#[test]
fn non_2xx_uses_server_error_text() {
    assert_eq!(
        classify_response(400, r#"{"error": "username taken"}"#),
        SubmissionOutcome::ApplicationError {
            message: "username taken".into()
        }
    );
}

#[test]
fn non_2xx_without_error_uses_generic_failure() {
    for body in ["{}", "", "Internal Server Error", r#"{"error": ""}"#] {
        assert_eq!(
            classify_response(500, body),
            SubmissionOutcome::ApplicationError {
                message: DEFAULT_FAILURE_MESSAGE.into()
            },
            "body: {:?}",
            body
        );
    }
}

#[test]
fn non_2xx_redirect_is_not_followed() {
    assert!(matches!(
        classify_response(302, r#"{"redirect": "/welcome"}"#),
        SubmissionOutcome::ApplicationError { .. }
    ));
}

#[test]
fn success_status_range() {
    assert!(is_success_status(200));
    assert!(is_success_status(299));
    assert!(!is_success_status(199));
    assert!(!is_success_status(300));
    assert!(!is_success_status(404));
}

// ============================================================================
// Network errors
// ============================================================================

#[test]
fn transport_failure_is_network_error_without_status() {
    for kind in [
        TransportErrorKind::Connect,
        TransportErrorKind::Timeout,
        TransportErrorKind::Other,
    ] {
        let classified = classify(
            &Err(TransportError::new(kind, "boom")),
            &OutcomeMessages::default(),
        );
        assert_eq!(
            classified.outcome,
            SubmissionOutcome::NetworkError {
                message: DEFAULT_NETWORK_MESSAGE.into()
            }
        );
        assert_eq!(classified.status, None);
        assert!(!classified.body_parsed);
    }
}

#[test]
fn custom_messages_are_used() {
    let messages = OutcomeMessages {
        success: "Saved!".into(),
        failure: "Nope".into(),
        network: "Offline".into(),
        validation: "Fill it in".into(),
    };

    let ok = classify(&Ok(TransportResponse::new(200, "{}")), &messages).outcome;
    let bad = classify(&Ok(TransportResponse::new(422, "{}")), &messages).outcome;
    let down = classify(&Err(TransportError::connection_refused()), &messages).outcome;

    assert_eq!(ok, SubmissionOutcome::Success { message: "Saved!".into() });
    assert_eq!(bad, SubmissionOutcome::ApplicationError { message: "Nope".into() });
    assert_eq!(down, SubmissionOutcome::NetworkError { message: "Offline".into() });
}

// ============================================================================
// Outcome helpers
// ============================================================================

#[test]
fn outcome_notification_categories() {
    let redirect = SubmissionOutcome::Redirect { location: "/x".into() };
    let success = SubmissionOutcome::Success { message: "ok".into() };
    let app = SubmissionOutcome::ApplicationError { message: "bad".into() };
    let net = SubmissionOutcome::NetworkError { message: "down".into() };

    assert_eq!(redirect.notification(), None);
    assert_eq!(success.notification(), Some((NotificationCategory::Success, "ok")));
    assert_eq!(app.notification(), Some((NotificationCategory::Error, "bad")));
    assert_eq!(net.notification(), Some((NotificationCategory::Error, "down")));

    assert!(!redirect.is_error());
    assert!(!success.is_error());
    assert!(app.is_error());
    assert!(net.is_error());
}

#[test]
fn outcome_serializes_with_kind_tag() {
    let json = serde_json::to_value(SubmissionOutcome::Redirect {
        location: "/welcome".into(),
    })
    .unwrap();
    assert_eq!(json["kind"], "Redirect");
    assert_eq!(json["location"], "/welcome");
}
