//! Unit tests for the error vocabulary and responders.

use http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};
use strum::IntoEnumIterator;

use super::responders::{
    BAD_REQUEST, CONFLICT, ErrorResponder, FORBIDDEN, INTERNAL_ERROR, METHOD_NOT_ALLOWED,
    NOT_FOUND, NOT_IMPLEMENTED, UNAUTHORIZED, app_not_found, snap_not_found,
};
use super::*;
use crate::Response;

fn error_json(response: &Response) -> Value {
    let envelope = response.envelope().expect("error envelope");
    let bytes = envelope.to_json().expect("encode envelope");
    serde_json::from_slice(&bytes).expect("decode envelope")
}

#[rstest]
#[case(ErrorKind::TwoFactorRequired, "two-factor-required")]
#[case(ErrorKind::LoginRequired, "login-required")]
#[case(ErrorKind::SnapNotASnap, "snap-not-a-snap")]
#[case(ErrorKind::SnapNeedsDevmode, "snap-needs-devmode")]
#[case(ErrorKind::SnapNeedsClassicSystem, "snap-needs-classic-system")]
#[case(ErrorKind::NetworkTimeout, "network-timeout")]
fn kinds_use_their_wire_strings(#[case] kind: ErrorKind, #[case] wire: &str) {
    assert_eq!(kind.as_str(), wire);
    assert_eq!(kind.to_string(), wire);
    assert_eq!(
        serde_json::to_value(kind).expect("encode kind"),
        json!(wire)
    );
}

#[test]
fn every_kind_round_trips_through_its_wire_string() {
    let kinds: Vec<ErrorKind> = ErrorKind::iter().collect();
    assert_eq!(kinds.len(), 20);
    for kind in kinds {
        let parsed: ErrorKind = kind.as_str().parse().expect("parse kind");
        assert_eq!(parsed, kind);
        let decoded: ErrorKind =
            serde_json::from_value(json!(kind.as_str())).expect("decode kind");
        assert_eq!(decoded, kind);
    }
}

#[test]
fn unknown_kinds_are_rejected() {
    assert!("snap-on-fire".parse::<ErrorKind>().is_err());
}

#[test]
fn error_results_always_carry_a_message() {
    let encoded = serde_json::to_value(ErrorResult::new("")).expect("encode result");
    assert_eq!(encoded, json!({"message": ""}));

    let detailed = ErrorResult::new("cannot find \"hello\"")
        .with_kind(ErrorKind::SnapNotFound)
        .with_value("hello");
    assert_eq!(
        serde_json::to_value(detailed).expect("encode result"),
        json!({"message": "cannot find \"hello\"", "kind": "snap-not-found", "value": "hello"})
    );
}

#[rstest]
#[case(BAD_REQUEST, 400)]
#[case(FORBIDDEN, 403)]
#[case(NOT_FOUND, 404)]
#[case(METHOD_NOT_ALLOWED, 405)]
#[case(CONFLICT, 409)]
#[case(INTERNAL_ERROR, 500)]
#[case(NOT_IMPLEMENTED, 501)]
fn generic_responders_leave_the_kind_unset(#[case] responder: ErrorResponder, #[case] code: u16) {
    let response = responder.respond(format_args!("cannot do {}", "that"));

    assert_eq!(responder.status().as_u16(), code);
    let document = error_json(&response);
    assert_eq!(document["type"], "error");
    assert_eq!(document["status-code"], code);
    assert_eq!(document["result"], json!({"message": "cannot do that"}));
}

#[test]
fn unauthorized_responder_asks_for_a_login() {
    let document = error_json(&UNAUTHORIZED.respond("access denied"));

    assert_eq!(document["status-code"], 401);
    assert_eq!(document["status"], "Unauthorized");
    assert_eq!(document["result"]["kind"], "login-required");
    assert_eq!(document["result"]["message"], "access denied");
}

#[test]
fn custom_status_responders_build_error_envelopes() {
    let teapot = ErrorResponder::new(StatusCode::IM_A_TEAPOT);
    let response = teapot.respond("short and stout");

    let envelope = response.envelope().expect("error envelope");
    assert_eq!(envelope.status(), StatusCode::IM_A_TEAPOT);
    assert!(matches!(response, Response::Error(_)));
}

#[test]
fn snap_not_found_names_the_snap() {
    let cause = std::io::Error::other("snap \"hello\" is not installed");
    let document = error_json(&snap_not_found("hello", &cause));

    assert_eq!(document["status-code"], 404);
    assert_eq!(
        document["result"],
        json!({
            "message": "snap \"hello\" is not installed",
            "kind": "snap-not-found",
            "value": "hello",
        })
    );
}

#[test]
fn app_not_found_tags_the_kind() {
    let document = error_json(&app_not_found("no app \"shell\" in snap \"core\""));

    assert_eq!(document["status-code"], 404);
    assert_eq!(document["result"]["kind"], "app-not-found");
    assert!(document["result"].get("value").is_none());
}
