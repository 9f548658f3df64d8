//! Unit tests for the JSON envelope.

use http::StatusCode;
use rstest::rstest;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::json;

use super::*;
use crate::ErrorKind;
use crate::output::RecordedResponse;

struct Unencodable;

impl Serialize for Unencodable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("refusing to encode"))
    }
}

fn operation(resource: &str) -> Map<String, Value> {
    let mut operation = Map::new();
    operation.insert("resource".to_owned(), json!(resource));
    operation.insert("id".to_owned(), json!("42"));
    operation
}

fn served(envelope: Envelope) -> RecordedResponse {
    let mut out = RecordedResponse::new();
    envelope.serve(&mut out);
    out
}

fn body_text(envelope: &Envelope) -> String {
    String::from_utf8(envelope.to_json().expect("encode envelope")).expect("utf8 envelope")
}

#[test]
fn sync_envelope_flattens_metadata() {
    let meta = Meta::default()
        .with_sources(["store", "local"])
        .with_paging(1, 3)
        .with_suggested_currency("GBP");
    let envelope = Envelope::sync(Box::new(vec!["core", "snapd"]), Some(meta));

    insta::assert_snapshot!(
        body_text(&envelope),
        @r#"{"type":"sync","status-code":200,"status":"OK","result":["core","snapd"],"sources":["store","local"],"paging":{"page":1,"pages":3},"suggested-currency":"GBP"}"#
    );
}

#[rstest]
#[case(None)]
#[case(Some(Meta::default()))]
fn absent_metadata_is_omitted(#[case] meta: Option<Meta>) {
    let envelope = Envelope::sync(Box::new(json!({"name": "core"})), meta);

    assert_eq!(
        body_text(&envelope),
        r#"{"type":"sync","status-code":200,"status":"OK","result":{"name":"core"}}"#
    );
}

#[test]
fn unit_results_encode_as_null() {
    let envelope = Envelope::sync(Box::new(()), None);
    let decoded = WireEnvelope::from_slice(&envelope.to_json().expect("encode")).expect("decode");

    assert_eq!(decoded.result, Value::Null);
}

#[test]
fn served_sync_envelope_is_json() {
    let out = served(Envelope::sync(Box::new(json!([])), None));

    assert_eq!(out.status(), Some(StatusCode::OK));
    assert_eq!(out.header("content-type"), Some(JSON_MEDIA_TYPE));
    assert!(out.header("location").is_none());
}

#[test]
fn async_envelope_points_at_its_resource() {
    let meta = Meta::default().with_change("42");
    let out = served(Envelope::asynchronous(
        operation("/v2/changes/42"),
        Some(meta),
    ));

    assert_eq!(out.status(), Some(StatusCode::ACCEPTED));
    assert_eq!(out.header("location"), Some("/v2/changes/42"));
    let decoded = WireEnvelope::from_slice(out.body()).expect("decode envelope");
    assert_eq!(decoded.kind, ResponseType::Async);
    assert_eq!(decoded.status_code, 202);
    assert_eq!(decoded.status, "Accepted");
    assert_eq!(decoded.meta.change.as_deref(), Some("42"));
}

#[test]
fn async_envelope_without_resource_sets_no_location() {
    let mut pending = Map::new();
    pending.insert("id".to_owned(), json!("7"));
    let out = served(Envelope::asynchronous(pending, None));

    assert_eq!(out.status(), Some(StatusCode::ACCEPTED));
    assert!(out.header("location").is_none());
}

#[rstest]
#[case(StatusCode::CREATED, json!({"resource": "/v2/snaps/core"}), Some("/v2/snaps/core"))]
#[case(StatusCode::ACCEPTED, json!({"resource": "/v2/changes/1"}), Some("/v2/changes/1"))]
#[case(StatusCode::OK, json!({"resource": "/v2/snaps/core"}), None)]
#[case(StatusCode::ACCEPTED, json!({"resource": ""}), None)]
#[case(StatusCode::ACCEPTED, json!({"resource": 7}), None)]
#[case(StatusCode::CREATED, json!(["/v2/snaps/core"]), None)]
fn location_follows_created_and_accepted_resources(
    #[case] status: StatusCode,
    #[case] result: Value,
    #[case] expected: Option<&str>,
) {
    assert_eq!(resource_location(status, &result), expected);
}

#[test]
fn unencodable_results_degrade_to_an_empty_internal_error() {
    let out = served(Envelope::sync(Box::new(Unencodable), None));

    assert_eq!(out.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(out.header("content-type"), Some(JSON_MEDIA_TYPE));
    assert!(out.body().is_empty());
}

#[test]
fn encode_errors_name_the_envelope_type() {
    let envelope = Envelope::sync(Box::new(Unencodable), None);
    let error = envelope.to_json().expect_err("result must fail");

    assert!(matches!(
        error,
        EncodeError::Result {
            kind: ResponseType::Sync,
            ..
        }
    ));
    assert!(error.to_string().starts_with("cannot encode sync result"));
}

#[test]
fn statuses_without_a_reason_phrase_have_empty_text() {
    let status = StatusCode::from_u16(599).expect("valid status");
    let envelope = Envelope::error(status, ErrorResult::new("odd"));
    let decoded = WireEnvelope::from_slice(&envelope.to_json().expect("encode")).expect("decode");

    assert_eq!(decoded.status_code, 599);
    assert_eq!(decoded.status, "");
}

#[test]
fn error_envelopes_decode_into_error_results() {
    let result = ErrorResult::new("cannot install")
        .with_kind(ErrorKind::SnapAlreadyInstalled)
        .with_value("core");
    let out = served(Envelope::error(StatusCode::CONFLICT, result.clone()));

    assert_eq!(out.status(), Some(StatusCode::CONFLICT));
    let decoded = WireEnvelope::from_slice(out.body()).expect("decode envelope");
    assert_eq!(decoded.kind, ResponseType::Error);
    assert_eq!(decoded.error_result(), Some(result));
}

#[test]
fn sync_envelopes_have_no_error_result() {
    let envelope = Envelope::sync(Box::new(json!({"message": "not an error"})), None);
    let decoded = WireEnvelope::from_slice(&envelope.to_json().expect("encode")).expect("decode");

    assert_eq!(decoded.error_result(), None);
}

#[test]
fn disconnected_peers_do_not_disturb_serving() {
    let mut out = RecordedResponse::new().disconnect_after(0);
    Envelope::sync(Box::new(json!({"large": "payload"})), None).serve(&mut out);

    assert_eq!(out.status(), Some(StatusCode::OK));
    assert!(out.body().is_empty());
}

#[test]
fn meta_reports_emptiness() {
    assert!(Meta::default().is_empty());
    assert!(!Meta::default().with_change("1").is_empty());
    assert_eq!(
        Meta::default().with_paging(2, 5).paging,
        Some(Paging { page: 2, pages: 5 })
    );
}

#[test]
fn response_types_display_as_wire_strings() {
    assert_eq!(ResponseType::Sync.to_string(), "sync");
    assert_eq!(ResponseType::Async.to_string(), "async");
    assert_eq!(ResponseType::Error.to_string(), "error");
}
