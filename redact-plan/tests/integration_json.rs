//! Descriptor trees read from JSON and plans written back as JSON.
//!
//! The reflection layer may hand schemas over as JSON; the renderer consumes
//! the serialized [`ProtoFileData`].

#![cfg(feature = "json")]

use redact_plan::{FileDescriptor, PlanError, Planner, ProtoFileData};
use serde_json::{json, Value as JsonValue};

fn fixture() -> JsonValue {
    json!({
        "name": "acme/billing/v1/invoice.proto",
        "package": "billingv1",
        "import_path": "example.com/acme/billing/v1",
        "messages": [{
            "type_ref": { "name": "Invoice", "full_name": "acme.billing.v1.Invoice" },
            "fields": [
                { "name": "Number", "kind": "string" },
                {
                    "name": "CardNumber",
                    "kind": "string",
                    "annotation": { "custom": { "value": { "string": "****" } } }
                },
                {
                    "name": "Discount",
                    "kind": "double",
                    "proto3_optional": true,
                    "annotation": { "redact": true }
                },
                {
                    "name": "Notes",
                    "kind": "string",
                    "cardinality": { "map": { "key": "int64" } },
                    "annotation": { "custom": { "value": { "element": { "empty": true } } } }
                },
                {
                    "name": "Lines",
                    "kind": "message",
                    "cardinality": "repeated",
                    "type_ref": { "name": "Line", "full_name": "acme.billing.v1.Line" },
                    "annotation": { "custom": { "value": { "element": {
                        "item": { "value": { "message": { "nil": true } } }
                    } } } }
                }
            ]
        }],
        "services": [{
            "name": "BillingService",
            "full_name": "acme.billing.v1.BillingService",
            "methods": [{
                "name": "GetInvoice",
                "full_name": "acme.billing.v1.BillingService.GetInvoice",
                "input": { "name": "GetInvoiceRequest", "full_name": "acme.billing.v1.GetInvoiceRequest" },
                "output": {
                    "type_ref": { "name": "Invoice", "full_name": "acme.billing.v1.Invoice" }
                },
                "options": {
                    "internal": true,
                    "internal_code": 5,
                    "internal_err_message": "%method% is unavailable in %service%"
                }
            }]
        }]
    })
}

fn plan(value: JsonValue) -> Result<Option<ProtoFileData>, redact_plan::Diagnostics> {
    let file: FileDescriptor = serde_json::from_value(value).unwrap();
    Planner::default().plan_file(&file)
}

#[test]
fn test_fixture_plans() {
    let data = plan(fixture()).unwrap().unwrap();
    let fields = &data.messages[0].fields;

    assert!(!fields[0].redact);
    assert_eq!(fields[1].redaction_value.as_deref(), Some("`****`"));
    assert_eq!(
        fields[2].redaction_value.as_deref(),
        Some("func() *float64 { v := float64(0); return &v }()")
    );
    assert_eq!(fields[3].redaction_value.as_deref(), Some("map[int64]string{}"));
    assert!(fields[4].iterate);
    assert_eq!(fields[4].redaction_value.as_deref(), Some("nil"));

    let method = &data.services[0].methods[0];
    assert_eq!(method.err_message, "GetInvoice is unavailable in BillingService");
}

#[test]
fn test_plan_serializes_for_the_renderer() {
    let data = plan(fixture()).unwrap().unwrap();
    let json: JsonValue = serde_json::from_str(&data.to_json().unwrap()).unwrap();

    assert_eq!(json["source"], "acme/billing/v1/invoice.proto");
    assert_eq!(json["imports"]["grpc"], "google.golang.org/grpc");
    assert_eq!(json["messages"][0]["disposition"], JsonValue::Null);
    assert_eq!(json["messages"][0]["fields"][3]["is_map"], true);

    let method = &json["services"][0]["methods"][0];
    assert_eq!(method["status_code"], "NotFound");
    assert_eq!(method["internal"], true);
    assert_eq!(method["output"]["name"], "Invoice");
}

#[test]
fn test_invalid_fixture_reports_locations() {
    let mut value = fixture();
    value["messages"][0]["fields"][1]["annotation"] = json!({ "custom": { "value": { "int32": 0 } } });
    value["services"][0]["methods"][0]["options"]["internal_code"] = json!(40);

    let errors = plan(value).unwrap_err().into_vec();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].location(), "acme.billing.v1.Invoice.CardNumber");
    assert!(matches!(errors[0], PlanError::TypeMismatch { .. }));
    assert_eq!(
        errors[1].location(),
        "acme.billing.v1.BillingService.GetInvoice"
    );
    assert!(matches!(errors[1], PlanError::InvalidStatusCode { code: 40, .. }));
}

#[test]
fn test_skipped_file_round_trip() {
    let mut value = fixture();
    value["skip"] = json!(true);
    assert_eq!(plan(value).unwrap(), None);
}
