//! Statistics queries for the dashboard charts.

use serde_json::{json, Value};

use binwatch_core::statistics::{
    device_summaries, event_log, hourly_statistics, location_statistics,
};

use crate::adapters::status_store::StatusQuery;
use crate::handlers::http::{error_response, success_response, ApiGatewayResponse};

/// Routes one API Gateway event.
///
/// `GET` with `queryStringParameters.type` of `hourly` (the default),
/// `location`, `events`, or `summary`; an optional `deviceId`
/// parameter narrows both the table read and the response to one
/// device. Anything else is a 400; store failures are 500.
pub fn handle_statistics_request(event: &Value, store: &impl StatusQuery) -> ApiGatewayResponse {
    if event.get("httpMethod").and_then(Value::as_str) != Some("GET") {
        return invalid_request_response();
    }

    let params = event.get("queryStringParameters").cloned().unwrap_or(Value::Null);
    let stats_type = params
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("hourly");
    let device_id = params.get("deviceId").and_then(Value::as_str);

    // Reject an unknown type before paying for the table read.
    if !matches!(stats_type, "hourly" | "location" | "events" | "summary") {
        return invalid_request_response();
    }

    let records = match store.load_records(device_id) {
        Ok(records) => records,
        Err(error) => return store_error_response(error),
    };

    match stats_type {
        "hourly" => success_response(
            200,
            json!({"hourly_stats": device_slice(hourly_statistics(&records), device_id)}),
        ),
        "location" => success_response(
            200,
            json!({"location_stats": device_slice(location_statistics(&records), device_id)}),
        ),
        "events" => success_response(
            200,
            json!({"events": device_slice(event_log(&records), device_id)}),
        ),
        "summary" => success_response(
            200,
            json!({"summary": summary_slice(device_summaries(&records), device_id)}),
        ),
        _ => invalid_request_response(),
    }
}

// With a device filter the response carries only that device's list,
// empty when the device is unknown.
fn device_slice<T: serde::Serialize>(
    mut per_device: std::collections::BTreeMap<String, Vec<T>>,
    device_id: Option<&str>,
) -> Value {
    match device_id {
        Some(device_id) => {
            let slice = per_device.remove(device_id).unwrap_or_default();
            serde_json::to_value(slice).expect("statistics should serialize")
        }
        None => serde_json::to_value(per_device).expect("statistics should serialize"),
    }
}

fn summary_slice(
    mut per_device: std::collections::BTreeMap<String, binwatch_core::statistics::DeviceSummary>,
    device_id: Option<&str>,
) -> Value {
    match device_id {
        Some(device_id) => match per_device.remove(device_id) {
            Some(summary) => serde_json::to_value(summary).expect("summary should serialize"),
            None => json!({}),
        },
        None => serde_json::to_value(per_device).expect("summary should serialize"),
    }
}

fn invalid_request_response() -> ApiGatewayResponse {
    error_response(400, json!("Invalid request"))
}

fn store_error_response(error: String) -> ApiGatewayResponse {
    eprintln!(
        "{}",
        json!({
            "component": "statistics_handler",
            "level": "error",
            "event": "store_read_failed",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": {"error": error.clone()},
        })
    );
    error_response(500, json!({"error": error}))
}
