//! Latest-status queries for the dashboard.

use serde_json::{json, Value};

use binwatch_core::statistics::latest_per_device;

use crate::adapters::status_store::StatusQuery;
use crate::handlers::http::{error_response, success_response, ApiGatewayResponse};

/// Routes one API Gateway event.
///
/// `GET` with a `deviceId` path parameter answers the newest record
/// for that device (404 when it has never reported); `GET` without
/// one answers the newest record per device; `OPTIONS` is the CORS
/// preflight. Store failures map to 500 with an `error` body.
pub fn handle_status_request(event: &Value, store: &impl StatusQuery) -> ApiGatewayResponse {
    match event.get("httpMethod").and_then(Value::as_str) {
        Some("GET") => {}
        Some("OPTIONS") => return success_response(200, "OK"),
        _ => return invalid_method_response(),
    }

    let device_id = event
        .get("pathParameters")
        .and_then(|params| params.get("deviceId"))
        .and_then(Value::as_str);

    match device_id {
        Some(device_id) => single_bin_status(device_id, store),
        None => all_bins_status(store),
    }
}

fn single_bin_status(device_id: &str, store: &impl StatusQuery) -> ApiGatewayResponse {
    match store.latest_for_device(device_id) {
        Ok(Some(record)) => success_response(200, record),
        Ok(None) => error_response(
            404,
            json!({"message": format!("No data found for device: {device_id}")}),
        ),
        Err(error) => store_error_response(error),
    }
}

fn all_bins_status(store: &impl StatusQuery) -> ApiGatewayResponse {
    match store.load_records(None) {
        Ok(records) => {
            let items = latest_per_device(&records);
            success_response(200, json!({"items": items, "count": items.len()}))
        }
        Err(error) => store_error_response(error),
    }
}

fn invalid_method_response() -> ApiGatewayResponse {
    error_response(400, json!("Invalid request method"))
}

fn store_error_response(error: String) -> ApiGatewayResponse {
    eprintln!(
        "{}",
        json!({
            "component": "status_handler",
            "level": "error",
            "event": "store_read_failed",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": {"error": error.clone()},
        })
    );
    error_response(500, json!({"error": error}))
}

#[cfg(test)]
mod tests {
    use binwatch_core::contract::BinStatusRecord;

    use super::*;

    struct FixedStore {
        records: Vec<BinStatusRecord>,
    }

    impl StatusQuery for FixedStore {
        fn latest_for_device(&self, device_id: &str) -> Result<Option<BinStatusRecord>, String> {
            let mut matching: Vec<&BinStatusRecord> = self
                .records
                .iter()
                .filter(|record| record.device_id == device_id)
                .collect();
            matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            Ok(matching.first().map(|record| (*record).clone()))
        }

        fn load_records(&self, device_id: Option<&str>) -> Result<Vec<BinStatusRecord>, String> {
            Ok(self
                .records
                .iter()
                .filter(|record| device_id.map_or(true, |id| record.device_id == id))
                .cloned()
                .collect())
        }
    }

    struct FailingStore;

    impl StatusQuery for FailingStore {
        fn latest_for_device(&self, _device_id: &str) -> Result<Option<BinStatusRecord>, String> {
            Err("simulated table outage".to_string())
        }

        fn load_records(&self, _device_id: Option<&str>) -> Result<Vec<BinStatusRecord>, String> {
            Err("simulated table outage".to_string())
        }
    }

    fn record(device_id: &str, timestamp: &str, capacity: f64) -> BinStatusRecord {
        BinStatusRecord {
            device_id: device_id.to_string(),
            timestamp: timestamp.to_string(),
            battery_level: 80.0,
            capacity,
            flame_detected: 0.0,
            is_full: false,
            last_updated: timestamp.to_string(),
            location: "강의동 2층 휴게실".to_string(),
            temperature: 15.0,
            ttl: 0,
        }
    }

    fn sample_store() -> FixedStore {
        FixedStore {
            records: vec![
                record("ThrashModule1", "2026-03-14T08:00:00.000Z", 40.0),
                record("ThrashModule1", "2026-03-14T09:00:00.000Z", 55.0),
                record("ThrashModule2", "2026-03-14T07:30:00.000Z", 90.0),
            ],
        }
    }

    #[test]
    fn single_device_answers_its_newest_record() {
        let response = handle_status_request(
            &json!({
                "httpMethod": "GET",
                "pathParameters": {"deviceId": "ThrashModule1"},
            }),
            &sample_store(),
        );

        assert_eq!(response.status_code, 200);
        let body: Value = serde_json::from_str(&response.body).expect("body should be json");
        assert_eq!(body["deviceId"], "ThrashModule1");
        assert_eq!(body["capacity"], 55.0);
    }

    #[test]
    fn unknown_device_is_a_404() {
        let response = handle_status_request(
            &json!({
                "httpMethod": "GET",
                "pathParameters": {"deviceId": "UnknownDevice"},
            }),
            &sample_store(),
        );

        assert_eq!(response.status_code, 404);
        let body: Value = serde_json::from_str(&response.body).expect("body should be json");
        assert_eq!(body["message"], "No data found for device: UnknownDevice");
    }

    #[test]
    fn all_devices_answers_the_newest_record_per_device() {
        let response =
            handle_status_request(&json!({"httpMethod": "GET"}), &sample_store());

        assert_eq!(response.status_code, 200);
        let body: Value = serde_json::from_str(&response.body).expect("body should be json");
        assert_eq!(body["count"], 2);
        assert_eq!(body["items"][0]["deviceId"], "ThrashModule1");
        assert_eq!(body["items"][0]["capacity"], 55.0);
        assert_eq!(body["items"][1]["deviceId"], "ThrashModule2");
    }

    #[test]
    fn options_preflight_is_a_200_with_cors_headers() {
        let response =
            handle_status_request(&json!({"httpMethod": "OPTIONS"}), &sample_store());

        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(response.body, "\"OK\"");
    }

    #[test]
    fn other_methods_are_rejected() {
        let response =
            handle_status_request(&json!({"httpMethod": "POST"}), &sample_store());
        assert_eq!(response.status_code, 400);

        let response = handle_status_request(&json!({}), &sample_store());
        assert_eq!(response.status_code, 400);
    }

    #[test]
    fn store_failure_is_a_500_with_an_error_body() {
        let response = handle_status_request(
            &json!({
                "httpMethod": "GET",
                "pathParameters": {"deviceId": "ThrashModule1"},
            }),
            &FailingStore,
        );

        assert_eq!(response.status_code, 500);
        let body: Value = serde_json::from_str(&response.body).expect("body should be json");
        assert_eq!(body["error"], "simulated table outage");
    }
}
