//! Sensor-report ingestion: one status row per invocation.

use binwatch_core::contract::{BinStatusRecord, IngestResponse, SensorEvent};
use binwatch_core::locations::LocationMap;
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::adapters::status_store::StatusStore;

/// Persists one status row derived from the report captured at `now`.
/// Always answers 200: a storage failure is logged and swallowed so a
/// downstream hiccup never fails the reporting device.
pub fn handle_sensor_report(
    event: &SensorEvent,
    locations: &LocationMap,
    now: DateTime<Utc>,
    store: &impl StatusStore,
) -> IngestResponse {
    let record = BinStatusRecord::from_event(event, locations, now);
    log_ingest_info(
        "report_received",
        json!({
            "device_id": record.device_id.clone(),
            "capacity": record.capacity,
            "battery_level": record.battery_level,
            "flame_detected": record.flame_detected,
            "is_full": record.is_full,
        }),
    );

    match store.put_status(&record) {
        Ok(()) => log_ingest_info(
            "status_stored",
            json!({
                "device_id": record.device_id.clone(),
                "timestamp": record.timestamp.clone(),
                "ttl": record.ttl,
            }),
        ),
        Err(error) => log_ingest_error(
            "store_write_failed",
            json!({
                "device_id": record.device_id.clone(),
                "timestamp": record.timestamp.clone(),
                "error": error,
            }),
        ),
    }

    IngestResponse::processed()
}

fn log_ingest_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "ingest_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_ingest_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "ingest_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
