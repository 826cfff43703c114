//! Flame-alert publication.

use binwatch_core::alert::compose_flame_alert;
use binwatch_core::contract::{AlertResponse, SensorEvent};
use binwatch_core::locations::LocationMap;
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::adapters::alert_topic::AlertPublisher;

/// Publishes one alert for the report captured at `now`. Every
/// invocation publishes; the body text branches on the flame flag but
/// nothing suppresses the send. A publish failure is captured into the
/// response payload rather than failing the invocation.
pub fn handle_flame_report(
    event: &SensorEvent,
    locations: &LocationMap,
    now: DateTime<Utc>,
    publisher: &impl AlertPublisher,
) -> AlertResponse {
    let device_name = event.device_label();
    let message = compose_flame_alert(
        device_name,
        locations.resolve(device_name),
        event.flame_tripped(),
        now,
    );

    match publisher.publish_alert(&message.subject, &message.body) {
        Ok(message_id) => {
            log_alert_info(
                "alert_published",
                json!({
                    "device_id": device_name,
                    "flame_detected": event.flame_detected,
                    "message_id": message_id.clone(),
                }),
            );
            AlertResponse::sent(message_id)
        }
        Err(error) => {
            log_alert_error(
                "alert_publish_failed",
                json!({
                    "device_id": device_name,
                    "error": error.clone(),
                }),
            );
            AlertResponse::failed(error)
        }
    }
}

fn log_alert_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "alert_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_alert_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "alert_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
