//! Wire contracts for the monitoring functions.
//!
//! Field names follow the payloads the device fleet and the dashboard
//! already exchange, so every struct serde-renames to camelCase wire
//! names. Sensor firmware is loose about numeric types (numbers or
//! numeric strings, sometimes absent), so the event side parses
//! leniently and degrades to zero instead of rejecting.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::capacity::fill_capacity;
use crate::locations::{LocationMap, UNKNOWN_LOCATION};

/// Stored records expire store-side one day after capture.
pub const RECORD_TTL_SECONDS: i64 = 24 * 60 * 60;

/// The modules carry no thermometer; the schema keeps the field with
/// a fixed placeholder.
pub const PLACEHOLDER_TEMPERATURE: f64 = 15.0;

/// One sensor report as published by a trash-bin module.
///
/// No field is required. Missing or unparseable numeric fields read as
/// zero; a missing device id reads as the unknown sentinel. There is
/// deliberately no validation error path on this ingestion contract.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SensorEvent {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(rename = "mainUltrasonicSensor", deserialize_with = "lenient_f64")]
    pub main_ultrasonic_sensor: f64,
    #[serde(rename = "subUltrasonicSensor", deserialize_with = "lenient_f64")]
    pub sub_ultrasonic_sensor: f64,
    #[serde(rename = "flameDetected", deserialize_with = "lenient_f64")]
    pub flame_detected: f64,
    #[serde(rename = "batteryLevel", deserialize_with = "lenient_f64")]
    pub battery_level: f64,
    pub state: ReportedState,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportedState {
    pub desired: DesiredState,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DesiredState {
    #[serde(rename = "isFull")]
    pub is_full: Option<String>,
}

impl SensorEvent {
    /// Device id, with the unknown sentinel standing in for an absent
    /// or empty one.
    pub fn device_label(&self) -> &str {
        if self.device_id.is_empty() {
            UNKNOWN_LOCATION
        } else {
            &self.device_id
        }
    }

    // The shadow-state full flag is set only by the literal "true".
    pub fn is_full(&self) -> bool {
        self.state.desired.is_full.as_deref() == Some("true")
    }

    pub fn flame_tripped(&self) -> bool {
        self.flame_detected > 0.0
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_number(&value))
}

fn lenient_number(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// One durable status row, keyed by (deviceId, timestamp). Written
/// once per ingest invocation and never updated; collisions on the
/// key are last-write-wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BinStatusRecord {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub timestamp: String,
    #[serde(rename = "batteryLevel")]
    pub battery_level: f64,
    pub capacity: f64,
    #[serde(rename = "flameDetected")]
    pub flame_detected: f64,
    #[serde(rename = "isFull")]
    pub is_full: bool,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
    pub location: String,
    pub temperature: f64,
    pub ttl: i64,
}

impl BinStatusRecord {
    /// Derives the status row for one report captured at `now`. The
    /// same instant feeds the row key, `lastUpdated`, and the expiry
    /// deadline, which is always `now` + 24 h whatever the event
    /// contains.
    pub fn from_event(event: &SensorEvent, locations: &LocationMap, now: DateTime<Utc>) -> Self {
        let captured_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        Self {
            device_id: event.device_label().to_string(),
            timestamp: captured_at.clone(),
            battery_level: event.battery_level.max(0.0),
            capacity: fill_capacity(event.main_ultrasonic_sensor, event.sub_ultrasonic_sensor),
            flame_detected: event.flame_detected,
            is_full: event.is_full(),
            last_updated: captured_at,
            location: locations.resolve(event.device_label()).to_string(),
            temperature: PLACEHOLDER_TEMPERATURE,
            ttl: now.timestamp() + RECORD_TTL_SECONDS,
        }
    }

    /// Alert row in the aggregations: flame tripped or reported full.
    pub fn is_alert(&self) -> bool {
        self.flame_detected > 0.0 || self.is_full
    }
}

/// Ingest response, returned unconditionally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl IngestResponse {
    pub fn processed() -> Self {
        Self {
            status_code: 200,
            body: "Data processed successfully.".to_string(),
        }
    }
}

pub const ALERT_STATUS_SENT: &str = "SNS Sent Successfully";
pub const ALERT_STATUS_ERROR: &str = "Error";

/// Flame-alert response; publish failures are captured here rather
/// than thrown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PublishReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishReceipt {
    #[serde(rename = "messageId")]
    pub message_id: String,
}

impl AlertResponse {
    pub fn sent(message_id: String) -> Self {
        Self {
            status: ALERT_STATUS_SENT.to_string(),
            result: Some(PublishReceipt { message_id }),
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            status: ALERT_STATUS_ERROR.to_string(),
            result: None,
            error: Some(error),
        }
    }
}
