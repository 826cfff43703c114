//! DynamoDB-backed implementation of the status table adapters.
//!
//! The table schema is the one the device fleet and dashboard already
//! use: partition key `deviceId` (S), sort key `timestamp` (S),
//! numeric fields stored as `N` strings, `isFull` as `BOOL`,
//! store-side expiry on `ttl`.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use binwatch_core::contract::{BinStatusRecord, PLACEHOLDER_TEMPERATURE};

use crate::adapters::status_store::{StatusQuery, StatusStore};

#[derive(Debug, Clone)]
pub struct DynamoDbStatusStore {
    table: String,
    client: aws_sdk_dynamodb::Client,
}

impl DynamoDbStatusStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            client,
        }
    }
}

impl StatusStore for DynamoDbStatusStore {
    fn put_status(&self, record: &BinStatusRecord) -> Result<(), String> {
        let table = self.table.clone();
        let item = record_to_item(record);
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_item()
                    .table_name(table)
                    .set_item(Some(item))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to put status record: {error}"))
            })
        })
    }
}

impl StatusQuery for DynamoDbStatusStore {
    fn latest_for_device(&self, device_id: &str) -> Result<Option<BinStatusRecord>, String> {
        let table = self.table.clone();
        let device_id = device_id.to_string();
        let client = self.client.clone();

        let items = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .query()
                    .table_name(table)
                    .key_condition_expression("deviceId = :deviceId")
                    .expression_attribute_values(":deviceId", AttributeValue::S(device_id))
                    .scan_index_forward(false)
                    .limit(1)
                    .send()
                    .await
                    .map(|output| output.items().to_vec())
                    .map_err(|error| format!("failed to query status records: {error}"))
            })
        })?;

        items.first().map(item_to_record).transpose()
    }

    fn load_records(&self, device_id: Option<&str>) -> Result<Vec<BinStatusRecord>, String> {
        let table = self.table.clone();
        let device_id = device_id.map(str::to_string);
        let client = self.client.clone();

        let items = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                match device_id {
                    Some(device_id) => client
                        .query()
                        .table_name(table)
                        .key_condition_expression("deviceId = :deviceId")
                        .expression_attribute_values(":deviceId", AttributeValue::S(device_id))
                        .send()
                        .await
                        .map(|output| output.items().to_vec())
                        .map_err(|error| format!("failed to query status records: {error}")),
                    None => client
                        .scan()
                        .table_name(table)
                        .send()
                        .await
                        .map(|output| output.items().to_vec())
                        .map_err(|error| format!("failed to scan status table: {error}")),
                }
            })
        })?;

        items.iter().map(item_to_record).collect()
    }
}

pub fn record_to_item(record: &BinStatusRecord) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            "deviceId".to_string(),
            AttributeValue::S(record.device_id.clone()),
        ),
        (
            "timestamp".to_string(),
            AttributeValue::S(record.timestamp.clone()),
        ),
        (
            "batteryLevel".to_string(),
            AttributeValue::N(record.battery_level.to_string()),
        ),
        (
            "capacity".to_string(),
            AttributeValue::N(record.capacity.to_string()),
        ),
        (
            "flameDetected".to_string(),
            AttributeValue::N(record.flame_detected.to_string()),
        ),
        ("isFull".to_string(), AttributeValue::Bool(record.is_full)),
        (
            "lastUpdated".to_string(),
            AttributeValue::S(record.last_updated.clone()),
        ),
        (
            "location".to_string(),
            AttributeValue::S(record.location.clone()),
        ),
        (
            "temperature".to_string(),
            AttributeValue::N(record.temperature.to_string()),
        ),
        ("ttl".to_string(), AttributeValue::N(record.ttl.to_string())),
    ])
}

/// Decodes one table row. The key attributes are required; the rest
/// default when absent, so rows written before a schema addition still
/// read back.
pub fn item_to_record(item: &HashMap<String, AttributeValue>) -> Result<BinStatusRecord, String> {
    let timestamp = required_string(item, "timestamp")?;
    Ok(BinStatusRecord {
        device_id: required_string(item, "deviceId")?,
        battery_level: number_or(item, "batteryLevel", 0.0)?,
        capacity: number_or(item, "capacity", 0.0)?,
        flame_detected: number_or(item, "flameDetected", 0.0)?,
        is_full: bool_or(item, "isFull", false)?,
        last_updated: string_or(item, "lastUpdated", &timestamp),
        location: string_or(item, "location", ""),
        temperature: number_or(item, "temperature", PLACEHOLDER_TEMPERATURE)?,
        ttl: number_or(item, "ttl", 0.0)? as i64,
        timestamp,
    })
}

fn required_string(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String, String> {
    item.get(name)
        .and_then(|value| value.as_s().ok())
        .cloned()
        .ok_or_else(|| format!("status row is missing string attribute '{name}'"))
}

fn string_or(item: &HashMap<String, AttributeValue>, name: &str, fallback: &str) -> String {
    item.get(name)
        .and_then(|value| value.as_s().ok())
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

fn number_or(
    item: &HashMap<String, AttributeValue>,
    name: &str,
    fallback: f64,
) -> Result<f64, String> {
    match item.get(name) {
        None => Ok(fallback),
        Some(value) => value
            .as_n()
            .map_err(|_| format!("status row attribute '{name}' is not numeric"))?
            .parse()
            .map_err(|_| format!("status row attribute '{name}' does not parse as a number")),
    }
}

fn bool_or(
    item: &HashMap<String, AttributeValue>,
    name: &str,
    fallback: bool,
) -> Result<bool, String> {
    match item.get(name) {
        None => Ok(fallback),
        Some(value) => value
            .as_bool()
            .copied()
            .map_err(|_| format!("status row attribute '{name}' is not a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> BinStatusRecord {
        BinStatusRecord {
            device_id: "ThrashModule1".to_string(),
            timestamp: "2026-03-14T09:26:53.000Z".to_string(),
            battery_level: 87.5,
            capacity: 83.3,
            flame_detected: 1.0,
            is_full: true,
            last_updated: "2026-03-14T09:26:53.000Z".to_string(),
            location: "과학관 2층 중앙계단".to_string(),
            temperature: 15.0,
            ttl: 1_773_000_000,
        }
    }

    #[test]
    fn numbers_encode_without_trailing_zeros() {
        let item = record_to_item(&sample_record());

        assert_eq!(item["capacity"], AttributeValue::N("83.3".to_string()));
        assert_eq!(item["temperature"], AttributeValue::N("15".to_string()));
        assert_eq!(item["ttl"], AttributeValue::N("1773000000".to_string()));
        assert_eq!(item["isFull"], AttributeValue::Bool(true));
        assert_eq!(
            item["deviceId"],
            AttributeValue::S("ThrashModule1".to_string())
        );
    }

    #[test]
    fn item_round_trips_back_to_the_record() {
        let record = sample_record();
        let decoded = item_to_record(&record_to_item(&record)).expect("row should decode");
        assert_eq!(decoded, record);
    }

    #[test]
    fn absent_optional_attributes_take_defaults() {
        let item = HashMap::from([
            (
                "deviceId".to_string(),
                AttributeValue::S("ThrashModule2".to_string()),
            ),
            (
                "timestamp".to_string(),
                AttributeValue::S("2026-03-14T09:26:53.000Z".to_string()),
            ),
            ("capacity".to_string(), AttributeValue::N("50".to_string())),
        ]);

        let decoded = item_to_record(&item).expect("row should decode");
        assert_eq!(decoded.flame_detected, 0.0);
        assert!(!decoded.is_full);
        assert_eq!(decoded.last_updated, decoded.timestamp);
        assert_eq!(decoded.temperature, PLACEHOLDER_TEMPERATURE);
    }

    #[test]
    fn missing_key_attribute_is_an_error() {
        let item = HashMap::from([(
            "timestamp".to_string(),
            AttributeValue::S("2026-03-14T09:26:53.000Z".to_string()),
        )]);

        let error = item_to_record(&item).expect_err("decode should fail");
        assert!(error.contains("deviceId"));
    }
}
