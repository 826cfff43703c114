//! Read-side aggregations over stored status records.
//!
//! Pure functions over record slices; the read handlers decide which
//! slice to load and how to shape the HTTP response. Averages are
//! reported with two decimals, matching the dashboard contract.

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::contract::BinStatusRecord;

/// Events reported per device, newest first.
pub const EVENT_LOG_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourlyBucket {
    pub hour: u32,
    pub average_capacity: f64,
    pub alert_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationBucket {
    pub location: String,
    pub average_capacity: f64,
    pub alert_count: usize,
    pub flame_detections: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: String,
    pub location: String,
    #[serde(rename = "deviceId")]
    pub device_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeviceSummary {
    pub total_records: usize,
    pub avg_capacity: f64,
    pub max_capacity: f64,
    pub total_alerts: usize,
    pub total_flame_detections: usize,
    pub last_location: String,
}

/// Newest record per device, for the all-devices status view. Row key
/// timestamps are RFC 3339, so lexicographic comparison orders them.
pub fn latest_per_device(records: &[BinStatusRecord]) -> Vec<BinStatusRecord> {
    let mut latest: BTreeMap<&str, &BinStatusRecord> = BTreeMap::new();
    for record in records {
        match latest.get(record.device_id.as_str()) {
            Some(existing) if existing.timestamp >= record.timestamp => {}
            _ => {
                latest.insert(record.device_id.as_str(), record);
            }
        }
    }
    latest.into_values().cloned().collect()
}

/// Per device, per hour-of-day: average capacity and alert count
/// (flame tripped or bin full). Hours with no samples are omitted.
pub fn hourly_statistics(records: &[BinStatusRecord]) -> BTreeMap<String, Vec<HourlyBucket>> {
    struct Accumulator {
        count: usize,
        total_capacity: f64,
        alert_count: usize,
    }

    let mut per_device: BTreeMap<String, BTreeMap<u32, Accumulator>> = BTreeMap::new();
    for record in records {
        let Some(hour) = capture_hour(&record.timestamp) else {
            continue;
        };
        let bucket = per_device
            .entry(record.device_id.clone())
            .or_default()
            .entry(hour)
            .or_insert(Accumulator {
                count: 0,
                total_capacity: 0.0,
                alert_count: 0,
            });
        bucket.count += 1;
        bucket.total_capacity += record.capacity;
        if record.is_alert() {
            bucket.alert_count += 1;
        }
    }

    per_device
        .into_iter()
        .map(|(device_id, hours)| {
            let buckets = hours
                .into_iter()
                .map(|(hour, acc)| HourlyBucket {
                    hour,
                    average_capacity: round_two(acc.total_capacity / acc.count as f64),
                    alert_count: acc.alert_count,
                })
                .collect();
            (device_id, buckets)
        })
        .collect()
}

/// Per device, per location: average capacity, full-bin count, and
/// flame-detection count.
pub fn location_statistics(records: &[BinStatusRecord]) -> BTreeMap<String, Vec<LocationBucket>> {
    struct Accumulator {
        count: usize,
        total_capacity: f64,
        alert_count: usize,
        flame_detections: usize,
    }

    let mut per_device: BTreeMap<String, BTreeMap<String, Accumulator>> = BTreeMap::new();
    for record in records {
        let bucket = per_device
            .entry(record.device_id.clone())
            .or_default()
            .entry(record.location.clone())
            .or_insert(Accumulator {
                count: 0,
                total_capacity: 0.0,
                alert_count: 0,
                flame_detections: 0,
            });
        bucket.count += 1;
        bucket.total_capacity += record.capacity;
        if record.is_full {
            bucket.alert_count += 1;
        }
        if record.flame_detected > 0.0 {
            bucket.flame_detections += 1;
        }
    }

    per_device
        .into_iter()
        .map(|(device_id, locations)| {
            let buckets = locations
                .into_iter()
                .map(|(location, acc)| LocationBucket {
                    location,
                    average_capacity: round_two(acc.total_capacity / acc.count as f64),
                    alert_count: acc.alert_count,
                    flame_detections: acc.flame_detections,
                })
                .collect();
            (device_id, buckets)
        })
        .collect()
}

/// Per device: flame and full events, newest first, capped at
/// [`EVENT_LOG_LIMIT`].
pub fn event_log(records: &[BinStatusRecord]) -> BTreeMap<String, Vec<AlertEvent>> {
    let mut per_device: BTreeMap<String, Vec<AlertEvent>> = BTreeMap::new();
    for record in records {
        if record.flame_detected > 0.0 {
            per_device
                .entry(record.device_id.clone())
                .or_default()
                .push(alert_event("flame", record));
        }
        if record.is_full {
            per_device
                .entry(record.device_id.clone())
                .or_default()
                .push(alert_event("full", record));
        }
    }

    for events in per_device.values_mut() {
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events.truncate(EVENT_LOG_LIMIT);
    }
    per_device
}

/// Per device rollup: record count, average and max capacity, alert
/// counts, and the location of the last seen record.
pub fn device_summaries(records: &[BinStatusRecord]) -> BTreeMap<String, DeviceSummary> {
    let mut per_device: BTreeMap<String, DeviceSummary> = BTreeMap::new();
    for record in records {
        let summary = per_device.entry(record.device_id.clone()).or_default();
        summary.total_records += 1;
        summary.avg_capacity += record.capacity;
        summary.max_capacity = summary.max_capacity.max(record.capacity);
        if record.is_full {
            summary.total_alerts += 1;
        }
        if record.flame_detected > 0.0 {
            summary.total_flame_detections += 1;
        }
        summary.last_location = record.location.clone();
    }

    for summary in per_device.values_mut() {
        if summary.total_records > 0 {
            summary.avg_capacity = round_two(summary.avg_capacity / summary.total_records as f64);
        }
    }
    per_device
}

fn alert_event(kind: &str, record: &BinStatusRecord) -> AlertEvent {
    AlertEvent {
        kind: kind.to_string(),
        timestamp: record.timestamp.clone(),
        location: record.location.clone(),
        device_id: record.device_id.clone(),
    }
}

fn capture_hour(timestamp: &str) -> Option<u32> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|parsed| parsed.hour())
}

fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(device_id: &str, timestamp: &str, capacity: f64) -> BinStatusRecord {
        BinStatusRecord {
            device_id: device_id.to_string(),
            timestamp: timestamp.to_string(),
            battery_level: 80.0,
            capacity,
            flame_detected: 0.0,
            is_full: false,
            last_updated: timestamp.to_string(),
            location: "과학관 2층 중앙계단".to_string(),
            temperature: 15.0,
            ttl: 0,
        }
    }

    #[test]
    fn latest_per_device_keeps_only_the_newest_row() {
        let records = vec![
            record("ThrashModule1", "2026-03-14T08:00:00.000Z", 10.0),
            record("ThrashModule1", "2026-03-14T09:00:00.000Z", 20.0),
            record("ThrashModule2", "2026-03-14T07:00:00.000Z", 30.0),
        ];

        let latest = latest_per_device(&records);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].device_id, "ThrashModule1");
        assert_eq!(latest[0].capacity, 20.0);
        assert_eq!(latest[1].device_id, "ThrashModule2");
    }

    #[test]
    fn hourly_buckets_average_capacity_and_count_alerts() {
        let mut flaming = record("ThrashModule1", "2026-03-14T09:45:00.000Z", 60.0);
        flaming.flame_detected = 1.0;
        let records = vec![
            record("ThrashModule1", "2026-03-14T09:15:00.000Z", 40.0),
            flaming,
            record("ThrashModule1", "2026-03-14T11:00:00.000Z", 90.0),
        ];

        let stats = hourly_statistics(&records);
        let buckets = &stats["ThrashModule1"];
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].hour, 9);
        assert_eq!(buckets[0].average_capacity, 50.0);
        assert_eq!(buckets[0].alert_count, 1);
        assert_eq!(buckets[1].hour, 11);
        assert_eq!(buckets[1].alert_count, 0);
    }

    #[test]
    fn hourly_average_is_rounded_to_two_decimals() {
        let records = vec![
            record("ThrashModule1", "2026-03-14T09:15:00.000Z", 33.3),
            record("ThrashModule1", "2026-03-14T09:25:00.000Z", 33.4),
            record("ThrashModule1", "2026-03-14T09:35:00.000Z", 33.4),
        ];

        let stats = hourly_statistics(&records);
        assert_eq!(stats["ThrashModule1"][0].average_capacity, 33.37);
    }

    #[test]
    fn location_buckets_split_full_and_flame_counts() {
        let mut full = record("ThrashModule1", "2026-03-14T09:00:00.000Z", 100.0);
        full.is_full = true;
        let mut flaming = record("ThrashModule1", "2026-03-14T10:00:00.000Z", 20.0);
        flaming.flame_detected = 2.0;
        let records = vec![full, flaming];

        let stats = location_statistics(&records);
        let buckets = &stats["ThrashModule1"];
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].location, "과학관 2층 중앙계단");
        assert_eq!(buckets[0].average_capacity, 60.0);
        assert_eq!(buckets[0].alert_count, 1);
        assert_eq!(buckets[0].flame_detections, 1);
    }

    #[test]
    fn event_log_is_newest_first_and_capped() {
        let mut records = Vec::new();
        for minute in 0..60 {
            let mut row = record(
                "ThrashModule1",
                &format!("2026-03-14T09:{minute:02}:00.000Z"),
                50.0,
            );
            row.flame_detected = 1.0;
            records.push(row);
        }

        let events = event_log(&records);
        let device_events = &events["ThrashModule1"];
        assert_eq!(device_events.len(), EVENT_LOG_LIMIT);
        assert_eq!(device_events[0].timestamp, "2026-03-14T09:59:00.000Z");
        assert_eq!(device_events[0].kind, "flame");
    }

    #[test]
    fn full_and_flame_on_one_row_produce_two_events() {
        let mut row = record("ThrashModule2", "2026-03-14T09:00:00.000Z", 100.0);
        row.flame_detected = 1.0;
        row.is_full = true;

        let events = event_log(&[row]);
        let kinds: Vec<&str> = events["ThrashModule2"]
            .iter()
            .map(|event| event.kind.as_str())
            .collect();
        assert_eq!(kinds, vec!["flame", "full"]);
    }

    #[test]
    fn summaries_track_averages_maxima_and_last_location() {
        let mut second = record("ThrashModule1", "2026-03-14T10:00:00.000Z", 80.0);
        second.is_full = true;
        second.location = "강의동 2층 휴게실".to_string();
        let records = vec![
            record("ThrashModule1", "2026-03-14T09:00:00.000Z", 40.0),
            second,
        ];

        let summaries = device_summaries(&records);
        let summary = &summaries["ThrashModule1"];
        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.avg_capacity, 60.0);
        assert_eq!(summary.max_capacity, 80.0);
        assert_eq!(summary.total_alerts, 1);
        assert_eq!(summary.total_flame_detections, 0);
        assert_eq!(summary.last_location, "강의동 2층 휴게실");
    }
}
