//! Flame-alert message composition.

use chrono::{DateTime, SecondsFormat, Utc};

/// Subject and body pair handed to the notification topic. Never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

/// Composes the email alert for one flame-sensor report.
///
/// Deterministic template substitution: device name, installation
/// location, a binary fire/no-fire phrase, and the capture time. The
/// wording matches what the subscribed administrators already receive.
pub fn compose_flame_alert(
    device_name: &str,
    location: &str,
    flame_tripped: bool,
    now: DateTime<Utc>,
) -> AlertMessage {
    let detected_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let flame_phrase = if flame_tripped {
        "화재 발생"
    } else {
        "화재 없음"
    };

    let subject = format!("🔥 [화재 경고] {device_name} 장치에서 이상 감지됨!");
    let body = format!(
        "\n    🚨 [긴급 알림] 화재 감지 발생 🚨\n    \
         ----------------------------------------\n    \
         📟 장치명: {device_name}\n    \
         📍 위치: {location}\n    \
         🔥 화염 감지 여부: {flame_phrase}\n    \
         🕒 감지 시간: {detected_at}\n    \
         ----------------------------------------\n    \
         조치를 즉시 취해 주세요!\n    "
    );

    AlertMessage { subject, body }
}
