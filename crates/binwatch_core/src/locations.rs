//! Device-id to installation-location resolution.

use std::collections::BTreeMap;

/// Sentinel returned for device ids with no configured location.
pub const UNKNOWN_LOCATION: &str = "정보 없음";

/// Device id to the human-readable place the module is installed. The
/// default covers the three deployed campus modules; deployments
/// override it through the `LOCATION_MAP` variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationMap {
    entries: BTreeMap<String, String>,
}

impl LocationMap {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn from_json(raw: &str) -> Result<Self, String> {
        let entries: BTreeMap<String, String> = serde_json::from_str(raw)
            .map_err(|error| format!("invalid location map JSON: {error}"))?;
        Ok(Self { entries })
    }

    /// Never an error: unmapped devices resolve to the sentinel.
    pub fn resolve(&self, device_id: &str) -> &str {
        self.entries
            .get(device_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LOCATION)
    }
}

impl Default for LocationMap {
    fn default() -> Self {
        Self {
            entries: BTreeMap::from([
                (
                    "ThrashModule1".to_string(),
                    "과학관 2층 중앙계단".to_string(),
                ),
                (
                    "ThrashModule2".to_string(),
                    "강의동 2층 휴게실".to_string(),
                ),
                (
                    "ThrashModule3".to_string(),
                    "학생회관 GS 편의점 옆".to_string(),
                ),
            ]),
        }
    }
}
