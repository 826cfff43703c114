//! Deployment configuration shared by the Lambda binaries.
//!
//! The original deployment baked region, table, and topic literals
//! into each function; here each binary reads them from the
//! environment at wiring time. Handlers never touch the environment
//! themselves.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use binwatch_core::locations::LocationMap;
use lambda_runtime::Error;

pub const DEFAULT_TABLE_NAME: &str = "TrashBinStatus";

/// SDK configuration, honoring a `REGION` override when set.
pub async fn load_sdk_config() -> SdkConfig {
    let loader = aws_config::defaults(BehaviorVersion::latest());
    match std::env::var("REGION") {
        Ok(region) if !region.trim().is_empty() => {
            loader.region(Region::new(region)).load().await
        }
        _ => loader.load().await,
    }
}

pub fn table_name_from_env() -> String {
    std::env::var("TABLE_NAME").unwrap_or_else(|_| DEFAULT_TABLE_NAME.to_string())
}

pub fn topic_arn_from_env() -> Result<String, Error> {
    std::env::var("TOPIC_ARN").map_err(|_| Error::from("TOPIC_ARN must be configured"))
}

/// `LOCATION_MAP` as a JSON object, falling back to the built-in
/// campus map. A present but malformed value is a configuration error.
pub fn location_map_from_env() -> Result<LocationMap, Error> {
    match std::env::var("LOCATION_MAP") {
        Ok(raw) => LocationMap::from_json(&raw).map_err(Error::from),
        Err(_) => Ok(LocationMap::default()),
    }
}
