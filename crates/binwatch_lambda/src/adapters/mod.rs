pub mod alert_topic;
pub mod dynamodb;
pub mod sns;
pub mod status_store;
