pub mod alert;
pub mod http;
pub mod ingest;
pub mod statistics;
pub mod status;
