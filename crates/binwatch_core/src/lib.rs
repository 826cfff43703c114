//! Shared trash-bin monitoring domain primitives.
//!
//! This crate owns the sensor-event and status-record contracts, the
//! fill-capacity computation, location resolution, alert message
//! composition, and the read-side aggregations. It intentionally
//! excludes AWS SDK and Lambda runtime concerns.

pub mod alert;
pub mod capacity;
pub mod contract;
pub mod locations;
pub mod statistics;
