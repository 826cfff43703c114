//! AWS-oriented adapters and handlers for the trash-bin monitoring
//! functions.
//!
//! This crate owns runtime integration details: pure handler functions
//! with side effects behind adapter traits, the DynamoDB and SNS
//! implementations of those traits, and one Lambda binary per deployed
//! function under `src/bin/`. Domain behavior lives in
//! `binwatch_core`.

pub mod adapters;
pub mod handlers;
pub mod runtime;
