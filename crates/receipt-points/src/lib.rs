//! Receipt processing core: reward point scoring, the in-memory receipt store, and the
//! HTTP surface that validates submissions before handing them to the store.

pub mod config;
pub mod error;
pub mod receipts;
pub mod telemetry;
