//! Scenario tests for the configuration contract
//!
//! Tests are organized by topic:
//! - `scenarios` - Registry lookups and request building per mode
//! - `properties` - Clamping, key-set and round-trip properties
//! - `dispatch` - HTTP exchange against a simulated backend

mod properties;
mod scenarios;
