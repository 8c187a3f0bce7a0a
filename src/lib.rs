//! # teslabridge - Tesla vehicle controls as smart-home accessory characteristics
//!
//! Presents one vehicle as a set of smart-home services (thermostat, locks,
//! trunks, battery, charging, horn, lights, connection) and maps each
//! characteristic read or write onto the vehicle's Owner API.
//!
//! ## Architecture
//!
//! - `config`: YAML configuration and validation
//! - `logging`: Structured logging and tracing
//! - `auth`: Refresh-token exchange for bearer tokens
//! - `api`: Owner API wire types and HTTP client behind the `VehicleApi` trait
//! - `session`: Bearer token, vehicle id and sleep state cache
//! - `wake`: Rate-limited wake request and polling
//! - `snapshot`: Single-flight vehicle data cache
//! - `scheduler`: Cancellable delayed tasks
//! - `accessory`: Service catalog, characteristic handlers and value store
//! - `web`: HTTP host exposing the accessory (feature `web`)

pub mod accessory;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod scheduler;
pub mod session;
pub mod snapshot;
pub mod wake;
#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used types
pub use accessory::{CharacteristicKind, CharacteristicValue, ServiceId, TeslaAccessory};
pub use config::Config;
pub use error::{BridgeError, Result};
