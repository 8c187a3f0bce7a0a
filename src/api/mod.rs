//! Vehicle control API integration
//!
//! `VehicleApi` is the seam between the accessory and the manufacturer's
//! backend. `OwnerApiClient` implements it over HTTP; tests substitute a
//! scripted implementation.

pub mod owner;
pub mod types;

pub use owner::OwnerApiClient;
pub use types::{
    ChargeState, ClimateState, CommandResponse, DriveState, SleepState, Trunk, VehicleCommand,
    VehicleData, VehicleId, VehicleState, VehicleSummary,
};

use crate::error::Result;

/// Token-authenticated calls against the vehicle backend
#[async_trait::async_trait]
pub trait VehicleApi: Send + Sync {
    /// Vehicles on the account with their sleep state
    async fn vehicles(&self, token: &str) -> Result<Vec<VehicleSummary>>;

    /// Full telemetry snapshot
    async fn vehicle_data(&self, token: &str, id: VehicleId) -> Result<VehicleData>;

    /// Drive state only (shift state, speed)
    async fn drive_state(&self, token: &str, id: VehicleId) -> Result<DriveState>;

    /// Issue a remote command
    async fn command(
        &self,
        token: &str,
        id: VehicleId,
        command: VehicleCommand,
    ) -> Result<CommandResponse>;

    /// Ask a sleeping vehicle to wake up
    async fn wake_up(&self, token: &str, id: VehicleId) -> Result<VehicleSummary>;
}
