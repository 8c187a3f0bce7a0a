//! Door lock and charge port door

use super::{CharacteristicKind, LockState, ServiceId, TeslaAccessory};
use crate::api::VehicleCommand;
use crate::error::{BridgeError, Result};

impl TeslaAccessory {
    /// Reported as secured while the vehicle sleeps
    pub async fn door_lock_state(&self) -> Result<LockState> {
        if self.sleep_state().await?.is_asleep() {
            return Ok(LockState::Secured);
        }
        let snapshot = self.snapshot().await?;
        let locked = snapshot
            .data
            .vehicle_state
            .as_ref()
            .and_then(|v| v.locked)
            .ok_or_else(|| BridgeError::missing_field("vehicle_state.locked"))?;
        Ok(LockState::from_secured(locked))
    }

    pub async fn set_door_lock(&self, target: LockState) -> Result<()> {
        let locked = target.is_secured();
        self.logger
            .info(&format!("Setting car to locked = {}", locked));
        self.ensure_awake("lock state").await?;

        let command = if locked {
            VehicleCommand::DoorLock
        } else {
            VehicleCommand::DoorUnlock
        };
        self.run_command("lock state", command).await?;

        self.schedule_update(
            ServiceId::DoorLocks,
            CharacteristicKind::LockCurrentState,
            LockState::from_secured(locked).into(),
            self.timings.lock_update_delay(),
        );
        Ok(())
    }

    /// Secured while asleep, otherwise closed port door means secured
    pub async fn charge_door_state(&self) -> Result<LockState> {
        if self.sleep_state().await?.is_asleep() {
            return Ok(LockState::Secured);
        }
        let snapshot = self.snapshot().await?;
        let open = snapshot
            .data
            .charge_state
            .as_ref()
            .and_then(|c| c.charge_port_door_open)
            .ok_or_else(|| BridgeError::missing_field("charge_state.charge_port_door_open"))?;
        Ok(LockState::from_secured(!open))
    }

    /// Secured closes the port door, unsecured opens it
    pub async fn set_charge_door(&self, target: LockState) -> Result<()> {
        let close = target.is_secured();
        self.logger
            .info(&format!("Setting charge door to closed = {}", close));
        self.ensure_awake("charge door state").await?;

        let command = if close {
            VehicleCommand::CloseChargePort
        } else {
            VehicleCommand::OpenChargePort
        };
        self.run_command("charge door state", command).await?;

        self.schedule_update(
            ServiceId::ChargeDoor,
            CharacteristicKind::LockCurrentState,
            LockState::from_secured(close).into(),
            self.timings.lock_update_delay(),
        );
        Ok(())
    }

    async fn ensure_awake(&self, operation: &str) -> Result<()> {
        if self.sleep_state().await?.is_asleep() {
            self.logger
                .warn(&format!("Tesla is asleep, not setting {}", operation));
            return Err(BridgeError::precondition(format!(
                "vehicle is asleep, cannot set {}",
                operation
            )));
        }
        Ok(())
    }
}
