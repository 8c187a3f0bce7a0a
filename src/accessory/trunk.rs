//! Rear trunk and frunk
//!
//! Trunks can only be opened remotely, and only while parked.

use super::{CharacteristicKind, LockState, ServiceId, TeslaAccessory};
use crate::api::{Trunk, VehicleCommand};
use crate::error::{BridgeError, Result};

fn service_for(which: Trunk) -> ServiceId {
    match which {
        Trunk::Rear => ServiceId::Trunk,
        Trunk::Front => ServiceId::Frunk,
    }
}

fn position_field(which: Trunk) -> &'static str {
    match which {
        Trunk::Rear => "vehicle_state.rt",
        Trunk::Front => "vehicle_state.ft",
    }
}

impl TeslaAccessory {
    /// Secured when closed; always secured unless online
    pub async fn trunk_state(&self, which: Trunk) -> Result<LockState> {
        if !self.sleep_state().await?.is_online() {
            return Ok(LockState::Secured);
        }
        let snapshot = self.snapshot().await?;
        let vehicle = snapshot
            .data
            .vehicle_state
            .as_ref()
            .ok_or_else(|| BridgeError::missing_field("vehicle_state"))?;
        let position = match which {
            Trunk::Rear => vehicle.rt,
            Trunk::Front => vehicle.ft,
        }
        .ok_or_else(|| BridgeError::missing_field(position_field(which)))?;
        Ok(LockState::from_secured(position == 0))
    }

    pub async fn set_trunk(&self, which: Trunk, target: LockState) -> Result<()> {
        self.logger.info(&format!(
            "Setting {} trunk to locked = {}",
            which.as_str(),
            target.is_secured()
        ));
        if target.is_secured() {
            return Err(BridgeError::precondition("I can only open trunks"));
        }

        let drive = async {
            let token = self.session.auth_token().await?;
            let id = self.session.vehicle_id().await?;
            self.session.api().drive_state(&token, id).await
        }
        .await
        .map_err(|e| {
            self.logger
                .error(&format!("Error reading drive state: {}", e));
            BridgeError::command("trunk state")
        })?;

        if !drive.is_parked() {
            self.logger.warn(&format!(
                "Not opening trunk, shift state is {}",
                drive.shift_label()
            ));
            return Err(BridgeError::precondition(
                "cannot operate trunks while car is not parked",
            ));
        }

        self.run_command("trunk state", VehicleCommand::ActuateTrunk(which))
            .await?;
        self.store.update_value(
            service_for(which),
            CharacteristicKind::LockCurrentState,
            LockState::Unsecured.into(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frunk_maps_to_its_own_service() {
        assert_eq!(service_for(Trunk::Front), ServiceId::Frunk);
        assert_eq!(service_for(Trunk::Rear), ServiceId::Trunk);
        assert_eq!(position_field(Trunk::Front), "vehicle_state.ft");
    }
}
