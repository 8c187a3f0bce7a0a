//! Horn and lights, momentary switches

use super::{CharacteristicKind, ServiceId, TeslaAccessory};
use crate::api::VehicleCommand;
use crate::error::Result;

impl TeslaAccessory {
    pub fn horn_state(&self) -> bool {
        false
    }

    pub fn lights_state(&self) -> bool {
        false
    }

    /// Honk once; the switch flips back off on its own
    pub async fn set_horn(&self, on: bool) -> Result<()> {
        self.momentary(ServiceId::Horn, "horn state", VehicleCommand::HonkHorn, on)
            .await
    }

    /// Flash once; the switch flips back off on its own
    pub async fn set_lights(&self, on: bool) -> Result<()> {
        self.momentary(
            ServiceId::Lights,
            "lights state",
            VehicleCommand::FlashLights,
            on,
        )
        .await
    }

    async fn momentary(
        &self,
        service: ServiceId,
        operation: &str,
        command: VehicleCommand,
        on: bool,
    ) -> Result<()> {
        self.logger
            .info(&format!("Setting {} to on = {}", service, on));
        if !on {
            return Ok(());
        }

        self.run_command(operation, command).await?;
        self.schedule_update(
            service,
            CharacteristicKind::On,
            false.into(),
            self.timings.switch_reset(),
        );
        Ok(())
    }
}
