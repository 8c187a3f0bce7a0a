//! Connection switch: on while the vehicle is online, turning it on wakes it

use super::{CharacteristicKind, ServiceId, TeslaAccessory};
use crate::error::Result;
use crate::wake::WakeOutcome;

impl TeslaAccessory {
    pub async fn is_connected(&self) -> Result<bool> {
        Ok(self.sleep_state().await?.is_online())
    }

    /// Wake the vehicle unless it is already online; off is a no-op
    pub async fn set_connection(&self, on: bool) -> Result<()> {
        self.logger
            .info(&format!("Setting connection to on = {}", on));
        if !on {
            return Ok(());
        }

        let state = self.sleep_state().await?;
        if state.is_online() {
            return Ok(());
        }

        let id = self.session.vehicle_id().await?;
        match self.wake.wake(id).await? {
            WakeOutcome::Awake(state) => {
                self.logger
                    .info(&format!("Vehicle reachable, state {}", state));
            }
            WakeOutcome::StillAsleep => {
                self.logger.warn("Vehicle did not wake up");
                self.drop_connection_switch();
            }
        }
        Ok(())
    }

    fn drop_connection_switch(&self) {
        self.schedule_update(
            ServiceId::Connection,
            CharacteristicKind::On,
            false.into(),
            self.timings.switch_reset(),
        );
    }
}
