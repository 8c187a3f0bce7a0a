//! Conditioning switch with climate auto-stop
//!
//! Switching conditioning on starts climate and arms a timer. When it
//! fires, the switch is reset to off and climate is stopped if the vehicle
//! is parked. Switching off stops climate and disarms the timer.

use std::sync::Arc;
use std::time::Duration;

use super::{CharacteristicKind, ServiceId, TeslaAccessory};
use crate::api::{CommandResponse, VehicleCommand};
use crate::error::{BridgeError, Result};
use crate::scheduler::TimerKey;
use crate::session::SessionManager;

/// Delay between the auto-stop firing and the switch showing off
const SWITCH_OFF_DELAY: Duration = Duration::from_millis(300);

impl TeslaAccessory {
    /// Off while asleep, otherwise whether auto-stop is armed
    pub async fn conditioning_active(&self) -> Result<bool> {
        if self.sleep_state().await?.is_asleep() {
            return Ok(false);
        }
        Ok(self.is_conditioning_timer_active())
    }

    pub fn is_conditioning_timer_active(&self) -> bool {
        self.scheduler.is_pending(TimerKey::ConditioningAutoStop)
    }

    pub async fn set_conditioning(&self, on: bool) -> Result<()> {
        self.logger
            .info(&format!("Setting conditioning to on = {}", on));
        let command = if on {
            VehicleCommand::ClimateStart
        } else {
            VehicleCommand::ClimateStop
        };
        self.run_command("climate state", command).await?;

        if on {
            self.arm_auto_stop();
        } else if self.scheduler.cancel(TimerKey::ConditioningAutoStop) {
            self.logger.debug("Conditioning auto-stop disarmed");
        }
        Ok(())
    }

    fn arm_auto_stop(&self) {
        let session = self.session.clone();
        let store = self.store.clone();
        let scheduler = self.scheduler.clone();
        let logger = self.logger.clone();
        let delay = self.timings.conditioning_auto_stop();

        self.scheduler
            .schedule(TimerKey::ConditioningAutoStop, delay, async move {
                let reset_store = store.clone();
                scheduler.schedule(
                    TimerKey::Characteristic(ServiceId::Conditioning, CharacteristicKind::On),
                    SWITCH_OFF_DELAY,
                    async move {
                        reset_store.update_value(
                            ServiceId::Conditioning,
                            CharacteristicKind::On,
                            false.into(),
                        );
                    },
                );

                if let Err(e) = stop_if_parked(&session).await {
                    logger.warn(&format!("Conditioning auto-stop failed: {}", e));
                }
            });
        self.logger.debug(&format!(
            "Conditioning auto-stop armed for {}s",
            delay.as_secs()
        ));
    }
}

async fn stop_if_parked(session: &Arc<SessionManager>) -> Result<()> {
    let token = session.auth_token().await?;
    let id = session.vehicle_id().await?;
    let drive = session.api().drive_state(&token, id).await?;
    if !drive.is_parked() {
        return Ok(());
    }
    let response = session
        .api()
        .command(&token, id, VehicleCommand::ClimateStop)
        .await?;
    stop_outcome(&response)
}

fn stop_outcome(response: &CommandResponse) -> Result<()> {
    if response.is_accepted() {
        return Ok(());
    }
    Err(BridgeError::rejected(
        "climate state",
        response.reason().unwrap_or("no reason given"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_stop_carries_reason() {
        assert!(stop_outcome(&CommandResponse::ok()).is_ok());

        let err = stop_outcome(&CommandResponse::rejected("user_present")).unwrap_err();
        assert_eq!(err.to_string(), "Error setting climate state. user_present");

        let silent = CommandResponse {
            result: false,
            reason: None,
        };
        assert_eq!(
            stop_outcome(&silent).unwrap_err().to_string(),
            "Error setting climate state. no reason given"
        );
    }
}
