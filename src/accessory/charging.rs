//! Battery service and charging switch

use super::{CharacteristicKind, ChargingState, ServiceId, TeslaAccessory};
use crate::api::{ChargeState, VehicleCommand};
use crate::error::{BridgeError, Result};

/// Rejection reasons that mean the vehicle is already where we asked
const SETTLED_REASONS: [&str; 2] = ["complete", "not_charging"];

fn charging_state_of(charge: &ChargeState) -> ChargingState {
    if charge.is_charging() {
        ChargingState::Charging
    } else if charge.is_plugged_in() {
        ChargingState::NotCharging
    } else {
        ChargingState::NotChargeable
    }
}

impl TeslaAccessory {
    async fn charge_state(&self) -> Result<ChargeState> {
        let snapshot = self.snapshot().await?;
        snapshot.data.charge_state.clone().ok_or_else(|| {
            self.logger.error("Vehicle data carried no charge state");
            BridgeError::missing_field("charge_state")
        })
    }

    /// State of charge in percent
    pub async fn battery_level(&self) -> Result<u8> {
        let level = self
            .charge_state()
            .await?
            .battery_level
            .ok_or_else(|| BridgeError::missing_field("charge_state.battery_level"))?;
        self.logger.debug(&format!("battery level is {}", level));
        Ok(level.clamp(0.0, 100.0).round() as u8)
    }

    /// Rated range in miles
    pub async fn battery_range(&self) -> Result<f64> {
        let range = self
            .charge_state()
            .await?
            .battery_range
            .ok_or_else(|| BridgeError::missing_field("charge_state.battery_range"))?;
        self.logger.debug(&format!("battery range is {}", range));
        Ok(range)
    }

    pub async fn charging_state(&self) -> Result<ChargingState> {
        let state = charging_state_of(&self.charge_state().await?);
        self.logger.debug(&format!("charging: state is {:?}", state));
        Ok(state)
    }

    pub async fn is_charging(&self) -> Result<bool> {
        let charging = self.charge_state().await?.is_charging();
        self.logger.debug(&format!("charging: charging is {}", charging));
        Ok(charging)
    }

    pub async fn set_charging(&self, on: bool) -> Result<()> {
        self.logger.info(&format!("Setting charging to on = {}", on));
        let command = if on {
            VehicleCommand::ChargeStart
        } else {
            VehicleCommand::ChargeStop
        };
        let response = self.send_command("charging state", command).await?;
        if response.is_accepted() {
            return Ok(());
        }

        match response.reason() {
            Some(reason) if SETTLED_REASONS.contains(&reason) => {
                self.logger
                    .info(&format!("Charging already settled: {}", reason));
                self.schedule_update(
                    ServiceId::Charging,
                    CharacteristicKind::On,
                    false.into(),
                    self.timings.charging_reset(),
                );
                Ok(())
            }
            _ => self.accept("charging state", &response),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charge(rate: f64, latch: &str) -> ChargeState {
        ChargeState {
            charge_rate: Some(rate),
            charge_port_latch: Some(latch.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn charging_state_precedence() {
        assert_eq!(charging_state_of(&charge(0.0, "Disengaged")), ChargingState::NotChargeable);
        assert_eq!(charging_state_of(&charge(0.0, "Engaged")), ChargingState::NotCharging);
        assert_eq!(charging_state_of(&charge(11.0, "Engaged")), ChargingState::Charging);
        assert_eq!(charging_state_of(&ChargeState::default()), ChargingState::NotChargeable);
    }
}
