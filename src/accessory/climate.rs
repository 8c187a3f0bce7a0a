//! Thermostat service

use super::{HeatingCoolingState, TeslaAccessory, TemperatureDisplayUnits};
use crate::api::{ClimateState, VehicleCommand};
use crate::error::{BridgeError, Result};

fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    (celsius * 1.8 + 32.0).round()
}

impl TeslaAccessory {
    async fn climate_state(&self) -> Result<ClimateState> {
        let snapshot = self.snapshot().await?;
        snapshot.data.climate_state.clone().ok_or_else(|| {
            self.logger.error("Vehicle data carried no climate state");
            BridgeError::missing_field("climate_state")
        })
    }

    /// Cabin temperature in Celsius
    pub async fn current_temperature(&self) -> Result<f64> {
        let temp = self
            .climate_state()
            .await?
            .inside_temp
            .ok_or_else(|| BridgeError::missing_field("climate_state.inside_temp"))?;
        self.logger.debug(&format!("climate: temperature is {}", temp));
        Ok(temp)
    }

    /// Driver temperature setting in Celsius
    pub async fn target_temperature(&self) -> Result<f64> {
        let temp = self
            .climate_state()
            .await?
            .driver_temp_setting
            .ok_or_else(|| BridgeError::missing_field("climate_state.driver_temp_setting"))?;
        self.logger.debug(&format!("climate: setting is {}", temp));
        Ok(temp)
    }

    /// AUTO while auto-conditioning runs, OFF otherwise
    pub async fn heating_cooling_state(&self) -> Result<HeatingCoolingState> {
        let state = if self
            .climate_state()
            .await?
            .is_auto_conditioning_on
            .unwrap_or(false)
        {
            HeatingCoolingState::Auto
        } else {
            HeatingCoolingState::Off
        };
        self.logger.debug(&format!("climate: state is {:?}", state));
        Ok(state)
    }

    pub fn temperature_display_units(&self) -> TemperatureDisplayUnits {
        self.display_units
    }

    /// Set driver and passenger temperature to the same value
    pub async fn set_target_temperature(&self, celsius: f64) -> Result<()> {
        self.logger.info(&format!(
            "Setting temp to {} ({}F)",
            celsius,
            celsius_to_fahrenheit(celsius)
        ));
        self.run_command(
            "temp",
            VehicleCommand::SetTemps {
                driver: celsius,
                passenger: celsius,
            },
        )
        .await
    }

    /// Any mode other than OFF starts climate
    pub async fn set_heating_cooling_state(&self, mode: HeatingCoolingState) -> Result<()> {
        let turn_on = mode != HeatingCoolingState::Off;
        self.logger
            .info(&format!("Setting climate to on = {}", turn_on));
        let command = if turn_on {
            VehicleCommand::ClimateStart
        } else {
            VehicleCommand::ClimateStop
        };
        self.run_command("climate state", command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fahrenheit_is_rounded() {
        assert_eq!(celsius_to_fahrenheit(21.0), 70.0);
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
    }
}
