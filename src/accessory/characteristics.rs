//! Characteristic kinds and their value domains
//!
//! Numeric codes follow the HomeKit Accessory Protocol so a host can pass
//! values through unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BridgeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacteristicKind {
    CurrentTemperature,
    TargetTemperature,
    CurrentHeatingCoolingState,
    TargetHeatingCoolingState,
    TemperatureDisplayUnits,
    On,
    LockCurrentState,
    LockTargetState,
    BatteryLevel,
    ChargingState,
}

impl CharacteristicKind {
    pub const ALL: [CharacteristicKind; 10] = [
        Self::CurrentTemperature,
        Self::TargetTemperature,
        Self::CurrentHeatingCoolingState,
        Self::TargetHeatingCoolingState,
        Self::TemperatureDisplayUnits,
        Self::On,
        Self::LockCurrentState,
        Self::LockTargetState,
        Self::BatteryLevel,
        Self::ChargingState,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentTemperature => "CurrentTemperature",
            Self::TargetTemperature => "TargetTemperature",
            Self::CurrentHeatingCoolingState => "CurrentHeatingCoolingState",
            Self::TargetHeatingCoolingState => "TargetHeatingCoolingState",
            Self::TemperatureDisplayUnits => "TemperatureDisplayUnits",
            Self::On => "On",
            Self::LockCurrentState => "LockCurrentState",
            Self::LockTargetState => "LockTargetState",
            Self::BatteryLevel => "BatteryLevel",
            Self::ChargingState => "ChargingState",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for CharacteristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value carried by a characteristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl CharacteristicValue {
    /// Truthiness; numbers are true when non-zero
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(_) => None,
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Self::Float(_) => None,
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for CharacteristicValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<u8> for CharacteristicValue {
    fn from(v: u8) -> Self {
        Self::Int(i64::from(v))
    }
}

fn code_of(value: &CharacteristicValue, what: &str) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| BridgeError::validation(what, "expected an integer code"))
}

/// Thermostat heating/cooling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatingCoolingState {
    Off = 0,
    Heat = 1,
    Cool = 2,
    Auto = 3,
}

impl From<HeatingCoolingState> for CharacteristicValue {
    fn from(v: HeatingCoolingState) -> Self {
        Self::Int(v as i64)
    }
}

impl TryFrom<&CharacteristicValue> for HeatingCoolingState {
    type Error = BridgeError;

    fn try_from(value: &CharacteristicValue) -> Result<Self> {
        match code_of(value, "TargetHeatingCoolingState")? {
            0 => Ok(Self::Off),
            1 => Ok(Self::Heat),
            2 => Ok(Self::Cool),
            3 => Ok(Self::Auto),
            other => Err(BridgeError::validation(
                "TargetHeatingCoolingState".to_string(),
                format!("unknown mode {}", other),
            )),
        }
    }
}

/// Lock mechanism state; targets only use `Unsecured` and `Secured`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockState {
    Unsecured = 0,
    Secured = 1,
    Jammed = 2,
    Unknown = 3,
}

impl LockState {
    pub fn from_secured(secured: bool) -> Self {
        if secured { Self::Secured } else { Self::Unsecured }
    }

    pub fn is_secured(&self) -> bool {
        matches!(self, Self::Secured)
    }
}

impl From<LockState> for CharacteristicValue {
    fn from(v: LockState) -> Self {
        Self::Int(v as i64)
    }
}

impl TryFrom<&CharacteristicValue> for LockState {
    type Error = BridgeError;

    fn try_from(value: &CharacteristicValue) -> Result<Self> {
        match code_of(value, "LockTargetState")? {
            0 => Ok(Self::Unsecured),
            1 => Ok(Self::Secured),
            2 => Ok(Self::Jammed),
            3 => Ok(Self::Unknown),
            other => Err(BridgeError::validation(
                "LockTargetState".to_string(),
                format!("unknown lock state {}", other),
            )),
        }
    }
}

/// Battery service charging state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargingState {
    NotCharging = 0,
    Charging = 1,
    NotChargeable = 2,
}

impl From<ChargingState> for CharacteristicValue {
    fn from(v: ChargingState) -> Self {
        Self::Int(v as i64)
    }
}

/// Units the thermostat asks the host to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureDisplayUnits {
    Celsius = 0,
    Fahrenheit = 1,
}

impl From<TemperatureDisplayUnits> for CharacteristicValue {
    fn from(v: TemperatureDisplayUnits) -> Self {
        Self::Int(v as i64)
    }
}
