//! Wire types of the vehicle Owner API.
//!
//! Only the fields the accessory reads are modeled; everything else in the
//! payloads is ignored by serde.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric vehicle identifier used in every per-vehicle endpoint
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sleep/wake state reported in the vehicle list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SleepState {
    Online,
    Asleep,
    Offline,
    Waking,
    Other(String),
}

impl SleepState {
    pub fn from_label(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "online" => Self::Online,
            "asleep" => Self::Asleep,
            "offline" => Self::Offline,
            "waking" => Self::Waking,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Online => "online",
            Self::Asleep => "asleep",
            Self::Offline => "offline",
            Self::Waking => "waking",
            Self::Other(s) => s.as_str(),
        }
    }

    pub fn is_asleep(&self) -> bool {
        matches!(self, Self::Asleep)
    }

    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for SleepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SleepState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SleepState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_label(&s))
    }
}

/// One entry of `GET /api/1/vehicles`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub id: VehicleId,
    #[serde(default)]
    pub vehicle_id: Option<u64>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    pub state: SleepState,
}

/// Full telemetry snapshot from `vehicle_data`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleData {
    #[serde(default)]
    pub vehicle_id: Option<u64>,
    #[serde(default)]
    pub state: Option<SleepState>,
    #[serde(default)]
    pub climate_state: Option<ClimateState>,
    #[serde(default)]
    pub charge_state: Option<ChargeState>,
    #[serde(default)]
    pub vehicle_state: Option<VehicleState>,
    #[serde(default)]
    pub drive_state: Option<DriveState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimateState {
    #[serde(default)]
    pub inside_temp: Option<f64>,
    #[serde(default)]
    pub outside_temp: Option<f64>,
    #[serde(default)]
    pub driver_temp_setting: Option<f64>,
    #[serde(default)]
    pub passenger_temp_setting: Option<f64>,
    #[serde(default)]
    pub is_auto_conditioning_on: Option<bool>,
    #[serde(default)]
    pub is_climate_on: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeState {
    #[serde(default)]
    pub battery_level: Option<f64>,
    #[serde(default)]
    pub battery_range: Option<f64>,
    #[serde(default)]
    pub charge_rate: Option<f64>,
    #[serde(default)]
    pub charging_state: Option<String>,
    #[serde(default)]
    pub charge_port_latch: Option<String>,
    #[serde(default)]
    pub charge_port_door_open: Option<bool>,
}

impl ChargeState {
    /// A non-zero charge rate means energy is flowing
    pub fn is_charging(&self) -> bool {
        self.charge_rate.unwrap_or(0.0) > 0.0
    }

    /// Cable latched into the port
    pub fn is_plugged_in(&self) -> bool {
        self.charge_port_latch.as_deref() == Some("Engaged")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    #[serde(default)]
    pub locked: Option<bool>,
    /// Front trunk; non-zero when open
    #[serde(default)]
    pub ft: Option<i64>,
    /// Rear trunk; non-zero when open
    #[serde(default)]
    pub rt: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveState {
    /// `P`, `D`, `R`, `N`, or null while parked and asleep
    #[serde(default)]
    pub shift_state: Option<String>,
    #[serde(default)]
    pub speed: Option<f64>,
}

impl DriveState {
    /// Shift state label with a missing value read as "Parked"
    pub fn shift_label(&self) -> &str {
        match self.shift_state.as_deref() {
            None | Some("") | Some("P") => "Parked",
            Some(other) => other,
        }
    }

    pub fn is_parked(&self) -> bool {
        self.shift_label() == "Parked"
    }
}

/// Which trunk to actuate
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trunk {
    Rear,
    Front,
}

impl Trunk {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rear => "rear",
            Self::Front => "front",
        }
    }
}

/// Remote commands the accessory can issue
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleCommand {
    DoorLock,
    DoorUnlock,
    ActuateTrunk(Trunk),
    OpenChargePort,
    CloseChargePort,
    ClimateStart,
    ClimateStop,
    SetTemps { driver: f64, passenger: f64 },
    ChargeStart,
    ChargeStop,
    HonkHorn,
    FlashLights,
}

impl VehicleCommand {
    /// Path segment under `/api/1/vehicles/{id}/command/`
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::DoorLock => "door_lock",
            Self::DoorUnlock => "door_unlock",
            Self::ActuateTrunk(_) => "actuate_trunk",
            Self::OpenChargePort => "charge_port_door_open",
            Self::CloseChargePort => "charge_port_door_close",
            Self::ClimateStart => "auto_conditioning_start",
            Self::ClimateStop => "auto_conditioning_stop",
            Self::SetTemps { .. } => "set_temps",
            Self::ChargeStart => "charge_start",
            Self::ChargeStop => "charge_stop",
            Self::HonkHorn => "honk_horn",
            Self::FlashLights => "flash_lights",
        }
    }

    /// JSON body sent with the command
    pub fn body(&self) -> serde_json::Value {
        match self {
            Self::ActuateTrunk(which) => serde_json::json!({ "which_trunk": which.as_str() }),
            Self::SetTemps { driver, passenger } => serde_json::json!({
                "driver_temp": driver,
                "passenger_temp": passenger,
            }),
            _ => serde_json::json!({}),
        }
    }
}

/// Result payload of every command endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub result: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

impl CommandResponse {
    pub fn ok() -> Self {
        Self {
            result: true,
            reason: None,
        }
    }

    pub fn rejected(reason: &str) -> Self {
        Self {
            result: false,
            reason: Some(reason.to_string()),
        }
    }

    /// Non-empty rejection reason, if any
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref().filter(|r| !r.is_empty())
    }

    /// Accepted when the result flag is set and no reason came back
    pub fn is_accepted(&self) -> bool {
        self.result && self.reason().is_none()
    }
}

/// `{ "response": ..., "error": ... }` envelope wrapping every answer
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub response: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_list_parses() {
        let body = r#"{"response":[{"id":12345678901234567,"vehicle_id":987,"vin":"5YJ3E1EA7KF000001","display_name":"Car","state":"asleep","tokens":["a"]}],"count":1}"#;
        let env: ApiEnvelope<Vec<VehicleSummary>> = serde_json::from_str(body).unwrap();
        let list = env.response.unwrap();
        assert_eq!(list[0].id, VehicleId(12345678901234567));
        assert_eq!(list[0].state, SleepState::Asleep);
    }

    #[test]
    fn unknown_sleep_state_is_kept() {
        assert_eq!(
            SleepState::from_label("updating"),
            SleepState::Other("updating".to_string())
        );
        assert!(!SleepState::Waking.is_asleep());
    }

    #[test]
    fn missing_shift_state_reads_as_parked() {
        assert!(DriveState::default().is_parked());
        let driving = DriveState {
            shift_state: Some("D".to_string()),
            speed: Some(30.0),
        };
        assert!(!driving.is_parked());
    }

    #[test]
    fn command_response_acceptance() {
        assert!(CommandResponse::ok().is_accepted());
        let empty_reason = CommandResponse {
            result: true,
            reason: Some(String::new()),
        };
        assert!(empty_reason.is_accepted());
        assert!(!CommandResponse::rejected("complete").is_accepted());
    }

    #[test]
    fn command_bodies() {
        assert_eq!(
            VehicleCommand::ActuateTrunk(Trunk::Front).body(),
            serde_json::json!({"which_trunk": "front"})
        );
        let temps = VehicleCommand::SetTemps {
            driver: 21.5,
            passenger: 21.5,
        };
        assert_eq!(temps.endpoint(), "set_temps");
        assert_eq!(temps.body()["passenger_temp"], 21.5);
    }
}
