//! Service catalog exposed by the accessory

use serde::{Deserialize, Serialize};
use std::fmt;

use super::characteristics::CharacteristicKind;

/// Service subtype identifiers, stable across restarts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceId {
    Thermostat,
    Conditioning,
    DoorLocks,
    ChargeDoor,
    Trunk,
    Frunk,
    Battery,
    Charging,
    Horn,
    Lights,
    Connection,
}

impl ServiceId {
    pub const ALL: [ServiceId; 11] = [
        Self::Thermostat,
        Self::DoorLocks,
        Self::Trunk,
        Self::Frunk,
        Self::Battery,
        Self::Charging,
        Self::ChargeDoor,
        Self::Horn,
        Self::Lights,
        Self::Conditioning,
        Self::Connection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thermostat => "thermostat",
            Self::Conditioning => "conditioning",
            Self::DoorLocks => "doorlocks",
            Self::ChargeDoor => "chargedoor",
            Self::Trunk => "trunk",
            Self::Frunk => "frunk",
            Self::Battery => "battery",
            Self::Charging => "charging",
            Self::Horn => "horn",
            Self::Lights => "lights",
            Self::Connection => "connection",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn kind(&self) -> ServiceKind {
        match self {
            Self::Thermostat => ServiceKind::Thermostat,
            Self::DoorLocks | Self::ChargeDoor | Self::Trunk | Self::Frunk => {
                ServiceKind::LockMechanism
            }
            Self::Battery => ServiceKind::BatteryService,
            Self::Conditioning | Self::Charging | Self::Horn | Self::Lights | Self::Connection => {
                ServiceKind::Switch
            }
        }
    }

    /// Display name derived from the accessory name
    pub fn display_name(&self, accessory: &str) -> String {
        let suffix = match self {
            Self::Thermostat => " Thermostat",
            Self::Conditioning => " Conditioning",
            Self::DoorLocks => " Doorlocks",
            Self::ChargeDoor => " Charging Port",
            Self::Trunk => " Trunk",
            Self::Frunk => " Front Trunk",
            Self::Battery => "",
            Self::Charging => " Charging",
            Self::Horn => " Horn",
            Self::Lights => " Lights",
            Self::Connection => " Connection",
        };
        format!("{}{}", accessory, suffix)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    Thermostat,
    Switch,
    LockMechanism,
    BatteryService,
}

impl ServiceKind {
    /// Characteristics a service of this kind carries, with write access
    pub fn characteristics(&self) -> Vec<CharacteristicSpec> {
        use CharacteristicKind as C;
        match self {
            Self::Thermostat => vec![
                CharacteristicSpec::read(C::CurrentTemperature),
                CharacteristicSpec::read_write(C::TargetTemperature),
                CharacteristicSpec::read(C::CurrentHeatingCoolingState),
                CharacteristicSpec::read_write(C::TargetHeatingCoolingState),
                CharacteristicSpec::read(C::TemperatureDisplayUnits),
            ],
            Self::Switch => vec![CharacteristicSpec::read_write(C::On)],
            Self::LockMechanism => vec![
                CharacteristicSpec::read(C::LockCurrentState),
                CharacteristicSpec::read_write(C::LockTargetState),
            ],
            Self::BatteryService => vec![
                CharacteristicSpec::read(C::BatteryLevel),
                CharacteristicSpec::read(C::ChargingState),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicSpec {
    pub kind: CharacteristicKind,
    pub readable: bool,
    pub writable: bool,
}

impl CharacteristicSpec {
    fn read(kind: CharacteristicKind) -> Self {
        Self {
            kind,
            readable: true,
            writable: false,
        }
    }

    fn read_write(kind: CharacteristicKind) -> Self {
        Self {
            kind,
            readable: true,
            writable: true,
        }
    }
}

/// A service as presented to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub kind: ServiceKind,
    pub name: String,
    pub characteristics: Vec<CharacteristicSpec>,
}

impl Service {
    pub fn new(id: ServiceId, accessory: &str) -> Self {
        let kind = id.kind();
        Self {
            id,
            kind,
            name: id.display_name(accessory),
            characteristics: kind.characteristics(),
        }
    }

    pub fn spec(&self, kind: CharacteristicKind) -> Option<&CharacteristicSpec> {
        self.characteristics.iter().find(|c| c.kind == kind)
    }
}

/// All services for an accessory, in presentation order
pub fn catalog(accessory: &str) -> Vec<Service> {
    ServiceId::ALL
        .iter()
        .map(|id| Service::new(*id, accessory))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_eleven_services_with_unique_ids() {
        let services = catalog("Car");
        assert_eq!(services.len(), 11);
        let mut ids: Vec<_> = services.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 11);
    }

    #[test]
    fn names_follow_accessory_name() {
        assert_eq!(ServiceId::ChargeDoor.display_name("Car"), "Car Charging Port");
        assert_eq!(ServiceId::Battery.display_name("Car"), "Car");
    }

    #[test]
    fn lock_target_is_writable_current_is_not() {
        let svc = Service::new(ServiceId::Trunk, "Car");
        assert!(svc.spec(CharacteristicKind::LockTargetState).unwrap().writable);
        assert!(!svc.spec(CharacteristicKind::LockCurrentState).unwrap().writable);
        assert!(svc.spec(CharacteristicKind::On).is_none());
    }
}
