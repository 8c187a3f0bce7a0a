#![no_main]
use libfuzzer_sys::fuzz_target;
use teslabridge::api::types::{ApiEnvelope, CommandResponse, VehicleData, VehicleSummary};
use teslabridge::accessory::{CharacteristicKind, CharacteristicValue, LockState, ServiceId};

fuzz_target!(|data: &[u8]| {
    // Owner API payloads as they come off the wire
    if let Ok(envelope) = serde_json::from_slice::<ApiEnvelope<VehicleData>>(data)
        && let Some(vehicle) = envelope.response
    {
        if let Some(charge) = &vehicle.charge_state {
            let _ = charge.is_charging();
            let _ = charge.is_plugged_in();
        }
        if let Some(drive) = &vehicle.drive_state {
            let _ = drive.is_parked();
        }
    }
    let _ = serde_json::from_slice::<ApiEnvelope<Vec<VehicleSummary>>>(data);
    let _ = serde_json::from_slice::<ApiEnvelope<CommandResponse>>(data);

    // Host-supplied characteristic writes
    if let Ok(value) = serde_json::from_slice::<CharacteristicValue>(data) {
        let _ = LockState::try_from(&value);
        let _ = value.as_bool();
    }
    if let Ok(label) = std::str::from_utf8(data) {
        let _ = ServiceId::from_label(label);
        let _ = CharacteristicKind::from_label(label);
    }
});
