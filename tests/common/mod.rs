#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use teslabridge::TeslaAccessory;
use teslabridge::api::{
    ChargeState, ClimateState, CommandResponse, DriveState, SleepState, VehicleApi,
    VehicleCommand, VehicleData, VehicleId, VehicleState, VehicleSummary,
};
use teslabridge::auth::{TokenGrant, TokenSource};
use teslabridge::config::{AccessoryConfig, TimingConfig};
use teslabridge::error::{BridgeError, Result};

pub const VIN: &str = "5YJ3E1EA7KF000001";
pub const VEHICLE_ID: VehicleId = VehicleId(42);

/// Scripted stand-in for the Owner API that records every call
pub struct MockVehicleApi {
    calls: Mutex<Vec<String>>,
    commands: Mutex<Vec<VehicleCommand>>,
    scripted_states: Mutex<VecDeque<SleepState>>,
    resting_state: Mutex<SleepState>,
    responses: Mutex<HashMap<&'static str, CommandResponse>>,
    failing: Mutex<HashSet<&'static str>>,
    drive: Mutex<DriveState>,
    data: Mutex<VehicleData>,
    data_delay: Duration,
}

impl MockVehicleApi {
    pub fn new(state: SleepState) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            commands: Mutex::new(Vec::new()),
            scripted_states: Mutex::new(VecDeque::new()),
            resting_state: Mutex::new(state),
            responses: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            drive: Mutex::new(DriveState::default()),
            data: Mutex::new(sample_data()),
            data_delay: Duration::ZERO,
        }
    }

    pub fn online() -> Self {
        Self::new(SleepState::Online)
    }

    pub fn asleep() -> Self {
        Self::new(SleepState::Asleep)
    }

    /// States returned by successive vehicle list calls; the last one sticks
    pub fn with_states(self, states: Vec<SleepState>) -> Self {
        *self.scripted_states.lock().unwrap() = states.into();
        self
    }

    pub fn with_response(self, endpoint: &'static str, response: CommandResponse) -> Self {
        self.responses.lock().unwrap().insert(endpoint, response);
        self
    }

    /// Make a call fail in transport; `endpoint` is a command endpoint or a call name
    pub fn failing(self, endpoint: &'static str) -> Self {
        self.failing.lock().unwrap().insert(endpoint);
        self
    }

    pub fn with_shift(self, shift: Option<&str>) -> Self {
        self.drive.lock().unwrap().shift_state = shift.map(str::to_string);
        self
    }

    pub fn with_data(self, data: VehicleData) -> Self {
        *self.data.lock().unwrap() = data;
        self
    }

    pub fn with_data_delay(mut self, delay: Duration) -> Self {
        self.data_delay = delay;
        self
    }

    pub fn set_failing(&self, endpoint: &'static str, fail: bool) {
        let mut failing = self.failing.lock().unwrap();
        if fail {
            failing.insert(endpoint);
        } else {
            failing.remove(endpoint);
        }
    }

    pub fn set_state(&self, state: SleepState) {
        *self.resting_state.lock().unwrap() = state;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls equal to `name`
    pub fn count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    pub fn commands(&self) -> Vec<VehicleCommand> {
        self.commands.lock().unwrap().clone()
    }

    fn record(&self, name: String) -> Result<()> {
        let fails = self.failing.lock().unwrap().iter().any(|f| name.ends_with(f));
        self.calls.lock().unwrap().push(name.clone());
        if fails {
            return Err(BridgeError::network(format!("{} unreachable", name)));
        }
        Ok(())
    }

    fn next_state(&self) -> SleepState {
        let mut resting = self.resting_state.lock().unwrap();
        if let Some(next) = self.scripted_states.lock().unwrap().pop_front() {
            *resting = next;
        }
        resting.clone()
    }
}

#[async_trait::async_trait]
impl VehicleApi for MockVehicleApi {
    async fn vehicles(&self, _token: &str) -> Result<Vec<VehicleSummary>> {
        self.record("vehicles".to_string())?;
        Ok(vec![
            VehicleSummary {
                id: VehicleId(7),
                vehicle_id: Some(7007),
                vin: Some("5YJSA1E2XHF000002".to_string()),
                display_name: Some("Other".to_string()),
                state: SleepState::Offline,
            },
            VehicleSummary {
                id: VEHICLE_ID,
                vehicle_id: Some(4242),
                vin: Some(VIN.to_string()),
                display_name: Some("Car".to_string()),
                state: self.next_state(),
            },
        ])
    }

    async fn vehicle_data(&self, _token: &str, _id: VehicleId) -> Result<VehicleData> {
        self.record("vehicle_data".to_string())?;
        if !self.data_delay.is_zero() {
            tokio::time::sleep(self.data_delay).await;
        }
        Ok(self.data.lock().unwrap().clone())
    }

    async fn drive_state(&self, _token: &str, _id: VehicleId) -> Result<DriveState> {
        self.record("drive_state".to_string())?;
        Ok(self.drive.lock().unwrap().clone())
    }

    async fn command(
        &self,
        _token: &str,
        _id: VehicleId,
        command: VehicleCommand,
    ) -> Result<CommandResponse> {
        let endpoint = command.endpoint();
        self.record(format!("command:{}", endpoint))?;
        self.commands.lock().unwrap().push(command);
        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(endpoint)
            .cloned()
            .unwrap_or_else(CommandResponse::ok))
    }

    async fn wake_up(&self, _token: &str, id: VehicleId) -> Result<VehicleSummary> {
        self.record("wake_up".to_string())?;
        Ok(VehicleSummary {
            id,
            vehicle_id: Some(4242),
            vin: Some(VIN.to_string()),
            display_name: Some("Car".to_string()),
            state: SleepState::Waking,
        })
    }
}

/// Token source that counts exchanges
#[derive(Default)]
pub struct MockTokens {
    pub exchanges: AtomicUsize,
}

impl MockTokens {
    pub fn count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TokenSource for MockTokens {
    async fn exchange(&self, refresh_token: &str) -> Result<TokenGrant> {
        let n = self.exchanges.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TokenGrant {
            access_token: format!("bearer-{}-{}", refresh_token, n),
            refresh_token: Some("rotated-refresh".to_string()),
            expires_in: Some(28_800),
            token_type: Some("Bearer".to_string()),
        })
    }
}

pub fn sample_data() -> VehicleData {
    VehicleData {
        vehicle_id: Some(4242),
        state: Some(SleepState::Online),
        climate_state: Some(ClimateState {
            inside_temp: Some(19.5),
            outside_temp: Some(12.0),
            driver_temp_setting: Some(21.0),
            passenger_temp_setting: Some(21.0),
            is_auto_conditioning_on: Some(true),
            is_climate_on: Some(true),
        }),
        charge_state: Some(ChargeState {
            battery_level: Some(78.0),
            battery_range: Some(231.4),
            charge_rate: Some(0.0),
            charging_state: Some("Stopped".to_string()),
            charge_port_latch: Some("Engaged".to_string()),
            charge_port_door_open: Some(true),
        }),
        vehicle_state: Some(VehicleState {
            locked: Some(true),
            ft: Some(0),
            rt: Some(1),
        }),
        drive_state: None,
    }
}

pub fn accessory_config() -> AccessoryConfig {
    AccessoryConfig {
        name: "Car".to_string(),
        token: "refresh".to_string(),
        vin: Some(VIN.to_string()),
        ..AccessoryConfig::default()
    }
}

pub fn accessory(api: Arc<MockVehicleApi>) -> TeslaAccessory {
    accessory_with(api, Arc::new(MockTokens::default()))
}

pub fn accessory_with(api: Arc<MockVehicleApi>, tokens: Arc<MockTokens>) -> TeslaAccessory {
    TeslaAccessory::new(
        &accessory_config(),
        &TimingConfig::default(),
        api,
        tokens,
    )
}
