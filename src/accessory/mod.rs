//! The vehicle as a smart-home accessory
//!
//! `TeslaAccessory` owns the session, the snapshot cache, the wake
//! coordinator, the characteristic store and the delayed-task scheduler.
//! Hosts call [`TeslaAccessory::get`] and [`TeslaAccessory::set`] with a
//! (service, characteristic) pair; the per-capability handlers live in the
//! submodules as further `impl TeslaAccessory` blocks.

mod charging;
mod climate;
mod conditioning;
mod connection;
mod locks;
mod signals;
mod trunk;

pub mod characteristics;
pub mod services;
pub mod store;

pub use characteristics::{
    CharacteristicKind, CharacteristicValue, ChargingState, HeatingCoolingState, LockState,
    TemperatureDisplayUnits,
};
pub use services::{CharacteristicSpec, Service, ServiceId, ServiceKind, catalog};
pub use store::{CharacteristicStore, CharacteristicUpdate};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::api::{CommandResponse, OwnerApiClient, SleepState, Trunk, VehicleApi, VehicleCommand};
use crate::auth::{OAuthTokenClient, TokenSource};
use crate::config::{AccessoryConfig, Config, TimingConfig};
use crate::error::{BridgeError, Result};
use crate::logging::{LogContext, get_logger_with_context};
use crate::scheduler::{TaskScheduler, TimerKey};
use crate::session::SessionManager;
use crate::snapshot::{Snapshot, SnapshotCache};
use crate::wake::WakeCoordinator;

pub struct TeslaAccessory {
    name: String,
    instance_id: uuid::Uuid,
    display_units: TemperatureDisplayUnits,
    timings: TimingConfig,
    services: Vec<Service>,
    session: Arc<SessionManager>,
    snapshots: SnapshotCache,
    wake: WakeCoordinator,
    store: Arc<CharacteristicStore>,
    scheduler: TaskScheduler,
    logger: crate::logging::StructuredLogger,
}

impl TeslaAccessory {
    /// Build an accessory over the given API and token source
    pub fn new(
        config: &AccessoryConfig,
        timings: &TimingConfig,
        api: Arc<dyn VehicleApi>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        let instance_id = uuid::Uuid::new_v4();
        let logger = get_logger_with_context(
            LogContext::new("accessory")
                .with_accessory(&config.name)
                .with_vin(config.vin.as_deref()),
        );

        let session = Arc::new(SessionManager::new(
            api,
            tokens,
            config.token.clone(),
            config.vin.clone(),
            timings.vehicle_id_ttl(),
            logger.child("session"),
        ));
        let snapshots = SnapshotCache::new(session.clone(), logger.child("snapshot"));
        let wake = WakeCoordinator::new(session.clone(), timings, logger.child("wake"));

        logger.info(&format!("Accessory {} created ({})", config.name, instance_id));

        Self {
            name: config.name.clone(),
            instance_id,
            display_units: config.display_units,
            timings: timings.clone(),
            services: catalog(&config.name),
            session,
            snapshots,
            wake,
            store: Arc::new(CharacteristicStore::new()),
            scheduler: TaskScheduler::new(),
            logger,
        }
    }

    /// Build an accessory talking to the real Owner API and token endpoint
    pub fn from_config(config: &Config) -> Result<Self> {
        let api: Arc<dyn VehicleApi> = Arc::new(OwnerApiClient::new(&config.api)?);
        let tokens: Arc<dyn TokenSource> = Arc::new(OAuthTokenClient::new(&config.api)?);
        Ok(Self::new(&config.accessory, &config.timings, api, tokens))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance_id(&self) -> uuid::Uuid {
        self.instance_id
    }

    /// Services in presentation order
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn service(&self, id: ServiceId) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn store(&self) -> &CharacteristicStore {
        &self.store
    }

    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    /// Stream of characteristic value changes
    pub fn subscribe(&self) -> broadcast::Receiver<CharacteristicUpdate> {
        self.store.subscribe()
    }

    /// Most recent snapshot without fetching
    pub fn latest_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshots.latest()
    }

    /// Read a characteristic
    pub async fn get(
        &self,
        service: ServiceId,
        characteristic: CharacteristicKind,
    ) -> Result<CharacteristicValue> {
        use CharacteristicKind as C;
        use ServiceId as S;

        let value: CharacteristicValue = match (service, characteristic) {
            (S::Thermostat, C::CurrentTemperature) => self.current_temperature().await?.into(),
            (S::Thermostat, C::TargetTemperature) => self.target_temperature().await?.into(),
            (S::Thermostat, C::CurrentHeatingCoolingState | C::TargetHeatingCoolingState) => {
                self.heating_cooling_state().await?.into()
            }
            (S::Thermostat, C::TemperatureDisplayUnits) => self.temperature_display_units().into(),
            (S::Conditioning, C::On) => self.conditioning_active().await?.into(),
            (S::DoorLocks, C::LockCurrentState | C::LockTargetState) => {
                self.door_lock_state().await?.into()
            }
            (S::ChargeDoor, C::LockCurrentState | C::LockTargetState) => {
                self.charge_door_state().await?.into()
            }
            (S::Trunk, C::LockCurrentState | C::LockTargetState) => {
                self.trunk_state(Trunk::Rear).await?.into()
            }
            (S::Frunk, C::LockCurrentState | C::LockTargetState) => {
                self.trunk_state(Trunk::Front).await?.into()
            }
            (S::Battery, C::BatteryLevel) => self.battery_level().await?.into(),
            (S::Battery, C::ChargingState) => self.charging_state().await?.into(),
            (S::Charging, C::On) => self.is_charging().await?.into(),
            (S::Horn, C::On) => self.horn_state().into(),
            (S::Lights, C::On) => self.lights_state().into(),
            (S::Connection, C::On) => self.is_connected().await?.into(),
            _ => return Err(BridgeError::unsupported(service.as_str(), characteristic.as_str())),
        };

        self.store.update_value(service, characteristic, value.clone());
        Ok(value)
    }

    /// Write a characteristic
    pub async fn set(
        &self,
        service: ServiceId,
        characteristic: CharacteristicKind,
        value: CharacteristicValue,
    ) -> Result<()> {
        use CharacteristicKind as C;
        use ServiceId as S;

        match (service, characteristic) {
            (S::Thermostat, C::TargetTemperature) => {
                let celsius = value.as_f64().ok_or_else(|| {
                    BridgeError::validation("TargetTemperature", "expected a number")
                })?;
                self.set_target_temperature(celsius).await?;
            }
            (S::Thermostat, C::TargetHeatingCoolingState) => {
                self.set_heating_cooling_state(HeatingCoolingState::try_from(&value)?)
                    .await?;
            }
            (S::Conditioning, C::On) => self.set_conditioning(value.as_bool()).await?,
            (S::DoorLocks, C::LockTargetState) => {
                self.set_door_lock(LockState::try_from(&value)?).await?;
            }
            (S::ChargeDoor, C::LockTargetState) => {
                self.set_charge_door(LockState::try_from(&value)?).await?;
            }
            (S::Trunk, C::LockTargetState) => {
                self.set_trunk(Trunk::Rear, LockState::try_from(&value)?)
                    .await?;
            }
            (S::Frunk, C::LockTargetState) => {
                self.set_trunk(Trunk::Front, LockState::try_from(&value)?)
                    .await?;
            }
            (S::Charging, C::On) => self.set_charging(value.as_bool()).await?,
            (S::Horn, C::On) => self.set_horn(value.as_bool()).await?,
            (S::Lights, C::On) => self.set_lights(value.as_bool()).await?,
            (S::Connection, C::On) => self.set_connection(value.as_bool()).await?,
            _ => {
                return Err(BridgeError::unsupported(
                    service.as_str(),
                    characteristic.as_str(),
                ));
            }
        }

        self.store.update_value(service, characteristic, value);
        Ok(())
    }

    /// Cancel every pending delayed update
    pub fn shutdown(&self) {
        let pending = self.scheduler.pending_count();
        self.scheduler.cancel_all();
        self.logger.info(&format!(
            "Accessory {} shut down, {} pending task(s) cancelled",
            self.name, pending
        ));
    }

    async fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.snapshots.fetch().await
    }

    async fn sleep_state(&self) -> Result<SleepState> {
        self.session.vehicle_state().await
    }

    /// Issue a command; transport failures become a generic command error
    async fn send_command(
        &self,
        operation: &str,
        command: VehicleCommand,
    ) -> Result<CommandResponse> {
        let outcome = async {
            let token = self.session.auth_token().await?;
            let id = self.session.vehicle_id().await?;
            self.session.api().command(&token, id, command).await
        }
        .await;

        outcome.map_err(|e| {
            self.logger
                .error(&format!("Error setting {}: {}", operation, e));
            BridgeError::command(operation)
        })
    }

    /// Map a command response onto success or a rejection carrying its reason
    fn accept(&self, operation: &str, response: &CommandResponse) -> Result<()> {
        if response.is_accepted() {
            return Ok(());
        }
        let reason = response.reason().unwrap_or("no reason given");
        self.logger
            .warn(&format!("Error setting {}: {}", operation, reason));
        Err(BridgeError::rejected(operation, reason))
    }

    async fn run_command(&self, operation: &str, command: VehicleCommand) -> Result<()> {
        let response = self.send_command(operation, command).await?;
        self.accept(operation, &response)
    }

    /// Push `value` to the store after `delay`, replacing a pending update
    fn schedule_update(
        &self,
        service: ServiceId,
        characteristic: CharacteristicKind,
        value: CharacteristicValue,
        delay: Duration,
    ) {
        let store = self.store.clone();
        self.scheduler.schedule(
            TimerKey::Characteristic(service, characteristic),
            delay,
            async move {
                store.update_value(service, characteristic, value);
            },
        );
    }
}

impl Drop for TeslaAccessory {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
    }
}
