//! Session cache for the controlled vehicle
//!
//! Holds the bearer token, the resolved vehicle id and the last reported
//! sleep state. The bearer token is exchanged once and kept for the process
//! lifetime; the vehicle id is re-resolved after a short TTL.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::api::{SleepState, VehicleApi, VehicleId, VehicleSummary};
use crate::auth::TokenSource;
use crate::error::{BridgeError, Result};

/// Mutable per-accessory session state
#[derive(Debug, Clone)]
pub struct Session {
    pub bearer_token: Option<String>,
    pub refresh_token: String,
    pub vehicle_id: Option<VehicleId>,
    pub vehicle_id_fetched_at: Option<Instant>,
    pub last_wake_attempt_at: Option<Instant>,
    pub last_known_state: Option<SleepState>,
}

impl Session {
    pub fn new(refresh_token: String) -> Self {
        Self {
            bearer_token: None,
            refresh_token,
            vehicle_id: None,
            vehicle_id_fetched_at: None,
            last_wake_attempt_at: None,
            last_known_state: None,
        }
    }
}

/// Owns the session and resolves tokens, vehicle id and sleep state
pub struct SessionManager {
    api: Arc<dyn VehicleApi>,
    tokens: Arc<dyn TokenSource>,
    vin: Option<String>,
    vehicle_id_ttl: Duration,
    session: Mutex<Session>,
    logger: crate::logging::StructuredLogger,
}

impl SessionManager {
    pub fn new(
        api: Arc<dyn VehicleApi>,
        tokens: Arc<dyn TokenSource>,
        refresh_token: String,
        vin: Option<String>,
        vehicle_id_ttl: Duration,
        logger: crate::logging::StructuredLogger,
    ) -> Self {
        Self {
            api,
            tokens,
            vin,
            vehicle_id_ttl,
            session: Mutex::new(Session::new(refresh_token)),
            logger,
        }
    }

    pub fn api(&self) -> &Arc<dyn VehicleApi> {
        &self.api
    }

    /// Bearer token, exchanged on first use
    pub async fn auth_token(&self) -> Result<String> {
        let mut session = self.session.lock().await;
        if let Some(token) = &session.bearer_token {
            return Ok(token.clone());
        }

        self.logger.info("Exchanging refresh token for bearer token");
        let grant = self
            .tokens
            .exchange(&session.refresh_token)
            .await
            .inspect_err(|e| self.logger.error(&format!("Token exchange failed: {}", e)))?;

        if let Some(rotated) = grant.refresh_token.filter(|t| !t.is_empty()) {
            session.refresh_token = rotated;
        }
        session.bearer_token = Some(grant.access_token.clone());
        Ok(grant.access_token)
    }

    /// Active vehicle id, cached for the configured TTL
    pub async fn vehicle_id(&self) -> Result<VehicleId> {
        let token = self.auth_token().await?;
        let mut session = self.session.lock().await;

        if let (Some(id), Some(fetched_at)) = (session.vehicle_id, session.vehicle_id_fetched_at)
            && fetched_at.elapsed() < self.vehicle_id_ttl
        {
            return Ok(id);
        }

        self.logger.debug("Querying vehicle id and state");
        let vehicles = self
            .api
            .vehicles(&token)
            .await
            .inspect_err(|e| self.logger.error(&format!("Error listing vehicles: {}", e)))?;
        let vehicle = self.select(&vehicles)?;

        session.vehicle_id = Some(vehicle.id);
        session.vehicle_id_fetched_at = Some(Instant::now());
        session.last_known_state = Some(vehicle.state.clone());
        Ok(vehicle.id)
    }

    /// Current sleep state of the active vehicle, recorded as last known
    pub async fn vehicle_state(&self) -> Result<SleepState> {
        let token = self.auth_token().await?;
        let vehicles = self.api.vehicles(&token).await.inspect_err(|e| {
            self.logger
                .warn(&format!("Error querying vehicle state: {}", e))
        })?;
        let state = self.select(&vehicles)?.state.clone();

        self.session.lock().await.last_known_state = Some(state.clone());
        Ok(state)
    }

    /// Stamp a wake attempt unless one happened within `min_interval`
    pub async fn try_begin_wake(&self, min_interval: Duration) -> bool {
        let mut session = self.session.lock().await;
        let due = session
            .last_wake_attempt_at
            .is_none_or(|at| at.elapsed() >= min_interval);
        if due {
            session.last_wake_attempt_at = Some(Instant::now());
        }
        due
    }

    pub async fn record_state(&self, state: SleepState) {
        self.session.lock().await.last_known_state = Some(state);
    }

    pub async fn last_known_state(&self) -> Option<SleepState> {
        self.session.lock().await.last_known_state.clone()
    }

    /// Copy of the current session
    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    fn select<'a>(&self, vehicles: &'a [VehicleSummary]) -> Result<&'a VehicleSummary> {
        let found = match &self.vin {
            Some(vin) => vehicles
                .iter()
                .find(|v| v.vin.as_deref().is_some_and(|x| x.eq_ignore_ascii_case(vin))),
            None => vehicles.first(),
        };
        found.ok_or_else(|| match &self.vin {
            Some(vin) => BridgeError::api(format!("No vehicle with VIN {} on this account", vin)),
            None => BridgeError::api("No vehicles on this account"),
        })
    }
}
