//! Single-flight vehicle data cache
//!
//! Getters for several characteristics all want the same `vehicle_data`
//! payload, and the host tends to ask for them in bursts. Callers that arrive
//! while a fetch is in flight wait for it and share its outcome.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

use crate::api::VehicleData;
use crate::error::{BridgeError, Result};
use crate::session::SessionManager;

/// A full telemetry response and when it was received
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub data: VehicleData,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Default)]
struct FlightState {
    /// Number of completed fetches
    completed: u64,
    /// Outcome of the most recent fetch
    last_outcome: Option<Result<Arc<Snapshot>>>,
    /// Most recent successful snapshot
    latest: Option<Arc<Snapshot>>,
}

pub struct SnapshotCache {
    session: Arc<SessionManager>,
    flight: Mutex<()>,
    state: StdMutex<FlightState>,
    logger: crate::logging::StructuredLogger,
}

impl SnapshotCache {
    pub fn new(session: Arc<SessionManager>, logger: crate::logging::StructuredLogger) -> Self {
        Self {
            session,
            flight: Mutex::new(()),
            state: StdMutex::new(FlightState::default()),
            logger,
        }
    }

    /// Fetch a fresh snapshot, joining a fetch that is already in flight
    pub async fn fetch(&self) -> Result<Arc<Snapshot>> {
        let seen = self.completed();
        let _guard = self.flight.lock().await;

        // Someone finished a fetch while we queued; share it
        if self.completed() != seen
            && let Some(outcome) = self.last_outcome()
        {
            return outcome;
        }

        let outcome = self.fetch_now().await;
        if let Ok(mut state) = self.state.lock() {
            state.completed += 1;
            state.last_outcome = Some(outcome.clone());
            if let Ok(snapshot) = &outcome {
                state.latest = Some(snapshot.clone());
            }
        }
        outcome
    }

    /// Most recent successful snapshot, without fetching
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.state.lock().ok().and_then(|s| s.latest.clone())
    }

    fn completed(&self) -> u64 {
        self.state.lock().map(|s| s.completed).unwrap_or(0)
    }

    fn last_outcome(&self) -> Option<Result<Arc<Snapshot>>> {
        self.state.lock().ok().and_then(|s| s.last_outcome.clone())
    }

    async fn fetch_now(&self) -> Result<Arc<Snapshot>> {
        let token = self.session.auth_token().await?;
        let id = self.session.vehicle_id().await?;

        self.logger.debug("Querying vehicle data");
        let data = match self.session.api().vehicle_data(&token, id).await {
            Ok(data) => data,
            Err(e) => {
                self.logger
                    .warn(&format!("Vehicle data unavailable (asleep?): {}", e));
                return Err(e);
            }
        };

        if data.vehicle_id.is_none() {
            self.logger.error("Vehicle data response carried no vehicle_id");
            return Err(BridgeError::api("vehicle data response carried no vehicle_id"));
        }
        if let Some(state) = &data.state {
            self.session.record_state(state.clone()).await;
        }

        Ok(Arc::new(Snapshot {
            data,
            fetched_at: Utc::now(),
        }))
    }
}
