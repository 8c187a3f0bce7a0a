//! Wake coordination for a sleeping vehicle
//!
//! A wake request is sent at most once per `min_interval`; afterwards the
//! vehicle list is polled until the vehicle reports anything but `asleep`
//! or the attempt budget runs out.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{SleepState, VehicleId};
use crate::config::TimingConfig;
use crate::error::Result;
use crate::session::SessionManager;

/// How a wake attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeOutcome {
    /// First non-asleep state observed while polling
    Awake(SleepState),
    /// Poll budget exhausted with the vehicle still asleep
    StillAsleep,
}

pub struct WakeCoordinator {
    session: Arc<SessionManager>,
    min_interval: Duration,
    poll_interval: Duration,
    max_attempts: u32,
    logger: crate::logging::StructuredLogger,
}

impl WakeCoordinator {
    pub fn new(
        session: Arc<SessionManager>,
        timings: &TimingConfig,
        logger: crate::logging::StructuredLogger,
    ) -> Self {
        Self {
            session,
            min_interval: timings.wake_min_interval(),
            poll_interval: timings.wake_poll_interval(),
            max_attempts: timings.wake_poll_attempts,
            logger,
        }
    }

    pub async fn wake(&self, id: VehicleId) -> Result<WakeOutcome> {
        let token = self.session.auth_token().await?;

        if self.session.try_begin_wake(self.min_interval).await {
            self.logger.info(&format!("Sending wake request to vehicle {}", id));
            self.session
                .api()
                .wake_up(&token, id)
                .await
                .inspect_err(|e| self.logger.error(&format!("Error waking vehicle: {}", e)))?;
        } else {
            self.logger
                .debug("Wake request sent recently; polling without a new request");
        }

        for attempt in 1..=self.max_attempts {
            tokio::time::sleep(self.poll_interval).await;
            self.logger.debug(&format!(
                "Checking whether vehicle woke up ({}/{})",
                attempt, self.max_attempts
            ));
            let state = self.session.vehicle_state().await?;
            if !state.is_asleep() {
                self.logger.info(&format!("Vehicle is {}", state));
                return Ok(WakeOutcome::Awake(state));
            }
        }

        self.logger.warn(&format!(
            "Vehicle still asleep after {} polls",
            self.max_attempts
        ));
        Ok(WakeOutcome::StillAsleep)
    }
}
