//! Mirror of the values the host currently shows

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;

use super::characteristics::{CharacteristicKind, CharacteristicValue};
use super::services::ServiceId;

/// A value change pushed to subscribers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacteristicUpdate {
    pub service: ServiceId,
    pub characteristic: CharacteristicKind,
    pub value: CharacteristicValue,
    pub at: DateTime<Utc>,
}

pub struct CharacteristicStore {
    values: Mutex<HashMap<(ServiceId, CharacteristicKind), CharacteristicValue>>,
    tx: broadcast::Sender<CharacteristicUpdate>,
}

impl CharacteristicStore {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(256);
        Self {
            values: Mutex::new(HashMap::new()),
            tx,
        }
    }

    /// Record a value and notify subscribers
    pub fn update_value(
        &self,
        service: ServiceId,
        characteristic: CharacteristicKind,
        value: CharacteristicValue,
    ) {
        if let Ok(mut values) = self.values.lock() {
            values.insert((service, characteristic), value.clone());
        }
        // No subscribers is fine
        let _ = self.tx.send(CharacteristicUpdate {
            service,
            characteristic,
            value,
            at: Utc::now(),
        });
    }

    pub fn value(
        &self,
        service: ServiceId,
        characteristic: CharacteristicKind,
    ) -> Option<CharacteristicValue> {
        self.values
            .lock()
            .ok()
            .and_then(|v| v.get(&(service, characteristic)).cloned())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CharacteristicUpdate> {
        self.tx.subscribe()
    }
}

impl Default for CharacteristicStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_is_stored_and_broadcast() {
        let store = CharacteristicStore::new();
        let mut rx = store.subscribe();
        store.update_value(
            ServiceId::Horn,
            CharacteristicKind::On,
            CharacteristicValue::Bool(true),
        );

        assert_eq!(
            store.value(ServiceId::Horn, CharacteristicKind::On),
            Some(CharacteristicValue::Bool(true))
        );
        let update = rx.recv().await.unwrap();
        assert_eq!(update.service, ServiceId::Horn);
        assert_eq!(update.value, CharacteristicValue::Bool(true));
    }
}
