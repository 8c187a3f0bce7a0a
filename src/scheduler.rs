//! Cancellable delayed tasks
//!
//! Delayed work (switch auto-reset, lock state follow-up, the climate
//! auto-stop re-check) runs as tokio tasks registered under a key so it can
//! be replaced, queried and aborted when the accessory shuts down.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::accessory::{CharacteristicKind, ServiceId};

/// Identifies a scheduled task; one task per key at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Climate auto-stop after conditioning was switched on
    ConditioningAutoStop,
    /// Delayed value update for a characteristic
    Characteristic(ServiceId, CharacteristicKind),
}

struct Entry {
    id: u64,
    handle: JoinHandle<()>,
}

#[derive(Clone, Default)]
pub struct TaskScheduler {
    tasks: Arc<Mutex<HashMap<TimerKey, Entry>>>,
    next_id: Arc<AtomicU64>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay`, replacing any pending task with the same key
    pub fn schedule<F>(&self, key: TimerKey, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let tasks = self.tasks.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
            if let Ok(mut map) = tasks.lock()
                && map.get(&key).is_some_and(|e| e.id == id)
            {
                map.remove(&key);
            }
        });

        if let Ok(mut map) = self.tasks.lock()
            && let Some(previous) = map.insert(key, Entry { id, handle })
        {
            previous.handle.abort();
        }
    }

    /// Abort the task registered under `key`; returns whether one was pending
    pub fn cancel(&self, key: TimerKey) -> bool {
        let entry = self.tasks.lock().ok().and_then(|mut map| map.remove(&key));
        match entry {
            Some(entry) => {
                entry.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Whether a task under `key` has not finished yet
    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.tasks
            .lock()
            .ok()
            .and_then(|map| map.get(&key).map(|e| !e.handle.is_finished()))
            .unwrap_or(false)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks
            .lock()
            .map(|map| map.values().filter(|e| !e.handle.is_finished()).count())
            .unwrap_or(0)
    }

    /// Abort every pending task
    pub fn cancel_all(&self) {
        if let Ok(mut map) = self.tasks.lock() {
            for (_, entry) in map.drain() {
                entry.handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn task_runs_after_delay_and_clears_itself() {
        let scheduler = TaskScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        scheduler.schedule(TimerKey::ConditioningAutoStop, Duration::from_secs(5), async move {
            h.fetch_add(1, Ordering::SeqCst);
        });

        assert!(scheduler.is_pending(TimerKey::ConditioningAutoStop));
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_pending(TimerKey::ConditioningAutoStop));
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_replaces_previous_task() {
        let scheduler = TaskScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let h = hits.clone();
            scheduler.schedule(TimerKey::ConditioningAutoStop, Duration::from_secs(1), async move {
                h.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_aborts_pending_tasks() {
        let scheduler = TaskScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        scheduler.schedule(TimerKey::ConditioningAutoStop, Duration::from_secs(1), async move {
            h.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(scheduler.pending_count(), 1);
        scheduler.cancel_all();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending_count(), 0);
        assert!(!scheduler.cancel(TimerKey::ConditioningAutoStop));
    }
}
