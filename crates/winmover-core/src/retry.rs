//! Keyed, cancellable retry timers.
//!
//! A target that is not running yet (the application is still launching)
//! is retried on a fixed period until it appears or the attempt budget is
//! spent. At most one retry is in flight per key: scheduling a key that
//! already has a pending retry is refused.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

/// Period between retries.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(5);

struct Slot {
    id: u64,
    cancel: mpsc::Sender<()>,
}

#[derive(Default)]
struct Slots {
    map: Mutex<HashMap<String, Slot>>,
    changed: Condvar,
}

impl Slots {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes the slot for `key` only if it still belongs to timer `id`.
    fn release(&self, key: &str, id: u64) {
        let mut map = self.lock();
        if map.get(key).is_some_and(|s| s.id == id) {
            map.remove(key);
        }
        self.changed.notify_all();
    }
}

/// Runs delayed retry tasks, one per key.
pub struct RetryScheduler {
    interval: Duration,
    slots: Arc<Slots>,
    next_id: AtomicU64,
}

impl Default for RetryScheduler {
    fn default() -> Self {
        Self::new(RETRY_INTERVAL)
    }
}

impl RetryScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            slots: Arc::new(Slots::default()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_scheduled(&self, key: &str) -> bool {
        self.slots.lock().contains_key(key)
    }

    /// Starts a retry timer for `key`.
    ///
    /// Every tick spends one attempt; the tick that spends the last one
    /// stops the timer without running `task`, so a budget of `n` gives
    /// `n - 1` retries after the initial attempt. The timer also stops as
    /// soon as `task` reports a non-zero match count.
    ///
    /// Returns `false` without scheduling when the budget is zero or a
    /// retry for `key` is already pending.
    pub fn schedule<F>(&self, key: &str, attempts: u32, task: F) -> bool
    where
        F: Fn() -> usize + Send + 'static,
    {
        if attempts == 0 {
            return false;
        }

        let mut map = self.slots.lock();
        if map.contains_key(key) {
            debug!("retry for {key} already pending");
            return false;
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (cancel, cancelled) = mpsc::channel();
        map.insert(key.to_string(), Slot { id, cancel });
        drop(map);

        let slots = self.slots.clone();
        let interval = self.interval;
        let key = key.to_string();
        thread::spawn(move || {
            let mut remaining = attempts;
            loop {
                match cancelled.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    // Cancelled: the slot was already released.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                }

                remaining -= 1;
                if remaining == 0 {
                    info!("retry budget for {key} exhausted");
                    break;
                }

                debug!("retrying {key} ({remaining} attempts left)");
                if task() > 0 {
                    break;
                }
            }
            slots.release(&key, id);
        });

        true
    }

    /// Stops the pending retry for `key`, if any.
    pub fn cancel(&self, key: &str) -> bool {
        let removed = self.slots.lock().remove(key);
        self.slots.changed.notify_all();
        match removed {
            Some(slot) => {
                let _ = slot.cancel.send(());
                debug!("cancelled retry for {key}");
                true
            }
            None => false,
        }
    }

    /// Blocks until no retry is pending for `key`.
    pub fn wait(&self, key: &str) {
        let map = self.slots.lock();
        let _map = self
            .slots
            .changed
            .wait_while(map, |m| m.contains_key(key))
            .unwrap_or_else(PoisonError::into_inner);
    }
}

impl Drop for RetryScheduler {
    fn drop(&mut self) {
        for (_, slot) in self.slots.lock().drain() {
            let _ = slot.cancel.send(());
        }
        self.slots.changed.notify_all();
    }
}
