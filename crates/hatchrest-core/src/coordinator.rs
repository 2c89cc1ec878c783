//! Fixed-interval polling coordinator for one Hatch Rest device
//!
//! The coordinator owns the device handle, refreshes its state on a fixed
//! interval with a bounded per-attempt timeout, keeps the last good snapshot
//! across failures, and fans every completed attempt out to registered
//! listeners. Refresh attempts are strictly serialized: a cycle's attempt
//! finishes before the wait for the next cycle begins, and on-demand
//! refreshes share the same gate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::CoordinatorConfig;
use crate::device::RestDevice;
use crate::errors::{HatchRestError, Result};
use crate::state::RestState;

// ----------------------------------------------------------------------------
// Failure Causes
// ----------------------------------------------------------------------------

/// Cause recorded when a refresh attempt exceeds the timeout bound
pub const TIMEOUT_FAILURE_CAUSE: &str = "Connection timed out while fetching data from device";

/// Cause recorded when the device handle reports a transport failure
pub const DEVICE_FAILURE_CAUSE: &str = "Failed getting data from device";

// ----------------------------------------------------------------------------
// Listener Fan-Out
// ----------------------------------------------------------------------------

/// Handle returned by [`RestCoordinator::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Payload delivered to listeners after every completed refresh attempt
#[derive(Debug, Clone)]
pub struct StateUpdate {
    /// Last known good snapshot; stale when the attempt failed
    pub state: Option<RestState>,
    /// Whether the attempt that produced this update succeeded
    pub success: bool,
    /// Failure cause of the attempt, if it failed
    pub error: Option<String>,
}

type UpdateListener = Arc<dyn Fn(&StateUpdate) + Send + Sync>;

// ----------------------------------------------------------------------------
// Coordinator
// ----------------------------------------------------------------------------

#[derive(Default)]
struct SnapshotSlot {
    state: Option<RestState>,
    last_success: bool,
    last_error: Option<String>,
}

struct CoordinatorInner {
    unique_id: Option<String>,
    device: Arc<dyn RestDevice>,
    config: CoordinatorConfig,
    snapshot: RwLock<SnapshotSlot>,
    listeners: RwLock<HashMap<u64, UpdateListener>>,
    next_listener_id: AtomicU64,
    /// Serializes refresh attempts across the poll loop and on-demand calls
    refresh_gate: Mutex<()>,
    stopped: AtomicBool,
}

/// Polling coordinator for one Hatch Rest device
pub struct RestCoordinator {
    inner: Arc<CoordinatorInner>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for RestCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestCoordinator")
            .field("unique_id", &self.inner.unique_id)
            .finish_non_exhaustive()
    }
}

impl RestCoordinator {
    /// Create a coordinator; call [`start`](Self::start) to begin polling.
    pub fn new(
        unique_id: Option<String>,
        device: Arc<dyn RestDevice>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                unique_id,
                device,
                config,
                snapshot: RwLock::new(SnapshotSlot {
                    last_success: true,
                    ..Default::default()
                }),
                listeners: RwLock::new(HashMap::new()),
                next_listener_id: AtomicU64::new(0),
                refresh_gate: Mutex::new(()),
                stopped: AtomicBool::new(false),
            }),
            poll_task: Mutex::new(None),
        }
    }

    /// Device handle this coordinator polls.
    pub fn device(&self) -> Arc<dyn RestDevice> {
        self.inner.device.clone()
    }

    /// Unique id of the config entry this coordinator serves.
    pub fn unique_id(&self) -> Option<&str> {
        self.inner.unique_id.as_deref()
    }

    /// Begin the repeating poll cycle. No-op while one is already running.
    ///
    /// The first cycle lands one full interval after this call; perform an
    /// explicit [`refresh_once`](Self::refresh_once) first when initial data
    /// is needed right away.
    pub async fn start(&self) {
        let mut slot = self.poll_task.lock().await;
        if slot.as_ref().map_or(false, |task| !task.is_finished()) {
            return;
        }
        self.inner.stopped.store(false, Ordering::SeqCst);

        let inner = self.inner.clone();
        info!(interval = ?inner.config.update_interval, "starting poll cycle");
        *slot = Some(tokio::spawn(async move {
            let mut ticker = interval(inner.config.update_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval's first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if inner.stopped.load(Ordering::SeqCst) {
                    break;
                }
                if let Err(err) = inner.refresh().await {
                    warn!("poll cycle failed: {err}");
                }
            }
        }));
    }

    /// Cancel the repeating poll cycle.
    ///
    /// An attempt already in flight is abandoned; no notifications fire once
    /// this returns. [`start`](Self::start) may be called again afterwards.
    pub async fn stop(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
        if let Some(task) = self.poll_task.lock().await.take() {
            task.abort();
        }
        debug!("poll cycle stopped");
    }

    /// Run one refresh attempt immediately, outside the regular cycle.
    ///
    /// Serialized against the cycle, so at most one attempt is ever in
    /// flight. Failures are classified, recorded, and fanned out exactly as
    /// in-cycle failures are; the error carries the recorded cause.
    pub async fn refresh_once(&self) -> Result<()> {
        self.inner.refresh().await
    }

    /// Last known good snapshot, or `None` before the first success.
    pub async fn current_state(&self) -> Option<RestState> {
        self.inner.snapshot.read().await.state.clone()
    }

    /// Whether the most recent refresh attempt succeeded.
    pub async fn last_update_success(&self) -> bool {
        self.inner.snapshot.read().await.last_success
    }

    /// Failure cause of the most recent attempt, if it failed.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.snapshot.read().await.last_error.clone()
    }

    /// Register a listener; it fires after every completed refresh attempt.
    pub async fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&StateUpdate) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.inner
            .listeners
            .write()
            .await
            .insert(id, Arc::new(listener));
        SubscriptionId(id)
    }

    /// Remove a previously registered listener.
    pub async fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.listeners.write().await.remove(&id.0);
    }
}

impl CoordinatorInner {
    async fn refresh(&self) -> Result<()> {
        let _gate = self.refresh_gate.lock().await;

        let cause = match timeout(self.config.refresh_timeout, self.device.refresh_data()).await {
            Ok(Ok(state)) => {
                debug!(?state, "refresh succeeded");
                let mut slot = self.snapshot.write().await;
                slot.state = Some(state);
                slot.last_success = true;
                slot.last_error = None;
                None
            }
            Ok(Err(err)) => {
                debug!("device reported refresh failure: {err}");
                Some(DEVICE_FAILURE_CAUSE)
            }
            Err(_) => Some(TIMEOUT_FAILURE_CAUSE),
        };

        if let Some(cause) = cause {
            let mut slot = self.snapshot.write().await;
            slot.last_success = false;
            slot.last_error = Some(cause.to_owned());
        }

        self.notify().await;

        match cause {
            None => Ok(()),
            Some(cause) => Err(HatchRestError::UpdateFailed {
                cause: cause.to_owned(),
            }),
        }
    }

    /// Deliver the current snapshot to every listener, in the refresh's own
    /// execution context. Suppressed after `stop`.
    async fn notify(&self) {
        if self.stopped.load(Ordering::SeqCst) {
            return;
        }

        let update = {
            let slot = self.snapshot.read().await;
            StateUpdate {
                state: slot.state.clone(),
                success: slot.last_success,
                error: slot.last_error.clone(),
            }
        };

        // Listeners run outside the lock; they may subscribe or unsubscribe
        // re-entrantly.
        let listeners: Vec<UpdateListener> =
            self.listeners.read().await.values().cloned().collect();
        for listener in listeners {
            listener(&update);
        }
    }
}
