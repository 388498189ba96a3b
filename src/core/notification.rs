//! Transient success/error banner with auto-dismiss
//!
//! At most one notification is live. Showing a new one aborts the pending
//! auto-hide timer of the previous one and starts its own.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_SUCCESS_DISMISS: Duration = Duration::from_secs(3);
pub const DEFAULT_ERROR_DISMISS: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

#[derive(Default)]
struct Slot {
    current: Option<Notification>,
    /// Bumped on every show/dismiss so a late timer never hides a newer banner
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Owner of the single live notification
#[derive(Clone)]
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
    success_delay: Duration,
    error_delay: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_SUCCESS_DISMISS, DEFAULT_ERROR_DISMISS)
    }
}

impl Notifier {
    pub fn new(success_delay: Duration, error_delay: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            success_delay,
            error_delay,
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(NotificationKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(NotificationKind::Error, message.into());
    }

    /// Make a notification visible, replacing any current one
    ///
    /// Auto-dismiss needs a tokio runtime; outside one the banner stays
    /// until [`Notifier::dismiss`] is called.
    pub fn show(&self, kind: NotificationKind, message: String) {
        let delay = match kind {
            NotificationKind::Success => self.success_delay,
            NotificationKind::Error => self.error_delay,
        };

        let mut slot = self.lock();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation += 1;
        slot.current = Some(Notification { kind, message });

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let generation = slot.generation;
            let shared = Arc::clone(&self.slot);
            slot.timer = Some(handle.spawn(async move {
                tokio::time::sleep(delay).await;
                let mut slot = shared.lock().unwrap_or_else(|e| e.into_inner());
                if slot.generation == generation {
                    slot.current = None;
                    slot.timer = None;
                }
            }));
        }
    }

    /// Hide the current notification immediately
    pub fn dismiss(&self) {
        let mut slot = self.lock();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation += 1;
        slot.current = None;
    }

    pub fn current(&self) -> Option<Notification> {
        self.lock().current.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.lock().current.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}
