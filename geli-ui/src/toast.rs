//! Toast notifier
//!
//! At most one toast is visible. State machine:
//!
//! ```text
//! Idle --show--> Showing(id, expires_at) --timer--> Idle
//!                Showing(id) --show--> Showing(id + 1)   (old timer cancelled)
//! ```
//!
//! Cloning the notifier shares the same surface; controllers hold clones.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use geli_common::events::{EventBus, UiEvent};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::lock;

/// Default display duration
pub const TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Prefix for server-reported errors
pub const APP_ERROR_PREFIX: &str = "⚠️ ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastState {
    Idle,
    Showing {
        id: u64,
        message: String,
        expires_at: Instant,
    },
}

struct ToastInner {
    state: ToastState,
    next_id: u64,
    hide_timer: Option<JoinHandle<()>>,
}

#[derive(Clone)]
pub struct ToastNotifier {
    bus: EventBus,
    duration: Duration,
    inner: Arc<Mutex<ToastInner>>,
}

impl ToastNotifier {
    pub fn new(bus: EventBus, duration: Duration) -> Self {
        Self {
            bus,
            duration,
            inner: Arc::new(Mutex::new(ToastInner {
                state: ToastState::Idle,
                next_id: 1,
                hide_timer: None,
            })),
        }
    }

    /// Show `message`, replacing any visible toast
    ///
    /// Must be called from within a tokio runtime (the hide timer is a task).
    pub fn show(&self, message: impl Into<String>) -> u64 {
        let message = message.into();
        let mut inner = lock(&self.inner);

        if let ToastState::Showing { id, .. } = inner.state {
            self.bus.emit_lossy(UiEvent::ToastDismissed { id });
        }
        if let Some(timer) = inner.hide_timer.take() {
            timer.abort();
        }

        let id = inner.next_id;
        inner.next_id += 1;
        inner.state = ToastState::Showing {
            id,
            message: message.clone(),
            expires_at: Instant::now() + self.duration,
        };
        debug!(id, message = %message, "Toast shown");
        self.bus.emit_lossy(UiEvent::ToastShown { id, message });

        let shared = Arc::clone(&self.inner);
        let bus = self.bus.clone();
        let duration = self.duration;
        inner.hide_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut inner = lock(&shared);
            if matches!(inner.state, ToastState::Showing { id: current, .. } if current == id) {
                inner.state = ToastState::Idle;
                inner.hide_timer = None;
                bus.emit_lossy(UiEvent::ToastDismissed { id });
            }
        }));

        id
    }

    /// Server-reported error, shown verbatim behind a warning sign
    pub fn show_app_error(&self, message: &str) -> u64 {
        self.show(format!("{}{}", APP_ERROR_PREFIX, message))
    }

    pub fn state(&self) -> ToastState {
        lock(&self.inner).state.clone()
    }

    /// Message of the visible toast, if any
    pub fn current(&self) -> Option<String> {
        match &lock(&self.inner).state {
            ToastState::Showing { message, .. } => Some(message.clone()),
            ToastState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::drain;

    #[tokio::test(start_paused = true)]
    async fn test_toast_auto_dismisses() {
        let bus = EventBus::new(32);
        let mut rx = bus.subscribe();
        let toast = ToastNotifier::new(bus, TOAST_DURATION);

        let id = toast.show("Removed \"Zelda\"");
        assert_eq!(toast.current().as_deref(), Some("Removed \"Zelda\""));

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert!(toast.current().is_some());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(toast.state(), ToastState::Idle);

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                UiEvent::ToastShown {
                    id,
                    message: "Removed \"Zelda\"".to_string()
                },
                UiEvent::ToastDismissed { id },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_newest_toast_replaces_oldest() {
        let bus = EventBus::new(32);
        let mut rx = bus.subscribe();
        let toast = ToastNotifier::new(bus, TOAST_DURATION);

        let first = toast.show("first");
        tokio::time::sleep(Duration::from_millis(2000)).await;
        let second = toast.show("second");
        assert_eq!(toast.current().as_deref(), Some("second"));

        // The first toast's timer would have fired here; it was cancelled
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(toast.current().as_deref(), Some("second"));

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(toast.current(), None);

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                UiEvent::ToastShown {
                    id: first,
                    message: "first".to_string()
                },
                UiEvent::ToastDismissed { id: first },
                UiEvent::ToastShown {
                    id: second,
                    message: "second".to_string()
                },
                UiEvent::ToastDismissed { id: second },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_app_error_prefix() {
        let toast = ToastNotifier::new(EventBus::new(8), TOAST_DURATION);
        toast.show_app_error("Already rated");
        assert_eq!(toast.current().as_deref(), Some("⚠️ Already rated"));
    }
}
