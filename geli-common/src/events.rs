//! UI event types and the EventBus
//!
//! Controllers never touch a screen directly. Every visible mutation is
//! published as a [`UiEvent`]; renderers (terminal printer, tests, a future
//! web front end) subscribe and apply them.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::view::{ItemPreview, SearchView, Side};

/// Visible UI mutations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum UiEvent {
    /// Search loading indicator shown or cleared
    SearchLoading { active: bool },

    /// Search results area replaced
    SearchResults { view: SearchView },

    /// Rating modal made visible with a read-only preview
    ModalOpened { preview: ItemPreview },

    /// Rating modal hidden and its session cleared
    ModalClosed,

    /// Tier buttons enabled or disabled
    TierControls { enabled: bool },

    /// Comparison page shown for a new round
    ///
    /// `challenger` is the item being placed, when this client rated it. The
    /// incumbent stays on the server side.
    ComparisonReady { challenger: Option<ItemPreview> },

    /// Comparison cards locked or unlocked
    ///
    /// `selected` carries the optimistic "selected" mark while a submission
    /// is in flight and is `None` once it has been rolled back.
    ComparisonLock { locked: bool, selected: Option<Side> },

    /// Toast displayed; any previous toast is gone
    ToastShown { id: u64, message: String },

    /// Toast removed
    ToastDismissed { id: u64 },

    /// Full navigation to a server-provided URL
    Navigate { url: String },

    /// Reload of the current view
    Reload,
}

/// Central distribution bus for UI events
///
/// Uses tokio::broadcast internally:
/// - Non-blocking publish (slow subscribers don't block controllers)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use geli_common::events::{EventBus, UiEvent};
///
/// let bus = EventBus::new(64);
/// let mut rx = bus.subscribe();
///
/// bus.emit_lossy(UiEvent::Reload);
/// assert_eq!(rx.try_recv().unwrap(), UiEvent::Reload);
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<UiEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// A controller running without a renderer (headless use, some tests)
    /// must keep working.
    pub fn emit_lossy(&self, event: UiEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("UI event dropped: no subscribers");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
