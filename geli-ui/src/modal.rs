//! Rating modal controller
//!
//! Owns the [`RatingSession`]: the item picked from search and the tier
//! being submitted. `close` is the only way to abandon a session.

use std::sync::{Arc, Mutex};

use geli_common::api::{ActionReply, Item, Tier};
use geli_common::events::{EventBus, UiEvent};
use geli_common::view::ItemPreview;
use geli_common::{Error, MediaType, Result};
use tracing::{debug, info, warn};

use crate::lock;
use crate::toast::ToastNotifier;
use crate::transport::RatingApi;

/// User actions that dismiss the modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissTrigger {
    CloseControl,
    OutsideClick,
    CancelKey,
}

/// Item being rated and the tier submitted for it
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSession {
    item: Item,
    tier: Option<Tier>,
}

impl RatingSession {
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Tier of the submission in flight, if any
    pub fn tier(&self) -> Option<Tier> {
        self.tier
    }
}

struct ModalInner {
    session: Option<RatingSession>,
    // Bumped on open/close so a response for an abandoned session cannot
    // touch a newer one
    session_seq: u64,
    submitting: bool,
}

pub struct RatingModal {
    api: Arc<dyn RatingApi>,
    media: MediaType,
    bus: EventBus,
    toast: ToastNotifier,
    inner: Arc<Mutex<ModalInner>>,
}

impl RatingModal {
    pub fn new(api: Arc<dyn RatingApi>, media: MediaType, bus: EventBus, toast: ToastNotifier) -> Self {
        Self {
            api,
            media,
            bus,
            toast,
            inner: Arc::new(Mutex::new(ModalInner {
                session: None,
                session_seq: 0,
                submitting: false,
            })),
        }
    }

    /// Start a session for `item` and show its preview
    ///
    /// Already-ranked items are a caller bug; search never offers them.
    pub fn open(&self, item: Item) -> Result<()> {
        if item.already_ranked {
            return Err(Error::Precondition(format!(
                "\"{}\" is already ranked",
                item.name
            )));
        }

        let preview = ItemPreview::from_item(&item);
        let mut inner = lock(&self.inner);
        inner.session_seq += 1;
        debug!(external_id = %item.external_id, name = %item.name, "Rating modal opened");
        inner.session = Some(RatingSession { item, tier: None });

        self.bus.emit_lossy(UiEvent::ModalOpened { preview });
        // A request from an abandoned session keeps the controls locked
        // until it settles
        self.bus.emit_lossy(UiEvent::TierControls {
            enabled: !inner.submitting,
        });
        Ok(())
    }

    /// Hide the modal and drop the session
    pub fn close(&self) {
        let mut inner = lock(&self.inner);
        inner.session_seq += 1;
        if inner.session.take().is_some() {
            debug!("Rating modal closed");
        }
        self.bus.emit_lossy(UiEvent::ModalClosed);
    }

    pub fn dismiss(&self, trigger: DismissTrigger) {
        debug!(?trigger, "Rating modal dismissed");
        self.close();
    }

    pub fn session(&self) -> Option<RatingSession> {
        lock(&self.inner).session.clone()
    }

    pub fn is_open(&self) -> bool {
        lock(&self.inner).session.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        lock(&self.inner).submitting
    }

    /// Send the selected item with `tier` and follow the server's redirect
    ///
    /// Tier controls stay disabled for the whole request. On failure they
    /// are re-enabled and the session kept, so the user can retry or pick
    /// another tier. Returns the redirect URL on success, and `Busy` while
    /// any submission is in flight, even one from a session since closed.
    pub async fn submit_tier(&self, tier: Tier) -> Result<String> {
        let (item, seq) = {
            let mut inner = lock(&self.inner);
            if inner.submitting {
                return Err(Error::Busy("tier submission in flight"));
            }
            let seq = inner.session_seq;
            let Some(session) = inner.session.as_mut() else {
                return Err(Error::Precondition("no item selected".to_string()));
            };
            session.tier = Some(tier);
            let item = session.item.clone();
            inner.submitting = true;
            self.bus.emit_lossy(UiEvent::TierControls { enabled: false });
            (item, seq)
        };

        info!(external_id = %item.external_id, tier = %tier, "Submitting tier");
        match self.api.rate(self.media, &item, tier).await {
            Ok(ActionReply::Redirect(url)) => {
                {
                    let mut inner = lock(&self.inner);
                    inner.submitting = false;
                    if inner.session_seq == seq {
                        inner.session = None;
                        self.bus.emit_lossy(UiEvent::ModalClosed);
                    }
                }
                info!(url = %url, "Tier accepted, navigating");
                self.bus.emit_lossy(UiEvent::Navigate { url: url.clone() });
                Ok(url)
            }
            Ok(ActionReply::Error(message)) => {
                warn!(error = %message, "Tier rejected by server");
                self.toast.show_app_error(&message);
                self.recover(seq);
                Err(Error::Application(message))
            }
            Err(e) => {
                warn!("Tier submission failed: {}", e);
                self.toast.show(format!(
                    "Failed to rate {}. Please try again.",
                    self.media.singular().to_lowercase()
                ));
                self.recover(seq);
                Err(e)
            }
        }
    }

    /// Release the submission lock after a failed request
    ///
    /// The session that sent the request keeps its item for a retry. A
    /// session opened while the request was in flight gets its controls
    /// back; a closed one stays closed.
    fn recover(&self, seq: u64) {
        let mut inner = lock(&self.inner);
        inner.submitting = false;
        let current = inner.session_seq == seq;
        let Some(session) = inner.session.as_mut() else {
            return;
        };
        if current {
            session.tier = None;
        }
        self.bus.emit_lossy(UiEvent::TierControls { enabled: true });
    }
}
