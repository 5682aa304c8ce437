//! Comparison round controller
//!
//! One instance per comparison page. The server has already chosen the pair
//! (challenger vs. incumbent) and tracks loop progress in its session; the
//! client only answers. Each round accepts exactly one successful answer:
//! the redirect that follows leads to a fresh page, and so a fresh round.
//!
//! The challenger is the item picked in the rating modal and stays the same
//! for the whole loop. The incumbent is only known to the server.

use std::sync::{Arc, Mutex};

use geli_common::api::{ActionReply, Answer, Item};
use geli_common::events::{EventBus, UiEvent};
use geli_common::view::{ItemPreview, Side};
use geli_common::{Error, MediaType, Result};
use tracing::{info, warn};

use crate::lock;
use crate::toast::ToastNotifier;
use crate::transport::RatingApi;

pub const COMPARE_FAILED_MESSAGE: &str = "Comparison failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Waiting for the user to pick a side
    Pending,
    /// Answer sent; cards locked
    Submitting(Answer),
    /// Server acknowledged the answer
    Closed,
}

pub struct ComparisonRound {
    api: Arc<dyn RatingApi>,
    media: MediaType,
    bus: EventBus,
    toast: ToastNotifier,
    challenger: Option<Item>,
    state: Mutex<RoundState>,
}

impl ComparisonRound {
    /// `challenger` is `None` when the page was reached without rating an
    /// item in this client (e.g. a reload of the comparison page)
    pub fn new(
        api: Arc<dyn RatingApi>,
        media: MediaType,
        bus: EventBus,
        toast: ToastNotifier,
        challenger: Option<Item>,
    ) -> Self {
        Self {
            api,
            media,
            bus,
            toast,
            challenger,
            state: Mutex::new(RoundState::Pending),
        }
    }

    pub fn challenger(&self) -> Option<&Item> {
        self.challenger.as_ref()
    }

    /// Publish the comparison prompt for this round
    pub fn announce(&self) {
        self.bus.emit_lossy(UiEvent::ComparisonReady {
            challenger: self.challenger.as_ref().map(ItemPreview::from_item),
        });
    }

    pub fn state(&self) -> RoundState {
        *lock(&self.state)
    }

    /// Answer the round and follow the server's redirect
    ///
    /// Both cards are locked and the clicked side marked before the request
    /// goes out. Exactly one of two things happens afterwards: navigation
    /// (round closed) or a toast with cards unlocked and the mark removed
    /// (round pending again).
    pub async fn submit(&self, answer: Answer) -> Result<String> {
        {
            let mut state = lock(&self.state);
            match *state {
                RoundState::Submitting(_) => {
                    return Err(Error::Busy("comparison answer in flight"));
                }
                RoundState::Closed => {
                    return Err(Error::Precondition(
                        "comparison round already answered".to_string(),
                    ));
                }
                RoundState::Pending => {}
            }
            *state = RoundState::Submitting(answer);
            self.bus.emit_lossy(UiEvent::ComparisonLock {
                locked: true,
                selected: Some(Side::from(answer)),
            });
        }

        info!(answer = %answer, "Submitting comparison answer");
        let failure = match self.api.compare(self.media, answer).await {
            Ok(ActionReply::Redirect(url)) => {
                *lock(&self.state) = RoundState::Closed;
                info!(url = %url, "Comparison acknowledged, navigating");
                self.bus.emit_lossy(UiEvent::Navigate { url: url.clone() });
                return Ok(url);
            }
            Ok(ActionReply::Error(message)) => {
                warn!(error = %message, "Comparison rejected by server");
                self.toast.show_app_error(&message);
                Error::Application(message)
            }
            Err(e) => {
                warn!("Comparison submission failed: {}", e);
                self.toast.show(COMPARE_FAILED_MESSAGE);
                e
            }
        };

        *lock(&self.state) = RoundState::Pending;
        self.bus.emit_lossy(UiEvent::ComparisonLock {
            locked: false,
            selected: None,
        });
        Err(failure)
    }
}
