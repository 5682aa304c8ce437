//! Removal controller
//!
//! Removes an already-ranked item after interactive confirmation. Nothing is
//! removed from view optimistically: a successful removal reloads the view
//! after a short delay so the confirmation toast is seen first.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use geli_common::api::ExternalId;
use geli_common::events::{EventBus, UiEvent};
use geli_common::{Error, MediaType, Result};
use tracing::{info, warn};

use crate::toast::ToastNotifier;
use crate::transport::RatingApi;

/// Delay between the success toast and the reload
pub const RELOAD_DELAY: Duration = Duration::from_millis(500);

/// Interactive yes/no prompt
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// User said no; no request was sent
    Declined,
    /// Server acknowledged; reload scheduled
    Removed,
}

pub struct RemovalController {
    api: Arc<dyn RatingApi>,
    media: MediaType,
    bus: EventBus,
    toast: ToastNotifier,
    reload_delay: Duration,
}

impl RemovalController {
    pub fn new(
        api: Arc<dyn RatingApi>,
        media: MediaType,
        bus: EventBus,
        toast: ToastNotifier,
        reload_delay: Duration,
    ) -> Self {
        Self {
            api,
            media,
            bus,
            toast,
            reload_delay,
        }
    }

    pub async fn remove(
        &self,
        external_id: &ExternalId,
        name: &str,
        confirm: &dyn Confirm,
    ) -> Result<RemovalOutcome> {
        let prompt = format!("Remove \"{}\" from your rankings?", name);
        if !confirm.confirm(&prompt).await {
            return Ok(RemovalOutcome::Declined);
        }

        let failure = match self.api.remove(self.media, external_id).await {
            Ok(reply) if reply.is_ok() => {
                info!(external_id = %external_id, name = %name, "Item removed");
                self.toast.show(format!("Removed \"{}\"", name));

                let bus = self.bus.clone();
                let delay = self.reload_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    bus.emit_lossy(UiEvent::Reload);
                });
                return Ok(RemovalOutcome::Removed);
            }
            Ok(reply) => {
                let status = reply.status.unwrap_or_else(|| "missing".to_string());
                warn!(external_id = %external_id, status = %status, "Removal not acknowledged");
                Error::Application(format!("unexpected status: {}", status))
            }
            Err(e) => {
                warn!(external_id = %external_id, "Removal failed: {}", e);
                e
            }
        };

        self.toast.show(format!(
            "Failed to remove {}.",
            self.media.singular().to_lowercase()
        ));
        Err(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock;
    use crate::testing::{drain, Call, FakeApi, Outcome};
    use crate::toast::TOAST_DURATION;
    use geli_common::api::RemoveReply;
    use std::sync::Mutex;
    use tokio::sync::broadcast::Receiver;

    struct ScriptedConfirm {
        answer: bool,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedConfirm {
        fn new(answer: bool) -> Self {
            Self {
                answer,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Confirm for ScriptedConfirm {
        async fn confirm(&self, prompt: &str) -> bool {
            lock(&self.prompts).push(prompt.to_string());
            self.answer
        }
    }

    fn setup() -> (Arc<FakeApi>, RemovalController, ToastNotifier, Receiver<UiEvent>) {
        let api = Arc::new(FakeApi::new());
        let bus = EventBus::new(64);
        let rx = bus.subscribe();
        let toast = ToastNotifier::new(bus.clone(), TOAST_DURATION);
        let removal =
            RemovalController::new(api.clone(), MediaType::Books, bus, toast.clone(), RELOAD_DELAY);
        (api, removal, toast, rx)
    }

    fn ok_reply() -> Outcome<RemoveReply> {
        Outcome::Reply(RemoveReply {
            status: Some("ok".to_string()),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_declined_confirmation_sends_nothing() {
        let (api, removal, toast, _rx) = setup();
        let confirm = ScriptedConfirm::new(false);
        let id = ExternalId::Text("OL27448W".to_string());

        let outcome = removal.remove(&id, "Dune", &confirm).await.unwrap();
        assert_eq!(outcome, RemovalOutcome::Declined);
        assert!(api.calls().is_empty());
        assert_eq!(toast.current(), None);
        assert_eq!(
            *lock(&confirm.prompts),
            vec!["Remove \"Dune\" from your rankings?".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_toasts_then_reloads_after_delay() {
        let (api, removal, toast, mut rx) = setup();
        api.push_remove(Duration::ZERO, ok_reply());
        let id = ExternalId::Text("OL27448W".to_string());

        let outcome = removal
            .remove(&id, "Dune", &ScriptedConfirm::new(true))
            .await
            .unwrap();
        assert_eq!(outcome, RemovalOutcome::Removed);
        assert_eq!(api.calls(), vec![Call::Remove(id)]);
        assert_eq!(toast.current().as_deref(), Some("Removed \"Dune\""));

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(!drain(&mut rx).contains(&UiEvent::Reload));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(drain(&mut rx), vec![UiEvent::Reload]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unacknowledged_status_is_failure() {
        let (api, removal, toast, mut rx) = setup();
        api.push_remove(
            Duration::ZERO,
            Outcome::Reply(RemoveReply {
                status: Some("error".to_string()),
            }),
        );

        let result = removal
            .remove(&ExternalId::Number(5), "Dune", &ScriptedConfirm::new(true))
            .await;
        assert!(matches!(result, Err(Error::Application(_))));
        assert_eq!(toast.current().as_deref(), Some("Failed to remove book."));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(!drain(&mut rx).contains(&UiEvent::Reload));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_shows_generic_toast() {
        let (api, removal, toast, _rx) = setup();
        api.push_remove(Duration::ZERO, Outcome::Network("refused".to_string()));

        let result = removal
            .remove(&ExternalId::Number(5), "Dune", &ScriptedConfirm::new(true))
            .await;
        assert!(result.unwrap_err().is_transport());
        assert_eq!(toast.current().as_deref(), Some("Failed to remove book."));
    }
}
