//! Client application state
//!
//! Wires the controllers of the current page to one transport, one event
//! bus and one toast surface. Navigation replaces the page-scoped
//! controllers the way a browser replaces the page.

use std::sync::Arc;

use geli_common::api::{Answer, Item, Tier};
use geli_common::config::TimingConfig;
use geli_common::events::EventBus;
use geli_common::{Error, MediaType, Result};
use reqwest::Url;
use tracing::info;

use crate::compare::ComparisonRound;
use crate::modal::RatingModal;
use crate::page::Page;
use crate::removal::RemovalController;
use crate::search::SearchController;
use crate::toast::ToastNotifier;
use crate::transport::RatingApi;

pub struct ClientApp {
    api: Arc<dyn RatingApi>,
    base_url: Url,
    timing: TimingConfig,
    bus: EventBus,
    toast: ToastNotifier,
    page: Page,
    search: SearchController,
    modal: RatingModal,
    removal: RemovalController,
    round: Option<ComparisonRound>,
    /// Item being placed by the current comparison loop
    challenger: Option<Item>,
}

impl ClientApp {
    /// Start on the search page of `media`
    pub fn new(
        api: Arc<dyn RatingApi>,
        base_url: Url,
        media: MediaType,
        timing: TimingConfig,
        bus: EventBus,
    ) -> Self {
        let toast = ToastNotifier::new(bus.clone(), timing.toast_duration());
        let search = SearchController::new(
            Arc::clone(&api),
            media,
            bus.clone(),
            timing.search_debounce(),
        );
        let modal = RatingModal::new(Arc::clone(&api), media, bus.clone(), toast.clone());
        let removal = RemovalController::new(
            Arc::clone(&api),
            media,
            bus.clone(),
            toast.clone(),
            timing.reload_delay(),
        );

        Self {
            api,
            base_url,
            timing,
            bus,
            toast,
            page: Page::Search(media),
            search,
            modal,
            removal,
            round: None,
            challenger: None,
        }
    }

    /// Follow a redirect target and rebuild the page-scoped controllers
    pub fn navigate(&mut self, target: &str) -> &Page {
        let page = Page::resolve(&self.base_url, target);
        info!(url = %target, page = %page.path(), "Navigated");
        self.enter(page);
        &self.page
    }

    /// Jump to the search page of another catalog
    pub fn switch_media(&mut self, media: MediaType) {
        self.enter(Page::Search(media));
    }

    fn enter(&mut self, page: Page) {
        self.modal.close();
        let media = page.media().unwrap_or(self.media());

        self.search = SearchController::new(
            Arc::clone(&self.api),
            media,
            self.bus.clone(),
            self.timing.search_debounce(),
        );
        self.modal = RatingModal::new(
            Arc::clone(&self.api),
            media,
            self.bus.clone(),
            self.toast.clone(),
        );
        self.removal = RemovalController::new(
            Arc::clone(&self.api),
            media,
            self.bus.clone(),
            self.toast.clone(),
            self.timing.reload_delay(),
        );
        self.round = match page {
            Page::Compare(_) => {
                let round = ComparisonRound::new(
                    Arc::clone(&self.api),
                    media,
                    self.bus.clone(),
                    self.toast.clone(),
                    self.challenger.clone(),
                );
                round.announce();
                Some(round)
            }
            _ => {
                // Leaving the comparison pages ends the loop
                self.challenger = None;
                None
            }
        };
        self.page = page;
    }

    /// Rate the modal's item and follow the redirect
    ///
    /// The item becomes the challenger of the comparison loop that follows.
    pub async fn submit_tier(&mut self, tier: Tier) -> Result<&Page> {
        let item = self.modal.session().map(|session| session.item().clone());
        let url = self.modal.submit_tier(tier).await?;
        self.challenger = item;
        Ok(self.navigate(&url))
    }

    /// Answer the current comparison round and follow the redirect
    pub async fn answer(&mut self, answer: Answer) -> Result<&Page> {
        let Some(round) = self.round.as_ref() else {
            return Err(Error::Precondition(
                "no comparison in progress".to_string(),
            ));
        };
        let url = round.submit(answer).await?;
        Ok(self.navigate(&url))
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Catalog of the current page (last known one for external pages)
    pub fn media(&self) -> MediaType {
        self.search.media()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn toast(&self) -> &ToastNotifier {
        &self.toast
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn modal(&self) -> &RatingModal {
        &self.modal
    }

    pub fn removal(&self) -> &RemovalController {
        &self.removal
    }

    /// Present only on comparison pages
    pub fn round(&self) -> Option<&ComparisonRound> {
        self.round.as_ref()
    }

    pub fn challenger(&self) -> Option<&Item> {
        self.challenger.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::RoundState;
    use crate::testing::{drain, item, FakeApi, Outcome};
    use geli_common::api::ActionReply;
    use geli_common::events::UiEvent;
    use std::time::Duration;

    fn app(api: Arc<FakeApi>) -> ClientApp {
        ClientApp::new(
            api,
            Url::parse("http://127.0.0.1:5000/").unwrap(),
            MediaType::Games,
            TimingConfig::default(),
            EventBus::new(64),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_rating_flow_through_comparisons() {
        let api = Arc::new(FakeApi::new());
        api.push_rate(
            Duration::ZERO,
            Outcome::Reply(ActionReply::Redirect("/games/compare".to_string())),
        );
        api.push_compare(
            Duration::ZERO,
            Outcome::Reply(ActionReply::Redirect("/games/compare".to_string())),
        );
        api.push_compare(
            Duration::ZERO,
            Outcome::Reply(ActionReply::Redirect("/games/".to_string())),
        );
        let mut app = app(api.clone());
        let mut rx = app.bus().subscribe();
        assert_eq!(app.page(), &Page::Search(MediaType::Games));
        assert!(app.round().is_none());

        app.modal().open(item(1, "Zelda")).unwrap();
        assert_eq!(
            app.submit_tier(Tier::Like).await.unwrap(),
            &Page::Compare(MediaType::Games)
        );
        assert_eq!(app.challenger().map(|i| i.name.as_str()), Some("Zelda"));

        assert_eq!(
            app.answer(Answer::Better).await.unwrap(),
            &Page::Compare(MediaType::Games)
        );
        // Each comparison page gets a fresh round with the same challenger
        let round = app.round().unwrap();
        assert_eq!(round.state(), RoundState::Pending);
        assert_eq!(round.challenger().map(|i| i.name.as_str()), Some("Zelda"));

        assert_eq!(
            app.answer(Answer::Worse).await.unwrap(),
            &Page::Rankings(MediaType::Games)
        );
        assert!(app.round().is_none());
        assert!(app.challenger().is_none());
        assert_eq!(api.calls().len(), 3);

        let prompts: Vec<_> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::ComparisonReady { challenger } => challenger.map(|p| p.title),
                _ => None,
            })
            .collect();
        assert_eq!(prompts, vec!["Zelda", "Zelda"]);
    }

    #[tokio::test]
    async fn test_answer_outside_comparison_page_is_rejected() {
        let api = Arc::new(FakeApi::new());
        let mut app = app(api.clone());
        let result = app.answer(Answer::Better).await;
        assert!(matches!(result, Err(Error::Precondition(_))));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_comparison_page_without_rating_has_no_challenger() {
        let mut app = app(Arc::new(FakeApi::new()));
        app.navigate("/games/compare");
        assert!(app.round().unwrap().challenger().is_none());
    }

    #[tokio::test]
    async fn test_switch_media_drops_modal_session() {
        let mut app = app(Arc::new(FakeApi::new()));
        app.modal().open(item(1, "Zelda")).unwrap();

        app.switch_media(MediaType::Movies);
        assert_eq!(app.media(), MediaType::Movies);
        assert_eq!(app.page(), &Page::Search(MediaType::Movies));
        assert!(!app.modal().is_open());
    }
}
