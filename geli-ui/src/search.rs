//! Search controller
//!
//! Debounced query-to-results pipeline. Each keystroke restarts the quiet
//! period timer; once it fires the lookup runs to completion. Responses are
//! tagged with the generation of the input that produced them and dropped if
//! any input arrived since, so a slow response never overwrites a fresher
//! view (or resurrects results after the box was cleared).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use geli_common::api::{ExternalId, Item, SearchReply};
use geli_common::events::{EventBus, UiEvent};
use geli_common::view::{ResultCard, SearchView};
use geli_common::{MediaType, Result};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::lock;
use crate::transport::RatingApi;

/// Quiet period after the most recent keystroke
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(350);

/// Queries shorter than this (after trimming) never reach the server
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Default)]
struct SearchInner {
    generation: u64,
    debounce_timer: Option<JoinHandle<()>>,
    loading: bool,
    cards: Vec<ResultCard>,
}

pub struct SearchController {
    api: Arc<dyn RatingApi>,
    media: MediaType,
    bus: EventBus,
    debounce: Duration,
    inner: Arc<Mutex<SearchInner>>,
}

impl SearchController {
    pub fn new(api: Arc<dyn RatingApi>, media: MediaType, bus: EventBus, debounce: Duration) -> Self {
        Self {
            api,
            media,
            bus,
            debounce,
            inner: Arc::new(Mutex::new(SearchInner::default())),
        }
    }

    pub fn media(&self) -> MediaType {
        self.media
    }

    /// Handle the full text of the search box after a keystroke
    pub fn input(&self, raw: &str) {
        let query = raw.trim().to_string();
        let mut inner = lock(&self.inner);

        inner.generation += 1;
        let generation = inner.generation;
        if let Some(timer) = inner.debounce_timer.take() {
            timer.abort();
        }

        if query.chars().count() < MIN_QUERY_CHARS {
            inner.cards.clear();
            inner.loading = false;
            self.bus.emit_lossy(UiEvent::SearchLoading { active: false });
            self.bus.emit_lossy(UiEvent::SearchResults {
                view: SearchView::Cleared,
            });
            return;
        }

        if !inner.loading {
            inner.loading = true;
            self.bus.emit_lossy(UiEvent::SearchLoading { active: true });
        }

        let api = Arc::clone(&self.api);
        let shared = Arc::clone(&self.inner);
        let bus = self.bus.clone();
        let media = self.media;
        let debounce = self.debounce;
        inner.debounce_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            // Detached: a keystroke from here on only invalidates the response
            tokio::spawn(async move {
                debug!(query = %query, generation, "Search request sent");
                let reply = api.search(media, &query).await;
                settle(&shared, &bus, generation, &query, reply);
            });
        }));
    }

    /// Item behind an interactive card, looked up by identity
    ///
    /// Returns `None` for unknown ids and for already-ranked items, which
    /// must never open the rating modal.
    pub fn activate(&self, external_id: &ExternalId) -> Option<Item> {
        lock(&self.inner)
            .cards
            .iter()
            .find(|card| card.external_id() == external_id)
            .filter(|card| card.interactive())
            .map(|card| card.item.clone())
    }

    /// Current cards in display order
    pub fn cards(&self) -> Vec<ResultCard> {
        lock(&self.inner).cards.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.inner).loading
    }
}

fn settle(
    inner: &Mutex<SearchInner>,
    bus: &EventBus,
    generation: u64,
    query: &str,
    reply: Result<SearchReply>,
) {
    let mut inner = lock(inner);
    if inner.generation != generation {
        debug!(
            query = %query,
            generation,
            latest = inner.generation,
            "Discarding stale search response"
        );
        return;
    }

    inner.debounce_timer = None;
    inner.loading = false;
    bus.emit_lossy(UiEvent::SearchLoading { active: false });

    let view = match reply {
        Ok(SearchReply::Items(items)) if items.is_empty() => SearchView::NoResults,
        Ok(SearchReply::Items(items)) => {
            SearchView::Cards(items.into_iter().map(ResultCard::new).collect())
        }
        Ok(SearchReply::Error { error }) => {
            warn!(query = %query, error = %error, "Search rejected by server");
            SearchView::Error(error)
        }
        Err(e) => {
            warn!(query = %query, "Search failed: {}", e);
            SearchView::Failed
        }
    };

    inner.cards = match &view {
        SearchView::Cards(cards) => cards.clone(),
        _ => Vec::new(),
    };
    debug!(query = %query, results = inner.cards.len(), "Search settled");
    bus.emit_lossy(UiEvent::SearchResults { view });
}
