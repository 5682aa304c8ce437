//! View models published to renderers
//!
//! Renderers receive these through [`crate::events::UiEvent`]. Cards are
//! keyed by `external_id`; activating one is an identity lookup in the search
//! controller, so item data never travels through markup attributes.

use serde::Serialize;

use crate::api::{Answer, ExternalId, Item};
use crate::format::{escape_attr, escape_html, meta_line};
use crate::MediaType;

pub const NO_RESULTS_MESSAGE: &str = "No results found. Try a different search.";
pub const SEARCH_FAILED_MESSAGE: &str = "Search failed. Please try again.";

/// Badge in the corner of a search result card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Badge {
    Rate,
    AlreadyRanked,
}

impl Badge {
    pub fn text(&self) -> &'static str {
        match self {
            Badge::Rate => "+ Rate",
            Badge::AlreadyRanked => "Already Ranked",
        }
    }
}

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCard {
    pub item: Item,
    pub badge: Badge,
}

impl ResultCard {
    pub fn new(item: Item) -> Self {
        let badge = if item.already_ranked {
            Badge::AlreadyRanked
        } else {
            Badge::Rate
        };
        Self { item, badge }
    }

    /// Only unranked items can be clicked to open the rating modal
    pub fn interactive(&self) -> bool {
        self.badge == Badge::Rate
    }

    pub fn external_id(&self) -> &ExternalId {
        &self.item.external_id
    }

    /// HTML fragment for browser-style renderers
    pub fn markup(&self, media: MediaType) -> String {
        let item = &self.item;
        let class = if self.interactive() {
            "search-result-card"
        } else {
            "search-result-card already-ranked"
        };
        let cover = match item.cover_url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => format!(
                r#"<img src="{}" alt="{}" loading="lazy">"#,
                escape_attr(url),
                escape_attr(&item.name)
            ),
            None => format!(r#"<div class="no-cover">{}</div>"#, media.emoji()),
        };
        format!(
            concat!(
                r#"<div class="{}" data-external-id="{}">"#,
                r#"<div class="search-result-cover">{}</div>"#,
                r#"<div class="search-result-info">"#,
                r#"<div class="search-result-title">{}</div>"#,
                r#"<div class="search-result-meta">{}</div>"#,
                r#"</div>"#,
                r#"<span class="search-result-badge">{}</span>"#,
                r#"</div>"#
            ),
            class,
            escape_attr(&item.external_id.to_string()),
            cover,
            escape_html(&item.name),
            escape_html(&meta_line(item)),
            self.badge.text(),
        )
    }
}

/// Content of the search results area
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data")]
pub enum SearchView {
    /// Query too short; nothing shown
    Cleared,
    /// Transport or parse failure
    Failed,
    /// Server-reported error message
    Error(String),
    NoResults,
    Cards(Vec<ResultCard>),
}

impl SearchView {
    /// Message line for non-card views
    pub fn message(&self) -> Option<String> {
        match self {
            SearchView::Cleared | SearchView::Cards(_) => None,
            SearchView::Failed => Some(SEARCH_FAILED_MESSAGE.to_string()),
            SearchView::Error(msg) => Some(format!("Error: {}", msg)),
            SearchView::NoResults => Some(NO_RESULTS_MESSAGE.to_string()),
        }
    }
}

/// Read-only preview in the rating modal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPreview {
    pub cover_url: Option<String>,
    pub title: String,
    pub meta: String,
    pub summary: String,
}

impl ItemPreview {
    pub fn from_item(item: &Item) -> Self {
        Self {
            cover_url: item.cover_url.clone().filter(|u| !u.is_empty()),
            title: item.name.clone(),
            meta: meta_line(item),
            summary: item.summary.clone().unwrap_or_default(),
        }
    }
}

/// Card on the comparison page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    /// The item being placed
    Challenger,
    /// The already-ranked item it is compared against
    Incumbent,
}

impl From<Answer> for Side {
    /// "better" is a click on the challenger card, "worse" on the incumbent
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Better => Side::Challenger,
            Answer::Worse => Side::Incumbent,
        }
    }
}
