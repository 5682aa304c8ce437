//! Terminal rendering of UI events
//!
//! Text for interactive use, or one JSON object per line for front ends
//! that drive the client over a pipe.

use geli_common::events::UiEvent;
use geli_common::format::META_SEPARATOR;
use geli_common::view::{ResultCard, SearchView, Side};
use geli_common::MediaType;

/// Text for one event, or `None` when the event has no terminal echo
pub fn render(event: &UiEvent, media: MediaType) -> Option<String> {
    match event {
        UiEvent::SearchLoading { active: true } => Some("… searching".to_string()),
        UiEvent::SearchLoading { active: false } => None,
        UiEvent::SearchResults { view } => render_results(view, media),
        UiEvent::ModalOpened { preview } => {
            let mut out = format!("── Rate {}: {}", media.singular(), preview.title);
            if !preview.meta.is_empty() {
                out.push_str(&format!("\n   {}", preview.meta));
            }
            if !preview.summary.is_empty() {
                out.push_str(&format!("\n   {}", preview.summary));
            }
            out.push_str("\n   like | neutral | dislike   (close / esc to cancel)");
            Some(out)
        }
        UiEvent::ModalClosed => None,
        UiEvent::TierControls { enabled: false } => Some("   submitting…".to_string()),
        UiEvent::TierControls { enabled: true } => None,
        UiEvent::ComparisonReady { challenger } => Some(format!(
            "── Which is better?\n   better = {}\n   worse  = the ranked item shown by the server",
            challenger
                .as_ref()
                .map(|preview| preview.title.as_str())
                .unwrap_or("the new item")
        )),
        UiEvent::ComparisonLock {
            locked: true,
            selected,
        } => Some(match selected {
            Some(Side::Challenger) => "   ✓ new item is better…".to_string(),
            Some(Side::Incumbent) => "   ✓ ranked item is better…".to_string(),
            None => "   …".to_string(),
        }),
        UiEvent::ComparisonLock { locked: false, .. } => None,
        UiEvent::ToastShown { message, .. } => Some(format!("» {}", message)),
        UiEvent::ToastDismissed { .. } => None,
        UiEvent::Navigate { url } => Some(format!("→ {}", url)),
        UiEvent::Reload => Some("↻ reloading".to_string()),
    }
}

/// One JSON line for `event`
///
/// Search result events also carry the HTML fragment of every card under
/// `markup`, in display order.
pub fn json_line(event: &UiEvent, media: MediaType) -> serde_json::Result<String> {
    let mut value = serde_json::to_value(event)?;
    if let UiEvent::SearchResults {
        view: SearchView::Cards(cards),
    } = event
    {
        let markup: Vec<String> = cards.iter().map(|card| card.markup(media)).collect();
        value["markup"] = serde_json::to_value(markup)?;
    }
    serde_json::to_string(&value)
}

fn render_results(view: &SearchView, media: MediaType) -> Option<String> {
    match view {
        SearchView::Cleared => None,
        SearchView::Cards(cards) => Some(
            cards
                .iter()
                .enumerate()
                .map(|(i, card)| render_card(i + 1, card, media))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        other => other.message(),
    }
}

fn render_card(number: usize, card: &ResultCard, media: MediaType) -> String {
    let meta = geli_common::format::meta_line(&card.item);
    let has_cover = card
        .item
        .cover_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .is_some();
    let cover = if has_cover {
        ""
    } else {
        media.emoji()
    };
    let mut line = format!("{:>2}. {} {}", number, cover, card.item.name);
    if !meta.is_empty() {
        line.push_str(META_SEPARATOR);
        line.push_str(&meta);
    }
    line.push_str(&format!("  [{}]", card.badge.text()));
    line
}
