//! Page routing for redirect targets
//!
//! The server answers rate/compare with a redirect; the client follows it
//! without interpreting it further. A terminal front end still has to know
//! which controllers the new page needs, so targets are mapped back onto the
//! server's page layout here.

use geli_common::MediaType;
use reqwest::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// `/{media}/` - ranked list with remove controls
    Rankings(MediaType),
    /// `/{media}/search`
    Search(MediaType),
    /// `/{media}/compare` - one comparison round
    Compare(MediaType),
    /// Anything this client does not render
    External(String),
}

impl Page {
    /// Map a redirect target (absolute or relative) onto a page
    pub fn resolve(base: &Url, target: &str) -> Page {
        let Ok(url) = base.join(target) else {
            return Page::External(target.to_string());
        };
        if url.scheme() != base.scheme()
            || url.host_str() != base.host_str()
            || url.port_or_known_default() != base.port_or_known_default()
        {
            return Page::External(url.to_string());
        }
        let Some(rest) = url.path().strip_prefix(base.path()) else {
            return Page::External(url.to_string());
        };

        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        // Server root redirects to the default catalog
        let Some(first) = segments.first() else {
            return Page::Rankings(MediaType::default());
        };
        let Ok(media) = first.parse::<MediaType>() else {
            return Page::External(url.to_string());
        };

        match segments.get(1).copied() {
            None => Page::Rankings(media),
            Some("search") => Page::Search(media),
            Some("compare") => Page::Compare(media),
            Some(_) => Page::External(url.to_string()),
        }
    }

    pub fn media(&self) -> Option<MediaType> {
        match self {
            Page::Rankings(m) | Page::Search(m) | Page::Compare(m) => Some(*m),
            Page::External(_) => None,
        }
    }

    /// Path of the page relative to the server base
    pub fn path(&self) -> String {
        match self {
            Page::Rankings(m) => format!("{}/", m.as_path_segment()),
            Page::Search(m) => format!("{}/search", m.as_path_segment()),
            Page::Compare(m) => format!("{}/compare", m.as_path_segment()),
            Page::External(url) => url.clone(),
        }
    }
}
