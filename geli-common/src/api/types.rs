//! Shared API request/response types
//!
//! Request bodies and replies for the four server endpoints:
//!
//! | Method | Path                   | Reply                         |
//! |--------|------------------------|-------------------------------|
//! | GET    | `/{media}/api/search`  | `[Item]` or `{error}`         |
//! | POST   | `/{media}/api/rate`    | `{redirect}` or `{error}`     |
//! | POST   | `/{media}/api/compare` | `{redirect}` or `{error}`     |
//! | POST   | `/{media}/api/remove`  | `{status: "ok"}` or other     |
//!
//! Replies are parsed from the body whatever the HTTP status: the server
//! reports application errors as 4xx/5xx with an `error` field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

// ========================================
// Catalog Items
// ========================================

/// Identifier from the source catalog
///
/// IGDB and TMDB use integers, OpenLibrary uses work keys such as
/// `"OL27448W"`. The original JSON form is kept so the server sees the
/// same value it sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalId::Number(n) => write!(f, "{}", n),
            ExternalId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for ExternalId {
    type Err = Error;

    /// Numeric text becomes `Number`, anything else `Text`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidInput("Empty external id".to_string()));
        }
        Ok(s.parse::<i64>()
            .map(ExternalId::Number)
            .unwrap_or_else(|_| ExternalId::Text(s.to_string())))
    }
}

/// Catalog entity surfaced by search
///
/// Text fields are untrusted and must be escaped before being placed in
/// markup (see [`crate::format`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub external_id: ExternalId,

    /// Display title
    pub name: String,

    #[serde(default)]
    pub cover_url: Option<String>,

    #[serde(default)]
    pub release_year: Option<i32>,

    /// Media specific descriptor (platforms, authors, ...)
    #[serde(default)]
    pub meta_line: Option<String>,

    #[serde(default)]
    pub genres: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    /// Ranked items cannot be selected for rating
    #[serde(default)]
    pub already_ranked: bool,

    /// Fields the client does not interpret; sent back unchanged on rate
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Minimal item, mostly useful in tests and stub servers
    pub fn new(external_id: ExternalId, name: impl Into<String>) -> Self {
        Self {
            external_id,
            name: name.into(),
            cover_url: None,
            release_year: None,
            meta_line: None,
            genres: None,
            summary: None,
            already_ranked: false,
            extra: Map::new(),
        }
    }
}

// ========================================
// Choices
// ========================================

/// Coarse quality bucket chosen in the rating modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Like,
    Neutral,
    Dislike,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Like, Tier::Neutral, Tier::Dislike];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Like => "like",
            Tier::Neutral => "neutral",
            Tier::Dislike => "dislike",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Tier::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown tier: {}", s)))
    }
}

/// Answer to one head-to-head round: is the new item better or worse than
/// the incumbent?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Better,
    Worse,
}

impl Answer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Better => "better",
            Answer::Worse => "worse",
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Answer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "better" => Ok(Answer::Better),
            "worse" => Ok(Answer::Worse),
            other => Err(Error::InvalidInput(format!("Unknown answer: {}", other))),
        }
    }
}

// ========================================
// Request Bodies
// ========================================

/// POST /{media}/api/rate
#[derive(Debug, Serialize)]
pub struct RateRequest<'a> {
    pub item: &'a Item,
    pub tier: Tier,
}

/// POST /{media}/api/compare
///
/// The pair being answered is tracked by the server session, not sent.
#[derive(Debug, Serialize)]
pub struct CompareRequest {
    pub answer: Answer,
}

/// POST /{media}/api/remove
#[derive(Debug, Serialize)]
pub struct RemoveRequest<'a> {
    pub external_id: &'a ExternalId,
}

// ========================================
// Replies
// ========================================

/// GET /{media}/api/search reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchReply {
    Items(Vec<Item>),
    Error { error: String },
}

impl SearchReply {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::Parse(e.to_string()))
    }
}

/// Raw `{status, redirect, error}` record
#[derive(Debug, Deserialize)]
struct ActionBody {
    #[serde(default)]
    redirect: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Reply of the rate and compare endpoints
///
/// A redirect is always followed by full navigation; the client never
/// inspects where it points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionReply {
    Redirect(String),
    Error(String),
}

impl ActionReply {
    /// Parse a reply body; `error` wins when both fields are present
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let body: ActionBody =
            serde_json::from_slice(bytes).map_err(|e| Error::Parse(e.to_string()))?;
        match (body.error, body.redirect) {
            (Some(error), _) => Ok(ActionReply::Error(error)),
            (None, Some(url)) => Ok(ActionReply::Redirect(url)),
            (None, None) => Err(Error::Parse(
                "reply has neither redirect nor error".to_string(),
            )),
        }
    }
}

/// Reply of the remove endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveReply {
    #[serde(default)]
    pub status: Option<String>,
}

impl RemoveReply {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::Parse(e.to_string()))
    }

    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_with_numeric_id_and_extra_fields() {
        let value = json!({
            "external_id": 1942,
            "name": "The Legend of Zelda",
            "cover_url": null,
            "release_year": 1986,
            "platforms": "NES",
            "already_ranked": false
        });
        let item: Item = serde_json::from_value(value).unwrap();
        assert_eq!(item.external_id, ExternalId::Number(1942));
        assert_eq!(item.release_year, Some(1986));
        assert!(item.cover_url.is_none());
        assert_eq!(item.extra.get("platforms"), Some(&json!("NES")));

        // Unknown fields go back to the server untouched
        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["platforms"], "NES");
        assert_eq!(back["external_id"], 1942);
    }

    #[test]
    fn test_item_with_text_id_defaults() {
        let item: Item =
            serde_json::from_value(json!({"external_id": "OL27448W", "name": "Dune"})).unwrap();
        assert_eq!(item.external_id, ExternalId::Text("OL27448W".to_string()));
        assert!(!item.already_ranked);
        assert!(item.summary.is_none());
        assert!(item.extra.is_empty());
    }

    #[test]
    fn test_external_id_from_str() {
        assert_eq!("42".parse::<ExternalId>().unwrap(), ExternalId::Number(42));
        assert_eq!(
            "OL1W".parse::<ExternalId>().unwrap(),
            ExternalId::Text("OL1W".to_string())
        );
        assert!("  ".parse::<ExternalId>().is_err());
    }

    #[test]
    fn test_search_reply_variants() {
        let items = SearchReply::from_slice(br#"[{"external_id": 1, "name": "Zelda"}]"#).unwrap();
        match items {
            SearchReply::Items(list) => assert_eq!(list[0].name, "Zelda"),
            other => panic!("unexpected {:?}", other),
        }

        let empty = SearchReply::from_slice(b"[]").unwrap();
        assert_eq!(empty, SearchReply::Items(vec![]));

        let error = SearchReply::from_slice(br#"{"error": "IGDB unavailable"}"#).unwrap();
        assert_eq!(
            error,
            SearchReply::Error {
                error: "IGDB unavailable".to_string()
            }
        );

        let garbage = SearchReply::from_slice(b"<html>");
        assert!(matches!(garbage, Err(Error::Parse(_))));
    }

    #[test]
    fn test_action_reply_parsing() {
        assert_eq!(
            ActionReply::from_slice(br#"{"status": "compare", "redirect": "/games/compare"}"#)
                .unwrap(),
            ActionReply::Redirect("/games/compare".to_string())
        );
        assert_eq!(
            ActionReply::from_slice(br#"{"error": "Already ranked"}"#).unwrap(),
            ActionReply::Error("Already ranked".to_string())
        );
        assert_eq!(
            ActionReply::from_slice(br#"{"error": "x", "redirect": "/games/"}"#).unwrap(),
            ActionReply::Error("x".to_string())
        );
        assert!(matches!(
            ActionReply::from_slice(br#"{"status": "done"}"#),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_remove_reply_status() {
        assert!(RemoveReply::from_slice(br#"{"status": "ok"}"#).unwrap().is_ok());
        assert!(!RemoveReply::from_slice(br#"{"status": "missing"}"#).unwrap().is_ok());
        assert!(!RemoveReply::from_slice(b"{}").unwrap().is_ok());
    }

    #[test]
    fn test_request_bodies() {
        let item = Item::new(ExternalId::Number(7), "Halo");
        let rate = serde_json::to_value(RateRequest { item: &item, tier: Tier::Like }).unwrap();
        assert_eq!(rate["tier"], "like");
        assert_eq!(rate["item"]["name"], "Halo");

        let compare = serde_json::to_value(CompareRequest { answer: Answer::Worse }).unwrap();
        assert_eq!(compare, json!({"answer": "worse"}));

        let id = ExternalId::Text("OL1W".to_string());
        let remove = serde_json::to_value(RemoveRequest { external_id: &id }).unwrap();
        assert_eq!(remove, json!({"external_id": "OL1W"}));
    }

    #[test]
    fn test_tier_and_answer_parsing() {
        assert_eq!("Like".parse::<Tier>().unwrap(), Tier::Like);
        assert!("meh".parse::<Tier>().is_err());
        assert_eq!("better".parse::<Answer>().unwrap(), Answer::Better);
        assert!("same".parse::<Answer>().is_err());
    }
}
