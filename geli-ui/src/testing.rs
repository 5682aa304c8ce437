//! Scripted [`RatingApi`] and helpers for controller unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use geli_common::api::{ActionReply, Answer, ExternalId, Item, RemoveReply, SearchReply, Tier};
use geli_common::events::UiEvent;
use geli_common::{Error, MediaType, Result};
use tokio::sync::broadcast;

use crate::lock;
use crate::transport::RatingApi;

/// Everything queued on a receiver right now
pub(crate) fn drain(rx: &mut broadcast::Receiver<UiEvent>) -> Vec<UiEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub(crate) fn item(id: i64, name: &str) -> Item {
    Item::new(ExternalId::Number(id), name)
}

pub(crate) fn ranked_item(id: i64, name: &str) -> Item {
    let mut item = item(id, name);
    item.already_ranked = true;
    item
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Search(MediaType, String),
    Rate(ExternalId, Tier),
    Compare(Answer),
    Remove(ExternalId),
}

#[derive(Debug, Clone)]
pub(crate) enum Outcome<T> {
    Reply(T),
    Network(String),
    Parse(String),
}

impl<T> Outcome<T> {
    fn into_result(self) -> Result<T> {
        match self {
            Outcome::Reply(reply) => Ok(reply),
            Outcome::Network(msg) => Err(Error::Network(msg)),
            Outcome::Parse(msg) => Err(Error::Parse(msg)),
        }
    }
}

#[derive(Debug, Clone)]
struct Scripted<T> {
    delay: Duration,
    outcome: Outcome<T>,
}

#[derive(Default)]
pub(crate) struct FakeApi {
    calls: Mutex<Vec<Call>>,
    search: Mutex<HashMap<String, Scripted<SearchReply>>>,
    rate: Mutex<VecDeque<Scripted<ActionReply>>>,
    compare: Mutex<VecDeque<Scripted<ActionReply>>>,
    remove: Mutex<VecDeque<Scripted<RemoveReply>>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_search(&self, query: &str, delay: Duration, outcome: Outcome<SearchReply>) {
        lock(&self.search).insert(query.to_string(), Scripted { delay, outcome });
    }

    pub(crate) fn push_rate(&self, delay: Duration, outcome: Outcome<ActionReply>) {
        lock(&self.rate).push_back(Scripted { delay, outcome });
    }

    pub(crate) fn push_compare(&self, delay: Duration, outcome: Outcome<ActionReply>) {
        lock(&self.compare).push_back(Scripted { delay, outcome });
    }

    pub(crate) fn push_remove(&self, delay: Duration, outcome: Outcome<RemoveReply>) {
        lock(&self.remove).push_back(Scripted { delay, outcome });
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }

    async fn play<T>(next: Option<Scripted<T>>) -> Result<T> {
        match next {
            Some(scripted) => {
                tokio::time::sleep(scripted.delay).await;
                scripted.outcome.into_result()
            }
            None => Err(Error::Network("unscripted request".to_string())),
        }
    }
}

#[async_trait]
impl RatingApi for FakeApi {
    async fn search(&self, media: MediaType, query: &str) -> Result<SearchReply> {
        self.record(Call::Search(media, query.to_string()));
        let scripted = lock(&self.search).get(query).cloned();
        match scripted {
            Some(_) => Self::play(scripted).await,
            None => Ok(SearchReply::Items(Vec::new())),
        }
    }

    async fn rate(&self, _media: MediaType, item: &Item, tier: Tier) -> Result<ActionReply> {
        self.record(Call::Rate(item.external_id.clone(), tier));
        let next = lock(&self.rate).pop_front();
        Self::play(next).await
    }

    async fn compare(&self, _media: MediaType, answer: Answer) -> Result<ActionReply> {
        self.record(Call::Compare(answer));
        let next = lock(&self.compare).pop_front();
        Self::play(next).await
    }

    async fn remove(&self, _media: MediaType, external_id: &ExternalId) -> Result<RemoveReply> {
        self.record(Call::Remove(external_id.clone()));
        let next = lock(&self.remove).pop_front();
        Self::play(next).await
    }
}
