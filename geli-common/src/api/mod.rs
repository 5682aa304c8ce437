//! API types shared by every Geli front end
//!
//! Wire contract of the rating server (`/{media}/api/...`).

pub mod types;

pub use types::{
    ActionReply, Answer, CompareRequest, ExternalId, Item, RateRequest, RemoveReply,
    RemoveRequest, SearchReply, Tier,
};
