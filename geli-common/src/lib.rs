//! # Geli Common Library
//!
//! Shared code for the Geli rating client including:
//! - Media catalog descriptors (games, books, movies, TV)
//! - API request/response types for the rating server
//! - UI event types and the EventBus that carries them
//! - Configuration loading
//! - Escaping and metadata formatting helpers
//! - View models (result cards, modal preview) for renderers

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod media;
pub mod view;

pub use error::{Error, Result};
pub use media::MediaType;
