//! geli-ui library - rating session controllers
//!
//! Drives the client side of the rating flow:
//! search → rating modal (tier) → comparison rounds → placed in ranking.
//!
//! Controllers own their slice of session state and publish every visible
//! change on the shared [`EventBus`](geli_common::events::EventBus). The
//! server is reached only through [`transport::RatingApi`].

use std::sync::{Mutex, MutexGuard};

pub mod app;
pub mod command;
pub mod compare;
pub mod logging;
pub mod modal;
pub mod page;
pub mod removal;
pub mod render;
pub mod search;
pub mod toast;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use app::ClientApp;
pub use transport::{HttpRatingApi, RatingApi};

/// Lock a controller mutex, recovering the data if a holder panicked
///
/// Guards are never held across an await point.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
