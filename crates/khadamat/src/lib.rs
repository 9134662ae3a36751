//! Client core for the Khadamat domestic-worker marketplace.
//!
//! Everything a front end needs below the view layer: the REST client and its
//! DTOs, the persisted session, onboarding wizards, the toast queue,
//! latest-wins place search and optimistic favorites.

pub mod api;
pub mod config;
pub mod error;
pub mod favorites;
pub mod i18n;
pub mod lookup;
pub mod models;
pub mod search;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod toast;
pub mod wizard;
