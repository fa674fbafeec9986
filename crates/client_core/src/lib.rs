//! Client core for the sports tracker: the REST client, the view-state
//! controller that keeps screens in sync with the backend, and the per-screen
//! view sources built on top of it.

pub mod api;
pub mod controller;
pub mod error;
pub mod format;
pub mod view_state;
pub mod views;

pub use api::{HttpSportsApi, SportsApi, DEFAULT_REQUEST_TIMEOUT};
pub use controller::{
    EntryCollection, MountedView, PollingHandle, ViewSource, ViewStateController,
    DEFAULT_POLL_INTERVAL,
};
pub use error::{ApiResult, ClientError};
pub use view_state::{LoadOutcome, ViewPhase, ViewState};

#[cfg(test)]
#[path = "tests/fake_api.rs"]
mod fake_api;

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod views_tests;
