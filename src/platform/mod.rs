//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Today's date (daily task rollover)
//! - Host readiness / player profile (optional embedding host)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::DateKey;

/// Source of the local calendar date
pub trait Clock {
    fn today(&self) -> DateKey;
}

/// Wall-clock local date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn today(&self) -> DateKey {
        DateKey::from_date(chrono::Local::now().date_naive())
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for SystemClock {
    fn today(&self) -> DateKey {
        let now = js_sys::Date::new_0();
        DateKey::from_ymd(
            now.get_full_year() as i32,
            now.get_month() + 1,
            now.get_date(),
        )
        .unwrap_or_else(|| {
            log::warn!("Browser returned an invalid date, using epoch");
            DateKey::default()
        })
    }
}

/// A clock stuck on one day (tests, replays)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub DateKey);

impl Clock for FixedClock {
    fn today(&self) -> DateKey {
        self.0.clone()
    }
}

/// Player profile supplied by an embedding host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
}

/// Host collaborator failures
#[derive(Debug, Error)]
pub enum HostError {
    #[error("host not reachable: {0}")]
    Unreachable(String),
    #[error("host rejected request: {0}")]
    Rejected(String),
}

/// Optional embedding host (game portal, launcher)
pub trait HostReadiness {
    /// Tell the host the game finished loading
    fn ready(&mut self) -> Result<(), HostError>;
    /// Fetch the signed-in player, if any
    fn fetch_profile(&mut self) -> Result<Option<Profile>, HostError>;
}
