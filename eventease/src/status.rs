//! Request lifecycle shared by every slice

use metrics::counter;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a slice's most recent operation stands
///
/// `Idle → Loading → {Succeeded, Failed} → Loading → …`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Nothing requested yet, or the slice was reset
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request succeeded
    Succeeded,
    /// The last request failed
    Failed,
}

impl RequestStatus {
    /// A request is in flight
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The last request finished, one way or the other
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        })
    }
}

/// Monotonic request counter used to fence overlapping fetches
///
/// Every fetch takes a fresh number with [`issue`](Self::issue) and carries
/// it in its result action. Only the result carrying the latest number is
/// applied; anything older lost the race and is dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSeq(u64);

impl RequestSeq {
    /// Take the next number, invalidating every earlier one
    pub fn issue(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    /// The most recently issued number (0 before the first request)
    #[must_use]
    pub const fn latest(self) -> u64 {
        self.0
    }

    /// Whether a result tagged `seq` should be applied
    ///
    /// Stale results are logged and counted under `slice`.
    #[must_use]
    pub fn accepts(self, seq: u64, slice: &'static str) -> bool {
        if seq == self.0 {
            return true;
        }
        tracing::debug!(slice, seq, latest = self.0, "Discarding stale response");
        counter!("state.responses.stale", "slice" => slice).increment(1);
        false
    }
}
