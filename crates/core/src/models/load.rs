use serde::{Deserialize, Serialize};

/// Status of the initial bulk fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The record source failed; the dashboard shows empty data
    Failed(String),
}

/// Handle for one in-flight fetch. Only the newest ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Generation counter that turns overlapping fetches into newest-wins.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every earlier ticket.
    pub fn begin(&mut self) -> FetchTicket {
        self.latest += 1;
        FetchTicket {
            generation: self.latest,
        }
    }

    /// `ticket` belongs to the most recent request.
    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.latest
    }

    /// Invalidate every outstanding ticket.
    pub fn cancel_all(&mut self) {
        self.latest += 1;
    }
}
