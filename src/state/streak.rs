//! Empty and identical-page streak tracking
//!
//! The tracker is fed outcomes in cursor order and reports when a source
//! should stop.

use crate::state::{CursorOutcome, PageSignature, StopReason};

/// Stopping heuristics for one source run
#[derive(Debug, Clone)]
pub struct StreakTracker {
    empty_limit: u32,
    identical_limit: u32,
    empty_streak: u32,
    identical_streak: u32,
    last_signature: Option<PageSignature>,
}

impl StreakTracker {
    pub fn new(empty_limit: u32, identical_limit: u32) -> Self {
        Self {
            empty_limit,
            identical_limit,
            empty_streak: 0,
            identical_streak: 0,
            last_signature: None,
        }
    }

    pub fn empty_streak(&self) -> u32 {
        self.empty_streak
    }

    pub fn identical_streak(&self) -> u32 {
        self.identical_streak
    }

    /// Empty results still tolerated before the source is exhausted
    ///
    /// A concurrent window wider than this could request cursors past the
    /// stopping point.
    pub fn empty_budget(&self) -> u32 {
        self.empty_limit.saturating_sub(self.empty_streak)
    }

    /// Records the outcome of one ID cursor
    pub fn observe_cursor(&mut self, outcome: CursorOutcome) -> Option<StopReason> {
        if outcome.is_empty() {
            self.bump_empty()
        } else {
            self.empty_streak = 0;
            None
        }
    }

    /// Records one fetched listing page
    ///
    /// An empty listing counts toward the empty streak and clears the
    /// identical-page tracking. A non-empty listing resets the empty streak
    /// and is compared against the previous page.
    pub fn observe_listing(&mut self, signature: PageSignature) -> Option<StopReason> {
        if signature.is_empty() {
            self.identical_streak = 0;
            self.last_signature = None;
            return self.bump_empty();
        }

        self.empty_streak = 0;
        if self.last_signature.as_ref() == Some(&signature) {
            self.identical_streak += 1;
        } else {
            self.identical_streak = 0;
            self.last_signature = Some(signature);
        }

        if self.identical_streak >= self.identical_limit {
            Some(StopReason::DuplicateLoop)
        } else {
            None
        }
    }

    /// Records a listing page that could not be fetched
    pub fn observe_unfetchable(&mut self) -> Option<StopReason> {
        self.bump_empty()
    }

    fn bump_empty(&mut self) -> Option<StopReason> {
        self.empty_streak += 1;
        if self.empty_streak >= self.empty_limit {
            Some(StopReason::Exhausted)
        } else {
            None
        }
    }
}
