//! Position of an activation in the linear provider state machine.

use std::fmt;

/// `Constructed -> Enumerating -> CacheInvalidated -> Selecting -> Fetching -> Done`.
/// Any failure jumps straight to `Done(Failed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Constructed,
    Enumerating,
    CacheInvalidated,
    Selecting,
    Fetching,
    Done(Completion),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Succeeded,
    Failed,
}

impl Phase {
    pub fn is_done(self) -> bool {
        matches!(self, Phase::Done(_))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Constructed => "constructed",
            Phase::Enumerating => "enumerating",
            Phase::CacheInvalidated => "cache-invalidated",
            Phase::Selecting => "selecting",
            Phase::Fetching => "fetching",
            Phase::Done(Completion::Succeeded) => "done (success)",
            Phase::Done(Completion::Failed) => "done (failure)",
        };
        f.write_str(s)
    }
}
