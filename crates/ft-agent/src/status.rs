//! Agent lifecycle states.
//!
//! ```text
//!  ACTIVATING ──▶ IDLING ──▶ SEARCHING ──▶ TRAVELING ──▶ BROKEN
//!                  │  ▲                      ▲   │
//!                  │  └──────────────────────┼───┘
//!                  ├─────────────────────────┘
//!                  └──▶ DEACTIVATING
//! ```
//!
//! `BROKEN` and `DEACTIVATING` are terminal.

use std::fmt;

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Activating,
    Idling,
    Searching,
    Traveling,
    Broken,
    Deactivating,
}

impl Status {
    /// Upper-case name, as written into probes.
    pub fn label(self) -> &'static str {
        match self {
            Status::Activating   => "ACTIVATING",
            Status::Idling       => "IDLING",
            Status::Searching    => "SEARCHING",
            Status::Traveling    => "TRAVELING",
            Status::Broken       => "BROKEN",
            Status::Deactivating => "DEACTIVATING",
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Broken | Status::Deactivating)
    }

    /// Whether `self → next` is a lifecycle edge.  Staying put is always
    /// allowed.
    pub fn can_transition_to(self, next: Status) -> bool {
        use Status::*;
        self == next
            || matches!(
                (self, next),
                (Activating, Idling)
                    | (Idling, Searching)
                    | (Idling, Traveling)
                    | (Idling, Deactivating)
                    | (Searching, Traveling)
                    | (Traveling, Idling)
                    | (Traveling, Broken)
            )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
