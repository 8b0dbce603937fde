//! Identifier types.
//!
//! `AgentId`, `NodeId` and `EdgeId` are zero-cost typed indices (agent slots
//! in the fleet, road-graph nodes and edges).  `AgentId` also seeds per-agent
//! RNGs.  `VehicleId` is the opaque, human-readable label written into every
//! telemetry record.

use std::fmt;

use crate::RandomSource;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Slot of an agent in the fleet.  Stable for the agent's lifetime.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a road-network node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed road-network edge.
    pub struct EdgeId(u32);
}

// ── VehicleId ─────────────────────────────────────────────────────────────────

const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";

/// Vehicle label of the form `ABC-1234`: three upper-case letters, a dash,
/// four digits.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct VehicleId(String);

impl VehicleId {
    /// Draw a fresh label from `rng`.
    ///
    /// Labels are not checked for collisions; with 175 M combinations a
    /// fleet of a few thousand vehicles collides with negligible probability.
    pub fn generate<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let mut s = String::with_capacity(8);
        for _ in 0..3 {
            s.push(rng.pick_char(LETTERS));
        }
        s.push('-');
        for _ in 0..4 {
            s.push(rng.pick_char(DIGITS));
        }
        VehicleId(s)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
