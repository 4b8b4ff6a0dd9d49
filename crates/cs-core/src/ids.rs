//! Strongly typed, zero-cost identifier wrappers and their allocators.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into arena `Vec`s via `id.0 as usize`, but callers should
//! prefer the `.index()` helpers for clarity.
//!
//! IDs are never minted from a process-global counter.  Whoever owns a set of
//! entities (the traffic graph for nodes/edges/lanes, the simulation for
//! agents and clusters) also owns an [`IdAllocator`] for them, and resets it
//! when the world is regenerated.  Two graphs built in the same process
//! therefore number their nodes identically.

use std::fmt;
use std::marker::PhantomData;

/// Conversion shared by every typed id so [`IdAllocator`] can mint any of them.
pub trait TypedId: Copy {
    fn from_raw(raw: u32) -> Self;
    fn raw(self) -> u32;
}

/// Generate a typed ID wrapper around a `u32`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel meaning "no valid ID", equivalent to `u32::MAX`.
            pub const INVALID: $name = $name(u32::MAX);

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

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }

        impl TypedId for $name {
            #[inline(always)]
            fn from_raw(raw: u32) -> Self {
                $name(raw)
            }

            #[inline(always)]
            fn raw(self) -> u32 {
                self.0
            }
        }
    };
}

typed_id! {
    /// Junction in the traffic graph.  Dense: equals the node's arena index.
    pub struct NodeId;
}

typed_id! {
    /// Bidirectional road segment in the traffic graph.
    pub struct EdgeId;
}

typed_id! {
    /// Directional lane owned by an edge.
    pub struct LaneId;
}

typed_id! {
    /// Vehicle agent.  Monotonic for the lifetime of one world; never reused.
    pub struct AgentId;
}

typed_id! {
    /// Crash cluster ("wreck").
    pub struct ClusterId;
}

// ── IdAllocator ───────────────────────────────────────────────────────────────

/// Monotonically increasing id source for one entity kind.
///
/// Owned explicitly by whichever structure owns the entities.  `reset()` is
/// called on regeneration so numbering restarts at zero.
#[derive(Debug, Clone)]
pub struct IdAllocator<T: TypedId> {
    next: u32,
    _marker: PhantomData<T>,
}

impl<T: TypedId> IdAllocator<T> {
    pub fn new() -> Self {
        Self { next: 0, _marker: PhantomData }
    }

    /// Mint the next id.
    ///
    /// # Panics
    /// Panics if the `u32` space is exhausted (the last value is reserved for
    /// the `INVALID` sentinel).
    pub fn next_id(&mut self) -> T {
        assert!(self.next < u32::MAX, "id space exhausted");
        let id = T::from_raw(self.next);
        self.next += 1;
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    #[inline]
    pub fn peek(&self) -> T {
        T::from_raw(self.next)
    }

    /// Number of ids handed out since construction or the last reset.
    #[inline]
    pub fn issued(&self) -> usize {
        self.next as usize
    }

    /// Restart numbering at zero.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl<T: TypedId> Default for IdAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}
