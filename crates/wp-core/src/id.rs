use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a placed element. 8 bytes, Copy, Eq, Hash in O(1).
///
/// Ids are handed out by an [`IdAllocator`] and are never reused within a
/// scene's lifetime, including across undo/redo and restarts.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    pub const fn from_raw(raw: u64) -> Self {
        ElementId(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for ElementId {
    type Err = std::num::ParseIntError;

    /// Accepts both `12` and `#12`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        digits.parse().map(ElementId)
    }
}

/// Largest id a saved record may carry: the top of the integer range a JSON
/// number survives unchanged in the browser (2^53 - 1). Records written by the
/// web visualizer use `Date.now()` timestamps, well below it.
pub const MAX_ELEMENT_ID: u64 = (1 << 53) - 1;

/// Monotonic id source owned by the scene engine.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Start past every id in `existing`, so restored elements never collide
    /// with freshly allocated ones.
    ///
    /// Returns `None` when an id lies above [`MAX_ELEMENT_ID`]; such ids never
    /// come out of the record codec.
    pub fn seeded_past<I>(existing: I) -> Option<Self>
    where
        I: IntoIterator<Item = ElementId>,
    {
        let max = existing.into_iter().map(ElementId::raw).max().unwrap_or(0);
        (max <= MAX_ELEMENT_ID).then(|| Self { next: max + 1 })
    }

    pub fn allocate(&mut self) -> ElementId {
        let id = ElementId(self.next);
        // Seeds are at most 2^53, so this cannot reach u64::MAX in practice.
        self.next += 1;
        id
    }

    /// The id the next call to [`allocate`](Self::allocate) will return.
    pub fn peek(&self) -> ElementId {
        ElementId(self.next)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
