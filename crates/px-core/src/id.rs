use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for node IDs: cheap comparisons and small footprint.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Prefix of allocator-generated node IDs (`n1`, `n2`, ...).
pub const NODE_ID_PREFIX: &str = "n";

/// A lightweight, interned identifier for annotation nodes.
/// Internally a `Spur` index: 4 bytes, `Copy`, O(1) hashing.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a string as a NodeId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// The counter value of an allocator-style ID (`n7` → 7).
    /// Returns `None` for IDs that don't follow the `n<digits>` shape.
    pub fn ordinal(&self) -> Option<u64> {
        let digits = self.as_str().strip_prefix(NODE_ID_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

/// Strictly monotonic node ID source.
///
/// IDs are never derived from the current node count, so an ID handed out
/// once is never handed out again by the same allocator, even after the
/// node is removed or the graph is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Largest counter value a loaded document may seed the allocator with.
    /// Everything above it is headroom for fresh allocations.
    pub const MAX_SEED: u64 = u64::MAX >> 1;

    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next ID and advance the counter.
    pub fn allocate(&mut self) -> NodeId {
        let id = NodeId::intern(&format!("{NODE_ID_PREFIX}{}", self.next));
        self.next = self.next.saturating_add(1);
        id
    }

    /// Whether a loaded `id` leaves the counter room to keep allocating.
    /// Ordinals above `MAX_SEED` are refused.
    pub fn can_follow(id: NodeId) -> bool {
        id.ordinal().is_none_or(|n| n <= Self::MAX_SEED)
    }

    /// Make sure a future `allocate()` can't collide with `id`.
    pub fn observe(&mut self, id: NodeId) {
        if let Some(n) = id.ordinal()
            && n >= self.next
            && n <= Self::MAX_SEED
        {
            self.next = n + 1;
        }
    }

    /// The counter value the next allocation will use.
    pub fn peek(&self) -> u64 {
        self.next
    }
}
