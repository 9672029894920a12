//! Index newtypes for graph, corridor and component arrays.
//!
//! Every id is a `u32` position into one `Vec`.  They order by index, which
//! is what the router and the repair tool use to break ties.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Placeholder for "not set", e.g. the predecessor of a search root.
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Counts in this crate stay far below `u32::MAX`.
            #[inline]
            pub fn from_index(i: usize) -> Self {
                debug_assert!(i < <$inner>::MAX as usize);
                $name(i as $inner)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Index of a corridor-graph node (a deduplicated coordinate).
    ///
    /// Base nodes occupy `0..N`; per-query temporary nodes are numbered
    /// `N..N+k` by the overlay that owns them.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed corridor-graph edge.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Position of a corridor in the caller's input list.
    pub struct CorridorId(u32);
}

typed_id! {
    /// Index of a connected component within one repair scan.
    pub struct ComponentId(u32);
}
