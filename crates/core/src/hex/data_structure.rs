use crate::hex::Hex;
use fnv::FnvBuildHasher;
use indexmap::IndexSet;
use std::collections::{HashMap, HashSet};

/// A set of hexes
pub type HexSet = HashSet<Hex, FnvBuildHasher>;
/// A map of hexes to some `T`
pub type HexMap<T> = HashMap<Hex, T, FnvBuildHasher>;
/// An ORDERED set of hexes. This has some extra memory overhead, so we should
/// only use it when we actually need the ordering.
pub type HexIndexSet = IndexSet<Hex, FnvBuildHasher>;
