//! Graph algorithms for the Kindred relationship engine.
//!
//! Pure, synchronous, CPU-bound: building the bidirectional family graph
//! from relationship facts, BFS shortest-path search between two people,
//! kinship degree classification of a path, and bounded ancestor
//! enumeration. No I/O happens here — facts and ids arrive fully loaded,
//! and a built [`Graph`] is safe to share across concurrent read-only
//! traversals.

pub mod ancestry;
pub mod classify;
pub mod graph;
pub mod path;

pub use ancestry::{
  AncestorScan, DEFAULT_MAX_ANCESTOR_DEPTH, ParentProvider,
  enumerate_ancestors, parent_map,
};
pub use classify::{KinshipCategory, KinshipDescriptor, classify};
pub use graph::{Edge, Graph};
pub use path::{DEFAULT_MAX_PATH_DEPTH, PathResult, PathStep, find_path};
