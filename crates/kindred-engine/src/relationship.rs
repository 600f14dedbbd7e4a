//! On-demand pairwise relationship reports: facts → graph → BFS →
//! classifier.

use kindred_core::store::{ProfileStore, RelationshipFactStore};
use kindred_graph::{Graph, KinshipDescriptor, PathResult, classify, find_path};
use serde::Serialize;
use uuid::Uuid;

use crate::{Engine, Error, Result};

/// A shortest relationship path plus its kinship classification.
///
/// Ephemeral — computed per query from the current fact list, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipReport {
  pub path:    PathResult,
  pub kinship: KinshipDescriptor,
}

impl RelationshipReport {
  pub fn degree(&self) -> usize {
    self.path.degree()
  }
}

impl<S> Engine<S>
where
  S: ProfileStore + RelationshipFactStore,
{
  /// Compute the relationship between two people.
  ///
  /// Returns `Ok(None)` — no relationship known — when either id is absent
  /// from the graph or no path exists within `max_depth` hops. The graph is
  /// built fresh per call and discarded; concurrent calls never share
  /// mutable state.
  pub async fn relationship_between(
    &self,
    from: Uuid,
    to: Uuid,
    max_depth: Option<u32>,
  ) -> Result<Option<RelationshipReport>> {
    let max_depth = max_depth.unwrap_or(self.path_depth);

    let ids = self.store.person_ids().await.map_err(Error::store)?;
    let facts = self.store.all_facts().await.map_err(Error::store)?;

    let graph = Graph::build(&ids, &facts);
    let Some(path) = find_path(&graph, from, to, max_depth) else {
      return Ok(None);
    };

    let kinship = classify(&path.relation_tokens());
    Ok(Some(RelationshipReport { path, kinship }))
  }
}
