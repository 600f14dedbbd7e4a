//! Bounded ancestor enumeration over parent edges.
//!
//! Walks *upward only* — parent-typed edges — accumulating an
//! [`AncestorRecord`] for every ancestor within the depth bound. A
//! per-traversal visited set guards against malformed data that introduces
//! a cycle: a revisited branch is pruned, whatever was already collected is
//! kept, and the walk always terminates.

use std::collections::{HashMap, HashSet};

use kindred_core::{
  ancestry::AncestorRecord,
  fact::ParentPair,
  relation::RelationType,
};
use uuid::Uuid;

use crate::graph::Graph;

/// Default depth bound, in parent-edge hops.
pub const DEFAULT_MAX_ANCESTOR_DEPTH: u32 = 6;

// ─── Provider ────────────────────────────────────────────────────────────────

/// Source of parent edges for the enumerator.
///
/// Implemented for a built [`Graph`] and for the plain adjacency map
/// produced by [`parent_map`], so the enumerator runs equally over an
/// in-memory graph or rows loaded straight from the fact store.
pub trait ParentProvider {
  /// The parents of `person`, in provider order.
  fn parents_of(&self, person: Uuid) -> Vec<Uuid>;
}

impl ParentProvider for Graph {
  fn parents_of(&self, person: Uuid) -> Vec<Uuid> {
    let Some(idx) = self.index_of(person) else {
      return Vec::new();
    };
    self
      .edges(idx)
      .iter()
      .filter(|e| e.relation == RelationType::Parent)
      .map(|e| self.person_at(e.to))
      .collect()
  }
}

impl ParentProvider for HashMap<Uuid, Vec<Uuid>> {
  fn parents_of(&self, person: Uuid) -> Vec<Uuid> {
    self.get(&person).cloned().unwrap_or_default()
  }
}

/// Build the child → parents adjacency map from normalised parent pairs.
pub fn parent_map(pairs: &[ParentPair]) -> HashMap<Uuid, Vec<Uuid>> {
  let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
  for pair in pairs {
    map.entry(pair.child).or_default().push(pair.parent);
  }
  map
}

// ─── Enumeration ─────────────────────────────────────────────────────────────

/// The result of one ancestor traversal: the records collected plus how many
/// branches were pruned on a revisit. A non-zero count is a data-quality
/// signal for the caller's warning channel, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorScan {
  pub records:         Vec<AncestorRecord>,
  pub pruned_branches: usize,
}

/// Enumerate every ancestor of `person` within `max_depth` parent hops.
///
/// Each record carries the hop depth (≥ 1) and the ordered intermediate ids
/// between descendant and ancestor. A revisit of any node already seen in
/// this traversal — a cycle in malformed data, or the second face of a
/// diamond — prunes that branch; the first-found record stands.
pub fn enumerate_ancestors<P: ParentProvider + ?Sized>(
  person: Uuid,
  max_depth: u32,
  provider: &P,
) -> AncestorScan {
  let mut scan = AncestorScan { records: Vec::new(), pruned_branches: 0 };
  let mut visited: HashSet<Uuid> = HashSet::new();
  visited.insert(person);

  let mut trail: Vec<Uuid> = Vec::new();
  walk(person, person, max_depth, provider, &mut visited, &mut trail, &mut scan);
  scan
}

fn walk<P: ParentProvider + ?Sized>(
  descendant: Uuid,
  current: Uuid,
  remaining: u32,
  provider: &P,
  visited: &mut HashSet<Uuid>,
  trail: &mut Vec<Uuid>,
  scan: &mut AncestorScan,
) {
  if remaining == 0 {
    return;
  }

  for parent in provider.parents_of(current) {
    if !visited.insert(parent) {
      scan.pruned_branches += 1;
      continue;
    }

    scan.records.push(AncestorRecord {
      descendant_id: descendant,
      ancestor_id:   parent,
      depth:         trail.len() as u32 + 1,
      path:          trail.clone(),
    });

    trail.push(parent);
    walk(descendant, parent, remaining - 1, provider, visited, trail, scan);
    trail.pop();
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn pairs(list: &[(Uuid, Uuid)]) -> HashMap<Uuid, Vec<Uuid>> {
    let pairs: Vec<ParentPair> = list
      .iter()
      .map(|(child, parent)| ParentPair { child: *child, parent: *parent })
      .collect();
    parent_map(&pairs)
  }

  #[test]
  fn straight_line_depths_and_paths() {
    let (a, b, c, d) = (
      Uuid::new_v4(),
      Uuid::new_v4(),
      Uuid::new_v4(),
      Uuid::new_v4(),
    );
    let map = pairs(&[(a, b), (b, c), (c, d)]);

    let scan = enumerate_ancestors(a, DEFAULT_MAX_ANCESTOR_DEPTH, &map);
    assert_eq!(scan.pruned_branches, 0);
    assert_eq!(scan.records.len(), 3);

    let by_ancestor: HashMap<Uuid, &AncestorRecord> =
      scan.records.iter().map(|r| (r.ancestor_id, r)).collect();

    assert_eq!(by_ancestor[&b].depth, 1);
    assert!(by_ancestor[&b].path.is_empty());

    assert_eq!(by_ancestor[&c].depth, 2);
    assert_eq!(by_ancestor[&c].path, vec![b]);

    assert_eq!(by_ancestor[&d].depth, 3);
    assert_eq!(by_ancestor[&d].path, vec![b, c]);
  }

  #[test]
  fn two_parents_both_enumerated() {
    let (child, mother, father) =
      (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let map = pairs(&[(child, mother), (child, father)]);

    let scan = enumerate_ancestors(child, 6, &map);
    let ancestors: HashSet<Uuid> =
      scan.records.iter().map(|r| r.ancestor_id).collect();
    assert_eq!(ancestors, HashSet::from([mother, father]));
    assert!(scan.records.iter().all(|r| r.depth == 1));
  }

  #[test]
  fn max_depth_truncates_the_walk() {
    let ids: Vec<Uuid> = (0..6).map(|_| Uuid::new_v4()).collect();
    let list: Vec<(Uuid, Uuid)> =
      ids.windows(2).map(|w| (w[0], w[1])).collect();
    let map = pairs(&list);

    let scan = enumerate_ancestors(ids[0], 3, &map);
    assert_eq!(scan.records.len(), 3);
    assert!(scan.records.iter().all(|r| r.depth <= 3));
  }

  #[test]
  fn cycle_terminates_with_partial_results() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    // Malformed: A parentOf B and B parentOf A.
    let map = pairs(&[(a, b), (b, a)]);

    let scan = enumerate_ancestors(a, 10, &map);
    assert_eq!(scan.records.len(), 1);
    assert_eq!(scan.records[0].ancestor_id, b);
    assert!(scan.pruned_branches >= 1);
  }

  #[test]
  fn diamond_ancestry_records_the_shared_ancestor_once() {
    let (child, mother, father, shared) = (
      Uuid::new_v4(),
      Uuid::new_v4(),
      Uuid::new_v4(),
      Uuid::new_v4(),
    );
    let map = pairs(&[
      (child, mother),
      (child, father),
      (mother, shared),
      (father, shared),
    ]);

    let scan = enumerate_ancestors(child, 6, &map);
    let shared_count = scan
      .records
      .iter()
      .filter(|r| r.ancestor_id == shared)
      .count();
    assert_eq!(shared_count, 1);
    assert_eq!(scan.pruned_branches, 1);
  }

  #[test]
  fn unknown_person_yields_an_empty_scan() {
    let map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let scan = enumerate_ancestors(Uuid::new_v4(), 6, &map);
    assert!(scan.records.is_empty());
    assert_eq!(scan.pruned_branches, 0);
  }

  #[test]
  fn graph_provides_parent_edges_only() {
    use chrono::Utc;
    use kindred_core::fact::RelationshipFact;

    let (a, parent, sibling) =
      (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let facts = vec![
      RelationshipFact {
        fact_id: Uuid::new_v4(),
        subject_id: a,
        object_id: parent,
        relation: RelationType::Parent,
        recorded_at: Utc::now(),
      },
      RelationshipFact {
        fact_id: Uuid::new_v4(),
        subject_id: a,
        object_id: sibling,
        relation: RelationType::Sibling,
        recorded_at: Utc::now(),
      },
    ];
    let graph = Graph::build(&[a, parent, sibling], &facts);

    assert_eq!(graph.parents_of(a), vec![parent]);
    // The inverse (child) edge must not read as a parent edge.
    assert!(graph.parents_of(parent).is_empty());
  }
}
