//! The bidirectional family graph, built from a flat list of facts.
//!
//! Nodes live in an arena indexed by [`NodeIdx`]; adjacency is a parallel
//! `Vec` of edge lists. The arena avoids id-keyed maps of mutable objects,
//! so a built graph can be traversed concurrently without aliasing hazards.

use std::collections::{HashMap, HashSet};

use kindred_core::{
  fact::RelationshipFact,
  relation::{Direction, RelationType},
};
use uuid::Uuid;

/// Opaque handle into the node arena.
pub type NodeIdx = usize;

/// One directed edge: "the person at `to` is this node's `relation`".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
  pub to:        NodeIdx,
  pub relation:  RelationType,
  pub direction: Direction,
}

/// The family graph: node arena plus adjacency lists.
///
/// Invariant: for every edge `(a→b, type, dir)` there exists a paired edge
/// `(b→a, inverse(type), invert(dir))` — both are materialised from the same
/// fact at build time. Duplicate facts produce parallel edges; BFS
/// correctness is unaffected, so no deduplication happens here.
#[derive(Debug, Clone, Default)]
pub struct Graph {
  nodes:     Vec<Uuid>,
  index:     HashMap<Uuid, NodeIdx>,
  adjacency: Vec<Vec<Edge>>,
}

impl Graph {
  /// Build a graph from all known person ids plus the fact list.
  ///
  /// Every fact yields exactly two edges (forward + inverse). Ids appearing
  /// only as a fact's object are still interned, so traversal never fails
  /// on a partially-onboarded relative. Unknown relation types degrade to
  /// lateral self-inverse edges and are reported through `tracing::warn!`
  /// once per distinct string per build — a data-quality signal, not an
  /// error.
  pub fn build(person_ids: &[Uuid], facts: &[RelationshipFact]) -> Self {
    let mut graph = Self::default();
    let mut warned: HashSet<&str> = HashSet::new();

    for id in person_ids {
      graph.intern(*id);
    }

    for fact in facts {
      if let RelationType::Other(raw) = &fact.relation
        && warned.insert(raw.as_str())
      {
        tracing::warn!(
          relation = %raw,
          fact_id = %fact.fact_id,
          "unknown relation type; traversing as lateral self-inverse edge"
        );
      }

      let subject = graph.intern(fact.subject_id);
      let object = graph.intern(fact.object_id);

      let forward = fact.relation.clone();
      let inverse = forward.inverse();
      let direction = forward.direction();

      graph.adjacency[subject].push(Edge {
        to: object,
        relation: forward,
        direction,
      });
      graph.adjacency[object].push(Edge {
        to: subject,
        relation: inverse,
        direction: direction.invert(),
      });
    }

    graph
  }

  /// Intern `id`, returning its arena index.
  fn intern(&mut self, id: Uuid) -> NodeIdx {
    if let Some(idx) = self.index.get(&id) {
      return *idx;
    }
    let idx = self.nodes.len();
    self.nodes.push(id);
    self.adjacency.push(Vec::new());
    self.index.insert(id, idx);
    idx
  }

  /// The arena index for `id`, if the person is in the graph.
  pub fn index_of(&self, id: Uuid) -> Option<NodeIdx> {
    self.index.get(&id).copied()
  }

  /// The person id at `idx`. Panics on an out-of-range index, which cannot
  /// be produced by this graph's own API.
  pub fn person_at(&self, idx: NodeIdx) -> Uuid {
    self.nodes[idx]
  }

  /// Outgoing edges of the node at `idx`.
  pub fn edges(&self, idx: NodeIdx) -> &[Edge] {
    &self.adjacency[idx]
  }

  /// Number of nodes.
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// `true` when the person is in the node set.
  pub fn contains(&self, id: Uuid) -> bool {
    self.index.contains_key(&id)
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use kindred_core::fact::RelationshipFact;

  use super::*;

  fn fact(subject: Uuid, object: Uuid, relation: &str) -> RelationshipFact {
    RelationshipFact {
      fact_id: Uuid::new_v4(),
      subject_id: subject,
      object_id: object,
      relation: relation.parse().unwrap(),
      recorded_at: Utc::now(),
    }
  }

  #[test]
  fn every_fact_produces_an_inverse_pair() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let g = Graph::build(&[a, b], &[fact(a, b, "parent")]);

    let a_idx = g.index_of(a).unwrap();
    let b_idx = g.index_of(b).unwrap();

    let forward = &g.edges(a_idx)[0];
    assert_eq!(forward.to, b_idx);
    assert_eq!(forward.relation, RelationType::Parent);
    assert_eq!(forward.direction, Direction::Up);

    let inverse = &g.edges(b_idx)[0];
    assert_eq!(inverse.to, a_idx);
    assert_eq!(inverse.relation, RelationType::Child);
    assert_eq!(inverse.direction, Direction::Down);
  }

  #[test]
  fn object_only_ids_are_added_to_the_node_set() {
    let a = Uuid::new_v4();
    let unknown_relative = Uuid::new_v4();
    let g = Graph::build(&[a], &[fact(a, unknown_relative, "parent")]);

    assert!(g.contains(unknown_relative));
    assert_eq!(g.len(), 2);
  }

  #[test]
  fn duplicate_facts_produce_parallel_edges() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let g = Graph::build(
      &[a, b],
      &[fact(a, b, "sibling"), fact(a, b, "sibling")],
    );

    let a_idx = g.index_of(a).unwrap();
    assert_eq!(g.edges(a_idx).len(), 2);
  }

  #[test]
  fn unknown_types_build_lateral_self_inverse_edges() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let g = Graph::build(&[a, b], &[fact(a, b, "godparent")]);

    let a_idx = g.index_of(a).unwrap();
    let b_idx = g.index_of(b).unwrap();

    assert_eq!(
      g.edges(a_idx)[0].relation,
      RelationType::Other("godparent".into())
    );
    assert_eq!(g.edges(a_idx)[0].direction, Direction::Lateral);
    // Identity fallback: the paired edge carries the same type back.
    assert_eq!(
      g.edges(b_idx)[0].relation,
      RelationType::Other("godparent".into())
    );
    assert_eq!(g.edges(b_idx)[0].direction, Direction::Lateral);
  }

  #[test]
  fn empty_input_builds_an_empty_graph() {
    let g = Graph::build(&[], &[]);
    assert!(g.is_empty());
  }
}
