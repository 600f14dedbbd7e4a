//! Shortest-path search between two people.
//!
//! Standard breadth-first search over the adjacency lists: all edges are
//! unit cost, so the first visit to the target is a shortest path in edge
//! count. Ties between equal-length paths follow adjacency insertion order;
//! callers must not read semantic meaning into which one is returned.

use std::collections::VecDeque;

use kindred_core::relation::{Direction, RelationType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::graph::Graph;

/// Safety bound against pathological/cyclic fact data, not a domain rule.
/// Large enough to cover any realistic extended-family distance.
pub const DEFAULT_MAX_PATH_DEPTH: u32 = 15;

/// One hop of a relationship path. The relation/direction attached to a
/// step describe the edge *to the next person*; the final step carries
/// `None` for both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
  pub person_id:         Uuid,
  pub relation_to_next:  Option<RelationType>,
  pub direction_to_next: Option<Direction>,
}

/// An ordered relationship path from start to end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
  pub steps: Vec<PathStep>,
}

impl PathResult {
  /// Degree of the path: number of steps minus one. Zero for the
  /// same-person trivial path.
  pub fn degree(&self) -> usize {
    self.steps.len().saturating_sub(1)
  }

  /// The ordered chain of relation tokens along the path — exactly what
  /// [`crate::classify`] consumes.
  pub fn relation_tokens(&self) -> Vec<RelationType> {
    self
      .steps
      .iter()
      .filter_map(|s| s.relation_to_next.clone())
      .collect()
  }
}

/// Find a shortest relationship path from `start` to `end`.
///
/// Returns `None` — a legitimate "no relationship known" outcome, never an
/// error — when either id is absent from the graph or no route exists
/// within `max_depth` hops. `start == end` is the reserved trivial case: a
/// single-step, zero-degree path if the id is in the graph.
pub fn find_path(
  graph: &Graph,
  start: Uuid,
  end: Uuid,
  max_depth: u32,
) -> Option<PathResult> {
  let start_idx = graph.index_of(start)?;
  let end_idx = graph.index_of(end)?;

  if start_idx == end_idx {
    return Some(PathResult {
      steps: vec![PathStep {
        person_id:         start,
        relation_to_next:  None,
        direction_to_next: None,
      }],
    });
  }

  // For each visited node: the predecessor index and the relation/direction
  // of the edge used to arrive there.
  let mut came_from: Vec<Option<(usize, RelationType, Direction)>> =
    vec![None; graph.len()];
  let mut visited = vec![false; graph.len()];
  let mut queue: VecDeque<(usize, u32)> = VecDeque::new();

  visited[start_idx] = true;
  queue.push_back((start_idx, 0));

  let mut found = false;
  'search: while let Some((current, depth)) = queue.pop_front() {
    if depth >= max_depth {
      continue;
    }
    for edge in graph.edges(current) {
      if visited[edge.to] {
        continue;
      }
      visited[edge.to] = true;
      came_from[edge.to] =
        Some((current, edge.relation.clone(), edge.direction));
      if edge.to == end_idx {
        found = true;
        break 'search;
      }
      queue.push_back((edge.to, depth + 1));
    }
  }

  if !found {
    return None;
  }

  // Walk predecessor links backward from the end, then reverse. The edge
  // that *arrived* at a node becomes the previous step's relation-to-next.
  let mut reversed: Vec<(usize, Option<(RelationType, Direction)>)> =
    vec![(end_idx, None)];
  let mut cursor = end_idx;
  while let Some((prev, relation, direction)) = came_from[cursor].clone() {
    reversed.push((prev, Some((relation, direction))));
    cursor = prev;
  }

  let steps = reversed
    .into_iter()
    .rev()
    .map(|(idx, outgoing)| {
      let (relation_to_next, direction_to_next) = match outgoing {
        Some((r, d)) => (Some(r), Some(d)),
        None => (None, None),
      };
      PathStep {
        person_id: graph.person_at(idx),
        relation_to_next,
        direction_to_next,
      }
    })
    .collect();

  Some(PathResult { steps })
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
  fn same_person_yields_a_zero_degree_path() {
    let a = Uuid::new_v4();
    let g = Graph::build(&[a], &[]);

    let path = find_path(&g, a, a, DEFAULT_MAX_PATH_DEPTH).unwrap();
    assert_eq!(path.degree(), 0);
    assert_eq!(path.steps.len(), 1);
    assert_eq!(path.steps[0].person_id, a);
    assert!(path.steps[0].relation_to_next.is_none());
  }

  #[test]
  fn unknown_ids_are_not_found() {
    let a = Uuid::new_v4();
    let g = Graph::build(&[a], &[]);

    assert!(find_path(&g, a, Uuid::new_v4(), 15).is_none());
    assert!(find_path(&g, Uuid::new_v4(), a, 15).is_none());
    assert!(find_path(&g, Uuid::new_v4(), Uuid::new_v4(), 15).is_none());
  }

  #[test]
  fn grandparent_chain_resolves_end_to_end() {
    // B is A's parent; C is B's parent.
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let g = Graph::build(
      &[a, b, c],
      &[fact(a, b, "parent"), fact(b, c, "parent")],
    );

    let path = find_path(&g, a, c, DEFAULT_MAX_PATH_DEPTH).unwrap();
    assert_eq!(path.degree(), 2);

    let people: Vec<_> = path.steps.iter().map(|s| s.person_id).collect();
    assert_eq!(people, vec![a, b, c]);

    assert_eq!(
      path.relation_tokens(),
      vec![RelationType::Parent, RelationType::Parent]
    );
    assert!(path.steps.last().unwrap().relation_to_next.is_none());
  }

  #[test]
  fn degree_is_symmetric() {
    let (a, b, c, d) = (
      Uuid::new_v4(),
      Uuid::new_v4(),
      Uuid::new_v4(),
      Uuid::new_v4(),
    );
    // A —parent→ B —sibling→ C —child→ D: first cousins.
    let g = Graph::build(
      &[a, b, c, d],
      &[
        fact(a, b, "parent"),
        fact(b, c, "sibling"),
        fact(d, c, "parent"),
      ],
    );

    let forward = find_path(&g, a, d, 15).unwrap();
    let backward = find_path(&g, d, a, 15).unwrap();
    assert_eq!(forward.degree(), backward.degree());
  }

  #[test]
  fn bfs_finds_the_shorter_of_two_routes() {
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    // Two-hop route A→B→C and a direct grandparent edge A→C.
    let g = Graph::build(
      &[a, b, c],
      &[
        fact(a, b, "parent"),
        fact(b, c, "parent"),
        fact(a, c, "grandparent"),
      ],
    );

    let path = find_path(&g, a, c, 15).unwrap();
    assert_eq!(path.degree(), 1);
    assert_eq!(path.relation_tokens(), vec![RelationType::Grandparent]);
  }

  #[test]
  fn max_depth_bounds_the_search() {
    let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
    let facts: Vec<_> = ids
      .windows(2)
      .map(|w| fact(w[0], w[1], "parent"))
      .collect();
    let g = Graph::build(&ids, &facts);

    // Four hops needed; a bound of three must yield NotFound, never a
    // partial path.
    assert!(find_path(&g, ids[0], ids[4], 3).is_none());
    assert!(find_path(&g, ids[0], ids[4], 4).is_some());
  }

  #[test]
  fn cyclic_fact_data_terminates() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    // Malformed: each is the other's parent.
    let g = Graph::build(
      &[a, b],
      &[fact(a, b, "parent"), fact(b, a, "parent")],
    );

    let path = find_path(&g, a, b, 15).unwrap();
    assert_eq!(path.degree(), 1);
    assert!(find_path(&g, a, Uuid::new_v4(), 15).is_none());
  }
}
