//! Relationship facts — the source of truth for the family graph.
//!
//! A fact is a single directed claim: "`object_id` is `subject_id`'s
//! `relation`". Every fact implies exactly one inverse fact; the inverse is
//! never stored — the graph builder materialises both directed edges at
//! read time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::relation::RelationType;

/// A persisted relationship claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipFact {
  pub fact_id:     Uuid,
  pub subject_id:  Uuid,
  /// The person who *is* the subject's `relation`.
  pub object_id:   Uuid,
  pub relation:    RelationType,
  /// Server-assigned; never changes after creation.
  pub recorded_at: DateTime<Utc>,
}

/// Input to [`crate::store::RelationshipFactStore::record_fact`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewRelationshipFact {
  pub subject_id: Uuid,
  pub object_id:  Uuid,
  pub relation:   RelationType,
}

impl NewRelationshipFact {
  pub fn new(subject_id: Uuid, object_id: Uuid, relation: RelationType) -> Self {
    Self { subject_id, object_id, relation }
  }
}

/// One `(child, parent)` hop extracted from the fact list — the only edge
/// shape the ancestor enumerator consumes. Both orientations of a
/// parent/child fact normalise to the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParentPair {
  pub child:  Uuid,
  pub parent: Uuid,
}

impl ParentPair {
  /// Normalise a fact into a parent pair, if it is parent/child-typed.
  pub fn from_fact(fact: &RelationshipFact) -> Option<Self> {
    match fact.relation {
      RelationType::Parent => Some(Self {
        child:  fact.subject_id,
        parent: fact.object_id,
      }),
      RelationType::Child => Some(Self {
        child:  fact.object_id,
        parent: fact.subject_id,
      }),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fact(
    subject: Uuid,
    object: Uuid,
    relation: RelationType,
  ) -> RelationshipFact {
    RelationshipFact {
      fact_id: Uuid::new_v4(),
      subject_id: subject,
      object_id: object,
      relation,
      recorded_at: Utc::now(),
    }
  }

  #[test]
  fn parent_pair_normalises_both_orientations() {
    let child = Uuid::new_v4();
    let parent = Uuid::new_v4();

    let a = ParentPair::from_fact(&fact(child, parent, RelationType::Parent));
    let b = ParentPair::from_fact(&fact(parent, child, RelationType::Child));

    assert_eq!(a, Some(ParentPair { child, parent }));
    assert_eq!(a, b);
  }

  #[test]
  fn parent_pair_ignores_lateral_facts() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    assert!(ParentPair::from_fact(&fact(a, b, RelationType::Sibling)).is_none());
    assert!(
      ParentPair::from_fact(&fact(a, b, RelationType::Grandparent)).is_none()
    );
  }
}
