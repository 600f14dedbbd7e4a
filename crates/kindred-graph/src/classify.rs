//! Kinship degree classification.
//!
//! [`classify`] turns the ordered chain of relation tokens along a path into
//! a structured [`KinshipDescriptor`]: category, signed generation delta,
//! and — for cousins — degree and removal. It is a pure function with no
//! locale awareness; turning `{cousin_degree: 2, removal: 1}` into a
//! sentence is a downstream, language-specific concern.

use kindred_core::relation::RelationType;
use serde::{Deserialize, Serialize};

// ─── Descriptor ──────────────────────────────────────────────────────────────

/// Coarse kinship family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KinshipCategory {
  /// Direct line: parent/child, grandparent/grandchild, sibling, spouse.
  Direct,
  /// Aunt/uncle and niece/nephew chains.
  Extended,
  Cousin,
  /// Any chain crossing a spousal edge. A deliberate approximation: the
  /// side of the marriage each step traversed is not tracked.
  InLaw,
  /// A chain that does not reduce to a single common-ancestor triangle.
  Other,
}

/// The structured result of classification. Pure value type; no
/// locale-specific text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KinshipDescriptor {
  pub category:         KinshipCategory,
  /// Net generations moved, ancestor-ward positive. For `Other` chains
  /// this is the chain length instead.
  pub generation_delta: i32,
  /// `min(up_steps, down_steps)` for cousins; 1 = first cousin.
  pub cousin_degree:    Option<u32>,
  /// `|up_steps - down_steps|` for cousins; the "once/twice removed"
  /// offset, as an integer.
  pub removal:          Option<u32>,
}

impl KinshipDescriptor {
  fn plain(category: KinshipCategory, generation_delta: i32) -> Self {
    Self {
      category,
      generation_delta,
      cousin_degree: None,
      removal: None,
    }
  }

  fn cousin(degree: u32, removal: u32, generation_delta: i32) -> Self {
    Self {
      category: KinshipCategory::Cousin,
      generation_delta,
      cousin_degree: Some(degree),
      removal: Some(removal),
    }
  }

  /// For aunt/uncle (and niece/nephew) chains: how many `great-` prefixes
  /// the relationship carries. 0 = direct aunt/uncle.
  pub fn extended_level(&self) -> Option<u32> {
    match self.category {
      KinshipCategory::Extended => {
        Some(self.generation_delta.unsigned_abs().saturating_sub(1))
      }
      _ => None,
    }
  }
}

// ─── Classification ──────────────────────────────────────────────────────────

/// Classify an ordered relation-token chain into a kinship descriptor.
///
/// Never fails: chains that don't reduce to a single common-ancestor
/// triangle degrade to [`KinshipCategory::Other`] with the chain length as
/// `generation_delta` and no cousin fields.
pub fn classify(chain: &[RelationType]) -> KinshipDescriptor {
  match chain {
    [] => KinshipDescriptor::plain(KinshipCategory::Direct, 0),
    [single] => classify_single(single),
    _ => classify_chain(chain),
  }
}

/// Direct lookup for a one-edge path.
fn classify_single(relation: &RelationType) -> KinshipDescriptor {
  use KinshipCategory::*;

  match relation {
    RelationType::Parent
    | RelationType::Child
    | RelationType::Grandparent
    | RelationType::Grandchild
    | RelationType::GreatGrandparent(_)
    | RelationType::GreatGrandchild(_)
    | RelationType::Sibling
    | RelationType::Spouse => {
      KinshipDescriptor::plain(Direct, relation.generation_step().delta)
    }
    RelationType::AuntUncle => KinshipDescriptor::plain(Extended, 1),
    RelationType::NieceNephew => KinshipDescriptor::plain(Extended, -1),
    RelationType::Cousin => KinshipDescriptor::cousin(1, 0, 0),
    RelationType::Other(_) => KinshipDescriptor::plain(Other, 0),
  }
}

/// Pattern analysis for a multi-edge chain.
fn classify_chain(chain: &[RelationType]) -> KinshipDescriptor {
  let mut up_steps: u32 = 0;
  let mut down_steps: u32 = 0;
  let mut sibling_jumps: u32 = 0;
  let mut has_spouse = false;

  for relation in chain {
    let step = relation.generation_step();
    if step.delta > 0 {
      up_steps += step.delta.unsigned_abs();
    } else {
      down_steps += step.delta.unsigned_abs();
    }
    if step.implies_sibling || *relation == RelationType::Sibling {
      sibling_jumps += 1;
    }
    if *relation == RelationType::Spouse {
      has_spouse = true;
    }
  }

  // More than one sibling jump cannot reduce to a single common-ancestor
  // triangle; degrade rather than guess.
  if sibling_jumps > 1 {
    return KinshipDescriptor::plain(KinshipCategory::Other, chain.len() as i32);
  }

  let delta = up_steps as i32 - down_steps as i32;

  if has_spouse {
    return KinshipDescriptor::plain(KinshipCategory::InLaw, delta);
  }

  if sibling_jumps == 1 {
    return classify_sibling_line(up_steps, down_steps, delta);
  }

  // Direct line. delta == 0 here would mean a sibling-shaped chain with no
  // sibling flag, reachable only via malformed data; report it as the
  // sibling it arithmetically is.
  KinshipDescriptor::plain(KinshipCategory::Direct, delta)
}

/// The common-ancestor triangle: one sibling jump plus `up_steps` hops up
/// on the subject's side and `down_steps` hops down on the other side.
fn classify_sibling_line(
  up_steps: u32,
  down_steps: u32,
  delta: i32,
) -> KinshipDescriptor {
  match (up_steps, down_steps) {
    // Plain sibling: no generational movement.
    (0, 0) => KinshipDescriptor::plain(KinshipCategory::Direct, 0),
    // Aunt/uncle chain; level = up_steps - 1.
    (_, 0) => KinshipDescriptor::plain(KinshipCategory::Extended, delta),
    // Niece/nephew chain, symmetric.
    (0, _) => KinshipDescriptor::plain(KinshipCategory::Extended, delta),
    // Both sides populated: cousins.
    (up, down) => {
      KinshipDescriptor::cousin(up.min(down), up.abs_diff(down), delta)
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
