//! Relationship-edge typing — the vocabulary every other component speaks.
//!
//! A [`RelationType`] is the label on one directed edge of the family graph:
//! "the object of this fact is the subject's `<relation>`". The enum is
//! closed; strings that don't match any known form are carried verbatim in
//! [`RelationType::Other`], which inverts to itself and traverses as a
//! lateral edge. That keeps malformed upstream data walkable instead of
//! fatal — detection is the graph builder's job, via its warning channel.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

// ─── Direction ───────────────────────────────────────────────────────────────

/// Which way an edge moves between generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  /// Toward an ancestor.
  Up,
  /// Toward a descendant.
  Down,
  /// Same generation (sibling, spouse, cousin).
  Lateral,
}

impl Direction {
  /// The direction of the paired inverse edge.
  pub fn invert(self) -> Self {
    match self {
      Self::Up => Self::Down,
      Self::Down => Self::Up,
      Self::Lateral => Self::Lateral,
    }
  }
}

// ─── Generation step ─────────────────────────────────────────────────────────

/// The signed generational contribution of a single edge, plus whether the
/// edge implies a sibling jump (an aunt/uncle is "parent's sibling").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStep {
  pub delta:           i32,
  pub implies_sibling: bool,
}

impl GenerationStep {
  fn plain(delta: i32) -> Self {
    Self { delta, implies_sibling: false }
  }

  fn with_sibling(delta: i32) -> Self {
    Self { delta, implies_sibling: true }
  }
}

// ─── RelationType ────────────────────────────────────────────────────────────

/// The type of a directed relationship edge.
///
/// `GreatGrandparent(n)` / `GreatGrandchild(n)` count `great-` prefixes, so
/// `GreatGrandparent(2)` is a great-great-grandparent. Depth is parsed from
/// the string form rather than enumerated per level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationType {
  Parent,
  Child,
  Grandparent,
  Grandchild,
  /// `n ≥ 1` `great-` prefixes before `grandparent`.
  GreatGrandparent(u8),
  /// `n ≥ 1` `great-` prefixes before `grandchild`.
  GreatGrandchild(u8),
  Sibling,
  Spouse,
  Cousin,
  AuntUncle,
  NieceNephew,
  /// Anything unrecognised, carried verbatim. Self-inverse, lateral.
  Other(String),
}

impl RelationType {
  /// The type of the paired inverse edge. Exhaustive; `Other` maps to
  /// itself (permissive degrade for unknown vocabulary).
  pub fn inverse(&self) -> Self {
    match self {
      Self::Parent => Self::Child,
      Self::Child => Self::Parent,
      Self::Grandparent => Self::Grandchild,
      Self::Grandchild => Self::Grandparent,
      Self::GreatGrandparent(n) => Self::GreatGrandchild(*n),
      Self::GreatGrandchild(n) => Self::GreatGrandparent(*n),
      Self::Sibling => Self::Sibling,
      Self::Spouse => Self::Spouse,
      Self::Cousin => Self::Cousin,
      Self::AuntUncle => Self::NieceNephew,
      Self::NieceNephew => Self::AuntUncle,
      Self::Other(s) => Self::Other(s.clone()),
    }
  }

  /// The generational direction this edge moves in. Unknown types default
  /// to lateral.
  pub fn direction(&self) -> Direction {
    match self {
      Self::Parent
      | Self::Grandparent
      | Self::GreatGrandparent(_)
      | Self::AuntUncle => Direction::Up,
      Self::Child
      | Self::Grandchild
      | Self::GreatGrandchild(_)
      | Self::NieceNephew => Direction::Down,
      Self::Sibling | Self::Spouse | Self::Cousin | Self::Other(_) => {
        Direction::Lateral
      }
    }
  }

  /// The signed generation step this edge contributes to a chain.
  ///
  /// Aunt/uncle and niece/nephew carry the sibling-implied flag: an
  /// aunt/uncle edge is a parent edge plus a sibling jump.
  pub fn generation_step(&self) -> GenerationStep {
    match self {
      Self::Parent => GenerationStep::plain(1),
      Self::Grandparent => GenerationStep::plain(2),
      Self::GreatGrandparent(n) => GenerationStep::plain(2 + i32::from(*n)),
      Self::Child => GenerationStep::plain(-1),
      Self::Grandchild => GenerationStep::plain(-2),
      Self::GreatGrandchild(n) => GenerationStep::plain(-2 - i32::from(*n)),
      Self::AuntUncle => GenerationStep::with_sibling(1),
      Self::NieceNephew => GenerationStep::with_sibling(-1),
      Self::Sibling | Self::Spouse | Self::Cousin | Self::Other(_) => {
        GenerationStep::plain(0)
      }
    }
  }

}

// ─── String forms ────────────────────────────────────────────────────────────

impl fmt::Display for RelationType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Parent => f.write_str("parent"),
      Self::Child => f.write_str("child"),
      Self::Grandparent => f.write_str("grandparent"),
      Self::Grandchild => f.write_str("grandchild"),
      Self::GreatGrandparent(n) => {
        for _ in 0..*n {
          f.write_str("great-")?;
        }
        f.write_str("grandparent")
      }
      Self::GreatGrandchild(n) => {
        for _ in 0..*n {
          f.write_str("great-")?;
        }
        f.write_str("grandchild")
      }
      Self::Sibling => f.write_str("sibling"),
      Self::Spouse => f.write_str("spouse"),
      Self::Cousin => f.write_str("cousin"),
      Self::AuntUncle => f.write_str("aunt_uncle"),
      Self::NieceNephew => f.write_str("niece_nephew"),
      Self::Other(s) => f.write_str(s),
    }
  }
}

impl FromStr for RelationType {
  type Err = std::convert::Infallible;

  /// Parse the canonical string form. `aunt`, `uncle`, `niece` and `nephew`
  /// are accepted as aliases of the combined variants. Never fails — an
  /// unrecognised string becomes [`RelationType::Other`].
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized = s.trim().to_ascii_lowercase();

    // Strip repeated `great-` prefixes, counting them.
    let mut greats: u8 = 0;
    let mut rest = normalized.as_str();
    while let Some(stripped) = rest.strip_prefix("great-") {
      greats = greats.saturating_add(1);
      rest = stripped;
    }

    let parsed = match (rest, greats) {
      ("parent", 0) => Self::Parent,
      ("child", 0) => Self::Child,
      ("grandparent", 0) => Self::Grandparent,
      ("grandchild", 0) => Self::Grandchild,
      ("grandparent", n) => Self::GreatGrandparent(n),
      ("grandchild", n) => Self::GreatGrandchild(n),
      ("sibling", 0) => Self::Sibling,
      ("spouse", 0) => Self::Spouse,
      ("cousin", 0) => Self::Cousin,
      ("aunt" | "uncle" | "aunt_uncle", 0) => Self::AuntUncle,
      ("niece" | "nephew" | "niece_nephew", 0) => Self::NieceNephew,
      _ => Self::Other(normalized),
    };

    Ok(parsed)
  }
}

impl From<String> for RelationType {
  fn from(s: String) -> Self {
    s.parse().expect("RelationType parsing is infallible")
  }
}

impl From<RelationType> for String {
  fn from(r: RelationType) -> Self {
    r.to_string()
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
