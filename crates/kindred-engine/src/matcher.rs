//! The shared-ancestor matcher: surface un-connected relatives across the
//! population, ranked by closeness.
//!
//! Every read (subject ancestors, population cache, preferences, existing
//! facts, in-flight requests) completes before any filtering is applied.
//! Privacy is default-deny: a candidate with no opt-in record is excluded
//! even though an ancestor is shared.

use std::collections::{HashMap, HashSet, hash_map::Entry};

use kindred_core::{
  matching::MatchCandidate,
  store::{
    AncestorCacheStore, ConnectionRequestStore, PreferenceStore,
    RelationshipFactStore,
  },
};
use kindred_graph::DEFAULT_MAX_ANCESTOR_DEPTH;
use uuid::Uuid;

use crate::{Engine, Error, Result};

/// Parameters for [`Engine::find_potential_relatives`].
#[derive(Debug, Clone, Copy)]
pub struct MatchQuery {
  /// Maximum ancestor depth considered on either side.
  pub max_depth: u32,
  /// Maximum number of candidates returned.
  pub limit:     usize,
}

impl Default for MatchQuery {
  fn default() -> Self {
    Self { max_depth: DEFAULT_MAX_ANCESTOR_DEPTH, limit: 20 }
  }
}

impl<S> Engine<S>
where
  S: RelationshipFactStore
    + AncestorCacheStore
    + PreferenceStore
    + ConnectionRequestStore
    + Clone
    + Send
    + Sync
    + 'static,
{
  /// Find people who share an ancestor with `subject` but are not yet
  /// connected, closest kin first.
  ///
  /// When a pair shares several ancestors, only the closest pairing is
  /// kept (minimum closeness, tie broken by shallower candidate depth);
  /// weaker pairings are discarded, not merged. An empty result is a
  /// valid outcome, not an error.
  pub async fn find_potential_relatives(
    &self,
    subject: Uuid,
    query: MatchQuery,
  ) -> Result<Vec<MatchCandidate>> {
    let subject_rows =
      self.cached_ancestors(subject, Some(query.max_depth)).await?;
    if subject_rows.is_empty() {
      return Ok(Vec::new());
    }

    let mut subject_depths: HashMap<Uuid, u32> = HashMap::new();
    for row in &subject_rows {
      match subject_depths.entry(row.record.ancestor_id) {
        Entry::Occupied(mut e) => {
          let depth = (*e.get()).min(row.record.depth);
          e.insert(depth);
        }
        Entry::Vacant(e) => {
          e.insert(row.record.depth);
        }
      }
    }

    let ancestor_ids: Vec<Uuid> = subject_depths.keys().copied().collect();
    let shared = self
      .store
      .find_shared(ancestor_ids, query.max_depth, subject)
      .await
      .map_err(Error::store)?;
    if shared.is_empty() {
      return Ok(Vec::new());
    }

    let candidate_ids: Vec<Uuid> = shared
      .iter()
      .map(|row| row.person_id)
      .collect::<HashSet<_>>()
      .into_iter()
      .collect();

    let opted_in: HashSet<Uuid> = self
      .store
      .opted_in_subset(candidate_ids)
      .await
      .map_err(Error::store)?
      .into_iter()
      .collect();

    let connected: HashSet<Uuid> = self
      .store
      .connected_ids(subject)
      .await
      .map_err(Error::store)?
      .into_iter()
      .collect();

    let in_flight: HashSet<Uuid> = self
      .store
      .list_requests_for(subject)
      .await
      .map_err(Error::store)?
      .into_iter()
      .filter(|r| r.status.is_active())
      .map(|r| if r.from_id == subject { r.to_id } else { r.from_id })
      .collect();

    // All reads complete; filter, then keep the closest pairing per
    // candidate.
    let mut best: HashMap<Uuid, MatchCandidate> = HashMap::new();
    for row in shared {
      if row.person_id == subject
        || !opted_in.contains(&row.person_id)
        || connected.contains(&row.person_id)
        || in_flight.contains(&row.person_id)
      {
        continue;
      }
      let Some(subject_depth) = subject_depths.get(&row.ancestor_id).copied()
      else {
        continue;
      };

      let candidate = MatchCandidate::new(
        subject,
        row.person_id,
        row.ancestor_id,
        subject_depth,
        row.depth,
      );

      match best.entry(row.person_id) {
        Entry::Occupied(mut e) => {
          if closer(&candidate, e.get()) {
            e.insert(candidate);
          }
        }
        Entry::Vacant(e) => {
          e.insert(candidate);
        }
      }
    }

    let mut candidates: Vec<MatchCandidate> = best.into_values().collect();
    candidates.sort_by(|a, b| {
      a.closeness
        .cmp(&b.closeness)
        .then(a.candidate_depth.cmp(&b.candidate_depth))
        .then(a.candidate_id.cmp(&b.candidate_id))
    });
    candidates.truncate(query.limit);
    Ok(candidates)
  }
}

fn closer(a: &MatchCandidate, b: &MatchCandidate) -> bool {
  (a.closeness, a.candidate_depth) < (b.closeness, b.candidate_depth)
}
