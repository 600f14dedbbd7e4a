//! The two-tier ancestor cache: explicit refresh vs read-through.
//!
//! `refresh_ancestors` is the deterministic tier — recompute from facts and
//! replace every row. `cached_ancestors` is the fast tier — serve whatever
//! is stored, and on a miss compute on demand while a background refresh
//! populates the cache for next time. The cache is allowed to be
//! momentarily stale; callers needing guaranteed freshness call `refresh`
//! and await it.

use chrono::Utc;
use kindred_core::{
  ancestry::CachedAncestor,
  store::{AncestorCacheStore, RelationshipFactStore},
};
use kindred_graph::{AncestorScan, enumerate_ancestors, parent_map};
use uuid::Uuid;

use crate::{Engine, Error, Result};

impl<S> Engine<S>
where
  S: RelationshipFactStore
    + AncestorCacheStore
    + Clone
    + Send
    + Sync
    + 'static,
{
  /// Fully recompute and replace the cache rows for `person`
  /// (delete-then-insert). Returns the number of rows written.
  ///
  /// Concurrent refreshes of the same person are safe under
  /// last-writer-wins: each replacement is wholesale and idempotent given
  /// the same facts.
  pub async fn refresh_ancestors(
    &self,
    person: Uuid,
    max_depth: Option<u32>,
  ) -> Result<usize> {
    let scan = self.scan_ancestors(person, max_depth).await?;
    self
      .store
      .replace_ancestors(person, scan.records)
      .await
      .map_err(Error::store)
  }

  /// Cached ancestor rows for `person`, shallowest first.
  ///
  /// On a miss the result is computed on demand from the fact store and a
  /// background refresh is spawned (fire-and-forget) so the next read hits
  /// the cache. Errors inside the spawned refresh are logged, never
  /// propagated.
  pub async fn cached_ancestors(
    &self,
    person: Uuid,
    max_depth: Option<u32>,
  ) -> Result<Vec<CachedAncestor>> {
    let depth = max_depth.unwrap_or(self.ancestor_depth);

    let rows = self
      .store
      .ancestors_of(person, depth)
      .await
      .map_err(Error::store)?;
    if !rows.is_empty() {
      return Ok(rows);
    }

    let scan = self.scan_ancestors(person, Some(depth)).await?;

    let engine = self.clone();
    tokio::spawn(async move {
      if let Err(e) = engine.refresh_ancestors(person, Some(depth)).await {
        tracing::warn!(
          person = %person,
          error = %e,
          "background ancestor cache refresh failed"
        );
      }
    });

    let computed_at = Utc::now();
    Ok(
      scan
        .records
        .into_iter()
        .map(|record| CachedAncestor { record, computed_at })
        .collect(),
    )
  }

  /// Load parent pairs and run the pure enumerator, logging pruned
  /// branches as the data-quality signal they are.
  async fn scan_ancestors(
    &self,
    person: Uuid,
    max_depth: Option<u32>,
  ) -> Result<AncestorScan> {
    let depth = max_depth.unwrap_or(self.ancestor_depth);
    let pairs = self.store.parent_pairs().await.map_err(Error::store)?;
    let map = parent_map(&pairs);

    let scan = enumerate_ancestors(person, depth, &map);
    if scan.pruned_branches > 0 {
      tracing::warn!(
        person = %person,
        pruned = scan.pruned_branches,
        "ancestor traversal pruned revisited branches"
      );
    }
    Ok(scan)
  }
}
