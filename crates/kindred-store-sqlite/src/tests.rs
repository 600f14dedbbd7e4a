//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::Utc;
use kindred_core::{
  ancestry::AncestorRecord,
  fact::{NewRelationshipFact, ParentPair},
  person::NewPerson,
  relation::RelationType,
  request::{ConnectionRequest, RequestStatus},
  store::{
    AncestorCacheStore, ConnectionRequestStore, PreferenceStore, ProfileStore,
    RelationshipFactStore,
  },
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn named(first_name: &str) -> NewPerson {
  NewPerson {
    first_name: Some(first_name.to_owned()),
    ..Default::default()
  }
}

fn pending_request(from: Uuid, to: Uuid) -> ConnectionRequest {
  ConnectionRequest {
    request_id:         Uuid::new_v4(),
    from_id:            from,
    to_id:              to,
    shared_ancestor_id: None,
    status:             RequestStatus::Pending,
    created_at:         Utc::now(),
    responded_at:       None,
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_person() {
  let s = store().await;

  let person = s.add_person(named("Ada")).await.unwrap();
  assert!(!person.placeholder);

  let fetched = s.get_person(person.person_id).await.unwrap().unwrap();
  assert_eq!(fetched.person_id, person.person_id);
  assert_eq!(fetched.first_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn ensure_person_creates_a_placeholder_once() {
  let s = store().await;
  let id = Uuid::new_v4();

  let created = s.ensure_person(id).await.unwrap();
  assert!(created.placeholder);
  assert_eq!(created.person_id, id);

  // Idempotent: a second call returns the same row.
  let again = s.ensure_person(id).await.unwrap();
  assert_eq!(again.created_at, created.created_at);

  assert_eq!(s.list_people().await.unwrap().len(), 1);
}

#[tokio::test]
async fn ensure_person_leaves_existing_profiles_untouched() {
  let s = store().await;
  let person = s.add_person(named("Ada")).await.unwrap();

  let ensured = s.ensure_person(person.person_id).await.unwrap();
  assert!(!ensured.placeholder);
  assert_eq!(ensured.first_name.as_deref(), Some("Ada"));
}

// ─── Relationship facts ──────────────────────────────────────────────────────

#[tokio::test]
async fn record_and_read_facts() {
  let s = store().await;
  let a = s.add_person(named("Ada")).await.unwrap().person_id;
  let b = s.add_person(named("Ben")).await.unwrap().person_id;

  let fact = s
    .record_fact(NewRelationshipFact::new(a, b, RelationType::Parent))
    .await
    .unwrap();
  assert_eq!(fact.relation, RelationType::Parent);

  let for_a = s.facts_for(a).await.unwrap();
  let for_b = s.facts_for(b).await.unwrap();
  assert_eq!(for_a.len(), 1);
  // The object sees the same stored fact; the inverse edge is a graph-time
  // construct, never a second row.
  assert_eq!(for_b.len(), 1);
  assert_eq!(for_a[0].fact_id, for_b[0].fact_id);

  assert_eq!(s.all_facts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn record_fact_creates_placeholder_endpoints() {
  let s = store().await;
  let a = s.add_person(named("Ada")).await.unwrap().person_id;
  let unknown_relative = Uuid::new_v4();

  s.record_fact(NewRelationshipFact::new(
    a,
    unknown_relative,
    RelationType::Parent,
  ))
  .await
  .unwrap();

  let placeholder = s.get_person(unknown_relative).await.unwrap().unwrap();
  assert!(placeholder.placeholder);
}

#[tokio::test]
async fn unknown_relation_strings_round_trip() {
  let s = store().await;
  let a = s.add_person(named("Ada")).await.unwrap().person_id;
  let b = s.add_person(named("Ben")).await.unwrap().person_id;

  s.record_fact(NewRelationshipFact::new(
    a,
    b,
    RelationType::Other("godparent".into()),
  ))
  .await
  .unwrap();

  let facts = s.facts_for(a).await.unwrap();
  assert_eq!(facts[0].relation, RelationType::Other("godparent".into()));
}

#[tokio::test]
async fn parent_pairs_normalise_both_orientations() {
  let s = store().await;
  let child = s.add_person(named("Ada")).await.unwrap().person_id;
  let mother = s.add_person(named("Mia")).await.unwrap().person_id;
  let father = s.add_person(named("Fin")).await.unwrap().person_id;

  // "mother is child's parent" and "child is father's child".
  s.record_fact(NewRelationshipFact::new(child, mother, RelationType::Parent))
    .await
    .unwrap();
  s.record_fact(NewRelationshipFact::new(father, child, RelationType::Child))
    .await
    .unwrap();
  // Lateral facts never become parent pairs.
  s.record_fact(NewRelationshipFact::new(mother, father, RelationType::Spouse))
    .await
    .unwrap();

  let mut pairs = s.parent_pairs().await.unwrap();
  pairs.sort_by_key(|p| p.parent);
  let mut expected = vec![
    ParentPair { child, parent: mother },
    ParentPair { child, parent: father },
  ];
  expected.sort_by_key(|p| p.parent);
  assert_eq!(pairs, expected);
}

#[tokio::test]
async fn connected_ids_cover_both_directions() {
  let s = store().await;
  let a = s.add_person(named("Ada")).await.unwrap().person_id;
  let b = s.add_person(named("Ben")).await.unwrap().person_id;
  let c = s.add_person(named("Cleo")).await.unwrap().person_id;

  s.record_fact(NewRelationshipFact::new(a, b, RelationType::Sibling))
    .await
    .unwrap();
  s.record_fact(NewRelationshipFact::new(c, a, RelationType::Cousin))
    .await
    .unwrap();

  let mut connected = s.connected_ids(a).await.unwrap();
  connected.sort();
  let mut expected = vec![b, c];
  expected.sort();
  assert_eq!(connected, expected);
}

// ─── Ancestor cache ──────────────────────────────────────────────────────────

fn record(person: Uuid, ancestor: Uuid, depth: u32) -> AncestorRecord {
  AncestorRecord {
    descendant_id: person,
    ancestor_id:   ancestor,
    depth,
    path:          Vec::new(),
  }
}

#[tokio::test]
async fn replace_then_read_ancestors() {
  let s = store().await;
  let person = Uuid::new_v4();
  let (x, y) = (Uuid::new_v4(), Uuid::new_v4());

  let written = s
    .replace_ancestors(person, vec![record(person, x, 1), record(person, y, 2)])
    .await
    .unwrap();
  assert_eq!(written, 2);

  let rows = s.ancestors_of(person, 6).await.unwrap();
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0].record.depth, 1);
  assert_eq!(rows[1].record.depth, 2);
}

#[tokio::test]
async fn replace_is_delete_then_insert() {
  let s = store().await;
  let person = Uuid::new_v4();
  let old = Uuid::new_v4();
  let new = Uuid::new_v4();

  s.replace_ancestors(person, vec![record(person, old, 3)])
    .await
    .unwrap();
  s.replace_ancestors(person, vec![record(person, new, 1)])
    .await
    .unwrap();

  let rows = s.ancestors_of(person, 6).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].record.ancestor_id, new);
}

#[tokio::test]
async fn replace_with_no_records_clears_the_cache() {
  let s = store().await;
  let person = Uuid::new_v4();

  s.replace_ancestors(person, vec![record(person, Uuid::new_v4(), 2)])
    .await
    .unwrap();
  let written = s.replace_ancestors(person, Vec::new()).await.unwrap();
  assert_eq!(written, 0);
  assert!(s.ancestors_of(person, 6).await.unwrap().is_empty());
}

#[tokio::test]
async fn ancestor_paths_round_trip() {
  let s = store().await;
  let person = Uuid::new_v4();
  let ancestor = Uuid::new_v4();
  let via = vec![Uuid::new_v4(), Uuid::new_v4()];

  s.replace_ancestors(
    person,
    vec![AncestorRecord {
      descendant_id: person,
      ancestor_id:   ancestor,
      depth:         3,
      path:          via.clone(),
    }],
  )
  .await
  .unwrap();

  let rows = s.ancestors_of(person, 6).await.unwrap();
  assert_eq!(rows[0].record.path, via);
}

#[tokio::test]
async fn find_shared_applies_depth_bound_and_exclusion() {
  let s = store().await;
  let subject = Uuid::new_v4();
  let near = Uuid::new_v4();
  let deep = Uuid::new_v4();
  let ancestor = Uuid::new_v4();

  s.replace_ancestors(subject, vec![record(subject, ancestor, 1)])
    .await
    .unwrap();
  s.replace_ancestors(near, vec![record(near, ancestor, 2)])
    .await
    .unwrap();
  s.replace_ancestors(deep, vec![record(deep, ancestor, 5)])
    .await
    .unwrap();

  let rows = s.find_shared(vec![ancestor], 3, subject).await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].person_id, near);
  assert_eq!(rows[0].depth, 2);

  // The subject's own rows never come back.
  let rows = s.find_shared(vec![ancestor], 6, subject).await.unwrap();
  assert!(rows.iter().all(|r| r.person_id != subject));

  // No ancestors, no query.
  assert!(s.find_shared(Vec::new(), 6, subject).await.unwrap().is_empty());
}

// ─── Matching preferences ────────────────────────────────────────────────────

#[tokio::test]
async fn missing_preference_reads_as_opted_out() {
  let s = store().await;
  assert!(!s.matching_opt_in(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn set_and_flip_the_opt_in_flag() {
  let s = store().await;
  let person = Uuid::new_v4();

  s.set_matching_opt_in(person, true).await.unwrap();
  assert!(s.matching_opt_in(person).await.unwrap());

  s.set_matching_opt_in(person, false).await.unwrap();
  assert!(!s.matching_opt_in(person).await.unwrap());
}

#[tokio::test]
async fn opted_in_subset_filters_strictly() {
  let s = store().await;
  let yes = Uuid::new_v4();
  let no = Uuid::new_v4();
  let absent = Uuid::new_v4();

  s.set_matching_opt_in(yes, true).await.unwrap();
  s.set_matching_opt_in(no, false).await.unwrap();

  let subset = s.opted_in_subset(vec![yes, no, absent]).await.unwrap();
  assert_eq!(subset, vec![yes]);

  assert!(s.opted_in_subset(Vec::new()).await.unwrap().is_empty());
}

// ─── Connection requests ─────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_request() {
  let s = store().await;
  let request = pending_request(Uuid::new_v4(), Uuid::new_v4());

  s.insert_request(request.clone()).await.unwrap();

  let fetched = s.get_request(request.request_id).await.unwrap().unwrap();
  assert_eq!(fetched.from_id, request.from_id);
  assert_eq!(fetched.status, RequestStatus::Pending);
  assert!(fetched.responded_at.is_none());
}

#[tokio::test]
async fn update_request_status_stamps_the_response() {
  let s = store().await;
  let request = pending_request(Uuid::new_v4(), Uuid::new_v4());
  s.insert_request(request.clone()).await.unwrap();

  let responded_at = Utc::now();
  s.update_request_status(
    request.request_id,
    RequestStatus::Accepted,
    responded_at,
  )
  .await
  .unwrap();

  let fetched = s.get_request(request.request_id).await.unwrap().unwrap();
  assert_eq!(fetched.status, RequestStatus::Accepted);
  assert!(fetched.responded_at.is_some());
}

#[tokio::test]
async fn update_unknown_request_errors() {
  let s = store().await;
  let err = s
    .update_request_status(Uuid::new_v4(), RequestStatus::Declined, Utc::now())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::RequestNotFound(_)));
}

#[tokio::test]
async fn active_between_matches_either_direction() {
  let s = store().await;
  let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
  let request = pending_request(a, b);
  s.insert_request(request.clone()).await.unwrap();

  assert!(s.active_between(a, b).await.unwrap().is_some());
  assert!(s.active_between(b, a).await.unwrap().is_some());
  assert!(s.active_between(a, Uuid::new_v4()).await.unwrap().is_none());

  // Terminal-but-inactive states stop matching.
  s.update_request_status(
    request.request_id,
    RequestStatus::Cancelled,
    Utc::now(),
  )
  .await
  .unwrap();
  assert!(s.active_between(a, b).await.unwrap().is_none());
}

#[tokio::test]
async fn accepted_requests_stay_active() {
  let s = store().await;
  let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
  let request = pending_request(a, b);
  s.insert_request(request.clone()).await.unwrap();

  s.update_request_status(
    request.request_id,
    RequestStatus::Accepted,
    Utc::now(),
  )
  .await
  .unwrap();
  assert!(s.active_between(b, a).await.unwrap().is_some());
}

#[tokio::test]
async fn list_and_count_requests() {
  let s = store().await;
  let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

  s.insert_request(pending_request(b, a)).await.unwrap();
  s.insert_request(pending_request(c, a)).await.unwrap();
  s.insert_request(pending_request(a, c)).await.unwrap();

  assert_eq!(s.list_requests_for(a).await.unwrap().len(), 3);
  assert_eq!(s.list_requests_for(b).await.unwrap().len(), 1);

  // Pending counts are incoming-only.
  assert_eq!(s.count_pending(a).await.unwrap(), 2);
  assert_eq!(s.count_pending(c).await.unwrap(), 1);
  assert_eq!(s.count_pending(b).await.unwrap(), 0);
}
