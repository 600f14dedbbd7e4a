//! [`SqliteStore`] — the SQLite implementation of every Kindred store trait.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use kindred_core::{
  ancestry::{AncestorRecord, CachedAncestor, SharedAncestorRow},
  fact::{NewRelationshipFact, ParentPair, RelationshipFact},
  matching::MatchPreference,
  person::{NewPerson, Person},
  relation::RelationType,
  request::{ConnectionRequest, RequestStatus},
  store::{
    AncestorCacheStore, ConnectionRequestStore, PreferenceStore, ProfileStore,
    RelationshipFactStore,
  },
};

use crate::{
  Error, Result,
  encode::{
    RawCachedAncestor, RawFact, RawPerson, RawPreference, RawRequest,
    decode_uuid, encode_dt, encode_path, encode_relation, encode_status,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Kindred store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`Person`]. With `or_ignore`, an existing row for
  /// the same id is left untouched (placeholder upsert).
  async fn insert_person_row(
    &self,
    person: &Person,
    or_ignore: bool,
  ) -> Result<()> {
    let id_str = encode_uuid(person.person_id);
    let first = person.first_name.clone();
    let last = person.last_name.clone();
    let gender = person.gender.clone();
    let avatar = person.avatar.clone();
    let placeholder = person.placeholder;
    let at_str = encode_dt(person.created_at);

    let verb = if or_ignore { "INSERT OR IGNORE" } else { "INSERT" };
    let sql = format!(
      "{verb} INTO persons
         (person_id, first_name, last_name, gender, avatar, placeholder, created_at)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &sql,
          rusqlite::params![
            id_str,
            first,
            last,
            gender,
            avatar,
            placeholder,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ProfileStore impl ───────────────────────────────────────────────────────

impl ProfileStore for SqliteStore {
  type Error = Error;

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let person = Person {
      person_id:   Uuid::new_v4(),
      first_name:  input.first_name,
      last_name:   input.last_name,
      gender:      input.gender,
      avatar:      input.avatar,
      placeholder: false,
      created_at:  Utc::now(),
    };

    self.insert_person_row(&person, false).await?;
    Ok(person)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT person_id, first_name, last_name, gender, avatar,
                      placeholder, created_at
               FROM persons WHERE person_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawPerson {
                  person_id:   row.get(0)?,
                  first_name:  row.get(1)?,
                  last_name:   row.get(2)?,
                  gender:      row.get(3)?,
                  avatar:      row.get(4)?,
                  placeholder: row.get(5)?,
                  created_at:  row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_people(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT person_id, first_name, last_name, gender, avatar,
                  placeholder, created_at
           FROM persons ORDER BY created_at",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawPerson {
              person_id:   row.get(0)?,
              first_name:  row.get(1)?,
              last_name:   row.get(2)?,
              gender:      row.get(3)?,
              avatar:      row.get(4)?,
              placeholder: row.get(5)?,
              created_at:  row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn ensure_person(&self, id: Uuid) -> Result<Person> {
    if let Some(existing) = self.get_person(id).await? {
      return Ok(existing);
    }

    let placeholder = Person {
      person_id:   id,
      first_name:  None,
      last_name:   None,
      gender:      None,
      avatar:      None,
      placeholder: true,
      created_at:  Utc::now(),
    };

    // OR IGNORE keeps a concurrently-inserted row authoritative.
    self.insert_person_row(&placeholder, true).await?;
    Ok(self.get_person(id).await?.unwrap_or(placeholder))
  }

  async fn person_ids(&self) -> Result<Vec<Uuid>> {
    let id_strs: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT person_id FROM persons")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    id_strs
      .iter()
      .map(|s| decode_uuid(s))
      .collect()
  }
}

// ─── RelationshipFactStore impl ──────────────────────────────────────────────

impl RelationshipFactStore for SqliteStore {
  type Error = Error;

  async fn record_fact(
    &self,
    input: NewRelationshipFact,
  ) -> Result<RelationshipFact> {
    // Both endpoints must have a persons row; a relative who never
    // onboarded gets a placeholder so traversal and foreign keys hold.
    self.ensure_person(input.subject_id).await?;
    self.ensure_person(input.object_id).await?;

    let fact = RelationshipFact {
      fact_id:     Uuid::new_v4(),
      subject_id:  input.subject_id,
      object_id:   input.object_id,
      relation:    input.relation,
      recorded_at: Utc::now(),
    };

    let fact_id_str = encode_uuid(fact.fact_id);
    let subject_str = encode_uuid(fact.subject_id);
    let object_str = encode_uuid(fact.object_id);
    let relation_str = encode_relation(&fact.relation);
    let at_str = encode_dt(fact.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO relationship_facts
             (fact_id, subject_id, object_id, relation, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            fact_id_str,
            subject_str,
            object_str,
            relation_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(fact)
  }

  async fn facts_for(&self, person: Uuid) -> Result<Vec<RelationshipFact>> {
    let person_str = encode_uuid(person);

    let raws: Vec<RawFact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT fact_id, subject_id, object_id, relation, recorded_at
           FROM relationship_facts
           WHERE subject_id = ?1 OR object_id = ?1
           ORDER BY recorded_at",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![person_str], |row| {
            Ok(RawFact {
              fact_id:     row.get(0)?,
              subject_id:  row.get(1)?,
              object_id:   row.get(2)?,
              relation:    row.get(3)?,
              recorded_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFact::into_fact).collect()
  }

  async fn all_facts(&self) -> Result<Vec<RelationshipFact>> {
    let raws: Vec<RawFact> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT fact_id, subject_id, object_id, relation, recorded_at
           FROM relationship_facts ORDER BY recorded_at",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawFact {
              fact_id:     row.get(0)?,
              subject_id:  row.get(1)?,
              object_id:   row.get(2)?,
              relation:    row.get(3)?,
              recorded_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFact::into_fact).collect()
  }

  async fn parent_pairs(&self) -> Result<Vec<ParentPair>> {
    let parent_str = encode_relation(&RelationType::Parent);
    let child_str = encode_relation(&RelationType::Child);

    let rows: Vec<(String, String, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT subject_id, object_id, relation
           FROM relationship_facts
           WHERE relation = ?1 OR relation = ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![parent_str, child_str], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(subject, object, relation)| {
        let subject = decode_uuid(&subject)?;
        let object = decode_uuid(&object)?;
        // "object is subject's parent" vs "object is subject's child".
        let pair = if relation == "parent" {
          ParentPair { child: subject, parent: object }
        } else {
          ParentPair { child: object, parent: subject }
        };
        Ok(pair)
      })
      .collect()
  }

  async fn connected_ids(&self, person: Uuid) -> Result<Vec<Uuid>> {
    let person_str = encode_uuid(person);

    let id_strs: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT object_id FROM relationship_facts
             WHERE subject_id = ?1
           UNION
           SELECT DISTINCT subject_id FROM relationship_facts
             WHERE object_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![person_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    id_strs
      .iter()
      .map(|s| decode_uuid(s))
      .collect()
  }
}

// ─── AncestorCacheStore impl ─────────────────────────────────────────────────

impl AncestorCacheStore for SqliteStore {
  type Error = Error;

  async fn replace_ancestors(
    &self,
    person: Uuid,
    records: Vec<AncestorRecord>,
  ) -> Result<usize> {
    let person_str = encode_uuid(person);
    let computed_str = encode_dt(Utc::now());

    // Encode outside the connection closure so serialisation errors
    // surface before any row is deleted.
    let rows: Vec<(String, u32, String)> = records
      .iter()
      .map(|r| {
        Ok((encode_uuid(r.ancestor_id), r.depth, encode_path(&r.path)?))
      })
      .collect::<Result<_>>()?;
    let count = rows.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM ancestor_cache WHERE person_id = ?1",
          rusqlite::params![person_str],
        )?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO ancestor_cache
               (person_id, ancestor_id, depth, path, computed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for (ancestor_str, depth, path_str) in &rows {
            stmt.execute(rusqlite::params![
              person_str,
              ancestor_str,
              depth,
              path_str,
              computed_str,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(count)
  }

  async fn ancestors_of(
    &self,
    person: Uuid,
    max_depth: u32,
  ) -> Result<Vec<CachedAncestor>> {
    let person_str = encode_uuid(person);

    let raws: Vec<RawCachedAncestor> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT person_id, ancestor_id, depth, path, computed_at
           FROM ancestor_cache
           WHERE person_id = ?1 AND depth <= ?2
           ORDER BY depth, ancestor_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![person_str, max_depth], |row| {
            Ok(RawCachedAncestor {
              person_id:   row.get(0)?,
              ancestor_id: row.get(1)?,
              depth:       row.get(2)?,
              path:        row.get(3)?,
              computed_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCachedAncestor::into_cached).collect()
  }

  async fn find_shared(
    &self,
    ancestor_ids: Vec<Uuid>,
    max_depth: u32,
    exclude: Uuid,
  ) -> Result<Vec<SharedAncestorRow>> {
    if ancestor_ids.is_empty() {
      return Ok(Vec::new());
    }

    let exclude_str = encode_uuid(exclude);
    let id_strs: Vec<String> =
      ancestor_ids.iter().copied().map(encode_uuid).collect();
    let placeholders =
      std::iter::repeat_n("?", id_strs.len()).collect::<Vec<_>>().join(", ");

    // max_depth interpolates directly; it is a bare integer, never text.
    let sql = format!(
      "SELECT person_id, ancestor_id, depth
       FROM ancestor_cache
       WHERE depth <= {max_depth}
         AND person_id != ?
         AND ancestor_id IN ({placeholders})
       ORDER BY depth, person_id"
    );

    let rows: Vec<(String, String, u32)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let params = std::iter::once(exclude_str).chain(id_strs);
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(person, ancestor, depth)| {
        Ok(SharedAncestorRow {
          person_id:   decode_uuid(&person)?,
          ancestor_id: decode_uuid(&ancestor)?,
          depth,
        })
      })
      .collect()
  }
}

// ─── PreferenceStore impl ────────────────────────────────────────────────────

impl PreferenceStore for SqliteStore {
  type Error = Error;

  async fn set_matching_opt_in(
    &self,
    person: Uuid,
    opt_in: bool,
  ) -> Result<MatchPreference> {
    let preference = MatchPreference {
      person_id:       person,
      matching_opt_in: opt_in,
      updated_at:      Utc::now(),
    };

    let person_str = encode_uuid(person);
    let at_str = encode_dt(preference.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO match_preferences (person_id, matching_opt_in, updated_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT (person_id) DO UPDATE SET
             matching_opt_in = excluded.matching_opt_in,
             updated_at      = excluded.updated_at",
          rusqlite::params![person_str, opt_in, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(preference)
  }

  async fn matching_opt_in(&self, person: Uuid) -> Result<bool> {
    let person_str = encode_uuid(person);

    let raw: Option<RawPreference> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT person_id, matching_opt_in, updated_at
               FROM match_preferences WHERE person_id = ?1",
              rusqlite::params![person_str],
              |row| {
                Ok(RawPreference {
                  person_id:       row.get(0)?,
                  matching_opt_in: row.get(1)?,
                  updated_at:      row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    // No record means opted out: matching is default-deny.
    Ok(raw.map(|p| p.matching_opt_in).unwrap_or(false))
  }

  async fn opted_in_subset(&self, ids: Vec<Uuid>) -> Result<Vec<Uuid>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();
    let placeholders =
      std::iter::repeat_n("?", id_strs.len()).collect::<Vec<_>>().join(", ");
    let sql = format!(
      "SELECT person_id FROM match_preferences
       WHERE matching_opt_in = 1 AND person_id IN ({placeholders})"
    );

    let rows: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(id_strs), |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.iter().map(|s| decode_uuid(s)).collect()
  }
}

// ─── ConnectionRequestStore impl ─────────────────────────────────────────────

impl ConnectionRequestStore for SqliteStore {
  type Error = Error;

  async fn insert_request(&self, request: ConnectionRequest) -> Result<()> {
    let id_str = encode_uuid(request.request_id);
    let from_str = encode_uuid(request.from_id);
    let to_str = encode_uuid(request.to_id);
    let ancestor_str = request.shared_ancestor_id.map(encode_uuid);
    let status_str = encode_status(request.status).to_owned();
    let created_str = encode_dt(request.created_at);
    let responded_str = request.responded_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO connection_requests
             (request_id, from_id, to_id, shared_ancestor_id, status,
              created_at, responded_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            from_str,
            to_str,
            ancestor_str,
            status_str,
            created_str,
            responded_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_request(&self, id: Uuid) -> Result<Option<ConnectionRequest>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRequest> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT request_id, from_id, to_id, shared_ancestor_id,
                      status, created_at, responded_at
               FROM connection_requests WHERE request_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawRequest {
                  request_id:         row.get(0)?,
                  from_id:            row.get(1)?,
                  to_id:              row.get(2)?,
                  shared_ancestor_id: row.get(3)?,
                  status:             row.get(4)?,
                  created_at:         row.get(5)?,
                  responded_at:       row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRequest::into_request).transpose()
  }

  async fn update_request_status(
    &self,
    id: Uuid,
    status: RequestStatus,
    responded_at: chrono::DateTime<Utc>,
  ) -> Result<()> {
    let id_str = encode_uuid(id);
    let status_str = encode_status(status).to_owned();
    let at_str = encode_dt(responded_at);

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE connection_requests
           SET status = ?2, responded_at = ?3
           WHERE request_id = ?1",
          rusqlite::params![id_str, status_str, at_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::RequestNotFound(id));
    }
    Ok(())
  }

  async fn list_requests_for(
    &self,
    person: Uuid,
  ) -> Result<Vec<ConnectionRequest>> {
    let person_str = encode_uuid(person);

    let raws: Vec<RawRequest> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT request_id, from_id, to_id, shared_ancestor_id,
                  status, created_at, responded_at
           FROM connection_requests
           WHERE from_id = ?1 OR to_id = ?1
           ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![person_str], |row| {
            Ok(RawRequest {
              request_id:         row.get(0)?,
              from_id:            row.get(1)?,
              to_id:              row.get(2)?,
              shared_ancestor_id: row.get(3)?,
              status:             row.get(4)?,
              created_at:         row.get(5)?,
              responded_at:       row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRequest::into_request).collect()
  }

  async fn active_between(
    &self,
    a: Uuid,
    b: Uuid,
  ) -> Result<Option<ConnectionRequest>> {
    let a_str = encode_uuid(a);
    let b_str = encode_uuid(b);

    let raw: Option<RawRequest> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT request_id, from_id, to_id, shared_ancestor_id,
                      status, created_at, responded_at
               FROM connection_requests
               WHERE ((from_id = ?1 AND to_id = ?2)
                   OR (from_id = ?2 AND to_id = ?1))
                 AND status IN ('pending', 'accepted')
               LIMIT 1",
              rusqlite::params![a_str, b_str],
              |row| {
                Ok(RawRequest {
                  request_id:         row.get(0)?,
                  from_id:            row.get(1)?,
                  to_id:              row.get(2)?,
                  shared_ancestor_id: row.get(3)?,
                  status:             row.get(4)?,
                  created_at:         row.get(5)?,
                  responded_at:       row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRequest::into_request).transpose()
  }

  async fn count_pending(&self, person: Uuid) -> Result<usize> {
    let person_str = encode_uuid(person);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM connection_requests
           WHERE to_id = ?1 AND status = 'pending'",
          rusqlite::params![person_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as usize)
  }
}
