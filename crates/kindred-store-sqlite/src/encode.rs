//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Relation types use their
//! canonical string form; ancestor paths are compact JSON arrays of ids.
//! UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use kindred_core::{
  ancestry::{AncestorRecord, CachedAncestor},
  fact::RelationshipFact,
  matching::MatchPreference,
  person::Person,
  relation::RelationType,
  request::{ConnectionRequest, RequestStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── RelationType ────────────────────────────────────────────────────────────

pub fn encode_relation(r: &RelationType) -> String {
  r.to_string()
}

/// Never fails: unrecognised strings decode to [`RelationType::Other`].
pub fn decode_relation(s: &str) -> RelationType {
  s.parse().expect("RelationType parsing is infallible")
}

// ─── RequestStatus ───────────────────────────────────────────────────────────

pub fn encode_status(s: RequestStatus) -> &'static str {
  match s {
    RequestStatus::Pending => "pending",
    RequestStatus::Accepted => "accepted",
    RequestStatus::Declined => "declined",
    RequestStatus::Cancelled => "cancelled",
  }
}

pub fn decode_status(s: &str) -> Result<RequestStatus> {
  match s {
    "pending" => Ok(RequestStatus::Pending),
    "accepted" => Ok(RequestStatus::Accepted),
    "declined" => Ok(RequestStatus::Declined),
    "cancelled" => Ok(RequestStatus::Cancelled),
    other => Err(Error::UnknownStatus(other.to_owned())),
  }
}

// ─── Ancestor path ───────────────────────────────────────────────────────────

pub fn encode_path(path: &[Uuid]) -> Result<String> {
  Ok(serde_json::to_string(path)?)
}

pub fn decode_path(s: &str) -> Result<Vec<Uuid>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:   String,
  pub first_name:  Option<String>,
  pub last_name:   Option<String>,
  pub gender:      Option<String>,
  pub avatar:      Option<String>,
  pub placeholder: bool,
  pub created_at:  String,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:   decode_uuid(&self.person_id)?,
      first_name:  self.first_name,
      last_name:   self.last_name,
      gender:      self.gender,
      avatar:      self.avatar,
      placeholder: self.placeholder,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `relationship_facts` row.
pub struct RawFact {
  pub fact_id:     String,
  pub subject_id:  String,
  pub object_id:   String,
  pub relation:    String,
  pub recorded_at: String,
}

impl RawFact {
  pub fn into_fact(self) -> Result<RelationshipFact> {
    Ok(RelationshipFact {
      fact_id:     decode_uuid(&self.fact_id)?,
      subject_id:  decode_uuid(&self.subject_id)?,
      object_id:   decode_uuid(&self.object_id)?,
      relation:    decode_relation(&self.relation),
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw strings read directly from an `ancestor_cache` row.
pub struct RawCachedAncestor {
  pub person_id:   String,
  pub ancestor_id: String,
  pub depth:       u32,
  pub path:        String,
  pub computed_at: String,
}

impl RawCachedAncestor {
  pub fn into_cached(self) -> Result<CachedAncestor> {
    Ok(CachedAncestor {
      record:      AncestorRecord {
        descendant_id: decode_uuid(&self.person_id)?,
        ancestor_id:   decode_uuid(&self.ancestor_id)?,
        depth:         self.depth,
        path:          decode_path(&self.path)?,
      },
      computed_at: decode_dt(&self.computed_at)?,
    })
  }
}

/// Raw strings read directly from a `match_preferences` row.
pub struct RawPreference {
  pub person_id:       String,
  pub matching_opt_in: bool,
  pub updated_at:      String,
}

impl RawPreference {
  pub fn into_preference(self) -> Result<MatchPreference> {
    Ok(MatchPreference {
      person_id:       decode_uuid(&self.person_id)?,
      matching_opt_in: self.matching_opt_in,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `connection_requests` row.
pub struct RawRequest {
  pub request_id:         String,
  pub from_id:            String,
  pub to_id:              String,
  pub shared_ancestor_id: Option<String>,
  pub status:             String,
  pub created_at:         String,
  pub responded_at:       Option<String>,
}

impl RawRequest {
  pub fn into_request(self) -> Result<ConnectionRequest> {
    Ok(ConnectionRequest {
      request_id:         decode_uuid(&self.request_id)?,
      from_id:            decode_uuid(&self.from_id)?,
      to_id:              decode_uuid(&self.to_id)?,
      shared_ancestor_id: self
        .shared_ancestor_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      status:             decode_status(&self.status)?,
      created_at:         decode_dt(&self.created_at)?,
      responded_at:       self
        .responded_at
        .as_deref()
        .map(decode_dt)
        .transpose()?,
    })
  }
}
