//! SQL schema for the Kindred SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS persons (
    person_id   TEXT PRIMARY KEY,
    first_name  TEXT,
    last_name   TEXT,
    gender      TEXT,
    avatar      TEXT,
    placeholder INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

-- Relationship facts are strictly append-only. Each row is one directed
-- claim; the paired inverse edge is materialised by the graph builder at
-- read time, never stored.
CREATE TABLE IF NOT EXISTS relationship_facts (
    fact_id     TEXT PRIMARY KEY,
    subject_id  TEXT NOT NULL REFERENCES persons(person_id),
    object_id   TEXT NOT NULL REFERENCES persons(person_id),
    relation    TEXT NOT NULL,
    recorded_at TEXT NOT NULL
);

-- Derived rows keyed by (person_id, ancestor_id); fully re-derivable from
-- relationship_facts at any time. Replaced wholesale per person.
CREATE TABLE IF NOT EXISTS ancestor_cache (
    person_id   TEXT NOT NULL,
    ancestor_id TEXT NOT NULL,
    depth       INTEGER NOT NULL CHECK (depth >= 1),
    path        TEXT NOT NULL,      -- JSON array of intermediate person ids
    computed_at TEXT NOT NULL,
    PRIMARY KEY (person_id, ancestor_id)
);

-- Absence of a row means opted out (default-deny).
CREATE TABLE IF NOT EXISTS match_preferences (
    person_id       TEXT PRIMARY KEY,
    matching_opt_in INTEGER NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS connection_requests (
    request_id         TEXT PRIMARY KEY,
    from_id            TEXT NOT NULL,
    to_id              TEXT NOT NULL,
    shared_ancestor_id TEXT,
    status             TEXT NOT NULL DEFAULT 'pending',
    created_at         TEXT NOT NULL,
    responded_at       TEXT
);

CREATE INDEX IF NOT EXISTS facts_subject_idx  ON relationship_facts(subject_id);
CREATE INDEX IF NOT EXISTS facts_object_idx   ON relationship_facts(object_id);
CREATE INDEX IF NOT EXISTS facts_relation_idx ON relationship_facts(relation);
CREATE INDEX IF NOT EXISTS cache_ancestor_idx ON ancestor_cache(ancestor_id);
CREATE INDEX IF NOT EXISTS requests_from_idx  ON connection_requests(from_id);
CREATE INDEX IF NOT EXISTS requests_to_idx    ON connection_requests(to_id);

PRAGMA user_version = 1;
";
