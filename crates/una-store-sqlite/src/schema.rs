//! SQL schema for the portal's SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision; future migrations will be gated on that number.
//!
//! Dates are stored as `YYYY-MM-DD` text, times as `HH:MM:SS`, timestamps as
//! RFC 3339 UTC text with millisecond precision. Coded columns hold the code of
//! the corresponding closed enumeration.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- ── Researchers ─────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS domains (
    id          INTEGER PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    image       TEXT,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS researchers (
    id          INTEGER PRIMARY KEY,
    family_name TEXT,
    given_name  TEXT,
    biography   TEXT,
    photo       TEXT,
    status      TEXT NOT NULL DEFAULT 'actif',
    hired_on    TEXT NOT NULL,
    office      TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS researcher_diplomas (
    id            INTEGER PRIMARY KEY,
    researcher_id INTEGER NOT NULL REFERENCES researchers(id) ON DELETE CASCADE,
    institution   TEXT NOT NULL,
    diploma       TEXT NOT NULL,
    obtained_on   TEXT NOT NULL,
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS researcher_expertise (
    id            INTEGER PRIMARY KEY,
    researcher_id INTEGER NOT NULL REFERENCES researchers(id) ON DELETE CASCADE,
    domain_id     INTEGER NOT NULL REFERENCES domains(id) ON DELETE CASCADE,
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS researcher_notes (
    id            INTEGER PRIMARY KEY,
    researcher_id INTEGER NOT NULL REFERENCES researchers(id) ON DELETE CASCADE,
    title         TEXT NOT NULL,
    body          TEXT NOT NULL,
    noted_on      TEXT NOT NULL,
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS positions (
    id           INTEGER PRIMARY KEY,
    name         TEXT NOT NULL,
    abbreviation TEXT NOT NULL,
    grade        TEXT,
    created_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS researcher_positions (
    id            INTEGER PRIMARY KEY,
    researcher_id INTEGER NOT NULL REFERENCES researchers(id) ON DELETE CASCADE,
    position_id   INTEGER NOT NULL REFERENCES positions(id) ON DELETE CASCADE,
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS researcher_links (
    id            INTEGER PRIMARY KEY,
    researcher_id INTEGER NOT NULL REFERENCES researchers(id) ON DELETE CASCADE,
    kind          TEXT NOT NULL,
    contact       TEXT NOT NULL,
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- ── Laboratories ────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS laboratory_types (
    id         INTEGER PRIMARY KEY,
    label      TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS laboratories (
    id         INTEGER PRIMARY KEY,
    type_id    INTEGER NOT NULL REFERENCES laboratory_types(id) ON DELETE CASCADE,
    name       TEXT NOT NULL,
    logo       TEXT,
    unit       TEXT NOT NULL DEFAULT '',
    founded_on TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- Membership hangs off the researcher's position link.
CREATE TABLE IF NOT EXISTS researcher_laboratories (
    id                     INTEGER PRIMARY KEY,
    researcher_position_id INTEGER NOT NULL REFERENCES researcher_positions(id) ON DELETE CASCADE,
    laboratory_id          INTEGER NOT NULL REFERENCES laboratories(id) ON DELETE CASCADE,
    status                 TEXT NOT NULL DEFAULT 'Actif',
    created_at             TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at             TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS laboratory_domains (
    id            INTEGER PRIMARY KEY,
    laboratory_id INTEGER NOT NULL REFERENCES laboratories(id) ON DELETE CASCADE,
    domain_id     INTEGER NOT NULL REFERENCES domains(id) ON DELETE CASCADE,
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS laboratory_news (
    id            INTEGER PRIMARY KEY,
    laboratory_id INTEGER NOT NULL REFERENCES laboratories(id) ON DELETE CASCADE,
    title         TEXT NOT NULL,
    excerpt       TEXT NOT NULL DEFAULT '',
    key_phrase    TEXT NOT NULL DEFAULT '',
    body          TEXT NOT NULL DEFAULT '',
    published_on  TEXT NOT NULL,
    image         TEXT,
    status        TEXT NOT NULL DEFAULT 'Actif',
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS laboratory_presentations (
    id            INTEGER PRIMARY KEY,
    laboratory_id INTEGER NOT NULL REFERENCES laboratories(id) ON DELETE CASCADE,
    title         TEXT NOT NULL,
    description   TEXT NOT NULL DEFAULT '',
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS laboratory_missions (
    id            INTEGER PRIMARY KEY,
    laboratory_id INTEGER NOT NULL REFERENCES laboratories(id) ON DELETE CASCADE,
    description   TEXT NOT NULL,
    founded_on    TEXT NOT NULL,
    annual_budget INTEGER NOT NULL DEFAULT 0,
    currency      TEXT NOT NULL DEFAULT 'FCFA',
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS partners (
    id          INTEGER PRIMARY KEY,
    logo        TEXT,
    name        TEXT NOT NULL,
    country     TEXT,
    city        TEXT,
    address     TEXT,
    website     TEXT,
    email       TEXT,
    phone       TEXT,
    description TEXT,
    starts_on   TEXT,
    ends_on     TEXT,
    notes       TEXT,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS laboratory_partners (
    id            INTEGER PRIMARY KEY,
    laboratory_id INTEGER NOT NULL REFERENCES laboratories(id) ON DELETE CASCADE,
    partner_id    INTEGER NOT NULL REFERENCES partners(id) ON DELETE CASCADE,
    status        TEXT NOT NULL DEFAULT 'Actif',
    category      TEXT NOT NULL,
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- ── Tracks ──────────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS tracks (
    id            INTEGER PRIMARY KEY,
    laboratory_id INTEGER NOT NULL REFERENCES laboratories(id) ON DELETE CASCADE,
    name          TEXT NOT NULL,
    created_on    TEXT,
    description   TEXT,
    duration_days INTEGER,
    max_students  INTEGER,
    status        TEXT NOT NULL DEFAULT 'Actif',
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS track_conditions (
    id         INTEGER PRIMARY KEY,
    track_id   INTEGER NOT NULL REFERENCES tracks(id) ON DELETE CASCADE,
    title      TEXT NOT NULL,
    value      TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS track_outcomes (
    id         INTEGER PRIMARY KEY,
    track_id   INTEGER NOT NULL REFERENCES tracks(id) ON DELETE CASCADE,
    outcome    TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS track_specializations (
    id             INTEGER PRIMARY KEY,
    track_id       INTEGER NOT NULL REFERENCES tracks(id) ON DELETE CASCADE,
    specialization TEXT NOT NULL,
    created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- ── Research projects ───────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS projects (
    id              INTEGER PRIMARY KEY,
    title           TEXT NOT NULL,
    description     TEXT NOT NULL DEFAULT '',
    status          TEXT NOT NULL DEFAULT 'Planifier',
    research_domain TEXT,
    keywords        TEXT,
    starts_on       TEXT NOT NULL,
    planned_end_on  TEXT,
    actual_end_on   TEXT,
    total_budget    REAL,
    funding_source  TEXT,
    created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    CHECK (actual_end_on IS NULL OR actual_end_on >= starts_on)
);

CREATE TABLE IF NOT EXISTS project_members (
    id            INTEGER PRIMARY KEY,
    project_id    INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    researcher_id INTEGER NOT NULL REFERENCES researchers(id) ON DELETE CASCADE,
    role          TEXT NOT NULL,
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS project_phases (
    id         INTEGER PRIMARY KEY,
    phase      TEXT NOT NULL DEFAULT 'phase 1',
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS project_timeline (
    id         INTEGER PRIMARY KEY,
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    phase_id   INTEGER NOT NULL REFERENCES project_phases(id) ON DELETE CASCADE,
    title      TEXT NOT NULL,
    starts_on  TEXT NOT NULL,
    ends_on    TEXT NOT NULL,
    state      TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS project_objectives (
    id         INTEGER PRIMARY KEY,
    project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    objective  TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS project_achievements (
    id            INTEGER PRIMARY KEY,
    project_id    INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    title         TEXT NOT NULL,
    description   TEXT NOT NULL DEFAULT '',
    achieved_on   TEXT NOT NULL,
    impact        TEXT NOT NULL DEFAULT '',
    external_link TEXT NOT NULL DEFAULT '',
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- A project attached to a laboratory through one of the laboratory's domains.
CREATE TABLE IF NOT EXISTS project_laboratories (
    id                   INTEGER PRIMARY KEY,
    laboratory_domain_id INTEGER NOT NULL REFERENCES laboratory_domains(id) ON DELETE CASCADE,
    project_id           INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    created_at           TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at           TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS project_partners (
    id                      INTEGER PRIMARY KEY,
    project_id              INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    partner_id              INTEGER NOT NULL REFERENCES partners(id) ON DELETE CASCADE,
    kind                    TEXT NOT NULL,
    partner_contribution    TEXT,
    laboratory_contribution TEXT,
    starts_on               TEXT NOT NULL,
    ends_on                 TEXT NOT NULL,
    funding_amount          INTEGER NOT NULL DEFAULT 0,
    currency                TEXT NOT NULL DEFAULT 'FCFA',
    created_at              TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at              TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS publications (
    id            INTEGER PRIMARY KEY,
    project_id    INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    title         TEXT NOT NULL,
    summary       TEXT,
    file          TEXT,
    doi           TEXT,
    impact_factor REAL,
    published_on  TEXT,
    url           TEXT,
    content       TEXT NOT NULL DEFAULT '',
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS publication_citations (
    id             INTEGER PRIMARY KEY,
    publication_id INTEGER NOT NULL REFERENCES publications(id) ON DELETE CASCADE,
    citation       TEXT NOT NULL,
    created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS publication_keywords (
    id             INTEGER PRIMARY KEY,
    publication_id INTEGER NOT NULL REFERENCES publications(id) ON DELETE CASCADE,
    keyword        TEXT NOT NULL,
    created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- ── Applications ────────────────────────────────────────────────────────────

-- (email, track_id) is deliberately not UNIQUE: duplicates are rejected by
-- the submission path, not by the schema.
CREATE TABLE IF NOT EXISTS applications (
    id                INTEGER PRIMARY KEY,
    family_name       TEXT NOT NULL,
    given_name        TEXT NOT NULL,
    birth_date        TEXT NOT NULL,
    birth_place       TEXT NOT NULL,
    nationality       TEXT NOT NULL,
    phone             TEXT NOT NULL,
    email             TEXT NOT NULL,
    address           TEXT NOT NULL,
    city              TEXT NOT NULL,
    country           TEXT NOT NULL,
    study_level       TEXT NOT NULL,
    institution       TEXT NOT NULL,
    field_of_study    TEXT NOT NULL,
    average_grade     REAL NOT NULL,
    graduation_year   INTEGER NOT NULL,
    cv                TEXT NOT NULL,
    motivation_letter TEXT NOT NULL,
    transcripts       TEXT NOT NULL,
    diploma           TEXT,
    track_id          INTEGER NOT NULL REFERENCES tracks(id) ON DELETE CASCADE,
    motivation        TEXT,
    career_plan       TEXT,
    expectations      TEXT,
    status            TEXT NOT NULL DEFAULT 'En attente',
    evaluation_note   REAL,
    admin_comments    TEXT,
    submitted_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    modified_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- ── Contacts ────────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS laboratory_contacts (
    id              INTEGER PRIMARY KEY,
    laboratory_id   INTEGER NOT NULL REFERENCES laboratories(id) ON DELETE CASCADE,
    kind            TEXT NOT NULL DEFAULT 'principal',
    address         TEXT NOT NULL,
    city            TEXT NOT NULL,
    postal_code     TEXT,
    country         TEXT NOT NULL,
    phone           TEXT,
    email           TEXT,
    mail_secret_ref TEXT,   -- name of the secret; the password is never stored
    website         TEXT,
    active          INTEGER NOT NULL DEFAULT 1,
    created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS contact_hours (
    id         INTEGER PRIMARY KEY,
    contact_id INTEGER NOT NULL REFERENCES laboratory_contacts(id) ON DELETE CASCADE,
    weekday    INTEGER NOT NULL CHECK (weekday BETWEEN 1 AND 7),
    opens_at   TEXT,
    closes_at  TEXT,
    closed     INTEGER NOT NULL DEFAULT 0,
    notes      TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS contact_messages (
    id                  INTEGER PRIMARY KEY,
    laboratory_id       INTEGER NOT NULL REFERENCES laboratories(id) ON DELETE CASCADE,
    sender_given_name   TEXT NOT NULL,
    sender_family_name  TEXT NOT NULL,
    sender_email        TEXT NOT NULL,
    sender_organization TEXT,
    subject             TEXT NOT NULL,
    body                TEXT NOT NULL,
    status              TEXT NOT NULL DEFAULT 'nouveau',
    priority            TEXT NOT NULL DEFAULT 'normale',
    reply               TEXT,
    reply_author        TEXT,
    replied_at          TEXT,
    processed           INTEGER NOT NULL DEFAULT 0,
    sent_at             TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    modified_at         TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS researcher_positions_idx ON researcher_positions(researcher_id);
CREATE INDEX IF NOT EXISTS laboratory_domains_idx   ON laboratory_domains(laboratory_id);
CREATE INDEX IF NOT EXISTS tracks_laboratory_idx    ON tracks(laboratory_id);
CREATE INDEX IF NOT EXISTS project_members_idx      ON project_members(project_id);
CREATE INDEX IF NOT EXISTS project_labs_idx         ON project_laboratories(project_id);
CREATE INDEX IF NOT EXISTS publications_project_idx ON publications(project_id);
CREATE INDEX IF NOT EXISTS keywords_publication_idx ON publication_keywords(publication_id);
CREATE INDEX IF NOT EXISTS citations_publication_idx ON publication_citations(publication_id);
CREATE INDEX IF NOT EXISTS applications_email_idx   ON applications(email, track_id);
CREATE INDEX IF NOT EXISTS contacts_laboratory_idx  ON laboratory_contacts(laboratory_id);
CREATE INDEX IF NOT EXISTS hours_contact_idx        ON contact_hours(contact_id);
CREATE INDEX IF NOT EXISTS messages_sent_idx        ON contact_messages(sent_at);

PRAGMA user_version = 1;
";

/// Tables in foreign-key dependency order: every table appears after the
/// tables it references. Fixture loading inserts in this order.
pub const TABLES: &[&str] = &[
  "domains",
  "researchers",
  "researcher_diplomas",
  "researcher_expertise",
  "researcher_notes",
  "positions",
  "researcher_positions",
  "researcher_links",
  "laboratory_types",
  "laboratories",
  "researcher_laboratories",
  "laboratory_domains",
  "laboratory_news",
  "laboratory_presentations",
  "laboratory_missions",
  "partners",
  "laboratory_partners",
  "tracks",
  "track_conditions",
  "track_outcomes",
  "track_specializations",
  "projects",
  "project_members",
  "project_phases",
  "project_timeline",
  "project_objectives",
  "project_achievements",
  "project_laboratories",
  "project_partners",
  "publications",
  "publication_citations",
  "publication_keywords",
  "applications",
  "laboratory_contacts",
  "contact_hours",
  "contact_messages",
];
