//! Encoding and decoding between domain types and SQLite column values.
//!
//! Readers take a row and a column name; every select in the store aliases
//! its columns so that the names line up with the domain fields. Decoding
//! failures surface as [`rusqlite::Error::FromSqlConversionFailure`].

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{types::Type, Row};

use una_core::{
  application::{Application, ApplicationDocuments, ApplicationSummary, NewApplication},
  contact::{ContactMessage, ContactRecord, HoursEntry, MessageSummary, Weekday},
  laboratory::{Laboratory, LaboratoryType},
  partner::Partner,
  project::ResearchProject,
  publication::{Publication, PublicationBrief},
  researcher::Researcher,
  track::Track,
  Choice,
};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

// ─── Encoders ────────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

pub fn encode_time(time: NaiveTime) -> String {
  time.format(TIME_FORMAT).to_string()
}

// ─── Column readers ──────────────────────────────────────────────────────────

fn conversion(row: &Row<'_>, col: &str, err: impl Into<BoxError>) -> rusqlite::Error {
  let idx = row.as_ref().column_index(col).unwrap_or_default();
  rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, err.into())
}

fn parse_date(row: &Row<'_>, col: &str, raw: &str) -> rusqlite::Result<NaiveDate> {
  NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| conversion(row, col, e))
}

pub fn date(row: &Row<'_>, col: &str) -> rusqlite::Result<NaiveDate> {
  let raw: String = row.get(col)?;
  parse_date(row, col, &raw)
}

pub fn opt_date(row: &Row<'_>, col: &str) -> rusqlite::Result<Option<NaiveDate>> {
  let raw: Option<String> = row.get(col)?;
  raw
    .filter(|s| !s.is_empty())
    .map(|s| parse_date(row, col, &s))
    .transpose()
}

/// Times are written as `HH:MM:SS`; `HH:MM` is accepted from fixtures.
pub fn opt_time(row: &Row<'_>, col: &str) -> rusqlite::Result<Option<NaiveTime>> {
  let raw: Option<String> = row.get(col)?;
  raw
    .filter(|s| !s.is_empty())
    .map(|s| {
      NaiveTime::parse_from_str(&s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M"))
        .map_err(|e| conversion(row, col, e))
    })
    .transpose()
}

fn parse_timestamp(row: &Row<'_>, col: &str, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(raw)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| conversion(row, col, e))
}

pub fn timestamp(row: &Row<'_>, col: &str) -> rusqlite::Result<DateTime<Utc>> {
  let raw: String = row.get(col)?;
  parse_timestamp(row, col, &raw)
}

pub fn opt_timestamp(row: &Row<'_>, col: &str) -> rusqlite::Result<Option<DateTime<Utc>>> {
  let raw: Option<String> = row.get(col)?;
  raw.map(|s| parse_timestamp(row, col, &s)).transpose()
}

pub fn choice<C: Choice>(row: &Row<'_>, col: &str) -> rusqlite::Result<C> {
  let raw: String = row.get(col)?;
  C::from_code(&raw).ok_or_else(|| {
    conversion(row, col, una_core::Error::UnknownChoice { kind: C::KIND, code: raw })
  })
}

/// Blank codes read as absent.
pub fn opt_choice<C: Choice>(row: &Row<'_>, col: &str) -> rusqlite::Result<Option<C>> {
  let raw: Option<String> = row.get(col)?;
  match raw.filter(|s| !s.is_empty()) {
    None => Ok(None),
    Some(code) => C::from_code(&code).map(Some).ok_or_else(|| {
      conversion(row, col, una_core::Error::UnknownChoice { kind: C::KIND, code })
    }),
  }
}

pub fn weekday(row: &Row<'_>, col: &str) -> rusqlite::Result<Weekday> {
  let raw: u8 = row.get(col)?;
  Weekday::try_from(raw).map_err(|e| conversion(row, col, e))
}

// ─── Row mappers ─────────────────────────────────────────────────────────────
//
// Each mapper documents the select list it expects through a `*_COLUMNS`
// constant, qualified by the table alias used throughout `store.rs`.

pub const RESEARCHER_COLUMNS: &str = "r.id, r.family_name, r.given_name, r.biography, r.photo, \
  r.status, r.hired_on, r.office, r.created_at, r.updated_at";

pub fn researcher(row: &Row<'_>) -> rusqlite::Result<Researcher> {
  Ok(Researcher {
    id:          row.get("id")?,
    family_name: row.get("family_name")?,
    given_name:  row.get("given_name")?,
    biography:   row.get("biography")?,
    photo:       row.get("photo")?,
    status:      choice(row, "status")?,
    hired_on:    date(row, "hired_on")?,
    office:      row.get("office")?,
    created_at:  timestamp(row, "created_at")?,
    updated_at:  timestamp(row, "updated_at")?,
  })
}

pub const LABORATORY_COLUMNS: &str = "l.id, l.name, l.logo, l.unit, l.founded_on, \
  l.created_at, l.updated_at, lt.id AS type_id, lt.label AS type_label";

pub fn laboratory(row: &Row<'_>) -> rusqlite::Result<Laboratory> {
  Ok(Laboratory {
    id:         row.get("id")?,
    name:       row.get("name")?,
    logo:       row.get("logo")?,
    unit:       row.get("unit")?,
    founded_on: date(row, "founded_on")?,
    kind:       LaboratoryType { id: row.get("type_id")?, label: row.get("type_label")? },
    created_at: timestamp(row, "created_at")?,
    updated_at: timestamp(row, "updated_at")?,
  })
}

pub const PARTNER_COLUMNS: &str = "pa.id AS partner_id, pa.logo AS partner_logo, \
  pa.name AS partner_name, pa.country AS partner_country, pa.city AS partner_city, \
  pa.address AS partner_address, pa.website AS partner_website, pa.email AS partner_email, \
  pa.phone AS partner_phone, pa.description AS partner_description, \
  pa.starts_on AS partner_starts_on, pa.ends_on AS partner_ends_on, pa.notes AS partner_notes";

/// Partner columns are prefixed because they are always joined.
pub fn partner(row: &Row<'_>) -> rusqlite::Result<Partner> {
  Ok(Partner {
    id:          row.get("partner_id")?,
    logo:        row.get("partner_logo")?,
    name:        row.get("partner_name")?,
    country:     row.get("partner_country")?,
    city:        row.get("partner_city")?,
    address:     row.get("partner_address")?,
    website:     row.get("partner_website")?,
    email:       row.get("partner_email")?,
    phone:       row.get("partner_phone")?,
    description: row.get("partner_description")?,
    starts_on:   opt_date(row, "partner_starts_on")?,
    ends_on:     opt_date(row, "partner_ends_on")?,
    notes:       row.get("partner_notes")?,
  })
}

pub const TRACK_COLUMNS: &str = "t.id, t.laboratory_id, t.name, t.created_on, t.description, \
  t.duration_days, t.max_students, t.status, t.created_at, t.updated_at";

pub fn track(row: &Row<'_>) -> rusqlite::Result<Track> {
  Ok(Track {
    id:            row.get("id")?,
    laboratory_id: row.get("laboratory_id")?,
    name:          row.get("name")?,
    created_on:    opt_date(row, "created_on")?,
    description:   row.get("description")?,
    duration_days: row.get("duration_days")?,
    max_students:  row.get("max_students")?,
    status:        choice(row, "status")?,
    created_at:    timestamp(row, "created_at")?,
    updated_at:    timestamp(row, "updated_at")?,
  })
}

pub const PROJECT_COLUMNS: &str = "p.id, p.title, p.description, p.status, p.research_domain, \
  p.keywords, p.starts_on, p.planned_end_on, p.actual_end_on, p.total_budget, \
  p.funding_source, p.created_at, p.updated_at";

pub fn project(row: &Row<'_>) -> rusqlite::Result<ResearchProject> {
  Ok(ResearchProject {
    id:              row.get("id")?,
    title:           row.get("title")?,
    description:     row.get("description")?,
    status:          choice(row, "status")?,
    research_domain: row.get("research_domain")?,
    keywords:        row.get("keywords")?,
    starts_on:       date(row, "starts_on")?,
    planned_end_on:  opt_date(row, "planned_end_on")?,
    actual_end_on:   opt_date(row, "actual_end_on")?,
    total_budget:    row.get("total_budget")?,
    funding_source:  opt_choice(row, "funding_source")?,
    created_at:      timestamp(row, "created_at")?,
    updated_at:      timestamp(row, "updated_at")?,
  })
}

pub const PUBLICATION_COLUMNS: &str = "pub.id, pub.project_id, pub.title, pub.summary, \
  pub.file, pub.doi, pub.impact_factor, pub.published_on, pub.url, pub.content, \
  pub.created_at, pub.updated_at, p.title AS project_title";

pub fn publication(row: &Row<'_>) -> rusqlite::Result<Publication> {
  Ok(Publication {
    id:            row.get("id")?,
    project_id:    row.get("project_id")?,
    title:         row.get("title")?,
    summary:       row.get("summary")?,
    file:          row.get("file")?,
    doi:           row.get("doi")?,
    impact_factor: row.get("impact_factor")?,
    published_on:  opt_date(row, "published_on")?,
    url:           row.get("url")?,
    content:       row.get("content")?,
    created_at:    timestamp(row, "created_at")?,
    updated_at:    timestamp(row, "updated_at")?,
  })
}

/// Expects [`PUBLICATION_COLUMNS`].
pub fn publication_brief(row: &Row<'_>) -> rusqlite::Result<PublicationBrief> {
  Ok(PublicationBrief {
    id:            row.get("id")?,
    title:         row.get("title")?,
    summary:       row.get("summary")?,
    doi:           row.get("doi")?,
    impact_factor: row.get("impact_factor")?,
    published_on:  opt_date(row, "published_on")?,
    url:           row.get("url")?,
    project_title: row.get("project_title")?,
  })
}

pub const APPLICATION_COLUMNS: &str = "a.*, t.name AS track_name, l.name AS laboratory_name";

pub fn application_summary(row: &Row<'_>) -> rusqlite::Result<ApplicationSummary> {
  let form = NewApplication {
    family_name:     row.get("family_name")?,
    given_name:      row.get("given_name")?,
    birth_date:      date(row, "birth_date")?,
    birth_place:     row.get("birth_place")?,
    nationality:     row.get("nationality")?,
    phone:           row.get("phone")?,
    email:           row.get("email")?,
    address:         row.get("address")?,
    city:            row.get("city")?,
    country:         row.get("country")?,
    study_level:     choice(row, "study_level")?,
    institution:     row.get("institution")?,
    field_of_study:  row.get("field_of_study")?,
    average_grade:   row.get("average_grade")?,
    graduation_year: row.get("graduation_year")?,
    documents:       ApplicationDocuments {
      cv:                row.get("cv")?,
      motivation_letter: row.get("motivation_letter")?,
      transcripts:       row.get("transcripts")?,
      diploma:           row.get("diploma")?,
    },
    track_id:        row.get("track_id")?,
    motivation:      row.get("motivation")?,
    career_plan:     row.get("career_plan")?,
    expectations:    row.get("expectations")?,
  };
  Ok(ApplicationSummary {
    application:     Application {
      id:              row.get("id")?,
      form,
      status:          choice(row, "status")?,
      evaluation_note: row.get("evaluation_note")?,
      admin_comments:  row.get("admin_comments")?,
      submitted_at:    timestamp(row, "submitted_at")?,
      modified_at:     timestamp(row, "modified_at")?,
    },
    track_name:      row.get("track_name")?,
    laboratory_name: row.get("laboratory_name")?,
  })
}

pub const CONTACT_COLUMNS: &str = "c.*, l.name AS laboratory_name";

pub fn contact(row: &Row<'_>) -> rusqlite::Result<ContactRecord> {
  Ok(ContactRecord {
    id:              row.get("id")?,
    laboratory_id:   row.get("laboratory_id")?,
    kind:            choice(row, "kind")?,
    address:         row.get("address")?,
    city:            row.get("city")?,
    postal_code:     row.get("postal_code")?,
    country:         row.get("country")?,
    phone:           row.get("phone")?,
    email:           row.get("email")?,
    mail_secret_ref: row.get("mail_secret_ref")?,
    website:         row.get("website")?,
    active:          row.get("active")?,
    created_at:      timestamp(row, "created_at")?,
    updated_at:      timestamp(row, "updated_at")?,
  })
}

pub fn hours(row: &Row<'_>) -> rusqlite::Result<HoursEntry> {
  Ok(HoursEntry {
    id:         row.get("id")?,
    contact_id: row.get("contact_id")?,
    weekday:    weekday(row, "weekday")?,
    opens_at:   opt_time(row, "opens_at")?,
    closes_at:  opt_time(row, "closes_at")?,
    closed:     row.get("closed")?,
    notes:      row.get("notes")?,
    created_at: timestamp(row, "created_at")?,
    updated_at: timestamp(row, "updated_at")?,
  })
}

pub const MESSAGE_COLUMNS: &str = "m.*, l.name AS laboratory_name";

pub fn message_summary(row: &Row<'_>) -> rusqlite::Result<MessageSummary> {
  let message = ContactMessage {
    id:                  row.get("id")?,
    laboratory_id:       row.get("laboratory_id")?,
    sender_given_name:   row.get("sender_given_name")?,
    sender_family_name:  row.get("sender_family_name")?,
    sender_email:        row.get("sender_email")?,
    sender_organization: row.get("sender_organization")?,
    subject:             row.get("subject")?,
    body:                row.get("body")?,
    status:              choice(row, "status")?,
    priority:            choice(row, "priority")?,
    reply:               row.get("reply")?,
    reply_author:        row.get("reply_author")?,
    replied_at:          opt_timestamp(row, "replied_at")?,
    processed:           row.get("processed")?,
    sent_at:             timestamp(row, "sent_at")?,
    modified_at:         timestamp(row, "modified_at")?,
  };
  Ok(MessageSummary { message, laboratory_name: row.get("laboratory_name")? })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_use_iso_calendar_format() {
    let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    assert_eq!(encode_date(d), "2024-03-09");
  }

  #[test]
  fn times_keep_seconds() {
    let t = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
    assert_eq!(encode_time(t), "08:30:00");
  }
}
