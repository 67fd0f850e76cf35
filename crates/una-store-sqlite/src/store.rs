//! [`SqliteStore`]: the SQLite implementation of [`PortalStore`].

use std::{collections::HashMap, path::Path};

use chrono::NaiveDate;
use rusqlite::{types::Value, Connection, OptionalExtension as _};

use una_core::{
  application::{ApplicationStatus, ApplicationSummary, NewApplication},
  contact::{
    ContactDetail, ContactPatch, ContactRecord, ContactSummary, ContactType, HoursEntry,
    HoursPatch, MessagePatch, MessageStatus, MessageSummary, NewContact, NewHours, NewMessage,
  },
  laboratory::{
    ActivityStatus, Laboratory, LaboratoryDetail, LaboratoryDomain, Mission, NewsItem,
    Partnership, Presentation,
  },
  project::{
    Achievement, Objective, PartnerCollaboration, ProjectDetail, ProjectLaboratory,
    ProjectStatus, ResearchProject, TeamMember, TimelineEntry,
  },
  publication::{
    Citation, Contributor, Keyword, PublicationBrief, PublicationDetail, PublicationSummary,
  },
  query::{
    ApplicationFilter, ContactFilter, HoursFilter, LaboratoryFilter, MessageFilter,
    ProjectFilter, PublicationFilter, PublicationSortKey, ResearcherFilter, TrackFilter,
  },
  researcher::{
    full_name, CurrentProject, Diploma, Domain, ExpertiseLink, Position, PositionLink,
    ResearcherDetail, ResearcherNote, ResearcherStatus, ResearcherSummary, SocialLink,
  },
  store::PortalStore,
  track::{AdmissionCondition, Outcome, Specialization, Track, TrackDetail, TrackSummary},
  Choice,
};

use crate::{
  encode::{
    self, encode_date, encode_time, APPLICATION_COLUMNS, CONTACT_COLUMNS, LABORATORY_COLUMNS,
    MESSAGE_COLUMNS, PARTNER_COLUMNS, PROJECT_COLUMNS, PUBLICATION_COLUMNS, RESEARCHER_COLUMNS,
    TRACK_COLUMNS,
  },
  schema::{SCHEMA, TABLES},
  sql::{any_of_pattern, contains_pattern, register_regexp, Fragments, NOW},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A portal store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
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

  /// Open an in-memory store; useful for testing.
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
        register_regexp(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn find_project(&self, id: i64) -> Result<Option<ResearchProject>> {
    let project = self
      .conn
      .call(move |conn| Ok(project_by_id(conn, id)?))
      .await?;
    Ok(project)
  }

  // ─── Fixtures ──────────────────────────────────────────────────────────────

  /// Load a JSON fixture document: an object mapping table names to arrays of
  /// row objects. Rows are inserted in dependency order inside one
  /// transaction; unknown tables or columns are rejected before anything is
  /// written. Returns the number of rows inserted.
  pub async fn load_fixture(&self, fixture: serde_json::Value) -> Result<usize> {
    let serde_json::Value::Object(tables) = fixture else {
      return Err(Error::Fixture("expected an object keyed by table name".into()));
    };
    if let Some(unknown) = tables.keys().find(|t| !TABLES.contains(&t.as_str())) {
      return Err(Error::UnknownTable(unknown.clone()));
    }

    let names: Vec<String> = tables.keys().cloned().collect();
    let known_columns: HashMap<String, Vec<String>> = self
      .conn
      .call(move |conn| {
        let mut out = HashMap::new();
        for table in names {
          let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
          let cols = stmt
            .query_map([], |r| r.get::<_, String>("name"))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          out.insert(table, cols);
        }
        Ok(out)
      })
      .await?;

    let mut inserts: Vec<(String, Vec<Value>)> = Vec::new();
    for table in TABLES {
      let Some(rows) = tables.get(*table) else { continue };
      let serde_json::Value::Array(rows) = rows else {
        return Err(Error::Fixture(format!("table {table:?} must hold an array of rows")));
      };
      let columns = known_columns.get(*table).map(Vec::as_slice).unwrap_or_default();
      for row in rows {
        inserts.push(fixture_insert(table, columns, row)?);
      }
    }

    let count = inserts.len();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for (sql, values) in &inserts {
          tx.execute(sql, rusqlite::params_from_iter(values.iter()))?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(rows = count, "Fixture loaded");
    Ok(count)
  }

  /// [`load_fixture`](Self::load_fixture) from JSON text.
  pub async fn load_fixture_str(&self, json: &str) -> Result<usize> {
    let fixture: serde_json::Value = serde_json::from_str(json)?;
    self.load_fixture(fixture).await
  }
}

fn fixture_insert(
  table: &str,
  columns: &[String],
  row: &serde_json::Value,
) -> Result<(String, Vec<Value>)> {
  let serde_json::Value::Object(fields) = row else {
    return Err(Error::Fixture(format!("rows of {table:?} must be objects")));
  };
  if fields.is_empty() {
    return Ok((format!("INSERT INTO {table} DEFAULT VALUES"), Vec::new()));
  }

  let mut names = Vec::with_capacity(fields.len());
  let mut values = Vec::with_capacity(fields.len());
  for (column, value) in fields {
    if !columns.iter().any(|c| c == column) {
      return Err(Error::UnknownColumn { table: table.to_owned(), column: column.clone() });
    }
    names.push(column.as_str());
    values.push(json_to_sql(table, column, value)?);
  }
  let placeholders = (1..=values.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  let sql = format!("INSERT INTO {table} ({}) VALUES ({placeholders})", names.join(", "));
  Ok((sql, values))
}

fn json_to_sql(table: &str, column: &str, value: &serde_json::Value) -> Result<Value> {
  use serde_json::Value as J;
  match value {
    J::Null => Ok(Value::Null),
    J::Bool(b) => Ok(Value::from(*b)),
    J::Number(n) => match (n.as_i64(), n.as_f64()) {
      (Some(i), _) => Ok(Value::Integer(i)),
      (None, Some(f)) => Ok(Value::Real(f)),
      (None, None) => Err(Error::Fixture(format!("{table}.{column}: number out of range"))),
    },
    J::String(s) => Ok(Value::Text(s.clone())),
    J::Array(_) | J::Object(_) => {
      Err(Error::Fixture(format!("{table}.{column}: nested values are not supported")))
    }
  }
}

// ─── Filter conditions ───────────────────────────────────────────────────────

fn researcher_conditions(filter: &ResearcherFilter) -> Fragments {
  let mut f = Fragments::new();
  f.eq("r.status", ResearcherStatus::Active.code().to_owned());
  f.search(&["r.family_name", "r.given_name"], &filter.search);
  if let Some(lab) = filter.laboratory_id {
    let p = f.bind(lab);
    f.push(format!(
      "r.id IN (SELECT rp.researcher_id FROM researcher_positions rp \
       JOIN researcher_laboratories rl ON rl.researcher_position_id = rp.id \
       WHERE rl.laboratory_id = {p})"
    ));
  }
  f
}

fn track_conditions(filter: &TrackFilter) -> Fragments {
  let mut f = Fragments::new();
  f.eq("t.status", ActivityStatus::Active.code().to_owned());
  f.search(&["t.name", "t.description", "l.name", "l.unit"], &filter.search);
  if let Some(lab) = filter.laboratory_id {
    f.eq("t.laboratory_id", lab);
  }
  if let Some(name) = &filter.laboratory_name {
    let p = f.bind(contains_pattern(name));
    f.push(format!("l.name REGEXP {p}"));
  }
  f
}

/// Narrowing through project → project laboratory → laboratory domain.
fn project_laboratory_condition(
  f: &mut Fragments,
  project_column: &str,
  laboratory_id: Option<i64>,
  laboratory_domain_id: Option<i64>,
) {
  let mut chain = Vec::new();
  if let Some(lab) = laboratory_id {
    chain.push(format!("ld.laboratory_id = {}", f.bind(lab)));
  }
  if let Some(link) = laboratory_domain_id {
    chain.push(format!("pl.laboratory_domain_id = {}", f.bind(link)));
  }
  if !chain.is_empty() {
    f.push(format!(
      "{project_column} IN (SELECT pl.project_id FROM project_laboratories pl \
       JOIN laboratory_domains ld ON ld.id = pl.laboratory_domain_id WHERE {})",
      chain.join(" AND ")
    ));
  }
}

fn publication_conditions(filter: &PublicationFilter) -> Fragments {
  let mut f = Fragments::new();
  f.search(
    &["pub.title", "pub.summary", "pub.content", "pub.doi", "pub.url", "p.title"],
    &filter.search,
  );
  if !filter.keywords.is_empty() {
    let p = f.bind(any_of_pattern(&filter.keywords));
    f.push(format!(
      "EXISTS (SELECT 1 FROM publication_keywords pk \
       WHERE pk.publication_id = pub.id AND pk.keyword REGEXP {p})"
    ));
  }
  if let Some(citation) = &filter.citation {
    let p = f.bind(contains_pattern(citation));
    f.push(format!(
      "EXISTS (SELECT 1 FROM publication_citations pc \
       WHERE pc.publication_id = pub.id AND pc.citation REGEXP {p})"
    ));
  }
  if let Some(year) = filter.year {
    let p = f.bind(i64::from(year));
    f.push(format!("CAST(strftime('%Y', pub.published_on) AS INTEGER) = {p}"));
  }
  if let Some(min) = filter.min_impact_factor {
    let p = f.bind(min);
    f.push(format!("pub.impact_factor >= {p}"));
  }
  if let Some(project) = filter.project_id {
    f.eq("pub.project_id", project);
  }
  project_laboratory_condition(
    &mut f,
    "pub.project_id",
    filter.laboratory_id,
    filter.laboratory_domain_id,
  );
  if filter.has_pdf {
    f.push("(pub.file IS NOT NULL AND pub.file <> '')");
  }
  if filter.has_url {
    f.push("(pub.url IS NOT NULL AND pub.url <> '')");
  }
  f
}

fn sort_column(key: PublicationSortKey) -> &'static str {
  match key {
    PublicationSortKey::Id => "pub.id",
    PublicationSortKey::Title => "pub.title",
    PublicationSortKey::PublishedOn => "pub.published_on",
    PublicationSortKey::ImpactFactor => "pub.impact_factor",
    PublicationSortKey::Doi => "pub.doi",
    PublicationSortKey::CreatedAt => "pub.created_at",
    PublicationSortKey::UpdatedAt => "pub.updated_at",
  }
}

fn project_conditions(filter: &ProjectFilter) -> Fragments {
  let mut f = Fragments::new();
  if let Some(status) = filter.status {
    f.eq("p.status", status.code().to_owned());
  }
  project_laboratory_condition(&mut f, "p.id", filter.laboratory_id, None);
  f.search(
    &["p.title", "p.description", "p.research_domain", "p.keywords"],
    &filter.search,
  );
  f
}

fn message_conditions(filter: &MessageFilter) -> Fragments {
  let mut f = Fragments::new();
  if let Some(lab) = filter.laboratory_id {
    f.eq("m.laboratory_id", lab);
  }
  if let Some(status) = filter.status {
    f.eq("m.status", status.code().to_owned());
  }
  if let Some(priority) = filter.priority {
    f.eq("m.priority", priority.code().to_owned());
  }
  if let Some(processed) = filter.processed {
    f.eq("m.processed", processed);
  }
  if let Some(from) = filter.sent_from {
    let p = f.bind(encode_date(from));
    f.push(format!("date(m.sent_at) >= {p}"));
  }
  if let Some(to) = filter.sent_to {
    let p = f.bind(encode_date(to));
    f.push(format!("date(m.sent_at) <= {p}"));
  }
  f
}

// ─── Row loaders ─────────────────────────────────────────────────────────────
//
// Synchronous helpers run inside `Connection::call` closures.

fn query_all<T>(
  conn: &Connection,
  sql: &str,
  params: impl rusqlite::Params,
  map: impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
  let mut stmt = conn.prepare(sql)?;
  let rows = stmt.query_map(params, map)?.collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn domain(row: &rusqlite::Row<'_>) -> rusqlite::Result<Domain> {
  Ok(Domain {
    id:          row.get("domain_id")?,
    title:       row.get("title")?,
    description: row.get("description")?,
    image:       row.get("image")?,
  })
}

fn positions_of(conn: &Connection, researcher_id: i64) -> rusqlite::Result<Vec<PositionLink>> {
  query_all(
    conn,
    "SELECT rp.id, po.id AS position_id, po.name, po.abbreviation, po.grade
     FROM researcher_positions rp JOIN positions po ON po.id = rp.position_id
     WHERE rp.researcher_id = ?1 ORDER BY rp.id",
    [researcher_id],
    |row| {
      Ok(PositionLink {
        id:       row.get("id")?,
        position: Position {
          id:           row.get("position_id")?,
          name:         row.get("name")?,
          abbreviation: row.get("abbreviation")?,
          grade:        row.get("grade")?,
        },
      })
    },
  )
}

fn expertise_of(conn: &Connection, researcher_id: i64) -> rusqlite::Result<Vec<ExpertiseLink>> {
  query_all(
    conn,
    "SELECT re.id, d.id AS domain_id, d.title, d.description, d.image
     FROM researcher_expertise re JOIN domains d ON d.id = re.domain_id
     WHERE re.researcher_id = ?1 ORDER BY re.id",
    [researcher_id],
    |row| Ok(ExpertiseLink { id: row.get("id")?, domain: domain(row)? }),
  )
}

fn links_of(conn: &Connection, researcher_id: i64) -> rusqlite::Result<Vec<SocialLink>> {
  query_all(
    conn,
    "SELECT id, kind, contact FROM researcher_links WHERE researcher_id = ?1 ORDER BY id",
    [researcher_id],
    |row| {
      Ok(SocialLink {
        id:      row.get("id")?,
        kind:    encode::choice(row, "kind")?,
        contact: row.get("contact")?,
      })
    },
  )
}

fn researcher_detail(conn: &Connection, id: i64) -> rusqlite::Result<Option<ResearcherDetail>> {
  let researcher = conn
    .query_row(
      &format!("SELECT {RESEARCHER_COLUMNS} FROM researchers r WHERE r.id = ?1 AND r.status = ?2"),
      rusqlite::params![id, ResearcherStatus::Active.code()],
      encode::researcher,
    )
    .optional()?;
  let Some(researcher) = researcher else { return Ok(None) };

  let diplomas = query_all(
    conn,
    "SELECT id, institution, diploma, obtained_on FROM researcher_diplomas
     WHERE researcher_id = ?1 ORDER BY obtained_on DESC, id",
    [id],
    |row| {
      Ok(Diploma {
        id:          row.get("id")?,
        institution: row.get("institution")?,
        diploma:     row.get("diploma")?,
        obtained_on: encode::date(row, "obtained_on")?,
      })
    },
  )?;
  let notes = query_all(
    conn,
    "SELECT id, title, body, noted_on FROM researcher_notes
     WHERE researcher_id = ?1 ORDER BY noted_on DESC, id",
    [id],
    |row| {
      Ok(ResearcherNote {
        id:       row.get("id")?,
        title:    row.get("title")?,
        body:     row.get("body")?,
        noted_on: encode::date(row, "noted_on")?,
      })
    },
  )?;
  let publications = query_all(
    conn,
    &format!(
      "SELECT {PUBLICATION_COLUMNS} FROM publications pub JOIN projects p ON p.id = pub.project_id
       WHERE pub.project_id IN (SELECT project_id FROM project_members WHERE researcher_id = ?1)
       ORDER BY pub.published_on DESC, pub.id DESC"
    ),
    [id],
    encode::publication_brief,
  )?;
  let current_projects = query_all(
    conn,
    "SELECT p.id AS project_id, p.title, p.description, p.status, pm.role,
            p.starts_on, p.planned_end_on
     FROM project_members pm JOIN projects p ON p.id = pm.project_id
     WHERE pm.researcher_id = ?1 AND p.status IN (?2, ?3)
     ORDER BY p.starts_on DESC, p.id DESC",
    rusqlite::params![id, ProjectStatus::Ongoing.code(), ProjectStatus::Planned.code()],
    |row| {
      Ok(CurrentProject {
        project_id:     row.get("project_id")?,
        title:          row.get("title")?,
        description:    row.get("description")?,
        status:         encode::choice(row, "status")?,
        role:           encode::choice(row, "role")?,
        starts_on:      encode::date(row, "starts_on")?,
        planned_end_on: encode::opt_date(row, "planned_end_on")?,
      })
    },
  )?;

  Ok(Some(ResearcherDetail {
    researcher,
    links: links_of(conn, id)?,
    positions: positions_of(conn, id)?,
    expertise: expertise_of(conn, id)?,
    diplomas,
    notes,
    publications,
    current_projects,
  }))
}

fn laboratory_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Laboratory>> {
  conn
    .query_row(
      &format!(
        "SELECT {LABORATORY_COLUMNS} FROM laboratories l
         JOIN laboratory_types lt ON lt.id = l.type_id WHERE l.id = ?1"
      ),
      [id],
      encode::laboratory,
    )
    .optional()
}

fn laboratory_detail(conn: &Connection, id: i64) -> rusqlite::Result<Option<LaboratoryDetail>> {
  let Some(laboratory) = laboratory_by_id(conn, id)? else { return Ok(None) };

  let domains = query_all(
    conn,
    "SELECT ld.id, ld.laboratory_id, d.id AS domain_id, d.title, d.description, d.image
     FROM laboratory_domains ld JOIN domains d ON d.id = ld.domain_id
     WHERE ld.laboratory_id = ?1 ORDER BY ld.id",
    [id],
    |row| {
      Ok(LaboratoryDomain {
        id:            row.get("id")?,
        laboratory_id: row.get("laboratory_id")?,
        domain:        domain(row)?,
      })
    },
  )?;
  let news = query_all(
    conn,
    "SELECT id, title, excerpt, key_phrase, body, published_on, image, status
     FROM laboratory_news WHERE laboratory_id = ?1 AND status = ?2
     ORDER BY published_on DESC, id DESC",
    rusqlite::params![id, ActivityStatus::Active.code()],
    |row| {
      Ok(NewsItem {
        id:           row.get("id")?,
        title:        row.get("title")?,
        excerpt:      row.get("excerpt")?,
        key_phrase:   row.get("key_phrase")?,
        body:         row.get("body")?,
        published_on: encode::date(row, "published_on")?,
        image:        row.get("image")?,
        status:       encode::choice(row, "status")?,
      })
    },
  )?;
  let presentations = query_all(
    conn,
    "SELECT id, title, description FROM laboratory_presentations
     WHERE laboratory_id = ?1 ORDER BY id",
    [id],
    |row| {
      Ok(Presentation {
        id:          row.get("id")?,
        title:       row.get("title")?,
        description: row.get("description")?,
      })
    },
  )?;
  let missions = query_all(
    conn,
    "SELECT id, description, founded_on, annual_budget, currency FROM laboratory_missions
     WHERE laboratory_id = ?1 ORDER BY id",
    [id],
    |row| {
      Ok(Mission {
        id:            row.get("id")?,
        description:   row.get("description")?,
        founded_on:    encode::date(row, "founded_on")?,
        annual_budget: row.get("annual_budget")?,
        currency:      row.get("currency")?,
      })
    },
  )?;
  let partnerships = query_all(
    conn,
    &format!(
      "SELECT lp.id, lp.status, lp.category, {PARTNER_COLUMNS}
       FROM laboratory_partners lp JOIN partners pa ON pa.id = lp.partner_id
       WHERE lp.laboratory_id = ?1 ORDER BY lp.id"
    ),
    [id],
    |row| {
      Ok(Partnership {
        id:       row.get("id")?,
        partner:  encode::partner(row)?,
        status:   encode::choice(row, "status")?,
        category: encode::choice(row, "category")?,
      })
    },
  )?;

  Ok(Some(LaboratoryDetail { laboratory, domains, news, presentations, missions, partnerships }))
}

fn track_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Track>> {
  conn
    .query_row(
      &format!("SELECT {TRACK_COLUMNS} FROM tracks t WHERE t.id = ?1"),
      [id],
      encode::track,
    )
    .optional()
}

fn track_detail(conn: &Connection, id: i64) -> rusqlite::Result<Option<TrackDetail>> {
  let Some(track) = track_by_id(conn, id)? else { return Ok(None) };
  if track.status != ActivityStatus::Active {
    return Ok(None);
  }
  let Some(laboratory) = laboratory_by_id(conn, track.laboratory_id)? else { return Ok(None) };

  let conditions = query_all(
    conn,
    "SELECT id, title, value FROM track_conditions WHERE track_id = ?1 ORDER BY id",
    [id],
    |row| {
      Ok(AdmissionCondition {
        id:    row.get("id")?,
        title: row.get("title")?,
        value: row.get("value")?,
      })
    },
  )?;
  let outcomes = query_all(
    conn,
    "SELECT id, outcome FROM track_outcomes WHERE track_id = ?1 ORDER BY id",
    [id],
    |row| Ok(Outcome { id: row.get("id")?, outcome: row.get("outcome")? }),
  )?;
  let specializations = query_all(
    conn,
    "SELECT id, specialization FROM track_specializations WHERE track_id = ?1 ORDER BY id",
    [id],
    |row| Ok(Specialization { id: row.get("id")?, specialization: row.get("specialization")? }),
  )?;

  Ok(Some(TrackDetail { track, laboratory, conditions, outcomes, specializations }))
}

const APPLICATION_FROM: &str = "FROM applications a
  JOIN tracks t ON t.id = a.track_id
  JOIN laboratories l ON l.id = t.laboratory_id";

fn application_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<ApplicationSummary>> {
  conn
    .query_row(
      &format!("SELECT {APPLICATION_COLUMNS} {APPLICATION_FROM} WHERE a.id = ?1"),
      [id],
      encode::application_summary,
    )
    .optional()
}

const PUBLICATION_FROM: &str = "FROM publications pub JOIN projects p ON p.id = pub.project_id";

fn contributors_of(conn: &Connection, project_id: i64) -> rusqlite::Result<Vec<Contributor>> {
  query_all(
    conn,
    "SELECT r.given_name, r.family_name, pm.role
     FROM project_members pm JOIN researchers r ON r.id = pm.researcher_id
     WHERE pm.project_id = ?1 ORDER BY pm.id",
    [project_id],
    |row| {
      let given: Option<String> = row.get("given_name")?;
      let family: Option<String> = row.get("family_name")?;
      Ok(Contributor {
        full_name: full_name(given.as_deref(), family.as_deref()),
        role:      encode::choice(row, "role")?,
      })
    },
  )
}

fn publication_detail(conn: &Connection, id: i64) -> rusqlite::Result<Option<PublicationDetail>> {
  let found = conn
    .query_row(
      &format!("SELECT {PUBLICATION_COLUMNS} {PUBLICATION_FROM} WHERE pub.id = ?1"),
      [id],
      |row| Ok((encode::publication(row)?, row.get::<_, String>("project_title")?)),
    )
    .optional()?;
  let Some((publication, project_title)) = found else { return Ok(None) };

  let keywords = query_all(
    conn,
    "SELECT id, keyword FROM publication_keywords WHERE publication_id = ?1 ORDER BY id",
    [id],
    |row| Ok(Keyword { id: row.get("id")?, keyword: row.get("keyword")? }),
  )?;
  let citations = query_all(
    conn,
    "SELECT id, citation FROM publication_citations WHERE publication_id = ?1 ORDER BY id",
    [id],
    |row| Ok(Citation { id: row.get("id")?, citation: row.get("citation")? }),
  )?;

  Ok(Some(PublicationDetail { publication, project_title, keywords, citations }))
}

fn project_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<ResearchProject>> {
  conn
    .query_row(
      &format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.id = ?1"),
      [id],
      encode::project,
    )
    .optional()
}

fn project_detail(conn: &Connection, id: i64) -> rusqlite::Result<Option<ProjectDetail>> {
  let Some(project) = project_by_id(conn, id)? else { return Ok(None) };

  let team = query_all(
    conn,
    "SELECT pm.id, pm.researcher_id, r.given_name, r.family_name, pm.role
     FROM project_members pm JOIN researchers r ON r.id = pm.researcher_id
     WHERE pm.project_id = ?1 ORDER BY pm.id",
    [id],
    |row| {
      let given: Option<String> = row.get("given_name")?;
      let family: Option<String> = row.get("family_name")?;
      Ok(TeamMember {
        id:            row.get("id")?,
        researcher_id: row.get("researcher_id")?,
        full_name:     full_name(given.as_deref(), family.as_deref()),
        role:          encode::choice(row, "role")?,
      })
    },
  )?;
  let timeline = query_all(
    conn,
    "SELECT pt.id, ph.phase, pt.title, pt.starts_on, pt.ends_on, pt.state
     FROM project_timeline pt JOIN project_phases ph ON ph.id = pt.phase_id
     WHERE pt.project_id = ?1 ORDER BY pt.starts_on, pt.id",
    [id],
    |row| {
      Ok(TimelineEntry {
        id:        row.get("id")?,
        phase:     row.get("phase")?,
        title:     row.get("title")?,
        starts_on: encode::date(row, "starts_on")?,
        ends_on:   encode::date(row, "ends_on")?,
        state:     encode::choice(row, "state")?,
      })
    },
  )?;
  let objectives = query_all(
    conn,
    "SELECT id, objective FROM project_objectives WHERE project_id = ?1 ORDER BY id",
    [id],
    |row| Ok(Objective { id: row.get("id")?, objective: row.get("objective")? }),
  )?;
  let achievements = query_all(
    conn,
    "SELECT id, title, description, achieved_on, impact, external_link
     FROM project_achievements WHERE project_id = ?1 ORDER BY achieved_on DESC, id DESC",
    [id],
    |row| {
      Ok(Achievement {
        id:            row.get("id")?,
        title:         row.get("title")?,
        description:   row.get("description")?,
        achieved_on:   encode::date(row, "achieved_on")?,
        impact:        row.get("impact")?,
        external_link: row.get("external_link")?,
      })
    },
  )?;
  let publications: Vec<PublicationBrief> = query_all(
    conn,
    &format!(
      "SELECT {PUBLICATION_COLUMNS} {PUBLICATION_FROM} WHERE pub.project_id = ?1
       ORDER BY pub.published_on DESC, pub.id DESC"
    ),
    [id],
    encode::publication_brief,
  )?;
  let partners = query_all(
    conn,
    &format!(
      "SELECT pp.id, pp.kind, pp.partner_contribution, pp.laboratory_contribution,
              pp.starts_on, pp.ends_on, pp.funding_amount, pp.currency, {PARTNER_COLUMNS}
       FROM project_partners pp JOIN partners pa ON pa.id = pp.partner_id
       WHERE pp.project_id = ?1 ORDER BY pp.id"
    ),
    [id],
    |row| {
      Ok(PartnerCollaboration {
        id:                      row.get("id")?,
        partner:                 encode::partner(row)?,
        kind:                    encode::choice(row, "kind")?,
        partner_contribution:    row.get("partner_contribution")?,
        laboratory_contribution: row.get("laboratory_contribution")?,
        starts_on:               encode::date(row, "starts_on")?,
        ends_on:                 encode::date(row, "ends_on")?,
        funding_amount:          row.get("funding_amount")?,
        currency:                row.get("currency")?,
      })
    },
  )?;
  let laboratories = query_all(
    conn,
    "SELECT pl.id, l.name AS laboratory_name, ld.id AS link_id, ld.laboratory_id,
            d.id AS domain_id, d.title, d.description, d.image
     FROM project_laboratories pl
     JOIN laboratory_domains ld ON ld.id = pl.laboratory_domain_id
     JOIN laboratories l ON l.id = ld.laboratory_id
     JOIN domains d ON d.id = ld.domain_id
     WHERE pl.project_id = ?1 ORDER BY pl.id",
    [id],
    |row| {
      Ok(ProjectLaboratory {
        id:              row.get("id")?,
        laboratory_name: row.get("laboratory_name")?,
        link:            LaboratoryDomain {
          id:            row.get("link_id")?,
          laboratory_id: row.get("laboratory_id")?,
          domain:        domain(row)?,
        },
      })
    },
  )?;

  Ok(Some(ProjectDetail {
    project,
    team,
    timeline,
    objectives,
    achievements,
    publications,
    partners,
    laboratories,
  }))
}

const CONTACT_FROM: &str =
  "FROM laboratory_contacts c JOIN laboratories l ON l.id = c.laboratory_id";

fn hours_of(conn: &Connection, contact_id: i64) -> rusqlite::Result<Vec<HoursEntry>> {
  query_all(
    conn,
    "SELECT * FROM contact_hours WHERE contact_id = ?1 ORDER BY weekday, id",
    [contact_id],
    encode::hours,
  )
}

fn contact_detail(conn: &Connection, id: i64) -> rusqlite::Result<Option<ContactDetail>> {
  let found = conn
    .query_row(
      &format!("SELECT {CONTACT_COLUMNS} {CONTACT_FROM} WHERE c.id = ?1"),
      [id],
      |row| Ok((encode::contact(row)?, row.get::<_, String>("laboratory_name")?)),
    )
    .optional()?;
  let Some((contact, laboratory_name)) = found else { return Ok(None) };
  Ok(Some(ContactDetail { contact, laboratory_name, hours: hours_of(conn, id)? }))
}

fn hours_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<HoursEntry>> {
  conn
    .query_row("SELECT * FROM contact_hours WHERE id = ?1", [id], encode::hours)
    .optional()
}

const MESSAGE_FROM: &str = "FROM contact_messages m JOIN laboratories l ON l.id = m.laboratory_id";

fn message_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<MessageSummary>> {
  conn
    .query_row(
      &format!("SELECT {MESSAGE_COLUMNS} {MESSAGE_FROM} WHERE m.id = ?1"),
      [id],
      encode::message_summary,
    )
    .optional()
}

/// Run `UPDATE {table} SET {assignments}, {stamp} = NOW WHERE id = ?`; returns
/// whether a row matched.
fn apply_update(
  conn: &Connection,
  table: &str,
  stamp: &str,
  mut set: Fragments,
  id: i64,
) -> rusqlite::Result<bool> {
  set.push(format!("{stamp} = {NOW}"));
  let p = set.bind(id);
  let sql = format!("UPDATE {table} SET {} WHERE id = {p}", set.assignments());
  let changed = conn.execute(&sql, set.params())?;
  Ok(changed > 0)
}

// ─── PortalStore impl ────────────────────────────────────────────────────────

impl PortalStore for SqliteStore {
  type Error = Error;

  // ── Researchers ───────────────────────────────────────────────────────────

  async fn list_researchers(&self, filter: &ResearcherFilter) -> Result<Vec<ResearcherSummary>> {
    let f = researcher_conditions(filter);
    let sql = format!(
      "SELECT {RESEARCHER_COLUMNS} FROM researchers r {} ORDER BY r.id",
      f.where_clause()
    );

    let summaries = self
      .conn
      .call(move |conn| {
        let researchers = query_all(conn, &sql, f.params(), encode::researcher)?;
        let mut out = Vec::with_capacity(researchers.len());
        for researcher in researchers {
          let id = researcher.id;
          out.push(ResearcherSummary::from_parts(
            researcher,
            &positions_of(conn, id)?,
            &expertise_of(conn, id)?,
            links_of(conn, id)?,
          ));
        }
        Ok(out)
      })
      .await?;
    Ok(summaries)
  }

  async fn get_researcher(&self, id: i64) -> Result<Option<ResearcherDetail>> {
    let detail = self
      .conn
      .call(move |conn| Ok(researcher_detail(conn, id)?))
      .await?;
    Ok(detail)
  }

  // ── Laboratories ──────────────────────────────────────────────────────────

  async fn list_laboratories(&self, filter: &LaboratoryFilter) -> Result<Vec<Laboratory>> {
    let mut f = Fragments::new();
    f.search(&["l.name", "l.unit", "lt.label"], &filter.search);
    let sql = format!(
      "SELECT {LABORATORY_COLUMNS} FROM laboratories l
       JOIN laboratory_types lt ON lt.id = l.type_id {} ORDER BY l.id",
      f.where_clause()
    );

    let labs = self
      .conn
      .call(move |conn| Ok(query_all(conn, &sql, f.params(), encode::laboratory)?))
      .await?;
    Ok(labs)
  }

  async fn find_laboratory(&self, id: i64) -> Result<Option<Laboratory>> {
    let lab = self
      .conn
      .call(move |conn| Ok(laboratory_by_id(conn, id)?))
      .await?;
    Ok(lab)
  }

  async fn get_laboratory(&self, id: i64) -> Result<Option<LaboratoryDetail>> {
    let detail = self
      .conn
      .call(move |conn| Ok(laboratory_detail(conn, id)?))
      .await?;
    Ok(detail)
  }

  // ── Tracks ────────────────────────────────────────────────────────────────

  async fn list_tracks(&self, filter: &TrackFilter) -> Result<Vec<TrackSummary>> {
    let f = track_conditions(filter);
    let sql = format!(
      "SELECT {TRACK_COLUMNS}, l.name AS laboratory_name, l.unit AS laboratory_unit
       FROM tracks t JOIN laboratories l ON l.id = t.laboratory_id
       {} ORDER BY t.created_on DESC, t.id DESC",
      f.where_clause()
    );

    let tracks = self
      .conn
      .call(move |conn| {
        Ok(query_all(conn, &sql, f.params(), |row| {
          Ok(TrackSummary {
            track:           encode::track(row)?,
            laboratory_name: row.get("laboratory_name")?,
            laboratory_unit: row.get("laboratory_unit")?,
          })
        })?)
      })
      .await?;
    Ok(tracks)
  }

  async fn find_track(&self, id: i64) -> Result<Option<Track>> {
    let track = self
      .conn
      .call(move |conn| Ok(track_by_id(conn, id)?))
      .await?;
    Ok(track)
  }

  async fn get_track(&self, id: i64) -> Result<Option<TrackDetail>> {
    let detail = self
      .conn
      .call(move |conn| Ok(track_detail(conn, id)?))
      .await?;
    Ok(detail)
  }

  // ── Applications ──────────────────────────────────────────────────────────

  async fn list_applications(&self, filter: &ApplicationFilter) -> Result<Vec<ApplicationSummary>> {
    let mut f = Fragments::new();
    if let Some(track) = filter.track_id {
      f.eq("a.track_id", track);
    }
    f.search(&["a.family_name", "a.given_name", "a.email", "t.name"], &filter.search);
    let sql = format!(
      "SELECT {APPLICATION_COLUMNS} {APPLICATION_FROM} {}
       ORDER BY a.submitted_at DESC, a.id DESC",
      f.where_clause()
    );

    let applications = self
      .conn
      .call(move |conn| Ok(query_all(conn, &sql, f.params(), encode::application_summary)?))
      .await?;
    Ok(applications)
  }

  async fn get_application(&self, id: i64) -> Result<Option<ApplicationSummary>> {
    let application = self
      .conn
      .call(move |conn| Ok(application_by_id(conn, id)?))
      .await?;
    Ok(application)
  }

  async fn application_exists(&self, email: &str, track_id: i64) -> Result<bool> {
    let email = email.to_owned();
    let exists = self
      .conn
      .call(move |conn| {
        let exists: bool = conn.query_row(
          "SELECT EXISTS (SELECT 1 FROM applications WHERE email = ?1 AND track_id = ?2)",
          rusqlite::params![email, track_id],
          |r| r.get(0),
        )?;
        Ok(exists)
      })
      .await?;
    Ok(exists)
  }

  async fn create_application(&self, input: NewApplication) -> Result<ApplicationSummary> {
    let created = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO applications (
             family_name, given_name, birth_date, birth_place, nationality, phone, email,
             address, city, country, study_level, institution, field_of_study,
             average_grade, graduation_year, cv, motivation_letter, transcripts, diploma,
             track_id, motivation, career_plan, expectations, status
           ) VALUES (
             ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
             ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24
           )",
          rusqlite::params![
            input.family_name,
            input.given_name,
            encode_date(input.birth_date),
            input.birth_place,
            input.nationality,
            input.phone,
            input.email,
            input.address,
            input.city,
            input.country,
            input.study_level.code(),
            input.institution,
            input.field_of_study,
            input.average_grade,
            input.graduation_year,
            input.documents.cv,
            input.documents.motivation_letter,
            input.documents.transcripts,
            input.documents.diploma,
            input.track_id,
            input.motivation,
            input.career_plan,
            input.expectations,
            ApplicationStatus::Pending.code(),
          ],
        )?;
        let id = conn.last_insert_rowid();
        application_by_id(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows.into())
      })
      .await?;

    tracing::debug!(application = created.application.id, "Application stored");
    Ok(created)
  }

  // ── Publications ──────────────────────────────────────────────────────────

  async fn list_publications(&self, filter: &PublicationFilter) -> Result<Vec<PublicationSummary>> {
    let f = publication_conditions(filter);
    let dir = if filter.ordering.descending { "DESC" } else { "ASC" };
    let sql = format!(
      "SELECT {PUBLICATION_COLUMNS},
              (SELECT COUNT(*) FROM publication_citations pc
               WHERE pc.publication_id = pub.id) AS citation_count
       {PUBLICATION_FROM} {}
       ORDER BY {col} {dir}, pub.id {dir}",
      f.where_clause(),
      col = sort_column(filter.ordering.key),
    );

    let publications = self
      .conn
      .call(move |conn| {
        let rows = query_all(conn, &sql, f.params(), |row| {
          Ok((
            encode::publication(row)?,
            row.get::<_, String>("project_title")?,
            row.get::<_, i64>("citation_count")?,
          ))
        })?;
        let mut out = Vec::with_capacity(rows.len());
        for (publication, project_title, citation_count) in rows {
          let contributors = contributors_of(conn, publication.project_id)?;
          out.push(PublicationSummary { publication, project_title, citation_count, contributors });
        }
        Ok(out)
      })
      .await?;
    Ok(publications)
  }

  async fn get_publication(&self, id: i64) -> Result<Option<PublicationDetail>> {
    let detail = self
      .conn
      .call(move |conn| Ok(publication_detail(conn, id)?))
      .await?;
    Ok(detail)
  }

  // ── Research projects ─────────────────────────────────────────────────────

  async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<ResearchProject>> {
    let f = project_conditions(filter);
    let sql = format!(
      "SELECT {PROJECT_COLUMNS} FROM projects p {} ORDER BY p.starts_on DESC, p.id DESC",
      f.where_clause()
    );

    let projects = self
      .conn
      .call(move |conn| Ok(query_all(conn, &sql, f.params(), encode::project)?))
      .await?;
    Ok(projects)
  }

  async fn get_project(&self, id: i64) -> Result<Option<ProjectDetail>> {
    let detail = self
      .conn
      .call(move |conn| Ok(project_detail(conn, id)?))
      .await?;
    Ok(detail)
  }

  async fn set_project_status(
    &self,
    id: i64,
    status: ProjectStatus,
    actual_end_on: Option<NaiveDate>,
  ) -> Result<Option<ResearchProject>> {
    let Some(project) = self.find_project(id).await? else {
      return Ok(None);
    };
    if actual_end_on.is_some_and(|end| end < project.starts_on) {
      return Err(Error::ProjectDates(id));
    }

    let mut set = Fragments::new();
    set.eq("status", status.code().to_owned());
    set.set_or_null("actual_end_on", actual_end_on.map(encode_date));

    let updated = self
      .conn
      .call(move |conn| {
        apply_update(conn, "projects", "updated_at", set, id)?;
        Ok(project_by_id(conn, id)?)
      })
      .await?;

    tracing::info!(project = id, status = status.code(), "Project status changed");
    Ok(updated)
  }

  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn list_contacts(&self, filter: &ContactFilter) -> Result<Vec<ContactSummary>> {
    let mut f = Fragments::new();
    if let Some(lab) = filter.laboratory_id {
      f.eq("c.laboratory_id", lab);
    }
    if let Some(kind) = filter.kind {
      f.eq("c.kind", kind.code().to_owned());
    }
    if let Some(active) = filter.active {
      f.eq("c.active", active);
    }
    let sql = format!(
      "SELECT {CONTACT_COLUMNS} {CONTACT_FROM} {} ORDER BY c.active DESC, c.kind, c.id",
      f.where_clause()
    );

    let contacts = self
      .conn
      .call(move |conn| {
        Ok(query_all(conn, &sql, f.params(), |row| {
          Ok(ContactSummary {
            contact:         encode::contact(row)?,
            laboratory_name: row.get("laboratory_name")?,
          })
        })?)
      })
      .await?;
    Ok(contacts)
  }

  async fn get_contact(&self, id: i64) -> Result<Option<ContactDetail>> {
    let detail = self
      .conn
      .call(move |conn| Ok(contact_detail(conn, id)?))
      .await?;
    Ok(detail)
  }

  async fn create_contact(&self, input: NewContact) -> Result<ContactDetail> {
    let detail = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO laboratory_contacts (
             laboratory_id, kind, address, city, postal_code, country,
             phone, email, mail_secret_ref, website, active
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            input.laboratory_id,
            input.kind.code(),
            input.address,
            input.city,
            input.postal_code,
            input.country,
            input.phone,
            input.email,
            input.mail_secret_ref,
            input.website,
            input.active,
          ],
        )?;
        let id = conn.last_insert_rowid();
        contact_detail(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows.into())
      })
      .await?;
    Ok(detail)
  }

  async fn update_contact(&self, id: i64, patch: ContactPatch) -> Result<Option<ContactDetail>> {
    let mut set = Fragments::new();
    set.set("kind", patch.kind.map(|k| k.code().to_owned()));
    set.set("address", patch.address);
    set.set("city", patch.city);
    set.set("postal_code", patch.postal_code);
    set.set("country", patch.country);
    set.set("phone", patch.phone);
    set.set("email", patch.email);
    set.set("mail_secret_ref", patch.mail_secret_ref);
    set.set("website", patch.website);
    set.set("active", patch.active);

    let detail = self
      .conn
      .call(move |conn| {
        if !apply_update(conn, "laboratory_contacts", "updated_at", set, id)? {
          return Ok(None);
        }
        Ok(contact_detail(conn, id)?)
      })
      .await?;
    Ok(detail)
  }

  async fn principal_contact(&self, laboratory_id: i64) -> Result<Option<ContactRecord>> {
    let contact = self
      .conn
      .call(move |conn| {
        let contact = conn
          .query_row(
            &format!(
              "SELECT {CONTACT_COLUMNS} {CONTACT_FROM}
               WHERE c.laboratory_id = ?1 AND c.kind = ?2 AND c.active = 1
               ORDER BY c.id LIMIT 1"
            ),
            rusqlite::params![laboratory_id, ContactType::Principal.code()],
            encode::contact,
          )
          .optional()?;
        Ok(contact)
      })
      .await?;
    Ok(contact)
  }

  // ── Opening hours ─────────────────────────────────────────────────────────

  async fn list_hours(&self, filter: &HoursFilter) -> Result<Vec<HoursEntry>> {
    let mut f = Fragments::new();
    if let Some(contact) = filter.contact_id {
      f.eq("h.contact_id", contact);
    }
    if let Some(day) = filter.weekday {
      f.eq("h.weekday", i64::from(day.number()));
    }
    if filter.open_only {
      f.push("h.closed = 0");
    }
    if let Some(lab) = filter.laboratory_id {
      let p = f.bind(lab);
      f.push(format!(
        "h.contact_id IN (SELECT id FROM laboratory_contacts WHERE laboratory_id = {p})"
      ));
    }
    let sql = format!(
      "SELECT h.* FROM contact_hours h {} ORDER BY h.contact_id, h.weekday, h.id",
      f.where_clause()
    );

    let hours = self
      .conn
      .call(move |conn| Ok(query_all(conn, &sql, f.params(), encode::hours)?))
      .await?;
    Ok(hours)
  }

  async fn get_hours(&self, id: i64) -> Result<Option<HoursEntry>> {
    let hours = self
      .conn
      .call(move |conn| Ok(hours_by_id(conn, id)?))
      .await?;
    Ok(hours)
  }

  async fn create_hours(&self, input: NewHours) -> Result<HoursEntry> {
    let hours = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contact_hours (contact_id, weekday, opens_at, closes_at, closed, notes)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            input.contact_id,
            input.weekday.number(),
            input.opens_at.map(encode_time),
            input.closes_at.map(encode_time),
            input.closed,
            input.notes,
          ],
        )?;
        let id = conn.last_insert_rowid();
        hours_by_id(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows.into())
      })
      .await?;
    Ok(hours)
  }

  async fn update_hours(&self, id: i64, patch: HoursPatch) -> Result<Option<HoursEntry>> {
    let mut set = Fragments::new();
    set.set("weekday", patch.weekday.map(|d| i64::from(d.number())));
    set.set("opens_at", patch.opens_at.map(encode_time));
    set.set("closes_at", patch.closes_at.map(encode_time));
    set.set("closed", patch.closed);
    set.set("notes", patch.notes);

    let hours = self
      .conn
      .call(move |conn| {
        if !apply_update(conn, "contact_hours", "updated_at", set, id)? {
          return Ok(None);
        }
        Ok(hours_by_id(conn, id)?)
      })
      .await?;
    Ok(hours)
  }

  // ── Messages ──────────────────────────────────────────────────────────────

  async fn list_messages(&self, filter: &MessageFilter) -> Result<Vec<MessageSummary>> {
    let f = message_conditions(filter);
    let sql = format!(
      "SELECT {MESSAGE_COLUMNS} {MESSAGE_FROM} {} ORDER BY m.sent_at DESC, m.id DESC",
      f.where_clause()
    );

    let messages = self
      .conn
      .call(move |conn| Ok(query_all(conn, &sql, f.params(), encode::message_summary)?))
      .await?;
    Ok(messages)
  }

  async fn get_message(&self, id: i64) -> Result<Option<MessageSummary>> {
    let message = self
      .conn
      .call(move |conn| Ok(message_by_id(conn, id)?))
      .await?;
    Ok(message)
  }

  async fn create_message(&self, input: NewMessage) -> Result<MessageSummary> {
    let message = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contact_messages (
             laboratory_id, sender_given_name, sender_family_name, sender_email,
             sender_organization, subject, body, status, priority, processed
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0)",
          rusqlite::params![
            input.laboratory_id,
            input.sender_given_name,
            input.sender_family_name,
            input.sender_email,
            input.sender_organization,
            input.subject,
            input.body,
            MessageStatus::New.code(),
            input.priority.code(),
          ],
        )?;
        let id = conn.last_insert_rowid();
        message_by_id(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows.into())
      })
      .await?;

    tracing::debug!(message = message.message.id, "Contact message stored");
    Ok(message)
  }

  async fn update_message(&self, id: i64, patch: MessagePatch) -> Result<Option<MessageSummary>> {
    let stamps_reply = patch.carries_reply();
    let mut set = Fragments::new();
    set.set("status", patch.status.map(|s| s.code().to_owned()));
    set.set("priority", patch.priority.map(|p| p.code().to_owned()));
    set.set("reply", patch.reply);
    set.set("reply_author", patch.reply_author);
    set.set("processed", patch.processed);
    if stamps_reply {
      set.push(format!("replied_at = {NOW}"));
    }

    let message = self
      .conn
      .call(move |conn| {
        if !apply_update(conn, "contact_messages", "modified_at", set, id)? {
          return Ok(None);
        }
        Ok(message_by_id(conn, id)?)
      })
      .await?;
    Ok(message)
  }
}
