//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, Utc};
use serde_json::json;

use una_core::{
  application::{ApplicationDocuments, ApplicationStatus, NewApplication, StudyLevel},
  contact::{
    ContactPatch, ContactType, HoursPatch, MessagePatch, MessageStatus, NewContact, NewHours,
    NewMessage, Priority, Reply, Weekday,
  },
  project::{ProjectStatus, TeamRole},
  query::{
    ApplicationFilter, ContactFilter, HoursFilter, LaboratoryFilter, LaboratoryScope,
    MessageFilter, ProjectFilter, PublicationFilter, PublicationOrdering, PublicationSortKey,
    ResearcherFilter, TrackFilter,
  },
  store::PortalStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// Two laboratories, three researchers (one retired), two projects with
/// three publications, four tracks (one inactive) and two contacts.
async fn seeded() -> SqliteStore {
  let s = store().await;
  s.load_fixture(json!({
    "laboratory_types": [{ "id": 1, "label": "Laboratoire de recherche" }],
    "laboratories": [
      { "id": 1, "type_id": 1, "name": "LaSTIC", "unit": "UFR SFA", "founded_on": "2010-01-01" },
      { "id": 2, "type_id": 1, "name": "LBE", "unit": "UFR SN", "founded_on": "2012-05-01" }
    ],
    "domains": [
      { "id": 1, "title": "Informatique" },
      { "id": 2, "title": "Biologie" }
    ],
    "laboratory_domains": [
      { "id": 1, "laboratory_id": 1, "domain_id": 1 },
      { "id": 2, "laboratory_id": 2, "domain_id": 2 }
    ],
    "researchers": [
      { "id": 1, "family_name": "Diallo", "given_name": "Awa", "hired_on": "2019-09-01" },
      { "id": 2, "family_name": "Koné", "given_name": "Issa", "hired_on": "2015-01-01" },
      { "id": 3, "family_name": "Traoré", "given_name": "Moussa",
        "status": "retraite", "hired_on": "2000-01-01" }
    ],
    "positions": [{ "id": 1, "name": "Maître de conférences", "abbreviation": "MC" }],
    "researcher_positions": [
      { "id": 1, "researcher_id": 1, "position_id": 1 },
      { "id": 2, "researcher_id": 2, "position_id": 1 }
    ],
    "researcher_laboratories": [
      { "id": 1, "researcher_position_id": 1, "laboratory_id": 1 },
      { "id": 2, "researcher_position_id": 2, "laboratory_id": 2 }
    ],
    "researcher_expertise": [{ "id": 1, "researcher_id": 1, "domain_id": 1 }],
    "researcher_links": [
      { "id": 1, "researcher_id": 1, "kind": "LinkedIn", "contact": "linkedin.com/in/awa" },
      { "id": 2, "researcher_id": 1, "kind": "Email", "contact": "awa@una.edu" }
    ],
    "projects": [
      { "id": 1, "title": "Vision par ordinateur", "status": "En cours",
        "starts_on": "2023-01-01", "planned_end_on": "2025-12-31" },
      { "id": 2, "title": "Génomique", "status": "Planifier", "starts_on": "2024-02-01" }
    ],
    "project_members": [
      { "id": 1, "project_id": 1, "researcher_id": 1, "role": "chef_projet" },
      { "id": 2, "project_id": 2, "researcher_id": 2, "role": "chercheur_principal" }
    ],
    "project_laboratories": [
      { "id": 1, "laboratory_domain_id": 1, "project_id": 1 },
      { "id": 2, "laboratory_domain_id": 2, "project_id": 2 }
    ],
    "publications": [
      { "id": 1, "project_id": 1, "title": "Deep learning for crops",
        "published_on": "2024-03-01", "impact_factor": 3.5, "file": "publications/p1.pdf" },
      { "id": 2, "project_id": 1, "title": "Plant biology survey",
        "published_on": "2023-06-01", "impact_factor": 1.2, "url": "https://doi.org/10.1/x" },
      { "id": 3, "project_id": 2, "title": "Sequencing pipelines", "published_on": "2022-01-10" }
    ],
    "publication_keywords": [
      { "publication_id": 1, "keyword": "AI" },
      { "publication_id": 2, "keyword": "Biology" },
      { "publication_id": 3, "keyword": "Genomics" }
    ],
    "publication_citations": [
      { "publication_id": 1, "citation": "Diallo et al. 2024" },
      { "publication_id": 1, "citation": "Cited in Nature" }
    ],
    "tracks": [
      { "id": 1, "laboratory_id": 1, "name": "Master Informatique", "created_on": "2020-09-01" },
      { "id": 2, "laboratory_id": 1, "name": "Master IA", "created_on": "2022-09-01" },
      { "id": 3, "laboratory_id": 2, "name": "Master Biologie", "created_on": "2021-09-01" },
      { "id": 4, "laboratory_id": 1, "name": "Ancien parcours", "status": "Inactif",
        "created_on": "2010-01-01" }
    ],
    "track_outcomes": [{ "track_id": 2, "outcome": "Ingénieur IA" }],
    "laboratory_contacts": [
      { "id": 1, "laboratory_id": 1, "kind": "principal", "address": "BP 1", "city": "Abidjan",
        "country": "Côte d'Ivoire", "email": "lastic@una.edu", "mail_secret_ref": "lastic" },
      { "id": 2, "laboratory_id": 2, "kind": "direction", "address": "BP 2", "city": "Abidjan",
        "country": "Côte d'Ivoire", "active": false }
    ],
    "contact_hours": [
      { "contact_id": 1, "weekday": 2, "opens_at": "08:00", "closes_at": "17:00" },
      { "contact_id": 1, "weekday": 1, "opens_at": "08:00:00", "closes_at": "17:00:00" },
      { "contact_id": 1, "weekday": 7, "closed": true }
    ]
  }))
  .await
  .expect("fixture");
  s
}

fn ids<T>(items: &[T], id: impl Fn(&T) -> i64) -> Vec<i64> {
  items.iter().map(id).collect()
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
  pairs
    .iter()
    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
    .collect()
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fixture_rejects_unknown_table() {
  let s = store().await;
  let err = s.load_fixture(json!({ "chercheurs": [] })).await.unwrap_err();
  assert!(matches!(err, Error::UnknownTable(t) if t == "chercheurs"));
}

#[tokio::test]
async fn fixture_rejects_unknown_column_without_writing() {
  let s = store().await;
  let err = s
    .load_fixture(json!({
      "laboratory_types": [{ "id": 1, "label": "Labo" }],
      "laboratories": [{ "id": 1, "type_id": 1, "nom": "X", "founded_on": "2010-01-01" }]
    }))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UnknownColumn { column, .. } if column == "nom"));
  assert!(s.find_laboratory(1).await.unwrap().is_none());
}

#[tokio::test]
async fn fixture_from_text() {
  let s = store().await;
  let n = s
    .load_fixture_str(r#"{ "laboratory_types": [{ "label": "Unité mixte" }] }"#)
    .await
    .unwrap();
  assert_eq!(n, 1);
}

// ─── Researchers ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn researchers_list_active_only_by_id() {
  let s = seeded().await;
  let all = s.list_researchers(&ResearcherFilter::default()).await.unwrap();
  assert_eq!(ids(&all, |r| r.researcher.id), vec![1, 2]);

  let awa = &all[0];
  assert_eq!(awa.principal_position.as_deref(), Some("Maître de conférences"));
  assert_eq!(awa.speciality.as_deref(), Some("Informatique"));
  assert_eq!(awa.email.as_deref(), Some("awa@una.edu"));
}

#[tokio::test]
async fn researchers_search_requires_every_term() {
  let s = seeded().await;
  let filter = ResearcherFilter { search: vec!["awa".into(), "DIALLO".into()], ..Default::default() };
  let found = s.list_researchers(&filter).await.unwrap();
  assert_eq!(ids(&found, |r| r.researcher.id), vec![1]);

  let filter = ResearcherFilter { search: vec!["awa".into(), "koné".into()], ..Default::default() };
  assert!(s.list_researchers(&filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn researchers_narrow_through_laboratory_membership() {
  let s = seeded().await;
  let filter = ResearcherFilter { laboratory_id: Some(2), ..Default::default() };
  let found = s.list_researchers(&filter).await.unwrap();
  assert_eq!(ids(&found, |r| r.researcher.id), vec![2]);
}

#[tokio::test]
async fn unparsable_laboratory_id_is_ignored() {
  let s = seeded().await;
  let bad = ResearcherFilter::from_params(&params(&[("laboratoire_id", "abc")]));
  let none = ResearcherFilter::from_params(&params(&[]));
  let a = s.list_researchers(&bad).await.unwrap();
  let b = s.list_researchers(&none).await.unwrap();
  assert_eq!(ids(&a, |r| r.researcher.id), ids(&b, |r| r.researcher.id));
}

#[tokio::test]
async fn researcher_detail_collects_projects_and_publications() {
  let s = seeded().await;
  let detail = s.get_researcher(1).await.unwrap().expect("researcher 1");
  assert_eq!(ids(&detail.publications, |p| p.id), vec![1, 2]);
  assert_eq!(detail.current_projects.len(), 1);
  assert_eq!(detail.current_projects[0].role, TeamRole::ProjectLead);
  assert_eq!(detail.links.len(), 2);

  assert!(s.get_researcher(3).await.unwrap().is_none(), "retired researcher is hidden");
}

// ─── Laboratories & tracks ───────────────────────────────────────────────────

#[tokio::test]
async fn laboratories_search_over_unit() {
  let s = seeded().await;
  let filter = LaboratoryFilter { search: vec!["sn".into()] };
  let found = s.list_laboratories(&filter).await.unwrap();
  assert_eq!(ids(&found, |l| l.id), vec![2]);
  assert_eq!(found[0].kind.label, "Laboratoire de recherche");
}

#[tokio::test]
async fn laboratory_detail_includes_domains() {
  let s = seeded().await;
  let detail = s.get_laboratory(1).await.unwrap().expect("lab 1");
  assert_eq!(detail.domains.len(), 1);
  assert_eq!(detail.domains[0].domain.title, "Informatique");
  assert!(s.get_laboratory(99).await.unwrap().is_none());
}

#[tokio::test]
async fn tracks_newest_first_active_only() {
  let s = seeded().await;
  let unscoped = TrackFilter::from_params(&params(&[]), &LaboratoryScope::unrestricted());
  let all = s.list_tracks(&unscoped).await.unwrap();
  assert_eq!(ids(&all, |t| t.track.id), vec![2, 3, 1]);

  let lab = s.list_tracks(&TrackFilter::for_laboratory(1)).await.unwrap();
  assert_eq!(ids(&lab, |t| t.track.id), vec![2, 1]);
  assert_eq!(lab[0].laboratory_unit, "UFR SFA");
}

#[tokio::test]
async fn tracks_default_to_the_default_laboratory() {
  let s = seeded().await;
  let filter = TrackFilter::from_params(&params(&[]), &LaboratoryScope::default());
  let found = s.list_tracks(&filter).await.unwrap();
  assert!(found.iter().all(|t| t.track.laboratory_id == 1));
}

#[tokio::test]
async fn tracks_match_laboratory_name_case_insensitively() {
  let s = seeded().await;
  let filter = TrackFilter { laboratory_name: Some("lbe".into()), ..Default::default() };
  let found = s.list_tracks(&filter).await.unwrap();
  assert_eq!(ids(&found, |t| t.track.id), vec![3]);
}

#[tokio::test]
async fn inactive_track_is_found_but_not_shown() {
  let s = seeded().await;
  assert!(s.find_track(4).await.unwrap().is_some());
  assert!(s.get_track(4).await.unwrap().is_none());

  let detail = s.get_track(2).await.unwrap().expect("track 2");
  assert_eq!(detail.laboratory.name, "LaSTIC");
  assert_eq!(detail.outcomes[0].outcome, "Ingénieur IA");
}

// ─── Publications ────────────────────────────────────────────────────────────

fn unscoped(filter: PublicationFilter) -> PublicationFilter {
  PublicationFilter { laboratory_id: None, ..filter }
}

#[tokio::test]
async fn keyword_filter_is_an_or_match() {
  let s = seeded().await;
  let filter = PublicationFilter::from_params(
    &params(&[("mot_cle", "ai,biology")]),
    &LaboratoryScope::unrestricted(),
  );
  let mut found = ids(&s.list_publications(&filter).await.unwrap(), |p| p.publication.id);
  found.sort();
  assert_eq!(found, vec![1, 2]);

  let filter = PublicationFilter::from_params(
    &params(&[("mot_cle", "chemistry")]),
    &LaboratoryScope::unrestricted(),
  );
  assert!(s.list_publications(&filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn publications_default_to_laboratory_one() {
  let s = seeded().await;
  let filter = PublicationFilter::from_params(&params(&[]), &LaboratoryScope::default());
  let found = s.list_publications(&filter).await.unwrap();
  assert_eq!(ids(&found, |p| p.publication.id), vec![1, 2]);
}

#[tokio::test]
async fn publications_narrow_on_domain_link() {
  let s = seeded().await;
  let filter = PublicationFilter {
    laboratory_id: Some(2),
    laboratory_domain_id: Some(2),
    ..Default::default()
  };
  let found = s.list_publications(&filter).await.unwrap();
  assert_eq!(ids(&found, |p| p.publication.id), vec![3]);

  let filter = PublicationFilter { laboratory_domain_id: Some(1), ..filter };
  assert!(s.list_publications(&filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn publications_order_by_requested_key() {
  let s = seeded().await;
  let filter = unscoped(PublicationFilter {
    ordering: PublicationOrdering { key: PublicationSortKey::ImpactFactor, descending: false },
    ..Default::default()
  });
  let found = s.list_publications(&filter).await.unwrap();
  // Missing impact factors sort first in ascending order.
  assert_eq!(ids(&found, |p| p.publication.id), vec![3, 2, 1]);

  let filter = unscoped(PublicationFilter::default());
  let found = s.list_publications(&filter).await.unwrap();
  assert_eq!(ids(&found, |p| p.publication.id), vec![1, 2, 3]);
}

#[tokio::test]
async fn publication_flags_and_ranges() {
  let s = seeded().await;
  let base = unscoped(PublicationFilter::default());

  let pdf = PublicationFilter { has_pdf: true, ..base.clone() };
  assert_eq!(ids(&s.list_publications(&pdf).await.unwrap(), |p| p.publication.id), vec![1]);

  let url = PublicationFilter { has_url: true, ..base.clone() };
  assert_eq!(ids(&s.list_publications(&url).await.unwrap(), |p| p.publication.id), vec![2]);

  let year = PublicationFilter { year: Some(2023), ..base.clone() };
  assert_eq!(ids(&s.list_publications(&year).await.unwrap(), |p| p.publication.id), vec![2]);

  let impact = PublicationFilter { min_impact_factor: Some(2.0), ..base.clone() };
  assert_eq!(ids(&s.list_publications(&impact).await.unwrap(), |p| p.publication.id), vec![1]);

  let cited = PublicationFilter { citation: Some("nature".into()), ..base };
  assert_eq!(ids(&s.list_publications(&cited).await.unwrap(), |p| p.publication.id), vec![1]);
}

#[tokio::test]
async fn publication_summary_counts_citations_and_lists_team() {
  let s = seeded().await;
  let found = s
    .list_publications(&unscoped(PublicationFilter::default()))
    .await
    .unwrap();
  let first = &found[0];
  assert_eq!(first.citation_count, 2);
  assert_eq!(first.project_title, "Vision par ordinateur");
  assert_eq!(first.contributors[0].full_name, "Awa Diallo");

  let detail = s.get_publication(1).await.unwrap().expect("publication 1");
  assert_eq!(detail.keywords[0].keyword, "AI");
  assert_eq!(detail.citations.len(), 2);
}

// ─── Applications ────────────────────────────────────────────────────────────

fn application(email: &str, track_id: i64) -> NewApplication {
  NewApplication {
    family_name:     "Kouassi".into(),
    given_name:      "Ama".into(),
    birth_date:      NaiveDate::from_ymd_opt(2000, 6, 15).unwrap(),
    birth_place:     "Bouaké".into(),
    nationality:     "Ivoirienne".into(),
    phone:           "+225 0102030405".into(),
    email:           email.into(),
    address:         "Cocody".into(),
    city:            "Abidjan".into(),
    country:         "Côte d'Ivoire".into(),
    study_level:     StudyLevel::Licence,
    institution:     "UNA".into(),
    field_of_study:  "Informatique".into(),
    average_grade:   14.5,
    graduation_year: 2023,
    documents:       ApplicationDocuments {
      cv:                "candidatures/cv/ab12_cv.pdf".into(),
      motivation_letter: "candidatures/lettres/cd34_lettre.pdf".into(),
      transcripts:       "candidatures/releves/ef56_releve.pdf".into(),
      diploma:           None,
    },
    track_id,
    motivation:      None,
    career_plan:     None,
    expectations:    None,
  }
}

#[tokio::test]
async fn application_roundtrip_and_duplicate_check() {
  let s = seeded().await;
  assert!(!s.application_exists("ama@example.com", 2).await.unwrap());

  let created = s.create_application(application("ama@example.com", 2)).await.unwrap();
  assert_eq!(created.application.status, ApplicationStatus::Pending);
  assert_eq!(created.track_name, "Master IA");
  assert_eq!(created.laboratory_name, "LaSTIC");

  assert!(s.application_exists("ama@example.com", 2).await.unwrap());
  assert!(!s.application_exists("ama@example.com", 1).await.unwrap());
  assert!(!s.application_exists("AMA@example.com", 2).await.unwrap());
}

#[tokio::test]
async fn applications_latest_first_and_filtered() {
  let s = seeded().await;
  let first = s.create_application(application("a@example.com", 1)).await.unwrap();
  let second = s.create_application(application("b@example.com", 2)).await.unwrap();

  let all = s.list_applications(&ApplicationFilter::default()).await.unwrap();
  assert_eq!(
    ids(&all, |a| a.application.id),
    vec![second.application.id, first.application.id]
  );

  let by_track = ApplicationFilter { track_id: Some(1), ..Default::default() };
  let found = s.list_applications(&by_track).await.unwrap();
  assert_eq!(ids(&found, |a| a.application.id), vec![first.application.id]);

  let search = ApplicationFilter { search: vec!["master ia".into()], ..Default::default() };
  let found = s.list_applications(&search).await.unwrap();
  assert_eq!(ids(&found, |a| a.application.id), vec![second.application.id]);
}

// ─── Projects ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn projects_latest_start_first() {
  let s = seeded().await;
  let all = s.list_projects(&ProjectFilter::default()).await.unwrap();
  assert_eq!(ids(&all, |p| p.id), vec![2, 1]);

  let ongoing = ProjectFilter { status: Some(ProjectStatus::Ongoing), ..Default::default() };
  assert_eq!(ids(&s.list_projects(&ongoing).await.unwrap(), |p| p.id), vec![1]);

  let lab = ProjectFilter { laboratory_id: Some(2), ..Default::default() };
  assert_eq!(ids(&s.list_projects(&lab).await.unwrap(), |p| p.id), vec![2]);
}

#[tokio::test]
async fn project_detail_gathers_relations() {
  let s = seeded().await;
  let detail = s.get_project(1).await.unwrap().expect("project 1");
  assert_eq!(detail.team[0].full_name, "Awa Diallo");
  assert_eq!(ids(&detail.publications, |p| p.id), vec![1, 2]);
  assert_eq!(detail.laboratories[0].laboratory_name, "LaSTIC");
}

#[tokio::test]
async fn project_status_stamps_and_clears_end_date() {
  let s = seeded().await;
  let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
  let done = s
    .set_project_status(1, ProjectStatus::Completed, Some(end))
    .await
    .unwrap()
    .expect("project 1");
  assert_eq!(done.status, ProjectStatus::Completed);
  assert_eq!(done.actual_end_on, Some(end));

  let early = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
  let err = s
    .set_project_status(1, ProjectStatus::Completed, Some(early))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ProjectDates(1)));

  let reopened = s
    .set_project_status(1, ProjectStatus::Ongoing, None)
    .await
    .unwrap()
    .expect("project 1");
  assert_eq!(reopened.status, ProjectStatus::Ongoing);
  assert_eq!(reopened.actual_end_on, None);

  assert!(s.set_project_status(99, ProjectStatus::Ongoing, None).await.unwrap().is_none());
}

// ─── Contacts & hours ────────────────────────────────────────────────────────

#[tokio::test]
async fn contacts_active_first() {
  let s = seeded().await;
  let all = s.list_contacts(&ContactFilter::default()).await.unwrap();
  assert_eq!(ids(&all, |c| c.contact.id), vec![1, 2]);

  let inactive = ContactFilter { active: Some(false), ..Default::default() };
  assert_eq!(ids(&s.list_contacts(&inactive).await.unwrap(), |c| c.contact.id), vec![2]);
}

#[tokio::test]
async fn principal_contact_must_be_active() {
  let s = seeded().await;
  let principal = s.principal_contact(1).await.unwrap().expect("principal of lab 1");
  assert_eq!(principal.mail_secret_ref.as_deref(), Some("lastic"));
  assert!(s.principal_contact(2).await.unwrap().is_none());

  s.update_contact(1, ContactPatch { active: Some(false), ..Default::default() })
    .await
    .unwrap();
  assert!(s.principal_contact(1).await.unwrap().is_none());
}

#[tokio::test]
async fn contact_create_and_patch() {
  let s = seeded().await;
  let created = s
    .create_contact(NewContact {
      laboratory_id:   2,
      kind:            ContactType::Principal,
      address:         "BP 3".into(),
      city:            "Yamoussoukro".into(),
      postal_code:     None,
      country:         "Côte d'Ivoire".into(),
      phone:           None,
      email:           Some("lbe@una.edu".into()),
      mail_secret_ref: None,
      website:         None,
      active:          true,
    })
    .await
    .unwrap();
  assert_eq!(created.laboratory_name, "LBE");
  assert!(created.hours.is_empty());

  let patched = s
    .update_contact(
      created.contact.id,
      ContactPatch { city: Some("Abidjan".into()), ..Default::default() },
    )
    .await
    .unwrap()
    .expect("patched contact");
  assert_eq!(patched.contact.city, "Abidjan");
  assert_eq!(patched.contact.email.as_deref(), Some("lbe@una.edu"));

  assert!(s.update_contact(99, ContactPatch::default()).await.unwrap().is_none());
}

#[tokio::test]
async fn hours_by_weekday_and_open_only() {
  let s = seeded().await;
  let all = s.list_hours(&HoursFilter::for_contact(1)).await.unwrap();
  let days: Vec<_> = all.iter().map(|h| h.weekday).collect();
  assert_eq!(days, vec![Weekday::Monday, Weekday::Tuesday, Weekday::Sunday]);
  assert_eq!(all[0].opens_at, NaiveTime::from_hms_opt(8, 0, 0));

  let open = HoursFilter { open_only: true, ..HoursFilter::for_contact(1) };
  assert_eq!(s.list_hours(&open).await.unwrap().len(), 2);

  let lab2 = HoursFilter { laboratory_id: Some(2), ..Default::default() };
  assert!(s.list_hours(&lab2).await.unwrap().is_empty());
}

#[tokio::test]
async fn hours_create_and_patch() {
  let s = seeded().await;
  let created = s
    .create_hours(NewHours {
      contact_id: 1,
      weekday:    Weekday::Saturday,
      opens_at:   NaiveTime::from_hms_opt(9, 0, 0),
      closes_at:  NaiveTime::from_hms_opt(12, 30, 0),
      closed:     false,
      notes:      Some("Permanence".into()),
    })
    .await
    .unwrap();
  assert_eq!(created.closes_at, NaiveTime::from_hms_opt(12, 30, 0));

  let patched = s
    .update_hours(created.id, HoursPatch { closed: Some(true), ..Default::default() })
    .await
    .unwrap()
    .expect("patched hours");
  assert!(patched.closed);
  assert_eq!(patched.notes.as_deref(), Some("Permanence"));
}

// ─── Messages ────────────────────────────────────────────────────────────────

fn message(priority: Priority) -> NewMessage {
  NewMessage {
    laboratory_id:       1,
    sender_given_name:   "Yao".into(),
    sender_family_name:  "N'Guessan".into(),
    sender_email:        "yao@example.com".into(),
    sender_organization: None,
    subject:             "Stage".into(),
    body:                "Bonjour, je souhaite un stage.".into(),
    priority,
  }
}

#[tokio::test]
async fn messages_start_new_and_unprocessed() {
  let s = seeded().await;
  let created = s.create_message(message(Priority::High)).await.unwrap();
  assert_eq!(created.message.status, MessageStatus::New);
  assert!(!created.message.processed);
  assert!(created.message.replied_at.is_none());
  assert_eq!(created.laboratory_name, "LaSTIC");
}

#[tokio::test]
async fn reply_stamps_replied_at() {
  let s = seeded().await;
  let created = s.create_message(message(Priority::Normal)).await.unwrap();
  let id = created.message.id;

  let status_only = MessagePatch { status: Some(MessageStatus::InProgress), ..Default::default() };
  let updated = s.update_message(id, status_only).await.unwrap().expect("message");
  assert!(updated.message.replied_at.is_none());

  let reply = Reply { text: Some("Merci".into()), author: Some("Direction".into()) };
  let replied = s.update_message(id, reply.into_patch()).await.unwrap().expect("message");
  assert_eq!(replied.message.status, MessageStatus::Processed);
  assert!(replied.message.processed);
  assert!(replied.message.replied_at.is_some());
  assert_eq!(replied.message.reply_author.as_deref(), Some("Direction"));
}

#[tokio::test]
async fn messages_filter_by_priority_and_sent_date() {
  let s = seeded().await;
  let low = s.create_message(message(Priority::Low)).await.unwrap();
  let urgent = s.create_message(message(Priority::Urgent)).await.unwrap();

  let all = s.list_messages(&MessageFilter::default()).await.unwrap();
  assert_eq!(ids(&all, |m| m.message.id), vec![urgent.message.id, low.message.id]);

  let filter = MessageFilter { priority: Some(Priority::Urgent), ..Default::default() };
  let found = s.list_messages(&filter).await.unwrap();
  assert_eq!(ids(&found, |m| m.message.id), vec![urgent.message.id]);

  let today = Utc::now().date_naive();
  let range = MessageFilter { sent_from: Some(today), sent_to: Some(today), ..Default::default() };
  assert_eq!(s.list_messages(&range).await.unwrap().len(), 2);

  let past = MessageFilter { sent_to: today.pred_opt(), ..Default::default() };
  assert!(s.list_messages(&past).await.unwrap().is_empty());
}
