//! Router tests against an in-memory store and a recording mailer.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use axum::{
  body::{Body, to_bytes},
  http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use una_core::notify::{MailCredentials, NotifyError, OutgoingMail, SecretResolver};
use una_store_sqlite::SqliteStore;

use super::*;

// ─── Collaborators ────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingMailer {
  sent: Mutex<Vec<(Vec<String>, String)>>,
}

impl RecordingMailer {
  fn sent(&self) -> Vec<(Vec<String>, String)> {
    self.sent.lock().unwrap().clone()
  }
}

#[async_trait]
impl una_core::notify::Mailer for RecordingMailer {
  async fn send(&self, _: &MailCredentials, mail: &OutgoingMail) -> Result<(), NotifyError> {
    self.sent.lock().unwrap().push((mail.to.clone(), mail.subject.clone()));
    Ok(())
  }
}

struct Secrets(HashMap<String, String>);

impl SecretResolver for Secrets {
  fn resolve(&self, reference: &str) -> Option<String> {
    self.0.get(reference).cloned()
  }
}

// ─── Harness ──────────────────────────────────────────────────────────────────

struct Harness {
  state:  ApiState<SqliteStore>,
  mailer: Arc<RecordingMailer>,
}

fn today() -> NaiveDate {
  NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
}

async fn seeded_store() -> SqliteStore {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store
    .load_fixture(json!({
      "laboratory_types": [{ "id": 1, "label": "Laboratoire de recherche" }],
      "laboratories": [
        { "id": 1, "type_id": 1, "name": "LaSTIC", "unit": "UFR SFA", "founded_on": "2010-01-01" },
        { "id": 2, "type_id": 1, "name": "LBE", "unit": "UFR SN", "founded_on": "2012-05-01" }
      ],
      "domains": [{ "id": 1, "title": "Informatique" }, { "id": 2, "title": "Biologie" }],
      "laboratory_domains": [
        { "id": 1, "laboratory_id": 1, "domain_id": 1 },
        { "id": 2, "laboratory_id": 2, "domain_id": 2 }
      ],
      "researchers": [
        { "id": 1, "family_name": "Diallo", "given_name": "Awa", "hired_on": "2019-09-01" },
        { "id": 2, "family_name": "Koné", "given_name": "Issa", "hired_on": "2015-01-01" }
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
      "projects": [
        { "id": 1, "title": "Vision par ordinateur", "status": "En cours",
          "starts_on": "2023-01-01", "planned_end_on": "2025-12-31" },
        { "id": 2, "title": "Génomique", "status": "Planifier", "starts_on": "2024-02-01" },
        { "id": 3, "title": "Réseaux", "status": "Planifier", "starts_on": "2025-01-01" }
      ],
      "project_laboratories": [
        { "id": 1, "laboratory_domain_id": 1, "project_id": 1 },
        { "id": 2, "laboratory_domain_id": 2, "project_id": 2 }
      ],
      "publications": [
        { "id": 1, "project_id": 1, "title": "Deep learning for crops",
          "published_on": "2024-03-01", "file": "static/documentsPublication/p1.pdf" },
        { "id": 2, "project_id": 1, "title": "Plant biology survey", "published_on": "2023-06-01" },
        { "id": 3, "project_id": 2, "title": "Sequencing pipelines", "published_on": "2022-01-10" }
      ],
      "publication_keywords": [
        { "publication_id": 1, "keyword": "AI" },
        { "publication_id": 2, "keyword": "Biology" },
        { "publication_id": 3, "keyword": "Genomics" }
      ],
      "tracks": [
        { "id": 1, "laboratory_id": 1, "name": "Master Informatique", "created_on": "2020-09-01" },
        { "id": 2, "laboratory_id": 1, "name": "Master IA", "created_on": "2022-09-01" },
        { "id": 3, "laboratory_id": 2, "name": "Master Biologie", "created_on": "2021-09-01" },
        { "id": 4, "laboratory_id": 1, "name": "Ancien parcours", "status": "Inactif",
          "created_on": "2010-01-01" }
      ],
      "laboratory_contacts": [
        { "id": 1, "laboratory_id": 1, "kind": "principal", "address": "BP 1", "city": "Abidjan",
          "country": "Côte d'Ivoire", "email": "lastic@una.edu", "mail_secret_ref": "lastic" }
      ],
      "contact_hours": [
        { "contact_id": 1, "weekday": 7, "closed": true },
        { "contact_id": 1, "weekday": 1, "opens_at": "08:00:00", "closes_at": "17:00:00" }
      ]
    }))
    .await
    .unwrap();
  store
}

async fn harness_with(secrets: &[(&str, &str)], scope: LaboratoryScope, clock: Clock) -> Harness {
  let mailer = Arc::new(RecordingMailer::default());
  let secrets = Secrets(secrets.iter().map(|(k, v)| ((*k).into(), (*v).into())).collect());
  let media_root = std::env::temp_dir().join(format!("una-api-tests-{}", std::process::id()));
  let state = ApiState {
    store: Arc::new(seeded_store().await),
    scope,
    media: Arc::new(MediaStore::new(media_root, "/media/")),
    notifier: Arc::new(Notifier::new(mailer.clone(), Arc::new(secrets), scope)),
    clock,
    upload_limit: DEFAULT_UPLOAD_LIMIT,
  };
  Harness { state, mailer }
}

async fn harness() -> Harness {
  harness_with(&[("lastic", "app-password")], LaboratoryScope::default(), Clock::Fixed(today()))
    .await
}

impl Harness {
  async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
    let resp = api_router(self.state.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
  }

  async fn get(&self, uri: &str) -> (StatusCode, Value) {
    self.send(Request::get(uri).body(Body::empty()).unwrap()).await
  }

  async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    self.send(req).await
  }
}

fn ids(body: &Value) -> Vec<i64> {
  body.as_array().unwrap().iter().map(|v| v["id"].as_i64().unwrap()).collect()
}

const BOUNDARY: &str = "una-test-boundary";

fn multipart(fields: &[(&str, &str)], files: &[(&str, &str)]) -> Request<Body> {
  let files: Vec<_> = files
    .iter()
    .map(|&(name, file_name)| (name, file_name, format!("%PDF-1.4 {file_name}").into_bytes()))
    .collect();
  multipart_with(fields, &files)
}

fn multipart_with(fields: &[(&str, &str)], files: &[(&str, &str, Vec<u8>)]) -> Request<Body> {
  let mut body = Vec::new();
  for (name, value) in fields {
    body.extend_from_slice(
      format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
        .as_bytes(),
    );
  }
  for (name, file_name, content) in files {
    body.extend_from_slice(
      format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
      )
      .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

  Request::post("/candidatures/")
    .header(header::HOST, "una.test")
    .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
    .body(Body::from(body))
    .unwrap()
}

const APPLICATION: &[(&str, &str)] = &[
  ("nom_candidat", "Koné"),
  ("prenom_candidat", "Aya"),
  ("date_naissance", "2000-06-15"),
  ("lieu_naissance", "Bouaké"),
  ("nationalite", "Ivoirienne"),
  ("telephone_candidat", "+225 01 02 03 04"),
  ("email_candidat", "aya@example.com"),
  ("adresse_complete", "Rue 12"),
  ("ville_residence", "Abidjan"),
  ("pays_residence", "Côte d'Ivoire"),
  ("niveau_etude_actuel", "Master 1"),
  ("etablissement_origine", "UNA"),
  ("filiere_etude", "Informatique"),
  ("moyenne_generale", "14.5"),
  ("annee_obtention_diplome", "2023"),
  ("id_parcours", "2"),
];

const DOCUMENTS: &[(&str, &str)] = &[
  ("cv_candidat", "cv.pdf"),
  ("lettre_motivation", "lettre.docx"),
  ("releves_notes", "notes.pdf"),
];

// ─── Researchers ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn malformed_laboratory_filter_is_ignored() {
  let h = harness().await;
  let (_, all) = h.get("/chercheurs/").await;
  let (status, bad) = h.get("/chercheurs/?laboratoire_id=abc").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(ids(&bad), ids(&all));
  assert_eq!(ids(&all), vec![1, 2]);

  let (_, lab2) = h.get("/chercheurs/?laboratoire_id=2").await;
  assert_eq!(ids(&lab2), vec![2]);
}

#[tokio::test]
async fn unknown_researcher_is_404() {
  let h = harness().await;
  let (status, body) = h.get("/chercheurs/99/").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Chercheur 99 introuvable");
}

// ─── Laboratories and tracks ──────────────────────────────────────────────────

#[tokio::test]
async fn laboratory_tracks_are_active_and_newest_first() {
  let h = harness().await;
  let (status, body) = h.get("/laboratoires/1/parcours/").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(ids(&body), vec![2, 1]);

  let (status, _) = h.get("/laboratoires/99/parcours/").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn track_listing_falls_back_to_default_laboratory() {
  let h = harness().await;
  let (_, body) = h.get("/parcours/").await;
  assert_eq!(ids(&body), vec![2, 1]);

  let (_, body) = h.get("/parcours/?laboratoire_id=2").await;
  assert_eq!(ids(&body), vec![3]);
}

// ─── Publications ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn publications_are_scoped_to_default_laboratory() {
  let h = harness().await;
  let (status, body) = h.get("/publications/").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(ids(&body), vec![1, 2]);
}

#[tokio::test]
async fn unrestricted_scope_lists_every_publication() {
  let h = harness_with(&[], LaboratoryScope::unrestricted(), Clock::Fixed(today())).await;
  let (_, body) = h.get("/publications/").await;
  assert_eq!(ids(&body), vec![1, 2, 3]);
}

#[tokio::test]
async fn keyword_filter_matches_any_term() {
  let h = harness().await;
  let (_, body) = h.get("/publications/?mot_cle=ai,biology").await;
  let mut found = ids(&body);
  found.sort_unstable();
  assert_eq!(found, vec![1, 2]);

  let (_, body) = h.get("/publications/?mot_cle=chemistry").await;
  assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn publication_file_url_uses_request_origin() {
  let h = harness().await;
  let req = Request::get("/publications/1/")
    .header(header::HOST, "una.test")
    .header("x-forwarded-proto", "https")
    .body(Body::empty())
    .unwrap();
  let (status, body) = h.send(req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body["fichier_url"],
    "https://una.test/media/static/documentsPublication/p1.pdf"
  );
}

// ─── Applications ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_application_is_rejected() {
  let h = harness().await;

  let (status, body) = h.send(multipart(APPLICATION, DOCUMENTS)).await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  assert_eq!(body["message"], "Candidature soumise avec succes!");
  let candidature = &body["candidature"];
  assert_eq!(candidature["parcours_nom"], "Master IA");
  assert_eq!(candidature["age"], 24);
  assert_eq!(candidature["statut_candidature"], "En attente");
  assert!(
    candidature["cv_candidat"]
      .as_str()
      .unwrap()
      .starts_with("http://una.test/media/static/candidatures/cv/")
  );
  assert!(candidature["diplome_obtenu"].is_null());

  let (status, body) = h.send(multipart(APPLICATION, DOCUMENTS)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(
    body["error"],
    "Une candidature existe deja pour ce parcours avec cette adresse email."
  );
  assert!(body.get("details").is_none());

  let (_, listed) = h.get("/candidatures/?parcours=2").await;
  assert_eq!(listed.as_array().unwrap().len(), 1);
}

/// A CV of `size` bytes plus the other mandatory documents.
fn documents_with_cv(size: usize) -> Vec<(&'static str, &'static str, Vec<u8>)> {
  let mut cv = b"%PDF-1.4 ".to_vec();
  cv.resize(size, b'0');
  vec![
    ("cv_candidat", "cv.pdf", cv),
    ("lettre_motivation", "lettre.pdf", b"%PDF-1.4 lettre".to_vec()),
    ("releves_notes", "notes.pdf", b"%PDF-1.4 notes".to_vec()),
  ]
}

#[tokio::test]
async fn application_accepts_documents_beyond_two_megabytes() {
  let h = harness().await;
  let (status, body) = h.send(multipart_with(APPLICATION, &documents_with_cv(3 << 20))).await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  assert_eq!(body["candidature"]["email_candidat"], "aya@example.com");
}

#[tokio::test]
async fn application_over_the_upload_limit_is_refused() {
  let mut h = harness().await;
  h.state.upload_limit = 64 * 1024;
  let (status, _) = h.send(multipart_with(APPLICATION, &documents_with_cv(128 * 1024))).await;
  assert!(status.is_client_error(), "{status}");

  let (_, listed) = h.get("/candidatures/").await;
  assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn empty_application_is_rejected() {
  let h = harness().await;
  let (status, body) = h.send(multipart(&[], &[])).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Aucune donnee recue");
}

#[tokio::test]
async fn invalid_application_lists_field_errors() {
  let h = harness().await;
  let fields: Vec<_> = APPLICATION
    .iter()
    .map(|&(k, v)| if k == "id_parcours" { (k, "99") } else { (k, v) })
    .collect();
  let (status, body) = h.send(multipart(&fields, &DOCUMENTS[..2])).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Donnees invalides");
  assert!(body["details"]["id_parcours"][0].as_str().unwrap().contains("« 99 »"));
  assert!(body["details"]["releves_notes"].is_array());
}

// ─── Projects ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn completing_a_project_stamps_today() {
  let h = harness().await;
  let (status, body) = h.json("POST", "/recherches/2/marquer_termine/", Value::Null).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["statu"], "Terminer");
  assert_eq!(body["date_fin_reelle"], "2024-09-01");
  assert_eq!(body["progression"], 100.0);

  let (status, body) = h.json("POST", "/recherches/2/marquer_en_cours/", Value::Null).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["statu"], "En cours");
  assert!(body["date_fin_reelle"].is_null());
}

#[tokio::test]
async fn project_cannot_complete_before_it_starts() {
  let h = harness().await;
  let (status, body) = h.json("POST", "/recherches/3/marquer_termine/", Value::Null).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["details"]["date_fin_reelle"].is_array());

  let (status, _) = h.json("POST", "/recherches/99/marquer_termine/", Value::Null).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Contacts and hours ───────────────────────────────────────────────────────

#[tokio::test]
async fn contact_hours_are_ordered_by_weekday() {
  let h = harness().await;
  let (status, body) = h.get("/contacts/1/horaires/").await;
  assert_eq!(status, StatusCode::OK);
  let days: Vec<_> = body.as_array().unwrap().iter().map(|e| e["jour_semaine"].clone()).collect();
  assert_eq!(days, vec![json!(1), json!(7)]);
  assert_eq!(body[1]["jour_semaine_display"], "Dimanche");
}

#[tokio::test]
async fn contact_create_and_patch() {
  let h = harness().await;
  let (status, created) = h
    .json(
      "POST",
      "/contacts/",
      json!({
        "id_laboratoire": 2,
        "type_contact": "communication",
        "adresse_complete": "BP 2",
        "ville": "Abidjan",
        "pays": "Côte d'Ivoire",
        "reference_secret_email": "lbe-comm"
      }),
    )
    .await;
  assert_eq!(status, StatusCode::CREATED, "{created}");
  assert_eq!(created["type_contact_display"], "Communication");
  assert!(created.get("reference_secret_email").is_none());
  let id = created["id"].as_i64().unwrap();

  let (status, patched) =
    h.json("PATCH", &format!("/contacts/{id}/"), json!({ "est_actif": false })).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(patched["est_actif"], false);
  assert_eq!(patched["ville"], "Abidjan");

  let (status, body) = h.json("POST", "/contacts/", json!({ "id_laboratoire": 9 })).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["details"]["ville"].is_array());
}

#[tokio::test]
async fn hours_create_and_patch() {
  let h = harness().await;
  let (status, created) = h
    .json(
      "POST",
      "/horaires/",
      json!({ "contact_laboratoire": 1, "jour_semaine": 3, "heure_ouverture": "09:00:00" }),
    )
    .await;
  assert_eq!(status, StatusCode::CREATED, "{created}");
  assert_eq!(created["jour_semaine_display"], "Mercredi");
  let id = created["id"].as_i64().unwrap();

  let (status, patched) =
    h.json("PATCH", &format!("/horaires/{id}/"), json!({ "est_ferme": true })).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(patched["est_ferme"], true);

  let (_, listed) = h.get("/horaires/?contact_id=1").await;
  assert_eq!(listed.as_array().unwrap().len(), 3);
}

// ─── Messages and notifications ───────────────────────────────────────────────

fn message_body() -> Value {
  json!({
    "id_laboratoire": 2,
    "prenom_expediteur": "Awa",
    "nom_expediteur": "Traoré",
    "email_expediteur": "awa@example.org",
    "sujet_message": "Stage",
    "contenu_message": "Bonjour"
  })
}

#[tokio::test]
async fn message_is_stored_without_mail_credentials() {
  let h = harness_with(&[], LaboratoryScope::default(), Clock::Fixed(today())).await;
  let (status, body) = h.json("POST", "/messages/", message_body()).await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  assert_eq!(body["statut_message"], "nouveau");
  assert!(h.mailer.sent().is_empty());
}

#[tokio::test]
async fn message_alerts_laboratory_and_acknowledges_sender() {
  let h = harness().await;
  let (status, _) = h.json("POST", "/messages/", message_body()).await;
  assert_eq!(status, StatusCode::CREATED);

  let recipients: Vec<_> = h.mailer.sent().into_iter().map(|(to, _)| to).collect();
  assert_eq!(
    recipients,
    vec![vec!["lastic@una.edu".to_owned()], vec!["awa@example.org".to_owned()]]
  );
}

#[tokio::test]
async fn invalid_message_is_rejected() {
  let h = harness().await;
  let mut body = message_body();
  body["email_expediteur"] = json!("awa@");
  let (status, resp) = h.json("POST", "/messages/", body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(resp["details"]["email_expediteur"][0], forms::INVALID_EMAIL);
  assert!(h.mailer.sent().is_empty());
}

#[tokio::test]
async fn marking_processed_mails_the_reply() {
  let h = harness().await;
  let (_, created) = h.json("POST", "/messages/", message_body()).await;
  let id = created["id"].as_i64().unwrap();

  let (status, body) = h
    .json(
      "PATCH",
      &format!("/messages/{id}/marquer_traite/"),
      json!({ "reponse_admin": "Merci, nous revenons vers vous.", "responsable_reponse": "Dr Koné" }),
    )
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["est_traite"], true);
  assert_eq!(body["statut_message"], "traite");
  assert!(body["date_reponse"].is_string());

  let sent = h.mailer.sent();
  assert_eq!(sent.len(), 3);
  assert_eq!(sent[2].0, vec!["awa@example.org".to_owned()]);
  assert_eq!(sent[2].1, "Réponse à votre message - Stage");
}

#[tokio::test]
async fn marking_processed_without_reply_sends_nothing() {
  let h = harness_with(&[], LaboratoryScope::default(), Clock::Fixed(today())).await;
  let (_, created) = h.json("POST", "/messages/", message_body()).await;
  let id = created["id"].as_i64().unwrap();

  let req = Request::patch(format!("/messages/{id}/marquer_traite/")).body(Body::empty()).unwrap();
  let (status, body) = h.send(req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["est_traite"], true);
  assert!(body["reponse_admin"].is_null());
  assert!(h.mailer.sent().is_empty());
}
