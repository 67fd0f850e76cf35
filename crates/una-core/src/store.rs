//! The `PortalStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `una-store-sqlite`).
//! The API layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  application::{ApplicationSummary, NewApplication},
  contact::{
    ContactDetail, ContactPatch, ContactRecord, ContactSummary, HoursEntry, HoursPatch,
    MessagePatch, MessageSummary, NewContact, NewHours, NewMessage,
  },
  laboratory::{Laboratory, LaboratoryDetail},
  project::{ProjectDetail, ProjectStatus, ResearchProject},
  publication::{PublicationDetail, PublicationSummary},
  query::{
    ApplicationFilter, ContactFilter, HoursFilter, LaboratoryFilter, MessageFilter,
    ProjectFilter, PublicationFilter, ResearcherFilter, TrackFilter,
  },
  researcher::{ResearcherDetail, ResearcherSummary},
  track::{Track, TrackDetail, TrackSummary},
};

/// Abstraction over a portal store backend.
///
/// Listings return their rows in a deterministic order documented on each
/// method. Lookups return `None` for unknown identifiers rather than an error.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PortalStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Researchers ───────────────────────────────────────────────────────

  /// Active researchers matching `filter`, by id.
  fn list_researchers<'a>(
    &'a self,
    filter: &'a ResearcherFilter,
  ) -> impl Future<Output = Result<Vec<ResearcherSummary>, Self::Error>> + Send + 'a;

  /// An active researcher's profile.
  fn get_researcher(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ResearcherDetail>, Self::Error>> + Send + '_;

  // ── Laboratories ──────────────────────────────────────────────────────

  /// Laboratories matching `filter`, by id.
  fn list_laboratories<'a>(
    &'a self,
    filter: &'a LaboratoryFilter,
  ) -> impl Future<Output = Result<Vec<Laboratory>, Self::Error>> + Send + 'a;

  fn find_laboratory(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Laboratory>, Self::Error>> + Send + '_;

  /// The laboratory page with its domains, active news, presentations,
  /// missions and partnerships.
  fn get_laboratory(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<LaboratoryDetail>, Self::Error>> + Send + '_;

  // ── Tracks ────────────────────────────────────────────────────────────

  /// Active tracks matching `filter`, newest creation date first.
  fn list_tracks<'a>(
    &'a self,
    filter: &'a TrackFilter,
  ) -> impl Future<Output = Result<Vec<TrackSummary>, Self::Error>> + Send + 'a;

  /// Any track, active or not.
  fn find_track(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Track>, Self::Error>> + Send + '_;

  /// An active track with its laboratory and admission details.
  fn get_track(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<TrackDetail>, Self::Error>> + Send + '_;

  // ── Applications ──────────────────────────────────────────────────────

  /// Applications matching `filter`, most recently submitted first.
  fn list_applications<'a>(
    &'a self,
    filter: &'a ApplicationFilter,
  ) -> impl Future<Output = Result<Vec<ApplicationSummary>, Self::Error>> + Send + 'a;

  fn get_application(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ApplicationSummary>, Self::Error>> + Send + '_;

  /// Whether an application already exists for this exact (e-mail, track) pair.
  ///
  /// This is a separate call from [`create_application`](Self::create_application);
  /// two concurrent submissions can both observe `false`.
  fn application_exists<'a>(
    &'a self,
    email: &'a str,
    track_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Persist a submission. Status starts as pending; timestamps are set by
  /// the store.
  fn create_application(
    &self,
    input: NewApplication,
  ) -> impl Future<Output = Result<ApplicationSummary, Self::Error>> + Send + '_;

  // ── Publications ──────────────────────────────────────────────────────

  /// Publications matching `filter`, in the filter's ordering with id as
  /// tie-breaker.
  fn list_publications<'a>(
    &'a self,
    filter: &'a PublicationFilter,
  ) -> impl Future<Output = Result<Vec<PublicationSummary>, Self::Error>> + Send + 'a;

  fn get_publication(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<PublicationDetail>, Self::Error>> + Send + '_;

  // ── Research projects ─────────────────────────────────────────────────

  /// Projects matching `filter`, latest start first.
  fn list_projects<'a>(
    &'a self,
    filter: &'a ProjectFilter,
  ) -> impl Future<Output = Result<Vec<ResearchProject>, Self::Error>> + Send + 'a;

  fn get_project(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ProjectDetail>, Self::Error>> + Send + '_;

  /// Change a project's status, stamping the actual end date when given.
  fn set_project_status(
    &self,
    id: i64,
    status: ProjectStatus,
    actual_end_on: Option<NaiveDate>,
  ) -> impl Future<Output = Result<Option<ResearchProject>, Self::Error>> + Send + '_;

  // ── Contacts ──────────────────────────────────────────────────────────

  /// Contacts matching `filter`: active first, then by type and id.
  fn list_contacts<'a>(
    &'a self,
    filter: &'a ContactFilter,
  ) -> impl Future<Output = Result<Vec<ContactSummary>, Self::Error>> + Send + 'a;

  fn get_contact(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ContactDetail>, Self::Error>> + Send + '_;

  fn create_contact(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<ContactDetail, Self::Error>> + Send + '_;

  fn update_contact(
    &self,
    id: i64,
    patch: ContactPatch,
  ) -> impl Future<Output = Result<Option<ContactDetail>, Self::Error>> + Send + '_;

  /// The laboratory's first active contact of type `principal`.
  fn principal_contact(
    &self,
    laboratory_id: i64,
  ) -> impl Future<Output = Result<Option<ContactRecord>, Self::Error>> + Send + '_;

  // ── Opening hours ─────────────────────────────────────────────────────

  /// Entries matching `filter`, by contact then weekday.
  fn list_hours<'a>(
    &'a self,
    filter: &'a HoursFilter,
  ) -> impl Future<Output = Result<Vec<HoursEntry>, Self::Error>> + Send + 'a;

  fn get_hours(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<HoursEntry>, Self::Error>> + Send + '_;

  fn create_hours(
    &self,
    input: NewHours,
  ) -> impl Future<Output = Result<HoursEntry, Self::Error>> + Send + '_;

  fn update_hours(
    &self,
    id: i64,
    patch: HoursPatch,
  ) -> impl Future<Output = Result<Option<HoursEntry>, Self::Error>> + Send + '_;

  // ── Messages ──────────────────────────────────────────────────────────

  /// Messages matching `filter`, most recently sent first.
  fn list_messages<'a>(
    &'a self,
    filter: &'a MessageFilter,
  ) -> impl Future<Output = Result<Vec<MessageSummary>, Self::Error>> + Send + 'a;

  fn get_message(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<MessageSummary>, Self::Error>> + Send + '_;

  /// Persist an inbound message as new and unprocessed.
  fn create_message(
    &self,
    input: NewMessage,
  ) -> impl Future<Output = Result<MessageSummary, Self::Error>> + Send + '_;

  /// Apply `patch`. A non-blank reply also stamps the reply timestamp.
  fn update_message(
    &self,
    id: i64,
    patch: MessagePatch,
  ) -> impl Future<Output = Result<Option<MessageSummary>, Self::Error>> + Send + '_;
}
