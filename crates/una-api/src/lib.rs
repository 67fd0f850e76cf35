//! JSON REST API for the UNA laboratory portal.
//!
//! Exposes an axum [`Router`] backed by any [`una_core::store::PortalStore`].
//! Authentication, TLS and static file serving are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", una_api::api_router(state))
//! ```

pub mod error;
pub mod forms;
pub mod handlers;
pub mod media;
pub mod notify;
pub mod views;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, patch, post},
};
use chrono::NaiveDate;
use una_core::{query::LaboratoryScope, store::PortalStore};

pub use error::ApiError;
pub use media::MediaStore;
pub use notify::Notifier;

use handlers::{
  applications, contacts, hours, laboratories, messages, projects, publications, researchers,
  tracks,
};

// ─── Application state ────────────────────────────────────────────────────────

/// Request body cap for the multipart application form, in bytes.
pub const DEFAULT_UPLOAD_LIMIT: usize = 32 * 1024 * 1024;

/// Source of "today" for ages, progress and completion dates.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
  /// The server's local date.
  #[default]
  System,
  Fixed(NaiveDate),
}

impl Clock {
  pub fn today(&self) -> NaiveDate {
    match self {
      Clock::System => chrono::Local::now().date_naive(),
      Clock::Fixed(date) => *date,
    }
  }
}

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:        Arc<S>,
  pub scope:        LaboratoryScope,
  pub media:        Arc<MediaStore>,
  pub notifier:     Arc<Notifier>,
  pub clock:        Clock,
  /// Body cap applied to `POST /candidatures/`.
  pub upload_limit: usize,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:        Arc::clone(&self.store),
      scope:        self.scope,
      media:        Arc::clone(&self.media),
      notifier:     Arc::clone(&self.notifier),
      clock:        self.clock,
      upload_limit: self.upload_limit,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: PortalStore + 'static,
{
  let upload_limit = state.upload_limit;
  Router::new()
    // Researchers
    .route("/chercheurs/", get(researchers::list::<S>))
    .route("/chercheurs/{id}/", get(researchers::get_one::<S>))
    // Laboratories
    .route("/laboratoires/", get(laboratories::list::<S>))
    .route("/laboratoires/{id}/", get(laboratories::get_one::<S>))
    .route("/laboratoires/{id}/parcours/", get(laboratories::tracks::<S>))
    // Tracks
    .route("/parcours/", get(tracks::list::<S>))
    .route("/parcours/{id}/", get(tracks::get_one::<S>))
    // Applications
    .route(
      "/candidatures/",
      get(applications::list::<S>)
        .post(applications::create::<S>)
        .layer(DefaultBodyLimit::max(upload_limit)),
    )
    .route("/candidatures/{id}/", get(applications::get_one::<S>))
    // Publications
    .route("/publications/", get(publications::list::<S>))
    .route("/publications/{id}/", get(publications::get_one::<S>))
    // Research projects
    .route("/recherches/", get(projects::list::<S>))
    .route("/recherches/{id}/", get(projects::get_one::<S>))
    .route("/recherches/{id}/marquer_en_cours/", post(projects::mark_ongoing::<S>))
    .route("/recherches/{id}/marquer_termine/", post(projects::mark_completed::<S>))
    // Contacts
    .route("/contacts/", get(contacts::list::<S>).post(contacts::create::<S>))
    .route("/contacts/{id}/", get(contacts::get_one::<S>).patch(contacts::update::<S>))
    .route("/contacts/{id}/horaires/", get(contacts::hours::<S>))
    // Opening hours
    .route("/horaires/", get(hours::list::<S>).post(hours::create::<S>))
    .route("/horaires/{id}/", get(hours::get_one::<S>).patch(hours::update::<S>))
    // Messages
    .route("/messages/", get(messages::list::<S>).post(messages::create::<S>))
    .route("/messages/{id}/", get(messages::get_one::<S>).patch(messages::update::<S>))
    .route("/messages/{id}/marquer_traite/", patch(messages::mark_processed::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
