//! Handlers for `/messages/` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/messages/` | Optional `?laboratoire_id=&statut=&priorite=&est_traite=&date_debut=&date_fin=` |
//! | `POST`  | `/messages/` | Stores the message, then alerts the laboratory and acknowledges receipt |
//! | `GET`   | `/messages/{id}/` | |
//! | `PATCH` | `/messages/{id}/` | A non-blank `reponse_admin` is mailed to the sender |
//! | `PATCH` | `/messages/{id}/marquer_traite/` | Optional body `{"reponse_admin", "responsable_reponse"}` |
//!
//! Mail failures never change the response; see [`Notifier`](crate::Notifier).

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use serde::Deserialize;
use una_core::{
  contact::{MessagePatch, MessageStatus, NewMessage, Priority, Reply},
  query::{MessageFilter, RawParams},
  store::PortalStore,
  validation::FieldErrors,
};

use crate::{
  ApiState,
  error::ApiError,
  forms::{check_email, optional_text, required, required_text, unknown_object},
  views::contact::{MessageDetailView, MessageListView},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /messages/`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<RawParams>,
) -> Result<Json<Vec<MessageListView>>, ApiError>
where
  S: PortalStore,
{
  let filter = MessageFilter::from_params(&params);
  let messages = state.store.list_messages(&filter).await.map_err(ApiError::store)?;
  Ok(Json(messages.iter().map(Into::into).collect()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewMessageBody {
  pub id_laboratoire:          Option<i64>,
  pub prenom_expediteur:       Option<String>,
  pub nom_expediteur:          Option<String>,
  pub email_expediteur:        Option<String>,
  pub organisation_expediteur: Option<String>,
  pub sujet_message:           Option<String>,
  pub contenu_message:         Option<String>,
  pub priorite:                Option<Priority>,
}

impl NewMessageBody {
  fn validate(self, laboratory_exists: bool) -> Result<NewMessage, FieldErrors> {
    let mut errors = FieldErrors::new();
    let laboratory_id = required(&mut errors, "id_laboratoire", self.id_laboratoire);
    if let Some(id) = laboratory_id
      && !laboratory_exists
    {
      errors.add("id_laboratoire", unknown_object(id));
    }
    let given_name = required_text(&mut errors, "prenom_expediteur", self.prenom_expediteur);
    let family_name = required_text(&mut errors, "nom_expediteur", self.nom_expediteur);
    let email = required_text(&mut errors, "email_expediteur", self.email_expediteur);
    check_email(&mut errors, "email_expediteur", Some(email.as_str()).filter(|e| !e.is_empty()));
    let subject = required_text(&mut errors, "sujet_message", self.sujet_message);
    let body = required_text(&mut errors, "contenu_message", self.contenu_message);

    let Some(laboratory_id) = laboratory_id.filter(|_| errors.is_empty()) else {
      return Err(errors);
    };
    Ok(NewMessage {
      laboratory_id,
      sender_given_name: given_name,
      sender_family_name: family_name,
      sender_email: email,
      sender_organization: optional_text(self.organisation_expediteur),
      subject,
      body,
      priority: self.priorite.unwrap_or(Priority::Normal),
    })
  }
}

/// `POST /messages/`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewMessageBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore,
{
  let laboratory_exists = match body.id_laboratoire {
    Some(id) => state.store.find_laboratory(id).await.map_err(ApiError::store)?.is_some(),
    None => false,
  };
  let input = body.validate(laboratory_exists)?;
  let summary = state.store.create_message(input).await.map_err(ApiError::save)?;
  tracing::info!(
    message_id = summary.message.id,
    laboratory_id = summary.message.laboratory_id,
    "contact message received"
  );

  state.notifier.message_received(state.store.as_ref(), &summary).await;
  Ok((StatusCode::CREATED, Json(MessageDetailView::from(&summary))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /messages/{id}/`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<MessageDetailView>, ApiError>
where
  S: PortalStore,
{
  let summary = state
    .store
    .get_message(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("Message", id))?;
  Ok(Json(MessageDetailView::from(&summary)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct MessagePatchBody {
  pub statut_message:      Option<MessageStatus>,
  pub priorite:            Option<Priority>,
  pub reponse_admin:       Option<String>,
  pub responsable_reponse: Option<String>,
  pub est_traite:          Option<bool>,
}

impl From<MessagePatchBody> for MessagePatch {
  fn from(b: MessagePatchBody) -> Self {
    MessagePatch {
      status:       b.statut_message,
      priority:     b.priorite,
      reply:        b.reponse_admin,
      reply_author: b.responsable_reponse,
      processed:    b.est_traite,
    }
  }
}

/// `PATCH /messages/{id}/`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<MessagePatchBody>,
) -> Result<Json<MessageDetailView>, ApiError>
where
  S: PortalStore,
{
  apply(&state, id, MessagePatch::from(body)).await
}

/// Reply stored by `marquer_traite`.
#[derive(Debug, Default, Deserialize)]
pub struct ReplyBody {
  pub reponse_admin:       Option<String>,
  pub responsable_reponse: Option<String>,
}

/// `PATCH /messages/{id}/marquer_traite/`
///
/// Marks the message processed. The body is optional; an empty body stores
/// no reply.
pub async fn mark_processed<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  body: Bytes,
) -> Result<Json<MessageDetailView>, ApiError>
where
  S: PortalStore,
{
  let reply = if body.iter().all(u8::is_ascii_whitespace) {
    ReplyBody::default()
  } else {
    serde_json::from_slice::<ReplyBody>(&body)
      .map_err(|e| ApiError::BadRequest(format!("Corps JSON invalide: {e}")))?
  };
  let patch = Reply { text: reply.reponse_admin, author: reply.responsable_reponse }.into_patch();
  apply(&state, id, patch).await
}

/// Apply `patch` and mail the reply when one was stored.
async fn apply<S>(
  state: &ApiState<S>,
  id: i64,
  patch: MessagePatch,
) -> Result<Json<MessageDetailView>, ApiError>
where
  S: PortalStore,
{
  let replying = patch.carries_reply();
  let summary = state
    .store
    .update_message(id, patch)
    .await
    .map_err(ApiError::save)?
    .ok_or_else(|| ApiError::not_found("Message", id))?;

  if replying {
    state.notifier.reply_saved(state.store.as_ref(), &summary).await;
  }
  Ok(Json(MessageDetailView::from(&summary)))
}
