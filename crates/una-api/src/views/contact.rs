//! Contact, opening-hours and message views.

use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use una_core::{
  Choice,
  contact::{
    ContactDetail, ContactSummary, ContactType, HoursEntry, MessageStatus, MessageSummary,
    Priority, Weekday,
  },
};

#[derive(Debug, Serialize)]
pub struct ContactListView {
  pub id:                   i64,
  pub laboratoire_nom:      String,
  pub type_contact:         ContactType,
  pub type_contact_display: &'static str,
  pub ville:                String,
  pub code_postal:          Option<String>,
  pub pays:                 String,
  pub adresse_complete:     String,
  pub telephone_principal:  Option<String>,
  pub email_principal:      Option<String>,
  pub est_actif:            bool,
}

impl From<&ContactSummary> for ContactListView {
  fn from(s: &ContactSummary) -> Self {
    let c = &s.contact;
    Self {
      id:                   c.id,
      laboratoire_nom:      s.laboratory_name.clone(),
      type_contact:         c.kind,
      type_contact_display: c.kind.label(),
      ville:                c.city.clone(),
      code_postal:          c.postal_code.clone(),
      pays:                 c.country.clone(),
      adresse_complete:     c.address.clone(),
      telephone_principal:  c.phone.clone(),
      email_principal:      c.email.clone(),
      est_actif:            c.active,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct HoursView {
  pub id:                   i64,
  pub contact_laboratoire:  i64,
  pub jour_semaine:         Weekday,
  pub jour_semaine_display: &'static str,
  pub heure_ouverture:      Option<NaiveTime>,
  pub heure_fermeture:      Option<NaiveTime>,
  pub est_ferme:            bool,
  pub notes:                Option<String>,
  pub creer_le:             DateTime<Utc>,
  pub mise_a_jour_le:       DateTime<Utc>,
}

impl From<&HoursEntry> for HoursView {
  fn from(h: &HoursEntry) -> Self {
    Self {
      id:                   h.id,
      contact_laboratoire:  h.contact_id,
      jour_semaine:         h.weekday,
      jour_semaine_display: h.weekday.label(),
      heure_ouverture:      h.opens_at,
      heure_fermeture:      h.closes_at,
      est_ferme:            h.closed,
      notes:                h.notes.clone(),
      creer_le:             h.created_at,
      mise_a_jour_le:       h.updated_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ContactDetailView {
  pub id:                   i64,
  pub id_laboratoire:       i64,
  pub laboratoire_nom:      String,
  pub type_contact:         ContactType,
  pub type_contact_display: &'static str,
  pub adresse_complete:     String,
  pub ville:                String,
  pub code_postal:          Option<String>,
  pub pays:                 String,
  pub telephone_principal:  Option<String>,
  pub email_principal:      Option<String>,
  pub site_web:             Option<String>,
  pub est_actif:            bool,
  pub horaires:             Vec<HoursView>,
  pub creer_le:             DateTime<Utc>,
  pub mise_a_jour_le:       DateTime<Utc>,
}

impl From<&ContactDetail> for ContactDetailView {
  fn from(d: &ContactDetail) -> Self {
    let c = &d.contact;
    Self {
      id:                   c.id,
      id_laboratoire:       c.laboratory_id,
      laboratoire_nom:      d.laboratory_name.clone(),
      type_contact:         c.kind,
      type_contact_display: c.kind.label(),
      adresse_complete:     c.address.clone(),
      ville:                c.city.clone(),
      code_postal:          c.postal_code.clone(),
      pays:                 c.country.clone(),
      telephone_principal:  c.phone.clone(),
      email_principal:      c.email.clone(),
      site_web:             c.website.clone(),
      est_actif:            c.active,
      horaires:             d.hours.iter().map(Into::into).collect(),
      creer_le:             c.created_at,
      mise_a_jour_le:       c.updated_at,
    }
  }
}

// ─── Messages ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct MessageListView {
  pub id:                     i64,
  pub laboratoire_nom:        String,
  pub nom_complet_expediteur: String,
  pub email_expediteur:       String,
  pub sujet_message:          String,
  pub statut_message_display: &'static str,
  pub priorite_display:       &'static str,
  pub est_traite:             bool,
  pub date_envoi:             DateTime<Utc>,
}

impl From<&MessageSummary> for MessageListView {
  fn from(s: &MessageSummary) -> Self {
    let m = &s.message;
    Self {
      id:                     m.id,
      laboratoire_nom:        s.laboratory_name.clone(),
      nom_complet_expediteur: m.sender_full_name(),
      email_expediteur:       m.sender_email.clone(),
      sujet_message:          m.subject.clone(),
      statut_message_display: m.status.label(),
      priorite_display:       m.priority.label(),
      est_traite:             m.processed,
      date_envoi:             m.sent_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct MessageDetailView {
  pub id:                         i64,
  pub id_laboratoire:             i64,
  pub laboratoire_nom:            String,
  pub prenom_expediteur:          String,
  pub nom_expediteur:             String,
  pub nom_complet_expediteur:     String,
  pub email_expediteur:           String,
  pub organisation_expediteur:    Option<String>,
  pub sujet_message:              String,
  pub contenu_message:            String,
  pub statut_message:             MessageStatus,
  pub statut_message_display:     &'static str,
  pub priorite:                   Priority,
  pub priorite_display:           &'static str,
  pub reponse_admin:              Option<String>,
  pub responsable_reponse:        Option<String>,
  pub date_reponse:               Option<DateTime<Utc>>,
  pub est_traite:                 bool,
  pub date_envoi:                 DateTime<Utc>,
  pub date_derniere_modification: DateTime<Utc>,
}

impl From<&MessageSummary> for MessageDetailView {
  fn from(s: &MessageSummary) -> Self {
    let m = &s.message;
    Self {
      id:                         m.id,
      id_laboratoire:             m.laboratory_id,
      laboratoire_nom:            s.laboratory_name.clone(),
      prenom_expediteur:          m.sender_given_name.clone(),
      nom_expediteur:             m.sender_family_name.clone(),
      nom_complet_expediteur:     m.sender_full_name(),
      email_expediteur:           m.sender_email.clone(),
      organisation_expediteur:    m.sender_organization.clone(),
      sujet_message:              m.subject.clone(),
      contenu_message:            m.body.clone(),
      statut_message:             m.status,
      statut_message_display:     m.status.label(),
      priorite:                   m.priority,
      priorite_display:           m.priority.label(),
      reponse_admin:              m.reply.clone(),
      responsable_reponse:        m.reply_author.clone(),
      date_reponse:               m.replied_at,
      est_traite:                 m.processed,
      date_envoi:                 m.sent_at,
      date_derniere_modification: m.modified_at,
    }
  }
}
