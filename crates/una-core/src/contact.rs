//! Laboratory contact points, opening hours and inbound contact messages.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, researcher::full_name};

choices! {
  pub enum ContactType ("contact type") {
    Principal      = "principal"      => "Contact principal",
    Direction      = "direction"      => "Direction",
    Administration = "administration" => "Administration",
    Research       = "recherche"      => "Service recherche",
    Partnerships   = "partenariats"   => "Partenariats",
    Communication  = "communication"  => "Communication",
  }
}

choices! {
  pub enum Priority ("priority") {
    Low    = "basse"   => "Basse",
    Normal = "normale" => "Normale",
    High   = "haute"   => "Haute",
    Urgent = "urgente" => "Urgente",
  }
}

choices! {
  pub enum MessageStatus ("message status") {
    New        = "nouveau"  => "Nouveau message",
    InProgress = "en_cours" => "En cours de traitement",
    Processed  = "traite"   => "Traité",
    Archived   = "archive"  => "Archivé",
  }
}

// ─── Weekday ─────────────────────────────────────────────────────────────────

/// Day of the week, stored and sent as 1 (Monday) through 7 (Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
  Monday = 1,
  Tuesday,
  Wednesday,
  Thursday,
  Friday,
  Saturday,
  Sunday,
}

impl Weekday {
  pub const ALL: [Self; 7] = [
    Self::Monday,
    Self::Tuesday,
    Self::Wednesday,
    Self::Thursday,
    Self::Friday,
    Self::Saturday,
    Self::Sunday,
  ];

  pub fn number(self) -> u8 {
    self as u8
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Monday => "Lundi",
      Self::Tuesday => "Mardi",
      Self::Wednesday => "Mercredi",
      Self::Thursday => "Jeudi",
      Self::Friday => "Vendredi",
      Self::Saturday => "Samedi",
      Self::Sunday => "Dimanche",
    }
  }
}

impl TryFrom<u8> for Weekday {
  type Error = Error;

  fn try_from(n: u8) -> Result<Self, Self::Error> {
    Self::ALL
      .into_iter()
      .find(|d| d.number() == n)
      .ok_or(Error::WeekdayOutOfRange(n))
  }
}

impl From<Weekday> for u8 {
  fn from(day: Weekday) -> u8 {
    day.number()
  }
}

// ─── Contacts ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRecord {
  pub id:              i64,
  pub laboratory_id:   i64,
  pub kind:            ContactType,
  pub address:         String,
  pub city:            String,
  pub postal_code:     Option<String>,
  pub country:         String,
  pub phone:           Option<String>,
  pub email:           Option<String>,
  /// Name of the secret holding the mailbox password. Never the secret itself.
  pub mail_secret_ref: Option<String>,
  pub website:         Option<String>,
  pub active:          bool,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContact {
  pub laboratory_id:   i64,
  pub kind:            ContactType,
  pub address:         String,
  pub city:            String,
  pub postal_code:     Option<String>,
  pub country:         String,
  pub phone:           Option<String>,
  pub email:           Option<String>,
  pub mail_secret_ref: Option<String>,
  pub website:         Option<String>,
  pub active:          bool,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactPatch {
  pub kind:            Option<ContactType>,
  pub address:         Option<String>,
  pub city:            Option<String>,
  pub postal_code:     Option<String>,
  pub country:         Option<String>,
  pub phone:           Option<String>,
  pub email:           Option<String>,
  pub mail_secret_ref: Option<String>,
  pub website:         Option<String>,
  pub active:          Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSummary {
  pub contact:         ContactRecord,
  pub laboratory_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactDetail {
  pub contact:         ContactRecord,
  pub laboratory_name: String,
  pub hours:           Vec<HoursEntry>,
}

// ─── Opening hours ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoursEntry {
  pub id:         i64,
  pub contact_id: i64,
  pub weekday:    Weekday,
  pub opens_at:   Option<NaiveTime>,
  pub closes_at:  Option<NaiveTime>,
  pub closed:     bool,
  pub notes:      Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHours {
  pub contact_id: i64,
  pub weekday:    Weekday,
  pub opens_at:   Option<NaiveTime>,
  pub closes_at:  Option<NaiveTime>,
  pub closed:     bool,
  pub notes:      Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoursPatch {
  pub weekday:   Option<Weekday>,
  pub opens_at:  Option<NaiveTime>,
  pub closes_at: Option<NaiveTime>,
  pub closed:    Option<bool>,
  pub notes:     Option<String>,
}

// ─── Messages ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
  pub id:                  i64,
  pub laboratory_id:       i64,
  pub sender_given_name:   String,
  pub sender_family_name:  String,
  pub sender_email:        String,
  pub sender_organization: Option<String>,
  pub subject:             String,
  pub body:                String,
  pub status:              MessageStatus,
  pub priority:            Priority,
  pub reply:               Option<String>,
  pub reply_author:        Option<String>,
  pub replied_at:          Option<DateTime<Utc>>,
  pub processed:           bool,
  pub sent_at:             DateTime<Utc>,
  pub modified_at:         DateTime<Utc>,
}

impl ContactMessage {
  pub fn sender_full_name(&self) -> String {
    full_name(Some(&self.sender_given_name), Some(&self.sender_family_name))
  }

  /// The stored reply, if it has any non-whitespace content.
  pub fn reply_text(&self) -> Option<&str> {
    self.reply.as_deref().filter(|r| !r.trim().is_empty())
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
  pub laboratory_id:       i64,
  pub sender_given_name:   String,
  pub sender_family_name:  String,
  pub sender_email:        String,
  pub sender_organization: Option<String>,
  pub subject:             String,
  pub body:                String,
  pub priority:            Priority,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagePatch {
  pub status:       Option<MessageStatus>,
  pub priority:     Option<Priority>,
  pub reply:        Option<String>,
  pub reply_author: Option<String>,
  pub processed:    Option<bool>,
}

impl MessagePatch {
  /// Whether applying this patch stores a non-blank reply.
  pub fn carries_reply(&self) -> bool {
    self.reply.as_deref().is_some_and(|r| !r.trim().is_empty())
  }
}

/// Administrator reply recorded when a message is marked as processed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reply {
  pub text:   Option<String>,
  pub author: Option<String>,
}

impl Reply {
  /// The patch that marks a message processed and stores this reply.
  pub fn into_patch(self) -> MessagePatch {
    MessagePatch {
      status:       Some(MessageStatus::Processed),
      priority:     None,
      reply:        self.text,
      reply_author: self.author,
      processed:    Some(true),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSummary {
  pub message:         ContactMessage,
  pub laboratory_name: String,
}
