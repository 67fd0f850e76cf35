//! Outgoing notification mails for contact messages.
//!
//! Three mails exist: an alert to the laboratory when a message arrives, an
//! acknowledgement to the sender, and the administrator's reply to the sender.
//! This module composes them and defines the two capabilities needed to send
//! them: a [`Mailer`] transport and a [`SecretResolver`] that turns the
//! contact's secret reference into a mailbox password at send time.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{
  choices::Choice,
  contact::{ContactMessage, ContactRecord},
};

/// Timestamp format used in mail bodies.
pub const DATE_FORMAT: &str = "%d/%m/%Y à %H:%M";

#[derive(Debug, Error)]
pub enum NotifyError {
  #[error("laboratory {0} has no active principal contact")]
  NoPrincipalContact(i64),

  #[error("principal contact {0} has no e-mail address")]
  MissingAddress(i64),

  #[error("principal contact {0} has no mail secret reference")]
  MissingSecretRef(i64),

  #[error("mail secret {0:?} could not be resolved")]
  SecretUnavailable(String),

  #[error("message {0} has no reply to deliver")]
  EmptyReply(i64),

  #[error("mail transport error: {0}")]
  Transport(String),

  #[error("store error while preparing notification: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

// ─── Capabilities ────────────────────────────────────────────────────────────

/// Mailbox login used as the sender identity.
#[derive(Clone, PartialEq, Eq)]
pub struct MailCredentials {
  pub username: String,
  pub password: String,
}

impl fmt::Debug for MailCredentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MailCredentials")
      .field("username", &self.username)
      .field("password", &"<redacted>")
      .finish()
  }
}

impl MailCredentials {
  /// Resolve the credentials of `contact`, the principal contact of
  /// `laboratory_id` if one was found.
  pub fn for_contact(
    laboratory_id: i64,
    contact: Option<&ContactRecord>,
    secrets: &dyn SecretResolver,
  ) -> Result<Self, NotifyError> {
    let contact = contact.ok_or(NotifyError::NoPrincipalContact(laboratory_id))?;
    let username = contact
      .email
      .as_deref()
      .filter(|e| !e.trim().is_empty())
      .ok_or(NotifyError::MissingAddress(contact.id))?;
    let reference = contact
      .mail_secret_ref
      .as_deref()
      .filter(|r| !r.trim().is_empty())
      .ok_or(NotifyError::MissingSecretRef(contact.id))?;
    let password = secrets
      .resolve(reference)
      .filter(|p| !p.is_empty())
      .ok_or_else(|| NotifyError::SecretUnavailable(reference.to_owned()))?;

    Ok(Self { username: username.to_owned(), password })
  }
}

/// Looks secrets up by reference name.
pub trait SecretResolver: Send + Sync {
  fn resolve(&self, reference: &str) -> Option<String>;
}

/// Delivers a composed mail.
#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(
    &self,
    credentials: &MailCredentials,
    mail: &OutgoingMail,
  ) -> Result<(), NotifyError>;
}

// ─── Mail contents ───────────────────────────────────────────────────────────

/// Subject and bodies of a mail, before addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailContent {
  pub subject: String,
  pub text:    String,
  pub html:    String,
}

impl MailContent {
  pub fn addressed(self, from: &str, to: &str) -> OutgoingMail {
    OutgoingMail {
      from:    from.to_owned(),
      to:      vec![to.to_owned()],
      subject: self.subject,
      text:    self.text,
      html:    self.html,
    }
  }
}

/// A mail ready to hand to a [`Mailer`]: plain text with an HTML alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
  pub from:    String,
  pub to:      Vec<String>,
  pub subject: String,
  pub text:    String,
  pub html:    String,
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      _ => out.push(c),
    }
  }
  out
}

/// Escaped, with line breaks kept as `<br>`.
fn escape_multiline(raw: &str) -> String {
  escape_html(raw).replace('\n', "<br>")
}

fn format_date(at: DateTime<Utc>) -> String {
  at.format(DATE_FORMAT).to_string()
}

fn html_page(title: &str, inner: &str) -> String {
  format!(
    "<html>\n<body style=\"font-family: Arial, sans-serif; line-height: 1.6; color: #333;\">\n\
     <div style=\"max-width: 600px; margin: 0 auto; padding: 20px;\">\n\
     <h2 style=\"color: #2c5aa0; border-bottom: 2px solid #2c5aa0; padding-bottom: 10px;\">{title}</h2>\n\
     {inner}\n</div>\n</body>\n</html>\n"
  )
}

/// Alert sent to the laboratory's principal contact.
pub fn new_message_alert(laboratory_name: &str, message: &ContactMessage) -> MailContent {
  let sender = message.sender_full_name();
  let sent = format_date(message.sent_at);
  let priority = message.priority.label();
  let organization = message.sender_organization.as_deref().filter(|o| !o.is_empty());

  let mut text = format!(
    "Nouveau Message de Contact - {laboratory_name}\n\n\
     Détails de l'expéditeur :\n\
     - Nom : {sender}\n\
     - Email : {email}\n",
    email = message.sender_email,
  );
  if let Some(org) = organization {
    text.push_str(&format!("- Organisation : {org}\n"));
  }
  text.push_str(&format!(
    "- Priorité : {priority}\n\n\
     Sujet : {subject}\n\n\
     Message :\n{body}\n\n\
     ---\n\
     Ce message a été envoyé le {sent} via le formulaire de contact du site web.\n\
     Pour répondre à ce message, utilisez l'adresse email : {email}\n",
    subject = message.subject,
    body = message.body,
    email = message.sender_email,
  ));

  let org_html = organization
    .map(|o| format!("<p><strong>Organisation :</strong> {}</p>\n", escape_html(o)))
    .unwrap_or_default();
  let inner = format!(
    "<h3>Détails de l'expéditeur :</h3>\n\
     <p><strong>Nom :</strong> {sender}</p>\n\
     <p><strong>Email :</strong> {email}</p>\n\
     {org_html}\
     <p><strong>Priorité :</strong> {priority}</p>\n\
     <h3>Sujet :</h3>\n<p style=\"font-weight: bold;\">{subject}</p>\n\
     <h3>Message :</h3>\n<div style=\"border-left: 4px solid #2c5aa0; padding: 15px;\">{body}</div>\n\
     <p style=\"color: #6c757d; font-size: 12px;\">Ce message a été envoyé le {sent} via le formulaire de contact du site web.<br>\
     Pour répondre à ce message, utilisez l'adresse email : {email}</p>",
    sender = escape_html(&sender),
    email = escape_html(&message.sender_email),
    subject = escape_html(&message.subject),
    body = escape_multiline(&message.body),
  );

  MailContent {
    subject: format!("[{laboratory_name}] Nouveau message de contact - {}", message.subject),
    text,
    html: html_page("Nouveau Message de Contact", &inner),
  }
}

/// Acknowledgement of receipt sent to the sender.
pub fn receipt_acknowledgement(laboratory_name: &str, message: &ContactMessage) -> MailContent {
  let sent = format_date(message.sent_at);
  let priority = message.priority.label();

  let text = format!(
    "Confirmation de Réception\n\n\
     Bonjour {given},\n\n\
     Nous avons bien reçu votre message adressé au {laboratory_name}.\n\n\
     Récapitulatif de votre message :\n\
     - Sujet : {subject}\n\
     - Date d'envoi : {sent}\n\
     - Priorité : {priority}\n\n\
     Notre équipe prendra connaissance de votre demande dans les plus brefs délais. \
     Nous vous répondrons généralement sous 48 heures ouvrables.\n\n\
     Si votre demande est urgente, n'hésitez pas à nous contacter directement par téléphone.\n\n\
     Cordialement,\nL'équipe du {laboratory_name}\n\n\
     Ceci est un message automatique, merci de ne pas y répondre.\n",
    given = message.sender_given_name,
    subject = message.subject,
  );

  let lab = escape_html(laboratory_name);
  let inner = format!(
    "<p>Bonjour {given},</p>\n\
     <p>Nous avons bien reçu votre message adressé au <strong>{lab}</strong>.</p>\n\
     <h3>Récapitulatif de votre message :</h3>\n\
     <p><strong>Sujet :</strong> {subject}</p>\n\
     <p><strong>Date d'envoi :</strong> {sent}</p>\n\
     <p><strong>Priorité :</strong> {priority}</p>\n\
     <p>Notre équipe prendra connaissance de votre demande dans les plus brefs délais. \
     Nous vous répondrons généralement sous 48 heures ouvrables.</p>\n\
     <p>Si votre demande est urgente, n'hésitez pas à nous contacter directement par téléphone.</p>\n\
     <p style=\"color: #6c757d; font-size: 12px;\">Cordialement,<br>L'équipe du {lab}<br>\
     Ceci est un message automatique, merci de ne pas y répondre.</p>",
    given = escape_html(&message.sender_given_name),
    subject = escape_html(&message.subject),
  );

  MailContent {
    subject: format!("Confirmation de réception - {}", message.subject),
    text,
    html: html_page("Confirmation de Réception", &inner),
  }
}

/// The administrator's reply, or `None` if the message has no reply text.
pub fn admin_reply(laboratory_name: &str, message: &ContactMessage) -> Option<MailContent> {
  let reply = message.reply_text()?;
  let author = message.reply_author.as_deref().filter(|a| !a.is_empty());

  let mut text = format!(
    "Réponse du laboratoire\n\n\
     Bonjour {given},\n\n\
     Suite à votre message adressé au {laboratory_name}, voici notre réponse :\n\n\
     {reply}\n\n",
    given = message.sender_given_name,
  );
  if let Some(author) = author {
    text.push_str(&format!("Responsable: {author}\n\n"));
  }
  text.push_str(&format!("Cordialement,\nL'équipe du {laboratory_name}\n"));

  let lab = escape_html(laboratory_name);
  let author_html = author
    .map(|a| format!("<p><strong>Responsable :</strong> {}</p>\n", escape_html(a)))
    .unwrap_or_default();
  let inner = format!(
    "<p>Bonjour {given},</p>\n\
     <p>Suite à votre message adressé au <strong>{lab}</strong>, voici notre réponse :</p>\n\
     <div style=\"border-left: 4px solid #2c5aa0; padding: 15px;\">{reply}</div>\n\
     {author_html}\
     <p style=\"color: #6c757d; font-size: 12px;\">Cordialement,<br>L'équipe du {lab}<br>\
     Merci de répondre directement à cet email si besoin.</p>",
    given = escape_html(&message.sender_given_name),
    reply = escape_multiline(reply),
  );

  Some(MailContent {
    subject: format!("Réponse à votre message - {}", message.subject),
    text,
    html: html_page("Réponse du laboratoire", &inner),
  })
}
