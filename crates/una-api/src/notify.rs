//! Fire-and-forget notification mails around contact messages.
//!
//! Every failure is logged with `warn!` and swallowed: a message is stored
//! and answered whether or not its mails go out.

use std::sync::Arc;

use una_core::{
  contact::MessageSummary,
  notify::{self, MailCredentials, Mailer, NotifyError, OutgoingMail, SecretResolver},
  query::{LaboratoryScope, ScopePolicy},
  store::PortalStore,
};

pub struct Notifier {
  mailer:  Arc<dyn Mailer>,
  secrets: Arc<dyn SecretResolver>,
  scope:   LaboratoryScope,
}

/// The laboratory a notification is sent on behalf of.
struct Sender {
  credentials:     MailCredentials,
  laboratory_name: String,
}

impl Notifier {
  pub fn new(
    mailer: Arc<dyn Mailer>,
    secrets: Arc<dyn SecretResolver>,
    scope: LaboratoryScope,
  ) -> Self {
    Self { mailer, secrets, scope }
  }

  /// Alert the laboratory and acknowledge receipt to the sender.
  pub async fn message_received<S: PortalStore>(&self, store: &S, summary: &MessageSummary) {
    let message = &summary.message;
    let sender = match self.sender(store, summary).await {
      Ok(s) => s,
      Err(e) => {
        tracing::warn!(message_id = message.id, error = %e, "contact notifications skipped");
        return;
      }
    };
    let from = sender.credentials.username.as_str();

    let alert = notify::new_message_alert(&sender.laboratory_name, message).addressed(from, from);
    self.deliver(&sender.credentials, &alert, "new message alert", message.id).await;

    let receipt = notify::receipt_acknowledgement(&sender.laboratory_name, message)
      .addressed(from, &message.sender_email);
    self.deliver(&sender.credentials, &receipt, "receipt acknowledgement", message.id).await;
  }

  /// Deliver a saved administrator reply to the sender.
  pub async fn reply_saved<S: PortalStore>(&self, store: &S, summary: &MessageSummary) {
    let message = &summary.message;
    let result = async {
      let sender = self.sender(store, summary).await?;
      let content = notify::admin_reply(&sender.laboratory_name, message)
        .ok_or(NotifyError::EmptyReply(message.id))?;
      let mail = content.addressed(&sender.credentials.username, &message.sender_email);
      self.mailer.send(&sender.credentials, &mail).await
    }
    .await;

    match result {
      Ok(()) => tracing::info!(message_id = message.id, "admin reply sent"),
      Err(e) => tracing::warn!(message_id = message.id, error = %e, "admin reply not sent"),
    }
  }

  async fn deliver(
    &self,
    credentials: &MailCredentials,
    mail: &OutgoingMail,
    what: &str,
    message_id: i64,
  ) {
    match self.mailer.send(credentials, mail).await {
      Ok(()) => tracing::debug!(message_id, "{what} sent"),
      Err(e) => tracing::warn!(message_id, error = %e, "{what} not sent"),
    }
  }

  /// Credentials and display name of the notifying laboratory: the default
  /// laboratory under the default-laboratory policy when it exists,
  /// otherwise the message's own laboratory.
  async fn sender<S: PortalStore>(
    &self,
    store: &S,
    summary: &MessageSummary,
  ) -> Result<Sender, NotifyError> {
    let store_err = |e: S::Error| NotifyError::Store(Box::new(e));

    let default_lab = match self.scope.policy {
      ScopePolicy::DefaultLaboratory => store
        .find_laboratory(self.scope.default_laboratory_id)
        .await
        .map_err(store_err)?,
      ScopePolicy::Unrestricted => None,
    };
    let (laboratory_id, laboratory_name) = match default_lab {
      Some(lab) => (lab.id, lab.name),
      None => (summary.message.laboratory_id, summary.laboratory_name.clone()),
    };

    let contact = store.principal_contact(laboratory_id).await.map_err(store_err)?;
    let credentials =
      MailCredentials::for_contact(laboratory_id, contact.as_ref(), self.secrets.as_ref())?;

    Ok(Sender { credentials, laboratory_name })
  }
}
