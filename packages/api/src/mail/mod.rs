//! # Outgoing email
//!
//! [`Mailer`] is the seam between the app and the mail provider. Production
//! uses [`MailTransport`], which is SMTP via `lettre` when `smtp.host` is
//! configured and [`LogMailer`] otherwise, so a development server without a
//! mail account still exercises the full reminder flow.

mod smtp;
pub mod templates;

use std::future::Future;

use thiserror::Error;

use crate::settings::SmtpSettings;

pub use smtp::SmtpMailer;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(String),
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// A rendered HTML email.
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub to_name: String,
    pub subject: String,
    pub html: String,
}

pub trait Mailer: Clone + Send + Sync + 'static {
    fn send(&self, email: Email) -> impl Future<Output = Result<(), MailError>> + Send;
}

/// Logs instead of sending.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        tracing::info!(to = %email.to, subject = %email.subject, "smtp not configured, email not sent");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum MailTransport {
    Smtp(SmtpMailer),
    Log(LogMailer),
}

impl MailTransport {
    pub fn from_settings(settings: Option<&SmtpSettings>) -> Result<Self, MailError> {
        match settings {
            Some(smtp) => Ok(MailTransport::Smtp(SmtpMailer::new(smtp)?)),
            None => {
                tracing::warn!("no smtp settings, outgoing email will only be logged");
                Ok(MailTransport::Log(LogMailer))
            }
        }
    }
}

impl Mailer for MailTransport {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        match self {
            MailTransport::Smtp(mailer) => mailer.send(email).await,
            MailTransport::Log(mailer) => mailer.send(email).await,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every email; can be told to fail.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingMailer {
        sent: Arc<Mutex<Vec<Email>>>,
        failing: Arc<AtomicBool>,
    }

    impl RecordingMailer {
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn sent(&self) -> Vec<Email> {
            self.sent.lock().unwrap().clone()
        }

        pub fn reminders(&self) -> Vec<Email> {
            self.sent()
                .into_iter()
                .filter(|e| e.subject.starts_with("REMINDER:") || e.subject.starts_with("URGENT:"))
                .collect()
        }
    }

    impl Mailer for RecordingMailer {
        async fn send(&self, email: Email) -> Result<(), MailError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(MailError::Transport("connection refused".into()));
            }
            self.sent.lock().unwrap().push(email);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn falls_back_to_logging_without_smtp() {
        let transport = MailTransport::from_settings(None).unwrap();
        assert!(matches!(transport, MailTransport::Log(_)));

        let email = Email {
            to: "ada@example.com".into(),
            to_name: "Ada".into(),
            subject: "hi".into(),
            html: "<p>hi</p>".into(),
        };
        assert!(transport.send(email).await.is_ok());
    }

    #[test]
    fn smtp_from_address_is_validated() {
        let settings = SmtpSettings {
            host: "smtp.example.com".into(),
            port: Some(587),
            username: None,
            password: None,
            from: "not an address".into(),
        };
        assert!(matches!(
            MailTransport::from_settings(Some(&settings)),
            Err(MailError::Address(_))
        ));
    }
}
