//! Outbound email notifications.
//!
//! Handlers depend on the [`Notifier`] trait only. [`SmtpNotifier`] delivers
//! through an SMTP relay; [`LogNotifier`] is used when SMTP is not configured
//! and simply records the message in the log. Delivery is best-effort: callers
//! log failures and carry on.

pub mod email;
pub mod templates;

use async_trait::async_trait;

pub use email::{EmailConfig, SmtpNotifier};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for notification delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// Message + trait
// ---------------------------------------------------------------------------

/// A single HTML email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Sends email notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;
}

/// Send `message` and log (rather than return) any failure.
pub async fn send_best_effort(notifier: &dyn Notifier, message: &EmailMessage) {
    if let Err(e) = notifier.send(message).await {
        tracing::warn!(
            to = %message.to,
            subject = %message.subject,
            error = %e,
            "Notification email failed"
        );
    }
}

// ---------------------------------------------------------------------------
// LogNotifier
// ---------------------------------------------------------------------------

/// Notifier used when SMTP is not configured: logs and succeeds.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "SMTP not configured, email not sent"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingNotifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _message: &EmailMessage) -> Result<(), NotifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(NotifyError::Build("relay down".into()))
        }
    }

    fn message() -> EmailMessage {
        EmailMessage {
            to: "admin@example.com".into(),
            subject: "New contact".into(),
            html: "<p>hi</p>".into(),
        }
    }

    #[tokio::test]
    async fn log_notifier_always_succeeds() {
        assert!(LogNotifier.send(&message()).await.is_ok());
    }

    #[tokio::test]
    async fn best_effort_swallows_failures() {
        let notifier = FailingNotifier {
            calls: AtomicUsize::new(0),
        };
        send_best_effort(&notifier, &message()).await;
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn notify_error_display_build() {
        let err = NotifyError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
