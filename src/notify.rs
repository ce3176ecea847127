//! Outbound activation notices
//!
//! Delivery is best effort. [`dispatch_activation`] runs the notifier on a
//! detached task and only logs the outcome; the operation that issued the
//! token has already returned by then and its token stays valid whatever
//! happens to the message.

use crate::Result;
use crate::config::MailConfig;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Activation message for one recipient
#[derive(Clone)]
pub struct ActivationNotice {
    pub recipient: String,
    pub name: String,
    /// Link embedding the raw activation token
    pub link: String,
}

impl std::fmt::Debug for ActivationNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationNotice")
            .field("recipient", &self.recipient)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ActivationNotice {
    /// Plain-text body of the activation message
    pub fn body(&self) -> String {
        format!(
            "Hola {},\n\nActiva tu cuenta y define tu contraseña en el siguiente enlace:\n{}\n\nEl enlace vence en 24 horas.",
            self.name, self.link
        )
    }
}

/// Delivery channel for activation notices
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_activation(&self, notice: &ActivationNotice) -> Result<()>;
}

/// Notifier that writes notices to the log
///
/// Stands in for a mail transport in development; the link itself is only
/// logged at debug level.
#[derive(Debug, Clone)]
pub struct TracingNotifier {
    sender: String,
}

impl TracingNotifier {
    pub fn new(mail: &MailConfig) -> Self {
        Self {
            sender: format!("{} <{}>", mail.from_name, mail.from_email),
        }
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send_activation(&self, notice: &ActivationNotice) -> Result<()> {
        info!(
            "📧 Activation notice from {} to {}",
            self.sender, notice.recipient
        );
        debug!("📧 Activation link for {}: {}", notice.recipient, notice.link);
        Ok(())
    }
}

/// Send a notice on a detached task; failures are logged, never returned
pub fn dispatch_activation(notifier: Arc<dyn Notifier>, notice: ActivationNotice) -> JoinHandle<()> {
    tokio::spawn(async move {
        match notifier.send_activation(&notice).await {
            Ok(()) => debug!("📧 Activation notice delivered to {}", notice.recipient),
            Err(e) => error!(
                "❌ Activation notice to {} failed: {}",
                notice.recipient, e
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct Unreachable;

    #[async_trait]
    impl Notifier for Unreachable {
        async fn send_activation(&self, _notice: &ActivationNotice) -> Result<()> {
            Err(Error::internal("mail transport unreachable"))
        }
    }

    fn notice() -> ActivationNotice {
        ActivationNotice {
            recipient: "juan@x.pe".to_string(),
            name: "Juan".to_string(),
            link: MailConfig::default().activation_link("abc"),
        }
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let handle = dispatch_activation(Arc::new(Unreachable), notice());
        // The task completes normally even though delivery failed
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_tracing_notifier() {
        let notifier = TracingNotifier::new(&MailConfig::default());
        assert!(notifier.send_activation(&notice()).await.is_ok());
    }

    #[test]
    fn test_body_and_debug() {
        let notice = notice();
        assert!(notice.body().contains("/activate?token=abc"));
        assert!(!format!("{notice:?}").contains("token=abc"));
    }
}
