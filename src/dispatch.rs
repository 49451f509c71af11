//! Outbound email and push delivery.
//!
//! Both channels are best-effort: callers go through [`Dispatcher`], which
//! logs failures and reports them as `false` instead of returning errors.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && EMAIL_RE.is_match(email)
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub tokens: Vec<String>,
    pub title: String,
    pub body: String,
    pub data: Value,
}

#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send_multicast(&self, message: &PushMessage) -> anyhow::Result<()>;
}

/// Mailer that only writes the message to the log.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        tracing::info!(from = %self.from, to = %recipient, subject, body, "email queued");
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogPushSender;

#[async_trait]
impl PushSender for LogPushSender {
    async fn send_multicast(&self, message: &PushMessage) -> anyhow::Result<()> {
        tracing::info!(
            tokens = message.tokens.len(),
            title = %message.title,
            data = %message.data,
            "push message queued"
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
    push: Arc<dyn PushSender>,
}

impl Dispatcher {
    pub fn new(mailer: Arc<dyn Mailer>, push: Arc<dyn PushSender>) -> Self {
        Self { mailer, push }
    }

    pub fn logging(mail_from: &str) -> Self {
        Self::new(Arc::new(LogMailer::new(mail_from)), Arc::new(LogPushSender))
    }

    /// Returns whether the email was handed to the mailer.
    pub async fn email(&self, recipient: &str, subject: &str, body: &str) -> bool {
        if !is_valid_email(recipient) {
            tracing::warn!(recipient, "skipping email to invalid address");
            return false;
        }
        match self.mailer.send(recipient, subject, body).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, recipient, "email delivery failed");
                false
            }
        }
    }

    /// Returns whether the push message was handed to the sender.
    pub async fn push(&self, message: PushMessage) -> bool {
        if message.tokens.is_empty() {
            return false;
        }
        match self.push.send_multicast(&message).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "push delivery failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _: &str, _: &str, _: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("smtp down"))
        }
    }

    #[test]
    fn validates_email_addresses() {
        assert!(is_valid_email("khachhang1@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.vn"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email("user@localhost"));
    }

    #[tokio::test]
    async fn mailer_failure_is_swallowed() {
        let dispatcher = Dispatcher::new(Arc::new(FailingMailer), Arc::new(LogPushSender));
        assert!(!dispatcher.email("user@example.com", "hi", "body").await);
    }

    #[tokio::test]
    async fn push_without_tokens_is_skipped() {
        let dispatcher = Dispatcher::logging("no-reply@foodspot.local");
        let sent = dispatcher
            .push(PushMessage {
                tokens: vec![],
                title: "t".into(),
                body: "b".into(),
                data: Value::Null,
            })
            .await;
        assert!(!sent);
    }
}
