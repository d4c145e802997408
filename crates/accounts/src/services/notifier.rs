//! Outbound email delivery.
//!
//! The account services only see the [`EmailNotifier`] trait; delivery
//! either goes through a real SMTP relay or, when none is configured,
//! through a logging stand-in so local setups work without a mail server.

use anyhow::Context;
use inkwell_config::EmailConfig;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

/// Sends a message to a single recipient. Success or failure is the only
/// signal callers may interpret.
pub trait EmailNotifier {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()>;
}

/// Notifier backed by an async SMTP relay (STARTTLS).
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn from_config(config: &EmailConfig) -> anyhow::Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .with_context(|| format!("invalid smtp relay {}", config.smtp_host))?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = config
            .from_address
            .parse()
            .with_context(|| format!("invalid from address {}", config.from_address))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

impl EmailNotifier for SmtpNotifier {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse().with_context(|| format!("invalid recipient {to}"))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .context("failed to build email message")?;

        self.transport
            .send(message)
            .await
            .with_context(|| format!("failed to send email to {to}"))?;

        info!(%to, subject, "email sent");
        Ok(())
    }
}

/// Logging notifier used when no SMTP relay is configured.
#[derive(Clone, Default)]
pub struct NullNotifier;

impl EmailNotifier for NullNotifier {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> anyhow::Result<()> {
        info!(%to, subject, "smtp relay unconfigured, dropping email");
        Ok(())
    }
}

/// Concrete notifier for application wiring, so state types stay
/// non-generic.
#[derive(Clone)]
pub enum Notifier {
    Smtp(SmtpNotifier),
    Null(NullNotifier),
}

impl Notifier {
    /// Pick the SMTP relay when one is configured, the logging fallback
    /// otherwise.
    pub fn from_config(config: &EmailConfig) -> anyhow::Result<Self> {
        if config.smtp_configured() {
            Ok(Self::Smtp(SmtpNotifier::from_config(config)?))
        } else {
            Ok(Self::Null(NullNotifier))
        }
    }
}

impl EmailNotifier for Notifier {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        match self {
            Self::Smtp(notifier) => notifier.send(to, subject, html_body).await,
            Self::Null(notifier) => notifier.send(to, subject, html_body).await,
        }
    }
}
