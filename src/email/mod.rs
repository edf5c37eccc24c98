//! Outgoing mail.
//!
//! [`Mailer`] delivers over SMTP when `SMTP_HOST` is configured and otherwise
//! only logs each message. [`Mailer::outbox`] records messages in memory
//! instead; tests read confirmation codes from it.

pub mod auth_email;

use std::sync::{Arc, Mutex};

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{Config, MailConfig};
use crate::error::AppError;

pub use auth_email::{AuthEmail, EmailRecipient};

/// A rendered message, independent of the transport that delivers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Clone)]
enum MailTransport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Log,
    Outbox(Arc<Mutex<Vec<OutgoingEmail>>>),
}

#[derive(Clone)]
pub struct Mailer {
    from: Mailbox,
    transport: MailTransport,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        match &config.mail {
            Some(mail) => Self::smtp(mail, &config.mail_from),
            None => {
                log::warn!("SMTP_HOST not set; outgoing email is only logged");
                Self::log_only(&config.mail_from)
            }
        }
    }

    pub fn smtp(mail: &MailConfig, from: &str) -> Result<Self, AppError> {
        let builder = if mail.secure {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&mail.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&mail.host)
        };
        let transport = builder
            .port(mail.port)
            .credentials(Credentials::new(mail.user.clone(), mail.pass.clone()))
            .build();

        Ok(Self {
            from: from.parse()?,
            transport: MailTransport::Smtp(transport),
        })
    }

    /// A mailer that logs messages and drops them.
    pub fn log_only(from: &str) -> Result<Self, AppError> {
        Ok(Self {
            from: from.parse()?,
            transport: MailTransport::Log,
        })
    }

    /// A mailer that records messages instead of delivering them.
    ///
    /// Nothing drains the outbox, so this is meant for tests.
    pub fn outbox(from: &str) -> Result<Self, AppError> {
        Ok(Self {
            from: from.parse()?,
            transport: MailTransport::Outbox(Arc::new(Mutex::new(Vec::new()))),
        })
    }

    pub fn from_address(&self) -> &Mailbox {
        &self.from
    }

    pub async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse::<Mailbox>()?)
            .subject(email.subject.clone())
            .message_id(None)
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))?;
        let message_id = message
            .headers()
            .get_raw("Message-ID")
            .unwrap_or_default()
            .to_string();

        match &self.transport {
            MailTransport::Smtp(transport) => {
                let response = transport.send(message).await?;
                log::info!(
                    "email sent to {} ({}), smtp code {}",
                    email.to,
                    message_id,
                    response.code()
                );
            }
            MailTransport::Log => {
                log::info!("email not delivered, no SMTP configured: to {} ({}): {}", email.to, message_id, email.subject);
            }
            MailTransport::Outbox(outbox) => {
                log::info!("email queued to outbox for {} ({}): {}", email.to, message_id, email.subject);
                log::debug!("email body: {}", email.text);
                outbox
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(email);
            }
        }
        Ok(())
    }

    /// Messages recorded so far. Only the outbox records anything.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        match &self.transport {
            MailTransport::Smtp(_) | MailTransport::Log => Vec::new(),
            MailTransport::Outbox(outbox) => outbox
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone(),
        }
    }
}
