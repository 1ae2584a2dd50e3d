use crate::config::SmtpConfig;
use crate::models::Listing;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
    #[error("Failed to build message: {0}")]
    Build(String),
    #[error("SMTP delivery failed: {0}")]
    Transport(String),
}

/// One rendered message for a single recipient
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Sends through an SMTP relay (STARTTLS, or implicit TLS on port 465)
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, from: &str) -> Result<Self, MailError> {
        let from: Mailbox = from
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", from, e)))?;

        let relay = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        };
        let builder = relay
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port);

        let builder = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", mail.to, e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                mail.text_body.clone(),
                mail.html_body.clone(),
            ))
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Logs messages instead of sending them; used when no SMTP host is configured
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        log::info!("📧 [log mailer] to: {}, subject: {}", mail.to, mail.subject);
        log::debug!("{}", mail.text_body);
        Ok(())
    }
}

pub fn mailer_from_config(
    smtp: Option<&SmtpConfig>,
    from: &str,
) -> Result<Arc<dyn Mailer>, MailError> {
    match smtp {
        Some(config) => {
            log::info!("📧 SMTP mailer via {}:{}", config.host, config.port);
            Ok(Arc::new(SmtpMailer::new(config, from)?))
        }
        None => {
            log::warn!("⚠️  SMTP_HOST not set, alert emails will only be logged");
            Ok(Arc::new(LogMailer))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, utoipa::ToSchema)]
pub struct DeliveryReport {
    pub sent: usize,
    /// Recipients whose delivery failed
    pub failed: Vec<String>,
}

/// Sends the same message to each recipient, one delivery per address.
/// No retry: failures are logged and reported.
pub async fn send_bulk(
    mailer: &dyn Mailer,
    recipients: &[String],
    subject: &str,
    text_body: &str,
    html_body: &str,
) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    for recipient in recipients {
        let mail = OutgoingMail {
            to: recipient.clone(),
            subject: subject.to_string(),
            text_body: text_body.to_string(),
            html_body: html_body.to_string(),
        };

        match mailer.deliver(&mail).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                log::warn!("❌ Failed to email {}: {}", recipient, e);
                report.failed.push(recipient.clone());
            }
        }
    }

    crate::api::metrics::record_alert_emails(report.sent as u64, report.failed.len() as u64);

    report
}

pub struct AlertEmail {
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Message sent to search-alert subscribers when a matching listing goes live
pub fn new_listing_alert(listing: &Listing) -> AlertEmail {
    let mut details = vec![format!("Category: {}", listing.category)];
    if let Some(price) = listing.price {
        details.push(format!("Price: {:.2}", price));
    }
    if !listing.age_group.is_empty() {
        details.push(format!("Age group: {}", listing.age_group));
    }
    if !listing.location.is_empty() {
        details.push(format!("Location: {}", listing.location));
    }

    let text_body = format!(
        "Hello,\n\nA new listing matching your interests was added recently:\n\n{}\n{}\n",
        listing.title,
        details.join("\n"),
    );

    let html_items: String = details
        .iter()
        .map(|d| format!("<li>{}</li>", escape_html(d)))
        .collect();
    let html_body = format!(
        "<p>Hello,</p><p>A new listing matching your interests was added recently:</p><p><b>{}</b></p><ul>{}</ul>",
        escape_html(&listing.title),
        html_items,
    );

    AlertEmail {
        subject: "New listing added recently according to your interest".to_string(),
        text_body,
        html_body,
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// In-memory mailer for tests elsewhere in the crate
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct RecordingMailer {
        pub delivered: Mutex<Vec<OutgoingMail>>,
        /// Addresses whose delivery fails
        pub reject: Vec<String>,
    }

    impl RecordingMailer {
        pub async fn recipients(&self) -> Vec<String> {
            self.delivered.lock().await.iter().map(|m| m.to.clone()).collect()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn deliver(&self, mail: &OutgoingMail) -> Result<(), MailError> {
            if self.reject.contains(&mail.to) {
                return Err(MailError::Transport("mailbox unavailable".into()));
            }
            self.delivered.lock().await.push(mail.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingMailer;
    use super::*;

    fn listing() -> Listing {
        Listing {
            id: None,
            trainer_id: "t-1".into(),
            category: "Table Tennis".into(),
            title: "Spin & serve <advanced>".into(),
            price: Some(30.0),
            location: "Hall B".into(),
            quantity: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            days: "4".into(),
            gender: "Other".into(),
            start_time: String::new(),
            end_time: String::new(),
            age_group: "13-18".into(),
            min_age: Some(13),
            max_age: Some(18),
            description: "Footwork and spin".into(),
            is_approved: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn test_send_bulk_reports_failures() {
        let mailer = RecordingMailer {
            reject: vec!["bounce@example.com".into()],
            ..Default::default()
        };
        let recipients = vec![
            "a@example.com".to_string(),
            "bounce@example.com".to_string(),
            "b@example.com".to_string(),
        ];

        let report = send_bulk(&mailer, &recipients, "Subject", "text", "<p>html</p>").await;

        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, vec!["bounce@example.com".to_string()]);

        let delivered = mailer.delivered.lock().await;
        let addresses: Vec<&str> = delivered.iter().map(|m| m.to.as_str()).collect();
        assert_eq!(addresses, vec!["a@example.com", "b@example.com"]);
        assert_eq!(delivered[0].html_body, "<p>html</p>");
    }

    #[tokio::test]
    async fn test_send_bulk_with_no_recipients() {
        let mailer = RecordingMailer::default();
        let report = send_bulk(&mailer, &[], "s", "t", "h").await;
        assert_eq!(report, DeliveryReport::default());
    }

    #[tokio::test]
    async fn test_log_mailer_accepts_everything() {
        let mail = OutgoingMail {
            to: "anyone@example.com".into(),
            subject: "Hi".into(),
            text_body: "Hello".into(),
            html_body: "<p>Hello</p>".into(),
        };
        assert!(LogMailer.deliver(&mail).await.is_ok());
    }

    #[test]
    fn test_new_listing_alert_escapes_html() {
        let email = new_listing_alert(&listing());

        assert!(email.text_body.contains("Spin & serve <advanced>"));
        assert!(email.text_body.contains("Age group: 13-18"));
        assert!(email.html_body.contains("<b>Spin &amp; serve &lt;advanced&gt;</b>"));
        assert!(email.html_body.contains("<li>Price: 30.00</li>"));
        assert!(!email.subject.is_empty());
    }

    #[test]
    fn test_smtp_mailer_rejects_bad_sender() {
        let config = SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: None,
            password: None,
        };
        assert!(matches!(
            SmtpMailer::new(&config, "not an address"),
            Err(MailError::InvalidAddress(_))
        ));
    }
}
