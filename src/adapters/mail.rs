//! Alert delivery: SMTP relay with STARTTLS, or console output when mail is not configured.

use crate::config::MailConfig;
use crate::domain::model::Alert;
use crate::domain::ports::Notifier;
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Sends each alert as a plain-text email to the configured recipients.
pub struct SmtpNotifier {
    smtp_host: String,
    smtp_port: u16,
    from: String,
    password: String,
    recipients: Vec<String>,
}

impl SmtpNotifier {
    pub fn new(
        smtp_host: impl Into<String>,
        smtp_port: u16,
        from: impl Into<String>,
        password: impl Into<String>,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            smtp_host: smtp_host.into(),
            smtp_port,
            from: from.into(),
            password: password.into(),
            recipients,
        }
    }

    pub fn build_message(&self, alert: &Alert) -> Result<Message> {
        let from: Mailbox = self.from.parse()?;

        let mut builder = Message::builder().from(from).subject(alert.subject.as_str());
        for recipient in &self.recipients {
            let to: Mailbox = recipient.parse()?;
            builder = builder.to(to);
        }

        builder
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body.clone())
            .map_err(|e| MonitorError::MailError {
                message: format!("Failed to build email message: {}", e),
            })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, alert: &Alert) -> Result<()> {
        let email = self.build_message(alert)?;

        // Gmail 使用寄件者地址作為 SMTP 帳號
        let creds = Credentials::new(self.from.clone(), self.password.clone());

        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp_host)
                .map_err(|e| MonitorError::MailError {
                    message: format!("Failed to create SMTP transport: {}", e),
                })?
                .port(self.smtp_port)
                .credentials(creds)
                .build();

        mailer
            .send(email)
            .await
            .map_err(|e| MonitorError::MailError {
                message: e.to_string(),
            })?;

        tracing::info!(
            to = %self.recipients.join(","),
            subject = %alert.subject,
            "📧 Email sent"
        );
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "smtp"
    }
}

/// Degraded-mode alerts for environments without mail credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn render(alert: &Alert) -> String {
        format!("[ALERT - NO EMAIL CONFIG] {}: {}", alert.subject, alert.body)
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, alert: &Alert) -> Result<()> {
        println!("{}", Self::render(alert));
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "console"
    }
}

/// SMTP when sender, password and at least one recipient are configured; console otherwise.
pub fn notifier_for(config: &MailConfig) -> Box<dyn Notifier> {
    match (config.from.as_deref(), config.password.as_deref()) {
        (Some(from), Some(password)) if !config.recipients.is_empty() => Box::new(SmtpNotifier::new(
            config.smtp_host.clone(),
            config.smtp_port,
            from,
            password,
            config.recipients.clone(),
        )),
        (Some(_), Some(_)) => {
            tracing::warn!("⚠️ Mail credentials set but no recipients configured, alerts go to console");
            Box::new(ConsoleNotifier)
        }
        _ => {
            tracing::info!("📝 Mail credentials not configured, alerts go to console");
            Box::new(ConsoleNotifier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert() -> Alert {
        Alert {
            subject: "Overuse Alert".to_string(),
            body: "Azle (4x)".to_string(),
        }
    }

    fn mail_config(from: Option<&str>, password: Option<&str>, recipients: &[&str]) -> MailConfig {
        MailConfig {
            from: from.map(str::to_string),
            password: password.map(str::to_string),
            recipients: recipients.iter().map(|r| r.to_string()).collect(),
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
        }
    }

    #[test]
    fn test_message_has_headers_for_every_recipient() {
        let notifier = SmtpNotifier::new(
            "smtp.example.com",
            587,
            "alerts@example.com",
            "secret",
            vec!["ops@example.com".to_string(), "hr@example.com".to_string()],
        );

        let message = notifier.build_message(&alert()).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("Subject: Overuse Alert"));
        assert!(formatted.contains("From: alerts@example.com"));
        assert!(formatted.contains("ops@example.com"));
        assert!(formatted.contains("hr@example.com"));
        assert!(formatted.contains("Azle (4x)"));
        assert_eq!(message.envelope().to().len(), 2);
    }

    #[test]
    fn test_invalid_recipient_is_an_address_error() {
        let notifier = SmtpNotifier::new(
            "smtp.example.com",
            587,
            "alerts@example.com",
            "secret",
            vec!["not-an-address".to_string()],
        );

        assert!(matches!(
            notifier.build_message(&alert()),
            Err(MonitorError::AddressError(_))
        ));
    }

    #[test]
    fn test_console_render_marks_degraded_mode() {
        assert_eq!(
            ConsoleNotifier::render(&alert()),
            "[ALERT - NO EMAIL CONFIG] Overuse Alert: Azle (4x)"
        );
    }

    #[tokio::test]
    async fn test_console_notifier_never_fails() {
        assert!(ConsoleNotifier.notify(&alert()).await.is_ok());
    }

    #[test]
    fn test_notifier_selection() {
        let full = mail_config(Some("a@example.com"), Some("pw"), &["b@example.com"]);
        assert_eq!(notifier_for(&full).describe(), "smtp");

        let no_password = mail_config(Some("a@example.com"), None, &["b@example.com"]);
        assert_eq!(notifier_for(&no_password).describe(), "console");

        let no_recipients = mail_config(Some("a@example.com"), Some("pw"), &[]);
        assert_eq!(notifier_for(&no_recipients).describe(), "console");
    }
}
