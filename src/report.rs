//! Reports from maintenance runs, mailed to the editors or printed.

use std::io::Write;

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::{SmtpTransport, Transport};
use tracing::info;

use crate::config::Config;
use crate::error::{ConfigResult, ReportResult};

/// Sender of all reports
pub const REPORT_SENDER: &str = "Faust-Edition <noreply@faustedition.net>";

/// Recipients of mailed reports
pub const REPORT_RECIPIENTS: [&str; 1] = ["Gregor Middell <gregor@middell.net>"];

/// Delivery of a composed report message
#[cfg_attr(test, mockall::automock)]
pub trait Mailer {
    fn deliver(&self, message: &Message) -> ReportResult<()>;
}

/// Standard SMTP port of the local relay
pub const SMTP_PORT: u16 = 25;

/// Plain SMTP delivery to a relay host, without TLS
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
}

impl SmtpMailer {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: SMTP_PORT,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl Mailer for SmtpMailer {
    fn deliver(&self, message: &Message) -> ReportResult<()> {
        // One connection per report, closed when the transport is dropped
        let transport = SmtpTransport::builder_dangerous(&self.host)
            .port(self.port)
            .build();
        transport.send(message)?;
        Ok(())
    }
}

/// Sends reports by mail when `mail.enabled` is set, to stdout otherwise
pub struct ReportSender<M: Mailer = SmtpMailer> {
    mail_enabled: bool,
    mailer: M,
}

impl ReportSender<SmtpMailer> {
    /// Sender configured from `mail.enabled` and `mail.host`
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        Ok(Self::new(
            config.mail_enabled()?,
            SmtpMailer::new(config.mail_host()?),
        ))
    }
}

impl<M: Mailer> ReportSender<M> {
    pub fn new(mail_enabled: bool, mailer: M) -> Self {
        Self {
            mail_enabled,
            mailer,
        }
    }

    pub fn mail_enabled(&self) -> bool {
        self.mail_enabled
    }

    /// Send a report, printing to stdout when mail is disabled
    pub fn send_report(&self, subject: &str, body: &str) -> ReportResult<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.send_report_to(&mut out, subject, body)
    }

    /// Send a report, writing to `console` when mail is disabled
    pub fn send_report_to<W: Write>(
        &self,
        console: &mut W,
        subject: &str,
        body: &str,
    ) -> ReportResult<()> {
        if self.mail_enabled {
            let message = compose_report(subject, body)?;
            self.mailer.deliver(&message)?;
            info!("Mailed report '{}'", subject);
        } else {
            write_report(console, subject, body)?;
        }
        Ok(())
    }
}

/// Plain-text report message from the fixed sender to the fixed recipients
pub fn compose_report(subject: &str, body: &str) -> ReportResult<Message> {
    let mut builder = Message::builder()
        .from(REPORT_SENDER.parse::<Mailbox>()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN);
    for recipient in REPORT_RECIPIENTS {
        builder = builder.to(recipient.parse::<Mailbox>()?);
    }
    Ok(builder.body(body.to_string())?)
}

/// Console rendition: subject line, blank line, body
pub fn write_report<W: Write>(console: &mut W, subject: &str, body: &str) -> std::io::Result<()> {
    writeln!(console, "Subject: {}", subject)?;
    writeln!(console)?;
    writeln!(console, "{}", body)?;
    console.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;

    fn formatted(message: &Message) -> String {
        String::from_utf8(message.formatted()).unwrap()
    }

    #[test]
    fn test_console_report() {
        let mut mailer = MockMailer::new();
        mailer.expect_deliver().never();
        let sender = ReportSender::new(false, mailer);

        let mut console = Vec::new();
        sender.send_report_to(&mut console, "S", "B").unwrap();

        assert_eq!(String::from_utf8(console).unwrap(), "Subject: S\n\nB\n");
    }

    #[test]
    fn test_mailed_report() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_deliver()
            .times(1)
            .withf(|message| {
                let text = String::from_utf8(message.formatted()).unwrap();
                text.contains("Subject: S\r\n")
                    && text.contains("<noreply@faustedition.net>")
                    && text.contains("<gregor@middell.net>")
                    && text.contains("\r\n\r\nB")
            })
            .returning(|_| Ok(()));
        let sender = ReportSender::new(true, mailer);

        let mut console = Vec::new();
        sender.send_report_to(&mut console, "S", "B").unwrap();

        assert!(console.is_empty());
    }

    #[test]
    fn test_delivery_failure_propagates() {
        let mut mailer = MockMailer::new();
        mailer.expect_deliver().times(1).returning(|_| {
            Err(ReportError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        });
        let sender = ReportSender::new(true, mailer);

        let result = sender.send_report_to(&mut Vec::new(), "S", "B");
        assert!(matches!(result, Err(ReportError::Io(_))));
    }

    #[test]
    fn test_compose_report_envelope() {
        let message = compose_report("Validation failed", "3 documents invalid").unwrap();
        let envelope = message.envelope();

        assert_eq!(
            envelope.from().map(|a| a.to_string()),
            Some("noreply@faustedition.net".to_string())
        );
        let recipients: Vec<String> = envelope.to().iter().map(|a| a.to_string()).collect();
        assert_eq!(recipients, vec!["gregor@middell.net".to_string()]);

        let text = formatted(&message);
        assert!(text.contains("Subject: Validation failed"));
        assert!(text.contains("Content-Type: text/plain"));
        assert!(text.contains("3 documents invalid"));
    }

    #[test]
    fn test_from_config() {
        let config =
            Config::from_ini_str("[mail]\nenabled = false\nhost = relay.local\n").unwrap();
        let sender = ReportSender::from_config(&config).unwrap();

        assert!(!sender.mail_enabled());
        assert_eq!(sender.mailer.host(), "relay.local");
    }

    #[test]
    fn test_from_config_requires_mail_flag() {
        let config = Config::from_ini_str("[xml]\ndir = /data\n").unwrap();
        assert!(ReportSender::from_config(&config).is_err());
    }
}
