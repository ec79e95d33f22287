pub mod config;
pub mod email;
pub mod error;
pub mod staging;
pub mod transport;

pub use email::{Attachment, OutboundMessage};
pub use error::Error;
pub use transport::{MailTransport, SmtpMailer};

use std::env;
use std::path::PathBuf;

use staging::StagingArea;

/// Outbound mail entry points.
///
/// Validation errors come back to the caller; staging and transport
/// failures are logged and swallowed, so a clean return does not imply
/// delivery.
pub struct Mailer<T: MailTransport> {
    transport: T,
    staging_root: PathBuf,
}

impl<T: MailTransport> Mailer<T> {
    pub fn new(transport: T) -> Self {
        Mailer {
            transport,
            staging_root: env::temp_dir(),
        }
    }

    /// Overrides the directory under which call-scoped staging directories
    /// are created. Defaults to the system temp directory.
    pub fn with_staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = root.into();
        self
    }

    /// Builds and submits a plain message.
    pub fn send_email(
        &mut self,
        sender: &str,
        subject: &str,
        content: &str,
        recipients: &[String],
    ) -> Result<(), Error> {
        let message = OutboundMessage::simple(sender, subject, content, recipients)?;

        log::info!("Sending mail to: {}", recipients.join(", "));

        match self.transport.send(message) {
            Ok(()) => log::debug!("Email sent"),
            Err(e) => log::warn!("Failed to send email: {}", e),
        }

        Ok(())
    }

    /// Stages every attachment, submits the multi-part message, and removes
    /// the staged files whether or not the send succeeded.
    ///
    /// A staging failure aborts the send; nothing is delivered with a
    /// partial attachment set.
    pub fn send_email_with_attachments(
        &mut self,
        sender: &str,
        subject: &str,
        content: &str,
        recipients: &[String],
        attachments: &[Attachment],
    ) -> Result<(), Error> {
        email::validate(sender, recipients)?;

        if let Err(e) = self.stage_and_send(sender, subject, content, recipients, attachments) {
            log::warn!("Failed to send email: {}", e);
        }

        Ok(())
    }

    fn stage_and_send(
        &mut self,
        sender: &str,
        subject: &str,
        content: &str,
        recipients: &[String],
        attachments: &[Attachment],
    ) -> Result<(), Error> {
        // The area removes its directory on drop, so every exit below this
        // point cleans up, including a failure partway through the batch.
        let mut area = StagingArea::new(&self.staging_root)?;

        for attachment in attachments {
            area.stage(&attachment.name, &attachment.body)?;
        }

        let message =
            OutboundMessage::with_attachments(sender, subject, content, recipients, area.staged())?;

        log::info!("Sending mail to: {}", recipients.join(", "));

        let result = self.transport.send(message);

        for name in area.names() {
            if let Err(e) = area.unstage(&name) {
                log::error!("{}", e);
            }
        }

        if result.is_ok() {
            log::debug!("Email sent");
        }

        result
    }
}
