//! Outbound message assembly.
//!
//! Validation happens here, before any file is staged: a message with a bad
//! address or no recipients never reaches the stager or the transport.

use std::fmt;

use lettre::{EmailAddress, Envelope, SendableEmail};
use lettre_email::EmailBuilder;

use crate::error::Error;
use crate::staging::StagedFile;

/// A named text payload to be staged and attached to one message.
///
/// The name doubles as the staged file name and the attachment's display
/// name, so it must be unique within a single send call.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub name: String,
    pub body: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Attachment {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// A fully-built message, ready to hand to a transport.
pub struct OutboundMessage {
    inner: SendableEmail,
}

impl fmt::Debug for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("OutboundMessage")
            .field("envelope", self.inner.envelope())
            .finish()
    }
}

impl OutboundMessage {
    /// Builds a plain-text message addressed to every recipient directly.
    pub fn simple(
        sender: &str,
        subject: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<Self, Error> {
        validate(sender, recipients)?;

        let mut builder = EmailBuilder::new()
            .from(sender)
            .subject(subject)
            .text(body);

        for recipient in recipients {
            builder = builder.to(recipient.as_str());
        }

        let email = builder.build()?;

        Ok(OutboundMessage {
            inner: email.into(),
        })
    }

    /// Builds a multi-part message: one `text/html` body part plus one
    /// `text/plain` part per staged file, attached under its display name.
    pub fn with_attachments(
        sender: &str,
        subject: &str,
        body: &str,
        recipients: &[String],
        staged: &[StagedFile],
    ) -> Result<Self, Error> {
        validate(sender, recipients)?;

        let mut builder = EmailBuilder::new()
            .from(sender)
            .subject(subject)
            .html(body);

        for recipient in recipients {
            builder = builder.to(recipient.as_str());
        }

        for file in staged {
            builder = builder.attachment_from_file(
                &file.path,
                Some(file.name.as_str()),
                &mime::TEXT_PLAIN,
            )?;
        }

        let email = builder.build()?;

        Ok(OutboundMessage {
            inner: email.into(),
        })
    }

    pub fn envelope(&self) -> &Envelope {
        self.inner.envelope()
    }

    pub fn into_sendable(self) -> SendableEmail {
        self.inner
    }
}

/// Checks the sender and every recipient before anything is built or staged.
pub(crate) fn validate(sender: &str, recipients: &[String]) -> Result<(), Error> {
    if recipients.is_empty() {
        return Err(Error::EmptyRecipients);
    }

    parse_address(sender)?;

    for recipient in recipients {
        parse_address(recipient)?;
    }

    Ok(())
}

fn parse_address(addr: &str) -> Result<EmailAddress, Error> {
    // lettre 0.9 accepts nearly any non-empty string, so the user@domain
    // shape is checked here as well.
    if !is_valid_address(addr) {
        return Err(Error::InvalidAddress(addr.to_string()));
    }

    EmailAddress::new(addr.to_string()).map_err(|_| Error::InvalidAddress(addr.to_string()))
}

fn is_valid_address(addr: &str) -> bool {
    let mut parts = addr.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    !local.is_empty() && !domain.is_empty() && !addr.chars().any(char::is_whitespace)
}
