use std::error;
use std::fmt;

/// All possible courier library errors.
///
/// Validation errors (`InvalidAddress`, `EmptyRecipients`) are returned to
/// the caller; the remaining variants are logged at the send boundary.
#[derive(Debug)]
pub enum Error {
    /// Sender or recipient address failed the syntactic check.
    InvalidAddress(String),
    /// A message must have at least one recipient.
    EmptyRecipients,
    /// A file already exists at the staging path.
    FileExists(String),
    /// Creating or writing a staged file failed.
    FileWrite(String),
    /// Message assembly failed in the mail builder.
    Message(String),
    /// The transport refused or failed to deliver the message.
    Transport(String),
    /// A staged file could not be removed.
    Cleanup(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidAddress(ref addr) => write!(f, "InvalidAddress: {}", addr),
            Error::EmptyRecipients => f.write_str("EmptyRecipients"),
            Error::FileExists(ref name) => write!(f, "FileExists: {}", name),
            Error::FileWrite(ref msg) => write!(f, "FileWrite: {}", msg),
            Error::Message(ref msg) => write!(f, "Message: {}", msg),
            Error::Transport(ref msg) => write!(f, "Transport: {}", msg),
            Error::Cleanup(ref msg) => write!(f, "Cleanup: {}", msg),
        }
    }
}

impl error::Error for Error {}

impl From<lettre_email::error::Error> for Error {
    fn from(err: lettre_email::error::Error) -> Self {
        Self::Message(err.to_string())
    }
}

impl From<lettre::smtp::error::Error> for Error {
    fn from(err: lettre::smtp::error::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
