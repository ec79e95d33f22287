use lettre::smtp::authentication::{Credentials, Mechanism};
use lettre::smtp::client::net::ClientTlsParameters;
use lettre::smtp::extension::ClientId;
use lettre::smtp::{ClientSecurity, SmtpClient, SmtpTransport};
use lettre::Transport;

use native_tls::TlsConnector;

use crate::config::Config;
use crate::email::OutboundMessage;
use crate::error::Error;

/// Delivery seam between message assembly and the wire.
///
/// Implementations own all connection, TLS, and authentication concerns.
pub trait MailTransport {
    fn send(&mut self, message: OutboundMessage) -> Result<(), Error>;
}

/// SMTP delivery over lettre, STARTTLS required, PLAIN authentication.
pub struct SmtpMailer {
    inner: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let connector = TlsConnector::new().map_err(|e| Error::Transport(e.to_string()))?;
        let tls = ClientTlsParameters::new(config.host.clone(), connector);

        let client = SmtpClient::new(
            (config.host.as_str(), config.port),
            ClientSecurity::Required(tls),
        )?
        .credentials(Credentials::new(
            config.username.clone(),
            config.password.clone(),
        ))
        .authentication_mechanism(Mechanism::Plain)
        .smtp_utf8(true)
        .hello_name(ClientId::hostname());

        Ok(SmtpMailer {
            inner: client.transport(),
        })
    }
}

impl MailTransport for SmtpMailer {
    fn send(&mut self, message: OutboundMessage) -> Result<(), Error> {
        self.inner
            .send(message.into_sendable())
            .map(|_| ())
            .map_err(Error::from)
    }
}
