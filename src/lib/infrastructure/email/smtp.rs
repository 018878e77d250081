//! SMTP mailer implementation

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use clap::{ArgAction, Parser};
use lettre::{
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
        Error as SmtpError,
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::emails::{
    DefaultSender, EmailAddress, EmailAddressError, Mailer, MailerError,
};

/// Reply codes sent while the session is being set up rather than for a message
const SESSION_CODES: [&str; 6] = ["421", "454", "530", "534", "535", "538"];

/// Extensions whose absence makes lettre refuse a particular message rather than the session
const MESSAGE_EXTENSIONS: [&str; 2] = ["SMTPUTF8", "8BITMIME"];

/// SMTP configuration
#[derive(Clone, Debug, Parser)]
pub struct SmtpConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub host: String,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value_t = 587)]
    pub port: u16,

    /// The SMTP username
    #[clap(long = "smtp-username", env = "SMTP_USERNAME")]
    pub username: String,

    /// The SMTP password
    #[clap(long = "smtp-password", env = "SMTP_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Upgrade the session with STARTTLS before authenticating
    #[clap(long = "smtp-use-tls", env = "SMTP_USE_TLS", default_value_t = true, action = ArgAction::Set)]
    pub use_tls: bool,

    /// Verify the relay's TLS certificate
    #[clap(long = "smtp-verify-tls", env = "SMTP_VERIFY_TLS", default_value_t = true, action = ArgAction::Set)]
    pub verify_tls: bool,
}

/// Sender identity used when a request does not name one
#[derive(Clone, Debug, Parser)]
pub struct SenderConfig {
    /// The default sender address
    #[clap(long = "default-from-email", env = "DEFAULT_FROM_EMAIL")]
    pub email: String,

    /// The default sender display name
    #[clap(long = "default-from-name", env = "DEFAULT_FROM_NAME", default_value = "Email Service")]
    pub name: String,
}

impl TryFrom<SenderConfig> for DefaultSender {
    type Error = EmailAddressError;

    fn try_from(config: SenderConfig) -> Result<Self, Self::Error> {
        Ok(DefaultSender {
            email: EmailAddress::new(&config.email)?,
            name: config.name,
        })
    }
}

/// Mailer that opens a fresh session with the relay for every call
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    port: u16,
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Create a new SMTP mailer
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let tls = if config.use_tls {
            Tls::Required(
                TlsParameters::builder(config.host.clone())
                    .dangerous_accept_invalid_certs(!config.verify_tls)
                    .build()?,
            )
        } else {
            Tls::None
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .tls(tls)
            .build();

        Ok(Self {
            transport,
            host: config.host.clone(),
            port: config.port,
        })
    }
}

fn is_session_code(code: &str) -> bool {
    SESSION_CODES.contains(&code)
}

/// lettre raises client errors while setting up the session (missing STARTTLS, no usable
/// AUTH mechanism) and, once connected, when the message needs an extension the relay lacks.
fn is_message_client_error(reason: &str) -> bool {
    MESSAGE_EXTENSIONS
        .iter()
        .any(|extension| reason.contains(extension))
}

/// Failures before the relay saw the message are connection failures,
/// everything the relay said about the message itself is a send failure.
fn classify(err: SmtpError) -> MailerError {
    let reason = err.to_string();

    if err.is_client() {
        return if is_message_client_error(&reason) {
            MailerError::Send(reason)
        } else {
            MailerError::Connection(reason)
        };
    }

    match err.status() {
        Some(code) if is_session_code(&code.to_string()) => MailerError::Connection(reason),
        Some(_) => MailerError::Send(reason),
        None => MailerError::Connection(reason),
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &Message) -> Result<Uuid, MailerError> {
        debug!(host = %self.host, port = self.port, "opening SMTP session");

        self.transport
            .send(message.clone())
            .await
            .map_err(classify)?;

        Ok(Uuid::now_v7())
    }

    async fn test_connection(&self) -> Result<(), MailerError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailerError::Connection(format!(
                "{}:{} did not accept the session",
                self.host, self.port
            ))),
            Err(err) => Err(MailerError::Connection(err.to_string())),
        }
    }
}
