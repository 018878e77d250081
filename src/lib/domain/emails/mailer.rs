//! Mailer port

use async_trait::async_trait;
use lettre::Message;
use thiserror::Error;
use uuid::Uuid;

#[cfg(test)]
use mockall::mock;

/// Mailer errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MailerError {
    /// Opening the session, upgrading it to TLS or authenticating failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// The relay refused the message once the session was established
    #[error("send failed: {0}")]
    Send(String),
}

/// Transmits composed messages to a relay
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send a message to every recipient of its envelope (To, Cc and Bcc).
    ///
    /// # Arguments
    /// * `message` - The composed [`Message`].
    ///
    /// # Returns
    /// A freshly generated identifier for the send, unrelated to the message itself.
    async fn send(&self, message: &Message) -> Result<Uuid, MailerError>;

    /// Open a session, authenticate and close it again without sending anything.
    async fn test_connection(&self) -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send(&self, message: &Message) -> Result<Uuid, MailerError>;
        async fn test_connection(&self) -> Result<(), MailerError>;
    }
}
