//! Sending emails: addresses, message composition, dispatch.

mod email_address;
mod mailer;
mod message;
mod service;

pub mod errors;

pub use email_address::{EmailAddress, EmailAddressError};
pub use mailer::{Mailer, MailerError};
pub use message::{DefaultSender, EmailContent, NewEmail, Recipients, SenderOverride};
pub use service::{EmailService, EmailServiceImpl};
