//! Email requests and MIME message composition

use lettre::{
    message::{header::ContentType, Mailbox, MultiPart},
    Address, Message,
};

use crate::domain::{
    emails::{errors::EmailError, EmailAddress},
    templates::TemplateData,
};

/// The recipients of an email. `to` is never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recipients {
    to: Vec<EmailAddress>,
    cc: Vec<EmailAddress>,
    bcc: Vec<EmailAddress>,
}

impl Recipients {
    /// Create a recipient set, rejecting an empty `to` list
    pub fn new(
        to: Vec<EmailAddress>,
        cc: Vec<EmailAddress>,
        bcc: Vec<EmailAddress>,
    ) -> Result<Self, EmailError> {
        if to.is_empty() {
            return Err(EmailError::InvalidInput(
                "At least one recipient is required".to_string(),
            ));
        }

        Ok(Self { to, cc, bcc })
    }

    /// Primary recipients
    pub fn to(&self) -> &[EmailAddress] {
        &self.to
    }

    /// Carbon-copy recipients
    pub fn cc(&self) -> &[EmailAddress] {
        &self.cc
    }

    /// Blind carbon-copy recipients
    pub fn bcc(&self) -> &[EmailAddress] {
        &self.bcc
    }
}

/// Caller-supplied sender identity; missing parts fall back to [`DefaultSender`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SenderOverride {
    /// Sender address
    pub email: Option<EmailAddress>,

    /// Sender display name
    pub name: Option<String>,
}

/// The configured sender identity
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultSender {
    /// Default sender address
    pub email: EmailAddress,

    /// Default sender display name
    pub name: String,
}

/// What goes into the body of an email
#[derive(Clone, Debug, PartialEq)]
pub enum EmailContent {
    /// A plain text body
    Plain {
        /// The text
        body: String,
    },

    /// An HTML body sent as given. Like a plain body, only the envelope is recorded.
    SimpleHtml {
        /// The HTML
        body: String,
    },

    /// An HTML body, optionally with a plain text alternative. When `variables`
    /// is set the HTML is rendered as a template before sending.
    Html {
        /// The HTML
        html: String,

        /// Plain text alternative
        text: Option<String>,

        /// Template variables
        variables: Option<TemplateData>,
    },

    /// A stored template rendered with `data`
    Template {
        /// Template name
        name: String,

        /// Template variables
        data: TemplateData,
    },
}

/// A validated request to send an email
#[derive(Clone, Debug, PartialEq)]
pub struct NewEmail {
    /// Who receives it
    pub recipients: Recipients,

    /// Subject line
    pub subject: String,

    /// Sender override
    pub sender: SenderOverride,

    /// Body content
    pub content: EmailContent,
}

/// A body ready to be attached to a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Body {
    Plain(String),
    Html(String),
    Alternative { plain: String, html: String },
}

fn mailbox(name: Option<String>, email: &EmailAddress) -> Result<Mailbox, EmailError> {
    let address: Address = email.as_str().parse()?;

    Ok(Mailbox::new(name, address))
}

/// Build the MIME message for `email` with the given rendered `body`.
///
/// Bcc recipients end up in the envelope only; lettre strips the header when formatting.
pub(crate) fn compose(
    email: &NewEmail,
    body: Body,
    defaults: &DefaultSender,
) -> Result<Message, EmailError> {
    let from_email = email.sender.email.as_ref().unwrap_or(&defaults.email);
    let from_name = email
        .sender
        .name
        .clone()
        .unwrap_or_else(|| defaults.name.clone());

    let mut builder = Message::builder()
        .from(mailbox(Some(from_name), from_email)?)
        .subject(email.subject.clone());

    for to in email.recipients.to() {
        builder = builder.to(mailbox(None, to)?);
    }

    for cc in email.recipients.cc() {
        builder = builder.cc(mailbox(None, cc)?);
    }

    for bcc in email.recipients.bcc() {
        builder = builder.bcc(mailbox(None, bcc)?);
    }

    let message = match body {
        Body::Plain(text) => builder.header(ContentType::TEXT_PLAIN).body(text)?,
        Body::Html(html) => builder.header(ContentType::TEXT_HTML).body(html)?,
        Body::Alternative { plain, html } => {
            builder.multipart(MultiPart::alternative_plain_html(plain, html))?
        }
    };

    Ok(message)
}
