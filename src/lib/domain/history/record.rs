//! History record model

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::templates::TemplateData;

/// How many characters of the HTML body are kept as a preview
pub const PREVIEW_LENGTH: usize = 500;

/// Outcome of a send attempt
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SendStatus {
    /// The relay accepted the message
    #[default]
    Sent,
}

impl SendStatus {
    /// Status as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            SendStatus::Sent => "sent",
        }
    }
}

impl fmt::Display for SendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the caller knows about a send when recording it
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryEntry {
    /// Identifier to record under; generated when absent
    pub id: Option<Uuid>,

    /// Primary recipients
    pub to: Vec<String>,

    /// Subject line
    pub subject: String,

    /// Outcome
    pub status: SendStatus,

    /// Template used, if any
    pub template_name: Option<String>,

    /// Template variables, if any
    pub template_variables: Option<TemplateData>,

    /// Recipient count; defaults to the length of `to`
    pub recipients_count: Option<usize>,

    /// HTML body that was sent
    pub html_body: Option<String>,
}

impl HistoryEntry {
    /// Create an entry for a send to `to` with `subject`
    pub fn new(to: Vec<String>, subject: &str) -> Self {
        Self {
            to,
            subject: subject.to_string(),
            ..Default::default()
        }
    }

    /// Record under an existing identifier
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Attach the template name
    pub fn with_template_name(mut self, name: &str) -> Self {
        self.template_name = Some(name.to_string());
        self
    }

    /// Attach template variables
    pub fn with_variables(mut self, variables: Option<TemplateData>) -> Self {
        self.template_variables = variables;
        self
    }

    /// Attach the HTML body
    pub fn with_html_body(mut self, html: &str) -> Self {
        self.html_body = Some(html.to_string());
        self
    }
}

/// A recorded send attempt. Never modified once written.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRecord {
    /// Identifier returned to the caller of the send
    pub id: Uuid,

    /// Primary recipients
    pub to: Vec<String>,

    /// Number of recipients
    pub recipients_count: usize,

    /// Subject line
    pub subject: String,

    /// When the send was recorded, in UTC
    pub timestamp: DateTime<Utc>,

    /// Outcome
    pub status: String,

    /// Template used, if any
    pub template_name: Option<String>,

    /// Template variables; empty when none were supplied
    pub template_variables: TemplateData,

    /// First [`PREVIEW_LENGTH`] characters of the HTML body
    pub html_body_preview: Option<String>,

    /// Full HTML body
    pub html_body_full: Option<String>,
}

impl HistoryRecord {
    /// Build the record for `entry`, filling in the identifier and timestamp
    pub fn from_entry(entry: HistoryEntry, id: Uuid, timestamp: DateTime<Utc>) -> Self {
        let recipients_count = entry.recipients_count.unwrap_or(entry.to.len());

        Self {
            id,
            to: entry.to,
            recipients_count,
            subject: entry.subject,
            timestamp,
            status: entry.status.to_string(),
            template_name: entry.template_name,
            template_variables: entry.template_variables.unwrap_or_default(),
            html_body_preview: entry.html_body.as_deref().map(preview),
            html_body_full: entry.html_body,
        }
    }
}

fn preview(html: &str) -> String {
    html.chars().take(PREVIEW_LENGTH).collect()
}
