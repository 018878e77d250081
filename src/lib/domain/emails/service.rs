//! Email service: render, compose, dispatch, record

use std::sync::Arc;

use async_trait::async_trait;
use css_inline::CSSInliner;
use tracing::{error, info};
use uuid::Uuid;

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    emails::{
        errors::EmailError,
        message::{compose, Body},
        DefaultSender, EmailContent, Mailer, NewEmail,
    },
    history::{HistoryEntry, HistoryService},
    templates::{render, TemplateSource},
};

/// Email service
#[async_trait]
pub trait EmailService: Clone + Send + Sync + 'static {
    /// Sends an email and records it in the send history.
    ///
    /// # Arguments
    /// * `email` - A validated [`NewEmail`].
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] containing the send's identifier once the relay accepted
    /// the message, or an [`Err`] containing an [`EmailError`] describing which step failed.
    /// A failure to write the history record does not turn a successful send into an error.
    async fn send(&self, email: &NewEmail) -> Result<Uuid, EmailError>;

    /// Whether the relay can be reached and accepts our credentials.
    async fn check_connection(&self) -> bool;
}

#[cfg(test)]
mock! {
    pub EmailService {}

    impl Clone for EmailService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl EmailService for EmailService {
        async fn send(&self, email: &NewEmail) -> Result<Uuid, EmailError>;
        async fn check_connection(&self) -> bool;
    }
}

/// Email service implementation
#[derive(Debug, Clone)]
pub struct EmailServiceImpl<M, S, H>
where
    M: Mailer,
    S: TemplateSource,
    H: HistoryService,
{
    mailer: Arc<M>,
    templates: Arc<S>,
    history: Arc<H>,
    sender: DefaultSender,
}

impl<M, S, H> EmailServiceImpl<M, S, H>
where
    M: Mailer,
    S: TemplateSource,
    H: HistoryService,
{
    /// Creates a new email service.
    pub fn new(mailer: Arc<M>, templates: Arc<S>, history: Arc<H>, sender: DefaultSender) -> Self {
        Self {
            mailer,
            templates,
            history,
            sender,
        }
    }

    /// Produce the body to attach and the history entry describing it
    async fn prepare(&self, email: &NewEmail) -> Result<(Body, HistoryEntry), EmailError> {
        let to = email
            .recipients
            .to()
            .iter()
            .map(|address| address.to_string())
            .collect();

        let entry = HistoryEntry::new(to, &email.subject);

        match &email.content {
            EmailContent::Plain { body } => Ok((Body::Plain(body.clone()), entry)),

            EmailContent::SimpleHtml { body } => Ok((Body::Html(body.clone()), entry)),

            EmailContent::Html {
                html,
                text,
                variables,
            } => {
                let html = match variables {
                    Some(variables) => render("html_body", html, variables)?,
                    None => html.clone(),
                };

                let entry = entry
                    .with_variables(variables.clone())
                    .with_html_body(&html);

                let body = match text {
                    Some(plain) => Body::Alternative {
                        plain: plain.clone(),
                        html,
                    },
                    None => Body::Html(html),
                };

                Ok((body, entry))
            }

            EmailContent::Template { name, data } => {
                let source = self.templates.resolve(name).await?;
                let rendered = render(name, &source, data)?;

                let html = CSSInliner::options()
                    .load_remote_stylesheets(false)
                    .build()
                    .inline(&rendered)
                    .map_err(|err| EmailError::TemplateRender {
                        name: name.clone(),
                        reason: err.to_string(),
                    })?;

                let entry = entry
                    .with_template_name(name)
                    .with_variables(Some(data.clone()))
                    .with_html_body(&html);

                Ok((Body::Html(html), entry))
            }
        }
    }
}

#[async_trait]
impl<M, S, H> EmailService for EmailServiceImpl<M, S, H>
where
    M: Mailer,
    S: TemplateSource,
    H: HistoryService,
{
    async fn send(&self, email: &NewEmail) -> Result<Uuid, EmailError> {
        info!(to = ?email.recipients.to(), subject = %email.subject, "sending email");

        let (body, entry) = self.prepare(email).await?;
        let message = compose(email, body, &self.sender)?;

        let id = self.mailer.send(&message).await.map_err(|err| {
            error!("failed to send email: {err}");
            EmailError::from(err)
        })?;

        info!(%id, "email sent successfully");

        self.history.record(entry.with_id(id)).await;

        Ok(id)
    }

    async fn check_connection(&self) -> bool {
        match self.mailer.test_connection().await {
            Ok(()) => true,
            Err(err) => {
                error!("SMTP health check failed: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use testresult::TestResult;

    use crate::domain::{
        emails::{
            tests::MockMailer, EmailAddress, MailerError, Recipients, SenderOverride,
        },
        history::tests::MockHistoryService,
        templates::{errors::TemplateSourceError, tests::MockTemplateSource, TemplateData},
    };

    use super::*;

    fn sender() -> DefaultSender {
        DefaultSender {
            email: EmailAddress::new_unchecked("noreply@example.com"),
            name: "Email Service".to_string(),
        }
    }

    fn email(content: EmailContent) -> NewEmail {
        NewEmail {
            recipients: Recipients::new(
                vec![EmailAddress::new_unchecked("a@x.com")],
                vec![],
                vec![EmailAddress::new_unchecked("hidden@x.com")],
            )
            .expect("valid recipients"),
            subject: "Hi".to_string(),
            sender: SenderOverride::default(),
            content,
        }
    }

    fn plain() -> NewEmail {
        email(EmailContent::Plain {
            body: "hello".to_string(),
        })
    }

    fn data(value: serde_json::Value) -> TemplateData {
        value.as_object().cloned().unwrap_or_default()
    }

    fn service(
        mailer: MockMailer,
        templates: MockTemplateSource,
        history: MockHistoryService,
    ) -> EmailServiceImpl<MockMailer, MockTemplateSource, MockHistoryService> {
        EmailServiceImpl::new(
            Arc::new(mailer),
            Arc::new(templates),
            Arc::new(history),
            sender(),
        )
    }

    #[tokio::test]
    async fn test_send_plain_email_records_history() -> TestResult {
        let email_id = Uuid::now_v7();

        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .times(1)
            .withf(|message| message.envelope().to().len() == 2)
            .returning(move |_| Ok(email_id));

        let mut history = MockHistoryService::new();

        history
            .expect_record()
            .times(1)
            .withf(move |entry| {
                entry.id == Some(email_id)
                    && entry.to == vec!["a@x.com".to_string()]
                    && entry.subject == "Hi"
                    && entry.html_body.is_none()
            })
            .returning(move |_| email_id);

        let service = service(mailer, MockTemplateSource::new(), history);

        assert_eq!(service.send(&plain()).await?, email_id);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_connection_failure_is_not_recorded() {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(MailerError::Connection("connection refused".to_string())));

        let mut history = MockHistoryService::new();

        history.expect_record().times(0);

        let service = service(mailer, MockTemplateSource::new(), history);

        let result = service.send(&plain()).await;

        assert!(matches!(result, Err(EmailError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn test_send_rejected_message_is_send_failure() {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(MailerError::Send("550 mailbox unavailable".to_string())));

        let mut history = MockHistoryService::new();

        history.expect_record().times(0);

        let service = service(mailer, MockTemplateSource::new(), history);

        let result = service.send(&plain()).await;

        assert!(matches!(result, Err(EmailError::SendFailed(_))));
    }

    #[tokio::test]
    async fn test_send_simple_html_records_envelope_only() -> TestResult {
        let email_id = Uuid::now_v7();

        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .times(1)
            .withf(|message| String::from_utf8_lossy(&message.formatted()).contains("text/html"))
            .returning(move |_| Ok(email_id));

        let mut history = MockHistoryService::new();

        history
            .expect_record()
            .times(1)
            .withf(|entry| {
                entry.html_body.is_none()
                    && entry.template_variables.is_none()
                    && entry.template_name.is_none()
            })
            .returning(move |_| email_id);

        let service = service(mailer, MockTemplateSource::new(), history);

        let id = service
            .send(&email(EmailContent::SimpleHtml {
                body: "<b>hi</b>".to_string(),
            }))
            .await?;

        assert_eq!(id, email_id);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_html_with_variables_renders_body() -> TestResult {
        let email_id = Uuid::now_v7();

        let mut mailer = MockMailer::new();

        mailer.expect_send().times(1).returning(move |_| Ok(email_id));

        let mut history = MockHistoryService::new();

        history
            .expect_record()
            .times(1)
            .withf(|entry| {
                entry.html_body.as_deref() == Some("<p>Hello Ada</p>")
                    && entry.template_variables.is_some()
            })
            .returning(move |_| email_id);

        let service = service(mailer, MockTemplateSource::new(), history);

        let id = service
            .send(&email(EmailContent::Html {
                html: "<p>Hello {{ name }}</p>".to_string(),
                text: Some("Hello Ada".to_string()),
                variables: Some(data(json!({ "name": "Ada" }))),
            }))
            .await?;

        assert_eq!(id, email_id);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_template_email() -> TestResult {
        let email_id = Uuid::now_v7();

        let mut templates = MockTemplateSource::new();

        templates
            .expect_resolve()
            .times(1)
            .withf(|name| name == "welcome")
            .returning(|_| Ok("<p>Welcome {{ name }}</p>".to_string()));

        let mut mailer = MockMailer::new();

        mailer.expect_send().times(1).returning(move |_| Ok(email_id));

        let mut history = MockHistoryService::new();

        history
            .expect_record()
            .times(1)
            .withf(|entry| {
                entry.template_name.as_deref() == Some("welcome")
                    && entry
                        .html_body
                        .as_deref()
                        .is_some_and(|html| html.contains("Welcome Ada"))
            })
            .returning(move |_| email_id);

        let service = service(mailer, templates, history);

        let id = service
            .send(&email(EmailContent::Template {
                name: "welcome".to_string(),
                data: data(json!({ "name": "Ada" })),
            }))
            .await?;

        assert_eq!(id, email_id);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_missing_template_is_not_found() {
        let mut templates = MockTemplateSource::new();

        templates
            .expect_resolve()
            .times(1)
            .returning(|name| Err(TemplateSourceError::NotFound(name.to_string())));

        let mut mailer = MockMailer::new();

        mailer.expect_send().times(0);

        let service = service(mailer, templates, MockHistoryService::new());

        let result = service
            .send(&email(EmailContent::Template {
                name: "missing".to_string(),
                data: TemplateData::new(),
            }))
            .await;

        assert!(matches!(result, Err(EmailError::TemplateNotFound(name)) if name == "missing"));
    }

    #[tokio::test]
    async fn test_send_broken_template_is_render_error() {
        let mut templates = MockTemplateSource::new();

        templates
            .expect_resolve()
            .returning(|_| Ok("{% for %}".to_string()));

        let mut mailer = MockMailer::new();

        mailer.expect_send().times(0);

        let service = service(mailer, templates, MockHistoryService::new());

        let result = service
            .send(&email(EmailContent::Template {
                name: "broken".to_string(),
                data: TemplateData::new(),
            }))
            .await;

        assert!(matches!(result, Err(EmailError::TemplateRender { .. })));
    }

    #[tokio::test]
    async fn test_check_connection() {
        let mut healthy = MockMailer::new();
        healthy.expect_test_connection().returning(|| Ok(()));

        let mut unhealthy = MockMailer::new();
        unhealthy
            .expect_test_connection()
            .returning(|| Err(MailerError::Connection("timed out".to_string())));

        assert!(
            service(healthy, MockTemplateSource::new(), MockHistoryService::new())
                .check_connection()
                .await
        );
        assert!(
            !service(unhealthy, MockTemplateSource::new(), MockHistoryService::new())
                .check_connection()
                .await
        );
    }
}
