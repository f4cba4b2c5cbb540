use std::future::Future;
use std::pin::Pin;

use crate::api::Response;
use crate::config::{Config, Region};
use crate::error::Error;
use crate::message::Message;
use crate::request;
use crate::transport::{ReqwestTransport, Transport};

pub type MailerFuture<'a> = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send + 'a>>;

/// Sends email asynchronously.
///
/// Lets application code depend on an abstraction rather than on a
/// concrete `EmailSender`.
pub trait Mailer: Send + Sync {
    /// Plain-text email to a single recipient, from the default sender.
    fn send_simple<'a>(
        &'a self,
        subject: Option<&'a str>,
        text: Option<&'a str>,
        to: &'a str,
    ) -> MailerFuture<'a>;

    /// Full email: HTML body, reply-to, cc/bcc and attachments.
    fn send<'a>(&'a self, message: &'a Message) -> MailerFuture<'a>;
}

/// Sends email through the Mailgun messages API.
///
/// The sender owns its transport and releases it on `close` or drop. To
/// share one HTTP client across senders, inject it through
/// `with_transport` (e.g. an `Arc<ReqwestTransport>`, or a
/// `ReqwestTransport::with_client`); the other owners keep it alive.
pub struct EmailSender<T: Transport = ReqwestTransport> {
    config: Config,
    transport: Option<T>,
}

impl EmailSender<ReqwestTransport> {
    /// Validates the arguments and sets up an HTTP client authenticated with
    /// the API key. Does not touch the network.
    pub fn new(
        api_key: impl Into<String>,
        domain: impl Into<String>,
        default_from: impl Into<String>,
        region: Region,
    ) -> Result<Self, Error> {
        Self::from_config(Config::new(api_key, domain, default_from, region)?)
    }

    pub fn from_config(config: Config) -> Result<Self, Error> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> EmailSender<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            config,
            transport: Some(transport),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    /// Sends a plain-text email to `to` from the configured default sender.
    ///
    /// Missing `subject`/`text` are sent as empty strings. Fails with
    /// `Error::InvalidArgument` before any request if `to` is empty or has
    /// no `@`.
    pub async fn send_simple(
        &self,
        subject: Option<&str>,
        text: Option<&str>,
        to: &str,
    ) -> Result<Response, Error> {
        let request = request::simple(&self.config, subject, text, to)?;

        log::debug!("Sending text email to {} via {}", to, self.config.domain());

        self.execute(request).await
    }

    /// Sends a multipart email.
    ///
    /// Unlike `send_simple`, nothing is validated: the message goes out as
    /// given. See `request::rich` for the part layout.
    pub async fn send(&self, message: &Message) -> Result<Response, Error> {
        let request = request::rich(&self.config, message);

        log::debug!(
            "Sending email to {} (+{} to, {} cc, {} bcc, {} attachments) via {}",
            message.to,
            message.additional_recipients.len(),
            message.cc.len(),
            message.bcc.len(),
            message.attachments.len(),
            self.config.domain()
        );

        self.execute(request).await
    }

    /// Releases the transport. Calling this again is a no-op; later sends
    /// fail with `Error::Closed`.
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            log::debug!("Closed sender for {}", self.config.domain());
        }
    }

    async fn execute(&self, request: request::Request) -> Result<Response, Error> {
        let transport = self.transport.as_ref().ok_or(Error::Closed)?;

        let resp = transport.execute(request).await.map_err(|e| {
            log::error!("Failed to reach Mailgun: {}", e);
            e
        })?;

        // Provider errors are the caller's call
        if resp.is_success() {
            log::info!("Mailgun accepted email ({})", resp.status);
        } else {
            log::warn!("Mailgun replied with status {}: {}", resp.status, resp.body);
        }

        Ok(resp)
    }
}

impl<T: Transport> Mailer for EmailSender<T> {
    fn send_simple<'a>(
        &'a self,
        subject: Option<&'a str>,
        text: Option<&'a str>,
        to: &'a str,
    ) -> MailerFuture<'a> {
        Box::pin(EmailSender::send_simple(self, subject, text, to))
    }

    fn send<'a>(&'a self, message: &'a Message) -> MailerFuture<'a> {
        Box::pin(EmailSender::send(self, message))
    }
}
