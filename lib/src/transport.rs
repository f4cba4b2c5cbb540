use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use base64::Engine;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::multipart;
use url::Url;

use crate::api::Response;
use crate::config::Config;
use crate::error::Error;
use crate::request::{Body, Part, Request, ATTACHMENT};

// Definition of future types for async use
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, Error>> + Send + 'a>>;

/// Executes a built request against the Mailgun API.
///
/// Implementations report network-level failures as `Error::Transport` and
/// hand back every HTTP reply, whatever its status, as a `Response`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: Request) -> TransportFuture<'_, Response>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: Request) -> TransportFuture<'_, Response> {
        (**self).execute(request)
    }
}

/// `Basic base64("api:<api_key>")`, marked sensitive so it stays out of
/// reqwest's debug output.
pub fn basic_auth_header(api_key: &str) -> Result<HeaderValue, Error> {
    let credentials = base64::engine::general_purpose::STANDARD.encode(format!("api:{}", api_key));

    let mut value = HeaderValue::from_str(&format!("Basic {}", credentials))
        .map_err(|e| Error::invalid_argument("api_key", e.to_string()))?;
    value.set_sensitive(true);

    Ok(value)
}

/// `reqwest`-backed transport.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    auth: HeaderValue,
}

impl ReqwestTransport {
    /// Builds a dedicated HTTP client for this transport. No network
    /// activity happens here.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Self::with_client(builder.build()?, config)
    }

    /// Uses a caller-provided client. The caller keeps its own handle, so
    /// dropping this transport does not tear the client down.
    pub fn with_client(client: reqwest::Client, config: &Config) -> Result<Self, Error> {
        Ok(Self {
            client,
            base_url: Url::parse(config.base_url())?,
            auth: basic_auth_header(config.api_key())?,
        })
    }

    /// Points requests at another base URL (e.g. a local mock server).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, Error> {
        self.base_url = Url::parse(base_url)?;
        Ok(self)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: Request) -> TransportFuture<'_, Response> {
        Box::pin(async move {
            let url = self.base_url.join(&request.endpoint)?;

            log::debug!("POST {}", url);

            let req = self
                .client
                .post(url)
                .header(AUTHORIZATION, self.auth.clone());

            let req = match request.body {
                Body::Form(fields) => req.form(&fields),
                Body::Multipart(parts) => req.multipart(build_form(parts)?),
            };

            let resp = req.send().await?;

            into_response(resp).await
        })
    }
}

fn build_form(parts: Vec<Part>) -> Result<multipart::Form, Error> {
    let mut form = multipart::Form::new();

    for part in parts {
        form = match part {
            Part::Text { name, value } => form.text(name, value),
            Part::File {
                file_name,
                data,
                content_type,
            } => {
                let len = data.len() as u64;
                let mut file = multipart::Part::stream_with_length(reqwest::Body::from(data), len)
                    .file_name(file_name);

                if let Some(mime) = content_type {
                    file = file.mime_str(mime.as_ref())?;
                }

                form.part(ATTACHMENT, file)
            }
        };
    }

    Ok(form)
}

async fn into_response(resp: reqwest::Response) -> Result<Response, Error> {
    let status = resp.status().as_u16();
    let headers = resp
        .headers()
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect();

    let body = resp.text().await?;

    Ok(Response {
        status,
        headers,
        body,
    })
}
