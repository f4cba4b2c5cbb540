//! Thin client for sending transactional email through the Mailgun
//! messages API.
//!
//! ```no_run
//! # async fn run() -> Result<(), mailgun_sender::Error> {
//! use mailgun_sender::{EmailSender, Message, Region};
//!
//! let sender = EmailSender::new("key-...", "mg.example.com", "info@example.com", Region::Us)?;
//!
//! let resp = sender.send_simple(Some("Hi"), Some("Body"), "user@example.com").await?;
//! if !resp.is_success() {
//!     log::warn!("Mailgun said no: {:?}", resp.error_message());
//! }
//!
//! let msg = Message::new("Support <support@example.com>", "user@example.com")
//!     .subject("Welcome")
//!     .text("Thanks for joining.")
//!     .html("<p>Thanks for joining.</p>");
//! sender.send(&msg).await?;
//! # Ok(())
//! # }
//! ```
pub mod api;
pub mod config;
pub mod error;
pub mod message;
pub mod request;
pub mod sender;
pub mod transport;

pub use api::{Response, SendResult};
pub use crate::config::{load_settings, Config, Region, Settings};
pub use error::Error;
pub use message::{Attachment, Message};
pub use request::{Body, Part, Request};
pub use sender::{EmailSender, Mailer};
pub use transport::{ReqwestTransport, Transport};

pub type Result<T> = std::result::Result<T, Error>;
