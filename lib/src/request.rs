//! Maps emails onto Mailgun's `messages` wire format.
//!
//! Everything here is pure: building a `Request` never touches the network.
//! The resulting request is executed by a `transport::Transport`.
use bytes::Bytes;

use crate::config::Config;
use crate::error::Error;
use crate::message::Message;

// Mailgun form field names
pub const FROM: &str = "from";
pub const TO: &str = "to";
pub const CC: &str = "cc";
pub const BCC: &str = "bcc";
pub const SUBJECT: &str = "subject";
pub const TEXT: &str = "text";
pub const HTML: &str = "html";
pub const REPLY_TO: &str = "h:Reply-To";
pub const ATTACHMENT: &str = "attachment";

/// A request against the message endpoint, ready for a transport.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    /// Path relative to the region's base URL, e.g. `v3/mg.example.com/messages`
    pub endpoint: String,
    pub body: Body,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// `application/x-www-form-urlencoded` fields, in order
    Form(Vec<(&'static str, String)>),
    /// `multipart/form-data` parts, in order
    Multipart(Vec<Part>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Part {
    Text {
        name: &'static str,
        value: String,
    },
    /// Binary part sent under the `attachment` field
    File {
        file_name: String,
        data: Bytes,
        content_type: Option<mime::Mime>,
    },
}

impl Part {
    fn text(name: &'static str, value: impl Into<String>) -> Self {
        Part::Text {
            name,
            value: value.into(),
        }
    }

    /// Form field name of this part
    pub fn name(&self) -> &'static str {
        match *self {
            Part::Text { name, .. } => name,
            Part::File { .. } => ATTACHMENT,
        }
    }
}

impl Body {
    /// All text fields as `(name, value)` pairs, in wire order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            Body::Form(fields) => fields.iter().map(|(k, v)| (*k, v.as_str())).collect(),
            Body::Multipart(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    Part::Text { name, value } => Some((*name, value.as_str())),
                    Part::File { .. } => None,
                })
                .collect(),
        }
    }

    /// Values of every text field named `name`, in wire order.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.fields()
            .into_iter()
            .filter(|(k, _)| *k == name)
            .map(|(_, v)| v)
            .collect()
    }
}

/// Recipient check for the simple send path.
pub fn validate_recipient(to: &str) -> Result<(), Error> {
    if to.trim().is_empty() || !to.contains('@') {
        return Err(Error::invalid_argument(
            "to",
            "is empty or invalid, only send email to valid addresses",
        ));
    }

    Ok(())
}

/// Builds a plain-text email to a single recipient, sent from the
/// configured default sender.
pub fn simple(
    config: &Config,
    subject: Option<&str>,
    text: Option<&str>,
    to: &str,
) -> Result<Request, Error> {
    validate_recipient(to)?;

    let fields = vec![
        (FROM, config.default_from().to_string()),
        (TO, to.to_string()),
        (SUBJECT, subject.unwrap_or_default().to_string()),
        (TEXT, text.unwrap_or_default().to_string()),
    ];

    Ok(Request {
        endpoint: config.endpoint(),
        body: Body::Form(fields),
    })
}

/// Builds the multipart body for a rich email.
///
/// Part order: `from`, `to`, `subject`, `text`, then `html` and `h:Reply-To`
/// when non-empty, then the additional `to`, `cc` and `bcc` lists, then the
/// attachments.
///
/// The additional `to`, `cc` and `bcc` lists are emitted last entry first.
/// Deployed consumers of this wire format expect that order, so it is kept.
/// Attachments go out in list order.
pub fn rich(config: &Config, message: &Message) -> Request {
    let mut parts = vec![
        Part::text(FROM, message.from.as_str()),
        Part::text(TO, message.to.as_str()),
        Part::text(SUBJECT, message.subject.as_deref().unwrap_or_default()),
        Part::text(TEXT, message.text.as_deref().unwrap_or_default()),
    ];

    if let Some(html) = non_empty(&message.html) {
        parts.push(Part::text(HTML, html));
    }

    if let Some(reply_to) = non_empty(&message.reply_to) {
        parts.push(Part::text(REPLY_TO, reply_to));
    }

    let recipients = [
        (TO, &message.additional_recipients),
        (CC, &message.cc),
        (BCC, &message.bcc),
    ];

    for (name, addresses) in recipients {
        parts.extend(addresses.iter().rev().map(|a| Part::text(name, a.as_str())));
    }

    for attachment in &message.attachments {
        parts.push(Part::File {
            file_name: attachment.file_name.clone(),
            data: attachment.file.clone(),
            content_type: parse_content_type(attachment.content_type.as_deref()),
        });
    }

    Request {
        endpoint: config.endpoint(),
        body: Body::Multipart(parts),
    }
}

#[inline]
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// An unparsable content type is dropped rather than failing the send.
fn parse_content_type(content_type: Option<&str>) -> Option<mime::Mime> {
    let content_type = content_type.filter(|c| !c.is_empty())?;

    match content_type.parse::<mime::Mime>() {
        Ok(m) => Some(m),
        Err(e) => {
            log::debug!("Ignoring attachment content type \"{}\": {}", content_type, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Region;
    use crate::message::Attachment;

    fn config() -> Config {
        Config::new("key-123", "mg.example.com", "info@example.com", Region::Us).unwrap()
    }

    #[test]
    fn test_validate_recipient() {
        for to in &["", " ", "notanemail"] {
            let err = validate_recipient(to).unwrap_err();
            assert_eq!(err.param(), Some("to"));
        }

        assert!(validate_recipient("a@b.com").is_ok());
    }

    #[test]
    fn test_simple() {
        let req = simple(&config(), Some("Hi"), Some("Body"), "a@b.com").unwrap();

        assert_eq!(req.endpoint, "v3/mg.example.com/messages");
        assert_eq!(
            req.body,
            Body::Form(vec![
                ("from", "info@example.com".to_string()),
                ("to", "a@b.com".to_string()),
                ("subject", "Hi".to_string()),
                ("text", "Body".to_string()),
            ])
        );
    }

    #[test]
    fn test_simple_missing_subject_and_text() {
        let req = simple(&config(), None, None, "a@b.com").unwrap();

        assert_eq!(req.body.values(SUBJECT), vec![""]);
        assert_eq!(req.body.values(TEXT), vec![""]);
    }

    #[test]
    fn test_simple_invalid_recipient() {
        let err = simple(&config(), Some("Hi"), Some("Body"), "nobody").unwrap_err();
        assert_eq!(err.param(), Some("to"));
    }

    #[test]
    fn test_rich_minimal() {
        let req = rich(&config(), &Message::new("me@example.com", "you@example.com"));

        assert_eq!(
            req.body.fields(),
            vec![
                ("from", "me@example.com"),
                ("to", "you@example.com"),
                ("subject", ""),
                ("text", ""),
            ]
        );
    }

    #[test]
    fn test_rich_part_order() {
        let msg = Message::new("Me <me@example.com>", "you@example.com")
            .subject("S")
            .text("T")
            .html("<p>T</p>")
            .reply_to("reply@example.com")
            .additional_recipients(vec!["x@a.com", "y@a.com"])
            .cc(vec!["c1@a.com", "c2@a.com", "c3@a.com"])
            .bcc(vec!["b1@a.com"]);

        let req = rich(&config(), &msg);

        assert_eq!(
            req.body.fields(),
            vec![
                ("from", "Me <me@example.com>"),
                ("to", "you@example.com"),
                ("subject", "S"),
                ("text", "T"),
                ("html", "<p>T</p>"),
                ("h:Reply-To", "reply@example.com"),
                ("to", "y@a.com"),
                ("to", "x@a.com"),
                ("cc", "c3@a.com"),
                ("cc", "c2@a.com"),
                ("cc", "c1@a.com"),
                ("bcc", "b1@a.com"),
            ]
        );
    }

    #[test]
    fn test_rich_skips_empty_html_and_reply_to() {
        let msg = Message::new("me@example.com", "you@example.com")
            .html("")
            .reply_to("");

        let req = rich(&config(), &msg);

        assert!(req.body.values(HTML).is_empty());
        assert!(req.body.values(REPLY_TO).is_empty());
    }

    #[test]
    fn test_rich_does_not_validate() {
        let req = rich(&config(), &Message::new("", ""));
        assert_eq!(req.body.values(TO), vec![""]);
    }

    #[test]
    fn test_rich_attachments() {
        let msg = Message::new("me@example.com", "you@example.com")
            .cc(vec!["c@a.com"])
            .attachment(Attachment::new("a", "a.txt", &b"first"[..]).with_content_type("text/plain"))
            .attachment(
                Attachment::new("b", "b.bin", &b"second"[..])
                    .with_content_type("not/a/type/at/all???"),
            )
            .attachment(Attachment::new("c", "c.bin", &b"third"[..]).with_content_type(""));

        let req = rich(&config(), &msg);
        let parts = match req.body {
            Body::Multipart(parts) => parts,
            Body::Form(_) => panic!("expected multipart body"),
        };

        // Attachments come last, in list order
        let files: Vec<_> = parts[5..].iter().collect();
        assert_eq!(parts[4].name(), CC);
        assert_eq!(files.len(), 3);

        match files[0] {
            Part::File {
                file_name,
                data,
                content_type,
            } => {
                assert_eq!(file_name, "a.txt");
                assert_eq!(&data[..], b"first");
                assert_eq!(content_type.as_ref(), Some(&mime::TEXT_PLAIN));
            }
            _ => panic!("expected file part"),
        }

        match files[1] {
            Part::File {
                file_name,
                content_type,
                ..
            } => {
                assert_eq!(file_name, "b.bin");
                assert_eq!(*content_type, None);
            }
            _ => panic!("expected file part"),
        }

        match files[2] {
            Part::File { content_type, .. } => assert_eq!(*content_type, None),
            _ => panic!("expected file part"),
        }

        assert!(files.iter().all(|p| p.name() == ATTACHMENT));
    }
}
