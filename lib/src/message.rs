//! Email and attachment descriptions handed to the rich send path.
use bytes::Bytes;

/// A single file attached to an outgoing email.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attachment {
    /// Caller-side name for this attachment. The form field on the wire is
    /// always `attachment`.
    pub name: String,
    pub file_name: String,
    pub file: Bytes,
    /// Optional MIME type. Left out of the request if absent, empty, or not
    /// a valid media type.
    pub content_type: Option<String>,
}

impl Attachment {
    pub fn new(
        name: impl Into<String>,
        file_name: impl Into<String>,
        file: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            file: file.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size(&self) -> usize {
        self.file.len()
    }
}

/// An email for the rich (multipart) send path.
///
/// `from` can be a raw address or `"Justin Sider <justin@example.com>"`.
/// Nothing here is validated: the rich path trusts its caller.
///
/// Sending to several direct recipients lets each of them see the others'
/// addresses. Prefer one email per recipient, or `bcc`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub subject: Option<String>,
    pub text: Option<String>,
    pub html: Option<String>,
    pub reply_to: Option<String>,
    pub additional_recipients: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub attachments: Vec<Attachment>,
}

impl Message {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    pub fn additional_recipients(
        mut self,
        addresses: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.additional_recipients
            .extend(addresses.into_iter().map(Into::into));
        self
    }

    pub fn cc(mut self, addresses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.cc.extend(addresses.into_iter().map(Into::into));
        self
    }

    pub fn bcc(mut self, addresses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.bcc.extend(addresses.into_iter().map(Into::into));
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}
