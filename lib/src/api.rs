//! Response types shared between the transport and callers.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Raw reply from the Mailgun API.
///
/// A non-2xx status is still a successful call from the sender's point of
/// view: the caller decides what to do with it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// Headers in the order they were received
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body of a failed reply, if any
    pub fn error_message(&self) -> Option<&str> {
        if self.is_success() || self.body.is_empty() {
            None
        } else {
            Some(&self.body)
        }
    }

    /// First header named `name`, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.body).map_err(|e| e.into())
    }

    /// Parses Mailgun's `{"id": ..., "message": ...}` reply
    pub fn send_result(&self) -> Result<SendResult, Error> {
        self.json()
    }
}

/// JSON body Mailgun returns for a message send.
///
/// `id` is only present when the message was queued.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    pub id: Option<String>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_reply() {
        let resp = Response {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: r#"{"id":"<20240101.1@mg.example.com>","message":"Queued. Thank you."}"#
                .to_string(),
        };

        assert!(resp.is_success());
        assert_eq!(resp.error_message(), None);
        assert_eq!(resp.header("content-type"), Some("application/json"));

        let result = resp.send_result().unwrap();
        assert_eq!(result.id.as_deref(), Some("<20240101.1@mg.example.com>"));
        assert_eq!(result.message, "Queued. Thank you.");
    }

    #[test]
    fn test_failed_reply() {
        let resp = Response {
            status: 401,
            headers: vec![],
            body: "Forbidden".to_string(),
        };

        assert!(!resp.is_success());
        assert_eq!(resp.error_message(), Some("Forbidden"));

        match resp.send_result() {
            Err(Error::Json(_)) => (),
            other => panic!("expected json error, got {:?}", other),
        }
    }

    #[test]
    fn test_reply_without_id() {
        let resp = Response {
            status: 400,
            headers: vec![],
            body: r#"{"message":"'from' parameter is missing"}"#.to_string(),
        };

        let result = resp.send_result().unwrap();
        assert_eq!(result.id, None);
        assert_eq!(resp.header("x-missing"), None);
    }
}
