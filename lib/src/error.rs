use std::error;
use std::fmt;

/// All possible Mailgun sender errors.
///
/// Provider-side failures (non-2xx replies) are not represented here: those
/// come back to the caller as a regular `api::Response`.
#[derive(Debug)]
pub enum Error {
    /// A required argument was missing or malformed. Raised before any I/O.
    InvalidArgument { param: &'static str, reason: String },
    /// Network-level failure reported by the HTTP client, kept as-is.
    Transport(Box<dyn error::Error + Send + Sync>),
    Config(String),
    Json(String),
    /// The sender was closed before this call.
    Closed,
}

impl Error {
    pub(crate) fn invalid_argument(param: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            param,
            reason: reason.into(),
        }
    }

    /// Name of the offending parameter, if this is an argument error.
    pub fn param(&self) -> Option<&'static str> {
        match *self {
            Error::InvalidArgument { param, .. } => Some(param),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidArgument { param, ref reason } => {
                write!(f, "InvalidArgument: `{}` {}", param, reason)
            }
            Error::Transport(ref e) => write!(f, "Transport: {}", e),
            Error::Config(ref msg) => write!(f, "Config: {}", msg),
            Error::Json(ref msg) => write!(f, "Json: {}", msg),
            Error::Closed => f.write_str("Closed"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Transport(ref e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::error::Error> for Error {
    fn from(err: serde_json::error::Error) -> Self {
        Self::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_names_param() {
        let err = Error::invalid_argument("domain", "must contain a '.'");

        assert_eq!(err.param(), Some("domain"));
        assert_eq!(err.to_string(), "InvalidArgument: `domain` must contain a '.'");
    }

    #[test]
    fn test_transport_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::Transport(Box::new(io));

        let source = error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<std::io::Error>().is_some());
        assert_eq!(err.param(), None);
    }
}
