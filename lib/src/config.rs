use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;

pub const DEFAULT_PATH: &str = "/etc/mailgun/mailgun.toml";
const ENV_PREFIX: &str = "MAILGUN";

pub const US_BASE_URL: &str = "https://api.mailgun.net";
pub const EU_BASE_URL: &str = "https://api.eu.mailgun.net";

/// Mailgun API region. Each region has its own base URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Region {
    #[default]
    Us,
    Eu,
}

impl Region {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Us => US_BASE_URL,
            Self::Eu => EU_BASE_URL,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Us => write!(f, "US"),
            Self::Eu => write!(f, "EU"),
        }
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Self::Us),
            "eu" => Ok(Self::Eu),
            _ => Err(Error::invalid_argument(
                "region",
                format!("unknown region \"{}\" (expected US or EU)", s),
            )),
        }
    }
}

impl TryFrom<String> for Region {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Validated sender configuration.
///
/// Can only be built through `Config::new` (or `Settings::into_config`),
/// so holding one means the API key, domain and default sender passed the
/// checks in `Config::new`.
#[derive(Clone)]
pub struct Config {
    api_key: String,
    domain: String,
    default_from: String,
    region: Region,
    timeout: Option<Duration>,
}

impl Config {
    /// Validates the construction parameters, in order:
    ///
    /// 1. `api_key` must not be empty or whitespace
    /// 2. `domain` must not be empty and must contain a `.`
    /// 3. `default_from` must not be empty and must contain an `@`
    pub fn new(
        api_key: impl Into<String>,
        domain: impl Into<String>,
        default_from: impl Into<String>,
        region: Region,
    ) -> Result<Self, Error> {
        let api_key = api_key.into();
        let domain = domain.into();
        let default_from = default_from.into();

        if api_key.trim().is_empty() {
            return Err(Error::invalid_argument("api_key", "is empty"));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(Error::invalid_argument("domain", "is empty or invalid"));
        }

        if default_from.is_empty() || !default_from.contains('@') {
            return Err(Error::invalid_argument(
                "default_from",
                "is empty or not a valid email address",
            ));
        }

        Ok(Self {
            api_key,
            domain,
            default_from,
            region,
            timeout: None,
        })
    }

    /// Request timeout applied to the HTTP client this config builds.
    /// Without one, the client's default applies.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn default_from(&self) -> &str {
        &self.default_from
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn base_url(&self) -> &'static str {
        self.region.base_url()
    }

    /// Message endpoint, relative to the base URL
    #[inline]
    pub fn endpoint(&self) -> String {
        format!("v3/{}/messages", self.domain)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"[REDACTED]")
            .field("domain", &self.domain)
            .field("default_from", &self.default_from)
            .field("region", &self.region)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Raw settings as read from a config file and the environment.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Settings {
    pub api_key: String,
    pub domain: String,
    pub default_from: String,
    #[serde(default)]
    pub region: Region,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Settings {
    pub fn into_config(self) -> Result<Config, Error> {
        let config = Config::new(self.api_key, self.domain, self.default_from, self.region)?;

        Ok(match self.timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        })
    }
}

/// Loads sender settings from the filesystem and merges them with any
/// environment variables prefixed with MAILGUN_ (e.g. `MAILGUN_API_KEY`).
///
/// An explicit `path` must exist. The default path is optional, so a
/// purely environment-driven setup works too.
pub fn load_settings(path: Option<&str>) -> Result<Settings, Error> {
    load_from(path, ENV_PREFIX)
}

fn load_from(path: Option<&str>, prefix: &str) -> Result<Settings, Error> {
    let file = match path {
        Some(p) => config::File::with_name(p).required(true),
        None => config::File::with_name(DEFAULT_PATH).required(false),
    };

    let settings = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix(prefix))
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}
