use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;

use crate::config::Config;
use crate::core::constants::http_status;
use crate::core::error::{Result, SweepError};
use crate::reporting::logging;

/// Result of probing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The GET answered 200
    Success,
    /// The GET answered any other status, or failed in transport
    Failure,
    /// The line was empty or not a URL, no request was made
    Malformed,
}

impl ProbeOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, ProbeOutcome::Success)
    }

    /// Classify an HTTP status code. Only 200 counts as success.
    pub fn from_status(status: u16) -> Self {
        if status == http_status::OK {
            ProbeOutcome::Success
        } else {
            ProbeOutcome::Failure
        }
    }
}

/// Turns one input line into an outcome.
///
/// Implementations must absorb every error: nothing a line contains or a
/// server does may escape as a panic or error.
pub trait Probe: Send + Sync {
    fn probe(&self, line: &str) -> ProbeOutcome;
}

impl<P: Probe + ?Sized> Probe for &P {
    fn probe(&self, line: &str) -> ProbeOutcome {
        (**self).probe(line)
    }
}

/// Trim `line` and parse it as an absolute URL.
pub fn parse_url(line: &str) -> Result<Url> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(SweepError::UrlFormat("empty line".to_string()));
    }

    Url::parse(trimmed).map_err(|e| SweepError::UrlFormat(format!("'{trimmed}': {e}")))
}

/// Probes URLs with a single blocking HTTP GET each.
///
/// One client is shared by every worker so connections are pooled per host.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(config: &Config) -> Result<Self> {
        let user_agent = config.user_agent.as_deref().unwrap_or(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        let redirect_policy = match config.max_redirects() {
            0 => Policy::none(),
            limit => Policy::limited(limit),
        };

        let mut client_builder = Client::builder()
            .redirect(redirect_policy)
            .user_agent(user_agent);

        if let Some(timeout) = config.timeout_duration() {
            client_builder = client_builder.timeout(timeout);
        }

        Ok(Self {
            client: client_builder.build()?,
        })
    }

    fn get(&self, url: Url) -> Result<u16> {
        let response = self.client.get(url).send()?;
        Ok(response.status().as_u16())
    }
}

impl Probe for HttpProber {
    fn probe(&self, line: &str) -> ProbeOutcome {
        let url = match parse_url(line) {
            Ok(url) => url,
            Err(e) => {
                logging::log_probe_result(line, Err(&e));
                return ProbeOutcome::Malformed;
            }
        };

        match self.get(url) {
            Ok(status) => {
                logging::log_probe_result(line, Ok(status));
                ProbeOutcome::from_status(status)
            }
            Err(e) => {
                logging::log_probe_result(line, Err(&e));
                ProbeOutcome::Failure
            }
        }
    }
}
