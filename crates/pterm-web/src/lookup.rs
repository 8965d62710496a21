#![forbid(unsafe_code)]

//! Blocking HTTP implementation of the `whoami` IP lookup.
//!
//! Native hosts run [`HttpIpLookup::lookup`] off the event loop and feed the
//! resulting [`TerminalEvent`] back into the widget.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::event::TerminalEvent;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup timed out")]
    Timeout,
    #[error("lookup failed: {0}")]
    Http(#[source] reqwest::Error),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

/// Client for an endpoint answering `{"ip": "..."}`.
#[derive(Debug, Clone)]
pub struct HttpIpLookup {
    client: Client,
    url: String,
}

impl HttpIpLookup {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(2)))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the public IP.
    pub fn lookup(&self) -> Result<String, LookupError> {
        let response: IpResponse = self
            .client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(response.ip)
    }

    /// Run the lookup and wrap the outcome as a widget event.
    #[must_use]
    pub fn resolve(&self, request_id: u64) -> TerminalEvent {
        match self.lookup() {
            Ok(ip) => TerminalEvent::IpResolved { request_id, ip },
            Err(err) => {
                tracing::debug!(request_id, error = %err, "ip lookup failed");
                TerminalEvent::IpFailed {
                    request_id,
                    reason: err.to_string(),
                }
            }
        }
    }
}
