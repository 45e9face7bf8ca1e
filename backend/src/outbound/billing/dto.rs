//! DTOs for decoding Stripe REST responses.

use serde::Deserialize;
use url::Url;

use crate::domain::ports::HostedSession;

#[derive(Debug, Deserialize)]
pub(super) struct CustomerDto {
    pub(super) id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct HostedSessionDto {
    pub(super) id: String,
    pub(super) url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: ErrorDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorDto {
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(rename = "type", default)]
    pub(super) kind: Option<String>,
}

impl HostedSessionDto {
    pub(super) fn into_hosted_session(self) -> Result<HostedSession, String> {
        let raw = self
            .url
            .ok_or_else(|| format!("session {} has no url", self.id))?;
        let url = Url::parse(&raw).map_err(|err| format!("session {} url invalid: {err}", self.id))?;
        if url.scheme() != "https" {
            return Err(format!("session {} url is not https", self.id));
        }
        Ok(HostedSession { id: self.id, url })
    }
}
