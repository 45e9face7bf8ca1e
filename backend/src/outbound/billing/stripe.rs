//! Reqwest-backed Stripe billing adapter.
//!
//! Owns transport details only: form encoding, bearer auth, timeout and
//! status mapping, and JSON decoding into [`HostedSession`]s.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use zeroize::Zeroizing;

use super::dto::{CustomerDto, ErrorEnvelopeDto, HostedSessionDto};
use crate::config::StripeSettings;
use crate::domain::ports::{
    BillingProvider, BillingProviderError, CheckoutSessionRequest, HostedSession,
    NewBillingCustomer, PortalSessionRequest,
};

/// Request timeout applied to every Stripe call.
pub const STRIPE_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const CUSTOMERS_PATH: &str = "v1/customers";
const CHECKOUT_SESSIONS_PATH: &str = "v1/checkout/sessions";
const PORTAL_SESSIONS_PATH: &str = "v1/billing_portal/sessions";

type Form = Vec<(&'static str, String)>;

/// Billing provider adapter for the Stripe REST API.
pub struct StripeBillingProvider {
    client: Client,
    api_base: Url,
    secret_key: Zeroizing<String>,
    price_id: String,
}

impl StripeBillingProvider {
    /// Build an adapter using a reqwest client with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: &StripeSettings, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: settings.api_base.clone(),
            secret_key: Zeroizing::new(settings.secret_key.clone()),
            price_id: settings.price_id.clone(),
        })
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &Form,
    ) -> Result<T, BillingProviderError> {
        let endpoint = endpoint(&self.api_base, path)?;
        debug!(endpoint = %endpoint, "calling billing provider");
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(self.secret_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        decode(body.as_ref())
    }
}

#[async_trait]
impl BillingProvider for StripeBillingProvider {
    async fn create_customer(
        &self,
        customer: &NewBillingCustomer,
    ) -> Result<String, BillingProviderError> {
        let created: CustomerDto = self
            .post_form(CUSTOMERS_PATH, &customer_form(customer))
            .await?;
        Ok(created.id)
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<HostedSession, BillingProviderError> {
        let session: HostedSessionDto = self
            .post_form(CHECKOUT_SESSIONS_PATH, &checkout_form(&self.price_id, request))
            .await?;
        session
            .into_hosted_session()
            .map_err(BillingProviderError::decode)
    }

    async fn create_portal_session(
        &self,
        request: &PortalSessionRequest,
    ) -> Result<HostedSession, BillingProviderError> {
        let session: HostedSessionDto = self
            .post_form(PORTAL_SESSIONS_PATH, &portal_form(request))
            .await?;
        session
            .into_hosted_session()
            .map_err(BillingProviderError::decode)
    }
}

fn endpoint(api_base: &Url, path: &str) -> Result<Url, BillingProviderError> {
    let mut base = api_base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path)
        .map_err(|err| BillingProviderError::transport(format!("invalid endpoint {path}: {err}")))
}

fn customer_form(customer: &NewBillingCustomer) -> Form {
    vec![
        ("email", customer.email.clone()),
        ("name", customer.name.clone()),
        ("metadata[user_id]", customer.user_id.to_string()),
    ]
}

fn checkout_form(price_id: &str, request: &CheckoutSessionRequest) -> Form {
    vec![
        ("mode", "subscription".to_owned()),
        ("customer", request.customer_id.clone()),
        ("client_reference_id", request.user_id.to_string()),
        ("line_items[0][price]", price_id.to_owned()),
        ("line_items[0][quantity]", "1".to_owned()),
        ("success_url", request.success_url.to_string()),
        ("cancel_url", request.cancel_url.to_string()),
    ]
}

fn portal_form(request: &PortalSessionRequest) -> Form {
    vec![
        ("customer", request.customer_id.clone()),
        ("return_url", request.return_url.to_string()),
    ]
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, BillingProviderError> {
    serde_json::from_slice(body).map_err(|error| {
        BillingProviderError::decode(format!("invalid billing provider JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> BillingProviderError {
    if error.is_timeout() {
        BillingProviderError::transport(format!("timed out: {error}"))
    } else {
        BillingProviderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> BillingProviderError {
    let message = serde_json::from_slice::<ErrorEnvelopeDto>(body)
        .ok()
        .and_then(|envelope| match (envelope.error.kind, envelope.error.message) {
            (Some(kind), Some(message)) => Some(format!("{kind}: {message}")),
            (None, Some(message)) => Some(message),
            (Some(kind), None) => Some(kind),
            (None, None) => None,
        })
        .unwrap_or_else(|| body_preview(body));
    BillingProviderError::rejected(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network request and response helpers.

    use super::*;
    use crate::domain::UserId;
    use rstest::rstest;

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid url")
    }

    fn value<'a>(form: &'a Form, key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    #[rstest]
    #[case("https://api.stripe.com", "https://api.stripe.com/v1/customers")]
    #[case("https://api.stripe.com/", "https://api.stripe.com/v1/customers")]
    #[case("http://localhost:12111/stripe", "http://localhost:12111/stripe/v1/customers")]
    fn endpoints_are_joined_under_base(#[case] base: &str, #[case] expected: &str) {
        let joined = endpoint(&url(base), CUSTOMERS_PATH).expect("endpoint");
        assert_eq!(joined.as_str(), expected);
    }

    #[test]
    fn checkout_form_requests_subscription_for_configured_price() {
        let user_id = UserId::random();
        let request = CheckoutSessionRequest {
            customer_id: "cus_9".to_owned(),
            user_id,
            success_url: url("https://tabsplit.example/settings/billing?checkout=success"),
            cancel_url: url("https://tabsplit.example/settings/billing?checkout=cancelled"),
        };

        let form = checkout_form("price_pro", &request);

        assert_eq!(value(&form, "mode"), Some("subscription"));
        assert_eq!(value(&form, "customer"), Some("cus_9"));
        assert_eq!(value(&form, "line_items[0][price]"), Some("price_pro"));
        assert_eq!(
            value(&form, "client_reference_id"),
            Some(user_id.to_string().as_str())
        );
    }

    #[test]
    fn portal_form_carries_return_url() {
        let form = portal_form(&PortalSessionRequest {
            customer_id: "cus_9".to_owned(),
            return_url: url("https://tabsplit.example/settings/billing"),
        });
        assert_eq!(
            value(&form, "return_url"),
            Some("https://tabsplit.example/settings/billing")
        );
    }

    #[test]
    fn decodes_hosted_session() {
        let body = br#"{"id":"bps_1","object":"billing_portal.session","url":"https://billing.stripe.com/p/session/bps_1"}"#;
        let dto: HostedSessionDto = decode(body).expect("json decodes");
        let session = dto.into_hosted_session().expect("valid session");
        assert_eq!(session.id, "bps_1");
        assert_eq!(session.url.host_str(), Some("billing.stripe.com"));
    }

    #[rstest]
    #[case(r#"{"id":"cs_1","url":null}"#)]
    #[case(r#"{"id":"cs_1","url":"http://insecure.example/pay"}"#)]
    #[case(r#"{"id":"cs_1","url":"not a url"}"#)]
    fn rejects_unusable_session_urls(#[case] body: &str) {
        let dto: HostedSessionDto = decode(body.as_bytes()).expect("json decodes");
        assert!(dto.into_hosted_session().is_err());
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = decode::<CustomerDto>(b"<html>").expect_err("decode fails");
        assert!(matches!(err, BillingProviderError::Decode { .. }));
    }

    #[rstest]
    #[case(
        br#"{"error":{"type":"invalid_request_error","message":"No such customer: 'cus_x'"}}"#.as_slice(),
        "invalid_request_error: No such customer: 'cus_x'"
    )]
    #[case(b"upstream   exploded".as_slice(), "upstream exploded")]
    fn status_errors_keep_provider_message(#[case] body: &[u8], #[case] expected: &str) {
        let err = map_status_error(StatusCode::BAD_REQUEST, body);
        assert_eq!(err, BillingProviderError::rejected(400_u16, expected));
    }
}
