//! Driven port for the third-party subscription billing provider.
//!
//! The provider hosts checkout and customer portal pages; the domain only
//! asks it for session URLs and customer handles.

use async_trait::async_trait;
use url::Url;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by billing provider adapters.
    pub enum BillingProviderError {
        /// Billing credentials are not configured for this deployment.
        NotConfigured => "billing provider is not configured",
        /// The provider could not be reached.
        Transport { message: String } => "billing provider request failed: {message}",
        /// The provider answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "billing provider rejected request with status {status}: {message}",
        /// The provider response could not be decoded.
        Decode { message: String } => "billing provider response was invalid: {message}",
    }
}

/// Customer to register with the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBillingCustomer {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
}

/// Subscription checkout parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub customer_id: String,
    pub user_id: UserId,
    pub success_url: Url,
    pub cancel_url: Url,
}

/// Customer portal parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalSessionRequest {
    pub customer_id: String,
    pub return_url: Url,
}

/// Provider-hosted page the user is redirected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedSession {
    pub id: String,
    pub url: Url,
}

/// Billing provider operations used by the billing service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Register a customer and return the provider's customer handle.
    async fn create_customer(
        &self,
        customer: &NewBillingCustomer,
    ) -> Result<String, BillingProviderError>;

    /// Start a hosted subscription checkout.
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<HostedSession, BillingProviderError>;

    /// Open the hosted customer portal.
    async fn create_portal_session(
        &self,
        request: &PortalSessionRequest,
    ) -> Result<HostedSession, BillingProviderError>;
}

/// Provider used when billing credentials are absent.
///
/// Every call fails with [`BillingProviderError::NotConfigured`], which the
/// billing service logs and surfaces as an internal error.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledBillingProvider;

#[async_trait]
impl BillingProvider for DisabledBillingProvider {
    async fn create_customer(
        &self,
        _customer: &NewBillingCustomer,
    ) -> Result<String, BillingProviderError> {
        Err(BillingProviderError::not_configured())
    }

    async fn create_checkout_session(
        &self,
        _request: &CheckoutSessionRequest,
    ) -> Result<HostedSession, BillingProviderError> {
        Err(BillingProviderError::not_configured())
    }

    async fn create_portal_session(
        &self,
        _request: &PortalSessionRequest,
    ) -> Result<HostedSession, BillingProviderError> {
        Err(BillingProviderError::not_configured())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_provider_reports_not_configured() {
        let provider = DisabledBillingProvider;
        let request = PortalSessionRequest {
            customer_id: "cus_123".to_owned(),
            return_url: Url::parse("https://tabsplit.example/settings/billing")
                .expect("valid url"),
        };
        let err = provider
            .create_portal_session(&request)
            .await
            .expect_err("disabled provider must fail");
        assert_eq!(err, BillingProviderError::NotConfigured);
    }

    #[test]
    fn rejected_error_mentions_status() {
        let err = BillingProviderError::rejected(402_u16, "card declined");
        assert!(err.to_string().contains("402"));
    }
}
