//! Billing use-cases: hosted checkout and customer portal sessions.
//!
//! The service resolves the user's billing customer, asks the provider for a
//! hosted session and returns its URL. Every failure (unknown user, missing
//! billing customer, unconfigured or failing provider) is logged with its
//! cause and collapsed to an internal error; there is no retry.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};
use url::Url;

use crate::domain::ports::{
    BillingProvider, BillingProviderError, BillingSessions, CheckoutSessionRequest,
    NewBillingCustomer, PortalSessionRequest, UserPersistenceError, UserRepository,
};
use crate::domain::{Error, User, UserId};

const BILLING_SETTINGS_PATH: &str = "settings/billing";

/// Application URLs the provider redirects back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingUrls {
    return_url: Url,
    success_url: Url,
    cancel_url: Url,
}

impl BillingUrls {
    /// Derive redirect URLs from the application's public base URL.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::BillingUrls;
    /// use url::Url;
    ///
    /// let base = Url::parse("https://tabsplit.example/app/").unwrap();
    /// let urls = BillingUrls::from_base(&base).unwrap();
    /// assert_eq!(urls.return_url().as_str(), "https://tabsplit.example/app/settings/billing");
    /// assert_eq!(
    ///     urls.success_url().as_str(),
    ///     "https://tabsplit.example/app/settings/billing?checkout=success",
    /// );
    /// ```
    pub fn from_base(base: &Url) -> Result<Self, url::ParseError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let return_url = base.join(BILLING_SETTINGS_PATH)?;
        let mut success_url = return_url.clone();
        success_url.set_query(Some("checkout=success"));
        let mut cancel_url = return_url.clone();
        cancel_url.set_query(Some("checkout=cancelled"));
        Ok(Self {
            return_url,
            success_url,
            cancel_url,
        })
    }

    /// Where the portal sends the user back to.
    pub fn return_url(&self) -> &Url {
        &self.return_url
    }

    /// Where checkout lands after payment.
    pub fn success_url(&self) -> &Url {
        &self.success_url
    }

    /// Where checkout lands when abandoned.
    pub fn cancel_url(&self) -> &Url {
        &self.cancel_url
    }
}

/// Billing service implementing the [`BillingSessions`] driving port.
pub struct BillingService<U: ?Sized, B: ?Sized> {
    users: Arc<U>,
    provider: Arc<B>,
    urls: BillingUrls,
}

impl<U: ?Sized, B: ?Sized> BillingService<U, B> {
    /// Create a billing service over a user repository and provider.
    pub fn new(users: Arc<U>, provider: Arc<B>, urls: BillingUrls) -> Self {
        Self {
            users,
            provider,
            urls,
        }
    }
}

impl<U, B> BillingService<U, B>
where
    U: UserRepository + ?Sized,
    B: BillingProvider + ?Sized,
{
    async fn load_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| {
                error!(user_id = %user_id, "billing requested for unknown user");
                Error::internal("billing user not found")
            })
    }

    async fn ensure_customer(&self, user: &User) -> Result<String, Error> {
        if let Some(existing) = user.billing_customer_id() {
            return Ok(existing.to_owned());
        }

        let customer = NewBillingCustomer {
            user_id: *user.id(),
            email: user.email().to_owned(),
            name: user.display_name().to_owned(),
        };
        let customer_id = self
            .provider
            .create_customer(&customer)
            .await
            .map_err(|err| map_provider_error(err, "create customer"))?;
        self.users
            .set_billing_customer_id(user.id(), &customer_id)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), customer_id = %customer_id, "billing customer created");
        Ok(customer_id)
    }
}

#[async_trait]
impl<U, B> BillingSessions for BillingService<U, B>
where
    U: UserRepository + ?Sized,
    B: BillingProvider + ?Sized,
{
    async fn create_portal_session(&self, user_id: &UserId) -> Result<Url, Error> {
        let user = self.load_user(user_id).await?;
        let customer_id = user.billing_customer_id().ok_or_else(|| {
            error!(user_id = %user_id, "portal requested without a billing customer");
            Error::internal("no billing account for user")
        })?;

        let request = PortalSessionRequest {
            customer_id: customer_id.to_owned(),
            return_url: self.urls.return_url().clone(),
        };
        let session = self
            .provider
            .create_portal_session(&request)
            .await
            .map_err(|err| map_provider_error(err, "create portal session"))?;
        info!(user_id = %user_id, session_id = %session.id, "billing portal session created");
        Ok(session.url)
    }

    async fn create_checkout_session(&self, user_id: &UserId) -> Result<Url, Error> {
        let user = self.load_user(user_id).await?;
        let customer_id = self.ensure_customer(&user).await?;

        let request = CheckoutSessionRequest {
            customer_id,
            user_id: *user_id,
            success_url: self.urls.success_url().clone(),
            cancel_url: self.urls.cancel_url().clone(),
        };
        let session = self
            .provider
            .create_checkout_session(&request)
            .await
            .map_err(|err| map_provider_error(err, "create checkout session"))?;
        info!(user_id = %user_id, session_id = %session.id, "checkout session created");
        Ok(session.url)
    }
}

fn map_provider_error(err: BillingProviderError, operation: &'static str) -> Error {
    error!(error = %err, operation, "billing provider call failed");
    Error::internal(err.to_string())
}

pub(crate) fn map_user_error(err: UserPersistenceError) -> Error {
    error!(error = %err, "user repository call failed");
    Error::internal(err.to_string())
}
