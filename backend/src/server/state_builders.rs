//! Builders wiring domain services to their Diesel and Stripe adapters.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use backend::config::StripeSettings;
use backend::domain::ports::{BillingProvider, DisabledBillingProvider};
use backend::domain::{
    BillingService, BillingUrls, NotificationService, PasswordLoginService, ReceiptQuotaService,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::billing::{STRIPE_REQUEST_TIMEOUT, StripeBillingProvider};
use backend::outbound::persistence::{
    DieselNotificationRepository, DieselReceiptUsageRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Select the Stripe adapter when credentials are configured.
///
/// Without credentials every billing call fails with `NotConfigured`.
pub(super) fn build_billing_provider(
    stripe: Option<&StripeSettings>,
) -> io::Result<Arc<dyn BillingProvider>> {
    match stripe {
        Some(settings) => {
            let provider = StripeBillingProvider::new(settings, STRIPE_REQUEST_TIMEOUT)
                .map_err(|err| io::Error::other(format!("billing client setup failed: {err}")))?;
            info!(api_base = %settings.api_base, "stripe billing enabled");
            Ok(Arc::new(provider))
        }
        None => {
            warn!("stripe credentials absent; billing endpoints will return 500");
            Ok(Arc::new(DisabledBillingProvider))
        }
    }
}

/// Build the shared HTTP state from the configured pool and providers.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(DieselUserRepository::new(config.db_pool.clone()));
    let usage = Arc::new(DieselReceiptUsageRepository::new(config.db_pool.clone()));
    let notifications = Arc::new(DieselNotificationRepository::new(config.db_pool.clone()));

    let urls = BillingUrls::from_base(&config.app_base_url)
        .map_err(|err| io::Error::other(format!("invalid billing return url: {err}")))?;
    let provider = build_billing_provider(config.stripe.as_ref())?;

    Ok(web::Data::new(HttpState::new(HttpStatePorts {
        login: Arc::new(PasswordLoginService::new(users.clone())),
        billing: Arc::new(BillingService::new(users.clone(), provider, urls)),
        receipt_quota: Arc::new(ReceiptQuotaService::new(users, usage, clock.clone())),
        notifications: Arc::new(NotificationService::new(notifications, clock)),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::domain::ports::{BillingProviderError, PortalSessionRequest};
    use rstest::rstest;
    use url::Url;

    fn portal_request() -> PortalSessionRequest {
        PortalSessionRequest {
            customer_id: "cus_123".to_owned(),
            return_url: Url::parse("https://tabsplit.example/settings/billing")
                .expect("valid url"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn missing_stripe_settings_select_disabled_provider() {
        let provider = build_billing_provider(None).expect("provider builds");
        let err = provider
            .create_portal_session(&portal_request())
            .await
            .expect_err("disabled provider fails");
        assert_eq!(err, BillingProviderError::NotConfigured);
    }
}
