//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`LoginService`, `BillingSessions`, `ReceiptQuotaQuery`,
//! `NotificationWriter`, `NotificationQuery`) are called by inbound adapters.
//! Driven ports (`UserRepository`, `ReceiptUsageRepository`,
//! `NotificationRepository`, `BillingProvider`) are implemented by outbound
//! adapters and expose typed errors generated by `define_port_error!`.

mod macros;
pub(crate) use macros::define_port_error;

mod billing_provider;
mod billing_sessions;
mod login_service;
mod notification_repository;
mod notifications;
mod receipt_quota_query;
mod receipt_usage_repository;
mod user_repository;

#[cfg(test)]
pub use billing_provider::MockBillingProvider;
pub use billing_provider::{
    BillingProvider, BillingProviderError, CheckoutSessionRequest, DisabledBillingProvider,
    HostedSession, NewBillingCustomer, PortalSessionRequest,
};
#[cfg(test)]
pub use billing_sessions::MockBillingSessions;
pub use billing_sessions::BillingSessions;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use notifications::{MockNotificationQuery, MockNotificationWriter};
pub use notifications::{NotificationQuery, NotificationWriter};
#[cfg(test)]
pub use receipt_quota_query::MockReceiptQuotaQuery;
pub use receipt_quota_query::ReceiptQuotaQuery;
#[cfg(test)]
pub use receipt_usage_repository::MockReceiptUsageRepository;
pub use receipt_usage_repository::{ReceiptUsageRepository, ReceiptUsageRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
