//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{BillingSessions, LoginService, NotificationQuery, ReceiptQuotaQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub billing: Arc<dyn BillingSessions>,
    pub receipt_quota: Arc<dyn ReceiptQuotaQuery>,
    pub notifications: Arc<dyn NotificationQuery>,
}

/// Parameter object naming every port [`HttpState`] needs.
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub billing: Arc<dyn BillingSessions>,
    pub receipt_quota: Arc<dyn ReceiptQuotaQuery>,
    pub notifications: Arc<dyn NotificationQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            billing,
            receipt_quota,
            notifications,
        } = ports;
        Self {
            login,
            billing,
            receipt_quota,
            notifications,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
