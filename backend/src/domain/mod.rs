//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services implementing the driving ports.
//! Types are immutable once validated; serialisation contracts live on the
//! inbound DTOs rather than here.
//!
//! Public surface:
//! - Error / ErrorCode: tagged error signal shared by every use-case.
//! - User / UserId / Plan: account identity and subscription plan.
//! - QuotaInfo / QuotaPeriod: receipt-scan allowance for a calendar month.
//! - Notification / NotificationDraft: in-app notification records.
//! - Services: `PasswordLoginService`, `BillingService`,
//!   `ReceiptQuotaService`, `NotificationService`.

pub mod auth;
pub mod billing;
pub mod error;
pub mod login;
pub mod notification;
pub mod notification_service;
pub mod ports;
pub mod quota;
pub mod quota_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    LoginCredentials, LoginValidationError, PasswordHashError, StoredCredentials, hash_password,
};
pub use self::billing::{BillingService, BillingUrls};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::login::PasswordLoginService;
pub use self::notification::{
    NOTIFICATION_BODY_MAX, NOTIFICATION_TITLE_MAX, Notification, NotificationDraft,
    NotificationKind, NotificationValidationError,
};
pub use self::notification_service::{
    DEFAULT_NOTIFICATION_LIMIT, MAX_NOTIFICATION_LIMIT, NotificationService,
};
pub use self::quota::{FREE_MONTHLY_RECEIPT_LIMIT, QuotaInfo, QuotaPeriod, monthly_limit};
pub use self::quota_service::ReceiptQuotaService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Plan, User, UserId, UserValidationError};
