//! OpenAPI schema definitions for domain enums.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; these
//! mirrors live in the inbound adapter and are referenced from DTO fields via
//! `#[schema(value_type = ...)]`.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "conflict")]
    Conflict,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Plan`].
#[derive(ToSchema)]
#[schema(as = Plan)]
pub enum PlanSchema {
    #[schema(rename = "free")]
    Free,
    #[schema(rename = "pro")]
    Pro,
}

/// OpenAPI schema for [`crate::domain::NotificationKind`].
#[derive(ToSchema)]
#[schema(as = NotificationKind)]
pub enum NotificationKindSchema {
    #[schema(rename = "bill_added")]
    BillAdded,
    #[schema(rename = "payment_received")]
    PaymentReceived,
    #[schema(rename = "settlement_reminder")]
    SettlementReminder,
    #[schema(rename = "quota_warning")]
    QuotaWarning,
    #[schema(rename = "subscription_updated")]
    SubscriptionUpdated,
    #[schema(rename = "system")]
    System,
}
