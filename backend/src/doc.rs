//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the DTO and enum schemas they reference, plus the session cookie
//! security scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::auth::{LoginRequest, LoginResponse, LogoutResponse};
use crate::inbound::http::billing::BillingSessionResponse;
use crate::inbound::http::envelope::ErrorBody;
use crate::inbound::http::notifications::{NotificationDto, NotificationListResponse};
use crate::inbound::http::quota::{QuotaDto, ReceiptQuotaResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, NotificationKindSchema, PlanSchema};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tabsplit backend API",
        description = "Session-authenticated billing, receipt quota and notification endpoints."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::billing::create_portal_session,
        crate::inbound::http::billing::create_checkout_session,
        crate::inbound::http::quota::get_receipt_quota,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorBody,
        ErrorCodeSchema,
        PlanSchema,
        NotificationKindSchema,
        LoginRequest,
        LoginResponse,
        LogoutResponse,
        BillingSessionResponse,
        QuotaDto,
        ReceiptQuotaResponse,
        NotificationDto,
        NotificationListResponse,
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "billing", description = "Hosted subscription flows"),
        (name = "quota", description = "Receipt scan allowance"),
        (name = "notifications", description = "In-app notification feed"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
