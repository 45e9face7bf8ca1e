//! Billing handlers returning provider-hosted session URLs.
//!
//! ```text
//! POST /api/billing/portal   -> {"url": "https://billing.stripe.com/p/session/..."}
//! POST /api/billing/checkout -> {"url": "https://checkout.stripe.com/c/pay/..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;
use utoipa::ToSchema;

use super::envelope::{self, ErrorBody};
use super::session::SessionContext;
use super::state::HttpState;
use super::ApiResult;

/// Redirect target for a hosted billing flow.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BillingSessionResponse {
    /// Provider-hosted page the client should redirect to.
    #[schema(example = "https://billing.stripe.com/p/session/test_123")]
    pub url: String,
}

impl From<Url> for BillingSessionResponse {
    fn from(url: Url) -> Self {
        Self { url: url.into() }
    }
}

/// Open the subscription management portal for the signed-in user.
#[utoipa::path(
    post,
    path = "/api/billing/portal",
    responses(
        (status = 200, description = "Portal session created", body = BillingSessionResponse),
        (status = 401, description = "No active session", body = ErrorBody),
        (status = 500, description = "No billing account, or the provider failed", body = ErrorBody)
    ),
    tags = ["billing"],
    operation_id = "createBillingPortalSession"
)]
#[post("/billing/portal")]
pub async fn create_portal_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let url = state.billing.create_portal_session(&user_id).await?;
    info!(user_id = %user_id, "billing portal session issued");
    Ok(envelope::ok(BillingSessionResponse::from(url)))
}

/// Start a subscription checkout for the signed-in user.
#[utoipa::path(
    post,
    path = "/api/billing/checkout",
    responses(
        (status = 200, description = "Checkout session created", body = BillingSessionResponse),
        (status = 401, description = "No active session", body = ErrorBody),
        (status = 500, description = "Billing is unavailable or the provider failed", body = ErrorBody)
    ),
    tags = ["billing"],
    operation_id = "createBillingCheckoutSession"
)]
#[post("/billing/checkout")]
pub async fn create_checkout_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let url = state.billing.create_checkout_session(&user_id).await?;
    info!(user_id = %user_id, "billing checkout session issued");
    Ok(envelope::ok(BillingSessionResponse::from(url)))
}
