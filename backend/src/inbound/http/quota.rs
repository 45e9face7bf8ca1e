//! Receipt quota handler.
//!
//! ```text
//! GET /api/me/receipt-quota
//! {"quota":{"plan":"free","limit":10,"used":3,"remaining":7,
//!           "periodStart":"2024-06-01","resetsAt":"2024-07-01T00:00:00Z"}}
//! ```

use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::envelope::{self, ErrorBody};
use super::session::SessionContext;
use super::state::HttpState;
use super::ApiResult;
use crate::domain::{Plan, QuotaInfo};

/// Receipt allowance for the current period; `null` limits mean unlimited.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotaDto {
    /// Subscription plan the limit derives from.
    #[schema(value_type = super::schemas::PlanSchema)]
    pub plan: Plan,
    /// Receipts allowed this period, `null` when unlimited.
    #[schema(example = 10)]
    pub limit: Option<u32>,
    /// Receipts already scanned this period.
    #[schema(example = 3)]
    pub used: u32,
    /// Receipts left this period, `null` when unlimited.
    #[schema(example = 7)]
    pub remaining: Option<u32>,
    /// First day of the current UTC calendar month.
    pub period_start: NaiveDate,
    /// Start of the next period, when the counter resets.
    pub resets_at: DateTime<Utc>,
}

impl From<QuotaInfo> for QuotaDto {
    fn from(info: QuotaInfo) -> Self {
        Self {
            plan: info.plan,
            limit: info.limit,
            used: info.used,
            remaining: info.remaining,
            period_start: info.period.start(),
            resets_at: info.period.resets_at(),
        }
    }
}

/// Body of `GET /api/me/receipt-quota`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ReceiptQuotaResponse {
    pub quota: QuotaDto,
}

/// Current receipt-scan allowance for the signed-in user.
#[utoipa::path(
    get,
    path = "/api/me/receipt-quota",
    responses(
        (status = 200, description = "Quota for the current period", body = ReceiptQuotaResponse),
        (status = 401, description = "No active session", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["quota"],
    operation_id = "getReceiptQuota"
)]
#[get("/me/receipt-quota")]
pub async fn get_receipt_quota(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let info = state.receipt_quota.receipt_quota(&user_id).await?;
    Ok(envelope::ok(ReceiptQuotaResponse {
        quota: info.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockReceiptQuotaQuery;
    use crate::domain::{Error, QuotaPeriod, UserId};
    use crate::inbound::http::test_utils::{
        SIGN_IN_PATH, mock_ports, sign_in_route, signed_in_cookie, test_session_middleware,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::TimeZone;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn june() -> QuotaPeriod {
        QuotaPeriod::containing(
            Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0)
                .single()
                .expect("valid timestamp"),
        )
    }

    fn app_with(
        quota: MockReceiptQuotaQuery,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let mut ports = mock_ports();
        ports.receipt_quota = Arc::new(quota);
        App::new()
            .app_data(web::Data::new(HttpState::new(ports)))
            .wrap(test_session_middleware())
            .route(&format!("{SIGN_IN_PATH}/{{id}}"), sign_in_route())
            .service(web::scope("/api").service(get_receipt_quota))
    }

    #[actix_web::test]
    async fn anonymous_request_is_unauthorised() {
        let app = test::init_service(app_with(MockReceiptQuotaQuery::new())).await;
        let request = test::TestRequest::get()
            .uri("/api/me/receipt-quota")
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn free_plan_quota_is_wrapped_under_quota_key() {
        let user_id = UserId::random();
        let mut quota = MockReceiptQuotaQuery::new();
        quota
            .expect_receipt_quota()
            .withf(move |id| *id == user_id)
            .times(1)
            .return_once(|_| Ok(QuotaInfo::compute(Plan::Free, 3, june())));
        let app = test::init_service(app_with(quota)).await;
        let cookie = signed_in_cookie(&app, user_id).await;

        let request = test::TestRequest::get()
            .uri("/api/me/receipt-quota")
            .cookie(cookie)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body,
            json!({
                "quota": {
                    "plan": "free",
                    "limit": 10,
                    "used": 3,
                    "remaining": 7,
                    "periodStart": "2024-06-01",
                    "resetsAt": "2024-07-01T00:00:00Z",
                }
            })
        );
    }

    #[actix_web::test]
    async fn pro_plan_serialises_unlimited_as_null() {
        let user_id = UserId::random();
        let mut quota = MockReceiptQuotaQuery::new();
        quota
            .expect_receipt_quota()
            .return_once(|_| Ok(QuotaInfo::compute(Plan::Pro, 42, june())));
        let app = test::init_service(app_with(quota)).await;
        let cookie = signed_in_cookie(&app, user_id).await;

        let request = test::TestRequest::get()
            .uri("/api/me/receipt-quota")
            .cookie(cookie)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, request).await;
        assert_eq!(body["quota"]["limit"], Value::Null);
        assert_eq!(body["quota"]["remaining"], Value::Null);
        assert_eq!(body["quota"]["used"], 42);
    }

    #[actix_web::test]
    async fn backend_failure_is_redacted() {
        let user_id = UserId::random();
        let mut quota = MockReceiptQuotaQuery::new();
        quota
            .expect_receipt_quota()
            .return_once(|_| Err(Error::internal("receipt usage query failed: timeout")));
        let app = test::init_service(app_with(quota)).await;
        let cookie = signed_in_cookie(&app, user_id).await;

        let request = test::TestRequest::get()
            .uri("/api/me/receipt-quota")
            .cookie(cookie)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body,
            json!({ "error": "Internal Server Error", "code": "internal_error" })
        );
    }
}
