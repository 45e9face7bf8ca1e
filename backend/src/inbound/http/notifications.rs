//! In-app notification feed.
//!
//! ```text
//! GET /api/notifications?limit=20
//! ```

use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::envelope::{self, ErrorBody};
use super::session::SessionContext;
use super::state::HttpState;
use super::ApiResult;
use crate::domain::{DEFAULT_NOTIFICATION_LIMIT, Notification, NotificationKind};

/// Query parameters for the notification feed.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationListQuery {
    /// Maximum number of entries, 1 to 100. Defaults to 20.
    pub limit: Option<u32>,
}

/// Notification as rendered to clients.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    #[schema(value_type = super::schemas::NotificationKindSchema)]
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

impl From<Notification> for NotificationDto {
    fn from(value: Notification) -> Self {
        Self {
            id: value.id,
            kind: value.kind,
            title: value.title,
            body: value.body,
            url: value.url,
            created_at: value.created_at,
            read_at: value.read_at,
        }
    }
}

/// Body of `GET /api/notifications`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationDto>,
}

/// Newest-first notifications for the signed-in user.
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationListQuery),
    responses(
        (status = 200, description = "Notifications", body = NotificationListResponse),
        (status = 400, description = "Limit out of range", body = ErrorBody),
        (status = 401, description = "No active session", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NotificationListQuery>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let limit = query.limit.unwrap_or(DEFAULT_NOTIFICATION_LIMIT);
    let notifications = state.notifications.list_for_user(&user_id, limit).await?;
    Ok(envelope::ok(NotificationListResponse {
        notifications: notifications.into_iter().map(NotificationDto::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockNotificationQuery;
    use crate::domain::{Error, UserId};
    use crate::inbound::http::error::query_config;
    use crate::inbound::http::test_utils::{
        SIGN_IN_PATH, mock_ports, sign_in_route, signed_in_cookie, test_session_middleware,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn app_with(
        query: MockNotificationQuery,
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
        ports.notifications = Arc::new(query);
        App::new()
            .app_data(web::Data::new(HttpState::new(ports)))
            .app_data(query_config())
            .wrap(test_session_middleware())
            .route(&format!("{SIGN_IN_PATH}/{{id}}"), sign_in_route())
            .service(web::scope("/api").service(list_notifications))
    }

    fn notification(user_id: UserId) -> Notification {
        Notification {
            id: Uuid::nil(),
            user_id,
            kind: NotificationKind::BillAdded,
            title: "Dinner at Luigi's".to_owned(),
            body: "Sam added a bill of 42.00 to Flat 3".to_owned(),
            url: Some("/groups/flat-3".to_owned()),
            created_at: Utc
                .with_ymd_and_hms(2024, 6, 1, 18, 0, 0)
                .single()
                .expect("valid timestamp"),
            read_at: None,
        }
    }

    #[actix_web::test]
    async fn anonymous_request_is_unauthorised() {
        let app = test::init_service(app_with(MockNotificationQuery::new())).await;
        let request = test::TestRequest::get().uri("/api/notifications").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case("/api/notifications", DEFAULT_NOTIFICATION_LIMIT)]
    #[case("/api/notifications?limit=5", 5)]
    #[actix_web::test]
    async fn lists_notifications_with_limit(#[case] uri: &str, #[case] expected_limit: u32) {
        let user_id = UserId::random();
        let mut query = MockNotificationQuery::new();
        query
            .expect_list_for_user()
            .withf(move |id, limit| *id == user_id && *limit == expected_limit)
            .times(1)
            .return_once(move |_, _| Ok(vec![notification(user_id)]));
        let app = test::init_service(app_with(query)).await;
        let cookie = signed_in_cookie(&app, user_id).await;

        let request = test::TestRequest::get().uri(uri).cookie(cookie).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body,
            json!({
                "notifications": [{
                    "id": Uuid::nil().to_string(),
                    "type": "bill_added",
                    "title": "Dinner at Luigi's",
                    "body": "Sam added a bill of 42.00 to Flat 3",
                    "url": "/groups/flat-3",
                    "createdAt": "2024-06-01T18:00:00Z",
                }]
            })
        );
    }

    #[actix_web::test]
    async fn out_of_range_limit_is_a_bad_request() {
        let user_id = UserId::random();
        let mut query = MockNotificationQuery::new();
        query
            .expect_list_for_user()
            .return_once(|_, _| Err(Error::invalid_request("limit must be between 1 and 100")));
        let app = test::init_service(app_with(query)).await;
        let cookie = signed_in_cookie(&app, user_id).await;

        let request = test::TestRequest::get()
            .uri("/api/notifications?limit=0")
            .cookie(cookie)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn non_numeric_limit_uses_the_error_envelope() {
        let user_id = UserId::random();
        let app = test::init_service(app_with(MockNotificationQuery::new())).await;
        let cookie = signed_in_cookie(&app, user_id).await;

        let request = test::TestRequest::get()
            .uri("/api/notifications?limit=lots")
            .cookie(cookie)
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["code"], "invalid_request");
    }
}
