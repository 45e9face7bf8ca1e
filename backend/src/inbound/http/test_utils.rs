//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use std::sync::Arc;

use super::session::SessionContext;
use super::state::HttpStatePorts;
use crate::domain::UserId;
use crate::domain::ports::{
    MockBillingSessions, MockLoginService, MockNotificationQuery, MockReceiptQuotaQuery,
};

pub(crate) const SESSION_COOKIE: &str = "session";

/// Session middleware with a fresh key and the `Secure` flag disabled so
/// plain-HTTP test requests keep their cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Session cookie set by a response, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// Port bundle of fresh mocks; any call without an expectation panics.
pub fn mock_ports() -> HttpStatePorts {
    HttpStatePorts {
        login: Arc::new(MockLoginService::new()),
        billing: Arc::new(MockBillingSessions::new()),
        receipt_quota: Arc::new(MockReceiptQuotaQuery::new()),
        notifications: Arc::new(MockNotificationQuery::new()),
    }
}

/// Request carrying a session cookie for `user_id`, minted by `app`.
pub async fn signed_in_cookie<S>(app: &S, user_id: UserId) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let request = actix_web::test::TestRequest::get()
        .uri(&format!("{SIGN_IN_PATH}/{user_id}"))
        .to_request();
    let response = actix_web::test::call_service(app, request).await;
    session_cookie(&response).expect("session cookie issued")
}

/// Route that persists the user id from the path; mount it next to the
/// handlers under test and mint cookies with [`signed_in_cookie`].
pub fn sign_in_route() -> actix_web::Route {
    actix_web::web::get().to(
        |session: SessionContext, path: actix_web::web::Path<String>| async move {
            let user_id = UserId::new(path.into_inner()).map_err(|err| {
                crate::domain::Error::invalid_request(err.to_string())
            })?;
            session.persist_user(&user_id)?;
            Ok::<_, crate::domain::Error>(actix_web::HttpResponse::Ok().finish())
        },
    )
}

pub(crate) const SIGN_IN_PATH: &str = "/test/sign-in";
