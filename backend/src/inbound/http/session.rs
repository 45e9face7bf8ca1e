//! Session guard keeping HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers only persist, read, require or
//! clear the authenticated user id. Anonymous requests read as `None`; only
//! [`SessionContext::require_user_id`] turns absence into 401.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
/// Message returned when a protected route is called without a session.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    ///
    /// A malformed id is treated as anonymous; a session store that cannot be
    /// read is an internal error.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let Some(raw) = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?
        else {
            return Ok(None);
        };
        match UserId::new(&raw) {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(error = %error, "invalid user id in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized(UNAUTHORIZED_MESSAGE))
    }

    /// Drop every session entry and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{
        SIGN_IN_PATH, session_cookie, sign_in_route, signed_in_cookie, test_session_middleware,
    };
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;
    use serde_json::Value;

    const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    async fn probe_app() -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(&format!("{SIGN_IN_PATH}/{{id}}"), sign_in_route())
                .route(
                    "/raw/text/{value}",
                    web::get().to(|session: Session, path: web::Path<String>| async move {
                        session
                            .insert(USER_ID_KEY, path.into_inner())
                            .map_err(|err| Error::internal(err.to_string()))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/raw/number",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, 42)
                            .map_err(|err| Error::internal(err.to_string()))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/whoami",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.require_user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                    }),
                )
                .route(
                    "/clear",
                    web::get().to(|session: SessionContext| async move {
                        session.clear();
                        let anonymous = session.user_id()?.is_none();
                        Ok::<_, Error>(HttpResponse::Ok().body(anonymous.to_string()))
                    }),
                ),
        )
        .await
    }

    async fn get<S>(
        app: &S,
        uri: &str,
        cookie: Option<Cookie<'static>>,
    ) -> actix_web::dev::ServiceResponse
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
            >,
    {
        let mut request = test::TestRequest::get().uri(uri);
        if let Some(cookie) = cookie {
            request = request.cookie(cookie);
        }
        test::call_service(app, request.to_request()).await
    }

    #[actix_web::test]
    async fn persisted_user_is_required_back() {
        let app = probe_app().await;
        let cookie = signed_in_cookie(&app, UserId::new(USER).expect("fixture id")).await;

        let res = get(&app, "/whoami", Some(cookie)).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, USER);
    }

    #[rstest]
    #[case::no_session(None)]
    #[case::tampered_id(Some("/raw/text/not-a-uuid"))]
    #[actix_web::test]
    async fn anonymous_callers_get_unauthorized(#[case] seed: Option<&str>) {
        let app = probe_app().await;
        let cookie = match seed {
            Some(uri) => session_cookie(&get(&app, uri, None).await),
            None => None,
        };

        let res = get(&app, "/whoami", cookie).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], UNAUTHORIZED_MESSAGE);
        assert_eq!(body["code"], "unauthorized");
    }

    #[actix_web::test]
    async fn undecodable_session_entry_is_internal() {
        let app = probe_app().await;
        let cookie = session_cookie(&get(&app, "/raw/number", None).await);

        let res = get(&app, "/whoami", cookie).await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn cleared_session_is_anonymous_and_expires_cookie() {
        let app = probe_app().await;
        let cookie = signed_in_cookie(&app, UserId::random()).await;

        let res = get(&app, "/clear", Some(cookie)).await;

        let removal = session_cookie(&res).expect("removal cookie");
        assert!(removal.value().is_empty());
        assert_eq!(test::read_body(res).await, "true");
    }
}
