//! JSON response envelope shared by every handler.
//!
//! Success bodies are the bare payload with status 200. Error bodies are
//! `{"error": message, "code": code}` plus an optional `traceId`. A body
//! never carries both shapes.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ErrorCode;

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Human-readable message; generic for unexpected failures.
    #[schema(example = "Unauthorized")]
    pub error: String,
    /// Stable machine-readable code.
    #[schema(value_type = super::schemas::ErrorCodeSchema)]
    pub code: ErrorCode,
    /// Request correlation id, when one was assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Success response with status 200 and `payload` as the JSON body.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use backend::inbound::http::envelope::ok;
/// use serde_json::json;
///
/// let response = ok(json!({"loggedOut": true}));
/// assert_eq!(response.status(), StatusCode::OK);
/// ```
pub fn ok<T: Serialize>(payload: T) -> HttpResponse {
    HttpResponse::Ok().json(payload)
}

/// Failure response with the given status and `{error, code}` body.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use backend::domain::ErrorCode;
/// use backend::inbound::http::envelope::error;
///
/// let response = error(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, "Unauthorized");
/// assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
/// ```
pub fn error(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody {
        error: message.into(),
        code,
        trace_id: None,
    })
}
