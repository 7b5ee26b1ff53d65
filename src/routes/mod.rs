//! HTTP routes for the entity configuration service
//!
//! Handlers are synchronous: every answer is computed from in-memory state.
//! Errors are rendered as `{"detail": "..."}`.

pub mod catalogue;
pub mod health;
pub mod teams;
pub mod tree;
pub mod validation;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::types::ServiceError;

pub use catalogue::{get_config, get_form, get_system, list_systems};
pub use health::{health_check, root, version_info};
pub use teams::list_owning_teams;
pub use tree::get_tree;
pub use validation::validate_display_name;

/// Serialize `value` as a JSON response with the given status
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(body) => Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(body)))
            .unwrap(),
        Err(e) => error_response(&ServiceError::Internal(e.to_string())),
    }
}

/// Render a request error as `{"detail": ...}`
pub fn error_response(err: &ServiceError) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "detail": err.detail() });

    Response::builder()
        .status(err.status_code())
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

/// Collapse a handler result into a response
pub fn respond<T: Serialize>(result: crate::types::Result<T>) -> Response<Full<Bytes>> {
    match result {
        Ok(value) => json_response(StatusCode::OK, &value),
        Err(err) => error_response(&err),
    }
}
