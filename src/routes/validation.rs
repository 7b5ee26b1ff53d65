//! Async field validation endpoints used by the form front end

use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;

use super::respond;
use crate::services::{DisplayNameCheck, DisplayNameRegistry, DisplayNameRequest};
use crate::types::Result;

/// POST /validate/display-name
pub fn validate_display_name(registry: &DisplayNameRegistry, body: &[u8]) -> Response<Full<Bytes>> {
    respond(check_display_name(registry, body))
}

fn check_display_name(
    registry: &DisplayNameRegistry,
    body: &[u8],
) -> Result<DisplayNameCheck> {
    let request: DisplayNameRequest = serde_json::from_slice(body)?;
    Ok(registry.check(&request.value))
}
