//! Liveness, version and welcome endpoints

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::json_response;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Build information, captured by build.rs
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub version: &'static str,
    pub commit: &'static str,
    pub build_time: &'static str,
    pub service: &'static str,
}

#[derive(Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

/// GET /health
pub fn health_check() -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &HealthResponse { status: "ok" })
}

/// GET /version
pub fn version_info() -> Response<Full<Bytes>> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
        build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        service: env!("CARGO_PKG_NAME"),
    };

    json_response(StatusCode::OK, &response)
}

/// GET /
pub fn root() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &WelcomeResponse {
            message: "Entity configuration service",
        },
    )
}
