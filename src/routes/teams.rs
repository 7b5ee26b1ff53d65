use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;

use super::respond;
use crate::services::owning_teams;

/// GET /owning-teams
pub fn list_owning_teams() -> Response<Full<Bytes>> {
    respond(Ok(owning_teams()))
}
