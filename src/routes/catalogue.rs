//! Catalogue routes: the assembled config, systems and per-step forms

use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;

use super::respond;
use crate::services::CatalogueService;

/// GET /config
pub fn get_config(catalogue: &CatalogueService) -> Response<Full<Bytes>> {
    respond(Ok(catalogue.config()))
}

/// GET /systems
pub fn list_systems(catalogue: &CatalogueService) -> Response<Full<Bytes>> {
    respond(Ok(catalogue.list_systems()))
}

/// GET /systems/{systemId}
pub fn get_system(catalogue: &CatalogueService, system_id: &str) -> Response<Full<Bytes>> {
    respond(catalogue.get_system(system_id))
}

/// GET /systems/{systemId}/forms/{stepKey}
pub fn get_form(catalogue: &CatalogueService, system_id: &str, step: &str) -> Response<Full<Bytes>> {
    respond(catalogue.get_form(system_id, step))
}
