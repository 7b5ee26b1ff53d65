//! Mock hierarchy endpoints (`/tree`, `/nodeApi/node`)

use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;

use super::respond;
use crate::services::tree::{self, DEFAULT_DEPTH, ROOT_ID};
use crate::types::{Result, ServiceError};

/// Tree query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeQuery {
    pub root_id: String,
    pub depth: usize,
}

impl Default for TreeQuery {
    fn default() -> Self {
        Self {
            root_id: ROOT_ID.to_string(),
            depth: DEFAULT_DEPTH,
        }
    }
}

impl TreeQuery {
    /// Parse `rootId` and `TreeDepth` from a raw query string
    pub fn from_query_string(query: &str) -> Result<Self> {
        let mut parsed = Self::default();

        for pair in query.split('&') {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("");
            let raw = parts.next().unwrap_or("");
            let value = urlencoding::decode(raw)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| raw.to_string());

            match key {
                "rootId" if !value.is_empty() => parsed.root_id = value,
                "TreeDepth" => {
                    parsed.depth = value.trim().parse().map_err(|_| {
                        ServiceError::BadRequest(format!(
                            "TreeDepth must be a non-negative integer, got `{}`",
                            value
                        ))
                    })?;
                }
                _ => {}
            }
        }

        Ok(parsed)
    }
}

/// GET /tree, GET /nodeApi/node
pub fn get_tree(query: Option<&str>) -> Response<Full<Bytes>> {
    respond(
        TreeQuery::from_query_string(query.unwrap_or(""))
            .map(|q| tree::generate(&q.root_id, q.depth)),
    )
}
