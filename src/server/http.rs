//! HTTP server implementation
//!
//! hyper http1 with TokioIo, one task per connection. Routing itself is the
//! synchronous [`route`] so it can be exercised without a socket.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{self, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::borrow::Cow;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::catalogue::Catalogue;
use crate::config::Args;
use crate::routes;
use crate::services::{CatalogueService, DisplayNameRegistry};
use crate::types::ServiceError;

/// Shared state handed to every request
#[derive(Debug)]
pub struct AppState {
    pub args: Args,
    pub catalogue: CatalogueService,
    pub display_names: DisplayNameRegistry,
}

impl AppState {
    pub fn new(args: Args, catalogue: Catalogue) -> Self {
        Self {
            args,
            catalogue: CatalogueService::new(Arc::new(catalogue)),
            display_names: DisplayNameRegistry::default(),
        }
    }
}

/// Bind the configured address and serve until the process exits
pub async fn run(state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("Entity config service listening on {}", listener.local_addr()?);

    serve(listener, state).await
}

/// Accept loop over an already bound listener
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        debug!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = req.into_body().collect().await?.to_bytes();

    let mut response = route(&state, &method, &path, query.as_deref(), &body);
    if let Some(origin) = origin.as_deref() {
        apply_cors(&state.args, origin, &mut response);
    }

    info!("[{}] {} {} {}", addr, method, path, response.status().as_u16());

    Ok(response)
}

/// Dispatch one request against the in-memory state
pub fn route(
    state: &AppState,
    method: &Method,
    path: &str,
    query: Option<&str>,
    body: &[u8],
) -> Response<Full<Bytes>> {
    if method == Method::OPTIONS {
        return preflight_response();
    }

    let decoded = path_segments(path);
    let segments: Vec<&str> = decoded.iter().map(|s| s.as_ref()).collect();

    match (method.clone(), segments.as_slice()) {
        (Method::GET, []) => routes::root(),
        (Method::GET, ["health"]) => routes::health_check(),
        (Method::GET, ["version"]) => routes::version_info(),

        (Method::GET, ["config"]) => routes::get_config(&state.catalogue),
        (Method::GET, ["systems"]) => routes::list_systems(&state.catalogue),
        (Method::GET, ["systems", system_id]) => routes::get_system(&state.catalogue, system_id),
        (Method::GET, ["systems", system_id, "forms", step]) => {
            routes::get_form(&state.catalogue, system_id, step)
        }

        (Method::GET, ["owning-teams"]) => routes::list_owning_teams(),
        (Method::POST, ["validate", "display-name"]) => {
            routes::validate_display_name(&state.display_names, body)
        }
        (Method::GET, ["tree"]) | (Method::GET, ["nodeApi", "node"]) => routes::get_tree(query),

        (_, known) if is_known_path(known) => {
            routes::error_response(&ServiceError::MethodNotAllowed("Method Not Allowed".into()))
        }
        _ => routes::error_response(&ServiceError::NotFound("Not Found".into())),
    }
}

fn is_known_path(segments: &[&str]) -> bool {
    matches!(
        segments,
        []
            | ["health"]
            | ["version"]
            | ["config"]
            | ["systems"]
            | ["systems", _]
            | ["systems", _, "forms", _]
            | ["owning-teams"]
            | ["validate", "display-name"]
            | ["tree"]
            | ["nodeApi", "node"]
    )
}

/// Split a request path into percent-decoded segments
fn path_segments(path: &str) -> Vec<Cow<'_, str>> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::decode(s).unwrap_or(Cow::Borrowed(s)))
        .collect()
}

/// Reflect an allowed origin back with credentials enabled
fn apply_cors(args: &Args, origin: &str, response: &mut Response<Full<Bytes>>) {
    if !args.is_allowed_origin(origin) {
        return;
    }
    let Ok(value) = HeaderValue::from_str(origin) else {
        return;
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
}

/// CORS preflight response
fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS")
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization")
        .header(header::ACCESS_CONTROL_MAX_AGE, "600")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::{json, Value};

    fn state() -> AppState {
        let args = Args::try_parse_from(["entity-config"]).unwrap();
        AppState::new(args, Catalogue::embedded().unwrap())
    }

    async fn call(
        state: &AppState,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: &[u8],
    ) -> (StatusCode, Value) {
        let response = route(state, &method, path, query, body);
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(state: &AppState, path: &str) -> (StatusCode, Value) {
        call(state, Method::GET, path, None, b"").await
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let state = state();

        assert_eq!(get(&state, "/health").await, (StatusCode::OK, json!({"status": "ok"})));
        let (status, body) = get(&state, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_version_reports_package() {
        let (status, body) = get(&state(), "/version").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
        assert_eq!(body["service"], json!("entity-config"));
        assert!(body.get("buildTime").is_some());
    }

    #[tokio::test]
    async fn test_systems_listing_matches_config() {
        let state = state();

        let (_, config) = get(&state, "/config").await;
        let (status, systems) = get(&state, "/systems").await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = systems
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap().to_string())
            .collect();
        let keys: Vec<_> = config["systems"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(ids, keys);
    }

    #[tokio::test]
    async fn test_unknown_system_and_step() {
        let state = state();

        assert_eq!(
            get(&state, "/systems/does-not-exist").await,
            (StatusCode::NOT_FOUND, json!({"detail": "System not found"}))
        );
        assert_eq!(
            get(&state, "/systems/does-not-exist/forms/system").await,
            (StatusCode::NOT_FOUND, json!({"detail": "System not found"}))
        );
        assert_eq!(
            get(&state, "/systems/general/forms/monitor").await,
            (StatusCode::NOT_FOUND, json!({"detail": "Form not found for step"}))
        );
    }

    #[tokio::test]
    async fn test_general_form_is_resolved_per_system() {
        let state = state();

        let (status, eck) = get(&state, "/systems/eck/forms/general").await;
        let (_, redis) = get(&state, "/systems/redis/forms/general").await;

        assert_eq!(status, StatusCode::OK);
        let eck_options = &eck["uiSchema"]["displayName"]["ui:options"];
        assert_eq!(eck_options["colSpan"], json!(6));
        assert!(eck_options["asyncValidation"].is_object());
        assert_eq!(redis["uiSchema"]["displayName"]["ui:options"], json!({"colSpan": 6}));
        assert_eq!(redis["initialData"]["entityType"], json!("Redis"));
    }

    #[tokio::test]
    async fn test_path_segments_are_decoded() {
        let (status, body) = get(&state(), "/systems/%72edis").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], json!("redis"));
    }

    #[tokio::test]
    async fn test_display_name_validation() {
        let state = state();

        let (status, body) = call(
            &state,
            Method::POST,
            "/validate/display-name",
            None,
            br#"{"value": "eck production"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"exists": true, "valid": false, "message": "Display name already exists"})
        );

        let (status, body) =
            call(&state, Method::POST, "/validate/display-name", None, b"{").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_tree_routes() {
        let state = state();

        let (status, tree) = get(&state, "/tree").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tree.as_array().unwrap().len(), 3);

        let (_, node) =
            call(&state, Method::GET, "/nodeApi/node", Some("rootId=root-1-0&TreeDepth=1"), b"")
                .await;
        assert_eq!(node[0]["VID"], json!("root-1-0-1-0"));
        assert_eq!(node[0]["children"], json!([]));

        let (status, _) = call(&state, Method::GET, "/tree", Some("TreeDepth=x"), b"").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_and_wrong_method() {
        let state = state();

        assert_eq!(
            get(&state, "/nope").await,
            (StatusCode::NOT_FOUND, json!({"detail": "Not Found"}))
        );
        assert_eq!(
            call(&state, Method::POST, "/systems", None, b"").await,
            (StatusCode::METHOD_NOT_ALLOWED, json!({"detail": "Method Not Allowed"}))
        );
    }

    #[tokio::test]
    async fn test_cors_only_for_allowed_origins() {
        let state = state();

        let mut allowed = route(&state, &Method::GET, "/health", None, b"");
        apply_cors(&state.args, "http://localhost:5173", &mut allowed);
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(allowed.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

        let mut denied = route(&state, &Method::GET, "/health", None, b"");
        apply_cors(&state.args, "http://evil.example", &mut denied);
        assert!(denied.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

        let preflight = route(&state, &Method::OPTIONS, "/anything", None, b"");
        assert_eq!(preflight.status(), StatusCode::OK);
    }
}
