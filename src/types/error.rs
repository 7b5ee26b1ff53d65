//! Error types
//!
//! Two families:
//! - [`AssemblyError`] is fatal and only ever produced while the catalogue is
//!   compiled at startup.
//! - [`ServiceError`] is per request and always converted into a JSON
//!   response at the request boundary.

use hyper::StatusCode;

/// Catalogue assembly failure. The service never starts with one of these.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("failed to read catalogue: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalogue document is malformed: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("{path}: {source}")]
    MalformedRecord {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{table}.{key}: record id `{id}` does not match its key")]
    IdMismatch {
        table: &'static str,
        key: String,
        id: String,
    },

    #[error("{table}: duplicate id `{id}`")]
    DuplicateId { table: &'static str, id: String },

    #[error("{path}: unknown {kind} `{id}`")]
    UnknownReference {
        path: String,
        kind: &'static str,
        id: String,
    },

    #[error("flows.{flow}: a flow needs at least one step")]
    EmptyFlow { flow: String },

    #[error("generalForm: {0}")]
    InvalidGeneralTemplate(String),

    #[error("generalOverrides.{system}.{field}: {reason}")]
    InvalidOverride {
        system: String,
        field: String,
        reason: String,
    },

    #[error("{path}.uiSchema: `{field}` is not a property of the schema")]
    OrphanedUiHint { path: String, field: String },
}

/// Per-request error surfaced to HTTP callers
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable detail, without the variant prefix
    pub fn detail(&self) -> &str {
        match self {
            Self::NotFound(detail)
            | Self::BadRequest(detail)
            | Self::MethodNotAllowed(detail)
            | Self::Internal(detail) => detail,
        }
    }

    pub fn system_not_found() -> Self {
        Self::NotFound("System not found".to_string())
    }

    pub fn form_not_found() -> Self {
        Self::NotFound("Form not found for step".to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("Invalid JSON: {}", err))
    }
}

/// Result type alias for request-time operations
pub type Result<T> = std::result::Result<T, ServiceError>;
