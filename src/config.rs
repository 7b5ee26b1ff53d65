//! Configuration for the entity configuration service
//!
//! CLI arguments with environment fallbacks for the network and logging
//! settings. The catalogue itself is data, not configuration.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::catalogue::{AssemblyOptions, CatalogueSource};
use crate::logging::LogFormat;

/// Entity configuration service
///
/// Serves the system catalogue and the multi-step form definitions used by
/// the entity creation wizard.
#[derive(Parser, Debug, Clone)]
#[command(name = "entity-config")]
#[command(about = "Serves the entity system catalogue and form definitions")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "127.0.0.1:8000")]
    pub listen: SocketAddr,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Browser origins allowed to call the API (comma-separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "http://localhost:5173,http://127.0.0.1:5173"
    )]
    pub allowed_origins: Vec<String>,

    /// Catalogue JSON document to serve instead of the embedded one
    #[arg(long)]
    pub catalogue: Option<PathBuf>,

    /// Reject uiSchema entries that target undeclared fields
    #[arg(long, default_value = "false")]
    pub strict_ui_schema: bool,
}

impl Args {
    pub fn catalogue_source(&self) -> CatalogueSource {
        match &self.catalogue {
            Some(path) => CatalogueSource::File(path.clone()),
            None => CatalogueSource::Embedded,
        }
    }

    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            strict_ui_schema: self.strict_ui_schema,
        }
    }

    /// Check whether a request origin is on the CORS allow-list
    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        for origin in &self.allowed_origins {
            if origin.is_empty() {
                return Err("ALLOWED_ORIGINS contains an empty origin".to_string());
            }
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(format!("Origin `{}` must start with http:// or https://", origin));
            }
        }
        Ok(())
    }
}
