//! Entity configuration service
//!
//! Serves the catalogue of entity systems and the multi-step form definitions
//! (JSON Schema plus UI hints) that drive the entity creation wizard.
//!
//! ## Services
//!
//! - **Catalogue**: compiled once at startup from a JSON document, rejected if inconsistent
//! - **Lookup**: systems, the full snapshot, and per-step forms
//! - **General form**: one shared template, customised per system at request time
//! - **Stubs**: display-name uniqueness, owning teams and a mock hierarchy for the front end

pub mod catalogue;
pub mod config;
pub mod logging;
pub mod routes;
pub mod server;
pub mod services;
pub mod types;

pub use config::Args;
pub use server::{run, serve, AppState};
pub use types::{Result, ServiceError};
