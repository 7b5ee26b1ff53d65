//! System catalogue and form definitions
//!
//! - **model**: wire types (systems, categories, flows, steps, forms)
//! - **assembler**: compiles the raw catalogue document, fails fast on bad data
//! - **general**: per-system resolution of the shared `general` step form
//!
//! The catalogue is compiled once at startup into a [`Catalogue`] and only
//! read afterwards.

pub mod assembler;
pub mod general;
pub mod model;

use std::fmt;
use std::path::PathBuf;

pub use assembler::{assemble, Assembled, AssemblyOptions};
pub use general::{FieldOverride, GeneralFormBuilder, GeneralOverrides, GENERAL_STEP};
pub use model::{
    CategoryDefinition, EntityConfig, FlowDefinition, JsonObject, SchemaFragment, StepDefinition,
    SubMenu, SystemDefinition,
};

use crate::types::AssemblyError;

/// Catalogue document compiled into the binary
pub const EMBEDDED_CATALOGUE: &str = include_str!("../../data/catalogue.json");

/// Where the catalogue document is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueSource {
    Embedded,
    File(PathBuf),
}

impl fmt::Display for CatalogueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => f.write_str("embedded"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Assembled catalogue: the served snapshot plus the general-form builder
#[derive(Debug, Clone)]
pub struct Catalogue {
    config: EntityConfig,
    general: GeneralFormBuilder,
}

impl Catalogue {
    /// Read and assemble the catalogue from `source`
    pub fn load(source: &CatalogueSource, options: AssemblyOptions) -> Result<Self, AssemblyError> {
        match source {
            CatalogueSource::Embedded => Self::from_document(EMBEDDED_CATALOGUE, options),
            CatalogueSource::File(path) => {
                let document = std::fs::read_to_string(path)?;
                Self::from_document(&document, options)
            }
        }
    }

    /// Assemble the embedded catalogue
    pub fn embedded() -> Result<Self, AssemblyError> {
        Self::load(&CatalogueSource::Embedded, AssemblyOptions::default())
    }

    pub fn from_document(document: &str, options: AssemblyOptions) -> Result<Self, AssemblyError> {
        let Assembled { config, general } = assemble(document, options)?;
        Ok(Self { config, general })
    }

    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    pub fn general_forms(&self) -> &GeneralFormBuilder {
        &self.general
    }
}
