//! Read-only queries over the assembled catalogue
//!
//! The `general` step is always resolved through the general-form builder,
//! even when a system's own forms table carries a static `general` entry.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::debug;

use crate::catalogue::{Catalogue, EntityConfig, SchemaFragment, SystemDefinition, GENERAL_STEP};
use crate::types::{Result, ServiceError};

/// Lookup surface handed to the request layer. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CatalogueService {
    catalogue: Arc<Catalogue>,
}

impl CatalogueService {
    pub fn new(catalogue: Arc<Catalogue>) -> Self {
        Self { catalogue }
    }

    /// The whole assembled snapshot
    pub fn config(&self) -> &EntityConfig {
        self.catalogue.config()
    }

    /// All systems, in catalogue order
    pub fn list_systems(&self) -> Vec<&SystemDefinition> {
        self.config().systems.values().collect()
    }

    pub fn get_system(&self, id: &str) -> Result<&SystemDefinition> {
        self.config()
            .systems
            .get(id)
            .ok_or_else(ServiceError::system_not_found)
    }

    /// Resolve the form for a system's step.
    ///
    /// Static forms are borrowed from the snapshot; the `general` form is
    /// built per call and returned owned.
    pub fn get_form(&self, system_id: &str, step: &str) -> Result<Cow<'_, SchemaFragment>> {
        let system = self.get_system(system_id)?;

        if step == GENERAL_STEP {
            debug!(
                system = system_id,
                overridden = self.catalogue.general_forms().has_override(system_id),
                "Resolving general form"
            );
            return Ok(Cow::Owned(self.catalogue.general_forms().build(system)));
        }

        system
            .forms
            .get(step)
            .map(Cow::Borrowed)
            .ok_or_else(ServiceError::form_not_found)
    }
}
