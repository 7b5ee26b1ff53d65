//! Catalogue assembly
//!
//! Compiles the raw catalogue document into an [`EntityConfig`] plus the
//! general-form builder. Assembly is all-or-nothing: the first malformed or
//! dangling record aborts it with an [`AssemblyError`] naming the record.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::general::{
    FieldOverride, GeneralFormBuilder, GeneralOverrides, ENTITY_TYPE_FIELD, LINKS_FIELD,
    UI_OPTIONS,
};
use super::model::{
    CategoryDefinition, EntityConfig, FlowDefinition, SchemaFragment, StepDefinition,
    SystemDefinition,
};
use crate::types::AssemblyError;

/// Knobs for assembly strictness
#[derive(Debug, Clone, Copy, Default)]
pub struct AssemblyOptions {
    /// Reject `uiSchema` entries for fields the schema does not declare
    /// instead of logging a warning.
    pub strict_ui_schema: bool,
}

/// The four definition tables plus the general-form template, still untyped
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalogue {
    steps: IndexMap<String, Value>,
    flows: IndexMap<String, Value>,
    categories: Vec<Value>,
    systems: IndexMap<String, Value>,
    general_form: Value,
    #[serde(default)]
    general_overrides: IndexMap<String, Value>,
}

/// System record with forms left raw so each form error can carry its step name
#[derive(Debug, Deserialize)]
struct RawSystem {
    id: String,
    label: String,
    category: String,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    description: Option<String>,
    forms: IndexMap<String, Value>,
}

/// Output of a successful assembly
#[derive(Debug, Clone)]
pub struct Assembled {
    pub config: EntityConfig,
    pub general: GeneralFormBuilder,
}

/// Assemble a catalogue document
pub fn assemble(document: &str, options: AssemblyOptions) -> Result<Assembled, AssemblyError> {
    let raw: RawCatalogue = serde_json::from_str(document).map_err(AssemblyError::Parse)?;

    let steps = assemble_steps(raw.steps)?;
    let flows = assemble_flows(raw.flows, &steps)?;
    let systems = assemble_systems(raw.systems, options)?;
    let categories = assemble_categories(raw.categories, &systems)?;
    let general = assemble_general(raw.general_form, raw.general_overrides, &systems, options)?;

    debug!(
        steps = steps.len(),
        flows = flows.len(),
        categories = categories.len(),
        systems = systems.len(),
        overrides = general.overrides().len(),
        "Catalogue assembled"
    );

    Ok(Assembled {
        config: EntityConfig {
            steps,
            flows,
            categories,
            systems,
        },
        general,
    })
}

fn coerce<T: DeserializeOwned>(path: impl Into<String>, raw: Value) -> Result<T, AssemblyError> {
    serde_json::from_value(raw).map_err(|source| AssemblyError::MalformedRecord {
        path: path.into(),
        source,
    })
}

fn assemble_steps(
    raw: IndexMap<String, Value>,
) -> Result<IndexMap<String, StepDefinition>, AssemblyError> {
    raw.into_iter()
        .map(|(key, value)| {
            let step = coerce(format!("steps.{key}"), value)?;
            Ok((key, step))
        })
        .collect()
}

fn assemble_flows(
    raw: IndexMap<String, Value>,
    steps: &IndexMap<String, StepDefinition>,
) -> Result<IndexMap<String, FlowDefinition>, AssemblyError> {
    let mut flows = IndexMap::with_capacity(raw.len());

    for (key, value) in raw {
        let flow: FlowDefinition = coerce(format!("flows.{key}"), value)?;
        if flow.id != key {
            return Err(AssemblyError::IdMismatch {
                table: "flows",
                key,
                id: flow.id,
            });
        }
        if flow.steps.is_empty() {
            return Err(AssemblyError::EmptyFlow { flow: key });
        }
        if let Some(unknown) = flow.steps.iter().find(|step| !steps.contains_key(*step)) {
            return Err(AssemblyError::UnknownReference {
                path: format!("flows.{key}.steps"),
                kind: "step",
                id: unknown.clone(),
            });
        }
        flows.insert(key, flow);
    }

    Ok(flows)
}

fn assemble_systems(
    raw: IndexMap<String, Value>,
    options: AssemblyOptions,
) -> Result<IndexMap<String, SystemDefinition>, AssemblyError> {
    let mut systems = IndexMap::with_capacity(raw.len());

    for (key, value) in raw {
        let system: RawSystem = coerce(format!("systems.{key}"), value)?;
        if system.id != key {
            return Err(AssemblyError::IdMismatch {
                table: "systems",
                key,
                id: system.id,
            });
        }

        let mut forms = IndexMap::with_capacity(system.forms.len());
        for (step, raw_form) in system.forms {
            let path = format!("systems.{key}.forms.{step}");
            let form: SchemaFragment = coerce(path.as_str(), raw_form)?;
            check_ui_hints(&path, &form, options)?;
            forms.insert(step, form);
        }

        systems.insert(
            key,
            SystemDefinition {
                id: system.id,
                label: system.label,
                category: system.category,
                icon: system.icon,
                description: system.description,
                forms,
            },
        );
    }

    Ok(systems)
}

fn assemble_categories(
    raw: Vec<Value>,
    systems: &IndexMap<String, SystemDefinition>,
) -> Result<Vec<CategoryDefinition>, AssemblyError> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut categories = Vec::with_capacity(raw.len());

    for (index, value) in raw.into_iter().enumerate() {
        let category: CategoryDefinition = coerce(format!("categories[{index}]"), value)?;
        if !seen.insert(category.id.clone()) {
            return Err(AssemblyError::DuplicateId {
                table: "categories",
                id: category.id,
            });
        }
        if let Some(unknown) = category
            .all_system_ids()
            .find(|id| !systems.contains_key(*id))
        {
            return Err(AssemblyError::UnknownReference {
                path: format!("categories.{}", category.id),
                kind: "system",
                id: unknown.to_string(),
            });
        }
        categories.push(category);
    }

    Ok(categories)
}

fn assemble_general(
    raw_form: Value,
    raw_overrides: IndexMap<String, Value>,
    systems: &IndexMap<String, SystemDefinition>,
    options: AssemblyOptions,
) -> Result<GeneralFormBuilder, AssemblyError> {
    let base: SchemaFragment = coerce("generalForm", raw_form)?;
    for required in [ENTITY_TYPE_FIELD, LINKS_FIELD] {
        if !base.has_property(required) {
            return Err(AssemblyError::InvalidGeneralTemplate(format!(
                "schema.properties must declare `{required}`"
            )));
        }
    }
    check_ui_hints("generalForm", &base, options)?;

    let mut overrides = GeneralOverrides::with_capacity(raw_overrides.len());
    for (system_id, raw_fields) in raw_overrides {
        if !systems.contains_key(&system_id) {
            return Err(AssemblyError::UnknownReference {
                path: "generalOverrides".to_string(),
                kind: "system",
                id: system_id,
            });
        }
        let fields: IndexMap<String, FieldOverride> =
            coerce(format!("generalOverrides.{system_id}"), raw_fields)?;
        for field in fields.keys() {
            check_override_target(&base, &system_id, field)?;
        }
        overrides.insert(system_id, fields);
    }

    Ok(GeneralFormBuilder::new(base, overrides))
}

/// An override may only target a declared field whose base UI entry is mergeable
fn check_override_target(
    base: &SchemaFragment,
    system: &str,
    field: &str,
) -> Result<(), AssemblyError> {
    let invalid = |reason: &str| AssemblyError::InvalidOverride {
        system: system.to_string(),
        field: field.to_string(),
        reason: reason.to_string(),
    };

    if !base.has_property(field) {
        return Err(invalid("field is not a property of the general form"));
    }

    match base.ui_schema.as_ref().and_then(|ui| ui.get(field)) {
        None => Ok(()),
        Some(Value::Object(directives)) => match directives.get(UI_OPTIONS) {
            None | Some(Value::Object(_)) => Ok(()),
            Some(_) => Err(invalid("base `ui:options` is not an object")),
        },
        Some(_) => Err(invalid("base uiSchema entry is not an object")),
    }
}

fn check_ui_hints(
    path: &str,
    form: &SchemaFragment,
    options: AssemblyOptions,
) -> Result<(), AssemblyError> {
    for field in form.orphaned_ui_fields() {
        if options.strict_ui_schema {
            return Err(AssemblyError::OrphanedUiHint {
                path: path.to_string(),
                field: field.to_string(),
            });
        }
        warn!(path, field, "UI hint targets a field the schema does not declare");
    }
    Ok(())
}
