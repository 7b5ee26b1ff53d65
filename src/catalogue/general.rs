//! General-step form builder
//!
//! The `general` step form is shared boilerplate. Each request gets a fresh
//! copy of the base template with the requesting system's `ui:options`
//! overrides merged in and `initialData` seeded from the system label.
//!
//! The merge is narrow: per field, the override's `ui:options`
//! keys are inserted into the copied field's `ui:options` (override wins,
//! other base keys survive). Nothing else in the field descriptor is touched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::model::{JsonObject, SchemaFragment, SystemDefinition};

/// Step name resolved through [`GeneralFormBuilder`] instead of the system's own forms
pub const GENERAL_STEP: &str = "general";

/// Read-only field showing which system the entity is
pub const ENTITY_TYPE_FIELD: &str = "entityType";

/// Repeatable `{label, url}` array
pub const LINKS_FIELD: &str = "links";

pub const UI_OPTIONS: &str = "ui:options";

/// Partial UI customisation for one field of the general form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldOverride {
    #[serde(rename = "ui:options")]
    pub ui_options: JsonObject,
}

/// System id -> field name -> override
pub type GeneralOverrides = IndexMap<String, IndexMap<String, FieldOverride>>;

/// Builds the concrete `general` form served for a system
#[derive(Debug, Clone)]
pub struct GeneralFormBuilder {
    base: SchemaFragment,
    overrides: GeneralOverrides,
}

impl GeneralFormBuilder {
    /// Wrap an already validated template and override table
    pub fn new(base: SchemaFragment, overrides: GeneralOverrides) -> Self {
        Self { base, overrides }
    }

    pub fn base(&self) -> &SchemaFragment {
        &self.base
    }

    pub fn overrides(&self) -> &GeneralOverrides {
        &self.overrides
    }

    pub fn has_override(&self, system_id: &str) -> bool {
        self.overrides.contains_key(system_id)
    }

    /// Produce the general form for `system`. Never touches the base template.
    pub fn build(&self, system: &SystemDefinition) -> SchemaFragment {
        let mut form = self.base.clone();

        if let Some(fields) = self.overrides.get(&system.id) {
            apply_ui_overrides(&mut form, fields);
        }

        let initial = form.initial_data.get_or_insert_with(JsonObject::new);
        initial.insert(
            ENTITY_TYPE_FIELD.to_string(),
            Value::String(system.label.clone()),
        );
        initial.insert(LINKS_FIELD.to_string(), json!([{ "label": "", "url": "" }]));

        form
    }
}

fn apply_ui_overrides(form: &mut SchemaFragment, fields: &IndexMap<String, FieldOverride>) {
    let ui_schema = form.ui_schema.get_or_insert_with(JsonObject::new);

    for (field, field_override) in fields {
        let directives = object_entry(ui_schema, field);
        let options = object_entry(directives, UI_OPTIONS);
        for (key, value) in &field_override.ui_options {
            options.insert(key.clone(), value.clone());
        }
    }
}

/// Get `map[key]` as an object, creating (or replacing a non-object) as needed
fn object_entry<'a>(map: &'a mut JsonObject, key: &str) -> &'a mut JsonObject {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(JsonObject::new()));
    if !slot.is_object() {
        *slot = Value::Object(JsonObject::new());
    }
    slot.as_object_mut().expect("slot holds an object")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_template() -> SchemaFragment {
        serde_json::from_value(json!({
            "schema": {
                "type": "object",
                "required": ["displayName"],
                "properties": {
                    "displayName": {"type": "string", "title": "Display name"},
                    "entityType": {"type": "string", "title": "Entity type", "readOnly": true},
                    "links": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "label": {"type": "string"},
                                "url": {"type": "string", "format": "uri"}
                            }
                        }
                    }
                }
            },
            "uiSchema": {
                "displayName": {"ui:options": {"colSpan": 6}},
                "entityType": {"ui:readonly": true, "ui:options": {"colSpan": 6}}
            }
        }))
        .unwrap()
    }

    fn overrides() -> GeneralOverrides {
        serde_json::from_value(json!({
            "eck": {
                "displayName": {
                    "ui:options": {
                        "asyncValidation": {"route": "/validate/display-name", "debounceMs": 400}
                    }
                }
            }
        }))
        .unwrap()
    }

    fn system(id: &str, label: &str) -> SystemDefinition {
        SystemDefinition {
            id: id.to_string(),
            label: label.to_string(),
            category: "databases".to_string(),
            icon: None,
            description: None,
            forms: IndexMap::new(),
        }
    }

    fn display_name_options(form: &SchemaFragment) -> &JsonObject {
        form.ui_schema.as_ref().unwrap()["displayName"][UI_OPTIONS]
            .as_object()
            .unwrap()
    }

    #[test]
    fn test_override_merges_into_existing_ui_options() {
        let builder = GeneralFormBuilder::new(base_template(), overrides());

        let form = builder.build(&system("eck", "ECK"));
        let options = display_name_options(&form);

        assert_eq!(options["colSpan"], json!(6));
        assert_eq!(options["asyncValidation"]["route"], json!("/validate/display-name"));
    }

    #[test]
    fn test_system_without_override_gets_base_options_only() {
        let builder = GeneralFormBuilder::new(base_template(), overrides());

        let form = builder.build(&system("redis", "Redis"));

        assert_eq!(
            Value::Object(display_name_options(&form).clone()),
            json!({"colSpan": 6})
        );
    }

    #[test]
    fn test_override_does_not_leak_between_systems() {
        let builder = GeneralFormBuilder::new(base_template(), overrides());

        let first = builder.build(&system("eck", "ECK"));
        let other = builder.build(&system("redis", "Redis"));
        let again = builder.build(&system("eck", "ECK"));

        assert!(!display_name_options(&other).contains_key("asyncValidation"));
        assert_eq!(first, again);
        assert_eq!(builder.base(), &base_template());
    }

    #[test]
    fn test_initial_data_is_seeded_from_label() {
        let builder = GeneralFormBuilder::new(base_template(), GeneralOverrides::new());

        let form = builder.build(&system("redis", "Redis"));
        let initial = form.initial_data.unwrap();

        assert_eq!(initial[ENTITY_TYPE_FIELD], json!("Redis"));
        assert_eq!(initial[LINKS_FIELD], json!([{"label": "", "url": ""}]));
        assert!(builder.base().initial_data.is_none());
    }

    #[test]
    fn test_existing_initial_data_is_kept() {
        let mut base = base_template();
        let mut initial = JsonObject::new();
        initial.insert("displayName".to_string(), json!("draft"));
        base.initial_data = Some(initial);
        let builder = GeneralFormBuilder::new(base, GeneralOverrides::new());

        let form = builder.build(&system("redis", "Redis"));
        let initial = form.initial_data.unwrap();

        assert_eq!(initial["displayName"], json!("draft"));
        assert_eq!(initial[ENTITY_TYPE_FIELD], json!("Redis"));
    }

    #[test]
    fn test_override_creates_missing_ui_entries() {
        let mut base = base_template();
        base.ui_schema = None;
        let builder = GeneralFormBuilder::new(base, overrides());

        let form = builder.build(&system("eck", "ECK"));
        let options = display_name_options(&form);

        assert_eq!(options.len(), 1);
        assert!(options.contains_key("asyncValidation"));
    }

    #[test]
    fn test_override_key_wins_over_base_key() {
        let table: GeneralOverrides = serde_json::from_value(json!({
            "eck": {"displayName": {"ui:options": {"colSpan": 12}}}
        }))
        .unwrap();
        let builder = GeneralFormBuilder::new(base_template(), table);

        let form = builder.build(&system("eck", "ECK"));

        assert_eq!(display_name_options(&form)["colSpan"], json!(12));
    }

    #[test]
    fn test_override_rejects_keys_beyond_ui_options() {
        let result = serde_json::from_value::<GeneralOverrides>(json!({
            "eck": {"displayName": {"ui:options": {}, "ui:widget": "textarea"}}
        }));
        assert!(result.is_err());
    }
}
