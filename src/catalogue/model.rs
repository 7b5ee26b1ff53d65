//! Catalogue data model
//!
//! Wire shapes are camelCase to match what the form-rendering front end reads.
//! Maps are insertion ordered: system listing order and schema property
//! order both come straight from the authored catalogue.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON object. Schemas, UI hints and initial data are all free-form objects.
pub type JsonObject = serde_json::Map<String, Value>;

/// JSON-Schema-like form definition plus UI hints and default values.
///
/// Served as `FormDefinition`: `{schema, uiSchema?, initialData?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFragment {
    pub schema: JsonObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_schema: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_data: Option<JsonObject>,
}

impl SchemaFragment {
    /// Names declared under `schema.properties`
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties()
            .into_iter()
            .flat_map(|props| props.keys().map(String::as_str))
    }

    pub fn properties(&self) -> Option<&JsonObject> {
        self.schema.get("properties").and_then(Value::as_object)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties().is_some_and(|props| props.contains_key(name))
    }

    /// `uiSchema` keys that target a field no property declares.
    ///
    /// Top-level `ui:*` directives (e.g. `ui:order`) are not field references.
    pub fn orphaned_ui_fields(&self) -> Vec<&str> {
        let Some(ui_schema) = &self.ui_schema else {
            return Vec::new();
        };
        ui_schema
            .keys()
            .map(String::as_str)
            .filter(|key| !key.starts_with("ui:") && !self.has_property(key))
            .collect()
    }
}

/// A provisionable/monitorable entity kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemDefinition {
    pub id: String,
    pub label: String,
    /// Display grouping; not required to name a [`CategoryDefinition`]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Step name -> form. A static `general` entry is never served.
    pub forms: IndexMap<String, SchemaFragment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubMenu {
    pub label: String,
    pub system_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDefinition {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub system_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_menus: Option<Vec<SubMenu>>,
}

impl CategoryDefinition {
    /// Every system id the category lists, top level first, then sub-menus
    pub fn all_system_ids(&self) -> impl Iterator<Item = &str> {
        self.system_ids
            .iter()
            .chain(self.sub_menus.iter().flatten().flat_map(|menu| &menu.system_ids))
            .map(String::as_str)
    }
}

/// Ordered sequence of step names walked to complete a purpose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub id: String,
    pub label: String,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The assembled, immutable catalogue snapshot served by `/config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    pub steps: IndexMap<String, StepDefinition>,
    pub flows: IndexMap<String, FlowDefinition>,
    pub categories: Vec<CategoryDefinition>,
    pub systems: IndexMap<String, SystemDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn monitor_form() -> SchemaFragment {
        serde_json::from_value(json!({
            "schema": {
                "title": "Redis",
                "type": "object",
                "required": ["cluster"],
                "properties": {
                    "cluster": {"type": "string", "title": "Cluster"},
                    "db_name": {"type": "string", "title": "DB Name"}
                }
            },
            "uiSchema": {
                "ui:order": ["db_name", "cluster"],
                "cluster": {"ui:options": {"colSpan": 6}}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_system_definition_round_trip() {
        let mut forms = IndexMap::new();
        forms.insert("monitor".to_string(), monitor_form());
        let system = SystemDefinition {
            id: "redis".to_string(),
            label: "Redis".to_string(),
            category: "databases".to_string(),
            icon: Some("SiRedis".to_string()),
            description: None,
            forms,
        };

        let wire = serde_json::to_string(&system).unwrap();
        let parsed: SystemDefinition = serde_json::from_str(&wire).unwrap();

        assert_eq!(parsed, system);
    }

    #[test]
    fn test_absent_optionals_are_omitted_on_the_wire() {
        let form = SchemaFragment {
            schema: JsonObject::new(),
            ui_schema: None,
            initial_data: None,
        };
        assert_eq!(serde_json::to_value(&form).unwrap(), json!({"schema": {}}));
    }

    #[test]
    fn test_property_order_is_preserved() {
        let form = monitor_form();
        let names: Vec<_> = form.property_names().collect();
        assert_eq!(names, vec!["cluster", "db_name"]);
    }

    #[test]
    fn test_orphaned_ui_fields_ignore_directives() {
        let mut form = monitor_form();
        assert!(form.orphaned_ui_fields().is_empty());

        form.ui_schema
            .as_mut()
            .unwrap()
            .insert("hostname".to_string(), json!({"ui:autofocus": true}));
        assert_eq!(form.orphaned_ui_fields(), vec!["hostname"]);
    }

    #[test]
    fn test_category_lists_sub_menu_systems() {
        let category: CategoryDefinition = serde_json::from_value(json!({
            "id": "databases",
            "label": "Databases",
            "systemIds": ["redis"],
            "subMenus": [{"label": "Search", "systemIds": ["eck", "splunk"]}]
        }))
        .unwrap();

        let ids: Vec<_> = category.all_system_ids().collect();
        assert_eq!(ids, vec!["redis", "eck", "splunk"]);
    }

    #[test]
    fn test_system_without_forms_is_rejected() {
        let result = serde_json::from_value::<SystemDefinition>(json!({
            "id": "redis",
            "label": "Redis",
            "category": "databases"
        }));
        assert!(result.is_err());
    }
}
