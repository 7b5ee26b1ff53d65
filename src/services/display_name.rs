//! Display-name uniqueness check
//!
//! Stand-in for the entity directory: a fixed set of names already in use.
//! A taken name is a normal result, not an error.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Names already registered in the directory
pub const TAKEN_DISPLAY_NAMES: &[&str] = &[
    "ECK Production",
    "ECK Staging",
    "Redis Cache",
    "Kafka Main",
    "Payments API",
    "Core Billing DB",
];

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayNameRequest {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayNameCheck {
    pub exists: bool,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Case-insensitive set of taken display names
#[derive(Debug, Clone)]
pub struct DisplayNameRegistry {
    taken: HashSet<String>,
}

impl Default for DisplayNameRegistry {
    fn default() -> Self {
        Self::new(TAKEN_DISPLAY_NAMES.iter().copied())
    }
}

impl DisplayNameRegistry {
    pub fn new<'a>(taken: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            taken: taken.into_iter().map(normalize).collect(),
        }
    }

    pub fn check(&self, value: &str) -> DisplayNameCheck {
        let name = normalize(value);

        if name.is_empty() {
            return DisplayNameCheck {
                exists: false,
                valid: false,
                message: Some("Display name is required".to_string()),
            };
        }

        if self.taken.contains(&name) {
            return DisplayNameCheck {
                exists: true,
                valid: false,
                message: Some("Display name already exists".to_string()),
            };
        }

        DisplayNameCheck {
            exists: false,
            valid: true,
            message: None,
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
