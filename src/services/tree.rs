//! Deterministic mock hierarchy for the attachment tree picker
//!
//! Every node has [`BRANCHING`] children until the requested depth is
//! reached. VIDs encode the path: `<parent>-<level>-<index>`.

use serde::{Deserialize, Serialize};

pub const BRANCHING: usize = 3;
pub const DEFAULT_DEPTH: usize = 3;
/// 3^6 leaves is the most a single request may expand to
pub const MAX_DEPTH: usize = 6;
pub const ROOT_ID: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(rename = "DisplayName")]
    pub display_name: String,
    #[serde(rename = "VID")]
    pub vid: String,
    pub children: Vec<TreeNode>,
}

/// Generate the children of `root_id`, `depth` levels deep (clamped to [`MAX_DEPTH`])
pub fn generate(root_id: &str, depth: usize) -> Vec<TreeNode> {
    let root = if root_id.is_empty() { ROOT_ID } else { root_id };
    level(root, 1, depth.min(MAX_DEPTH))
}

fn level(parent: &str, current: usize, depth: usize) -> Vec<TreeNode> {
    if current > depth {
        return Vec::new();
    }

    (0..BRANCHING)
        .map(|index| {
            let vid = format!("{parent}-{current}-{index}");
            TreeNode {
                display_name: format!("Node {vid}"),
                children: level(&vid, current + 1, depth),
                vid,
            }
        })
        .collect()
}
