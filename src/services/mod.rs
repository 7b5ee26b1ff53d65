//! Services layer
//!
//! Request-time logic that sits between the routes and the catalogue.
//!
//! ## Services
//!
//! - **Lookup**: system, form and snapshot queries over the catalogue
//! - **DisplayName**: uniqueness check for the general form's display name
//! - **Tree**: deterministic mock hierarchy for the tree picker
//! - **Teams**: static owning-team list

pub mod display_name;
pub mod lookup;
pub mod teams;
pub mod tree;

pub use display_name::{DisplayNameCheck, DisplayNameRegistry, DisplayNameRequest};
pub use lookup::CatalogueService;
pub use teams::owning_teams;
pub use tree::TreeNode;
