//! Tool settings and hierarchical viewer configuration.
//!
//! Viewer configuration files are YAML documents stored as items inside
//! folders. A folder's effective configuration is found by walking up the
//! folder tree; documents may opt into inheriting from the level above and
//! carry per-group and per-role overrides.

pub mod access;
pub mod document;
pub mod hierarchy;
pub mod merge;
pub mod paths;
pub mod resolver;
pub mod settings;

pub use access::apply_user_context;
pub use document::{Document, parse_document};
pub use hierarchy::HierarchyLevels;
pub use merge::merge_documents;
pub use resolver::resolve_config;
pub use settings::{ConfigSettings, ServerSettings, SessionSettings, Settings};
