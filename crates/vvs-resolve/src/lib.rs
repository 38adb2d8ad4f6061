//! Resolution of what a folder (or a selection inside it) should open as:
//! a saved session that is still fresh, or the loadable files themselves.

pub mod freshness;
pub mod listing;
pub mod loadable;
pub mod resolver;
pub mod selection;
pub mod sources;
pub mod urls;

pub use freshness::{Touched, last_opened_value, newest_doc, touched_time};
pub use listing::{FileRef, folder_files, item_files};
pub use loadable::LoadableRules;
pub use resolver::{Resolution, ResolvedSession, resolve_files, resolve_session_download};
pub use selection::{
    SelectionSet, linked_resources, linked_resources_meta, matches_selection_set, parse_id_list,
    session_meta,
};
pub use sources::{folder_sources, item_sources};
pub use urls::{ResourceLink, ResourceManifest, config_url, file_download_url, files_to_manifest};
