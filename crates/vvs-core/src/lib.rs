//! Shared types for VolView session tooling: errors, the resource entity
//! graph, and the storage seam the resolvers read through.

pub mod error;
pub mod resource;
pub mod store;
pub mod types;

pub use error::AppError;
pub use resource::{FileEntry, Folder, Item, ParentRef, SESSION_EXTENSIONS, User};
pub use store::{MemoryStore, ResourceStore, StoreSnapshot};
pub use types::OutputFormat;
