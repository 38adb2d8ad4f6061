//! VolView session manifests: data model, copy-on-write builder, and the
//! serializer that packages a manifest with its binary attachments.

pub mod annotation;
pub mod builder;
pub mod ids;
pub mod model;
pub mod segments;
pub mod serialize;
pub mod session;

pub use annotation::{Annotation, ToolKind, add_annotation};
pub use builder::{
    DataSourceInput, add_dataset, add_embedded_segment_group, add_segment_group,
    create_manifest,
};
pub use model::{
    DEFAULT_DATASET_ID, DataSource, Dataset, FrameOfReference, Geometry, Label, MANIFEST_VERSION,
    Manifest, Point3, SegmentGroupEntry, SegmentGroupMetadata, SegmentMask, Segments, ToolEntry,
    ToolGroup,
};
pub use segments::SEGMENT_COLORS;
pub use serialize::{
    SessionPackage, package_session, parse_manifest, serialize_manifest, unpack_session,
};
pub use session::{GeneratedSession, LabelMapInput, generate_session};
