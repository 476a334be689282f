//! # Panolot Viewer
//!
//! Abstraction over the 360° panorama viewer the annotation engine draws
//! on. The real projection engine is an external collaborator; this crate
//! models only the capability set the engine consumes: a marker store
//! keyed by tagged marker identities, zoom level, and pointer/zoom events.
//!
//! The [`MemoryViewer`] implementation backs tests and headless runs.

pub mod events;
pub mod marker;
pub mod memory;
pub mod viewer;

pub use events::ViewerEvent;
pub use marker::{
    Anchor, MarkerDescriptor, MarkerId, MarkerKind, MarkerPatch, MarkerPayload, MarkerShape,
    SvgStyle,
};
pub use memory::MemoryViewer;
pub use viewer::PanoramaViewer;
