//! # Panolot Annotator
//!
//! The interactive annotation engine: a mode-based drawing state machine
//! over spherical coordinates, with point snapping between shapes, live
//! elastic-band feedback, zoom-adaptive stroke scaling and a persistence
//! bridge that keeps the rendered marker set in sync with the backend.
//!
//! ## Architecture
//!
//! ```text
//! viewer events ──► Annotator (transition machine) ──► Effects
//!                        │                               │
//!                        └── Session (mode, draft,       ├── marker ops → PanoramaViewer
//!                            snap target, editing)       ├── commits    → ElementStore
//!                                                        └── reload     → projection + restyle
//! ```
//!
//! The machine is a pure transition over an explicit [`session::Session`]
//! value: `(state, event) -> commands`. Side effects live in the
//! [`engine::AnnotationEngine`], which executes commands against a viewer
//! and a store, making every transition testable without either.

pub mod bridge;
pub mod effects;
pub mod engine;
pub mod events;
pub mod machine;
pub mod projection;
pub mod reconcile;
pub mod scale_sync;
pub mod session;

pub use effects::Effect;
pub use engine::AnnotationEngine;
pub use events::InputEvent;
pub use machine::{Annotator, Context};
pub use reconcile::{EditorKind, LotAttributes, LotForm, PoiAttributes, PoiForm, RoadForm};
pub use session::{Draft, Mode, Session};
