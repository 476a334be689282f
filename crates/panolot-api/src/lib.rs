//! # Panolot API
//!
//! The persistence collaborator of the annotation engine. Defines the
//! stable wire record shape, encoding/decoding between wire records and
//! domain entities, the asynchronous [`ElementStore`] trait, an HTTP
//! implementation backed by `reqwest`, and an in-memory implementation
//! used by tests.

pub mod memory;
pub mod records;
pub mod store;

pub use memory::MemoryElementStore;
pub use records::{ElementPayload, ElementRecord, WireKind};
pub use store::{ElementStore, HttpElementStore};
