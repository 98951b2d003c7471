//! wam-registry: the static catalog of component kinds.
//!
//! Provides:
//! - `ComponentDefinition` with connection slots, default properties, and a
//!   declared property schema
//! - the `Registry` (lookup / by_category / search / instantiate / register)
//! - `catalog::standard()` building the full catalog at startup
//!
//! The registry is immutable after init and passed explicitly to the codec
//! and validator; there is no global singleton.

pub mod catalog;
pub mod definition;
pub mod registry;
pub mod schema;

pub use catalog::standard;
pub use definition::{ComponentDefinition, NodeSlot, SlotDirection};
pub use registry::Registry;
pub use schema::{FieldKind, FieldRule, FieldSchema, FieldValue, PropertySchema};
