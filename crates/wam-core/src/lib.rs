//! wam-core: stable foundation for the WAM model editor core.
//!
//! Contains the component type and category enums, with their OpenWAM
//! native class names.
//!
//! Everything downstream (model, registry, codec, validation) builds on the
//! closed type catalog defined here, so adding a component kind is a
//! compile-time-checked change everywhere it matters.

pub mod types;

// Re-exports: nice ergonomics for downstream crates
pub use types::{Category, ComponentType};
