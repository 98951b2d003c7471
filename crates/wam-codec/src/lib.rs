//! wam-codec: the WAM positional text format.
//!
//! Provides:
//! - `TokenCursor`: the sequential whitespace tokenizer both directions of
//!   the codec are defined against
//! - `parse`: WAM text to `ParsedDocument`
//! - `to_engine_model`: parsed document to visual model (fresh ids, grid
//!   layout, node-based connection inference)
//! - `generate`: `EngineModel` plus `GenerationConfig` to WAM text
//!
//! The format is the wire contract with the external simulator: strictly
//! positional, whitespace-tokenized, with field presence conditional on
//! earlier values. Token meaning must be preserved exactly; whitespace
//! layout is free.

pub mod convert;
pub mod cursor;
pub mod document;
pub mod error;
pub mod generator;
pub mod parser;

pub use convert::to_engine_model;
pub use cursor::TokenCursor;
pub use document::{EngineGeneral, GeneralData, GenerationConfig, ParsedDocument, ParsedPlenum};
pub use error::{CursorError, GenerationError, ParseCause, ParseError};
pub use generator::generate;
pub use parser::parse;
