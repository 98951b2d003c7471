//! wam-model: the engine model schema and its JSON persistence.
//!
//! The `EngineModel` aggregate is the unit the rest of the system works on:
//! the validator reads it, the generator serializes it to WAM text, the
//! parser produces one from WAM text. JSON is its canonical persisted shape,
//! structural and order-irrelevant, unlike the positional WAM format.

pub mod properties;
pub mod report;
pub mod schema;

pub use properties::{
    BoundaryProperties, ComponentProperties, CompressorProperties, ControlProperties,
    EngineProperties, PipeProperties, PlenumProperties, ValveProperties, WallLayer,
};
pub use report::{ErrorKind, Severity, ValidationError, ValidationResult, ValidationWarning, WarningKind};
pub use schema::{Connection, EngineModel, ModelComponent, ModelMetadata, Position};

/// Current JSON schema version stamped into new models.
pub const SCHEMA_VERSION: u32 = 1;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported schema version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn load_json(path: &std::path::Path) -> ModelResult<EngineModel> {
    let content = std::fs::read_to_string(path)?;
    let model: EngineModel = serde_json::from_str(&content)?;
    if model.metadata.version > SCHEMA_VERSION {
        return Err(ModelError::UnsupportedVersion {
            version: model.metadata.version,
        });
    }
    Ok(model)
}

pub fn save_json(path: &std::path::Path, model: &EngineModel) -> ModelResult<()> {
    let content = serde_json::to_string_pretty(model)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Mint a fresh opaque component/connection id.
pub fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
