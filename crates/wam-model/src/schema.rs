//! The engine model aggregate: components, connections, metadata.

use serde::{Deserialize, Serialize};
use wam_core::ComponentType;

use crate::properties::ComponentProperties;
use crate::report::ValidationResult;

/// Canvas position. Presentation only, no simulation meaning.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A live component instance in a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComponent {
    /// Caller-assigned, unique within a model.
    pub id: String,
    pub kind: ComponentType,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub rotation: f64,
    pub properties: ComponentProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// An edge between two component ports.
///
/// Directionless in practice: connection rules are checked in both
/// orientations, and the duplicate detector treats swapped endpoints as the
/// same edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    pub from_component: String,
    pub from_port: String,
    pub to_component: String,
    pub to_port: String,
    #[serde(default = "default_true")]
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Connection {
    pub fn new(
        id: impl Into<String>,
        from_component: impl Into<String>,
        from_port: impl Into<String>,
        to_component: impl Into<String>,
        to_port: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from_component: from_component.into(),
            from_port: from_port.into(),
            to_component: to_component.into(),
            to_port: to_port.into(),
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// True if either endpoint references the given component.
    pub fn touches(&self, component_id: &str) -> bool {
        self.from_component == component_id || self.to_component == component_id
    }
}

/// Model bookkeeping. Timestamps are RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created: String,
    pub modified: String,
    pub version: u32,
}

impl ModelMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            name: name.into(),
            description: String::new(),
            created: now.clone(),
            modified: now,
            version: crate::SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.modified = chrono::Utc::now().to_rfc3339();
    }
}

/// The aggregate root: the unit that is persisted, validated, and exported
/// to WAM text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineModel {
    pub metadata: ModelMetadata,
    #[serde(default)]
    pub components: Vec<ModelComponent>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_validation: Option<ValidationResult>,
}

impl EngineModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: ModelMetadata::new(name),
            components: Vec::new(),
            connections: Vec::new(),
            last_validation: None,
        }
    }

    pub fn component(&self, id: &str) -> Option<&ModelComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_mut(&mut self, id: &str) -> Option<&mut ModelComponent> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    pub fn add_component(&mut self, component: ModelComponent) {
        self.components.push(component);
        self.metadata.touch();
    }

    /// Remove a component and every connection touching it.
    ///
    /// Returns the removed component, or `None` if the id was unknown.
    pub fn remove_component(&mut self, id: &str) -> Option<ModelComponent> {
        let idx = self.components.iter().position(|c| c.id == id)?;
        let removed = self.components.remove(idx);
        self.connections.retain(|conn| !conn.touches(id));
        self.metadata.touch();
        Some(removed)
    }

    pub fn add_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
        self.metadata.touch();
    }

    pub fn remove_connection(&mut self, id: &str) -> Option<Connection> {
        let idx = self.connections.iter().position(|c| c.id == id)?;
        let removed = self.connections.remove(idx);
        self.metadata.touch();
        Some(removed)
    }

    /// All components of the pipe category that carry pipe properties.
    pub fn pipes(&self) -> impl Iterator<Item = (&ModelComponent, &crate::PipeProperties)> {
        self.components
            .iter()
            .filter_map(|c| c.properties.as_pipe().map(|p| (c, p)))
    }

    /// True if any boundary-category component exists in the model.
    pub fn has_boundary(&self) -> bool {
        self.components
            .iter()
            .any(|c| c.kind.category() == wam_core::Category::Boundary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::{BoundaryProperties, ComponentProperties};
    use wam_core::ComponentType;

    fn boundary(id: &str) -> ModelComponent {
        ModelComponent {
            id: id.to_string(),
            kind: ComponentType::OpenEnd,
            position: Position::default(),
            rotation: 0.0,
            properties: ComponentProperties::Boundary(BoundaryProperties { tipo_cc: 0 }),
            display_name: None,
        }
    }

    #[test]
    fn remove_component_cascades_connections() {
        let mut model = EngineModel::new("test");
        model.add_component(boundary("a"));
        model.add_component(boundary("b"));
        model.add_component(boundary("c"));
        model.add_connection(Connection::new("e1", "a", "pipe", "b", "pipe"));
        model.add_connection(Connection::new("e2", "b", "pipe", "c", "pipe"));

        model.remove_component("b");

        assert_eq!(model.components.len(), 2);
        assert!(model.connections.is_empty());
    }

    #[test]
    fn remove_unknown_component_is_none() {
        let mut model = EngineModel::new("test");
        assert!(model.remove_component("ghost").is_none());
    }
}
