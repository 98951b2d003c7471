//! Component definitions and their connection slots.

use wam_core::{Category, ComponentType};
use wam_model::ComponentProperties;

use crate::schema::PropertySchema;

/// Where on the component a slot sits, in the editor's orientation terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotDirection {
    Left,
    Right,
    Inlet,
    Outlet,
    Bidirectional,
}

/// A named connection point declared by a definition.
///
/// `node_number` is the OpenWAM-native junction label a fresh instance
/// starts with; the rules engine reads the live value from the instance's
/// properties, not from here.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSlot {
    pub name: &'static str,
    pub direction: SlotDirection,
    pub node_number: i64,
    pub allowed_partners: Vec<Category>,
    pub max_connections: usize,
}

impl NodeSlot {
    pub fn new(
        name: &'static str,
        direction: SlotDirection,
        allowed_partners: Vec<Category>,
        max_connections: usize,
    ) -> Self {
        Self {
            name,
            direction,
            node_number: 0,
            allowed_partners,
            max_connections,
        }
    }
}

/// Immutable registry entry for one component kind.
///
/// Constructed once at startup; `Registry::register` replaces an entry
/// wholesale, individual fields are never mutated in place.
#[derive(Debug, Clone)]
pub struct ComponentDefinition {
    pub kind: ComponentType,
    pub category: Category,
    pub name: &'static str,
    pub description: &'static str,
    pub slots: Vec<NodeSlot>,
    pub defaults: ComponentProperties,
    pub schema: PropertySchema,
}

impl ComponentDefinition {
    pub fn slot(&self, name: &str) -> Option<&NodeSlot> {
        self.slots.iter().find(|s| s.name == name)
    }
}
