//! The component type registry.

use std::collections::{HashMap, HashSet};

use wam_core::{Category, ComponentType};
use wam_model::{ModelComponent, Position};

use crate::definition::ComponentDefinition;

/// Process-scoped catalog of component definitions.
///
/// Built once at startup (`catalog::standard()`) and passed by reference to
/// the parser, generator, and validator. No validation happens at
/// registration time; a garbage definition is accepted here and surfaces
/// errors later at validation or parse/generate time.
#[derive(Debug, Default)]
pub struct Registry {
    definitions: HashMap<ComponentType, ComponentDefinition>,
    categories: HashSet<Category>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a definition, overwriting any existing entry for its type.
    pub fn register(&mut self, definition: ComponentDefinition) {
        self.categories.insert(definition.category);
        self.definitions.insert(definition.kind, definition);
    }

    /// Look up a definition. Unknown types are `None`, never a panic.
    pub fn lookup(&self, kind: ComponentType) -> Option<&ComponentDefinition> {
        self.definitions.get(&kind)
    }

    /// All definitions in a category, sorted by display name for
    /// deterministic listings.
    pub fn by_category(&self, category: Category) -> Vec<&ComponentDefinition> {
        let mut defs: Vec<_> = self
            .definitions
            .values()
            .filter(|d| d.category == category)
            .collect();
        defs.sort_by_key(|d| d.name);
        defs
    }

    /// Case-insensitive substring search over name, description, and tag.
    pub fn search(&self, text: &str) -> Vec<&ComponentDefinition> {
        let needle = text.to_lowercase();
        let mut hits: Vec<_> = self
            .definitions
            .values()
            .filter(|d| {
                d.name.to_lowercase().contains(&needle)
                    || d.description.to_lowercase().contains(&needle)
                    || d.kind.tag().contains(&needle)
            })
            .collect();
        hits.sort_by_key(|d| d.name);
        hits
    }

    /// Create a live component from a definition's defaults.
    ///
    /// The default property set is deep-copied and the given id stamped in.
    /// Returns `None` for unregistered types.
    pub fn instantiate(
        &self,
        kind: ComponentType,
        id: impl Into<String>,
        position: Position,
    ) -> Option<ModelComponent> {
        let def = self.lookup(kind)?;
        Some(ModelComponent {
            id: id.into(),
            kind,
            position,
            rotation: 0.0,
            properties: def.defaults.clone(),
            display_name: Some(def.name.to_string()),
        })
    }

    pub fn known_categories(&self) -> &HashSet<Category> {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn lookup_unknown_type_in_empty_registry() {
        let registry = Registry::empty();
        assert!(registry.lookup(ComponentType::Pipe).is_none());
        assert!(registry.instantiate(ComponentType::Pipe, "p1", Position::default()).is_none());
    }

    #[test]
    fn register_overwrites_by_type_key() {
        let mut registry = catalog::standard();
        let before = registry.len();

        let mut replacement = registry.lookup(ComponentType::Pipe).unwrap().clone();
        replacement.description = "replaced";
        registry.register(replacement);

        assert_eq!(registry.len(), before);
        assert_eq!(
            registry.lookup(ComponentType::Pipe).unwrap().description,
            "replaced"
        );
    }

    #[test]
    fn search_is_case_insensitive() {
        let registry = catalog::standard();
        let hits = registry.search("PLENUM");
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|d| {
            d.name.to_lowercase().contains("plenum")
                || d.description.to_lowercase().contains("plenum")
                || d.kind.tag().contains("plenum")
        }));
    }

    #[test]
    fn instantiate_stamps_id_and_copies_defaults() {
        let registry = catalog::standard();
        let a = registry
            .instantiate(ComponentType::Pipe, "a", Position::new(1.0, 2.0))
            .unwrap();
        let b = registry
            .instantiate(ComponentType::Pipe, "b", Position::default())
            .unwrap();

        assert_eq!(a.id, "a");
        assert_eq!(a.position, Position::new(1.0, 2.0));
        // Independent deep copies of the default property set.
        assert_eq!(a.properties, b.properties);
    }
}
