//! The model validator: property checks plus topology checks, merged into
//! one accumulated result.

use std::collections::BTreeMap;

use tracing::debug;
use wam_model::{EngineModel, ErrorKind, ModelComponent, ValidationError, ValidationResult};
use wam_registry::Registry;

use crate::cycles::find_cycles;
use crate::duplicates::check_duplicates;
use crate::nodes::check_node_system;
use crate::rules::{ConnectionCheck, RuleTable};

/// Check one prospective connection against the rule table.
pub fn validate_connection(
    rules: &RuleTable,
    from: &ModelComponent,
    from_port: &str,
    to: &ModelComponent,
    to_port: &str,
) -> ConnectionCheck {
    rules.evaluate(from, from_port, to, to_port)
}

/// Validate a whole model snapshot.
///
/// Nothing short-circuits: property errors do not suppress topology checks
/// and vice versa, so the caller always sees the full picture in one pass.
pub fn validate_model(
    model: &EngineModel,
    registry: &Registry,
    rules: &RuleTable,
) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    check_model_level(model, &mut errors);
    check_properties(model, registry, &mut errors);
    check_connections(model, registry, rules, &mut errors);

    let (node_errors, node_warnings) = check_node_system(model);
    errors.extend(node_errors);
    warnings.extend(node_warnings);

    for cycle in find_cycles(model) {
        errors.push(ValidationError::new(
            ErrorKind::Connection,
            cycle.first().cloned(),
            format!("circular reference: {}", cycle.join(" -> ")),
        ));
    }

    errors.extend(check_duplicates(model));

    debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        "validated model"
    );

    ValidationResult::from_parts(errors, warnings)
}

fn check_model_level(model: &EngineModel, errors: &mut Vec<ValidationError>) {
    if model.components.is_empty() {
        errors.push(ValidationError::new(
            ErrorKind::Model,
            None,
            "model is empty: it contains no components",
        ));
        return;
    }

    // Pipes need a pressure reference somewhere; a model made only of
    // interior elements cannot be simulated.
    if model.pipes().next().is_some() && !model.has_boundary() {
        errors.push(ValidationError::new(
            ErrorKind::Model,
            None,
            "model contains pipes but no boundary condition to terminate them",
        ));
    }
}

fn check_properties(model: &EngineModel, registry: &Registry, errors: &mut Vec<ValidationError>) {
    for component in &model.components {
        let Some(definition) = registry.lookup(component.kind) else {
            errors.push(ValidationError::new(
                ErrorKind::Property,
                Some(component.id.clone()),
                format!("unknown component type: {}", component.kind),
            ));
            continue;
        };

        for field in &definition.schema.fields {
            let Some(value) = (field.get)(&component.properties) else {
                if field.required {
                    errors.push(ValidationError::new(
                        ErrorKind::Property,
                        Some(component.id.clone()),
                        format!(
                            "required property {} is missing on component {}",
                            field.name, component.id
                        ),
                    ));
                }
                continue;
            };

            if value.kind() != field.kind {
                errors.push(ValidationError::new(
                    ErrorKind::Property,
                    Some(component.id.clone()),
                    format!(
                        "property {} on component {} has kind {:?}, expected {:?}",
                        field.name,
                        component.id,
                        value.kind(),
                        field.kind
                    ),
                ));
                continue;
            }

            for rule in &field.rules {
                if !rule.holds(&value, &component.properties) {
                    errors.push(ValidationError::new(
                        ErrorKind::Property,
                        Some(component.id.clone()),
                        format!("{}: {}", field.name, rule.message()),
                    ));
                }
            }
        }
    }
}

fn check_connections(
    model: &EngineModel,
    registry: &Registry,
    rules: &RuleTable,
    errors: &mut Vec<ValidationError>,
) {
    // (component id, port) -> stored connection count, for slot capacity.
    let mut port_usage: BTreeMap<(&str, &str), usize> = BTreeMap::new();

    for conn in &model.connections {
        let from = model.component(&conn.from_component);
        let to = model.component(&conn.to_component);

        let (Some(from), Some(to)) = (from, to) else {
            let missing = if from.is_none() {
                &conn.from_component
            } else {
                &conn.to_component
            };
            errors.push(ValidationError::new(
                ErrorKind::Connection,
                None,
                format!("connection {} references missing component {}", conn.id, missing),
            ));
            continue;
        };

        *port_usage
            .entry((conn.from_component.as_str(), conn.from_port.as_str()))
            .or_default() += 1;
        *port_usage
            .entry((conn.to_component.as_str(), conn.to_port.as_str()))
            .or_default() += 1;

        let check = rules.evaluate(from, &conn.from_port, to, &conn.to_port);
        for message in check.errors {
            errors.push(ValidationError::new(
                ErrorKind::Connection,
                Some(conn.from_component.clone()),
                message,
            ));
        }
    }

    for ((component_id, port), used) in port_usage {
        let Some(component) = model.component(component_id) else {
            continue;
        };
        let Some(slot) = registry
            .lookup(component.kind)
            .and_then(|d| d.slot(port))
        else {
            // Unknown ports surface through the rule table already.
            continue;
        };
        if used > slot.max_connections {
            errors.push(ValidationError::new(
                ErrorKind::Connection,
                Some(component_id.to_string()),
                format!(
                    "port {} of component {} holds {} connections (maximum {})",
                    port, component_id, used, slot.max_connections
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wam_core::ComponentType;
    use wam_model::{ComponentProperties, Connection, Position};
    use wam_registry::standard;

    fn setup() -> (Registry, RuleTable) {
        (standard(), RuleTable::standard())
    }

    #[test]
    fn empty_model_is_invalid() {
        let (registry, rules) = setup();
        let model = EngineModel::new("empty");

        let result = validate_model(&model, &registry, &rules);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.message.contains("empty")));
    }

    #[test]
    fn validation_is_idempotent() {
        let (registry, rules) = setup();
        let mut model = EngineModel::new("t");
        model.add_component(
            registry
                .instantiate(ComponentType::Pipe, "p1", Position::default())
                .unwrap(),
        );

        let first = validate_model(&model, &registry, &rules);
        let second = validate_model(&model, &registry, &rules);
        assert_eq!(first, second);
    }

    #[test]
    fn mismatched_section_arrays_are_rejected_not_truncated() {
        let (registry, rules) = setup();
        let mut model = EngineModel::new("t");
        let mut pipe = registry
            .instantiate(ComponentType::Pipe, "p1", Position::default())
            .unwrap();
        if let ComponentProperties::Pipe(p) = &mut pipe.properties {
            p.n_tramos = 3; // arrays still hold one entry each
        }
        let sections_before = pipe.properties.as_pipe().unwrap().l_tramo.len();
        model.add_component(pipe);
        model.add_component(
            registry
                .instantiate(ComponentType::OpenEnd, "b1", Position::default())
                .unwrap(),
        );

        let result = validate_model(&model, &registry, &rules);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.message.contains("n_tramos")));
        // The validator reports; it never repairs.
        assert_eq!(
            model.component("p1").unwrap().properties.as_pipe().unwrap().l_tramo.len(),
            sections_before
        );
    }

    #[test]
    fn wrong_property_variant_reports_missing_required_fields() {
        let (registry, rules) = setup();
        let mut model = EngineModel::new("t");
        let mut pipe = registry
            .instantiate(ComponentType::Pipe, "p1", Position::default())
            .unwrap();
        pipe.properties =
            ComponentProperties::Boundary(wam_model::BoundaryProperties { tipo_cc: 0 });
        model.add_component(pipe);
        model.add_component(
            registry
                .instantiate(ComponentType::OpenEnd, "b1", Position::default())
                .unwrap(),
        );

        let result = validate_model(&model, &registry, &rules);
        assert!(result.errors.iter().any(|e| {
            e.kind == ErrorKind::Property && e.message.contains("required property")
        }));
    }

    #[test]
    fn dangling_connection_is_reported() {
        let (registry, rules) = setup();
        let mut model = EngineModel::new("t");
        model.add_component(
            registry
                .instantiate(ComponentType::OpenEnd, "b1", Position::default())
                .unwrap(),
        );
        model.add_connection(Connection::new("e1", "b1", "pipe", "ghost", "left"));

        let result = validate_model(&model, &registry, &rules);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("missing component ghost")));
    }

    #[test]
    fn boundary_slot_capacity_is_enforced() {
        let (registry, rules) = setup();
        let mut model = EngineModel::new("t");
        for id in ["p1", "p2"] {
            model.add_component(
                registry
                    .instantiate(ComponentType::Pipe, id, Position::default())
                    .unwrap(),
            );
        }
        model.add_component(
            registry
                .instantiate(ComponentType::OpenEnd, "b1", Position::default())
                .unwrap(),
        );
        // A boundary terminates one pipe end; two connections overflow it.
        model.add_connection(Connection::new("e1", "p1", "left", "b1", "pipe"));
        model.add_connection(Connection::new("e2", "p2", "left", "b1", "pipe"));

        let result = validate_model(&model, &registry, &rules);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("maximum 1") && e.message.contains("b1")));
    }
}
