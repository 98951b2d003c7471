//! Whole-model validation over realistic topologies, including models that
//! arrive through the WAM codec import path.

use wam_codec::{GenerationConfig, generate, parse, to_engine_model};
use wam_core::ComponentType;
use wam_model::{ComponentProperties, Connection, EngineModel, ErrorKind, Position};
use wam_registry::Registry;
use wam_validate::{RuleTable, validate_connection, validate_model};

fn setup() -> (Registry, RuleTable) {
    (wam_registry::standard(), RuleTable::standard())
}

fn add(registry: &Registry, model: &mut EngineModel, kind: ComponentType, id: &str) {
    let component = registry
        .instantiate(kind, id, Position::default())
        .unwrap();
    model.add_component(component);
}

fn pipe_with_nodes(registry: &Registry, model: &mut EngineModel, id: &str, left: i64, right: i64) {
    add(registry, model, ComponentType::Pipe, id);
    if let Some(c) = model.component_mut(id) {
        if let ComponentProperties::Pipe(p) = &mut c.properties {
            p.nodo_izq = left;
            p.nodo_der = right;
        }
    }
}

#[test]
fn terminated_pipe_model_is_fully_valid() {
    let (registry, rules) = setup();
    let mut model = EngineModel::new("intake");
    pipe_with_nodes(&registry, &mut model, "p1", 1, 2);
    add(&registry, &mut model, ComponentType::OpenEnd, "b1");
    add(&registry, &mut model, ComponentType::ClosedEnd, "b2");
    model.add_connection(Connection::new("e1", "p1", "left", "b1", "pipe"));
    model.add_connection(Connection::new("e2", "p1", "right", "b2", "pipe"));

    let result = validate_model(&model, &registry, &rules);
    assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
    assert!(result.warnings.is_empty());
}

#[test]
fn unknown_component_pair_is_rejected_by_default() {
    let (registry, rules) = setup();
    let sensor = registry
        .instantiate(ComponentType::Sensor, "s1", Position::default())
        .unwrap();
    let pipe = registry
        .instantiate(ComponentType::Pipe, "p1", Position::default())
        .unwrap();

    let check = validate_connection(&rules, &sensor, "signal", &pipe, "left");
    assert!(!check.is_valid);
    assert!(check.errors[0].contains("no rule found"));
}

#[test]
fn joined_boundaries_report_the_rule_reason() {
    let (registry, rules) = setup();
    let mut model = EngineModel::new("t");
    add(&registry, &mut model, ComponentType::OpenEnd, "b1");
    add(&registry, &mut model, ComponentType::ClosedEnd, "b2");
    model.add_connection(Connection::new("e1", "b1", "pipe", "b2", "pipe"));

    let result = validate_model(&model, &registry, &rules);
    assert!(result
        .errors
        .iter()
        .any(|e| e.message.contains("boundary conditions cannot connect to each other")));
}

#[test]
fn four_pipe_ends_on_one_node_exceed_the_limit() {
    let (registry, rules) = setup();
    let mut model = EngineModel::new("t");
    for (i, id) in ["p1", "p2", "p3", "p4"].iter().enumerate() {
        pipe_with_nodes(&registry, &mut model, id, 7, 10 + i as i64);
    }
    add(&registry, &mut model, ComponentType::OpenEnd, "b1");

    let result = validate_model(&model, &registry, &rules);
    assert!(result
        .errors
        .iter()
        .any(|e| e.message.contains("node 7") && e.message.contains("maximum 3")));
}

#[test]
fn control_loop_is_reported_as_a_closed_path() {
    let (registry, rules) = setup();
    let mut model = EngineModel::new("t");
    for id in ["s1", "c1", "a1"] {
        add(&registry, &mut model, ComponentType::Sensor, id);
    }
    model.add_connection(Connection::new("e1", "s1", "signal", "c1", "signal"));
    model.add_connection(Connection::new("e2", "c1", "signal", "a1", "signal"));
    model.add_connection(Connection::new("e3", "a1", "signal", "s1", "signal"));

    let result = validate_model(&model, &registry, &rules);
    let cycle_errors: Vec<_> = result
        .errors
        .iter()
        .filter(|e| e.message.contains("circular reference"))
        .collect();
    assert_eq!(cycle_errors.len(), 1);
    assert!(cycle_errors[0].message.contains("s1 -> c1 -> a1 -> s1"));
}

#[test]
fn redundant_connection_is_flagged_exactly_once() {
    let (registry, rules) = setup();
    let mut model = EngineModel::new("t");
    pipe_with_nodes(&registry, &mut model, "p1", 1, 2);
    add(&registry, &mut model, ComponentType::OpenEnd, "b1");
    add(&registry, &mut model, ComponentType::ClosedEnd, "b2");
    model.add_connection(Connection::new("e1", "p1", "left", "b1", "pipe"));
    model.add_connection(Connection::new("e2", "p1", "right", "b2", "pipe"));
    model.add_connection(Connection::new("e3", "b1", "pipe", "p1", "left"));

    let result = validate_model(&model, &registry, &rules);
    let duplicates: Vec<_> = result
        .errors
        .iter()
        .filter(|e| e.message.contains("duplicate connection"))
        .collect();
    assert_eq!(duplicates.len(), 1);
}

#[test]
fn mismatched_pipe_diameters_fail_the_rule_condition() {
    let (registry, rules) = setup();
    let mut model = EngineModel::new("t");
    pipe_with_nodes(&registry, &mut model, "p1", 1, 2);
    pipe_with_nodes(&registry, &mut model, "p2", 2, 3);
    if let Some(c) = model.component_mut("p2") {
        if let ComponentProperties::Pipe(p) = &mut c.properties {
            p.d_ext_tramo = vec![0.5]; // ten times the p1 default
        }
    }
    add(&registry, &mut model, ComponentType::OpenEnd, "b1");
    model.add_connection(Connection::new("e1", "p1", "right", "p2", "left"));

    let result = validate_model(&model, &registry, &rules);
    assert!(result
        .errors
        .iter()
        .any(|e| e.kind == ErrorKind::Connection && e.message.contains("50%")));
}

#[test]
fn property_and_topology_errors_accumulate_in_one_pass() {
    let (registry, rules) = setup();
    let mut model = EngineModel::new("t");
    pipe_with_nodes(&registry, &mut model, "p1", 4, 4); // self loop
    if let Some(c) = model.component_mut("p1") {
        if let ComponentProperties::Pipe(p) = &mut c.properties {
            p.longitud_total = 0.0; // violates the length rule
        }
    }

    let result = validate_model(&model, &registry, &rules);
    assert!(result.errors.iter().any(|e| e.kind == ErrorKind::Property));
    assert!(result.errors.iter().any(|e| e.kind == ErrorKind::Connection));
    assert!(result.errors.iter().any(|e| e.kind == ErrorKind::Model));
}

#[test]
fn imported_wam_model_passes_validation() {
    let (registry, rules) = setup();
    let mut source = EngineModel::new("export");
    pipe_with_nodes(&registry, &mut source, "p1", 1, 2);
    pipe_with_nodes(&registry, &mut source, "p2", 2, 3);
    add(&registry, &mut source, ComponentType::OpenEnd, "b1");

    let text = generate(&source, &GenerationConfig::default()).unwrap();
    let doc = parse(&text).unwrap();
    let imported = to_engine_model(&doc, &registry);

    // The shared node becomes a stored pipe-to-pipe connection, which the
    // rule table must accept for equal default diameters.
    assert_eq!(imported.connections.len(), 1);
    let result = validate_model(&imported, &registry, &rules);
    assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
}
