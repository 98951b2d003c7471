//! Bridge from the parsed document to the visual engine model.

use std::collections::BTreeMap;

use tracing::debug;
use wam_core::ComponentType;
use wam_model::{
    ComponentProperties, Connection, EngineModel, ModelComponent, Position, fresh_id,
};
use wam_registry::Registry;

use crate::document::{
    ParsedDocument, boundary_kind_from_tag, compressor_kind_from_tag, plenum_kind_from_tag,
    valve_kind_from_tag,
};

const GRID_COLUMNS: usize = 4;
const GRID_ORIGIN_X: f64 = 80.0;
const GRID_ORIGIN_Y: f64 = 80.0;
const GRID_STEP_X: f64 = 180.0;
const GRID_STEP_Y: f64 = 140.0;

/// Deterministic canvas position for the n-th synthesized component.
fn grid_position(index: usize) -> Position {
    let col = index % GRID_COLUMNS;
    let row = index / GRID_COLUMNS;
    Position::new(
        GRID_ORIGIN_X + col as f64 * GRID_STEP_X,
        GRID_ORIGIN_Y + row as f64 * GRID_STEP_Y,
    )
}

/// Synthesize an `EngineModel` from a parsed document.
///
/// Every component gets a freshly minted id and a grid position by insertion
/// index (presentation only). Pipe ends sharing a node number are joined by
/// inferred `Connection` edges, built from the same node map the topology
/// validator uses.
pub fn to_engine_model(doc: &ParsedDocument, registry: &Registry) -> EngineModel {
    let mut model = EngineModel::new("Imported WAM model");
    let mut index = 0usize;

    let mut place = |model: &mut EngineModel, kind: ComponentType, properties: ComponentProperties| {
        let component = ModelComponent {
            id: fresh_id(),
            kind,
            position: grid_position(index),
            rotation: 0.0,
            properties,
            display_name: registry.lookup(kind).map(|d| d.name.to_string()),
        };
        index += 1;
        let id = component.id.clone();
        model.add_component(component);
        id
    };

    // Pipe component ids with their node numbers, for edge inference below.
    let mut pipe_ends: Vec<(String, i64, i64)> = Vec::with_capacity(doc.pipes.len());

    for pipe in &doc.pipes {
        let id = place(&mut model, ComponentType::Pipe, ComponentProperties::Pipe(pipe.clone()));
        pipe_ends.push((id, pipe.nodo_izq, pipe.nodo_der));
    }
    for valve in &doc.valves {
        place(
            &mut model,
            valve_kind_from_tag(valve.tipo_valvula),
            ComponentProperties::Valve(valve.clone()),
        );
    }
    for plenum in &doc.plenums {
        place(
            &mut model,
            plenum_kind_from_tag(plenum.tag),
            ComponentProperties::Plenum(plenum.properties.clone()),
        );
    }
    for compressor in &doc.compressors {
        place(
            &mut model,
            compressor_kind_from_tag(compressor.modelo),
            ComponentProperties::Compressor(compressor.clone()),
        );
    }
    for boundary in &doc.boundaries {
        place(
            &mut model,
            boundary_kind_from_tag(boundary.tipo_cc),
            ComponentProperties::Boundary(boundary.clone()),
        );
    }

    infer_pipe_connections(&mut model, &pipe_ends);

    debug!(
        components = model.components.len(),
        connections = model.connections.len(),
        "synthesized engine model"
    );

    model
}

/// Derive connections from shared node numbers: every unordered pair of pipe
/// ends on the same node becomes one edge. Ends of one and the same pipe are
/// skipped; a pipe looping onto itself is the node validator's finding, not
/// a connection.
fn infer_pipe_connections(model: &mut EngineModel, pipe_ends: &[(String, i64, i64)]) {
    // BTreeMap keeps the edge order deterministic across runs.
    let mut owners: BTreeMap<i64, Vec<(&str, &str)>> = BTreeMap::new();
    for (id, left, right) in pipe_ends {
        owners.entry(*left).or_default().push((id.as_str(), "left"));
        owners.entry(*right).or_default().push((id.as_str(), "right"));
    }

    for ends in owners.values() {
        for (i, (comp_a, port_a)) in ends.iter().enumerate() {
            for (comp_b, port_b) in ends.iter().skip(i + 1) {
                if comp_a == comp_b {
                    continue;
                }
                model.add_connection(Connection::new(fresh_id(), *comp_a, *port_a, *comp_b, *port_b));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_positions_are_deterministic_rows() {
        assert_eq!(grid_position(0), Position::new(80.0, 80.0));
        assert_eq!(grid_position(3), Position::new(80.0 + 3.0 * 180.0, 80.0));
        assert_eq!(grid_position(4), Position::new(80.0, 80.0 + 140.0));
    }

    #[test]
    fn shared_node_yields_one_connection() {
        let mut model = EngineModel::new("t");
        let ends = vec![
            ("a".to_string(), 1, 2),
            ("b".to_string(), 2, 3),
        ];
        infer_pipe_connections(&mut model, &ends);

        assert_eq!(model.connections.len(), 1);
        let conn = &model.connections[0];
        assert_eq!(conn.from_component, "a");
        assert_eq!(conn.from_port, "right");
        assert_eq!(conn.to_component, "b");
        assert_eq!(conn.to_port, "left");
    }

    #[test]
    fn three_way_junction_yields_pairwise_edges() {
        let mut model = EngineModel::new("t");
        let ends = vec![
            ("a".to_string(), 1, 7),
            ("b".to_string(), 7, 2),
            ("c".to_string(), 7, 3),
        ];
        infer_pipe_connections(&mut model, &ends);
        assert_eq!(model.connections.len(), 3);
    }

    #[test]
    fn self_loop_pipe_gets_no_connection() {
        let mut model = EngineModel::new("t");
        let ends = vec![("a".to_string(), 4, 4)];
        infer_pipe_connections(&mut model, &ends);
        assert!(model.connections.is_empty());
    }
}
