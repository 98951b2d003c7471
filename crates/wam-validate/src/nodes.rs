//! Node-system checks: the OpenWAM junction-label invariants.

use std::collections::BTreeMap;

use wam_core::Category;
use wam_model::{EngineModel, ErrorKind, ValidationError, ValidationWarning, WarningKind};

/// The physical fan-out limit of one junction node in OpenWAM.
const MAX_PIPE_ENDS_PER_NODE: usize = 3;

/// Check node-number topology across all pipes.
///
/// Errors: a pipe whose ends share one node (self loop), and nodes owned by
/// more than three pipe ends. Nodes with a single owner and no boundary
/// termination only warn; an unterminated pipe end is suspicious, not
/// illegal.
pub(crate) fn check_node_system(
    model: &EngineModel,
) -> (Vec<ValidationError>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // node number -> owning (component id, port) pipe ends
    let mut owners: BTreeMap<i64, Vec<(&str, &str)>> = BTreeMap::new();

    for (component, pipe) in model.pipes() {
        if pipe.nodo_izq == pipe.nodo_der {
            errors.push(ValidationError::new(
                ErrorKind::Connection,
                Some(component.id.clone()),
                format!(
                    "pipe {} connects node {} to itself",
                    component.id, pipe.nodo_izq
                ),
            ));
            continue;
        }
        owners
            .entry(pipe.nodo_izq)
            .or_default()
            .push((component.id.as_str(), "left"));
        owners
            .entry(pipe.nodo_der)
            .or_default()
            .push((component.id.as_str(), "right"));
    }

    for (node, ends) in &owners {
        if ends.len() > MAX_PIPE_ENDS_PER_NODE {
            errors.push(ValidationError::new(
                ErrorKind::Connection,
                None,
                format!(
                    "node {} is shared by {} pipe ends (maximum {} allowed)",
                    node,
                    ends.len(),
                    MAX_PIPE_ENDS_PER_NODE
                ),
            ));
        }

        if let [(component_id, port)] = ends.as_slice() {
            if !has_boundary_termination(model, component_id, port) {
                warnings.push(ValidationWarning {
                    kind: WarningKind::Isolation,
                    component_id: Some(component_id.to_string()),
                    message: format!(
                        "node {} on pipe {} ({} end) has no boundary termination",
                        node, component_id, port
                    ),
                });
            }
        }
    }

    (errors, warnings)
}

/// True if the given pipe port is connected to a boundary-category
/// component through the model's stored connections.
fn has_boundary_termination(model: &EngineModel, component_id: &str, port: &str) -> bool {
    model.connections.iter().any(|conn| {
        let partner = if conn.from_component == component_id && conn.from_port == port {
            Some(&conn.to_component)
        } else if conn.to_component == component_id && conn.to_port == port {
            Some(&conn.from_component)
        } else {
            None
        };
        partner
            .and_then(|id| model.component(id))
            .is_some_and(|c| c.kind.category() == Category::Boundary)
    })
}
