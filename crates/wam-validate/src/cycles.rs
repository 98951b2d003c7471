//! Circular-reference detection over stored connection direction.

use std::collections::{HashMap, HashSet};

use wam_model::EngineModel;

/// Find every cycle reachable through `Connection.from -> to` edges.
///
/// Plain DFS with an explicit recursion stack; a back-edge into the stack
/// yields the full cycle path, closed by repeating the entry component.
/// Components are rooted in model order, each visited once, so the whole
/// pass is O(V+E). Detection is independent of which component the search
/// happens to start from.
pub(crate) fn find_cycles(model: &EngineModel) -> Vec<Vec<String>> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for conn in &model.connections {
        adjacency
            .entry(conn.from_component.as_str())
            .or_default()
            .push(conn.to_component.as_str());
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut cycles = Vec::new();

    for component in &model.components {
        if !visited.contains(component.id.as_str()) {
            let mut stack: Vec<&str> = Vec::new();
            let mut on_stack: HashSet<&str> = HashSet::new();
            dfs(
                component.id.as_str(),
                &adjacency,
                &mut visited,
                &mut stack,
                &mut on_stack,
                &mut cycles,
            );
        }
    }

    cycles
}

fn dfs<'m>(
    node: &'m str,
    adjacency: &HashMap<&'m str, Vec<&'m str>>,
    visited: &mut HashSet<&'m str>,
    stack: &mut Vec<&'m str>,
    on_stack: &mut HashSet<&'m str>,
    cycles: &mut Vec<Vec<String>>,
) {
    visited.insert(node);
    stack.push(node);
    on_stack.insert(node);

    if let Some(next) = adjacency.get(node) {
        for &target in next {
            if on_stack.contains(target) {
                // Back edge: the cycle runs from the target's stack position
                // to the top, closed with the target again.
                let start = stack.iter().position(|&n| n == target).unwrap_or(0);
                let mut cycle: Vec<String> =
                    stack[start..].iter().map(|s| s.to_string()).collect();
                cycle.push(target.to_string());
                cycles.push(cycle);
            } else if !visited.contains(target) {
                dfs(target, adjacency, visited, stack, on_stack, cycles);
            }
        }
    }

    stack.pop();
    on_stack.remove(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use wam_core::ComponentType;
    use wam_model::{Connection, Position};
    use wam_registry::standard;

    fn chain_model(ids: &[&str], edges: &[(&str, &str)]) -> EngineModel {
        let registry = standard();
        let mut model = EngineModel::new("t");
        for id in ids {
            model.add_component(
                registry
                    .instantiate(ComponentType::Sensor, *id, Position::default())
                    .unwrap(),
            );
        }
        for (i, (from, to)) in edges.iter().enumerate() {
            model.add_connection(Connection::new(format!("e{i}"), *from, "signal", *to, "signal"));
        }
        model
    }

    #[test]
    fn triangle_reports_closed_path() {
        let model = chain_model(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let cycles = find_cycles(&model);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn acyclic_chain_has_no_cycles() {
        let model = chain_model(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert!(find_cycles(&model).is_empty());
    }

    #[test]
    fn detection_is_start_node_independent() {
        // Same cycle, but the component list starts at a node that is only
        // ever reached as an edge target.
        let model = chain_model(&["c", "a", "b"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let cycles = find_cycles(&model);

        assert_eq!(cycles.len(), 1);
        let cycle = &cycles[0];
        // Rotation may differ; content and closure must not.
        assert_eq!(cycle.len(), 4);
        assert_eq!(cycle.first(), cycle.last());
        let mut inner: Vec<_> = cycle[..3].to_vec();
        inner.sort();
        assert_eq!(inner, vec!["a", "b", "c"]);
    }

    #[test]
    fn self_edge_is_a_one_component_cycle() {
        let model = chain_model(&["a"], &[("a", "a")]);
        let cycles = find_cycles(&model);
        assert_eq!(cycles, vec![vec!["a".to_string(), "a".to_string()]]);
    }

    #[test]
    fn two_disjoint_cycles_are_both_found() {
        let model = chain_model(
            &["a", "b", "x", "y"],
            &[("a", "b"), ("b", "a"), ("x", "y"), ("y", "x")],
        );
        assert_eq!(find_cycles(&model).len(), 2);
    }
}
