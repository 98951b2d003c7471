//! Duplicate connection detection.

use std::collections::HashSet;

use wam_model::{EngineModel, ErrorKind, ValidationError};

/// Flag connections whose endpoint signature has been seen before, in
/// either orientation. Each redundant connection yields exactly one error,
/// not one per orientation.
pub(crate) fn check_duplicates(model: &EngineModel) -> Vec<ValidationError> {
    let mut seen: HashSet<(&str, &str, &str, &str)> = HashSet::new();
    let mut errors = Vec::new();

    for conn in &model.connections {
        let forward = (
            conn.from_component.as_str(),
            conn.from_port.as_str(),
            conn.to_component.as_str(),
            conn.to_port.as_str(),
        );
        let reverse = (forward.2, forward.3, forward.0, forward.1);

        if seen.contains(&forward) || seen.contains(&reverse) {
            errors.push(ValidationError::new(
                ErrorKind::Connection,
                Some(conn.from_component.clone()),
                format!(
                    "duplicate connection {}.{} -> {}.{}",
                    conn.from_component, conn.from_port, conn.to_component, conn.to_port
                ),
            ));
        } else {
            seen.insert(forward);
        }
    }

    errors
}
