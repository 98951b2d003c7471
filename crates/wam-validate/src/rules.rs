//! The connection rule table.
//!
//! Pure data plus exact-match lookup: a rule keys on the full
//! (from-type, from-port, to-type, to-port) tuple and is tried in both
//! orientations. Absence of a rule is not permissiveness; unmatched pairs
//! are rejected.

use wam_core::{Category, ComponentType};
use wam_model::ModelComponent;

/// A property-based predicate attached to an allowed rule.
#[derive(Clone)]
pub struct RuleCondition {
    pub message: &'static str,
    pub check: fn(&ModelComponent, &ModelComponent) -> bool,
}

impl std::fmt::Debug for RuleCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RuleCondition({:?})", self.message)
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionRule {
    pub from_type: ComponentType,
    pub from_port: &'static str,
    pub to_type: ComponentType,
    pub to_port: &'static str,
    pub allowed: bool,
    /// Shown when `allowed` is false.
    pub reason: &'static str,
    pub conditions: Vec<RuleCondition>,
}

/// Outcome of a single connection check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCheck {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ConnectionCheck {
    fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    fn rejected(message: String) -> Self {
        Self {
            is_valid: false,
            errors: vec![message],
        }
    }
}

/// Ordered list of connection rules with exact-match lookup.
#[derive(Debug, Default)]
pub struct RuleTable {
    rules: Vec<ConnectionRule>,
}

impl RuleTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: ConnectionRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn find(
        &self,
        from_type: ComponentType,
        from_port: &str,
        to_type: ComponentType,
        to_port: &str,
    ) -> Option<&ConnectionRule> {
        self.rules.iter().find(|r| {
            r.from_type == from_type
                && r.from_port == from_port
                && r.to_type == to_type
                && r.to_port == to_port
        })
    }

    /// Evaluate one prospective or stored connection.
    ///
    /// The first matching orientation wins; if neither orientation matches,
    /// the connection is rejected with a "no rule found" message.
    pub fn evaluate(
        &self,
        from: &ModelComponent,
        from_port: &str,
        to: &ModelComponent,
        to_port: &str,
    ) -> ConnectionCheck {
        let (rule, a, b) = match self.find(from.kind, from_port, to.kind, to_port) {
            Some(rule) => (rule, from, to),
            None => match self.find(to.kind, to_port, from.kind, from_port) {
                Some(rule) => (rule, to, from),
                None => {
                    return ConnectionCheck::rejected(format!(
                        "no rule found for {}.{} -> {}.{}",
                        from.kind, from_port, to.kind, to_port
                    ));
                }
            },
        };

        if !rule.allowed {
            return ConnectionCheck::rejected(format!(
                "{}.{} -> {}.{} is not allowed: {}",
                from.kind, from_port, to.kind, to_port, rule.reason
            ));
        }

        let mut errors = Vec::new();
        for condition in &rule.conditions {
            if !(condition.check)(a, b) {
                errors.push(condition.message.to_string());
            }
        }

        ConnectionCheck {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// The standard compatibility matrix for the built-in catalog.
    pub fn standard() -> Self {
        let mut table = Self::empty();

        let pipe_kinds = [
            ComponentType::Pipe,
            ComponentType::ConcentricPipe,
            ComponentType::ParticulateFilter,
        ];
        let pipe_ports = ["left", "right"];
        let boundary_kinds: Vec<ComponentType> = ComponentType::ALL
            .into_iter()
            .filter(|t| t.category() == Category::Boundary)
            .collect();
        let plenum_kinds: Vec<ComponentType> = ComponentType::ALL
            .into_iter()
            .filter(|t| t.category() == Category::Plenum)
            .collect();
        let valve_kinds: Vec<ComponentType> = ComponentType::ALL
            .into_iter()
            .filter(|t| t.category() == Category::Valve)
            .collect();
        let control_kinds: Vec<ComponentType> = ComponentType::ALL
            .into_iter()
            .filter(|t| t.category() == Category::Control)
            .collect();

        // Pipe ends terminate at boundaries.
        for pipe in pipe_kinds {
            for port in pipe_ports {
                for &bc in &boundary_kinds {
                    table.push(allow(pipe, port, bc, "pipe"));
                }
            }
        }

        // Pipe ends open into plenums.
        for pipe in pipe_kinds {
            for port in pipe_ports {
                for &plenum in &plenum_kinds {
                    table.push(allow(pipe, port, plenum, "pipe"));
                }
            }
        }

        // Pipe-to-pipe junctions at shared nodes, any end pairing, with a
        // diameter compatibility condition.
        for from_port in pipe_ports {
            for to_port in pipe_ports {
                let mut rule = allow(ComponentType::Pipe, from_port, ComponentType::Pipe, to_port);
                rule.conditions.push(RuleCondition {
                    message: "joined pipe diameters differ by more than 50%",
                    check: diameters_compatible,
                });
                table.push(rule);
            }
        }

        // Valves sit between pipes, plenums, and cylinders.
        for &valve in &valve_kinds {
            for valve_port in ["inlet", "outlet"] {
                for pipe in pipe_kinds {
                    for port in pipe_ports {
                        table.push(allow(valve, valve_port, pipe, port));
                    }
                }
                for &plenum in &plenum_kinds {
                    table.push(allow(valve, valve_port, plenum, "pipe"));
                }
            }
        }
        for valve in [ComponentType::FourStrokeValve, ComponentType::TwoStrokePort] {
            for cyl_port in ["intake", "exhaust"] {
                table.push(allow(valve, "outlet", ComponentType::Cylinder, cyl_port));
                table.push(allow(valve, "inlet", ComponentType::Cylinder, cyl_port));
            }
        }

        // Cylinders belong to an engine block.
        table.push(allow(
            ComponentType::Cylinder,
            "block",
            ComponentType::EngineBlock,
            "cylinders",
        ));

        // Compressor faces attach to pipes.
        for comp in [ComponentType::Compressor, ComponentType::VolumetricCompressor] {
            for comp_port in ["inlet", "outlet"] {
                for port in pipe_ports {
                    table.push(allow(comp, comp_port, ComponentType::Pipe, port));
                }
            }
        }

        // The turbo axis couples turbines and compressors.
        for partner in [
            ComponentType::SimpleTurbine,
            ComponentType::TwinTurbine,
            ComponentType::Compressor,
        ] {
            let partner_port = if partner == ComponentType::Compressor {
                "inlet"
            } else {
                "pipe"
            };
            table.push(allow(ComponentType::TurboAxis, "inlet", partner, partner_port));
            table.push(allow(ComponentType::TurboAxis, "outlet", partner, partner_port));
        }

        // Control blocks wire to each other.
        for &a in &control_kinds {
            for &b in &control_kinds {
                table.push(allow(a, "signal", b, "signal"));
            }
        }
        // A controller signal may drive a controlled valve or waste gate.
        for target in [ComponentType::ControlledValve, ComponentType::WasteGate] {
            for &ctl in &control_kinds {
                table.push(allow(ctl, "signal", target, "inlet"));
            }
        }

        // Boundary conditions terminate exactly one pipe end; joining two
        // of them is always a modeling mistake, rejected with a dedicated
        // reason rather than the generic no-rule message.
        for &a in &boundary_kinds {
            for &b in &boundary_kinds {
                table.push(ConnectionRule {
                    from_type: a,
                    from_port: "pipe",
                    to_type: b,
                    to_port: "pipe",
                    allowed: false,
                    reason: "boundary conditions cannot connect to each other",
                    conditions: Vec::new(),
                });
            }
        }

        table
    }
}

fn allow(
    from_type: ComponentType,
    from_port: &'static str,
    to_type: ComponentType,
    to_port: &'static str,
) -> ConnectionRule {
    ConnectionRule {
        from_type,
        from_port,
        to_type,
        to_port,
        allowed: true,
        reason: "",
        conditions: Vec::new(),
    }
}

/// Mean external diameters within 50% of each other.
fn diameters_compatible(a: &ModelComponent, b: &ModelComponent) -> bool {
    let mean = |c: &ModelComponent| {
        c.properties.as_pipe().and_then(|p| {
            if p.d_ext_tramo.is_empty() {
                None
            } else {
                Some(p.d_ext_tramo.iter().sum::<f64>() / p.d_ext_tramo.len() as f64)
            }
        })
    };
    match (mean(a), mean(b)) {
        (Some(da), Some(db)) => {
            let max = da.max(db);
            max <= 0.0 || (da - db).abs() / max <= 0.5
        }
        // Missing pipe properties are a property-validation finding, not a
        // rule-condition failure.
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wam_model::Position;
    use wam_registry::standard;

    fn component(kind: ComponentType, id: &str) -> ModelComponent {
        standard().instantiate(kind, id, Position::default()).unwrap()
    }

    #[test]
    fn default_deny_for_unlisted_pairs() {
        let table = RuleTable::standard();
        let engine = component(ComponentType::EngineBlock, "e1");
        let boundary = component(ComponentType::OpenEnd, "b1");

        let check = table.evaluate(&engine, "cylinders", &boundary, "pipe");
        assert!(!check.is_valid);
        assert!(check.errors[0].contains("no rule found"));
    }

    #[test]
    fn pipe_to_boundary_is_allowed_in_both_orientations() {
        let table = RuleTable::standard();
        let pipe = component(ComponentType::Pipe, "p1");
        let boundary = component(ComponentType::AnechoicEnd, "b1");

        assert!(table.evaluate(&pipe, "left", &boundary, "pipe").is_valid);
        assert!(table.evaluate(&boundary, "pipe", &pipe, "left").is_valid);
    }

    #[test]
    fn forbidden_rule_reports_its_reason() {
        let table = RuleTable::standard();
        let a = component(ComponentType::OpenEnd, "b1");
        let b = component(ComponentType::ClosedEnd, "b2");

        let check = table.evaluate(&a, "pipe", &b, "pipe");
        assert!(!check.is_valid);
        assert!(check.errors[0].contains("cannot connect to each other"));
    }

    #[test]
    fn diameter_condition_rejects_mismatched_pipes() {
        let table = RuleTable::standard();
        let thin = component(ComponentType::Pipe, "p1");
        let mut wide = component(ComponentType::Pipe, "p2");
        if let wam_model::ComponentProperties::Pipe(p) = &mut wide.properties {
            p.d_ext_tramo = vec![0.5];
        }

        let check = table.evaluate(&thin, "right", &wide, "left");
        assert!(!check.is_valid);
        assert!(check.errors[0].contains("diameters"));

        // Similar diameters pass.
        let twin = component(ComponentType::Pipe, "p3");
        assert!(table.evaluate(&thin, "right", &twin, "left").is_valid);
    }
}
