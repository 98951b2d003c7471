//! The standard component catalog.
//!
//! One definition per `ComponentType`, built table-driven per category so
//! kinds in the same family share slot layout, defaults, and schema shape.

use wam_core::{Category, ComponentType};
use wam_model::{
    BoundaryProperties, ComponentProperties, CompressorProperties, ControlProperties,
    EngineProperties, PipeProperties, PlenumProperties, ValveProperties,
};

use crate::definition::{ComponentDefinition, NodeSlot, SlotDirection};
use crate::registry::Registry;
use crate::schema::{FieldKind, FieldRule, FieldSchema, FieldValue, PropertySchema};

/// Build the full standard registry.
pub fn standard() -> Registry {
    let mut registry = Registry::empty();

    for (kind, name, description) in PIPE_KINDS {
        registry.register(pipe_definition(*kind, name, description));
    }
    for (kind, name, description) in PLENUM_KINDS {
        registry.register(plenum_definition(*kind, name, description));
    }
    for (kind, tag, name, description) in VALVE_KINDS {
        registry.register(valve_definition(*kind, *tag, name, description));
    }
    for (kind, tag, name, description) in BOUNDARY_KINDS {
        registry.register(boundary_definition(*kind, *tag, name, description));
    }
    for (kind, name, description) in ENGINE_KINDS {
        registry.register(engine_definition(*kind, name, description));
    }
    for (kind, name, description) in COMPRESSOR_KINDS {
        registry.register(compressor_definition(*kind, name, description));
    }
    for (kind, name, description) in CONTROL_KINDS {
        registry.register(control_definition(*kind, name, description));
    }

    registry
}

type KindRow = (ComponentType, &'static str, &'static str);

const PIPE_KINDS: &[KindRow] = &[
    (ComponentType::Pipe, "Pipe", "1D discretized duct"),
    (
        ComponentType::ConcentricPipe,
        "Concentric pipe",
        "Annular duct pair sharing an axis",
    ),
    (
        ComponentType::ParticulateFilter,
        "Particulate filter",
        "Diesel particulate filter (DPF) monolith",
    ),
];

const PLENUM_KINDS: &[KindRow] = &[
    (
        ComponentType::ConstantVolumePlenum,
        "Plenum (constant volume)",
        "0D lumped chamber with fixed volume",
    ),
    (
        ComponentType::VariableVolumePlenum,
        "Plenum (variable volume)",
        "0D chamber whose volume follows a law",
    ),
    (
        ComponentType::SimpleTurbine,
        "Turbine (simple)",
        "Single-entry turbine modeled as a plenum pair",
    ),
    (
        ComponentType::TwinTurbine,
        "Turbine (twin entry)",
        "Twin-entry turbine modeled as a plenum group",
    ),
    (ComponentType::Venturi, "Venturi", "Venturi mixing chamber"),
    (
        ComponentType::DirectionalJunction,
        "Directional junction",
        "Flow-direction sensitive pipe union",
    ),
];

/// Valve rows carry the WAM valve-type tag a fresh instance starts with.
type TaggedKindRow = (ComponentType, i64, &'static str, &'static str);

const VALVE_KINDS: &[TaggedKindRow] = &[
    (
        ComponentType::FixedDischargeCoefficient,
        0,
        "Fixed CD restriction",
        "Restriction with constant discharge coefficient",
    ),
    (
        ComponentType::FourStrokeValve,
        1,
        "Poppet valve (4T)",
        "Cam-driven intake/exhaust valve of a four-stroke cylinder",
    ),
    (
        ComponentType::TwoStrokePort,
        2,
        "Port (2T)",
        "Piston-controlled port of a two-stroke cylinder",
    ),
    (ComponentType::RotaryDisc, 3, "Rotary disc valve", "Crank-driven rotary disc"),
    (ComponentType::ReedValve, 4, "Reed valve", "Pressure-actuated reed petal valve"),
    (
        ComponentType::ExternalDischargeCoefficient,
        5,
        "External CD restriction",
        "Restriction with externally supplied CD law",
    ),
    (ComponentType::ButterflyValve, 6, "Butterfly valve", "Throttle butterfly"),
    (
        ComponentType::ControlledValve,
        7,
        "Controlled valve",
        "Valve positioned by a controller signal",
    ),
    (ComponentType::WasteGate, 8, "Waste gate", "Turbine bypass valve"),
    (ComponentType::ReliefValve, 9, "Relief valve", "Pressure limiting valve"),
    (ComponentType::TurbineStator, 10, "Turbine stator", "Turbine stator ring restriction"),
    (ComponentType::TurbineRotor, 11, "Turbine rotor", "Turbine rotor restriction"),
];

const BOUNDARY_KINDS: &[TaggedKindRow] = &[
    (ComponentType::OpenEnd, 0, "Open end", "Discharge to the ambient"),
    (ComponentType::ClosedEnd, 1, "Closed end", "Blind pipe termination"),
    (
        ComponentType::AnechoicEnd,
        2,
        "Anechoic end",
        "Non-reflecting termination",
    ),
    (
        ComponentType::PressureLoss,
        3,
        "Pressure loss",
        "Localized pressure drop between pipe ends",
    ),
    (
        ComponentType::PipeToPlenum,
        4,
        "Pipe to plenum",
        "Pipe end opening into a plenum",
    ),
    (ComponentType::Branch, 5, "Branch", "Multi-pipe junction"),
    (
        ComponentType::CylinderConnection,
        6,
        "Cylinder connection",
        "Pipe end at a cylinder valve seat",
    ),
    (
        ComponentType::CompressorInlet,
        7,
        "Compressor inlet",
        "Pipe end at a compressor face",
    ),
    (
        ComponentType::VariablePressure,
        8,
        "Variable pressure end",
        "Imposed time-varying pressure",
    ),
    (
        ComponentType::VolumetricCompressorConnection,
        9,
        "Volumetric compressor connection",
        "Pipe end at a positive-displacement machine",
    ),
    (
        ComponentType::ExternalConnection,
        10,
        "External connection",
        "Coupling to an external calculation",
    ),
];

const ENGINE_KINDS: &[KindRow] = &[
    (ComponentType::EngineBlock, "Engine block", "Crankcase and cylinder group"),
    (ComponentType::Cylinder, "Cylinder", "Single engine cylinder"),
];

const COMPRESSOR_KINDS: &[KindRow] = &[
    (ComponentType::Compressor, "Compressor", "Centrifugal compressor stage"),
    (
        ComponentType::VolumetricCompressor,
        "Volumetric compressor",
        "Positive-displacement compressor",
    ),
    (ComponentType::TurboAxis, "Turbo axis", "Turbocharger shaft joining turbine and compressor"),
];

const CONTROL_KINDS: &[KindRow] = &[
    (ComponentType::Sensor, "Sensor", "Measures a flow or wall variable"),
    (ComponentType::PidController, "PID controller", "Closed-loop PID block"),
    (ComponentType::LookupTable, "Lookup table", "Tabulated control law"),
    (ComponentType::Gain, "Gain", "Proportional control block"),
];

// --- pipes -------------------------------------------------------------

fn pipe_definition(kind: ComponentType, name: &'static str, description: &'static str) -> ComponentDefinition {
    let partners = vec![
        Category::Pipe,
        Category::Plenum,
        Category::Valve,
        Category::Boundary,
        Category::Compressor,
    ];
    ComponentDefinition {
        kind,
        category: Category::Pipe,
        name,
        description,
        slots: vec![
            NodeSlot::new("left", SlotDirection::Left, partners.clone(), 3),
            NodeSlot::new("right", SlotDirection::Right, partners, 3),
        ],
        defaults: ComponentProperties::Pipe(default_pipe()),
        schema: pipe_schema(),
    }
}

fn default_pipe() -> PipeProperties {
    PipeProperties {
        numero_tubo: 1,
        nodo_izq: 0,
        nodo_der: 1,
        nin: 20,
        longitud_total: 0.5,
        mallado: 0.01,
        n_tramos: 1,
        tipo_mallado: 0,
        l_tramo: vec![0.5],
        d_ext_tramo: vec![0.05],
        tipo_trans_cal: 0,
        coef_ajus_fric: 1.0,
        coef_ajus_tc: 1.0,
        espesor_prin: 0.002,
        densidad_prin: 7800.0,
        cal_esp_prin: 490.0,
        conduct_prin: 50.0,
        t_refrigerante: 363.0,
        tip_refrig: 1,
        tini: 300.0,
        pini: 1.0,
        vel_media: 0.0,
        num_capas: 0,
        capas: Vec::new(),
    }
}

fn sections_match_n_tramos(props: &ComponentProperties) -> bool {
    props
        .as_pipe()
        .is_none_or(|p| p.l_tramo.len() == p.n_tramos as usize && p.d_ext_tramo.len() == p.n_tramos as usize)
}

fn layers_match_num_capas(props: &ComponentProperties) -> bool {
    props
        .as_pipe()
        .is_none_or(|p| p.capas.len() == p.num_capas as usize)
}

fn pipe_schema() -> PropertySchema {
    PropertySchema::new(vec![
        FieldSchema::new("numero_tubo", FieldKind::Int, |p| {
            p.as_pipe().map(|x| FieldValue::Int(x.numero_tubo))
        })
        .rule(FieldRule::Min { limit: 1.0, message: "pipe number must be at least 1" }),
        FieldSchema::new("nodo_izq", FieldKind::Int, |p| {
            p.as_pipe().map(|x| FieldValue::Int(x.nodo_izq))
        })
        .rule(FieldRule::Min { limit: 0.0, message: "left node must be non-negative" }),
        FieldSchema::new("nodo_der", FieldKind::Int, |p| {
            p.as_pipe().map(|x| FieldValue::Int(x.nodo_der))
        })
        .rule(FieldRule::Min { limit: 0.0, message: "right node must be non-negative" }),
        FieldSchema::new("nin", FieldKind::Int, |p| {
            p.as_pipe().map(|x| FieldValue::Int(x.nin))
        })
        .rule(FieldRule::Min { limit: 1.0, message: "cell count must be at least 1" }),
        FieldSchema::new("longitud_total", FieldKind::Float, |p| {
            p.as_pipe().map(|x| FieldValue::Float(x.longitud_total))
        })
        .rule(FieldRule::Min { limit: 1e-6, message: "pipe length must be positive" }),
        FieldSchema::new("mallado", FieldKind::Float, |p| {
            p.as_pipe().map(|x| FieldValue::Float(x.mallado))
        })
        .rule(FieldRule::Min { limit: 1e-6, message: "mesh size must be positive" }),
        FieldSchema::new("n_tramos", FieldKind::Int, |p| {
            p.as_pipe().map(|x| FieldValue::Int(x.n_tramos))
        })
        .rule(FieldRule::Min { limit: 1.0, message: "section count must be at least 1" }),
        FieldSchema::new("l_tramo", FieldKind::FloatList, |p| {
            p.as_pipe().map(|x| FieldValue::FloatList(x.l_tramo.clone()))
        })
        .rule(FieldRule::Custom {
            check: sections_match_n_tramos,
            message: "section arrays must have exactly n_tramos entries",
        }),
        FieldSchema::new("d_ext_tramo", FieldKind::FloatList, |p| {
            p.as_pipe().map(|x| FieldValue::FloatList(x.d_ext_tramo.clone()))
        })
        .rule(FieldRule::Custom {
            check: sections_match_n_tramos,
            message: "section arrays must have exactly n_tramos entries",
        }),
        FieldSchema::new("tipo_mallado", FieldKind::Int, |p| {
            p.as_pipe().map(|x| FieldValue::Int(x.tipo_mallado))
        })
        .rule(FieldRule::Range { min: 0.0, max: 2.0, message: "mesh type must be 0, 1 or 2" }),
        FieldSchema::new("coef_ajus_fric", FieldKind::Float, |p| {
            p.as_pipe().map(|x| FieldValue::Float(x.coef_ajus_fric))
        })
        .rule(FieldRule::Range {
            min: 0.0,
            max: 10.0,
            message: "friction adjustment must be between 0 and 10",
        }),
        FieldSchema::new("coef_ajus_tc", FieldKind::Float, |p| {
            p.as_pipe().map(|x| FieldValue::Float(x.coef_ajus_tc))
        })
        .rule(FieldRule::Range {
            min: 0.0,
            max: 10.0,
            message: "heat transfer adjustment must be between 0 and 10",
        }),
        FieldSchema::new("tini", FieldKind::Float, |p| {
            p.as_pipe().map(|x| FieldValue::Float(x.tini))
        })
        .rule(FieldRule::Min { limit: 1e-3, message: "initial temperature must be positive" }),
        FieldSchema::new("pini", FieldKind::Float, |p| {
            p.as_pipe().map(|x| FieldValue::Float(x.pini))
        })
        .rule(FieldRule::Min { limit: 1e-6, message: "initial pressure must be positive" }),
        FieldSchema::new("num_capas", FieldKind::Int, |p| {
            p.as_pipe().map(|x| FieldValue::Int(x.num_capas))
        })
        .rule(FieldRule::Min { limit: 0.0, message: "layer count must be non-negative" }),
        FieldSchema::new("capas", FieldKind::LayerList, |p| {
            p.as_pipe().map(|x| FieldValue::LayerList(x.capas.len()))
        })
        .rule(FieldRule::Custom {
            check: layers_match_num_capas,
            message: "wall layer list must have exactly num_capas entries",
        }),
    ])
}

// --- plenums -----------------------------------------------------------

fn plenum_definition(kind: ComponentType, name: &'static str, description: &'static str) -> ComponentDefinition {
    let defaults = PlenumProperties {
        numero_turbina: matches!(
            kind,
            ComponentType::SimpleTurbine | ComponentType::TwinTurbine
        )
        .then_some(1),
        numero_venturi: (kind == ComponentType::Venturi).then_some(1),
        numero_deposito: 1,
        volumen: 0.002,
        temperatura: 300.0,
        presion: 1.0,
        masa_inicial: 0.0023,
    };
    ComponentDefinition {
        kind,
        category: Category::Plenum,
        name,
        description,
        slots: vec![NodeSlot::new(
            "pipe",
            SlotDirection::Bidirectional,
            vec![Category::Pipe, Category::Valve, Category::Boundary],
            8,
        )],
        defaults: ComponentProperties::Plenum(defaults),
        schema: plenum_schema(),
    }
}

fn plenum_schema() -> PropertySchema {
    PropertySchema::new(vec![
        FieldSchema::new("numero_deposito", FieldKind::Int, |p| {
            p.as_plenum().map(|x| FieldValue::Int(x.numero_deposito))
        })
        .rule(FieldRule::Min { limit: 1.0, message: "plenum number must be at least 1" }),
        FieldSchema::new("volumen", FieldKind::Float, |p| {
            p.as_plenum().map(|x| FieldValue::Float(x.volumen))
        })
        .rule(FieldRule::Min { limit: 1e-9, message: "plenum volume must be positive" }),
        FieldSchema::new("temperatura", FieldKind::Float, |p| {
            p.as_plenum().map(|x| FieldValue::Float(x.temperatura))
        })
        .rule(FieldRule::Min { limit: 1e-3, message: "plenum temperature must be positive" }),
        FieldSchema::new("presion", FieldKind::Float, |p| {
            p.as_plenum().map(|x| FieldValue::Float(x.presion))
        })
        .rule(FieldRule::Min { limit: 1e-6, message: "plenum pressure must be positive" }),
        FieldSchema::new("masa_inicial", FieldKind::Float, |p| {
            p.as_plenum().map(|x| FieldValue::Float(x.masa_inicial))
        })
        .rule(FieldRule::Min { limit: 0.0, message: "initial mass must be non-negative" }),
    ])
}

// --- valves ------------------------------------------------------------

fn valve_definition(kind: ComponentType, tag: i64, name: &'static str, description: &'static str) -> ComponentDefinition {
    ComponentDefinition {
        kind,
        category: Category::Valve,
        name,
        description,
        slots: vec![
            NodeSlot::new(
                "inlet",
                SlotDirection::Inlet,
                vec![Category::Pipe, Category::Plenum, Category::Engine],
                1,
            ),
            NodeSlot::new(
                "outlet",
                SlotDirection::Outlet,
                vec![Category::Pipe, Category::Plenum, Category::Engine],
                1,
            ),
        ],
        defaults: ComponentProperties::Valve(ValveProperties { tipo_valvula: tag }),
        schema: PropertySchema::new(vec![
            FieldSchema::new("tipo_valvula", FieldKind::Int, |p| match p {
                ComponentProperties::Valve(v) => Some(FieldValue::Int(v.tipo_valvula)),
                _ => None,
            })
            .rule(FieldRule::Min { limit: 0.0, message: "valve type tag must be non-negative" }),
        ]),
    }
}

// --- boundaries --------------------------------------------------------

fn boundary_definition(kind: ComponentType, tag: i64, name: &'static str, description: &'static str) -> ComponentDefinition {
    ComponentDefinition {
        kind,
        category: Category::Boundary,
        name,
        description,
        slots: vec![NodeSlot::new(
            "pipe",
            SlotDirection::Bidirectional,
            vec![Category::Pipe],
            1,
        )],
        defaults: ComponentProperties::Boundary(BoundaryProperties { tipo_cc: tag }),
        schema: PropertySchema::new(vec![
            FieldSchema::new("tipo_cc", FieldKind::Int, |p| {
                p.as_boundary().map(|b| FieldValue::Int(b.tipo_cc))
            })
            .rule(FieldRule::Min { limit: 0.0, message: "boundary type tag must be non-negative" }),
        ]),
    }
}

// --- engine ------------------------------------------------------------

fn engine_definition(kind: ComponentType, name: &'static str, description: &'static str) -> ComponentDefinition {
    let slots = match kind {
        ComponentType::EngineBlock => vec![NodeSlot::new(
            "cylinders",
            SlotDirection::Bidirectional,
            vec![Category::Engine],
            12,
        )],
        _ => vec![
            NodeSlot::new("intake", SlotDirection::Inlet, vec![Category::Valve, Category::Pipe], 2),
            NodeSlot::new("exhaust", SlotDirection::Outlet, vec![Category::Valve, Category::Pipe], 2),
            NodeSlot::new("block", SlotDirection::Bidirectional, vec![Category::Engine], 1),
        ],
    };
    ComponentDefinition {
        kind,
        category: Category::Engine,
        name,
        description,
        slots,
        defaults: ComponentProperties::Engine(EngineProperties {
            numero_cilindros: 4,
            regimen: 2000.0,
            diametro: 0.082,
            carrera: 0.09,
            biela: 0.144,
            relacion_compresion: 10.5,
        }),
        schema: engine_schema(),
    }
}

fn engine_schema() -> PropertySchema {
    fn as_engine(p: &ComponentProperties) -> Option<&EngineProperties> {
        match p {
            ComponentProperties::Engine(e) => Some(e),
            _ => None,
        }
    }
    PropertySchema::new(vec![
        FieldSchema::new("numero_cilindros", FieldKind::Int, |p| match p {
            ComponentProperties::Engine(e) => Some(FieldValue::Int(e.numero_cilindros)),
            _ => None,
        })
        .rule(FieldRule::Range { min: 1.0, max: 16.0, message: "cylinder count must be between 1 and 16" }),
        FieldSchema::new("regimen", FieldKind::Float, |p| match p {
            ComponentProperties::Engine(e) => Some(FieldValue::Float(e.regimen)),
            _ => None,
        })
        .rule(FieldRule::Min { limit: 0.0, message: "engine speed must be non-negative" }),
        FieldSchema::new("diametro", FieldKind::Float, |p| match p {
            ComponentProperties::Engine(e) => Some(FieldValue::Float(e.diametro)),
            _ => None,
        })
        .rule(FieldRule::Min { limit: 1e-6, message: "bore must be positive" }),
        FieldSchema::new("carrera", FieldKind::Float, |p| match p {
            ComponentProperties::Engine(e) => Some(FieldValue::Float(e.carrera)),
            _ => None,
        })
        .rule(FieldRule::Min { limit: 1e-6, message: "stroke must be positive" }),
        FieldSchema::new("relacion_compresion", FieldKind::Float, |p| {
            as_engine(p).map(|e| FieldValue::Float(e.relacion_compresion))
        })
        .rule(FieldRule::Range { min: 1.0, max: 30.0, message: "compression ratio must be between 1 and 30" }),
    ])
}

// --- compressors -------------------------------------------------------

fn compressor_definition(kind: ComponentType, name: &'static str, description: &'static str) -> ComponentDefinition {
    ComponentDefinition {
        kind,
        category: Category::Compressor,
        name,
        description,
        slots: vec![
            NodeSlot::new("inlet", SlotDirection::Inlet, vec![Category::Pipe, Category::Boundary], 1),
            NodeSlot::new("outlet", SlotDirection::Outlet, vec![Category::Pipe, Category::Boundary], 1),
        ],
        defaults: ComponentProperties::Compressor(CompressorProperties {
            modelo: if kind == ComponentType::VolumetricCompressor { 1 } else { 0 },
        }),
        schema: PropertySchema::new(vec![
            FieldSchema::new("modelo", FieldKind::Int, |p| match p {
                ComponentProperties::Compressor(c) => Some(FieldValue::Int(c.modelo)),
                _ => None,
            })
            .rule(FieldRule::Min { limit: 0.0, message: "compressor model tag must be non-negative" }),
        ]),
    }
}

// --- sensors / controllers ---------------------------------------------

fn control_definition(kind: ComponentType, name: &'static str, description: &'static str) -> ComponentDefinition {
    ComponentDefinition {
        kind,
        category: Category::Control,
        name,
        description,
        slots: vec![NodeSlot::new(
            "signal",
            SlotDirection::Bidirectional,
            vec![Category::Control, Category::Valve, Category::Compressor],
            4,
        )],
        defaults: ComponentProperties::Control(ControlProperties {
            periodo: 1.0,
            ganancia: 1.0,
        }),
        schema: PropertySchema::new(vec![
            FieldSchema::new("periodo", FieldKind::Float, |p| match p {
                ComponentProperties::Control(c) => Some(FieldValue::Float(c.periodo)),
                _ => None,
            })
            .rule(FieldRule::Min { limit: 0.0, message: "sample period must be non-negative" }),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_every_component_type() {
        let registry = standard();
        for kind in ComponentType::ALL {
            let def = registry.lookup(kind).unwrap_or_else(|| panic!("missing {kind}"));
            assert_eq!(def.category, kind.category());
            assert_eq!(def.defaults.category(), kind.category());
            assert!(!def.slots.is_empty(), "{kind} has no slots");
        }
    }

    #[test]
    fn pipe_defaults_satisfy_pipe_schema_rules() {
        let registry = standard();
        let def = registry.lookup(ComponentType::Pipe).unwrap();
        for field in &def.schema.fields {
            let value = (field.get)(&def.defaults).expect("default carries field");
            assert_eq!(value.kind(), field.kind, "field {}", field.name);
            for rule in &field.rules {
                assert!(rule.holds(&value, &def.defaults), "rule on {}", field.name);
            }
        }
    }

    #[test]
    fn turbine_plenums_carry_turbine_number() {
        let registry = standard();
        let def = registry.lookup(ComponentType::SimpleTurbine).unwrap();
        let plenum = def.defaults.as_plenum().unwrap();
        assert!(plenum.numero_turbina.is_some());
        assert!(plenum.numero_venturi.is_none());
    }
}
