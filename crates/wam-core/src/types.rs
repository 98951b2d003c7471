//! The closed catalog of component kinds and their categories.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Broad family a component kind belongs to.
///
/// The category decides which `ComponentProperties` variant a component
/// carries and which section of the WAM file it is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Pipe,
    Plenum,
    Valve,
    Boundary,
    Engine,
    Compressor,
    Control,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Pipe,
        Category::Plenum,
        Category::Valve,
        Category::Boundary,
        Category::Engine,
        Category::Compressor,
        Category::Control,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Pipe => "pipe",
            Category::Plenum => "plenum",
            Category::Valve => "valve",
            Category::Boundary => "boundary",
            Category::Engine => "engine",
            Category::Compressor => "compressor",
            Category::Control => "control",
        };
        f.write_str(s)
    }
}

/// Every physical element kind the editor knows about.
///
/// Each variant maps 1:1 to exactly one OpenWAM native class name, kept only
/// for round-trip fidelity and debugging. Behavior never dispatches on the
/// native name, always on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    // Pipes (1-dimensional, discretized)
    Pipe,
    ConcentricPipe,
    ParticulateFilter,

    // Plenums (lumped-volume chambers)
    ConstantVolumePlenum,
    VariableVolumePlenum,
    SimpleTurbine,
    TwinTurbine,
    Venturi,
    DirectionalJunction,

    // Valves
    FixedDischargeCoefficient,
    ExternalDischargeCoefficient,
    FourStrokeValve,
    TwoStrokePort,
    RotaryDisc,
    ReedValve,
    ButterflyValve,
    ControlledValve,
    WasteGate,
    ReliefValve,
    TurbineStator,
    TurbineRotor,

    // Boundary conditions (model terminations)
    OpenEnd,
    ClosedEnd,
    AnechoicEnd,
    PressureLoss,
    PipeToPlenum,
    Branch,
    CylinderConnection,
    CompressorInlet,
    VariablePressure,
    VolumetricCompressorConnection,
    ExternalConnection,

    // Engine
    EngineBlock,
    Cylinder,

    // Compressors / turbocharger hardware
    Compressor,
    VolumetricCompressor,
    TurboAxis,

    // Sensors and controllers
    Sensor,
    PidController,
    LookupTable,
    Gain,
}

impl ComponentType {
    /// All known kinds, in catalog order.
    pub const ALL: [ComponentType; 41] = [
        ComponentType::Pipe,
        ComponentType::ConcentricPipe,
        ComponentType::ParticulateFilter,
        ComponentType::ConstantVolumePlenum,
        ComponentType::VariableVolumePlenum,
        ComponentType::SimpleTurbine,
        ComponentType::TwinTurbine,
        ComponentType::Venturi,
        ComponentType::DirectionalJunction,
        ComponentType::FixedDischargeCoefficient,
        ComponentType::ExternalDischargeCoefficient,
        ComponentType::FourStrokeValve,
        ComponentType::TwoStrokePort,
        ComponentType::RotaryDisc,
        ComponentType::ReedValve,
        ComponentType::ButterflyValve,
        ComponentType::ControlledValve,
        ComponentType::WasteGate,
        ComponentType::ReliefValve,
        ComponentType::TurbineStator,
        ComponentType::TurbineRotor,
        ComponentType::OpenEnd,
        ComponentType::ClosedEnd,
        ComponentType::AnechoicEnd,
        ComponentType::PressureLoss,
        ComponentType::PipeToPlenum,
        ComponentType::Branch,
        ComponentType::CylinderConnection,
        ComponentType::CompressorInlet,
        ComponentType::VariablePressure,
        ComponentType::VolumetricCompressorConnection,
        ComponentType::ExternalConnection,
        ComponentType::EngineBlock,
        ComponentType::Cylinder,
        ComponentType::Compressor,
        ComponentType::VolumetricCompressor,
        ComponentType::TurboAxis,
        ComponentType::Sensor,
        ComponentType::PidController,
        ComponentType::LookupTable,
        ComponentType::Gain,
    ];

    /// The family this kind belongs to.
    pub fn category(self) -> Category {
        use ComponentType::*;
        match self {
            Pipe | ConcentricPipe | ParticulateFilter => Category::Pipe,
            ConstantVolumePlenum | VariableVolumePlenum | SimpleTurbine | TwinTurbine
            | Venturi | DirectionalJunction => Category::Plenum,
            FixedDischargeCoefficient | ExternalDischargeCoefficient | FourStrokeValve
            | TwoStrokePort | RotaryDisc | ReedValve | ButterflyValve | ControlledValve
            | WasteGate | ReliefValve | TurbineStator | TurbineRotor => Category::Valve,
            OpenEnd | ClosedEnd | AnechoicEnd | PressureLoss | PipeToPlenum | Branch
            | CylinderConnection | CompressorInlet | VariablePressure
            | VolumetricCompressorConnection | ExternalConnection => Category::Boundary,
            EngineBlock | Cylinder => Category::Engine,
            Compressor | VolumetricCompressor | TurboAxis => Category::Compressor,
            Sensor | PidController | LookupTable | Gain => Category::Control,
        }
    }

    /// Short machine tag, used for search and JSON round-trips.
    pub fn tag(self) -> &'static str {
        use ComponentType::*;
        match self {
            Pipe => "pipe",
            ConcentricPipe => "concentric_pipe",
            ParticulateFilter => "particulate_filter",
            ConstantVolumePlenum => "constant_volume_plenum",
            VariableVolumePlenum => "variable_volume_plenum",
            SimpleTurbine => "simple_turbine",
            TwinTurbine => "twin_turbine",
            Venturi => "venturi",
            DirectionalJunction => "directional_junction",
            FixedDischargeCoefficient => "fixed_discharge_coefficient",
            ExternalDischargeCoefficient => "external_discharge_coefficient",
            FourStrokeValve => "four_stroke_valve",
            TwoStrokePort => "two_stroke_port",
            RotaryDisc => "rotary_disc",
            ReedValve => "reed_valve",
            ButterflyValve => "butterfly_valve",
            ControlledValve => "controlled_valve",
            WasteGate => "waste_gate",
            ReliefValve => "relief_valve",
            TurbineStator => "turbine_stator",
            TurbineRotor => "turbine_rotor",
            OpenEnd => "open_end",
            ClosedEnd => "closed_end",
            AnechoicEnd => "anechoic_end",
            PressureLoss => "pressure_loss",
            PipeToPlenum => "pipe_to_plenum",
            Branch => "branch",
            CylinderConnection => "cylinder_connection",
            CompressorInlet => "compressor_inlet",
            VariablePressure => "variable_pressure",
            VolumetricCompressorConnection => "volumetric_compressor_connection",
            ExternalConnection => "external_connection",
            EngineBlock => "engine_block",
            Cylinder => "cylinder",
            Compressor => "compressor",
            VolumetricCompressor => "volumetric_compressor",
            TurboAxis => "turbo_axis",
            Sensor => "sensor",
            PidController => "pid_controller",
            LookupTable => "lookup_table",
            Gain => "gain",
        }
    }

    /// The native OpenWAM class name. Debug/round-trip aid only.
    pub fn native_class(self) -> &'static str {
        use ComponentType::*;
        match self {
            Pipe => "TTubo",
            ConcentricPipe => "TConcentrico",
            ParticulateFilter => "TDPF",
            ConstantVolumePlenum => "TDepVolCte",
            VariableVolumePlenum => "TDepVolVariable",
            SimpleTurbine => "TTurbinaSimple",
            TwinTurbine => "TTurbinaTwin",
            Venturi => "TVenturi",
            DirectionalJunction => "TUnionDireccional",
            FixedDischargeCoefficient => "TCDFijo",
            ExternalDischargeCoefficient => "TCDExterno",
            FourStrokeValve => "TValvula4T",
            TwoStrokePort => "TLumbreras",
            RotaryDisc => "TDiscoRotativo",
            ReedValve => "TLamina",
            ButterflyValve => "TMariposa",
            ControlledValve => "TValvulaContr",
            WasteGate => "TWasteGate",
            ReliefValve => "TValvulaLimitadora",
            TurbineStator => "TEstatorTurbina",
            TurbineRotor => "TRotorTurbina",
            OpenEnd => "TCCExtremoAbierto",
            ClosedEnd => "TCCExtremoCerrado",
            AnechoicEnd => "TCCExtremoAnecoico",
            PressureLoss => "TCCPerdidaPresion",
            PipeToPlenum => "TCCDeposito",
            Branch => "TCCRamificacion",
            CylinderConnection => "TCCCilindro",
            CompressorInlet => "TCCEntradaCompresor",
            VariablePressure => "TCCPreVbl",
            VolumetricCompressorConnection => "TCCCompresorVolumetrico",
            ExternalConnection => "TCCExternalConnection",
            EngineBlock => "TBloqueMotor",
            Cylinder => "TCilindro",
            Compressor => "TCompresor",
            VolumetricCompressor => "TCompresorVolumetrico",
            TurboAxis => "TEjeTurbogrupo",
            Sensor => "TSensor",
            PidController => "TPIDController",
            LookupTable => "TTable",
            Gain => "TGain",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_no_duplicate_tags() {
        let mut seen = HashSet::new();
        for ty in ComponentType::ALL {
            assert!(seen.insert(ty.tag()), "duplicate tag {}", ty.tag());
        }
    }

    #[test]
    fn native_class_is_unique_per_type() {
        let mut seen = HashSet::new();
        for ty in ComponentType::ALL {
            assert!(seen.insert(ty.native_class()), "duplicate {}", ty.native_class());
        }
    }

    #[test]
    fn catalog_covers_every_kind() {
        let per_category = |cat| ComponentType::ALL.iter().filter(|t| t.category() == cat).count();
        assert_eq!(per_category(Category::Pipe), 3);
        assert_eq!(per_category(Category::Plenum), 6);
        assert_eq!(per_category(Category::Valve), 12);
        assert_eq!(per_category(Category::Boundary), 11);
        assert_eq!(per_category(Category::Engine), 2);
        assert_eq!(per_category(Category::Compressor), 3);
        assert_eq!(per_category(Category::Control), 4);
        assert_eq!(ComponentType::ALL.len(), 41);
    }

    #[test]
    fn every_category_has_members() {
        for cat in Category::ALL {
            assert!(
                ComponentType::ALL.iter().any(|t| t.category() == cat),
                "category {cat} has no component kinds"
            );
        }
    }
}
