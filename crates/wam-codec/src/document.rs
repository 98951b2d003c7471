//! Parsed-document and generation-config types, plus the WAM tag tables.
//!
//! Tag tables map the raw integers of the format to catalog kinds. The raw
//! tags are kept on the parsed records so an unknown tag survives a
//! round-trip untouched; only the editor-level kind mapping snaps unknown
//! tags to a fallback.

use wam_core::ComponentType;
use wam_model::{BoundaryProperties, CompressorProperties, PipeProperties, PlenumProperties, ValveProperties};

/// Engine general data: part of the file header, not a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineGeneral {
    /// 1 means two-stroke, anything else four-stroke.
    pub engine_type: i64,
    pub modeling_type: i64,
    pub has_egr: bool,
    /// Present only when `modeling_type != 0`.
    pub cycles_without_inertia: Option<i64>,
}

impl EngineGeneral {
    pub fn is_two_stroke(&self) -> bool {
        self.engine_type == 1
    }
}

/// Header data of a WAM file (steps 1-4 of the section order).
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralData {
    pub version: i64,
    pub independent: bool,
    pub angle_increment: f64,
    pub duration: f64,
    pub ambient_pressure: f64,
    pub ambient_temperature: f64,
    /// 1 means complete species calculation, anything else simple.
    pub species_calc: i64,
    pub gamma_calc: i64,
    pub engine: Option<EngineGeneral>,
    /// Fuel type tag when the model carries fuel.
    pub fuel: Option<i64>,
    /// Atmospheric composition, N-1 mass fractions (the last one is derived).
    pub atmosphere: Vec<f64>,
}

impl GeneralData {
    pub fn is_complete_species(&self) -> bool {
        self.species_calc == 1
    }
}

/// Number of transported species implied by the calculation mode.
pub fn species_count(species_calc: i64, has_fuel: bool) -> usize {
    if species_calc == 1 {
        if has_fuel { 10 } else { 9 }
    } else if has_fuel {
        4
    } else {
        3
    }
}

/// One plenum entry with its raw WAM kind tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPlenum {
    pub tag: i64,
    pub properties: PlenumProperties,
}

/// Structured intermediate representation of a whole WAM file.
///
/// Independent from the visual `EngineModel`; `to_engine_model` bridges the
/// two.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub general: GeneralData,
    pub pipes: Vec<PipeProperties>,
    /// DPF section is count-only in the current format revision.
    pub dpf_count: i64,
    /// Concentric-pipe section is count-only in the current format revision.
    pub concentric_count: i64,
    pub valves: Vec<ValveProperties>,
    pub plenums: Vec<ParsedPlenum>,
    pub compressors: Vec<CompressorProperties>,
    pub boundaries: Vec<BoundaryProperties>,
    pub turbo_axis_count: i64,
    pub sensor_count: i64,
    pub controller_count: i64,
    pub output_file_count: i64,
    pub output_type: i64,
    pub use_dll: bool,
}

/// Generation-time configuration.
///
/// Version, ambient conditions, species/gamma calculation modes, engine and
/// fuel flags are properties of the exported file, not of any component, so
/// they ride here instead of on the model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub version: i64,
    pub independent: bool,
    pub angle_increment: f64,
    pub duration: f64,
    pub ambient_pressure: f64,
    pub ambient_temperature: f64,
    pub species_calc: i64,
    pub gamma_calc: i64,
    pub engine: Option<EngineGeneral>,
    pub fuel: Option<i64>,
    pub atmosphere: Vec<f64>,
    pub output_file_count: i64,
    pub output_type: i64,
    pub use_dll: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            version: 2200,
            independent: false,
            angle_increment: 1.0,
            duration: 10.0,
            ambient_pressure: 1.0,
            ambient_temperature: 293.0,
            species_calc: 0,
            gamma_calc: 0,
            engine: None,
            fuel: None,
            // Simple calculation without fuel transports 3 species, so the
            // header carries 2 fractions.
            atmosphere: vec![0.23, 0.77],
            output_file_count: 0,
            output_type: 0,
            use_dll: false,
        }
    }
}

impl GenerationConfig {
    /// Lift the header of a parsed document back into a config, so that
    /// parse-generate round trips preserve the general data.
    pub fn from_document(doc: &ParsedDocument) -> Self {
        let g = &doc.general;
        Self {
            version: g.version,
            independent: g.independent,
            angle_increment: g.angle_increment,
            duration: g.duration,
            ambient_pressure: g.ambient_pressure,
            ambient_temperature: g.ambient_temperature,
            species_calc: g.species_calc,
            gamma_calc: g.gamma_calc,
            engine: g.engine.clone(),
            fuel: g.fuel,
            atmosphere: g.atmosphere.clone(),
            output_file_count: doc.output_file_count,
            output_type: doc.output_type,
            use_dll: doc.use_dll,
        }
    }
}

// --- tag tables --------------------------------------------------------

pub const PLENUM_TAG_CONSTANT_VOLUME: i64 = 0;
pub const PLENUM_TAG_VARIABLE_VOLUME: i64 = 1;
pub const PLENUM_TAG_SIMPLE_TURBINE: i64 = 2;
pub const PLENUM_TAG_TWIN_TURBINE: i64 = 3;
pub const PLENUM_TAG_VENTURI: i64 = 4;
pub const PLENUM_TAG_DIRECTIONAL_JUNCTION: i64 = 5;

pub fn is_turbine_plenum_tag(tag: i64) -> bool {
    matches!(tag, PLENUM_TAG_SIMPLE_TURBINE | PLENUM_TAG_TWIN_TURBINE)
}

pub fn is_venturi_plenum_tag(tag: i64) -> bool {
    tag == PLENUM_TAG_VENTURI
}

/// Catalog kind for a plenum tag; unknown tags fall back to constant volume.
pub fn plenum_kind_from_tag(tag: i64) -> ComponentType {
    match tag {
        PLENUM_TAG_VARIABLE_VOLUME => ComponentType::VariableVolumePlenum,
        PLENUM_TAG_SIMPLE_TURBINE => ComponentType::SimpleTurbine,
        PLENUM_TAG_TWIN_TURBINE => ComponentType::TwinTurbine,
        PLENUM_TAG_VENTURI => ComponentType::Venturi,
        PLENUM_TAG_DIRECTIONAL_JUNCTION => ComponentType::DirectionalJunction,
        _ => ComponentType::ConstantVolumePlenum,
    }
}

pub fn plenum_tag(kind: ComponentType) -> i64 {
    match kind {
        ComponentType::VariableVolumePlenum => PLENUM_TAG_VARIABLE_VOLUME,
        ComponentType::SimpleTurbine => PLENUM_TAG_SIMPLE_TURBINE,
        ComponentType::TwinTurbine => PLENUM_TAG_TWIN_TURBINE,
        ComponentType::Venturi => PLENUM_TAG_VENTURI,
        ComponentType::DirectionalJunction => PLENUM_TAG_DIRECTIONAL_JUNCTION,
        _ => PLENUM_TAG_CONSTANT_VOLUME,
    }
}

/// Catalog kind for a valve tag; unknown tags fall back to fixed CD.
pub fn valve_kind_from_tag(tag: i64) -> ComponentType {
    match tag {
        1 => ComponentType::FourStrokeValve,
        2 => ComponentType::TwoStrokePort,
        3 => ComponentType::RotaryDisc,
        4 => ComponentType::ReedValve,
        5 => ComponentType::ExternalDischargeCoefficient,
        6 => ComponentType::ButterflyValve,
        7 => ComponentType::ControlledValve,
        8 => ComponentType::WasteGate,
        9 => ComponentType::ReliefValve,
        10 => ComponentType::TurbineStator,
        11 => ComponentType::TurbineRotor,
        _ => ComponentType::FixedDischargeCoefficient,
    }
}

/// Catalog kind for a boundary tag; unknown tags fall back to open end.
pub fn boundary_kind_from_tag(tag: i64) -> ComponentType {
    match tag {
        1 => ComponentType::ClosedEnd,
        2 => ComponentType::AnechoicEnd,
        3 => ComponentType::PressureLoss,
        4 => ComponentType::PipeToPlenum,
        5 => ComponentType::Branch,
        6 => ComponentType::CylinderConnection,
        7 => ComponentType::CompressorInlet,
        8 => ComponentType::VariablePressure,
        9 => ComponentType::VolumetricCompressorConnection,
        10 => ComponentType::ExternalConnection,
        _ => ComponentType::OpenEnd,
    }
}

/// Catalog kind for a compressor model tag.
pub fn compressor_kind_from_tag(tag: i64) -> ComponentType {
    if tag == 1 {
        ComponentType::VolumetricCompressor
    } else {
        ComponentType::Compressor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn species_counts_follow_mode_and_fuel() {
        assert_eq!(species_count(1, true), 10);
        assert_eq!(species_count(1, false), 9);
        assert_eq!(species_count(0, true), 4);
        assert_eq!(species_count(0, false), 3);
        // Anything other than 1 is the simple mode.
        assert_eq!(species_count(7, false), 3);
    }

    #[test]
    fn plenum_tags_round_trip_for_known_kinds() {
        for tag in 0..=5 {
            assert_eq!(plenum_tag(plenum_kind_from_tag(tag)), tag);
        }
    }
}
