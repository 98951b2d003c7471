//! Per-category property sets.
//!
//! One closed sum with a variant per category. The field names follow the
//! OpenWAM input nomenclature so that the positional mapping in the codec is
//! readable side by side with the format documentation.

use serde::{Deserialize, Serialize};
use wam_core::Category;

/// One wall layer of a pipe.
///
/// The WAM format carries the first four fields per layer; emissivity is an
/// editor-level radiative property that only travels in the JSON model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallLayer {
    pub espesor: f64,
    pub densidad: f64,
    pub calor_especifico: f64,
    pub conductividad: f64,
    #[serde(default)]
    pub emisividad: f64,
}

/// Positional fields of a pipe (`TTubo`), in WAM order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeProperties {
    pub numero_tubo: i64,
    pub nodo_izq: i64,
    pub nodo_der: i64,
    /// Cell count used by the solver discretization.
    pub nin: i64,
    pub longitud_total: f64,
    pub mallado: f64,
    pub n_tramos: i64,
    pub tipo_mallado: i64,
    /// Per-section lengths; length must equal `n_tramos`.
    pub l_tramo: Vec<f64>,
    /// Per-section external diameters; length must equal `n_tramos`.
    pub d_ext_tramo: Vec<f64>,
    pub tipo_trans_cal: i64,
    pub coef_ajus_fric: f64,
    pub coef_ajus_tc: f64,
    pub espesor_prin: f64,
    pub densidad_prin: f64,
    pub cal_esp_prin: f64,
    pub conduct_prin: f64,
    pub t_refrigerante: f64,
    /// 0 = air cooled, anything else = water cooled.
    pub tip_refrig: i64,
    pub tini: f64,
    pub pini: f64,
    pub vel_media: f64,
    pub num_capas: i64,
    /// Wall layers; length must equal `num_capas`.
    pub capas: Vec<WallLayer>,
}

impl PipeProperties {
    pub fn is_water_cooled(&self) -> bool {
        self.tip_refrig != 0
    }

    /// Check the section/layer array invariants the format requires.
    pub fn arrays_consistent(&self) -> bool {
        self.l_tramo.len() == self.n_tramos as usize
            && self.d_ext_tramo.len() == self.n_tramos as usize
            && self.capas.len() == self.num_capas as usize
    }
}

/// Positional fields of a plenum (`TDep*` family).
///
/// `numero_turbina` / `numero_venturi` are only meaningful for the turbine
/// and venturi plenum kinds respectively; `None` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlenumProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero_turbina: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero_venturi: Option<i64>,
    pub numero_deposito: i64,
    pub volumen: f64,
    pub temperatura: f64,
    pub presion: f64,
    pub masa_inicial: f64,
}

/// Valve fields. Only the WAM type tag is modeled today; the per-type body
/// is a known format extension point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveProperties {
    pub tipo_valvula: i64,
}

/// Boundary-condition fields. Same placeholder situation as valves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryProperties {
    pub tipo_cc: i64,
}

/// Engine block / cylinder geometry (editor-level; the engine general data
/// written to WAM comes from the generation config, not from here).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineProperties {
    pub numero_cilindros: i64,
    pub regimen: f64,
    pub diametro: f64,
    pub carrera: f64,
    pub biela: f64,
    pub relacion_compresion: f64,
}

/// Compressor fields. Model tag only, body is a format placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressorProperties {
    pub modelo: i64,
}

/// Sensor / controller fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlProperties {
    pub periodo: f64,
    pub ganancia: f64,
}

/// Tagged union of the per-category property sets.
///
/// Every consumption site (parser construction, generator serialization,
/// validator schema checks) matches exhaustively, so adding a category is a
/// compile-time-checked change everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum ComponentProperties {
    Pipe(PipeProperties),
    Plenum(PlenumProperties),
    Valve(ValveProperties),
    Boundary(BoundaryProperties),
    Engine(EngineProperties),
    Compressor(CompressorProperties),
    Control(ControlProperties),
}

impl ComponentProperties {
    pub fn category(&self) -> Category {
        match self {
            ComponentProperties::Pipe(_) => Category::Pipe,
            ComponentProperties::Plenum(_) => Category::Plenum,
            ComponentProperties::Valve(_) => Category::Valve,
            ComponentProperties::Boundary(_) => Category::Boundary,
            ComponentProperties::Engine(_) => Category::Engine,
            ComponentProperties::Compressor(_) => Category::Compressor,
            ComponentProperties::Control(_) => Category::Control,
        }
    }

    pub fn as_pipe(&self) -> Option<&PipeProperties> {
        match self {
            ComponentProperties::Pipe(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_plenum(&self) -> Option<&PlenumProperties> {
        match self {
            ComponentProperties::Plenum(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_boundary(&self) -> Option<&BoundaryProperties> {
        match self {
            ComponentProperties::Boundary(b) => Some(b),
            _ => None,
        }
    }
}
