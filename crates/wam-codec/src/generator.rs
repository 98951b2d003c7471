//! The WAM generator.
//!
//! Structural inverse of the parser: same fixed section order, same
//! conditional-field logic, driven by a `GenerationConfig` for everything
//! that is file-level rather than component-level. Emits plain `Display`
//! formatting for floats (shortest round-trip, locale-free), one section
//! per line.

use tracing::debug;
use wam_core::{Category, ComponentType};
use wam_model::{ComponentProperties, EngineModel, PipeProperties, PlenumProperties};

use crate::document::{GenerationConfig, plenum_tag, species_count};
use crate::error::GenerationError;

/// Token-stream writer. Tokens on one line are space-separated; sections
/// are newline-separated. The reader ignores the layout either way.
#[derive(Debug, Default)]
struct WamWriter {
    out: String,
    line_has_tokens: bool,
}

impl WamWriter {
    fn int(&mut self, v: i64) -> &mut Self {
        self.push_token(&v.to_string());
        self
    }

    fn flag(&mut self, v: bool) -> &mut Self {
        self.int(if v { 1 } else { 0 })
    }

    fn float(&mut self, v: f64) -> &mut Self {
        self.push_token(&format!("{v}"));
        self
    }

    fn endl(&mut self) -> &mut Self {
        self.out.push('\n');
        self.line_has_tokens = false;
        self
    }

    fn push_token(&mut self, token: &str) {
        if self.line_has_tokens {
            self.out.push(' ');
        }
        self.out.push_str(token);
        self.line_has_tokens = true;
    }

    fn finish(mut self) -> String {
        if self.line_has_tokens {
            self.out.push('\n');
        }
        self.out
    }
}

/// Serialize a model to WAM text.
pub fn generate(model: &EngineModel, config: &GenerationConfig) -> Result<String, GenerationError> {
    let expected_atmosphere = species_count(config.species_calc, config.fuel.is_some()) - 1;
    if config.atmosphere.len() != expected_atmosphere {
        return Err(GenerationError::BadAtmosphere {
            expected: expected_atmosphere,
            actual: config.atmosphere.len(),
        });
    }

    let mut w = WamWriter::default();

    write_general(&mut w, config);
    write_pipes(&mut w, model)?;

    // Count-only placeholder sections.
    w.int(count_of(model, ComponentType::ParticulateFilter)).endl();
    w.int(count_of(model, ComponentType::ConcentricPipe)).endl();

    write_valves(&mut w, model)?;
    write_plenums(&mut w, model)?;
    write_compressors(&mut w, model)?;
    write_boundaries(&mut w, model)?;

    w.int(count_of(model, ComponentType::TurboAxis)).endl();
    w.int(count_of(model, ComponentType::Sensor)).endl();
    let controllers = model
        .components
        .iter()
        .filter(|c| {
            matches!(
                c.kind,
                ComponentType::PidController | ComponentType::LookupTable | ComponentType::Gain
            )
        })
        .count() as i64;
    w.int(controllers).endl();

    w.int(config.output_file_count).int(config.output_type).endl();
    w.flag(config.use_dll).endl();

    debug!(bytes = w.out.len(), "generated WAM document");
    Ok(w.finish())
}

fn count_of(model: &EngineModel, kind: ComponentType) -> i64 {
    model.components.iter().filter(|c| c.kind == kind).count() as i64
}

fn write_general(w: &mut WamWriter, config: &GenerationConfig) {
    w.int(config.version).flag(config.independent).endl();

    w.float(config.angle_increment)
        .float(config.duration)
        .float(config.ambient_pressure)
        .float(config.ambient_temperature)
        .int(config.species_calc)
        .int(config.gamma_calc)
        .flag(config.engine.is_some())
        .endl();

    if let Some(engine) = &config.engine {
        w.int(engine.engine_type)
            .int(engine.modeling_type)
            .flag(engine.has_egr);
        if engine.modeling_type != 0 {
            // The parser only reads this field when modeling is non-zero.
            w.int(engine.cycles_without_inertia.unwrap_or(0));
        }
        w.endl();
    }

    w.flag(config.fuel.is_some());
    if let Some(fuel) = config.fuel {
        w.int(fuel);
    }
    w.endl();

    for value in &config.atmosphere {
        w.float(*value);
    }
    w.endl();
}

fn pipe_properties<'m>(
    component_id: &str,
    properties: &'m ComponentProperties,
) -> Result<&'m PipeProperties, GenerationError> {
    properties.as_pipe().ok_or_else(|| GenerationError::WrongProperties {
        component_id: component_id.to_string(),
        expected: Category::Pipe,
    })
}

fn write_pipes(w: &mut WamWriter, model: &EngineModel) -> Result<(), GenerationError> {
    let pipes: Vec<_> = model
        .components
        .iter()
        .filter(|c| c.kind == ComponentType::Pipe)
        .collect();

    w.int(pipes.len() as i64).endl();

    for component in pipes {
        let p = pipe_properties(&component.id, &component.properties)?;

        if p.l_tramo.len() != p.n_tramos as usize || p.d_ext_tramo.len() != p.n_tramos as usize {
            return Err(GenerationError::MismatchedSections {
                component_id: component.id.clone(),
            });
        }
        if p.capas.len() != p.num_capas as usize {
            return Err(GenerationError::MismatchedLayers {
                component_id: component.id.clone(),
            });
        }
        for (field, value) in [
            ("longitud_total", p.longitud_total),
            ("mallado", p.mallado),
            ("tini", p.tini),
            ("pini", p.pini),
        ] {
            if !value.is_finite() {
                return Err(GenerationError::NonFinite {
                    component_id: component.id.clone(),
                    field,
                });
            }
        }

        w.int(p.numero_tubo)
            .int(p.nodo_izq)
            .int(p.nodo_der)
            .int(p.nin)
            .int(0) // native class id slot
            .endl();

        w.float(p.longitud_total)
            .float(p.mallado)
            .int(p.n_tramos)
            .int(p.tipo_mallado)
            .endl();

        for (l, d) in p.l_tramo.iter().zip(&p.d_ext_tramo) {
            w.float(*l).float(*d);
        }
        w.endl();

        w.int(p.tipo_trans_cal)
            .float(p.coef_ajus_fric)
            .float(p.coef_ajus_tc)
            .endl();

        w.float(p.espesor_prin)
            .float(p.densidad_prin)
            .float(p.cal_esp_prin)
            .float(p.conduct_prin)
            .endl();

        w.float(p.t_refrigerante).int(p.tip_refrig).endl();

        w.float(p.tini).float(p.pini).float(p.vel_media).endl();

        w.int(p.num_capas).endl();
        for layer in &p.capas {
            w.float(layer.espesor)
                .float(layer.densidad)
                .float(layer.calor_especifico)
                .float(layer.conductividad)
                .endl();
        }
    }

    Ok(())
}

fn write_valves(w: &mut WamWriter, model: &EngineModel) -> Result<(), GenerationError> {
    let valves: Vec<_> = model
        .components
        .iter()
        .filter(|c| c.kind.category() == Category::Valve)
        .collect();

    w.int(valves.len() as i64).endl();
    for component in valves {
        let tipo = match &component.properties {
            ComponentProperties::Valve(v) => v.tipo_valvula,
            _ => {
                return Err(GenerationError::WrongProperties {
                    component_id: component.id.clone(),
                    expected: Category::Valve,
                });
            }
        };
        // Type-specific body is a placeholder in this format revision.
        w.int(tipo).endl();
    }
    Ok(())
}

fn plenum_properties<'m>(
    component_id: &str,
    properties: &'m ComponentProperties,
) -> Result<&'m PlenumProperties, GenerationError> {
    properties.as_plenum().ok_or_else(|| GenerationError::WrongProperties {
        component_id: component_id.to_string(),
        expected: Category::Plenum,
    })
}

fn write_plenums(w: &mut WamWriter, model: &EngineModel) -> Result<(), GenerationError> {
    let plenums: Vec<_> = model
        .components
        .iter()
        .filter(|c| c.kind.category() == Category::Plenum)
        .collect();

    let turbines = plenums
        .iter()
        .filter(|c| matches!(c.kind, ComponentType::SimpleTurbine | ComponentType::TwinTurbine))
        .count() as i64;
    let venturis = plenums
        .iter()
        .filter(|c| c.kind == ComponentType::Venturi)
        .count() as i64;
    let unions = plenums
        .iter()
        .filter(|c| c.kind == ComponentType::DirectionalJunction)
        .count() as i64;

    w.int(plenums.len() as i64)
        .int(turbines)
        .int(venturis)
        .int(unions)
        .endl();

    for component in plenums {
        let p = plenum_properties(&component.id, &component.properties)?;
        let tag = plenum_tag(component.kind);

        w.int(tag);
        if matches!(component.kind, ComponentType::SimpleTurbine | ComponentType::TwinTurbine) {
            w.int(p.numero_turbina.unwrap_or(1));
        }
        if component.kind == ComponentType::Venturi {
            w.int(p.numero_venturi.unwrap_or(1));
        }

        w.int(p.numero_deposito)
            .float(p.volumen)
            .float(p.temperatura)
            .float(p.presion)
            .float(p.masa_inicial)
            .endl();
    }

    Ok(())
}

fn write_compressors(w: &mut WamWriter, model: &EngineModel) -> Result<(), GenerationError> {
    let compressors: Vec<_> = model
        .components
        .iter()
        .filter(|c| {
            matches!(
                c.kind,
                ComponentType::Compressor | ComponentType::VolumetricCompressor
            )
        })
        .collect();

    w.int(compressors.len() as i64).endl();
    for component in compressors {
        let modelo = match &component.properties {
            ComponentProperties::Compressor(c) => c.modelo,
            _ => {
                return Err(GenerationError::WrongProperties {
                    component_id: component.id.clone(),
                    expected: Category::Compressor,
                });
            }
        };
        w.int(modelo).endl();
    }
    Ok(())
}

fn write_boundaries(w: &mut WamWriter, model: &EngineModel) -> Result<(), GenerationError> {
    let boundaries: Vec<_> = model
        .components
        .iter()
        .filter(|c| c.kind.category() == Category::Boundary)
        .collect();

    w.int(boundaries.len() as i64);
    // Legacy WAMer-compatibility block.
    for _ in 0..9 {
        w.int(0);
    }
    w.endl();

    for component in boundaries {
        let tipo = match &component.properties {
            ComponentProperties::Boundary(b) => b.tipo_cc,
            _ => {
                return Err(GenerationError::WrongProperties {
                    component_id: component.id.clone(),
                    expected: Category::Boundary,
                });
            }
        };
        w.int(tipo).endl();
    }
    Ok(())
}
