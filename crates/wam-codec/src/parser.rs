//! The WAM parser.
//!
//! Consumes the token stream in the fixed OpenWAM section order. Field
//! identity is purely positional and branches on earlier values, so every
//! conditional read is an explicit `if` keyed off the flag just consumed.
//! One error aborts the whole parse; there is no recovery.

use tracing::debug;
use wam_model::{BoundaryProperties, CompressorProperties, PipeProperties, PlenumProperties, ValveProperties, WallLayer};

use crate::cursor::TokenCursor;
use crate::document::{
    EngineGeneral, GeneralData, ParsedDocument, ParsedPlenum, is_turbine_plenum_tag,
    is_venturi_plenum_tag, species_count,
};
use crate::error::{ParseCause, ParseError};

/// Parse a complete WAM text buffer.
pub fn parse(text: &str) -> Result<ParsedDocument, ParseError> {
    let mut cursor = TokenCursor::new(text);

    let general = read_general(&mut cursor)?;
    let pipes = read_pipes(&mut cursor)?;

    // DPF and concentric-pipe sections carry only their element count in
    // this format revision; the per-element bodies are an extension point.
    let dpf_count = read_count(&mut cursor, "DPF")?;
    let concentric_count = read_count(&mut cursor, "concentric pipe")?;

    let valves = read_valves(&mut cursor)?;
    let plenums = read_plenums(&mut cursor)?;
    let compressors = read_compressors(&mut cursor)?;
    let boundaries = read_boundaries(&mut cursor)?;

    let turbo_axis_count = read_count(&mut cursor, "turbo axis")?;
    let sensor_count = read_count(&mut cursor, "sensor")?;
    let controller_count = read_count(&mut cursor, "controller")?;

    let output_file_count = cursor.read_int()?;
    let output_type = cursor.read_int()?;
    let use_dll = cursor.read_int()? != 0;

    debug!(
        pipes = pipes.len(),
        plenums = plenums.len(),
        boundaries = boundaries.len(),
        "parsed WAM document"
    );

    Ok(ParsedDocument {
        general,
        pipes,
        dpf_count,
        concentric_count,
        valves,
        plenums,
        compressors,
        boundaries,
        turbo_axis_count,
        sensor_count,
        controller_count,
        output_file_count,
        output_type,
        use_dll,
    })
}

/// Read a non-negative element count.
fn read_count(cursor: &mut TokenCursor<'_>, what: &'static str) -> Result<i64, ParseError> {
    let value = cursor.read_int()?;
    if value < 0 {
        return Err(ParseError {
            line: cursor.current_line(),
            cause: ParseCause::NegativeCount { what, value },
        });
    }
    Ok(value)
}

fn read_general(cursor: &mut TokenCursor<'_>) -> Result<GeneralData, ParseError> {
    let version = cursor.read_int()?;
    let independent = cursor.read_int()? != 0;

    let angle_increment = cursor.read_float()?;
    let duration = cursor.read_float()?;
    let ambient_pressure = cursor.read_float()?;
    let ambient_temperature = cursor.read_float()?;
    let species_calc = cursor.read_int()?;
    let gamma_calc = cursor.read_int()?;

    let engine = if cursor.read_int()? != 0 {
        let engine_type = cursor.read_int()?;
        let modeling_type = cursor.read_int()?;
        let has_egr = cursor.read_int()? != 0;
        let cycles_without_inertia = if modeling_type != 0 {
            Some(cursor.read_int()?)
        } else {
            None
        };
        Some(EngineGeneral {
            engine_type,
            modeling_type,
            has_egr,
            cycles_without_inertia,
        })
    } else {
        None
    };

    let fuel = if cursor.read_int()? != 0 {
        Some(cursor.read_int()?)
    } else {
        None
    };

    let n_species = species_count(species_calc, fuel.is_some());
    let mut atmosphere = Vec::with_capacity(n_species - 1);
    for _ in 0..n_species - 1 {
        atmosphere.push(cursor.read_float()?);
    }

    Ok(GeneralData {
        version,
        independent,
        angle_increment,
        duration,
        ambient_pressure,
        ambient_temperature,
        species_calc,
        gamma_calc,
        engine,
        fuel,
        atmosphere,
    })
}

/// Allocation hint for a file-supplied element count.
///
/// Capped by the tokens actually left, so a count larger than the rest of
/// the file fails at the normal out-of-tokens check instead of in the
/// allocator.
fn capacity_hint(count: i64, cursor: &TokenCursor<'_>) -> usize {
    (count as usize).min(cursor.remaining())
}

fn read_pipes(cursor: &mut TokenCursor<'_>) -> Result<Vec<PipeProperties>, ParseError> {
    let count = read_count(cursor, "pipe")?;
    let mut pipes = Vec::with_capacity(capacity_hint(count, cursor));

    for _ in 0..count {
        let numero_tubo = cursor.read_int()?;
        let nodo_izq = cursor.read_int()?;
        let nodo_der = cursor.read_int()?;
        let nin = cursor.read_int()?;
        // Native class id; carries no information the kind tag doesn't.
        let _class_id = cursor.read_int()?;

        let longitud_total = cursor.read_float()?;
        let mallado = cursor.read_float()?;
        let n_tramos = read_count(cursor, "pipe section")?;
        let tipo_mallado = cursor.read_int()?;

        let mut l_tramo = Vec::with_capacity(capacity_hint(n_tramos, cursor));
        let mut d_ext_tramo = Vec::with_capacity(capacity_hint(n_tramos, cursor));
        for _ in 0..n_tramos {
            l_tramo.push(cursor.read_float()?);
            d_ext_tramo.push(cursor.read_float()?);
        }

        let tipo_trans_cal = cursor.read_int()?;
        let coef_ajus_fric = cursor.read_float()?;
        let coef_ajus_tc = cursor.read_float()?;

        let espesor_prin = cursor.read_float()?;
        let densidad_prin = cursor.read_float()?;
        let cal_esp_prin = cursor.read_float()?;
        let conduct_prin = cursor.read_float()?;

        let t_refrigerante = cursor.read_float()?;
        let tip_refrig = cursor.read_int()?;

        let tini = cursor.read_float()?;
        let pini = cursor.read_float()?;
        let vel_media = cursor.read_float()?;

        let num_capas = read_count(cursor, "wall layer")?;
        let mut capas = Vec::with_capacity(capacity_hint(num_capas, cursor));
        for _ in 0..num_capas {
            capas.push(WallLayer {
                espesor: cursor.read_float()?,
                densidad: cursor.read_float()?,
                calor_especifico: cursor.read_float()?,
                conductividad: cursor.read_float()?,
                emisividad: 0.0,
            });
        }

        debug!(pipe = numero_tubo, sections = n_tramos, layers = num_capas, "parsed pipe");

        pipes.push(PipeProperties {
            numero_tubo,
            nodo_izq,
            nodo_der,
            nin,
            longitud_total,
            mallado,
            n_tramos,
            tipo_mallado,
            l_tramo,
            d_ext_tramo,
            tipo_trans_cal,
            coef_ajus_fric,
            coef_ajus_tc,
            espesor_prin,
            densidad_prin,
            cal_esp_prin,
            conduct_prin,
            t_refrigerante,
            tip_refrig,
            tini,
            pini,
            vel_media,
            num_capas,
            capas,
        });
    }

    Ok(pipes)
}

fn read_valves(cursor: &mut TokenCursor<'_>) -> Result<Vec<ValveProperties>, ParseError> {
    let count = read_count(cursor, "valve")?;
    let mut valves = Vec::with_capacity(capacity_hint(count, cursor));
    for _ in 0..count {
        // Type-specific valve bodies are a format extension point; only the
        // kind tag is carried today.
        valves.push(ValveProperties {
            tipo_valvula: cursor.read_int()?,
        });
    }
    Ok(valves)
}

fn read_plenums(cursor: &mut TokenCursor<'_>) -> Result<Vec<ParsedPlenum>, ParseError> {
    let count = read_count(cursor, "plenum")?;
    let _turbine_count = read_count(cursor, "turbine")?;
    let _venturi_count = read_count(cursor, "venturi")?;
    let _union_count = read_count(cursor, "directional union")?;

    let mut plenums = Vec::with_capacity(capacity_hint(count, cursor));
    for _ in 0..count {
        let tag = cursor.read_int()?;

        let numero_turbina = if is_turbine_plenum_tag(tag) {
            Some(cursor.read_int()?)
        } else {
            None
        };
        let numero_venturi = if is_venturi_plenum_tag(tag) {
            Some(cursor.read_int()?)
        } else {
            None
        };

        let numero_deposito = cursor.read_int()?;
        let volumen = cursor.read_float()?;
        let temperatura = cursor.read_float()?;
        let presion = cursor.read_float()?;
        let masa_inicial = cursor.read_float()?;

        plenums.push(ParsedPlenum {
            tag,
            properties: PlenumProperties {
                numero_turbina,
                numero_venturi,
                numero_deposito,
                volumen,
                temperatura,
                presion,
                masa_inicial,
            },
        });
    }

    Ok(plenums)
}

fn read_compressors(cursor: &mut TokenCursor<'_>) -> Result<Vec<CompressorProperties>, ParseError> {
    let count = read_count(cursor, "compressor")?;
    let mut compressors = Vec::with_capacity(capacity_hint(count, cursor));
    for _ in 0..count {
        compressors.push(CompressorProperties {
            modelo: cursor.read_int()?,
        });
    }
    Ok(compressors)
}

fn read_boundaries(cursor: &mut TokenCursor<'_>) -> Result<Vec<BoundaryProperties>, ParseError> {
    let count = read_count(cursor, "boundary")?;

    // Nine legacy WAMer-compatibility integers, consumed and discarded.
    for _ in 0..9 {
        let _ = cursor.read_int()?;
    }

    let mut boundaries = Vec::with_capacity(capacity_hint(count, cursor));
    for _ in 0..count {
        boundaries.push(BoundaryProperties {
            tipo_cc: cursor.read_int()?,
        });
    }
    Ok(boundaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseCause;

    /// Header: no engine, no fuel, simple species (2 composition floats).
    const HEADER: &str = "2200 0\n1.0 10.0 1.0 293.0 0 0 0\n0\n0.23 0.77\n";
    /// Empty element sections plus the output/DLL tail.
    const EMPTY_TAIL: &str = "0\n0\n0\n0 0 0 0\n0\n0 0 0 0 0 0 0 0 0 0\n0 0 0\n0 0\n0\n";

    fn one_pipe_section() -> String {
        // id nodes cells class / length mesh n_tramos mesh_type / sections /
        // heat friction tc / wall / coolant / init / layers
        "1\n\
         1 1 2 20 0\n\
         0.5 0.01 1 0\n\
         0.5 0.05\n\
         0 1.0 1.0\n\
         0.002 7800.0 490.0 50.0\n\
         363.0 1\n\
         300.0 1.0 0.0\n\
         0\n"
            .to_string()
    }

    #[test]
    fn parses_minimal_document() {
        let text = format!("{HEADER}{}{EMPTY_TAIL}", one_pipe_section());
        let doc = parse(&text).unwrap();

        assert_eq!(doc.general.version, 2200);
        assert!(!doc.general.independent);
        assert!(doc.general.engine.is_none());
        assert_eq!(doc.general.atmosphere, vec![0.23, 0.77]);
        assert_eq!(doc.pipes.len(), 1);
        assert_eq!(doc.pipes[0].nodo_izq, 1);
        assert_eq!(doc.pipes[0].nodo_der, 2);
        assert_eq!(doc.pipes[0].l_tramo, vec![0.5]);
        assert!(!doc.use_dll);
    }

    #[test]
    fn engine_section_is_conditional_on_flag() {
        // has-engine=1, four stroke, modeling 2 => cycles field present.
        let header = "2200 0\n1.0 10.0 1.0 293.0 0 0 1\n0 2 1 5\n0\n0.23 0.77\n";
        let text = format!("{header}0\n{EMPTY_TAIL}");
        let doc = parse(&text).unwrap();

        let engine = doc.general.engine.unwrap();
        assert!(!engine.is_two_stroke());
        assert_eq!(engine.modeling_type, 2);
        assert!(engine.has_egr);
        assert_eq!(engine.cycles_without_inertia, Some(5));
    }

    #[test]
    fn engine_without_thermal_inertia_cycles() {
        // modeling_type 0 => no cycles token follows.
        let header = "2200 0\n1.0 10.0 1.0 293.0 0 0 1\n1 0 0\n0\n0.23 0.77\n";
        let text = format!("{header}0\n{EMPTY_TAIL}");
        let doc = parse(&text).unwrap();

        let engine = doc.general.engine.unwrap();
        assert!(engine.is_two_stroke());
        assert_eq!(engine.cycles_without_inertia, None);
    }

    #[test]
    fn fuel_changes_atmosphere_width() {
        // Simple species with fuel => 4 species => 3 composition floats.
        let header = "2200 0\n1.0 10.0 1.0 293.0 0 0 0\n1 2\n0.23 0.75 0.02\n";
        let text = format!("{header}0\n{EMPTY_TAIL}");
        let doc = parse(&text).unwrap();

        assert_eq!(doc.general.fuel, Some(2));
        assert_eq!(doc.general.atmosphere.len(), 3);
    }

    #[test]
    fn complete_species_reads_wide_atmosphere() {
        let fractions = "0.1 0.1 0.1 0.1 0.1 0.1 0.1 0.3";
        let header = format!("2200 0\n1.0 10.0 1.0 293.0 1 0 0\n0\n{fractions}\n");
        let text = format!("{header}0\n{EMPTY_TAIL}");
        let doc = parse(&text).unwrap();
        assert_eq!(doc.general.atmosphere.len(), 8);
    }

    #[test]
    fn turbine_plenum_reads_turbine_number() {
        let plenums = "1 1 0 0\n2 3 1 0.002 300.0 1.0 0.0023\n";
        let text = format!("{HEADER}0\n0 0\n0\n{plenums}0\n0 0 0 0 0 0 0 0 0 0\n0 0 0\n0 0\n0\n");
        let doc = parse(&text).unwrap();

        assert_eq!(doc.plenums.len(), 1);
        assert_eq!(doc.plenums[0].tag, 2);
        assert_eq!(doc.plenums[0].properties.numero_turbina, Some(3));
        assert_eq!(doc.plenums[0].properties.numero_venturi, None);
    }

    #[test]
    fn truncated_input_fails_with_eof() {
        let err = parse("2200 0\n1.0 10.0\n").unwrap_err();
        assert_eq!(err.cause, ParseCause::UnexpectedEof);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn count_larger_than_remaining_tokens_fails() {
        // Pipe count says 3 but no pipe bodies follow.
        let text = format!("{HEADER}3\n");
        let err = parse(&text).unwrap_err();
        assert_eq!(err.cause, ParseCause::UnexpectedEof);
    }

    #[test]
    fn absurd_pipe_count_fails_instead_of_allocating() {
        let text = format!("{HEADER}4000000000000000000\n");
        let err = parse(&text).unwrap_err();
        assert_eq!(err.cause, ParseCause::UnexpectedEof);
    }

    #[test]
    fn absurd_wall_layer_count_fails_instead_of_allocating() {
        let pipe = one_pipe_section().replace("\n0\n", "\n4000000000000000000\n");
        let text = format!("{HEADER}{pipe}");
        let err = parse(&text).unwrap_err();
        assert_eq!(err.cause, ParseCause::UnexpectedEof);
    }

    #[test]
    fn negative_count_is_rejected() {
        let text = format!("{HEADER}-1\n");
        let err = parse(&text).unwrap_err();
        assert!(matches!(err.cause, ParseCause::NegativeCount { what: "pipe", value: -1 }));
    }

    #[test]
    fn non_numeric_token_names_line() {
        let err = parse("2200 0\n1.0 ten\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(matches!(err.cause, ParseCause::Malformed { .. }));
    }
}
