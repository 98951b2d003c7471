use wam_core::ComponentType;
use wam_model::*;

fn sample_pipe(id: &str, left: i64, right: i64) -> ModelComponent {
    ModelComponent {
        id: id.to_string(),
        kind: ComponentType::Pipe,
        position: Position::new(40.0, 80.0),
        rotation: 0.0,
        properties: ComponentProperties::Pipe(PipeProperties {
            numero_tubo: 1,
            nodo_izq: left,
            nodo_der: right,
            nin: 20,
            longitud_total: 0.6,
            mallado: 0.01,
            n_tramos: 1,
            tipo_mallado: 0,
            l_tramo: vec![0.6],
            d_ext_tramo: vec![0.045],
            tipo_trans_cal: 1,
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
            num_capas: 1,
            capas: vec![WallLayer {
                espesor: 0.002,
                densidad: 7800.0,
                calor_especifico: 490.0,
                conductividad: 50.0,
                emisividad: 0.8,
            }],
        }),
        display_name: Some("Intake runner".to_string()),
    }
}

#[test]
fn roundtrip_json_empty_model() {
    let model = EngineModel::new("Empty");

    let path = std::env::temp_dir().join("wam_model_roundtrip_empty.json");
    save_json(&path, &model).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(model, loaded);
}

#[test]
fn roundtrip_json_populated_model() {
    let mut model = EngineModel::new("Single cylinder intake");
    model.add_component(sample_pipe("p1", 1, 2));
    model.add_component(ModelComponent {
        id: "bc1".to_string(),
        kind: ComponentType::OpenEnd,
        position: Position::new(200.0, 80.0),
        rotation: 90.0,
        properties: ComponentProperties::Boundary(BoundaryProperties { tipo_cc: 0 }),
        display_name: None,
    });
    model.add_connection(Connection::new("e1", "p1", "right", "bc1", "pipe"));

    let path = std::env::temp_dir().join("wam_model_roundtrip_populated.json");
    save_json(&path, &model).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(model, loaded);
}

#[test]
fn load_rejects_future_schema_version() {
    let mut model = EngineModel::new("Future");
    model.metadata.version = SCHEMA_VERSION + 1;

    let path = std::env::temp_dir().join("wam_model_future_version.json");
    save_json(&path, &model).unwrap();

    let err = load_json(&path).unwrap_err();
    assert!(matches!(err, ModelError::UnsupportedVersion { .. }));
}

#[test]
fn fresh_ids_are_unique() {
    let a = fresh_id();
    let b = fresh_id();
    assert_ne!(a, b);
}
