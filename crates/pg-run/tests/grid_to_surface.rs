//! End-to-end: grid design -> engine evaluation -> pivot -> HTML artifacts.

use pg_doe::{Design, DoeConfig, DoeMethod};
use pg_engine::{
    Composition, EngineSession, IdealGasBackend, OutputProperty, PropertyBackend,
    RawResponse, ScriptedBackend,
};
use pg_run::{
    evaluate_design, pivot, write_scatter_html, write_surface_html, FailurePolicy, PivotError,
    PlotAxes,
};

const OUTPUTS: [OutputProperty; 5] = [
    OutputProperty::Temperature,
    OutputProperty::Pressure,
    OutputProperty::Density,
    OutputProperty::Viscosity,
    OutputProperty::PhaseIndicator,
];

fn grid_design(n_t: usize, n_p: usize) -> Design {
    Design::generate(&DoeConfig {
        temperature_range: (268.15, 353.15),
        pressure_range: (2e2, 5.0101325e7),
        n_temperature: n_t,
        n_pressure: n_p,
        method: DoeMethod::Grid,
        seed: None,
    })
    .unwrap()
}

fn axes() -> PlotAxes {
    PlotAxes {
        x: "P".to_string(),
        y: "T".to_string(),
        z: "D".to_string(),
        color: "PIP".to_string(),
    }
}

#[test]
fn grid_run_produces_both_artifacts() {
    let session = EngineSession::init(
        IdealGasBackend::new(),
        Composition::pure("CO2"),
        None,
        None,
    )
    .unwrap();
    let design = grid_design(6, 5);

    let table =
        evaluate_design(&session, &design, &OUTPUTS, FailurePolicy::Abort, None).unwrap();
    assert_eq!(table.len(), 30);

    // Pivot on the T/P axis codes, as the plots do.
    let pivoted = pivot(&table, "P", "T", "D").unwrap();
    assert_eq!(pivoted.x_values.len(), 5);
    assert_eq!(pivoted.y_values.len(), 6);

    // Density grows with pressure along each row.
    for row in &pivoted.z {
        for pair in row.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let surface_path = dir.path().join("surface.html");
    let scatter_path = dir.path().join("scatter.html");
    write_surface_html(&pivoted, &axes(), &surface_path).unwrap();
    write_scatter_html(&table, &axes(), &scatter_path).unwrap();
    assert!(surface_path.exists());
    assert!(scatter_path.exists());
}

#[test]
fn grid_pivots_on_t_and_p_despite_imprecise_engine_echoes() {
    // The echoed T depends on P in the last bits, so no two state points
    // share an echoed temperature. The surface pivot must use the design's
    // axis values, not the echoes.
    let backend = ScriptedBackend::new(|req| {
        let t_echo = req.temperature_k * (1.0 + 1e-12 * req.pressure_pa / 1e5);
        RawResponse::ok(vec![t_echo, req.pressure_pa, 1.7, 1.5e-5, 1.0])
    });
    let session =
        EngineSession::init(backend, Composition::pure("CO2"), None, None).unwrap();
    let design = grid_design(3, 2);

    let table =
        evaluate_design(&session, &design, &OUTPUTS, FailurePolicy::Abort, None).unwrap();

    let pivoted = pivot(&table, "P", "T", "D").unwrap();
    assert_eq!(pivoted.x_values.len(), 2);
    assert_eq!(pivoted.y_values.len(), 3);
    // The pivot axes are the design's exact values, endpoints included.
    assert_eq!(pivoted.y_values[0], 268.15);
    assert_eq!(pivoted.y_values[2], 353.15);

    let dir = tempfile::tempdir().unwrap();
    let surface_path = dir.path().join("surface.html");
    write_surface_html(&pivoted, &axes(), &surface_path).unwrap();
    assert!(surface_path.exists());
}

#[test]
fn latin_hypercube_run_cannot_be_pivoted() {
    let session = EngineSession::init(
        IdealGasBackend::new(),
        Composition::pure("N2"),
        None,
        None,
    )
    .unwrap();
    let design = Design::generate(&DoeConfig {
        temperature_range: (268.15, 353.15),
        pressure_range: (2e2, 5.0101325e7),
        n_temperature: 4,
        n_pressure: 4,
        method: DoeMethod::LatinHypercube,
        seed: Some(11),
    })
    .unwrap();

    let table =
        evaluate_design(&session, &design, &OUTPUTS, FailurePolicy::Abort, None).unwrap();
    assert_eq!(table.len(), 16);

    // Random axis values never form a full cross product.
    let err = pivot(&table, "P", "T", "D").unwrap_err();
    assert!(matches!(
        err,
        PivotError::MissingCell { .. } | PivotError::DuplicateCell { .. }
    ));

    // The scatter artifact still works.
    let dir = tempfile::tempdir().unwrap();
    let scatter_path = dir.path().join("scatter.html");
    write_scatter_html(&table, &axes(), &scatter_path).unwrap();
    assert!(scatter_path.exists());
}

#[test]
fn single_fatal_code_aborts_and_nothing_is_exported() {
    // One cell of the grid answers with a fatal code.
    let backend = ScriptedBackend::new(|req| {
        if req.temperature_k > 300.0 && req.pressure_pa > 1e7 {
            RawResponse::with_code(vec![], 5, "convergence failure")
        } else {
            RawResponse::ok(vec![
                req.temperature_k,
                req.pressure_pa,
                1.7,
                1.5e-5,
                1.0,
            ])
        }
    });
    let session =
        EngineSession::init(backend, Composition::pure("CO2"), None, None).unwrap();
    let design = grid_design(4, 4);

    let err = evaluate_design(&session, &design, &OUTPUTS, FailurePolicy::Abort, None)
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("code 5"));
    assert!(message.contains("CO2"));
    assert!(message.contains("convergence failure"));
}

#[test]
fn tolerated_code_rows_reach_the_artifacts() {
    // Everything below 280 K is flagged -117 but still returns values.
    let backend = ScriptedBackend::new(|req| {
        let values = vec![
            req.temperature_k,
            req.pressure_pa,
            req.pressure_pa / (188.9 * req.temperature_k),
            1.5e-5,
            1.0,
        ];
        if req.temperature_k < 280.0 {
            RawResponse::with_code(values, -117, "outside validity region")
        } else {
            RawResponse::ok(values)
        }
    });
    let session =
        EngineSession::init(backend, Composition::pure("CO2"), None, None).unwrap();
    let design = grid_design(3, 3);

    let table =
        evaluate_design(&session, &design, &OUTPUTS, FailurePolicy::Abort, None).unwrap();
    assert_eq!(table.len(), 9);
    assert_eq!(
        table.rows().iter().filter(|r| r.warning.is_some()).count(),
        3
    );

    let pivoted = pivot(&table, "P", "T", "D").unwrap();
    assert_eq!(pivoted.z.len(), 3);
}

#[test]
fn ideal_gas_backend_works_through_the_backend_trait_object_seam() {
    // The pipeline only ever sees the PropertyBackend trait; make sure the
    // built-in backend satisfies it like any external binding would.
    fn init<B: PropertyBackend>(backend: B) -> EngineSession<B> {
        EngineSession::init(backend, Composition::pure("CH4"), None, None).unwrap()
    }
    let session = init(IdealGasBackend::new());
    let values = session
        .evaluate(&[OutputProperty::Density], 300.0, 101_325.0)
        .unwrap();
    let rho = values.get(OutputProperty::Density).unwrap();
    // CH4 at ambient: ~0.65 kg/m3.
    assert!((rho - 0.65).abs() < 0.02);
}
