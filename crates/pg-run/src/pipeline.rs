//! Design evaluation: drive the engine session over every sample in order.

use crate::error::{RunError, RunResult};
use crate::table::{ResultRow, ResultTable, SampleFailure};
use pg_doe::Design;
use pg_engine::{EngineError, EngineSession, OutputProperty, PropertyBackend};
use serde::{Deserialize, Serialize};

/// What to do when a sample's evaluation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failure; no partial table escapes.
    #[default]
    Abort,
    /// Record the failure in the table and keep evaluating, so one bad grid
    /// cell does not void the whole batch.
    Collect,
}

/// Progress over the design, emitted after every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub completed: usize,
    pub total: usize,
}

/// Evaluate every sample of a design, in generation order, one engine call
/// per sample.
///
/// On success each row is tagged with its sample index and carries the
/// design's exact (temperature, pressure) inputs, regardless of what the
/// engine echoes back. Evaluation is strictly sequential: the engine's
/// calling convention is not documented as safe for concurrent use.
pub fn evaluate_design<B: PropertyBackend>(
    session: &EngineSession<B>,
    design: &Design,
    outputs: &[OutputProperty],
    policy: FailurePolicy,
    mut progress: Option<&mut dyn FnMut(ProgressEvent)>,
) -> RunResult<ResultTable> {
    let total = design.len();
    let mut table = ResultTable::new(outputs.to_vec());

    for (index, sample) in design.iter().enumerate() {
        match session.evaluate(outputs, sample.temperature_k, sample.pressure_pa) {
            Ok(values) => {
                let warning = values.warning().map(str::to_string);
                table.push_row(ResultRow {
                    index,
                    temperature_k: sample.temperature_k,
                    pressure_pa: sample.pressure_pa,
                    values: values.into_values(),
                    warning,
                });
            }
            Err(err) => match policy {
                FailurePolicy::Abort => {
                    tracing::error!(
                        index,
                        temperature_k = sample.temperature_k,
                        pressure_pa = sample.pressure_pa,
                        %err,
                        "sample evaluation failed, aborting run"
                    );
                    return Err(RunError::Sample { index, source: err });
                }
                FailurePolicy::Collect => {
                    let (code, message) = match &err {
                        EngineError::Property { code, message, .. } => {
                            (Some(*code), message.clone())
                        }
                        other => (None, other.to_string()),
                    };
                    tracing::warn!(index, ?code, %message, "sample failed, recorded and skipped");
                    table.push_failure(SampleFailure {
                        index,
                        temperature_k: sample.temperature_k,
                        pressure_pa: sample.pressure_pa,
                        code,
                        message,
                    });
                }
            },
        }

        if let Some(callback) = progress.as_mut() {
            callback(ProgressEvent {
                completed: index + 1,
                total,
            });
        }
    }

    if table.is_empty() && !table.failures().is_empty() {
        let first = &table.failures()[0];
        return Err(RunError::AllSamplesFailed {
            total,
            first_index: first.index,
            first_message: first.message.clone(),
        });
    }

    tracing::info!(
        rows = table.len(),
        failures = table.failures().len(),
        total,
        "design evaluation finished"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pg_doe::{DoeConfig, DoeMethod};
    use pg_engine::{
        Composition, RawResponse, ScriptedBackend, CODE_OUTSIDE_VALIDITY,
    };

    const OUTPUTS: [OutputProperty; 3] = [
        OutputProperty::Temperature,
        OutputProperty::Density,
        OutputProperty::PhaseIndicator,
    ];

    fn grid_design(n_t: usize, n_p: usize) -> Design {
        Design::generate(&DoeConfig {
            temperature_range: (270.0, 350.0),
            pressure_range: (1e5, 1e6),
            n_temperature: n_t,
            n_pressure: n_p,
            method: DoeMethod::Grid,
            seed: None,
        })
        .unwrap()
    }

    fn session(backend: ScriptedBackend) -> EngineSession<ScriptedBackend> {
        EngineSession::init(backend, Composition::pure("CO2"), None, None).unwrap()
    }

    #[test]
    fn join_fidelity_against_perturbed_echoes() {
        // Engine echoes T with degraded precision; the table must still carry
        // the design's exact inputs.
        let backend = ScriptedBackend::new(|req| {
            RawResponse::ok(vec![req.temperature_k + 1e-4, 1.7, 1.0])
        });
        let session = session(backend);
        let design = grid_design(3, 2);

        let table =
            evaluate_design(&session, &design, &OUTPUTS, FailurePolicy::Abort, None).unwrap();

        assert_eq!(table.len(), 6);
        for (row, sample) in table.rows().iter().zip(design.iter()) {
            assert_eq!(row.temperature_k, sample.temperature_k);
            assert_eq!(row.pressure_pa, sample.pressure_pa);
            // The echo differs; it lives only in the output column.
            let echo = row.values[0].1;
            assert!(echo != sample.temperature_k);
        }
    }

    #[test]
    fn rows_are_tagged_with_design_indices() {
        let backend = ScriptedBackend::new(|_| RawResponse::ok(vec![0.0, 0.0, 0.0]));
        let session = session(backend);
        let design = grid_design(2, 2);

        let table =
            evaluate_design(&session, &design, &OUTPUTS, FailurePolicy::Abort, None).unwrap();
        let indices: Vec<usize> = table.rows().iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn tolerated_warning_code_keeps_the_row() {
        let backend = ScriptedBackend::new(|req| {
            if req.temperature_k > 340.0 {
                RawResponse::with_code(
                    vec![req.temperature_k, 9.9, 1.0],
                    CODE_OUTSIDE_VALIDITY,
                    "outside validity region",
                )
            } else {
                RawResponse::ok(vec![req.temperature_k, 1.7, 1.0])
            }
        });
        let session = session(backend);
        let design = grid_design(3, 2);

        let table =
            evaluate_design(&session, &design, &OUTPUTS, FailurePolicy::Abort, None).unwrap();

        // All six rows survive; the two T=350 rows carry the warning and
        // their outputs unmodified.
        assert_eq!(table.len(), 6);
        let flagged: Vec<&ResultRow> = table
            .rows()
            .iter()
            .filter(|r| r.warning.is_some())
            .collect();
        assert_eq!(flagged.len(), 2);
        assert!(flagged.iter().all(|r| r.values[1].1 == 9.9));
    }

    #[test]
    fn abort_policy_stops_at_first_failure() {
        let backend = ScriptedBackend::new(|req| {
            if req.temperature_k > 300.0 {
                RawResponse::with_code(vec![], 5, "two-phase state")
            } else {
                RawResponse::ok(vec![req.temperature_k, 1.7, 1.0])
            }
        });
        let session = session(backend);
        let design = grid_design(3, 2);

        let err = evaluate_design(&session, &design, &OUTPUTS, FailurePolicy::Abort, None)
            .unwrap_err();
        match err {
            RunError::Sample { index, source } => {
                // First failing sample is the first T=310 point.
                assert_eq!(index, 2);
                assert!(matches!(source, EngineError::Property { code: 5, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn collect_policy_records_failures_and_continues() {
        let backend = ScriptedBackend::new(|req| {
            if (req.temperature_k - 310.0).abs() < 1e-9 {
                RawResponse::with_code(vec![], 5, "two-phase state")
            } else {
                RawResponse::ok(vec![req.temperature_k, 1.7, 1.0])
            }
        });
        let session = session(backend);
        let design = grid_design(3, 2);

        let table =
            evaluate_design(&session, &design, &OUTPUTS, FailurePolicy::Collect, None).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.failures().len(), 2);
        assert!(table.failures().iter().all(|f| f.code == Some(5)));
        assert!(table
            .failures()
            .iter()
            .all(|f| (f.temperature_k - 310.0).abs() < 1e-9));
    }

    #[test]
    fn all_samples_failing_is_an_error_even_when_collecting() {
        let backend =
            ScriptedBackend::new(|_| RawResponse::with_code(vec![], 5, "bad state"));
        let session = session(backend);
        let design = grid_design(2, 2);

        let err = evaluate_design(&session, &design, &OUTPUTS, FailurePolicy::Collect, None)
            .unwrap_err();
        assert!(matches!(
            err,
            RunError::AllSamplesFailed {
                total: 4,
                first_index: 0,
                ..
            }
        ));
    }

    #[test]
    fn progress_advances_monotonically_over_the_design() {
        let backend = ScriptedBackend::new(|_| RawResponse::ok(vec![0.0, 0.0, 0.0]));
        let session = session(backend);
        let design = grid_design(2, 3);

        let mut events = Vec::new();
        let mut callback = |event: ProgressEvent| events.push(event);
        evaluate_design(
            &session,
            &design,
            &OUTPUTS,
            FailurePolicy::Abort,
            Some(&mut callback),
        )
        .unwrap();

        assert_eq!(events.len(), 6);
        assert!(events.iter().all(|e| e.total == 6));
        let completed: Vec<usize> = events.iter().map(|e| e.completed).collect();
        assert_eq!(completed, vec![1, 2, 3, 4, 5, 6]);
    }
}
