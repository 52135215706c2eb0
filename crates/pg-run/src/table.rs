//! The result table: evaluated outputs joined with their originating inputs.

use pg_doe::{PRESSURE_COLUMN, TEMPERATURE_COLUMN};
use pg_engine::OutputProperty;
use serde::Serialize;
use std::io::{self, Write};

/// One evaluated sample.
///
/// `temperature_k` and `pressure_pa` are the design's exact inputs, not the
/// engine's echoes; the echoes (if requested) live in `values` under their
/// own output codes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    /// Index of the originating sample in the design.
    pub index: usize,
    /// Design temperature [K]
    pub temperature_k: f64,
    /// Design pressure [Pa]
    pub pressure_pa: f64,
    /// Requested outputs in request order.
    pub values: Vec<(OutputProperty, f64)>,
    /// Diagnostic of a tolerated out-of-validity warning, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// A sample recorded as failed under the collect policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleFailure {
    pub index: usize,
    pub temperature_k: f64,
    pub pressure_pa: f64,
    /// Engine error code of the rejected call; `None` when the failure did
    /// not come with a code (0 is the engine's success code, so it cannot
    /// stand in for "unknown").
    pub code: Option<i32>,
    pub message: String,
}

/// Ordered collection of all results for a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    outputs: Vec<OutputProperty>,
    rows: Vec<ResultRow>,
    failures: Vec<SampleFailure>,
}

impl ResultTable {
    /// Create an empty table for the given output request list.
    pub fn new(outputs: Vec<OutputProperty>) -> Self {
        Self {
            outputs,
            rows: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Append a successful row. Rows arrive in design order.
    pub fn push_row(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    /// Record a failed sample.
    pub fn push_failure(&mut self, failure: SampleFailure) {
        self.failures.push(failure);
    }

    /// Requested output properties, in request order.
    pub fn outputs(&self) -> &[OutputProperty] {
        &self.outputs
    }

    /// Successful rows, in design order.
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Recorded failures, in design order.
    pub fn failures(&self) -> &[SampleFailure] {
        &self.failures
    }

    /// Number of successful rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no successful rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All addressable column names: the design input columns followed by the
    /// requested output codes.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names = vec![TEMPERATURE_COLUMN, PRESSURE_COLUMN];
        names.extend(self.outputs.iter().map(|p| p.code()));
        names
    }

    /// A column by name, over the successful rows.
    ///
    /// Accepts the design column names (`"Temperature [K]"`,
    /// `"Pressure [Pa]"`) and the output codes (`"T"`, `"P"`, `"D"`, ...).
    /// The `"T"` and `"P"` codes resolve to the design inputs, not the
    /// engine's echoes: pivoting a grid must see the exact axis values the
    /// design generated, and an engine is free to echo inputs at degraded
    /// precision.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        if name == TEMPERATURE_COLUMN {
            return Some(self.rows.iter().map(|r| r.temperature_k).collect());
        }
        if name == PRESSURE_COLUMN {
            return Some(self.rows.iter().map(|r| r.pressure_pa).collect());
        }

        let property: OutputProperty = name.parse().ok()?;
        match property {
            OutputProperty::Temperature => {
                return Some(self.rows.iter().map(|r| r.temperature_k).collect());
            }
            OutputProperty::Pressure => {
                return Some(self.rows.iter().map(|r| r.pressure_pa).collect());
            }
            _ => {}
        }
        if !self.outputs.contains(&property) {
            return None;
        }
        self.rows
            .iter()
            .map(|r| {
                r.values
                    .iter()
                    .find(|(p, _)| *p == property)
                    .map(|(_, v)| *v)
            })
            .collect()
    }

    /// Write the table as CSV: header row, then one line per successful row.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let mut header = String::from("index,Temperature [K],Pressure [Pa]");
        for output in &self.outputs {
            header.push(',');
            header.push_str(output.code());
        }
        writeln!(writer, "{header}")?;

        for row in &self.rows {
            let mut line = format!("{},{},{}", row.index, row.temperature_k, row.pressure_pa);
            for (_, value) in &row.values {
                line.push(',');
                line.push_str(&value.to_string());
            }
            writeln!(writer, "{line}")?;
        }
        Ok(())
    }

    /// Serialize the whole table (rows and failures) as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ResultTable {
        let outputs = vec![OutputProperty::Density, OutputProperty::PhaseIndicator];
        let mut table = ResultTable::new(outputs);
        table.push_row(ResultRow {
            index: 0,
            temperature_k: 300.0,
            pressure_pa: 1e5,
            values: vec![
                (OutputProperty::Density, 1.7),
                (OutputProperty::PhaseIndicator, 1.0),
            ],
            warning: None,
        });
        table.push_row(ResultRow {
            index: 1,
            temperature_k: 300.0,
            pressure_pa: 2e5,
            values: vec![
                (OutputProperty::Density, 3.4),
                (OutputProperty::PhaseIndicator, 1.0),
            ],
            warning: None,
        });
        table
    }

    #[test]
    fn column_by_design_name_and_code() {
        let table = sample_table();
        assert_eq!(table.column("Temperature [K]"), Some(vec![300.0, 300.0]));
        assert_eq!(table.column("Pressure [Pa]"), Some(vec![1e5, 2e5]));
        assert_eq!(table.column("D"), Some(vec![1.7, 3.4]));
        assert_eq!(table.column("VIS"), None);
        assert_eq!(table.column("bogus"), None);
    }

    #[test]
    fn t_and_p_codes_resolve_to_design_inputs_not_echoes() {
        let outputs = vec![OutputProperty::Temperature, OutputProperty::Pressure];
        let mut table = ResultTable::new(outputs);
        table.push_row(ResultRow {
            index: 0,
            temperature_k: 300.0,
            pressure_pa: 1e5,
            values: vec![
                (OutputProperty::Temperature, 300.0000001),
                (OutputProperty::Pressure, 99999.99),
            ],
            warning: None,
        });

        assert_eq!(table.column("T"), Some(vec![300.0]));
        assert_eq!(table.column("P"), Some(vec![1e5]));
    }

    #[test]
    fn t_and_p_codes_resolve_even_when_not_requested() {
        let table = sample_table();
        assert_eq!(table.column("T"), Some(vec![300.0, 300.0]));
        assert_eq!(table.column("P"), Some(vec![1e5, 2e5]));
    }

    #[test]
    fn csv_round_trip_shape() {
        let table = sample_table();
        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "index,Temperature [K],Pressure [Pa],D,PIP");
        assert!(lines[1].starts_with("0,300,"));
    }

    #[test]
    fn json_includes_failures() {
        let mut table = sample_table();
        table.push_failure(SampleFailure {
            index: 2,
            temperature_k: 310.0,
            pressure_pa: 1e5,
            code: Some(5),
            message: "two-phase".to_string(),
        });
        table.push_failure(SampleFailure {
            index: 3,
            temperature_k: 320.0,
            pressure_pa: 1e5,
            code: None,
            message: "backend went away".to_string(),
        });
        let json = table.to_json().unwrap();
        assert!(json.contains("failures"));
        assert!(json.contains("two-phase"));
        // A codeless failure is distinguishable from a code-0 success.
        assert!(json.contains("\"code\": null"));
    }
}
