use clap::{Parser, Subcommand};
use pg_doe::{Design, DoeError, DoeMethod};
use pg_engine::{EngineError, EngineSession, IdealGasBackend, PropertyBackend};
use pg_run::{
    evaluate_design, pivot, write_scatter_html, write_surface_html, PivotError, PlotError,
    ProgressEvent, ResultTable, RunError,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

mod config;

use config::{BackendKind, RunConfig};

/// Application error: wraps the backend crate errors into one surface for
/// exit-code handling.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Doe(#[from] DoeError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Pivot(#[from] PivotError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "propgrid")]
#[command(about = "Sample (T, P) state points, evaluate fluid properties, render 3D plots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: design -> evaluation -> plot artifacts
    Run {
        /// Path to the run configuration YAML file
        config_path: PathBuf,
        /// Directory for output artifacts (defaults to the working directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Override the sampling seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate a configuration file without running anything
    Validate {
        /// Path to the run configuration YAML file
        config_path: PathBuf,
    },
    /// Generate and print a design summary without engine calls
    Design {
        /// Path to the run configuration YAML file
        config_path: PathBuf,
        /// Number of leading samples to print
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config_path,
            out_dir,
            seed,
        } => cmd_run(&config_path, out_dir.as_deref(), seed),
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Design { config_path, limit } => cmd_design(&config_path, limit),
    }
}

fn cmd_validate(config_path: &Path) -> CliResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = RunConfig::load(config_path)?;
    config.composition()?;
    println!("✓ Config is valid");
    Ok(())
}

fn cmd_design(config_path: &Path, limit: usize) -> CliResult<()> {
    let config = RunConfig::load(config_path)?;
    let design = Design::generate(&config.doe_config(None))?;

    println!(
        "Design: {} samples ({} method)",
        design.len(),
        design.method()
    );
    if let Some((n_t, n_p)) = design.shape() {
        println!("  Shape: {} temperatures x {} pressures", n_t, n_p);
    }
    println!("  Temperature [K] x Pressure [Pa]:");
    for (index, sample) in design.iter().take(limit).enumerate() {
        println!(
            "  {:>5}  {:>12.4}  {:>14.2}",
            index, sample.temperature_k, sample.pressure_pa
        );
    }
    if design.len() > limit {
        println!("  ... {} more", design.len() - limit);
    }
    Ok(())
}

fn cmd_run(config_path: &Path, out_dir: Option<&Path>, seed: Option<u64>) -> CliResult<()> {
    let config = RunConfig::load(config_path)?;
    let composition = config.composition()?;

    println!(
        "Running propgrid: fluid {} ({} method, {} policy)",
        composition.fluid_string(),
        config.sampling.method,
        match config.failure_policy {
            pg_run::FailurePolicy::Abort => "abort",
            pg_run::FailurePolicy::Collect => "collect",
        }
    );

    let design = Design::generate(&config.doe_config(seed))?;
    println!("✓ Design generated: {} samples", design.len());

    let table = match config.engine.backend {
        BackendKind::IdealGas => {
            evaluate_with_backend(IdealGasBackend::new(), &config, composition, &design)?
        }
    };

    report_failures(&table);

    let out_dir = out_dir.unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(out_dir)?;
    write_exports(&config, &table, out_dir)?;
    write_plots(&config, &table, &design, out_dir)?;

    Ok(())
}

fn evaluate_with_backend<B: PropertyBackend>(
    backend: B,
    config: &RunConfig,
    composition: pg_engine::Composition,
    design: &Design,
) -> CliResult<ResultTable> {
    let session = EngineSession::init(
        backend,
        composition,
        config.equation_of_state(),
        config.engine.install_path.clone(),
    )?;

    let constants = session.constants();
    println!(
        "✓ Engine initialized: M={:.4} kg/kmol, Tc={:.2} K, Pc={:.0} Pa",
        constants.molar_mass_kg_kmol, constants.t_crit_k, constants.p_crit_pa
    );

    let started = Instant::now();
    let mut last_emit = Instant::now();
    let mut callback = |event: ProgressEvent| {
        if event.completed == event.total || last_emit.elapsed().as_millis() >= 100 {
            render_progress(&event);
            last_emit = Instant::now();
        }
    };

    let table = evaluate_design(
        &session,
        design,
        &config.outputs,
        config.failure_policy,
        Some(&mut callback),
    )?;
    clear_progress_line();
    println!(
        "✓ Evaluated {} samples in {:.2}s",
        design.len(),
        started.elapsed().as_secs_f64()
    );

    Ok(table)
}

fn report_failures(table: &ResultTable) {
    if table.failures().is_empty() {
        return;
    }
    eprintln!(
        "⚠ {} of {} samples failed:",
        table.failures().len(),
        table.failures().len() + table.len()
    );
    for failure in table.failures() {
        let code = match failure.code {
            Some(code) => code.to_string(),
            None => "none".to_string(),
        };
        eprintln!(
            "  sample {}: code {} at T={} K, P={} Pa: {}",
            failure.index, code, failure.temperature_k, failure.pressure_pa, failure.message
        );
    }
}

fn write_exports(config: &RunConfig, table: &ResultTable, out_dir: &Path) -> CliResult<()> {
    if let Some(csv_path) = &config.export.table_csv {
        let path = out_dir.join(csv_path);
        let file = std::fs::File::create(&path)?;
        table.write_csv(io::BufWriter::new(file))?;
        println!("✓ Result table written to {}", path.display());
    }
    if let Some(json_path) = &config.export.table_json {
        let path = out_dir.join(json_path);
        let json = table
            .to_json()
            .map_err(|e| CliError::Config(format!("JSON export failed: {e}")))?;
        std::fs::write(&path, json)?;
        println!("✓ Result table written to {}", path.display());
    }
    Ok(())
}

fn write_plots(
    config: &RunConfig,
    table: &ResultTable,
    design: &Design,
    out_dir: &Path,
) -> CliResult<()> {
    let axes = config.plot_axes();

    if design.method() == DoeMethod::Grid {
        if table.failures().is_empty() {
            let pivoted = pivot(table, &axes.x, &axes.y, &axes.z)?;
            let surface_path = out_dir.join(&config.plot.surface_file);
            write_surface_html(&pivoted, &axes, &surface_path)?;
            println!("✓ Surface plot written to {}", surface_path.display());
        } else {
            // Failed cells leave holes; the grid no longer pivots cleanly.
            println!(
                "  Skipping surface plot: {} failed cells",
                table.failures().len()
            );
        }
    } else {
        // Non-grid designs cannot form a rectangular surface.
        println!("  Skipping surface plot: {} design", design.method());
    }

    let scatter_path = out_dir.join(&config.plot.scatter_file);
    write_scatter_html(table, &axes, &scatter_path)?;
    println!("✓ Scatter plot written to {}", scatter_path.display());

    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_progress(event: &ProgressEvent) {
    let fraction = event.completed as f64 / event.total.max(1) as f64;
    let width = 28usize;
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    print!(
        "\r[{}] {:>6.2}%  sample {}/{}",
        bar,
        fraction * 100.0,
        event.completed,
        event.total
    );
    let _ = io::stdout().flush();
}
