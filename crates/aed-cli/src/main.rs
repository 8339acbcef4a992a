mod chart;

use aed_lib::{
    config::{config_to_toml, read_config, AedConfig},
    io::text::{read_trace, LoadMode},
    metrics::sqi::{evaluate_sqi, SqiGate},
    pipeline::{run_pipeline, PipelineOptions},
    plot::{figure_from_trace, NullBackend, PlotBackend},
    report::{render_json, render_text},
    signal::Trace,
};
use anyhow::Result;
use chart::PngBackend;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "aed",
    version,
    about = "AED shock advisor for recorded single-lead ECG traces"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the quality check, estimators and shock decision on a trace file
    Analyze {
        #[arg(long, default_value = "ecg.dat")]
        input: PathBuf,
        /// Write an amplitude-vs-time PNG of clean traces here
        #[arg(long)]
        plot: Option<PathBuf>,
        /// TOML file overriding decision and quality thresholds
        #[arg(long)]
        config: Option<PathBuf>,
        /// Fail on the first malformed record instead of truncating the trace
        #[arg(long)]
        strict: bool,
        /// Report unmeasurable estimates as 0, as older reports did
        #[arg(long)]
        legacy_sentinels: bool,
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
    },
    /// Print signal-quality metrics and the gate verdict as JSON
    Sqi {
        #[arg(long, default_value = "ecg.dat")]
        input: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        strict: bool,
    },
    /// Render a trace to a PNG without running the decision
    Plot {
        #[arg(long, default_value = "ecg.dat")]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        strict: bool,
    },
    /// Print the default configuration as TOML
    PrintConfig,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            input,
            plot,
            config,
            strict,
            legacy_sentinels,
            format,
        } => cmd_analyze(
            &input,
            plot.as_deref(),
            config.as_deref(),
            strict,
            legacy_sentinels,
            format,
        )?,
        Commands::Sqi {
            input,
            config,
            strict,
        } => cmd_sqi(&input, config.as_deref(), strict)?,
        Commands::Plot { input, out, strict } => cmd_plot(&input, &out, strict)?,
        Commands::PrintConfig => print!("{}", config_to_toml(&AedConfig::default())?),
    }
    Ok(())
}

fn load_mode(strict: bool) -> LoadMode {
    if strict {
        LoadMode::Strict
    } else {
        LoadMode::Lenient
    }
}

fn load_config(path: Option<&Path>) -> Result<AedConfig> {
    match path {
        Some(path) => read_config(path),
        None => Ok(AedConfig::default()),
    }
}

fn load_trace(input: &Path, strict: bool) -> Result<Trace> {
    let trace = read_trace(input, load_mode(strict))?;
    log::info!(
        "loaded {} samples ({} peaks) from {}",
        trace.len(),
        trace.peak_count(),
        input.display()
    );
    Ok(trace)
}

fn cmd_analyze(
    input: &Path,
    plot: Option<&Path>,
    config: Option<&Path>,
    strict: bool,
    legacy_sentinels: bool,
    format: ReportFormat,
) -> Result<()> {
    let config = load_config(config)?;
    let trace = load_trace(input, strict)?;
    let gate = SqiGate {
        thresholds: config.quality,
    };
    let opts = PipelineOptions {
        policy: config.decision,
        legacy_sentinels,
        ..PipelineOptions::default()
    };
    let mut backend: Box<dyn PlotBackend> = match plot {
        Some(path) => Box::new(PngBackend::new(path)),
        None => Box::new(NullBackend),
    };
    let report = run_pipeline(&trace, &gate, backend.as_mut(), &opts);
    match format {
        ReportFormat::Text => print!("{}", render_text(&report)),
        ReportFormat::Json => println!("{}", render_json(&report)?),
    }
    Ok(())
}

fn cmd_sqi(input: &Path, config: Option<&Path>, strict: bool) -> Result<()> {
    let config = load_config(config)?;
    let trace = load_trace(input, strict)?;
    let quality = evaluate_sqi(trace.amplitudes());
    let out = json!({
        "quality": quality,
        "thresholds": config.quality,
        "clean": quality.is_acceptable(&config.quality),
    });
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}

fn cmd_plot(input: &Path, out: &Path, strict: bool) -> Result<()> {
    let trace = load_trace(input, strict)?;
    let fig = figure_from_trace(&trace, PipelineOptions::default().max_plot_points);
    PngBackend::new(out).draw(&fig)
}
