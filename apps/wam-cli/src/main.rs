use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use anyhow::Context;
use wam_codec::{GenerationConfig, generate, parse, to_engine_model};
use wam_model::{EngineModel, ValidationResult, load_json, save_json};
use wam_registry::Registry;
use wam_validate::{RuleTable, validate_model};

#[derive(Parser)]
#[command(name = "wam-cli")]
#[command(about = "WAM model tool - import, export and validate engine models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a model JSON file
    Validate {
        /// Path to the model JSON file
        model_path: PathBuf,
    },
    /// Parse a WAM text file into a model JSON file
    Parse {
        /// Path to the WAM input file
        wam_path: PathBuf,
        /// Output JSON file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate WAM text from a model JSON file
    Generate {
        /// Path to the model JSON file
        model_path: PathBuf,
        /// Output WAM file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// WAM format version stamp
        #[arg(long, default_value_t = 2200)]
        wam_version: i64,
        /// Simulated duration in seconds
        #[arg(long, default_value_t = 10.0)]
        duration: f64,
        /// Ambient pressure in bar
        #[arg(long, default_value_t = 1.0)]
        ambient_pressure: f64,
        /// Ambient temperature in kelvin
        #[arg(long, default_value_t = 293.0)]
        ambient_temperature: f64,
        /// Generate even when validation reports errors
        #[arg(long)]
        force: bool,
    },
    /// Parse a WAM file, regenerate it, and report round-trip stability
    Roundtrip {
        /// Path to the WAM input file
        wam_path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "dispatching");

    match cli.command {
        Commands::Validate { model_path } => cmd_validate(&model_path),
        Commands::Parse { wam_path, output } => cmd_parse(&wam_path, output.as_deref()),
        Commands::Generate {
            model_path,
            output,
            wam_version,
            duration,
            ambient_pressure,
            ambient_temperature,
            force,
        } => {
            let config = GenerationConfig {
                version: wam_version,
                duration,
                ambient_pressure,
                ambient_temperature,
                ..GenerationConfig::default()
            };
            cmd_generate(&model_path, output.as_deref(), &config, force)
        }
        Commands::Roundtrip { wam_path } => cmd_roundtrip(&wam_path),
    }
}

fn cmd_validate(model_path: &Path) -> anyhow::Result<()> {
    println!("Validating model: {}", model_path.display());
    let model = load_json(model_path)
        .with_context(|| format!("failed to load {}", model_path.display()))?;

    let result = run_validation(&model);
    print_report(&result);

    if result.is_valid {
        println!("✓ Model is valid");
        Ok(())
    } else {
        anyhow::bail!("model has {} validation error(s)", result.errors.len())
    }
}

fn cmd_parse(wam_path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(wam_path)
        .with_context(|| format!("failed to read {}", wam_path.display()))?;
    let doc = parse(&text).with_context(|| format!("failed to parse {}", wam_path.display()))?;

    let registry = wam_registry::standard();
    let model = to_engine_model(&doc, &registry);
    println!(
        "Parsed {}: {} components, {} connections",
        wam_path.display(),
        model.components.len(),
        model.connections.len()
    );

    let result = run_validation(&model);
    print_report(&result);

    if let Some(path) = output {
        save_json(path, &model)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("✓ Model written to {}", path.display());
    } else {
        println!("{}", serde_json_string(&model)?);
    }
    Ok(())
}

fn cmd_generate(
    model_path: &Path,
    output: Option<&Path>,
    config: &GenerationConfig,
    force: bool,
) -> anyhow::Result<()> {
    let model = load_json(model_path)
        .with_context(|| format!("failed to load {}", model_path.display()))?;

    let result = run_validation(&model);
    print_report(&result);
    if !result.is_valid && !force {
        anyhow::bail!(
            "model has {} validation error(s); pass --force to generate anyway",
            result.errors.len()
        );
    }

    let text = generate(&model, config)
        .with_context(|| format!("failed to generate WAM text from {}", model_path.display()))?;

    if let Some(path) = output {
        std::fs::write(path, &text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("✓ WAM text written to {}", path.display());
    } else {
        print!("{}", text);
    }
    Ok(())
}

fn cmd_roundtrip(wam_path: &Path) -> anyhow::Result<()> {
    let first_text = std::fs::read_to_string(wam_path)
        .with_context(|| format!("failed to read {}", wam_path.display()))?;
    let first = parse(&first_text)?;

    let registry = wam_registry::standard();
    let model = to_engine_model(&first, &registry);
    let regenerated = generate(&model, &GenerationConfig::from_document(&first))?;
    let second = parse(&regenerated).context("regenerated text failed to parse")?;

    println!("Round trip of {}:", wam_path.display());
    println!("  Pipes:      {} -> {}", first.pipes.len(), second.pipes.len());
    println!("  Plenums:    {} -> {}", first.plenums.len(), second.plenums.len());
    println!("  Valves:     {} -> {}", first.valves.len(), second.valves.len());
    println!(
        "  Boundaries: {} -> {}",
        first.boundaries.len(),
        second.boundaries.len()
    );

    if first == second {
        println!("✓ Round trip is stable");
        Ok(())
    } else {
        anyhow::bail!("round trip is NOT stable: regenerated document differs")
    }
}

fn run_validation(model: &EngineModel) -> ValidationResult {
    let registry: Registry = wam_registry::standard();
    let rules = RuleTable::standard();
    validate_model(model, &registry, &rules)
}

fn print_report(result: &ValidationResult) {
    for error in &result.errors {
        match &error.component_id {
            Some(id) => println!("  error [{:?}] {}: {}", error.kind, id, error.message),
            None => println!("  error [{:?}]: {}", error.kind, error.message),
        }
    }
    for warning in &result.warnings {
        match &warning.component_id {
            Some(id) => println!("  warning [{:?}] {}: {}", warning.kind, id, warning.message),
            None => println!("  warning [{:?}]: {}", warning.kind, warning.message),
        }
    }
}

fn serde_json_string(model: &EngineModel) -> anyhow::Result<String> {
    serde_json::to_string_pretty(model).context("failed to serialize model")
}
