use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ditherlab::models::AppConfig;
use ditherlab::services::{Engine, Selection, Workbench};

#[derive(Parser)]
#[command(name = "ditherlab")]
#[command(about = "1-bit dithering workbench with Lua-scriptable pixel transforms")]
struct Cli {
    /// YAML configuration file (falls back to $DITHERLAB_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available algorithms
    List,
    /// Dither a PNG with a built-in algorithm
    Apply {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Algorithm index or key (see `list`)
        #[arg(short, long)]
        algorithm: String,

        /// Keep colour channels instead of converting to grayscale first
        #[arg(long)]
        colored: bool,
    },
    /// Run a Lua script over a PNG
    Script {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file (not written if the script fails)
        #[arg(short, long)]
        output: PathBuf,

        /// Lua script defining the entry function
        #[arg(short, long)]
        script: PathBuf,
    },
    /// Process PNGs using the settings in a .txt file among the paths
    Batch {
        /// Input files: one config .txt plus any number of .png
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ditherlab=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config_path = cli
        .config
        .or_else(|| std::env::var_os("DITHERLAB_CONFIG").map(PathBuf::from));
    let engine = Engine::new(AppConfig::load(config_path.as_deref()));

    match cli.command {
        Commands::List => {
            run_list_command(&engine);
            Ok(())
        }
        Commands::Apply {
            input,
            output,
            algorithm,
            colored,
        } => run_apply_command(&engine, &input, &output, &algorithm, colored),
        Commands::Script {
            input,
            output,
            script,
        } => run_script_command(&engine, &input, &output, &script),
        Commands::Batch { paths, json } => run_batch_command(&engine, &paths, json),
    }
}

fn run_list_command(engine: &Engine) {
    for (index, entry) in engine.registry().iter().enumerate() {
        println!("{index}  {:<16} {}", entry.key(), entry.name());
    }
}

fn run_apply_command(
    engine: &Engine,
    input: &Path,
    output: &Path,
    algorithm: &str,
    colored: bool,
) -> anyhow::Result<()> {
    let index = engine.resolve(algorithm)?;
    let mut bench = Workbench::open(input)?;
    bench.select(engine, &Selection::Algorithm(index), colored)?;
    bench
        .export(output, engine.config().optimize_png)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let elapsed = bench.last_elapsed().unwrap_or_default();
    println!(
        "{} -> {} ({}, {:.2} ms)",
        input.display(),
        output.display(),
        bench.title(),
        elapsed.as_secs_f64() * 1000.0
    );
    Ok(())
}

fn run_script_command(engine: &Engine, input: &Path, output: &Path, script: &Path) -> anyhow::Result<()> {
    let elapsed = engine
        .process_file(input, output, &Selection::Script(script.to_path_buf()), true)
        .with_context(|| format!("Script {} failed on {}", script.display(), input.display()))?;
    println!(
        "{} -> {} ({}, {:.2} ms)",
        input.display(),
        output.display(),
        script.display(),
        elapsed.as_secs_f64() * 1000.0
    );
    Ok(())
}

fn run_batch_command(engine: &Engine, paths: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let report = engine.run_batch(paths);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !report.configured() {
        println!("No valid batch configuration found, nothing processed");
        return Ok(());
    }
    for path in &report.written {
        println!("wrote {}", path.display());
    }
    for (path, reason) in &report.failed {
        eprintln!("failed {}: {reason}", path.display());
    }
    println!(
        "{} written, {} failed",
        report.written.len(),
        report.failed.len()
    );
    Ok(())
}
