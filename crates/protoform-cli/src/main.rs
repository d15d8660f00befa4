//! Protoform CLI
//!
//! - `generate`: entity schema JSON → one `.proto` (or descriptor set) per package
//! - `check`: run generation and report entities that cannot be generated

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use protoform_schema::{load_schema_json, SchemaGraph};
use protoform_synth::export::{encode_descriptor_set, DescriptorSetJson};
use protoform_synth::render::render_file;
use protoform_synth::{generate, FileDescriptor, GenerationReport, SynthConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "protoform")]
#[command(author, version, about = "Protobuf descriptors from entity schemas")]
struct Cli {
    /// Debug logging on stderr (`RUST_LOG` takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one output file per package.
    Generate {
        /// Schema JSON exported by the schema tooling.
        schema: PathBuf,
        /// Directory to write into; package paths are created beneath it.
        #[arg(short, long)]
        out_dir: PathBuf,
        /// Optional generation settings (JSON). Missing keys use defaults.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Proto)]
        format: Format,
    },

    /// Run generation without writing; fails if any entity is rejected.
    Check {
        schema: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// proto3 source
    Proto,
    /// Buf-style descriptor-set JSON
    Json,
    /// Binary `google.protobuf.FileDescriptorSet`
    Binary,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Self::Proto => "proto",
            Self::Json => "json",
            Self::Binary => "binpb",
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            schema,
            out_dir,
            config,
            format,
        } => cmd_generate(&schema, &out_dir, config.as_deref(), format),
        Commands::Check { schema, config } => cmd_check(&schema, config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<SynthConfig> {
    let Some(path) = path else {
        return Ok(SynthConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn load_schema(path: &Path) -> Result<SchemaGraph> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading schema {}", path.display()))?;
    load_schema_json(&text).with_context(|| format!("loading schema {}", path.display()))
}

fn report_failures(report: &GenerationReport) {
    for failure in &report.failures {
        eprintln!("  {} {}: {}", "✗".red(), failure.entity.bold(), failure.error);
    }
}

fn encode(file: &FileDescriptor, report: &GenerationReport, format: Format) -> Result<Vec<u8>> {
    let one = std::slice::from_ref(file);
    Ok(match format {
        Format::Proto => render_file(file, &report.limits).into_bytes(),
        Format::Json => serde_json::to_vec_pretty(&DescriptorSetJson::from(one))?,
        Format::Binary => encode_descriptor_set(one),
    })
}

fn cmd_generate(
    schema: &Path,
    out_dir: &Path,
    config: Option<&Path>,
    format: Format,
) -> Result<()> {
    println!("{} {}", "Generating".green().bold(), schema.display());

    let config = load_config(config)?;
    let graph = load_schema(schema)?;
    let report = generate(&graph, &config);

    for file in &report.files {
        let out = out_dir.join(&file.name).with_extension(format.extension());
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&out, encode(file, &report, format)?)
            .with_context(|| format!("writing {}", out.display()))?;
        println!(
            "  {} {} (messages={}, services={})",
            "→".cyan(),
            out.display(),
            file.messages.len(),
            file.services.len()
        );
    }

    if !report.is_clean() {
        report_failures(&report);
        bail!("{} entities could not be generated", report.failures.len());
    }
    Ok(())
}

fn cmd_check(schema: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let graph = load_schema(schema)?;
    let report = generate(&graph, &config);

    for file in &report.files {
        println!(
            "  {} {} ({} messages, {} services)",
            "→".cyan(),
            file.package,
            file.messages.len(),
            file.services.len()
        );
    }

    if !report.is_clean() {
        report_failures(&report);
        bail!("{} entities could not be generated", report.failures.len());
    }
    println!("{} {} entities", "ok".green().bold(), graph.entities.len());
    Ok(())
}
