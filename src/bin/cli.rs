// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyframe AMF CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polyframe_amf::cli::{ConsoleProgress, Reporter};
use polyframe_amf::mesh::GridModel;
use polyframe_amf::{load_mesh, AmfExporter, Dimension, ExportConfig, NullProgress, Unit};
use std::path::Path;
use tracing::Level;

#[derive(Parser)]
#[command(name = "polyframe-amf")]
#[command(about = "Export unstructured meshes to AMF (Additive Manufacturing File Format)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input mesh file (.json or .stl)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Output AMF file
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a mesh to AMF
    Export {
        /// Input mesh file (.json or .stl)
        input: String,

        /// Output AMF file
        #[arg(short, long)]
        output: String,

        /// Declared unit (mm, inch, ft, meters, micrometers)
        #[arg(short, long)]
        unit: Option<String>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Id of the exported object
        #[arg(long)]
        object_id: Option<u32>,

        /// Hide the progress bars
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print mesh statistics
    Inspect {
        /// Input mesh file (.json or .stl)
        input: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Some(Commands::Export {
            input,
            output,
            unit,
            config,
            object_id,
            quiet,
        }) => {
            let config = build_config(config.as_deref(), unit.as_deref(), *object_id)?;
            export_command(input, output, config, *quiet)?;
        }
        Some(Commands::Inspect { input }) => {
            inspect_command(input)?;
        }
        Some(Commands::Version) => {
            println!("Polyframe AMF v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            // Default behavior: export input to output
            if let (Some(input), Some(output)) = (&cli.input, &cli.output) {
                export_command(input, output, ExportConfig::load()?, false)?;
            } else {
                eprintln!("Error: Input and output files required");
                eprintln!("Usage: polyframe-amf <INPUT> --output <OUTPUT>");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn build_config(path: Option<&str>, unit: Option<&str>, object_id: Option<u32>) -> Result<ExportConfig> {
    let mut config = match path {
        Some(path) => ExportConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path))?,
        None => ExportConfig::load().context("Failed to load configuration")?,
    };

    if let Some(unit) = unit {
        match unit.parse::<Unit>() {
            Ok(unit) => config.set_unit(unit),
            Err(err) => Reporter::report_warning(&format!("{}; using {}", err, Unit::default())),
        }
    }
    if let Some(id) = object_id {
        config.object_id = id;
    }

    Ok(config)
}

fn export_command(input: &str, output: &str, config: ExportConfig, quiet: bool) -> Result<()> {
    if !Path::new(input).exists() {
        Reporter::report_error(&format!("Input file not found: {}", input));
        std::process::exit(1);
    }

    let mesh = load_mesh(input).with_context(|| format!("Failed to load mesh: {}", input))?;

    let start = std::time::Instant::now();
    let exporter = AmfExporter::with_config(&mesh, config);
    let summary = if quiet {
        exporter.write_file(output, NullProgress)
    } else {
        exporter.write_file(output, ConsoleProgress::new())
    }
    .with_context(|| format!("Failed to export AMF: {}", output))?;

    Reporter::report_export(input, output, &summary, start.elapsed());
    Reporter::success(&format!("Wrote {}", output));

    Ok(())
}

fn inspect_command(input: &str) -> Result<()> {
    let mesh = load_mesh(input).with_context(|| format!("Failed to load mesh: {}", input))?;

    let counts = mesh.boundary_counts();
    Reporter::report_inspect(
        input,
        mesh.dimension(),
        mesh.vertex_count(),
        mesh.patch_count(),
        counts,
    );

    if counts.other > 0 {
        Reporter::report_warning(&format!(
            "{} element(s) are neither triangles nor quads and will be skipped",
            counts.other
        ));
    }
    if mesh.dimension() == Dimension::Two && mesh.patch_count() > 0 {
        Reporter::report_warning("2D mesh has patches; only its own elements are exported");
    }

    Ok(())
}
