use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pomedit::config::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_SIZE};
use pomedit::{Config, Coordinate, PomFile, ProjectCoordinates};

#[derive(Debug, Parser)]
#[command(
    name = "pomedit",
    version,
    about = "Read and re-version Maven pom.xml files without disturbing their layout"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Maximum element nesting depth
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Maximum input size in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_SIZE)]
    max_size: usize,
    /// Log parsing and write-back decisions (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the effective coordinates, parent and modules
    Show {
        #[arg(value_name = "POM", default_value = PomFile::POM_XML)]
        pom: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one module per line
    Modules {
        #[arg(value_name = "POM", default_value = PomFile::POM_XML)]
        pom: PathBuf,
    },
    /// Set the project version
    SetVersion {
        #[arg(value_name = "POM")]
        pom: PathBuf,
        version: String,
        /// Output file (defaults to rewriting POM in place)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Set the version in the <parent> reference
    SetParentVersion {
        #[arg(value_name = "POM")]
        pom: PathBuf,
        version: String,
        /// Output file (defaults to rewriting POM in place)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    #[serde(flatten)]
    coordinates: ProjectCoordinates,
    explicit_version: bool,
    parent: Option<Coordinate>,
    modules: Vec<String>,
    dependencies: Vec<Coordinate>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = Config::default()
        .with_max_depth(args.max_depth)
        .with_max_size(args.max_size);

    match args.command {
        Command::Show { pom, json } => show(&read_pom(&pom, config)?, json),
        Command::Modules { pom } => {
            let pom = read_pom(&pom, config)?;
            let mut stdout = io::stdout().lock();
            for module in pom.modules() {
                writeln!(stdout, "{module}").context("failed to write stdout")?;
            }
            Ok(())
        }
        Command::SetVersion {
            pom: path,
            version,
            output,
        } => {
            let mut pom = read_pom(&path, config)?;
            info!(from = pom.version(), to = %version, "setting project version");
            pom.set_version(version);
            write_pom(&mut pom, output.as_deref().unwrap_or(&path))
        }
        Command::SetParentVersion {
            pom: path,
            version,
            output,
        } => {
            let mut pom = read_pom(&path, config)?;
            pom.set_parent_version(&version)
                .with_context(|| format!("cannot set parent version in {}", path.display()))?;
            write_pom(&mut pom, output.as_deref().unwrap_or(&path))
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

fn read_pom(path: &Path, config: Config) -> Result<PomFile> {
    PomFile::read_file_with_config(path, config)
        .with_context(|| format!("failed to read {}", path.display()))
}

fn write_pom(pom: &mut PomFile, path: &Path) -> Result<()> {
    pom.write_file(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn show(pom: &PomFile, json: bool) -> Result<()> {
    let summary = Summary {
        coordinates: pom.coordinates().context("failed to resolve project coordinates")?,
        explicit_version: pom.prefers_explicit_version(),
        parent: pom.parent().map(|parent| parent.to_coordinate()),
        modules: pom.modules(),
        dependencies: pom
            .dependencies()
            .iter()
            .map(|dependency| dependency.to_coordinate())
            .collect(),
    };

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &summary).context("failed to write stdout")?;
        writeln!(stdout)?;
        return Ok(());
    }

    let coordinates = &summary.coordinates;
    let origin = if summary.explicit_version {
        "explicit"
    } else {
        "inherited"
    };
    writeln!(stdout, "groupId:    {}", coordinates.group_id)?;
    writeln!(stdout, "artifactId: {}", coordinates.artifact_id)?;
    writeln!(
        stdout,
        "version:    {} ({origin})",
        coordinates.version.as_deref().unwrap_or("-")
    )?;
    writeln!(stdout, "packaging:  {}", coordinates.packaging)?;
    if let Some(parent) = &summary.parent {
        writeln!(stdout, "parent:     {}", format_coordinate(parent))?;
    }
    if !summary.modules.is_empty() {
        writeln!(stdout, "modules:    {}", summary.modules.join(", "))?;
    }
    for dependency in &summary.dependencies {
        writeln!(stdout, "dependency: {}", format_coordinate(dependency))?;
    }
    Ok(())
}

fn format_coordinate(coordinate: &Coordinate) -> String {
    [
        coordinate.group_id.as_deref(),
        coordinate.artifact_id.as_deref(),
        coordinate.version.as_deref(),
    ]
    .map(|part| part.unwrap_or("?"))
    .join(":")
}
