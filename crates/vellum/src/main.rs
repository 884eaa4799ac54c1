#![forbid(unsafe_code)]

//! Vellum CLI: inspect and render signed documents.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;
use vellum::{content_type_for, inspect, ContentType, EngineConfig, Error, InspectionReport, FORMATS};

#[derive(Parser)]
#[command(
    name = "vellum",
    about = "Vellum: signature inspection for XML, ODF, OOXML, ASiC and ZIP documents",
    version
)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the signatures, references and coverage of a document
    Inspect {
        /// Input document
        file: PathBuf,

        /// MIME type (default: guessed from the file extension)
        #[arg(short = 't', long = "content-type")]
        content_type: Option<String>,
    },

    /// Render a document the way a signer would have seen it
    Visualize {
        /// Input document
        file: PathBuf,

        /// MIME type (default: guessed from the file extension)
        #[arg(short = 't', long = "content-type")]
        content_type: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective engine configuration
    Config {
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List supported MIME types
    Formats,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect { file, content_type } => cmd_inspect(&file, content_type),
        Commands::Visualize {
            file,
            content_type,
            output,
        } => cmd_visualize(&file, content_type, output),
        Commands::Config { config } => cmd_config(config),
        Commands::Formats => cmd_formats(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_inspect(file: &Path, content_type: Option<String>) -> Result<(), Error> {
    let content_type = resolve_content_type(file, content_type)?;
    let document = read_file(file)?;
    let report = inspect(&document, content_type)?;
    print_report(&report);
    Ok(())
}

fn cmd_visualize(file: &Path, content_type: Option<String>, output: Option<PathBuf>) -> Result<(), Error> {
    let content_type = resolve_content_type(file, content_type)?;
    let document = read_file(file)?;
    let container = vellum::container::Container::open(&document, content_type)?;
    let visualization = vellum::visualize::render(&container);
    write_output(output, &visualization.data)
}

fn cmd_config(path: Option<PathBuf>) -> Result<(), Error> {
    let config = match path {
        Some(path) => EngineConfig::from_file(&path)?,
        None => EngineConfig::default(),
    };
    println!("{}", config.to_json()?);
    Ok(())
}

fn cmd_formats() -> Result<(), Error> {
    for (mime, content_type) in FORMATS {
        println!("{mime:<75} {content_type}");
    }
    Ok(())
}

fn print_report(report: &InspectionReport) {
    if report.signatures.is_empty() {
        println!("unsigned {} document", report.content_type);
        return;
    }
    for summary in &report.signatures {
        let part = if summary.part.is_empty() { "<document>" } else { &summary.part };
        println!(
            "signature {} in {part}{}",
            summary.index,
            summary.id.as_deref().map(|id| format!(" (Id {id})")).unwrap_or_default()
        );
        if let Some(error) = &summary.error {
            println!("  error: {error}");
        }
        if let Some(signer) = &summary.signer {
            println!("  signer: {signer}");
        }
        if let Some(time) = summary.signing_time {
            println!("  signing time: {}", time.to_rfc3339());
        }
        if let Some(role) = &summary.role {
            println!("  role: {role}");
        }
        if summary.timestamps > 0 {
            println!("  timestamps: {}", summary.timestamps);
        }
        if let Some(identity) = &summary.identity {
            let names: Vec<&str> = [&identity.first_name, &identity.middle_name, &identity.name]
                .into_iter()
                .filter_map(|n| n.as_deref())
                .collect();
            println!("  identity: {}", names.join(" "));
        }
        for uri in &summary.references {
            println!("  reference: {uri}");
        }
        if summary.uncovered.is_empty() {
            println!("  coverage: complete");
        } else {
            println!("  coverage: missing {}", summary.uncovered.join(", "));
        }
    }
}

// ── Utility functions ────────────────────────────────────────────────

fn resolve_content_type(file: &Path, explicit: Option<String>) -> Result<ContentType, Error> {
    if let Some(mime) = explicit {
        return content_type_for(&mime);
    }
    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "xml" => Ok(ContentType::Xml),
        "odt" | "ods" | "odp" | "odg" | "odc" | "odf" | "odb" => Ok(ContentType::Odf),
        "docx" | "xlsx" | "pptx" => Ok(ContentType::Ooxml),
        "zip" => Ok(ContentType::Zip),
        "asice" | "sce" | "asics" | "scs" => Ok(ContentType::Asic),
        _ => Err(Error::UnsupportedContentType(format!(
            "{}: cannot guess the format, pass --content-type",
            file.display()
        ))),
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|e| Error::Other(format!("{}: {e}", path.display())))
}

fn write_output(path: Option<PathBuf>, data: &[u8]) -> Result<(), Error> {
    match path {
        Some(p) => std::fs::write(&p, data).map_err(|e| Error::Other(format!("{}: {e}", p.display()))),
        None => {
            use std::io::Write;
            std::io::stdout()
                .write_all(data)
                .map_err(|e| Error::Other(format!("stdout: {e}")))
        }
    }
}
