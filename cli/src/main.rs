//! stepdoc CLI - report rendering tool

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use stepdoc::{
    DocumentLayout, DocumentType, JsonLinesSink, ProtectionHash, RenderCommand, RenderOptions,
    RenderStats, ReportRenderer, ReportRequest,
};

#[derive(Parser)]
#[command(name = "stepdoc")]
#[command(version)]
#[command(about = "Render manufacturing instructions and specifications to document commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a report request to a command stream
    Render {
        /// Request JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Custom layout JSON file
        #[arg(short, long, value_name = "FILE")]
        layout: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "ndjson")]
        format: OutputFormat,

        /// Body font size in points
        #[arg(long, default_value = "12")]
        font_size: f32,

        /// Sentinel for steps without data
        #[arg(long, default_value = "N/A", env = "STEPDOC_EMPTY_SENTINEL")]
        empty: String,
    },

    /// Show a summary of what a request renders to
    Info {
        /// Request JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Compose a tolerance string from set and limit values
    Compose {
        /// Set value
        set: String,

        /// Upper limit
        upper: String,

        /// Lower limit
        lower: String,
    },

    /// Compute the legacy protection hash of a password
    Hash {
        /// Password
        password: String,
    },

    /// Print a built-in layout as JSON
    Layout {
        /// Report shape
        #[arg(value_enum)]
        document_type: ShapeArg,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One JSON command per line
    Ndjson,
    /// Pretty-printed JSON array
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ShapeArg {
    /// Manufacturing instruction
    Manufacturing,
    /// Product specification
    Specification,
}

impl From<ShapeArg> for DocumentType {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Manufacturing => DocumentType::Manufacturing,
            ShapeArg::Specification => DocumentType::Specification,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            input,
            output,
            layout,
            format,
            font_size,
            empty,
        } => {
            let options = RenderOptions::new()
                .with_font_size(font_size)
                .with_empty_sentinel(empty);
            cmd_render(&input, output.as_deref(), layout.as_deref(), format, options)
        }
        Commands::Info { input } => cmd_info(&input),
        Commands::Compose { set, upper, lower } => {
            println!("{}", stepdoc::compose(&set, &upper, &lower));
            Ok(())
        }
        Commands::Hash { password } => cmd_hash(&password),
        Commands::Layout { document_type } => cmd_layout(document_type.into()),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_request(input: &Path) -> Result<ReportRequest, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(input)?;
    Ok(ReportRequest::from_json(&json)?)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(message.to_string());
    pb
}

fn cmd_render(
    input: &Path,
    output: Option<&Path>,
    layout: Option<&Path>,
    format: OutputFormat,
    options: RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = load_request(input)?;
    log::debug!(
        "Loaded request with {} contents and {} references",
        request.contents.len(),
        request.references.len()
    );

    let mut renderer = ReportRenderer::new().with_options(options);
    if let Some(path) = layout {
        renderer = renderer.with_layout(DocumentLayout::from_json(&fs::read_to_string(path)?)?);
    }

    // Keep stdout clean for the command stream
    let pb = output.map(|_| spinner("Rendering report..."));

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };

    let stats = match format {
        OutputFormat::Ndjson => {
            let mut sink = JsonLinesSink::new(writer);
            let stats = renderer.render(&request, &mut sink)?;
            sink.into_inner()?;
            stats
        }
        OutputFormat::Json => {
            let mut commands: Vec<RenderCommand> = Vec::new();
            let stats = renderer.render(&request, &mut commands)?;
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, &commands)?;
            writeln!(writer)?;
            stats
        }
    };

    if let (Some(pb), Some(path)) = (pb, output) {
        pb.finish_and_clear();
        println!("{} {}", "Saved to".green(), path.display());
        print_stats(&stats);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let request = load_request(input)?;
    let layout = request
        .layout
        .clone()
        .unwrap_or_else(|| DocumentLayout::for_type(request.document_type));

    println!("{}", "Report Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {:?}", "Type".bold(), layout.document_type);
    println!("{}: {}", "Revisions".bold(), request.history.len());
    if let Some(current) = request.history.current() {
        println!("{}: {}", "Document No".bold(), current.document_no);
        println!("{}: {}", "Version".bold(), current.version);
        if !current.title.is_empty() {
            println!("{}: {}", "Title".bold(), current.title);
        }
    }

    println!();
    println!("{}", "Steps".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (i, step) in layout.steps.iter().enumerate() {
        println!("  {}.{}", i + 1, step.label);
    }

    let mut commands: Vec<RenderCommand> = Vec::new();
    let stats = ReportRenderer::new()
        .with_layout(layout)
        .render(&request, &mut commands)?;

    println!();
    print_stats(&stats);

    Ok(())
}

fn print_stats(stats: &RenderStats) {
    println!("{}", "Render Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!(
        "{}: {} ({} merges)",
        "Tables".bold(),
        stats.table_count,
        stats.merge_count
    );
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Empty steps".bold(), stats.empty_step_count);
    println!("{}: {}", "Substitutions".bold(), stats.substitution_count);
    println!("{}: {}", "Page fields".bold(), stats.page_field_count);
    println!(
        "{}: {}",
        "Protected".bold(),
        if stats.protected { "Yes" } else { "No" }
    );
}

fn cmd_hash(password: &str) -> Result<(), Box<dyn std::error::Error>> {
    match ProtectionHash::compute(password) {
        Some(hash) => {
            println!("{}", hash);
            Ok(())
        }
        None => Err("password must not be empty".into()),
    }
}

fn cmd_layout(document_type: DocumentType) -> Result<(), Box<dyn std::error::Error>> {
    let layout = DocumentLayout::for_type(document_type);
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "stepdoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Manufacturing report rendering tool");
}
