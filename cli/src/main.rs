//! udfconv CLI - DOCX / UDF / PDF conversion tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use udfconv::udf::to_json;
use udfconv::{
    bundle_outputs, convert_batch, convert_jobs, detect_format_from_path, BatchEntry,
    ConversionKind, ConversionOutcome, ConvertOptions, JsonFormat, SourceFormat, UdfCodec,
};

#[derive(Parser)]
#[command(name = "udfconv")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert documents between DOCX, UDF and PDF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert Word documents to UDF
    DocxToUdf(BatchArgs),

    /// Convert UDF files to Word documents
    UdfToDocx(BatchArgs),

    /// Convert PDF files to UDF
    PdfToUdf(BatchArgs),

    /// Convert UDF files to PDF
    UdfToPdf(BatchArgs),

    /// Detect each input's format and convert it to the target format
    Convert {
        /// Target format
        #[arg(long, value_enum)]
        to: Target,

        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Dump a UDF file's span model as JSON
    Inspect {
        /// Input UDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Reject out-of-range offsets instead of clamping them
        #[arg(long)]
        strict: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct BatchArgs {
    /// Input files
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Bundle the converted files into one zip archive
    #[arg(long)]
    zip: bool,

    /// Reject out-of-range offsets instead of clamping them
    #[arg(long)]
    strict: bool,
}

impl BatchArgs {
    fn options(&self) -> ConvertOptions {
        if self.strict {
            ConvertOptions::new().strict()
        } else {
            ConvertOptions::new()
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Target {
    /// UDF document
    Udf,
    /// Word document
    Docx,
    /// PDF document
    Pdf,
}

impl Target {
    fn kind_for(self, source: SourceFormat) -> Option<ConversionKind> {
        match (source, self) {
            (SourceFormat::Docx, Target::Udf) => Some(ConversionKind::DocxToUdf),
            (SourceFormat::Pdf, Target::Udf) => Some(ConversionKind::PdfToUdf),
            (SourceFormat::Udf, Target::Docx) => Some(ConversionKind::UdfToDocx),
            (SourceFormat::Udf, Target::Pdf) => Some(ConversionKind::UdfToPdf),
            _ => None,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::DocxToUdf(args)) => cmd_batch(ConversionKind::DocxToUdf, &args),
        Some(Commands::UdfToDocx(args)) => cmd_batch(ConversionKind::UdfToDocx, &args),
        Some(Commands::PdfToUdf(args)) => cmd_batch(ConversionKind::PdfToUdf, &args),
        Some(Commands::UdfToPdf(args)) => cmd_batch(ConversionKind::UdfToPdf, &args),
        Some(Commands::Convert { to, batch }) => cmd_convert(to, &batch),
        Some(Commands::Inspect {
            input,
            output,
            compact,
            strict,
        }) => cmd_inspect(&input, output.as_deref(), compact, strict),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: udfconv <COMMAND> <FILE>...".yellow());
            println!("       udfconv --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_batch(kind: ConversionKind, args: &BatchArgs) -> CliResult<()> {
    let pb = spinner(format!("{} ({} files)", kind, args.inputs.len()))?;
    let entries = convert_batch(kind, &args.inputs, &args.output, &args.options());
    pb.finish_and_clear();

    finish(entries, args)
}

fn cmd_convert(target: Target, args: &BatchArgs) -> CliResult<()> {
    let pb = spinner(format!("Converting {} files", args.inputs.len()))?;
    let options = args.options();

    let mut entries = Vec::with_capacity(args.inputs.len());
    let mut jobs: Vec<(ConversionKind, PathBuf)> = Vec::new();
    for input in &args.inputs {
        let kind = detect_format_from_path(input).and_then(|format| {
            target.kind_for(format).ok_or_else(|| {
                udfconv::Error::UnsupportedConversion(format!(
                    "{} to {}",
                    format,
                    format_name(target)
                ))
            })
        });
        match kind {
            Ok(kind) => jobs.push((kind, input.clone())),
            Err(e) => entries.push(BatchEntry {
                input: input.clone(),
                outcome: ConversionOutcome::failure(&e),
            }),
        }
    }

    entries.extend(convert_jobs(&jobs, &args.output, &options));
    pb.finish_and_clear();

    finish(entries, args)
}

fn cmd_inspect(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    strict: bool,
) -> CliResult<()> {
    let options = if strict {
        ConvertOptions::new().strict()
    } else {
        ConvertOptions::new()
    };
    let bytes = fs::read(input)?;
    let model = UdfCodec::new()
        .with_error_mode(options.error_mode)
        .decode(&bytes)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = to_json(&model, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "udfconv".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("DOCX / UDF / PDF conversion tool");
    println!();
    println!("License: MIT");
}

fn spinner(message: String) -> CliResult<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Print per-file results, bundle if requested, and fail if any file failed.
fn finish(entries: Vec<BatchEntry>, args: &BatchArgs) -> CliResult<()> {
    for entry in &entries {
        report(entry);
    }

    let failed = entries.iter().filter(|e| !e.outcome.success).count();
    let succeeded = entries.len() - failed;

    if args.zip && succeeded > 0 {
        let bundle = bundle_outputs(&entries, &args.output)?;
        println!("{} {}", "Bundled into".green(), bundle.display());
    }

    println!(
        "\n{} {} converted, {} failed",
        "Done!".green().bold(),
        succeeded,
        failed
    );

    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, entries.len()).into());
    }
    Ok(())
}

fn report(entry: &BatchEntry) {
    let outcome = &entry.outcome;
    match &outcome.output {
        Some(output) if outcome.success => println!(
            "  {} {} {} {}  {}",
            "✓".green(),
            entry.input.display(),
            "→".dimmed(),
            output.display(),
            outcome.message.dimmed()
        ),
        _ => println!(
            "  {} {}  {}",
            "✗".red(),
            entry.input.display(),
            outcome.message.red()
        ),
    }
}

fn format_name(target: Target) -> &'static str {
    match target {
        Target::Udf => "UDF",
        Target::Docx => "DOCX",
        Target::Pdf => "PDF",
    }
}
