//! CLI tool for building the Markdown corpus and scoring simplifications.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lsmd_core::{clean, ExtractedDocument, SourceFormat};
use lsmd_eval::{Evaluator, FieldNames, RecordSet};
use lsmd_html::HtmlExtractor;
use lsmd_tetml::{DocumentVariant, HeadingMap, TetmlConfig, TetmlExtractor};
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Convert HTML and TETML documents to Markdown with metadata sidecars.
#[derive(Parser, Debug)]
#[command(name = "lsmd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract Markdown from HTML pages
    Html(HtmlArgs),
    /// Extract Markdown from TETML files
    Tetml(TetmlArgs),
    /// Strip highlighting from extracted Markdown files
    Simplify(SimplifyArgs),
    /// Score model output against references
    Evaluate(EvaluateArgs),
}

/// Options shared by the extraction commands.
#[derive(Args, Debug)]
struct ExtractArgs {
    /// Input file(s) or directories
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only process files whose name contains this text
    #[arg(short, long)]
    filter: Option<String>,

    /// Print Markdown to stdout instead of writing files
    #[arg(short, long)]
    print: bool,
}

#[derive(Args, Debug)]
struct HtmlArgs {
    #[command(flatten)]
    extract: ExtractArgs,
}

#[derive(Args, Debug)]
struct TetmlArgs {
    #[command(flatten)]
    extract: ExtractArgs,

    /// Document variant
    #[arg(long, value_enum, default_value = "primary")]
    variant: VariantArg,

    /// Heading font as ID=LEVEL; replaces the default table (F1=1, F2=2, F4=3)
    #[arg(long = "heading-font", value_parser = parse_heading_font)]
    heading_fonts: Vec<(String, u8)>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum VariantArg {
    /// Keep line breaks, bold and headings
    Primary,
    /// One line per paragraph, no bold, no headings
    Secondary,
}

impl From<VariantArg> for DocumentVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Primary => DocumentVariant::Primary,
            VariantArg::Secondary => DocumentVariant::Secondary,
        }
    }
}

#[derive(Args, Debug)]
struct SimplifyArgs {
    /// Directory with highlighted Markdown files
    input: PathBuf,

    /// Directory for the simplified files
    output: PathBuf,

    /// Only process files whose name contains this text
    #[arg(short, long)]
    filter: Option<String>,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// JSONL file with model inputs and outputs
    #[arg(short, long)]
    model: PathBuf,

    /// JSONL file with reference outputs
    #[arg(short, long)]
    reference: PathBuf,

    /// Minimum span overlap for the Markdown F1
    #[arg(short, long, default_value = "0.5")]
    threshold: f64,

    /// Field holding the model input
    #[arg(long, default_value = "input")]
    input_field: String,

    /// Field holding the model output
    #[arg(long, default_value = "model_output")]
    prediction_field: String,

    /// Field holding the reference output
    #[arg(long, default_value = "output")]
    reference_field: String,
}

fn parse_heading_font(value: &str) -> std::result::Result<(String, u8), String> {
    HeadingMap::parse_entry(value).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match &cli.command {
        Command::Html(args) => {
            let extractor = HtmlExtractor::new();
            run_extraction(&args.extract, SourceFormat::Html, cli.verbose, |path, name| {
                let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
                Ok(extractor.extract_reader(BufReader::new(file), name)?)
            })
        }
        Command::Tetml(args) => {
            let extractor = TetmlExtractor::new().with_config(tetml_config(args));
            run_extraction(&args.extract, SourceFormat::Tetml, cli.verbose, |path, name| {
                let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
                Ok(extractor.extract_reader(BufReader::new(file), name)?)
            })
        }
        Command::Simplify(args) => simplify(args, cli.verbose),
        Command::Evaluate(args) => evaluate(args),
    }
}

fn tetml_config(args: &TetmlArgs) -> TetmlConfig {
    let heading_map = if args.heading_fonts.is_empty() {
        HeadingMap::default()
    } else {
        args.heading_fonts
            .iter()
            .fold(HeadingMap::empty(), |map, (id, level)| map.with_font(id, *level))
    };

    TetmlConfig::default()
        .with_variant(args.variant.into())
        .with_heading_map(heading_map)
}

/// Extract every input file, reporting failures and carrying on.
fn run_extraction<F>(args: &ExtractArgs, format: SourceFormat, verbose: bool, extract: F) -> Result<()>
where
    F: Fn(&Path, &str) -> Result<ExtractedDocument>,
{
    let files = collect_inputs(&args.input, format.extension(), args.filter.as_deref())?;
    if files.is_empty() {
        log::warn!("No .{} files to process", format.extension());
    }

    for input_path in &files {
        if verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        let filename = input_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");

        let result = extract(input_path.as_path(), filename).and_then(|document| {
            if args.print {
                print!("{}", document.markdown_with_newline());
                Ok(())
            } else {
                write_document(input_path, args.output.as_ref(), &document, verbose)
            }
        });

        if let Err(e) = result {
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
        }
    }

    Ok(())
}

/// Write `<stem>.md` and `<stem>.json` for one document.
fn write_document(
    input_path: &Path,
    output_dir: Option<&PathBuf>,
    document: &ExtractedDocument,
    verbose: bool,
) -> Result<()> {
    let markdown_path = get_output_path(input_path, output_dir, "md")?;
    write_output(&markdown_path, &document.markdown_with_newline())?;

    let metadata_path = get_output_path(input_path, output_dir, "json")?;
    write_output(&metadata_path, &document.metadata.to_json_pretty()?)?;

    if verbose {
        eprintln!("  {} block(s)", document.blocks.len());
        eprintln!("Written to: {}", markdown_path.display());
    }

    Ok(())
}

/// Write the simplified version of every Markdown file and copy its sidecar.
fn simplify(args: &SimplifyArgs, verbose: bool) -> Result<()> {
    let files = collect_inputs(&[args.input.clone()], "md", args.filter.as_deref())?;
    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create output directory: {}", args.output.display()))?;

    for input_path in &files {
        if let Err(e) = simplify_file(input_path, &args.output) {
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
        } else if verbose {
            eprintln!("Processed: {}", input_path.display());
        }
    }

    Ok(())
}

fn simplify_file(input_path: &Path, output_dir: &Path) -> Result<()> {
    let content =
        fs::read_to_string(input_path).with_context(|| format!("Failed to read {}", input_path.display()))?;

    let simplified = clean::strip_formatting(&content);
    let output = if simplified.is_empty() {
        simplified
    } else {
        format!("{}\n", simplified)
    };
    write_output(&get_output_path(input_path, Some(&output_dir.to_path_buf()), "md")?, &output)?;

    let sidecar = input_path.with_extension("json");
    if sidecar.is_file() {
        let target = get_output_path(input_path, Some(&output_dir.to_path_buf()), "json")?;
        fs::copy(&sidecar, &target)
            .with_context(|| format!("Failed to copy {} to {}", sidecar.display(), target.display()))?;
    }

    Ok(())
}

fn evaluate(args: &EvaluateArgs) -> Result<()> {
    let fields = FieldNames::default()
        .with_input(args.input_field.as_str())
        .with_prediction(args.prediction_field.as_str())
        .with_reference(args.reference_field.as_str());

    let model_file =
        File::open(&args.model).with_context(|| format!("Failed to open {}", args.model.display()))?;
    let model = RecordSet::read_model(BufReader::new(model_file), &fields)
        .with_context(|| format!("Failed to read {}", args.model.display()))?;

    let reference_file =
        File::open(&args.reference).with_context(|| format!("Failed to open {}", args.reference.display()))?;
    let references = RecordSet::read_references(BufReader::new(reference_file), &fields)
        .with_context(|| format!("Failed to read {}", args.reference.display()))?;

    let report = Evaluator::new().with_threshold(args.threshold).evaluate(&model, &references);
    println!("{}", report);

    Ok(())
}

/// Expand directories to their files with `extension`, sorted by path.
///
/// Explicit files are kept as given; the name filter applies to both.
fn collect_inputs(inputs: &[PathBuf], extension: &str, filter: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut entries = Vec::new();
            for entry in fs::read_dir(input).with_context(|| format!("Failed to read directory {}", input.display()))? {
                let path = entry?.path();
                if path.is_file() && has_extension(&path, extension) {
                    entries.push(path);
                }
            }
            entries.sort();
            files.extend(entries);
        } else {
            files.push(input.clone());
        }
    }

    files.retain(|path| matches_filter(path, filter));
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| {
            e.eq_ignore_ascii_case(extension)
                || SourceFormat::from_extension(e).map_or(false, |f| f.extension() == extension)
        })
}

fn matches_filter(path: &Path, filter: Option<&str>) -> bool {
    match filter {
        Some(text) => path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |name| name.contains(text)),
        None => true,
    }
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, output_dir: Option<&PathBuf>, extension: &str) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.{}", stem, extension);

    let output_path = match output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => {
            if let Some(parent) = input_path.parent() {
                parent.join(output_filename)
            } else {
                PathBuf::from(output_filename)
            }
        }
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_next_to_input() {
        let path = get_output_path(Path::new("data/html/12_LS.html"), None, "md").unwrap();
        assert_eq!(path, PathBuf::from("data/html/12_LS.md"));
    }

    #[test]
    fn test_filter() {
        assert!(matches_filter(Path::new("a/1_LS.html"), Some("LS")));
        assert!(!matches_filter(Path::new("a/1_AS.html"), Some("LS")));
        assert!(matches_filter(Path::new("a/1_AS.html"), None));
    }

    #[test]
    fn test_extension_matching() {
        assert!(has_extension(Path::new("a.HTML"), "html"));
        assert!(has_extension(Path::new("a.htm"), "html"));
        assert!(has_extension(Path::new("a.tetml"), "tetml"));
        assert!(!has_extension(Path::new("a.json"), "md"));
        assert!(has_extension(Path::new("a.md"), "md"));
    }

    #[test]
    fn test_both_formats_write_trailing_newline() {
        let dir = std::env::temp_dir().join(format!("lsmd-write-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        for (format, name) in [(SourceFormat::Html, "1_LS.html"), (SourceFormat::Tetml, "1_LS.tetml")] {
            let mut document = ExtractedDocument::new(format, lsmd_core::DocumentMetadata::new(name));
            document
                .blocks
                .push(lsmd_core::MarkdownBlock::Paragraph("Text".to_string()));

            write_document(&dir.join(name), Some(&dir), &document, false).unwrap();
            assert_eq!(fs::read_to_string(dir.join("1_LS.md")).unwrap(), "Text\n");
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_heading_font_argument() {
        assert_eq!(parse_heading_font("F3=2"), Ok(("F3".to_string(), 2)));
        assert!(parse_heading_font("F3").is_err());
    }

    #[test]
    fn test_cli_parses_tetml_options() {
        let cli = Cli::parse_from([
            "lsmd",
            "tetml",
            "in",
            "--variant",
            "secondary",
            "--heading-font",
            "F7=2",
        ]);
        let Command::Tetml(args) = cli.command else {
            panic!("expected tetml command");
        };
        let config = tetml_config(&args);
        assert_eq!(config.variant, DocumentVariant::Secondary);
        assert_eq!(config.heading_map.level_for("f7"), Some(2));
        assert_eq!(config.heading_map.level_for("F1"), None);
    }
}
