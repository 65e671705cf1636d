use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

mod output;

use output::ColorMode;

use sysrev_core::{
    DocumentInput, GenerationParams, ProgressEvent, SectionSchema, config_file, run_batch,
};
use sysrev_model::HttpSummaryModel;
use sysrev_reporting::{ExportFormat, REVIEW_FILE_NAME};

/// Systematic Review Tool - Generate structured summaries from document batches
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize documents section-by-section and aggregate the results
    Review {
        /// Paths to the PDF (or .txt/.md) documents to review
        files: Vec<PathBuf>,

        /// Path to write the aggregated review artifact
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Artifact format: json or markdown
        #[arg(long)]
        format: Option<String>,

        /// Path to a custom section schema (JSON)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Summarization endpoint URL
        #[arg(long)]
        endpoint: Option<String>,

        /// API token for the summarization endpoint
        #[arg(long)]
        api_token: Option<String>,

        /// Maximum summary length in model tokens
        #[arg(long)]
        max_length: Option<u32>,

        /// Minimum summary length in model tokens
        #[arg(long)]
        min_length: Option<u32>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Dry run: extract and print document text without summarizing
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the resolved section schema as JSON
    Schema {
        /// Path to a custom section schema (JSON); omit for the built-in one
        #[arg(long)]
        schema: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Schema { schema } => print_schema(schema),
        Command::Review {
            files,
            output,
            format,
            schema,
            endpoint,
            api_token,
            max_length,
            min_length,
            no_color,
            dry_run,
        } => {
            if dry_run {
                dry_run_review(files, schema, no_color)
            } else {
                review(
                    files, output, format, schema, endpoint, api_token, max_length, min_length,
                    no_color,
                )
                .await
            }
        }
    }
}

fn load_schema(path: Option<&PathBuf>) -> anyhow::Result<SectionSchema> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                anyhow::anyhow!("Failed to read schema file {}: {}", path.display(), e)
            })?;
            Ok(SectionSchema::from_json_str(&content)?)
        }
        None => Ok(SectionSchema::systematic_review().clone()),
    }
}

fn print_schema(schema_path: Option<PathBuf>) -> anyhow::Result<()> {
    let schema = load_schema(schema_path.as_ref())?;
    println!(
        "{}",
        sysrev_reporting::render_json_value(&schema.to_json_value())?
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn review(
    files: Vec<PathBuf>,
    output: Option<PathBuf>,
    format: Option<String>,
    schema_path: Option<PathBuf>,
    endpoint: Option<String>,
    api_token: Option<String>,
    max_length: Option<u32>,
    min_length: Option<u32>,
    no_color: bool,
) -> anyhow::Result<()> {
    if files.is_empty() {
        anyhow::bail!("No input files given");
    }

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let file_config = config_file::load_config();
    let model_config = file_config.model.unwrap_or_default();
    let output_config = file_config.output.unwrap_or_default();
    let schema_config = file_config.schema.unwrap_or_default();

    let endpoint = endpoint
        .or_else(|| std::env::var("SYSREV_ENDPOINT").ok())
        .or(model_config.endpoint)
        .unwrap_or_else(|| sysrev_model::DEFAULT_ENDPOINT.to_string());
    let api_token = api_token
        .or_else(|| std::env::var("HF_API_TOKEN").ok())
        .or(model_config.api_token);

    let defaults = GenerationParams::default();
    let params = GenerationParams {
        max_length: max_length.or(model_config.max_length).unwrap_or(defaults.max_length),
        min_length: min_length.or(model_config.min_length).unwrap_or(defaults.min_length),
        do_sample: false,
    };

    let schema_path = schema_path.or(schema_config.path.map(PathBuf::from));
    let schema = load_schema(schema_path.as_ref())?;

    let output_path = output
        .or(output_config.path.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(REVIEW_FILE_NAME));
    let format_name = format.or(output_config.format).unwrap_or_else(|| "json".to_string());
    let format = ExportFormat::from_name(&format_name)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}", format_name))?;

    let color = ColorMode(!no_color);
    let mut writer: Box<dyn Write> = Box::new(std::io::stdout());

    // Extract text per file; a failed file is reported and skipped, the
    // batch proceeds.
    let mut documents = Vec::with_capacity(files.len());
    let mut skipped_files = 0usize;
    for path in &files {
        let name = file_name(path);
        match sysrev_ingest::extract_text(path) {
            Ok(text) => documents.push(DocumentInput { name, text }),
            Err(e) => {
                skipped_files += 1;
                output::print_skipped_file(&mut writer, &name, &e.to_string(), color)?;
            }
        }
    }

    if documents.is_empty() {
        anyhow::bail!("No documents could be ingested");
    }

    // One model handle for the whole batch.
    let model = HttpSummaryModel::new(endpoint, api_token);

    let leaf_count = schema.leaf_count() as u64;
    let bar = ProgressBar::new(documents.len() as u64 * leaf_count);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    let progress = {
        let bar = bar.clone();
        move |event: ProgressEvent| match event {
            ProgressEvent::DocumentStarted { name, .. } => {
                bar.set_message(name);
            }
            ProgressEvent::LeafSummarized { path, .. } => {
                bar.inc(1);
                bar.set_message(path.to_string());
            }
            ProgressEvent::DocumentCompleted {
                index,
                total,
                name,
                failed_leaves,
            } => {
                let mut line = Vec::new();
                let _ = output::print_document_status(
                    &mut line,
                    index,
                    total,
                    &name,
                    failed_leaves,
                    color,
                );
                bar.println(String::from_utf8_lossy(&line).trim_end().to_string());
            }
        }
    };

    let result = run_batch(documents, &schema, &model, &params, progress).await;
    bar.finish_and_clear();

    output::print_failures(&mut writer, &result.reviews, color)?;
    output::print_summary(&mut writer, &result.stats, skipped_files, color)?;

    sysrev_reporting::export_review(&result.aggregated, format, &output_path)?;
    let canonical =
        std::fs::canonicalize(&output_path).unwrap_or_else(|_| output_path.clone());
    writeln!(writer, "Aggregated review saved to: {}", canonical.display())?;

    Ok(())
}

fn dry_run_review(
    files: Vec<PathBuf>,
    schema_path: Option<PathBuf>,
    no_color: bool,
) -> anyhow::Result<()> {
    use owo_colors::OwoColorize;

    if files.is_empty() {
        anyhow::bail!("No input files given");
    }

    let color = ColorMode(!no_color);
    let mut writer: Box<dyn Write> = Box::new(std::io::stdout());
    let schema = load_schema(schema_path.as_ref())?;

    for path in &files {
        let name = file_name(path);
        match sysrev_ingest::extract_text(path) {
            Ok(text) => {
                let normalized = sysrev_core::normalize_whitespace(&text);
                let preview: String = normalized.chars().take(200).collect();
                if color.enabled() {
                    writeln!(
                        writer,
                        "{} {} ({} chars extracted)",
                        "DRY RUN:".bold().cyan(),
                        name.bold(),
                        normalized.chars().count()
                    )?;
                } else {
                    writeln!(
                        writer,
                        "DRY RUN: {} ({} chars extracted)",
                        name,
                        normalized.chars().count()
                    )?;
                }
                writeln!(writer, "  {}", preview)?;
                writeln!(writer)?;
            }
            Err(e) => {
                output::print_skipped_file(&mut writer, &name, &e.to_string(), color)?;
            }
        }
    }

    writeln!(
        writer,
        "Schema: {} leaf section(s) would be summarized per document",
        schema.leaf_count()
    )?;

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
