//! T2D CLI - Command-line interface
//!
//! Usage:
//!   t2d label [INPUT] --mode smart --format spacy --output train.json
//!   t2d normalize [INPUT]
//!   t2d segment [INPUT]
//!   t2d detect-language [INPUT]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use t2d_core::{AppConfig, ExtractionMode, LoggingConfig, OutputFormat};
use t2d_export::{dataset_file_name, write_dataset};
use t2d_extractor::{load_recognizer, LabelingPipeline};
use t2d_text::{detect_language, normalize, validate_text_length, InputSource, Segmenter};

#[derive(Parser)]
#[command(name = "t2d")]
#[command(about = "Turn raw text into labeled NER training datasets")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML); environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Label entities and write a dataset
    Label {
        #[command(flatten)]
        input: InputArgs,

        /// Extraction mode: fast or smart
        #[arg(long)]
        mode: Option<ExtractionMode>,

        /// Output format: csv, json or spacy
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Output file (stdout if omitted)
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Directory for a generated `dataset_<uuid>` file
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Gazetteer model for the primary recognizer
        #[arg(long)]
        gazetteer: Option<PathBuf>,

        /// Write run statistics as JSON to this file
        #[arg(long)]
        stats: Option<PathBuf>,
    },
    /// Print normalized text
    Normalize {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print one sentence per line
    Segment {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the detected language code
    DetectLanguage {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input file; `-` or absent reads stdin
    input: Option<String>,

    /// Use this text instead of reading a file
    #[arg(long, conflicts_with = "input")]
    text: Option<String>,
}

impl InputArgs {
    fn source(&self) -> InputSource {
        match &self.text {
            Some(text) => InputSource::Inline(text.clone()),
            None => InputSource::from_arg(self.input.as_deref()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Label {
            input,
            mode,
            format,
            output,
            output_dir,
            gazetteer,
            stats,
        } => {
            let mut config = config;
            if let Some(mode) = mode {
                config.pipeline.mode = mode;
            }
            if let Some(format) = format {
                config.pipeline.output_format = format;
            }
            if let Some(gazetteer) = gazetteer {
                config.recognizer.gazetteer_path = Some(gazetteer);
            }

            let destination = match (output, output_dir) {
                (Some(path), _) => Some(path),
                (None, Some(dir)) => {
                    std::fs::create_dir_all(&dir)
                        .with_context(|| format!("Failed to create {}", dir.display()))?;
                    Some(dir.join(dataset_file_name(config.pipeline.output_format)))
                }
                (None, None) => None,
            };

            run_label(&config, &input.source(), destination.as_deref(), stats.as_deref())?;
        }
        Commands::Normalize { input } => {
            let text = read_input(&input.source(), &config)?;
            println!("{}", normalize(&text));
        }
        Commands::Segment { input } => {
            let text = read_input(&input.source(), &config)?;
            let segmenter = Segmenter::from_kind(config.pipeline.segmenter);

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for sentence in segmenter.segment(&normalize(&text)) {
                writeln!(out, "{}", sentence)?;
            }
        }
        Commands::DetectLanguage { input } => {
            let text = read_input(&input.source(), &config)?;
            println!("{}", detect_language(&text).code());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path)
            .and_then(AppConfig::with_env_override)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => AppConfig::from_env().context("Failed to load configuration from environment"),
    }
}

fn init_tracing(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    if config.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_input(source: &InputSource, config: &AppConfig) -> anyhow::Result<String> {
    let text = source
        .read()
        .with_context(|| format!("Failed to read {}", source.describe()))?;
    validate_text_length(&text, config.pipeline.max_text_length)?;
    Ok(text)
}

fn run_label(
    config: &AppConfig,
    source: &InputSource,
    destination: Option<&Path>,
    stats_path: Option<&Path>,
) -> anyhow::Result<()> {
    let recognizer = load_recognizer(&config.recognizer);
    let pipeline = LabelingPipeline::from_config(&config.pipeline, recognizer);

    let output = pipeline
        .process(source)
        .with_context(|| format!("Failed to label {}", source.describe()))?;
    let stats = output.stats.clone();

    let format = config.pipeline.output_format;
    let dataset = output.into_dataset(format);

    match destination {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_dataset(&dataset, format, BufWriter::new(file))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} {} rows to {}", dataset.len(), format, path.display());
            println!("{}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_dataset(&dataset, format, stdout.lock()).context("Failed to write dataset")?;
        }
    }

    if let Some(path) = stats_path {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &stats)?;
        writer.flush()?;
    }

    Ok(())
}
