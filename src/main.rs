use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hearing_segmenter::{
    Disambiguator, DocumentStore, FsCacheStore, FsDocumentStore, InteractiveDisambiguator,
    ScriptedDisambiguator, SegmenterConfig, TurnWriter, analyze_document, process_documents,
};

#[derive(Parser)]
#[command(name = "hearing-segmenter")]
#[command(author, version, about = "Speech-turn segmentation for hearing transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment hearing transcripts into attributed speech turns
    Process {
        /// Directory holding <id>.json and <id>.txt per document
        #[arg(short, long)]
        documents: PathBuf,

        /// Document ids to process (default: every document in the directory)
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Directory for the learned heuristic caches
        #[arg(long, default_value = ".")]
        cache_dir: PathBuf,

        /// Segmenter configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Replay pre-recorded answers (JSON) instead of prompting
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Rejoin hard-wrapped paragraphs before segmenting
        #[arg(long)]
        reflow: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Split a document and report its regions without attributing speakers
    Analyze {
        /// Directory holding <id>.json and <id>.txt per document
        #[arg(short, long)]
        documents: PathBuf,

        /// Document id
        #[arg(long)]
        id: String,

        /// Segmenter configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            documents,
            ids,
            output,
            cache_dir,
            config,
            answers,
            reflow,
            verbose,
        } => {
            setup_logging(verbose);
            process(documents, ids, output, cache_dir, config, answers, reflow)
        }
        Commands::Analyze {
            documents,
            id,
            config,
            verbose,
        } => {
            setup_logging(verbose);
            analyze(documents, id, config)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(path: Option<&Path>) -> Result<SegmenterConfig> {
    let Some(path) = path else {
        return Ok(SegmenterConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse config: {:?}", path))
}

fn process(
    documents: PathBuf,
    ids: Vec<String>,
    output: PathBuf,
    cache_dir: PathBuf,
    config: Option<PathBuf>,
    answers: Option<PathBuf>,
    reflow: bool,
) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let store = FsDocumentStore::new(&documents).with_reflow(reflow);
    let ids = if ids.is_empty() {
        store
            .list_documents()
            .context("Failed to list documents")?
    } else {
        ids
    };
    info!("Processing {} documents from {:?}", ids.len(), documents);

    let mut caches = FsCacheStore::new(cache_dir);
    let mut writer = TurnWriter::create(&output)?;

    let mut disambiguator: Box<dyn Disambiguator> = match answers {
        Some(path) => {
            info!("Replaying answers from {:?}", path);
            Box::new(
                ScriptedDisambiguator::from_file(&path)
                    .context("Failed to load scripted answers")?,
            )
        }
        None => Box::new(InteractiveDisambiguator::stdio()),
    };

    let summary = process_documents(
        &ids,
        &store,
        &mut caches,
        disambiguator.as_mut(),
        &config,
        &mut writer,
    )?;

    if summary.skipped_documents > 0 || summary.skipped_days > 0 {
        warn!(
            "Skipped {} documents and {} hearing days",
            summary.skipped_documents, summary.skipped_days
        );
    }
    info!("Wrote {} turns to {:?}", writer.rows(), output);
    Ok(())
}

fn analyze(documents: PathBuf, id: String, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let store = FsDocumentStore::new(&documents);
    info!("Analyzing {} from {:?}", id, documents);
    let analysis = analyze_document(&store, &id, &config)?;

    println!("Document Analysis: {}", analysis.document_id);
    println!("==================");
    println!("Roster: {} participants", analysis.roster_size);
    match &analysis.chair {
        Some(chair) => println!("Chair (front matter): {}", chair),
        None => println!("Chair (front matter): not found"),
    }
    for date in &analysis.missing_dates {
        println!("Missing date anchor: {}", date);
    }

    for day in &analysis.days {
        println!();
        match day.date {
            Some(date) => println!("Hearing day {}", date),
            None => println!("Hearing day"),
        }
        println!("-----------");
        println!("Lines: {}", day.lines);
        println!("Suppressed (region content): {}", day.suppressed);
        println!("Continuation lines: {}", day.continuations);
        println!("Q&A headers: {}", day.question_headers);
        println!("Q&A lines: {}", day.question_lines);
        println!("Candidate headings: {}", day.headings.len());
        for heading in &day.headings {
            println!("  {}", heading);
        }
    }

    Ok(())
}
