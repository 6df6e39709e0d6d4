use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::disambiguator::Disambiguator;
use crate::io::{DocumentStore, HeuristicCacheStore, TurnWriter, detect_chair, strip_appendix};
use crate::models::Participant;
use crate::resolver::has_heading_shape;
use crate::segment::{LineKind, LineStep, RegionTracker, Segmenter, SegmenterConfig, SessionContext};

/// Counts reported at the end of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub documents: usize,
    pub hearing_days: usize,
    pub turns: usize,
    pub skipped_documents: usize,
    pub skipped_days: usize,
}

/// Segment every listed document and stream its turns to `writer`.
///
/// Caches are loaded once and saved after every hearing day. Documents or
/// days that cannot be located are skipped with a warning; a failed
/// disambiguation aborts the batch.
pub fn process_documents<W: Write>(
    ids: &[String],
    documents: &dyn DocumentStore,
    caches: &mut dyn HeuristicCacheStore,
    disambiguator: &mut dyn Disambiguator,
    config: &SegmenterConfig,
    writer: &mut TurnWriter<W>,
) -> Result<BatchSummary> {
    let cache = caches.load_cache().context("Failed to load heuristic caches")?;
    info!(
        "Loaded {} possible speakers and {} invalid headings",
        cache.possible_speakers().len(),
        cache.invalid_headings().len()
    );

    let mut session = SessionContext::new(cache);
    let mut summary = BatchSummary::default();

    for id in ids {
        info!("Processing document {}", id);

        let metadata = match documents.fetch_metadata(id) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Skipping document {}: {}", id, e);
                summary.skipped_documents += 1;
                continue;
            }
        };
        let roster = match documents.fetch_roster(id) {
            Ok(roster) => roster,
            Err(e) => {
                warn!("Skipping document {}: {}", id, e);
                summary.skipped_documents += 1;
                continue;
            }
        };
        let split = match documents.fetch_transcript_text(&metadata) {
            Ok(Some(split)) => split,
            Ok(None) => {
                warn!("Skipping document {}: transcript body not found", id);
                summary.skipped_documents += 1;
                continue;
            }
            Err(e) => {
                warn!("Skipping document {}: {}", id, e);
                summary.skipped_documents += 1;
                continue;
            }
        };
        summary.skipped_days += split.missing_dates.len();

        let chair = detect_chair(&split.heading, &roster);
        if let Some(chair) = &chair {
            info!("Front matter names {} as chair of {}", chair, id);
        }
        session.begin_document(id.as_str(), roster, chair);

        let mut turns = Vec::new();
        for day in &split.days {
            let context = metadata.context_for(day.date);
            let text = strip_appendix(&day.text);

            let day_turns = Segmenter::new(config, &mut *disambiguator, &mut *caches)
                .segment_day(text, &context, &mut session)
                .with_context(|| format!("Failed to segment {} on {}", id, day.date))?;

            caches
                .save_cache(&session.cache)
                .context("Failed to save heuristic caches")?;

            summary.hearing_days += 1;
            turns.extend(day_turns);
        }

        writer
            .write_turns(&turns)
            .with_context(|| format!("Failed to write turns of {}", id))?;
        summary.documents += 1;
        summary.turns += turns.len();
        info!("Document {}: {} turns", id, turns.len());
    }

    info!(
        "Batch complete: {} documents, {} hearing days, {} turns ({} documents and {} days skipped)",
        summary.documents,
        summary.hearing_days,
        summary.turns,
        summary.skipped_documents,
        summary.skipped_days
    );
    Ok(summary)
}

/// Line statistics for one hearing day, gathered without attribution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayAnalysis {
    pub date: Option<NaiveDate>,
    pub lines: usize,
    pub suppressed: usize,
    pub question_headers: usize,
    pub question_lines: usize,
    pub continuations: usize,
    /// Lines shaped like a speaker heading
    pub headings: Vec<String>,
}

/// Dry-run view of a document
#[derive(Debug, Clone, Default)]
pub struct DocumentAnalysis {
    pub document_id: String,
    pub chair: Option<Participant>,
    pub roster_size: usize,
    pub days: Vec<DayAnalysis>,
    pub missing_dates: Vec<NaiveDate>,
}

/// Split a document and walk its regions without consulting a disambiguator.
/// Every Q&A header is assumed to resolve.
pub fn analyze_document(
    documents: &dyn DocumentStore,
    document_id: &str,
    config: &SegmenterConfig,
) -> Result<DocumentAnalysis> {
    let metadata = documents
        .fetch_metadata(document_id)
        .with_context(|| format!("Failed to load metadata of {}", document_id))?;
    let roster = documents
        .fetch_roster(document_id)
        .with_context(|| format!("Failed to load roster of {}", document_id))?;
    let split = documents
        .fetch_transcript_text(&metadata)
        .with_context(|| format!("Failed to load transcript of {}", document_id))?
        .with_context(|| format!("No hearing text located in {}", document_id))?;

    let days = split
        .days
        .iter()
        .map(|day| {
            let mut analysis = analyze_text(strip_appendix(&day.text), config);
            analysis.date = Some(day.date);
            analysis
        })
        .collect();

    Ok(DocumentAnalysis {
        document_id: document_id.to_string(),
        chair: detect_chair(&split.heading, &roster),
        roster_size: roster.len(),
        days,
        missing_dates: split.missing_dates,
    })
}

/// Region statistics for the text of one hearing day
pub fn analyze_text(text: &str, config: &SegmenterConfig) -> DayAnalysis {
    let mut tracker = RegionTracker::new(&config.markers);
    let mut analysis = DayAnalysis::default();

    for line in text.lines() {
        analysis.lines += 1;
        match tracker.advance(line) {
            LineStep::Suppressed => analysis.suppressed += 1,
            LineStep::QuestionsHeader(direction) => {
                analysis.question_headers += 1;
                match direction {
                    Some(_) => tracker.open_questions(),
                    None => tracker.open_report(),
                }
            }
            LineStep::QuestionLine => analysis.question_lines += 1,
            LineStep::Body(LineKind::Continuation) => analysis.continuations += 1,
            LineStep::Body(LineKind::Heading) => {
                let words: Vec<&str> = line.split_whitespace().collect();
                if has_heading_shape(&words) {
                    analysis.headings.push(line.trim().to_string());
                }
            }
            LineStep::Body(_) => {}
        }
    }
    analysis
}
