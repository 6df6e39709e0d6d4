pub mod accumulator;
pub mod attribution;
pub mod classifier;
pub mod region;
pub mod session;

pub use accumulator::*;
pub use attribution::*;
pub use classifier::*;
pub use region::*;
pub use session::*;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::disambiguator::{Confirmation, Disambiguator, EntryHint, EntryPurpose, excerpt};
use crate::error::SegmentError;
use crate::io::HeuristicCacheStore;
use crate::models::{Participant, SpeechTurn, TurnContext};
use crate::resolver::{choose_candidate, match_named, same_word};

/// Literal markers that open and close transcript regions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegionMarkers {
    /// Minimum run of dashes forming a source-block rule
    pub source_rule_len: usize,
    /// Prefixes marking a line as continued source citation
    pub source_continuations: Vec<String>,
    /// Phrase opening an embedded report
    pub report_open: String,
    /// Underscore run closing a report or Q&A block
    pub block_close: String,
    /// First two tokens of a Q&A header
    pub questions_header: String,
}

impl Default for RegionMarkers {
    fn default() -> Self {
        Self {
            source_rule_len: 20,
            source_continuations: vec![r"\\".to_string(), "--".to_string()],
            report_open: "[The information follows:]".to_string(),
            block_close: "______".to_string(),
            questions_header: "Questions Submitted".to_string(),
        }
    }
}

impl RegionMarkers {
    /// Whether the line starts or ends with a run of dashes
    pub fn is_source_rule(&self, line: &str) -> bool {
        let rule = "-".repeat(self.source_rule_len.max(1));
        line.starts_with(&rule) || line.ends_with(&rule)
    }

    /// Whether a line inside a source block continues the citation
    pub fn is_source_continuation(&self, line: &str) -> bool {
        line.chars().count() <= 2
            || self
                .source_continuations
                .iter()
                .any(|prefix| line.starts_with(prefix.as_str()))
    }

    /// Recognise a "Questions Submitted" header and the direction it names
    pub fn questions_header(&self, line: &str) -> Option<Option<QaDirection>> {
        let mut expected = self.questions_header.split_whitespace();
        let (Some(noun), Some(verb)) = (expected.next(), expected.next()) else {
            return None;
        };

        let words: Vec<&str> = line
            .split_whitespace()
            .map(|w| w.strip_suffix(',').unwrap_or(w))
            .collect();
        if words.len() < 2 || words[0] != noun || !same_word(words[1], verb) {
            return None;
        }

        let direction = if words.contains(&"to") {
            Some(QaDirection::To)
        } else if words.contains(&"by") {
            Some(QaDirection::By)
        } else {
            None
        };
        Some(direction)
    }
}

/// Configuration for the segmentation engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Prefixes attributing a turn to the document's chairperson
    pub chair_aliases: Vec<String>,
    /// Prefixes opening a discarded clerk reading
    pub clerk_aliases: Vec<String>,
    /// Token (first or second) marking a statement-insertion line
    pub statement_token: String,
    pub markers: RegionMarkers,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            chair_aliases: vec![
                "The Chairman.".to_string(),
                "The Chairwoman.".to_string(),
                "The Chairperson.".to_string(),
                "The Chair.".to_string(),
            ],
            clerk_aliases: vec!["The Clerk.".to_string()],
            statement_token: "statement".to_string(),
            markers: RegionMarkers::default(),
        }
    }
}

/// Participants on either side of the current Q&A block
#[derive(Debug, Clone, Default)]
struct QuestionParticipants {
    author: Option<Participant>,
    recipient: Option<Participant>,
}

/// Walks one hearing day line by line and produces its speech turns.
///
/// Suspends on the disambiguator whenever heuristics are inconclusive, and
/// consults the cache store for the document's chairperson.
pub struct Segmenter<'a> {
    config: &'a SegmenterConfig,
    disambiguator: &'a mut dyn Disambiguator,
    store: &'a mut dyn HeuristicCacheStore,
}

impl<'a> Segmenter<'a> {
    pub fn new(
        config: &'a SegmenterConfig,
        disambiguator: &'a mut dyn Disambiguator,
        store: &'a mut dyn HeuristicCacheStore,
    ) -> Self {
        Self {
            config,
            disambiguator,
            store,
        }
    }

    /// Segment the text of one hearing day.
    ///
    /// The session's roster and heuristic cache may grow along the way.
    pub fn segment_day(
        &mut self,
        text: &str,
        context: &TurnContext,
        session: &mut SessionContext,
    ) -> Result<Vec<SpeechTurn>, SegmentError> {
        let config = self.config;
        let mut tracker = RegionTracker::new(&config.markers);
        let mut accumulator = EntryAccumulator::new(context);
        let mut questions = QuestionParticipants::default();

        for line in text.lines() {
            match tracker.advance(line) {
                LineStep::Suppressed => {}
                LineStep::QuestionsHeader(direction) => {
                    self.open_questions(line, direction, session, &mut tracker, &mut questions)?;
                }
                LineStep::QuestionLine => attribute_question_line(line, &questions, &mut accumulator),
                LineStep::Body(kind) => self.attribute(line, kind, session, &mut accumulator)?,
            }
        }

        let recorded = accumulator.len();
        let turns = accumulator.finalize();
        info!(
            "Segmented {} on {}: {} turns ({} empty dropped)",
            context.document_id,
            context.date,
            turns.len(),
            recorded - turns.len()
        );
        Ok(turns)
    }

    /// Resolve the participant named by a "Questions Submitted" header and
    /// open the block; unattributable sections become inert report text
    fn open_questions(
        &mut self,
        line: &str,
        direction: Option<QaDirection>,
        session: &mut SessionContext,
        tracker: &mut RegionTracker<'_>,
        questions: &mut QuestionParticipants,
    ) -> Result<(), SegmentError> {
        let Some(direction) = direction else {
            debug!("Q&A header without direction, treating as report: {}", line.trim());
            tracker.open_report();
            return Ok(());
        };

        let context = excerpt(line.trim());
        let words: Vec<&str> = line.split_whitespace().collect();
        let mut candidates = match_named(&words, &session.roster);

        let participant = match candidates.len() {
            0 => {
                let confirmation = Confirmation::QuestionBlock { excerpt: context };
                if !self.disambiguator.confirm(&confirmation)? {
                    tracker.open_report();
                    return Ok(());
                }
                self.disambiguator.enter_participant(&EntryHint {
                    purpose: EntryPurpose::QuestionParticipant,
                    document_id: &session.document_id,
                    excerpt: context,
                    roster: &session.roster,
                })?
            }
            1 => candidates.swap_remove(0),
            _ => choose_candidate(&mut *self.disambiguator, context, &candidates)?,
        };

        debug!("Q&A block {:?} {}", direction, participant);
        match direction {
            QaDirection::To => questions.recipient = Some(participant),
            QaDirection::By => questions.author = Some(participant),
        }
        tracker.open_questions();
        Ok(())
    }

    /// The document's chairperson, resolved once and reused: from the
    /// session, else the persisted chair table, else the disambiguator
    fn chairperson(
        &mut self,
        session: &mut SessionContext,
        line: &str,
    ) -> Result<Participant, SegmentError> {
        if let Some(chair) = &session.chair {
            return Ok(chair.clone());
        }

        let chair = match self.store.load_chair_for(&session.document_id)? {
            Some(chair) => chair,
            None => {
                warn!("No chairperson known for {}", session.document_id);
                let chair = self.disambiguator.enter_participant(&EntryHint {
                    purpose: EntryPurpose::Chairperson,
                    document_id: &session.document_id,
                    excerpt: excerpt(line),
                    roster: &session.roster,
                })?;
                self.store.save_chair_for(&session.document_id, &chair)?;
                chair
            }
        };

        info!("Chairperson for {}: {}", session.document_id, chair);
        session.chair = Some(chair.clone());
        Ok(chair)
    }
}

/// Q&A rule: "Question." starts a turn for the author, "Answer." for the
/// recipient; anything else continues the current turn
fn attribute_question_line(
    line: &str,
    questions: &QuestionParticipants,
    accumulator: &mut EntryAccumulator<'_>,
) {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let words: Vec<&str> = tokens
        .iter()
        .map(|w| w.strip_suffix(',').unwrap_or(w))
        .collect();

    let Some((side, prompt_len)) = parse_qa_prompt(&words) else {
        accumulator.append_text(line);
        return;
    };

    let text = tokens[prompt_len..].join(" ");
    let speaker = match side {
        QaSpeaker::Author => questions.author.as_ref(),
        QaSpeaker::Recipient => questions.recipient.as_ref(),
    };
    match speaker {
        Some(participant) => accumulator.start_turn(participant, &text),
        None => accumulator.start_unattributed_turn(&text),
    }
}
