pub mod interactive;
pub mod scripted;

pub use interactive::*;
pub use scripted::*;

use crate::error::DisambiguationError;
use crate::models::Participant;

/// Maximum characters of transcript context shown alongside a prompt
pub const EXCERPT_CHARS: usize = 200;

/// A yes/no decision the engine needs from outside
#[derive(Debug, Clone, Copy)]
pub enum Confirmation<'a> {
    /// Is this cached off-roster speaker the one the heading names?
    PossibleSpeaker {
        candidate: &'a Participant,
        excerpt: &'a str,
    },
    /// No participant matched; is the line really a new speaker?
    NewSpeaker { excerpt: &'a str },
    /// No participant matched a "Questions Submitted" header; is it really
    /// the start of a question-and-answer block?
    QuestionBlock { excerpt: &'a str },
}

/// The kind of a [`Confirmation`], without its borrowed context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    PossibleSpeaker,
    NewSpeaker,
    QuestionBlock,
}

impl Confirmation<'_> {
    pub fn kind(&self) -> ConfirmKind {
        match self {
            Confirmation::PossibleSpeaker { .. } => ConfirmKind::PossibleSpeaker,
            Confirmation::NewSpeaker { .. } => ConfirmKind::NewSpeaker,
            Confirmation::QuestionBlock { .. } => ConfirmKind::QuestionBlock,
        }
    }

    /// The question put to the user
    pub fn question(&self) -> &'static str {
        match self {
            Confirmation::PossibleSpeaker { .. } => "Is this the correct speaker?",
            Confirmation::NewSpeaker { .. } => "Is this actually a new speaker?",
            Confirmation::QuestionBlock { .. } => "Is this the start of a Q&A?",
        }
    }

    pub fn excerpt(&self) -> &str {
        match self {
            Confirmation::PossibleSpeaker { excerpt, .. }
            | Confirmation::NewSpeaker { excerpt }
            | Confirmation::QuestionBlock { excerpt } => excerpt,
        }
    }
}

/// Why a participant must be entered by hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPurpose {
    /// A heading confirmed as a new speaker matched nobody
    Speaker,
    /// A chair alias was used but the document's chairperson is unknown
    Chairperson,
    /// A Q&A header names nobody on the roster
    QuestionParticipant,
}

/// Context handed to [`Disambiguator::enter_participant`]
#[derive(Debug, Clone, Copy)]
pub struct EntryHint<'a> {
    pub purpose: EntryPurpose,
    pub document_id: &'a str,
    pub excerpt: &'a str,
    /// Current roster, so an entry can be matched to an existing participant
    pub roster: &'a [Participant],
}

/// External decision-maker consulted when heuristics are inconclusive.
///
/// Interactive in production, scripted in tests. The engine itself stays
/// synchronous and deterministic for a fixed sequence of answers.
pub trait Disambiguator {
    /// Answer a yes/no question
    fn confirm(&mut self, confirmation: &Confirmation<'_>) -> Result<bool, DisambiguationError>;

    /// Pick one of `candidates` for the heading in `excerpt`; returns a
    /// zero-based index. Out-of-range answers are re-asked by the caller.
    fn choose_one(
        &mut self,
        excerpt: &str,
        candidates: &[Participant],
    ) -> Result<usize, DisambiguationError>;

    /// Obtain a participant that is not (yet) on the roster
    fn enter_participant(&mut self, hint: &EntryHint<'_>)
    -> Result<Participant, DisambiguationError>;
}

/// Shorten a line to the context shown in prompts
pub fn excerpt(line: &str) -> &str {
    match line.char_indices().nth(EXCERPT_CHARS) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let long = "é".repeat(EXCERPT_CHARS + 10);
        assert_eq!(excerpt(&long).chars().count(), EXCERPT_CHARS);
        assert_eq!(excerpt("short"), "short");
    }
}
