use tracing::debug;

use super::RegionMarkers;
use super::classifier::{Delimiter, LineKind, QaDirection, body_kind, classify};

/// Transcript zone active at a given line. Regions never nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    Normal,
    /// Source citation, delimited by dash rules
    Source,
    /// Embedded report, from the marker phrase to an underscore run
    Report,
    /// Questions and answers submitted for the record
    QuestionBlock,
}

/// What the scan should do with one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStep {
    /// Delimiter, region content, or boilerplate: not attributed
    Suppressed,
    /// A "Questions Submitted" header; the caller resolves the named
    /// participant and then opens the block via [`RegionTracker::open_questions`]
    /// or [`RegionTracker::open_report`]
    QuestionsHeader(Option<QaDirection>),
    /// A line inside a Q&A block
    QuestionLine,
    /// A line for normal attribution
    Body(LineKind),
}

/// Tracks the active region across a linear scan
#[derive(Debug)]
pub struct RegionTracker<'a> {
    markers: &'a RegionMarkers,
    region: Region,
    skip_next: bool,
}

impl<'a> RegionTracker<'a> {
    pub fn new(markers: &'a RegionMarkers) -> Self {
        Self {
            markers,
            region: Region::Normal,
            skip_next: false,
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Consume the next line in document order
    pub fn advance(&mut self, line: &str) -> LineStep {
        // The line after a closed source block is boilerplate
        if self.skip_next {
            self.skip_next = false;
            return LineStep::Suppressed;
        }

        let kind = classify(line, self.region, self.markers);

        match kind {
            LineKind::Delimiter(Delimiter::SourceRule) => {
                match self.region {
                    Region::Source => {
                        self.region = Region::Normal;
                        self.skip_next = true;
                    }
                    Region::Normal => self.region = Region::Source,
                    // Rules inside reports and Q&A belong to the block
                    Region::Report | Region::QuestionBlock => {}
                }
                return LineStep::Suppressed;
            }
            LineKind::SourceContent => return LineStep::Suppressed,
            _ => {}
        }

        if self.region == Region::Source {
            debug!("Source block ended without a closing rule at: {}", line.trim());
            self.region = Region::Normal;
        }

        match kind {
            LineKind::Delimiter(Delimiter::ReportOpen) => {
                self.region = Region::Report;
                LineStep::Suppressed
            }
            LineKind::Delimiter(Delimiter::BlockClose) => match self.region {
                Region::Report | Region::QuestionBlock => {
                    self.region = Region::Normal;
                    LineStep::Suppressed
                }
                _ if line.trim().chars().all(|c| c == '_') => LineStep::Suppressed,
                _ => LineStep::Body(body_kind(line)),
            },
            _ if self.region == Region::Report => LineStep::Suppressed,
            LineKind::Delimiter(Delimiter::QuestionsSubmitted(direction)) => {
                LineStep::QuestionsHeader(direction)
            }
            LineKind::Blank if self.region == Region::QuestionBlock => LineStep::Suppressed,
            _ if self.region == Region::QuestionBlock => LineStep::QuestionLine,
            kind => LineStep::Body(kind),
        }
    }

    /// Enter a Q&A block after its header resolved
    pub fn open_questions(&mut self) {
        self.region = Region::QuestionBlock;
    }

    /// Treat the following section as inert report text
    pub fn open_report(&mut self) {
        self.region = Region::Report;
    }
}

/// Who speaks a Q&A line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QaSpeaker {
    Author,
    Recipient,
}

/// Recognise "Question." / "Question <honorific>." / "Answer." at the start
/// of a Q&A line. Returns the speaker side and the number of prompt tokens.
pub fn parse_qa_prompt(words: &[&str]) -> Option<(QaSpeaker, usize)> {
    match words {
        ["Question.", ..] => Some((QaSpeaker::Author, 1)),
        ["Question", honorific, ..] if honorific.ends_with('.') => Some((QaSpeaker::Author, 2)),
        ["Answer.", ..] => Some((QaSpeaker::Recipient, 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(lines: &[&str]) -> Vec<LineStep> {
        let markers = RegionMarkers::default();
        let mut tracker = RegionTracker::new(&markers);
        lines.iter().map(|line| tracker.advance(line)).collect()
    }

    #[test]
    fn test_source_block_and_following_line_suppressed() {
        let rule = "-".repeat(24);
        let result = steps(&[
            &rule,
            r"\\ Department of Energy report",
            &rule,
            "Boilerplate after the citation",
            "Mr. Smith. Thank you.",
        ]);

        assert_eq!(
            result,
            vec![
                LineStep::Suppressed,
                LineStep::Suppressed,
                LineStep::Suppressed,
                LineStep::Suppressed,
                LineStep::Body(LineKind::Heading),
            ]
        );
    }

    #[test]
    fn test_source_block_ends_without_rule() {
        let rule = "-".repeat(20);
        let markers = RegionMarkers::default();
        let mut tracker = RegionTracker::new(&markers);

        assert_eq!(tracker.advance(&rule), LineStep::Suppressed);
        assert_eq!(tracker.region(), Region::Source);
        assert_eq!(tracker.advance(r"\\ cited text"), LineStep::Suppressed);
        assert_eq!(
            tracker.advance("the hearing resumed"),
            LineStep::Body(LineKind::Continuation)
        );
        assert_eq!(tracker.region(), Region::Normal);
    }

    #[test]
    fn test_report_block() {
        let result = steps(&[
            "Mr. Smith. I will provide that.",
            "[The information follows:]",
            "The Department spent $4 million.",
            "______",
            "Mr. Jones. Thank you.",
        ]);

        assert_eq!(
            result,
            vec![
                LineStep::Body(LineKind::Heading),
                LineStep::Suppressed,
                LineStep::Suppressed,
                LineStep::Suppressed,
                LineStep::Body(LineKind::Heading),
            ]
        );
    }

    #[test]
    fn test_question_block_lines() {
        let markers = RegionMarkers::default();
        let mut tracker = RegionTracker::new(&markers);

        assert_eq!(
            tracker.advance("Questions Submitted by Mr. Smith"),
            LineStep::QuestionsHeader(Some(QaDirection::By))
        );
        tracker.open_questions();
        assert_eq!(tracker.advance("Question. Why?"), LineStep::QuestionLine);
        assert_eq!(tracker.advance(""), LineStep::Suppressed);
        assert_eq!(tracker.advance("______"), LineStep::Suppressed);
        assert_eq!(tracker.region(), Region::Normal);
    }

    #[test]
    fn test_underscores_in_speech_are_not_delimiters() {
        let result = steps(&["Mr. Smith. Fill in the ______ form."]);
        assert_eq!(result, vec![LineStep::Body(LineKind::Heading)]);
    }

    #[test]
    fn test_parse_qa_prompt() {
        assert_eq!(
            parse_qa_prompt(&["Question.", "Why?"]),
            Some((QaSpeaker::Author, 1))
        );
        assert_eq!(
            parse_qa_prompt(&["Question", "1.", "Why?"]),
            Some((QaSpeaker::Author, 2))
        );
        assert_eq!(
            parse_qa_prompt(&["Answer.", "Because."]),
            Some((QaSpeaker::Recipient, 1))
        );
        assert_eq!(parse_qa_prompt(&["Question"]), None);
        assert_eq!(parse_qa_prompt(&["The", "answer."]), None);
    }
}
