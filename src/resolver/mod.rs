pub mod rules;

pub use rules::*;

use tracing::{debug, info, warn};

use crate::disambiguator::{Confirmation, Disambiguator, EntryHint, EntryPurpose, excerpt};
use crate::error::DisambiguationError;
use crate::models::{InvalidHeading, Participant};
use crate::segment::SessionContext;

/// Where in a line the speaker's name is expected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingScope {
    /// A conventional heading at the start of the line ("Mr. Smith.")
    LineStart,
    /// Anywhere in the phrase ("Prepared Statement of Mr. Smith")
    WholePhrase,
}

/// Outcome of resolving a candidate heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The heading names `participant`; the first `consumed` tokens belong to
    /// the heading and the rest of the line is speech
    Speaker {
        participant: Participant,
        consumed: usize,
    },
    /// A human rejected the heading; its leading tokens should be remembered
    Invalid(InvalidHeading),
    /// Not a heading: treat the line as continuation text
    Abstain,
}

/// Identifies the speaker named by a short, noisy heading phrase.
///
/// Pattern rules produce candidates from the roster. Zero or several
/// candidates escalate to the disambiguator; there is never a silent
/// tie-break.
pub struct SpeakerResolver<'d> {
    disambiguator: &'d mut dyn Disambiguator,
}

impl<'d> SpeakerResolver<'d> {
    pub fn new(disambiguator: &'d mut dyn Disambiguator) -> Self {
        Self { disambiguator }
    }

    /// Resolve `heading` against the session's roster and caches.
    ///
    /// May grow the roster (promoted or manually entered speakers) and the
    /// possible-speaker cache. Rejected headings are returned, not recorded.
    pub fn resolve(
        &mut self,
        heading: &str,
        scope: HeadingScope,
        session: &mut SessionContext,
    ) -> Result<Resolution, DisambiguationError> {
        let words: Vec<&str> = heading.split_whitespace().collect();

        if !has_heading_shape(&words) {
            return Ok(Resolution::Abstain);
        }
        if session.cache.rejects(&words) {
            debug!("Skipping previously rejected heading: {}", excerpt(heading));
            return Ok(Resolution::Abstain);
        }

        let context = excerpt(heading);
        let consumed_for = |participant: &Participant| match scope {
            HeadingScope::LineStart => participant.surname_token_count() + 1,
            HeadingScope::WholePhrase => words.len() - 1,
        };

        let mut candidates = match scope {
            HeadingScope::LineStart => {
                let found = match_line_start(&words, &session.roster);
                if found.candidates.is_empty() {
                    let surname = found.surname.as_str();
                    if let Some(participant) = self.confirm_possible_speaker(context, session, |s| {
                        same_word(&s.last_name, surname)
                    })? {
                        let consumed = consumed_for(&participant);
                        return Ok(Resolution::Speaker {
                            participant,
                            consumed,
                        });
                    }
                }
                found.candidates
            }
            HeadingScope::WholePhrase => {
                let mut candidates = Vec::new();
                for word in &words {
                    let word = word.strip_suffix(',').unwrap_or(word);
                    match_surname_tail(word, &session.roster, &mut candidates);

                    if candidates.is_empty() {
                        if let Some(participant) = self.confirm_possible_speaker(
                            context,
                            session,
                            |s| same_word(s.surname_tail(), word),
                        )? {
                            let consumed = consumed_for(&participant);
                            return Ok(Resolution::Speaker {
                                participant,
                                consumed,
                            });
                        }
                    }
                }
                candidates
            }
        };

        let participant = match candidates.len() {
            0 => {
                let confirmation = Confirmation::NewSpeaker { excerpt: context };
                if !self.disambiguator.confirm(&confirmation)? {
                    return Ok(InvalidHeading::new(words.iter().take(2).copied())
                        .map_or(Resolution::Abstain, Resolution::Invalid));
                }
                let participant = self.disambiguator.enter_participant(&EntryHint {
                    purpose: EntryPurpose::Speaker,
                    document_id: &session.document_id,
                    excerpt: context,
                    roster: &session.roster,
                })?;
                info!("Admitting manually entered speaker {}", participant);
                session.admit(&participant);
                participant
            }
            1 => candidates.swap_remove(0),
            _ => choose_candidate(&mut *self.disambiguator, context, &candidates)?,
        };

        let consumed = consumed_for(&participant);
        Ok(Resolution::Speaker {
            participant,
            consumed,
        })
    }

    /// Offer cached off-roster speakers selected by `is_match`; the first one
    /// confirmed joins the roster
    fn confirm_possible_speaker(
        &mut self,
        context: &str,
        session: &mut SessionContext,
        is_match: impl Fn(&Participant) -> bool,
    ) -> Result<Option<Participant>, DisambiguationError> {
        let offers: Vec<Participant> = session
            .cache
            .possible_speakers()
            .iter()
            .filter(|s| is_match(s))
            .cloned()
            .collect();

        for candidate in offers {
            let confirmation = Confirmation::PossibleSpeaker {
                candidate: &candidate,
                excerpt: context,
            };
            if self.disambiguator.confirm(&confirmation)? {
                info!("Promoting possible speaker {} to the roster", candidate);
                session.promote(&candidate);
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }
}

/// Ask the disambiguator to pick one of several candidates, re-asking until
/// the selection is in range
pub fn choose_candidate(
    disambiguator: &mut dyn Disambiguator,
    context: &str,
    candidates: &[Participant],
) -> Result<Participant, DisambiguationError> {
    loop {
        let index = disambiguator.choose_one(context, candidates)?;
        match candidates.get(index) {
            Some(chosen) => return Ok(chosen.clone()),
            None => warn!(
                "Selection {} is out of range for {} candidates, asking again",
                index,
                candidates.len()
            ),
        }
    }
}
