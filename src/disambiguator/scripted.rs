use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConfirmKind, Confirmation, Disambiguator, EntryHint, EntryPurpose};
use crate::error::{DisambiguationError, StoreError};
use crate::models::Participant;

/// One pre-recorded answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptedAnswer {
    Confirm { value: bool },
    Choose { index: usize },
    Enter { participant: Participant },
}

impl ScriptedAnswer {
    fn label(&self) -> &'static str {
        match self {
            ScriptedAnswer::Confirm { .. } => "confirm",
            ScriptedAnswer::Choose { .. } => "choose",
            ScriptedAnswer::Enter { .. } => "enter",
        }
    }
}

/// A call the engine made, as recorded by [`ScriptedDisambiguator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Confirm(ConfirmKind),
    ChooseOne { candidates: usize },
    EnterParticipant(EntryPurpose),
}

/// Deterministic disambiguator replaying a fixed sequence of answers.
///
/// Used as the test double and for non-interactive replays of a batch
/// (`--answers`). Running out of answers is an error, which makes any
/// unexpected call visible.
#[derive(Debug, Default)]
pub struct ScriptedDisambiguator {
    answers: VecDeque<ScriptedAnswer>,
    calls: Vec<RecordedCall>,
}

impl ScriptedDisambiguator {
    pub fn new(answers: impl IntoIterator<Item = ScriptedAnswer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            calls: Vec::new(),
        }
    }

    /// Load answers from a JSON array file
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        let answers: Vec<ScriptedAnswer> =
            serde_json::from_str(&content).map_err(|e| StoreError::json(path, e))?;
        Ok(Self::new(answers))
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Answers not yet consumed
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, call: &'static str) -> Result<ScriptedAnswer, DisambiguationError> {
        let answer = self
            .answers
            .pop_front()
            .ok_or(DisambiguationError::ScriptExhausted { call })?;
        debug!("Scripted {} answer: {:?}", call, answer);
        Ok(answer)
    }
}

impl Disambiguator for ScriptedDisambiguator {
    fn confirm(&mut self, confirmation: &Confirmation<'_>) -> Result<bool, DisambiguationError> {
        self.calls.push(RecordedCall::Confirm(confirmation.kind()));
        match self.next_answer("confirm")? {
            ScriptedAnswer::Confirm { value } => Ok(value),
            other => Err(DisambiguationError::ScriptMismatch {
                call: "confirm",
                found: other.label(),
            }),
        }
    }

    fn choose_one(
        &mut self,
        _excerpt: &str,
        candidates: &[Participant],
    ) -> Result<usize, DisambiguationError> {
        self.calls.push(RecordedCall::ChooseOne {
            candidates: candidates.len(),
        });
        match self.next_answer("choose")? {
            ScriptedAnswer::Choose { index } => Ok(index),
            other => Err(DisambiguationError::ScriptMismatch {
                call: "choose",
                found: other.label(),
            }),
        }
    }

    fn enter_participant(
        &mut self,
        hint: &EntryHint<'_>,
    ) -> Result<Participant, DisambiguationError> {
        self.calls.push(RecordedCall::EnterParticipant(hint.purpose));
        match self.next_answer("enter")? {
            ScriptedAnswer::Enter { participant } => Ok(participant),
            other => Err(DisambiguationError::ScriptMismatch {
                call: "enter",
                found: other.label(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_from_json() {
        let json = r#"[
            {"kind": "confirm", "value": true},
            {"kind": "choose", "index": 1},
            {"kind": "enter", "participant": {"name": "Doe, Jane", "role": "witness", "last_name": "Doe"}}
        ]"#;
        let answers: Vec<ScriptedAnswer> = serde_json::from_str(json).unwrap();
        let mut d = ScriptedDisambiguator::new(answers);

        let confirmation = Confirmation::NewSpeaker { excerpt: "x" };
        assert!(d.confirm(&confirmation).unwrap());
        assert_eq!(d.choose_one("x", &[]).unwrap(), 1);
        assert_eq!(d.remaining(), 1);
        assert_eq!(
            d.calls(),
            &[
                RecordedCall::Confirm(ConfirmKind::NewSpeaker),
                RecordedCall::ChooseOne { candidates: 0 },
            ]
        );
    }

    #[test]
    fn test_exhausted_and_mismatched_answers() {
        let mut d = ScriptedDisambiguator::new([ScriptedAnswer::Choose { index: 0 }]);
        let confirmation = Confirmation::QuestionBlock { excerpt: "x" };

        assert!(matches!(
            d.confirm(&confirmation),
            Err(DisambiguationError::ScriptMismatch { call: "confirm", found: "choose" })
        ));
        assert!(matches!(
            d.confirm(&confirmation),
            Err(DisambiguationError::ScriptExhausted { call: "confirm" })
        ));
    }
}
