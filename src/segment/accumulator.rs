use crate::models::{Participant, SpeechTurn, TurnContext};

/// Ordered list of speech turns being built for one hearing day.
///
/// Text arriving before the first recognised speaker, or after a clerk
/// heading, is dropped until the next turn starts.
#[derive(Debug)]
pub struct EntryAccumulator<'a> {
    context: &'a TurnContext,
    turns: Vec<SpeechTurn>,
    discarding: bool,
}

impl<'a> EntryAccumulator<'a> {
    pub fn new(context: &'a TurnContext) -> Self {
        Self {
            context,
            turns: Vec::new(),
            discarding: true,
        }
    }

    /// Begin a new turn for `speaker`, seeded with `leading_text`
    pub fn start_turn(&mut self, speaker: &Participant, leading_text: &str) {
        self.push(SpeechTurn::new(self.context, speaker), leading_text);
    }

    /// Begin a new turn whose speaker is unknown
    pub fn start_unattributed_turn(&mut self, leading_text: &str) {
        self.push(SpeechTurn::unattributed(self.context), leading_text);
    }

    fn push(&mut self, mut turn: SpeechTurn, leading_text: &str) {
        self.discarding = false;
        turn.append_text(leading_text);
        self.turns.push(turn);
    }

    /// Append text to the most recent turn unless accumulation is suppressed
    pub fn append_text(&mut self, text: &str) {
        if self.discarding {
            return;
        }
        if let Some(turn) = self.turns.last_mut() {
            turn.append_text(text);
        }
    }

    /// Drop all text until the next turn starts
    pub fn suppress(&mut self) {
        self.discarding = true;
    }

    pub fn is_suppressed(&self) -> bool {
        self.discarding
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Finish the day: drop turns without real speech and return the rest in
    /// insertion order
    pub fn finalize(self) -> Vec<SpeechTurn> {
        self.turns
            .into_iter()
            .filter(|turn| !turn.is_blank())
            .collect()
    }
}
