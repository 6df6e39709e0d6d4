use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::participant::{Participant, Role};

/// Descriptive metadata of one hearing document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub document_id: String,
    pub congress: String,
    pub committee: String,
    #[serde(default)]
    pub subcommittee: String,
    pub title: String,
    /// Days on which the hearing was held, in document order
    pub dates: Vec<NaiveDate>,
}

impl DocumentMetadata {
    /// Context shared by every turn recorded on the given hearing day
    pub fn context_for(&self, date: NaiveDate) -> TurnContext {
        TurnContext {
            document_id: self.document_id.clone(),
            congress: self.congress.clone(),
            committee: self.committee.clone(),
            subcommittee: self.subcommittee.clone(),
            title: self.title.clone(),
            date,
        }
    }
}

/// Document-level fields copied onto each speech turn of one hearing day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnContext {
    pub document_id: String,
    pub congress: String,
    pub committee: String,
    pub subcommittee: String,
    pub title: String,
    pub date: NaiveDate,
}

/// One continuous block of speech attributed to a single speaker.
///
/// Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechTurn {
    #[serde(rename = "document")]
    pub document_id: String,
    pub congress: String,
    pub committee: String,
    pub subcommittee: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "name")]
    pub speaker_name: String,
    #[serde(rename = "state")]
    pub speaker_state: String,
    /// `None` when the speaker could not be attributed (e.g. an answer whose
    /// recipient was never named)
    #[serde(rename = "role")]
    pub speaker_role: Option<Role>,
    pub text: String,
}

impl SpeechTurn {
    /// Start a turn for a known participant
    pub fn new(context: &TurnContext, speaker: &Participant) -> Self {
        Self::with_speaker(
            context,
            speaker.full_name.clone(),
            speaker.state_code.clone(),
            Some(speaker.role),
        )
    }

    /// Start a turn whose speaker is unknown
    pub fn unattributed(context: &TurnContext) -> Self {
        Self::with_speaker(context, String::new(), String::new(), None)
    }

    fn with_speaker(
        context: &TurnContext,
        speaker_name: String,
        speaker_state: String,
        speaker_role: Option<Role>,
    ) -> Self {
        Self {
            document_id: context.document_id.clone(),
            congress: context.congress.clone(),
            committee: context.committee.clone(),
            subcommittee: context.subcommittee.clone(),
            title: context.title.clone(),
            date: context.date,
            speaker_name,
            speaker_state,
            speaker_role,
            text: String::new(),
        }
    }

    /// Append a fragment of speech, separated by a single space
    pub fn append_text(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(fragment);
    }

    /// Whether the turn carries no actual speech
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> TurnContext {
        DocumentMetadata {
            document_id: "CHRG-115hhrg33477".to_string(),
            congress: "115".to_string(),
            committee: "Natural Resources".to_string(),
            subcommittee: String::new(),
            title: "Oversight Hearing".to_string(),
            dates: vec![],
        }
        .context_for(NaiveDate::from_ymd_opt(2017, 3, 7).unwrap())
    }

    #[test]
    fn test_append_text_joins_with_single_space() {
        let speaker = Participant::member("Smith, Adam", "Smith", "WA");
        let mut turn = SpeechTurn::new(&context(), &speaker);
        turn.append_text("Thank you.");
        turn.append_text("  I yield back. ");
        turn.append_text("   ");

        assert_eq!(turn.text, "Thank you. I yield back.");
        assert_eq!(turn.speaker_state, "WA");
        assert_eq!(turn.speaker_role, Some(Role::Member));
    }

    #[test]
    fn test_unattributed_turn() {
        let turn = SpeechTurn::unattributed(&context());
        assert!(turn.is_blank());
        assert_eq!(turn.speaker_role, None);
        assert_eq!(turn.document_id, "CHRG-115hhrg33477");
    }
}
