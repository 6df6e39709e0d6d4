use crate::models::{HeuristicCache, Participant};

/// Mutable state threaded through every step of a scan.
///
/// The heuristic cache lives for the whole batch; the roster and chairperson
/// are replaced at the start of each document.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub document_id: String,
    /// Known participants of the current document; only ever grows
    pub roster: Vec<Participant>,
    /// Chairperson of the current document, once known
    pub chair: Option<Participant>,
    pub cache: HeuristicCache,
}

impl SessionContext {
    pub fn new(cache: HeuristicCache) -> Self {
        Self {
            cache,
            ..Default::default()
        }
    }

    /// Switch to a new document, keeping the learned cache
    pub fn begin_document(
        &mut self,
        document_id: impl Into<String>,
        roster: Vec<Participant>,
        chair: Option<Participant>,
    ) {
        self.document_id = document_id.into();
        self.roster = roster;
        self.chair = chair;
    }

    /// Add a participant to the roster unless one with the same full name is
    /// already present
    pub fn promote(&mut self, participant: &Participant) -> bool {
        if self
            .roster
            .iter()
            .any(|p| p.full_name == participant.full_name)
        {
            return false;
        }
        self.roster.push(participant.clone());
        true
    }

    /// Admit a manually entered speaker: new names join both the roster and
    /// the cross-document possible speakers
    pub fn admit(&mut self, participant: &Participant) {
        if self.promote(participant) {
            self.cache.learn_possible_speaker(participant.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admit_merges_by_full_name() {
        let roster = vec![Participant::member("Smith, Adam", "Smith", "WA")];
        let mut session = SessionContext::default();
        session.begin_document("CHRG-1", roster, None);

        session.admit(&Participant::member("Smith, Adam", "Smith", "WA"));
        assert_eq!(session.roster.len(), 1);
        assert!(session.cache.possible_speakers().is_empty());

        session.admit(&Participant::witness("Washington, Kelly", "Washington"));
        assert_eq!(session.roster.len(), 2);
        assert_eq!(session.cache.possible_speakers().len(), 1);
    }

    #[test]
    fn test_begin_document_keeps_cache() {
        let mut session = SessionContext::default();
        session.begin_document("CHRG-1", vec![], None);
        session.admit(&Participant::witness("Washington, Kelly", "Washington"));

        session.begin_document("CHRG-2", vec![], None);
        assert!(session.roster.is_empty());
        assert_eq!(session.cache.possible_speakers().len(), 1);
        assert_eq!(session.document_id, "CHRG-2");
    }
}
