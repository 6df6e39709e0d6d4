use std::fmt;

use super::participant::Participant;

/// Leading tokens of a heading that a human rejected as "not a new speaker"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvalidHeading(Vec<String>);

impl InvalidHeading {
    /// Build from the leading tokens of a rejected line. Returns `None` unless
    /// at least two tokens are given.
    pub fn new<I, S>(tokens: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        (tokens.len() >= 2).then_some(Self(tokens))
    }

    /// Parse one persisted line of space-separated tokens
    pub fn parse(line: &str) -> Option<Self> {
        Self::new(line.split_whitespace())
    }

    /// Whether a line beginning with `words` repeats this rejected heading.
    ///
    /// The first two tokens must match exactly; further stored tokens are
    /// only compared while the line still has tokens to compare against.
    pub fn matches(&self, words: &[&str]) -> bool {
        if words.len() < 2 {
            return false;
        }
        self.0
            .iter()
            .zip(words.iter())
            .all(|(stored, word)| stored == word)
    }
}

impl fmt::Display for InvalidHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Learned, cross-document heuristics.
///
/// Both sets are append-only: entries are never evicted, so reusing the cache
/// across a sequence of documents is idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeuristicCache {
    possible_speakers: Vec<Participant>,
    invalid_headings: Vec<InvalidHeading>,
}

impl HeuristicCache {
    pub fn new(possible_speakers: Vec<Participant>, invalid_headings: Vec<InvalidHeading>) -> Self {
        let mut cache = Self::default();
        for speaker in possible_speakers {
            cache.learn_possible_speaker(speaker);
        }
        for heading in invalid_headings {
            cache.learn_invalid_heading(heading);
        }
        cache
    }

    /// Confirmed speakers absent from their document's roster
    pub fn possible_speakers(&self) -> &[Participant] {
        &self.possible_speakers
    }

    /// Rejected heading prefixes
    pub fn invalid_headings(&self) -> &[InvalidHeading] {
        &self.invalid_headings
    }

    /// Record an off-roster speaker. Returns false if one with the same full
    /// name is already known.
    pub fn learn_possible_speaker(&mut self, speaker: Participant) -> bool {
        if self
            .possible_speakers
            .iter()
            .any(|s| s.full_name == speaker.full_name)
        {
            return false;
        }
        self.possible_speakers.push(speaker);
        true
    }

    /// Record a rejected heading. Returns false if already present.
    pub fn learn_invalid_heading(&mut self, heading: InvalidHeading) -> bool {
        if self.invalid_headings.contains(&heading) {
            return false;
        }
        self.invalid_headings.push(heading);
        true
    }

    /// Whether the leading tokens of a line repeat a rejected heading
    pub fn rejects(&self, words: &[&str]) -> bool {
        self.invalid_headings.iter().any(|h| h.matches(words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_heading_two_tokens() {
        let heading = InvalidHeading::parse("Mr. Chairman.").unwrap();
        assert!(heading.matches(&["Mr.", "Chairman.", "I", "yield."]));
        assert!(!heading.matches(&["Mr.", "Smith.", "I", "yield."]));
        assert!(!heading.matches(&["Mr."]));
    }

    #[test]
    fn test_invalid_heading_three_tokens() {
        let heading = InvalidHeading::parse("In the U.S.").unwrap();
        assert!(heading.matches(&["In", "the", "U.S.", "we"]));
        assert!(!heading.matches(&["In", "the", "end."]));
        // A two-token line only has two tokens to compare
        assert!(heading.matches(&["In", "the"]));
    }

    #[test]
    fn test_invalid_heading_needs_two_tokens() {
        assert!(InvalidHeading::parse("Hello").is_none());
        assert!(InvalidHeading::parse("").is_none());
    }

    #[test]
    fn test_cache_is_append_only_and_deduplicated() {
        let mut cache = HeuristicCache::default();
        let clerk = Participant::witness("Washington, Kelly", "Washington");

        assert!(cache.learn_possible_speaker(clerk.clone()));
        assert!(!cache.learn_possible_speaker(clerk));
        assert_eq!(cache.possible_speakers().len(), 1);

        let heading = InvalidHeading::parse("Mr. Chairman.").unwrap();
        assert!(cache.learn_invalid_heading(heading.clone()));
        assert!(!cache.learn_invalid_heading(heading));
        assert_eq!(cache.invalid_headings().len(), 1);
        assert!(cache.rejects(&["Mr.", "Chairman.", "thank", "you"]));
    }
}
