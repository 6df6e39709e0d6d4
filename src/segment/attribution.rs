use tracing::debug;

use super::accumulator::EntryAccumulator;
use super::classifier::LineKind;
use super::session::SessionContext;
use super::Segmenter;
use crate::error::SegmentError;
use crate::resolver::{HeadingScope, Resolution, SpeakerResolver, same_word};

impl Segmenter<'_> {
    /// Normal-region rule for one body line
    pub(super) fn attribute(
        &mut self,
        line: &str,
        kind: LineKind,
        session: &mut SessionContext,
        accumulator: &mut EntryAccumulator<'_>,
    ) -> Result<(), SegmentError> {
        match kind {
            LineKind::Blank => return Ok(()),
            LineKind::Heading => {}
            _ => {
                accumulator.append_text(line);
                return Ok(());
            }
        }

        let words: Vec<&str> = line.split_whitespace().collect();

        if let Some(consumed) = alias_len(&words, &self.config.chair_aliases) {
            let chair = self.chairperson(session, line)?;
            accumulator.start_turn(&chair, &words[consumed..].join(" "));
            return Ok(());
        }
        if alias_len(&words, &self.config.clerk_aliases).is_some() {
            debug!("Discarding clerk reading: {}", line.trim());
            accumulator.suppress();
            return Ok(());
        }

        let scope = if words
            .iter()
            .take(2)
            .any(|w| same_word(w, &self.config.statement_token))
        {
            HeadingScope::WholePhrase
        } else {
            HeadingScope::LineStart
        };

        let resolution = SpeakerResolver::new(&mut *self.disambiguator).resolve(line, scope, session)?;
        match resolution {
            Resolution::Speaker {
                participant,
                consumed,
            } => {
                let rest = words.get(consumed..).unwrap_or_default();
                accumulator.start_turn(&participant, &rest.join(" "));
            }
            Resolution::Invalid(heading) => {
                debug!("Remembering invalid heading '{}'", heading);
                session.cache.learn_invalid_heading(heading);
                append_plain(line, accumulator);
            }
            Resolution::Abstain => append_plain(line, accumulator),
        }
        Ok(())
    }
}

/// Token count of the first alias that prefixes `words`, compared
/// case-insensitively token by token
fn alias_len(words: &[&str], aliases: &[String]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        let tokens: Vec<&str> = alias.split_whitespace().collect();
        let matched = !tokens.is_empty()
            && words.len() >= tokens.len()
            && tokens.iter().zip(words).all(|(a, w)| same_word(a, w));
        matched.then_some(tokens.len())
    })
}

/// Append a non-heading line as speech, without asides; all-caps lines are
/// section titles and dropped
fn append_plain(line: &str, accumulator: &mut EntryAccumulator<'_>) {
    let text = strip_asides(line);
    if is_all_caps(&text) {
        debug!("Dropping section title: {}", text);
        return;
    }
    accumulator.append_text(&text);
}

/// Delete `[...]` asides and `<...>` tags, repeating until none remain.
/// Each removed span becomes one space and runs of whitespace collapse.
pub fn strip_asides(line: &str) -> String {
    let mut text = line.to_string();
    loop {
        let Some(span) = find_span(&text, '[', ']').or_else(|| find_span(&text, '<', '>')) else {
            break;
        };
        text.replace_range(span, " ");
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Byte range of the first `open ... close` pair
fn find_span(text: &str, open: char, close: char) -> Option<std::ops::Range<usize>> {
    let start = text.find(open)?;
    let end = text[start..].find(close)? + start + close.len_utf8();
    Some(start..end)
}

/// Whether the text has letters and none of them are lowercase
pub fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_asides() {
        assert_eq!(strip_asides("Thank you. [Laughter.] Next."), "Thank you. Next.");
        assert_eq!(strip_asides("We are <i>here</i> today"), "We are here today");
        assert_eq!(strip_asides("[Nested [aside]] remains]"), "] remains]");
        assert_eq!(strip_asides("Unclosed [aside"), "Unclosed [aside");
    }

    #[test]
    fn test_strip_asides_is_idempotent() {
        for line in [
            "A ] stray [bracket] pair",
            "Text <b>bold [x]</b> end",
            "  spaced   out [.] words ",
            "] [",
        ] {
            let once = strip_asides(line);
            assert_eq!(strip_asides(&once), once, "line: {line}");
        }
    }

    #[test]
    fn test_is_all_caps() {
        assert!(is_all_caps("OPENING STATEMENT OF HON. JOHN DOE"));
        assert!(!is_all_caps("Opening statement"));
        assert!(!is_all_caps(""));
        assert!(!is_all_caps("2021 -- 42"));
    }

    #[test]
    fn test_alias_len() {
        let aliases = vec!["The Chairman.".to_string(), "The Chair.".to_string()];
        assert_eq!(alias_len(&["THE", "CHAIR.", "Thanks."], &aliases), Some(2));
        assert_eq!(alias_len(&["The", "Chairwoman.", "Thanks."], &aliases), None);
        assert_eq!(alias_len(&["The"], &aliases), None);
    }
}
