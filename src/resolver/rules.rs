use crate::models::Participant;

/// Case-insensitive token comparison
pub fn same_word(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn strip_period(word: &str) -> &str {
    word.strip_suffix('.').unwrap_or(word)
}

fn push_unique(candidates: &mut Vec<Participant>, participant: &Participant) {
    if !candidates.contains(participant) {
        candidates.push(participant.clone());
    }
}

/// Whether the leading tokens have the "Mr. Smith." / "Chairman Jones." shape:
/// more than three tokens, one of tokens 2-4 ending in a period
pub fn has_heading_shape(words: &[&str]) -> bool {
    words.len() > 3 && words[1..4].iter().any(|w| w.ends_with('.'))
}

/// Outcome of the line-start rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStartMatch {
    /// Surname as written in the heading; empty when no rule applied
    pub surname: String,
    pub candidates: Vec<Participant>,
}

/// Apply the line-start rules in order; the first rule whose shape fits
/// decides, even when it yields no candidates.
///
/// 1. `<Title> <Surname>.` or `<Title> <Surname> [aside].`: surname against
///    every last name and against the final token of multi-token last names.
/// 2. `<Title> <Two> <Tokens>.`: the concatenated surname, falling back to
///    the second token alone.
/// 3. `<Title> <Surname> of <State>`: surname and state name together.
pub fn match_line_start(words: &[&str], roster: &[Participant]) -> LineStartMatch {
    let mut result = LineStartMatch::default();
    if words.len() < 4 {
        return result;
    }

    let bracketed_aside = words[2].starts_with('[') && words[2].ends_with("].");

    if words[1].ends_with('.') || bracketed_aside {
        let surname = strip_period(words[1]);
        for participant in roster {
            if same_word(&participant.last_name, surname)
                || (participant.surname_token_count() > 1
                    && same_word(participant.surname_tail(), surname))
            {
                push_unique(&mut result.candidates, participant);
            }
        }
        result.surname = surname.to_string();
    } else if words[2].ends_with('.') {
        let second = strip_period(words[2]);
        let surname = format!("{} {}", words[1], second);
        for participant in roster {
            if same_word(&participant.last_name, &surname) {
                push_unique(&mut result.candidates, participant);
            }
        }
        if result.candidates.is_empty() {
            for participant in roster {
                if same_word(&participant.last_name, second) {
                    push_unique(&mut result.candidates, participant);
                }
            }
        }
        result.surname = surname;
    } else if words[2] == "of" {
        let surname = words[1];
        for participant in roster {
            if same_word(&participant.last_name, surname) && names_state(&words[3..], participant) {
                push_unique(&mut result.candidates, participant);
            }
        }
        result.surname = surname.to_string();
    }

    result
}

/// Whether `words` begin with the participant's (possibly multi-word) state
fn names_state(words: &[&str], participant: &Participant) -> bool {
    let len = participant.state_name.split_whitespace().count();
    if len == 0 {
        return false;
    }
    match words.get(..len) {
        Some(written) => {
            let written = written.join(" ");
            same_word(written.trim_end_matches(['.', ',']), &participant.state_name)
        }
        None => false,
    }
}

/// Add every participant whose surname tail equals `word`
pub fn match_surname_tail(word: &str, roster: &[Participant], candidates: &mut Vec<Participant>) {
    for participant in roster {
        if same_word(participant.surname_tail(), word) {
            push_unique(candidates, participant);
        }
    }
}

/// Participants all of whose surname tokens appear among `words`; used for
/// the participant named in a "Questions Submitted" header
pub fn match_named(words: &[&str], roster: &[Participant]) -> Vec<Participant> {
    let words: Vec<&str> = words
        .iter()
        .map(|w| w.trim_end_matches([',', '.']))
        .collect();

    let mut candidates = Vec::new();
    for participant in roster {
        let mut tokens = participant.surname_tokens().peekable();
        if tokens.peek().is_none() {
            continue;
        }
        if tokens.all(|t| words.iter().any(|w| same_word(w, t))) {
            push_unique(&mut candidates, participant);
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Participant> {
        vec![
            Participant::member("Smith, Adam", "Smith", "WA"),
            Participant::member("Van Buren, Martin", "Van Buren", "NY"),
            Participant::member("Buren, Ann", "Buren", "OH"),
            Participant::member("Jones, Walter", "Jones", "NC"),
            Participant::witness("Jones, Pat", "Jones"),
        ]
    }

    fn split(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    #[test]
    fn test_heading_shape() {
        assert!(has_heading_shape(&split("Mr. Smith. Thank you.")));
        assert!(has_heading_shape(&split("Mr. Smith of Texas. Thanks")));
        assert!(!has_heading_shape(&split("Mr. Smith. Thanks")));
        assert!(!has_heading_shape(&split("I want to thank everyone here today")));
    }

    #[test]
    fn test_rule_one_matches_surname_and_tail() {
        let m = match_line_start(&split("Mr. Buren. I have a question."), &roster());
        assert_eq!(m.surname, "Buren");
        let names: Vec<&str> = m.candidates.iter().map(|p| p.full_name.as_str()).collect();
        assert_eq!(names, vec!["Van Buren, Martin", "Buren, Ann"]);
    }

    #[test]
    fn test_rule_one_bracketed_aside() {
        let m = match_line_start(&split("Mr. Smith [continuing]. As I said"), &roster());
        assert_eq!(m.candidates.len(), 1);
        assert_eq!(m.candidates[0].last_name, "Smith");
    }

    #[test]
    fn test_rule_two_and_fallback() {
        let m = match_line_start(&split("Mr. Van Buren. Thank you all."), &roster());
        assert_eq!(m.candidates.len(), 1);
        assert_eq!(m.candidates[0].full_name, "Van Buren, Martin");

        // No "Del Buren" on the roster: fall back to the second token
        let m = match_line_start(&split("Mr. Del Buren. Thank you all."), &roster());
        assert_eq!(m.surname, "Del Buren");
        assert_eq!(m.candidates.len(), 1);
        assert_eq!(m.candidates[0].full_name, "Buren, Ann");
    }

    #[test]
    fn test_rule_three_surname_of_state() {
        let m = match_line_start(&split("Mr. Jones of North Carolina. Yes."), &roster());
        assert_eq!(m.surname, "Jones");
        assert_eq!(m.candidates.len(), 1);
        assert_eq!(m.candidates[0].full_name, "Jones, Walter");

        let mut r = roster();
        r.push(Participant::member("Jones, Ed", "Jones", "TX"));
        let m = match_line_start(&split("Mr. Jones of Texas. I agree."), &r);
        assert_eq!(m.candidates.len(), 1);
        assert_eq!(m.candidates[0].full_name, "Jones, Ed");
    }

    #[test]
    fn test_match_named_requires_every_surname_token() {
        let r = roster();
        let found = match_named(&split("Questions Submitted by Mr. Van Buren"), &r);
        let names: Vec<&str> = found.iter().map(|p| p.full_name.as_str()).collect();
        assert_eq!(names, vec!["Van Buren, Martin", "Buren, Ann"]);

        let found = match_named(&split("Questions Submitted to Hon. Adam Smith."), &r);
        assert_eq!(found.len(), 1);
    }
}
