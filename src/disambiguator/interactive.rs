use std::io::{self, BufRead, StdinLock, Stdout, Write};

use tracing::debug;

use super::{Confirmation, Disambiguator, EntryHint, EntryPurpose};
use crate::error::DisambiguationError;
use crate::models::{Participant, Role};

/// Public archive link for a hearing document id such as `CHRG-115hhrg33477`
pub fn document_url(document_id: &str) -> Option<String> {
    let congress = document_id.get(5..8)?;
    let len = document_id.len();
    let jacket = document_id.get(len.checked_sub(5)?..len - 3)?;
    let number = document_id.get(len - 3..)?;
    Some(format!(
        "https://www.govinfo.gov/link/chrg/{}/{}-{}?link-type=html",
        congress, jacket, number
    ))
}

/// Disambiguator that asks a human on a terminal.
///
/// Generic over its streams so the prompt loops can be driven in tests.
pub struct InteractiveDisambiguator<R, W> {
    input: R,
    output: W,
}

impl InteractiveDisambiguator<StdinLock<'static>, Stdout> {
    /// Prompt on stdout, read answers from stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> InteractiveDisambiguator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Read one trimmed answer after printing `prompt`
    fn ask(&mut self, prompt: &str) -> Result<String, DisambiguationError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(DisambiguationError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Ask until the answer is y or n
    fn ask_yes_no(&mut self, prompt: &str) -> Result<bool, DisambiguationError> {
        loop {
            match self.ask(prompt)?.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                other => debug!("Unrecognised answer {:?}, asking again", other),
            }
        }
    }
}

impl<R: BufRead, W: Write> Disambiguator for InteractiveDisambiguator<R, W> {
    fn confirm(&mut self, confirmation: &Confirmation<'_>) -> Result<bool, DisambiguationError> {
        writeln!(self.output)?;
        match confirmation {
            Confirmation::PossibleSpeaker { candidate, excerpt } => {
                writeln!(self.output, "Possible match found: {}", candidate)?;
                writeln!(self.output, "for potential next speech: {}", excerpt)?;
            }
            Confirmation::NewSpeaker { excerpt } => {
                writeln!(
                    self.output,
                    "WARNING: No match found for potential new speaker: {}",
                    excerpt
                )?;
            }
            Confirmation::QuestionBlock { excerpt } => {
                writeln!(self.output, "WARNING: Cannot detect participant in: {}", excerpt)?;
            }
        }
        self.ask_yes_no(&format!("{} (y/n) ", confirmation.question()))
    }

    fn choose_one(
        &mut self,
        excerpt: &str,
        candidates: &[Participant],
    ) -> Result<usize, DisambiguationError> {
        writeln!(self.output)?;
        writeln!(
            self.output,
            "WARNING: Multiple matches found for potential new speaker: {}",
            excerpt
        )?;
        for (i, candidate) in candidates.iter().enumerate() {
            writeln!(self.output, "{} - {}", i + 1, candidate)?;
        }

        loop {
            let answer = self.ask("Enter the number of the correct participant: ")?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=candidates.len()).contains(&n) => return Ok(n - 1),
                _ => writeln!(
                    self.output,
                    "Please enter a number between 1 and {}",
                    candidates.len()
                )?,
            }
        }
    }

    fn enter_participant(
        &mut self,
        hint: &EntryHint<'_>,
    ) -> Result<Participant, DisambiguationError> {
        writeln!(self.output)?;
        match hint.purpose {
            EntryPurpose::Chairperson => writeln!(
                self.output,
                "WARNING: No chairperson found. Please manually enter the chairperson."
            )?,
            EntryPurpose::Speaker | EntryPurpose::QuestionParticipant => {
                writeln!(self.output, "Enter the participant for: {}", hint.excerpt)?
            }
        }

        loop {
            match document_url(hint.document_id) {
                Some(url) => writeln!(self.output, "Document url: {}", url)?,
                None => writeln!(self.output, "Document: {}", hint.document_id)?,
            }

            let last_name = self.ask("Enter last name: ")?;
            let state_code = self.ask("Enter state code (e.g. TX): ")?.to_uppercase();

            let known: Vec<Participant> = hint
                .roster
                .iter()
                .filter(|p| {
                    p.surname_tail().to_lowercase() == last_name.to_lowercase()
                        && p.state_code.eq_ignore_ascii_case(&state_code)
                })
                .cloned()
                .collect();
            for participant in known {
                writeln!(self.output, "Found potential match: {}", participant)?;
                if self.ask_yes_no("Is this correct? (y/n) ")? {
                    return Ok(participant);
                }
            }

            let first_name = self.ask("Enter first name: ")?;
            let participant = Participant::manual(&last_name, &first_name, &state_code);

            writeln!(self.output, "Confirm the following information:")?;
            if participant.role == Role::Member {
                writeln!(
                    self.output,
                    "Representative {} of {}",
                    participant.full_name, participant.state_name
                )?;
            } else {
                writeln!(
                    self.output,
                    "{}, role: {}",
                    participant.full_name, participant.role
                )?;
            }
            if self.ask_yes_no("y/n: ")? {
                return Ok(participant);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::disambiguator::ConfirmKind;

    fn prompter(script: &str) -> InteractiveDisambiguator<Cursor<Vec<u8>>, Vec<u8>> {
        InteractiveDisambiguator::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_document_url() {
        assert_eq!(
            document_url("CHRG-115hhrg33477").as_deref(),
            Some("https://www.govinfo.gov/link/chrg/115/33-477?link-type=html")
        );
        assert_eq!(document_url("bad"), None);
    }

    #[test]
    fn test_confirm_reprompts_until_yes_or_no() {
        let mut d = prompter("maybe\n\nY\n");
        let confirmation = Confirmation::NewSpeaker {
            excerpt: "Mr. Nobody. Hello there.",
        };
        assert_eq!(confirmation.kind(), ConfirmKind::NewSpeaker);
        assert!(d.confirm(&confirmation).unwrap());

        let shown = String::from_utf8(d.output).unwrap();
        assert_eq!(shown.matches("Is this actually a new speaker?").count(), 3);
    }

    #[test]
    fn test_choose_one_reprompts_on_invalid_index() {
        let candidates = vec![
            Participant::member("Smith, Adam", "Smith", "WA"),
            Participant::member("Smith, Jason", "Smith", "MO"),
        ];
        let mut d = prompter("0\nthree\n3\n2\n");
        assert_eq!(d.choose_one("Mr. Smith. Yes.", &candidates).unwrap(), 1);
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut d = prompter("");
        let result = d.confirm(&Confirmation::QuestionBlock { excerpt: "x" });
        assert!(matches!(result, Err(DisambiguationError::InputClosed)));
    }

    #[test]
    fn test_enter_participant_offers_roster_match() {
        let roster = vec![Participant::member("Gosar, Paul A.", "Gosar", "AZ")];
        let hint = EntryHint {
            purpose: EntryPurpose::Chairperson,
            document_id: "CHRG-115hhrg33477",
            excerpt: "The Chairman. The committee will come to order.",
            roster: &roster,
        };
        let mut d = prompter("gosar\naz\ny\n");
        assert_eq!(d.enter_participant(&hint).unwrap(), roster[0]);
    }

    #[test]
    fn test_enter_participant_manual_with_retry() {
        let hint = EntryHint {
            purpose: EntryPurpose::Speaker,
            document_id: "CHRG-117hhrg44244",
            excerpt: "Ms. Washington. Thank you.",
            roster: &[],
        };
        // First attempt rejected at the final confirmation, second accepted
        let mut d = prompter("Washingtn\n\nKelly\nn\nWashington\n\nKelly\ny\n");
        let participant = d.enter_participant(&hint).unwrap();

        assert_eq!(participant.full_name, "Washington, Kelly");
        assert_eq!(participant.role, Role::Witness);
    }
}
