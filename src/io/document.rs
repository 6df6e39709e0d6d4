use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::Participant;
use crate::resolver::same_word;

static APPENDIX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\n\s*(?:Submitted \S+ by|APPENDIX|Appendix|A P P E N D I X)").ok()
});

/// Text of one hearing day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HearingDay {
    pub date: NaiveDate,
    pub text: String,
}

/// A transcript separated into its front matter and hearing days
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitTranscript {
    /// Everything before the first date anchor
    pub heading: String,
    pub days: Vec<HearingDay>,
    /// Hearing dates whose anchor never appears in the body
    pub missing_dates: Vec<NaiveDate>,
}

/// The way a hearing date is printed in the transcript body,
/// e.g. "Tuesday, May 18, 2021"
pub fn date_anchor(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Byte range of the last case-insensitive occurrence of `date`'s anchor
fn last_anchor(text: &str, date: NaiveDate) -> Option<(usize, usize)> {
    let pattern = format!("(?i){}", regex::escape(&date_anchor(date)));
    let re = Regex::new(&pattern).ok()?;
    re.find_iter(text).last().map(|m| (m.start(), m.end()))
}

/// Split a raw transcript into hearing days using the date anchors.
///
/// The last occurrence of the first date separates the front matter from the
/// body (earlier occurrences are in the table of contents). Returns `None`
/// when the first anchor is missing.
pub fn split_hearing_days(
    document_id: &str,
    text: &str,
    dates: &[NaiveDate],
) -> Option<SplitTranscript> {
    let Some(&first) = dates.first() else {
        warn!("Document {} lists no hearing dates", document_id);
        return None;
    };
    let Some((body_start, _)) = last_anchor(text, first) else {
        warn!(
            "Unable to find start of text in document {} ({})",
            document_id,
            date_anchor(first)
        );
        return None;
    };

    let heading = text[..body_start].to_string();
    let body = &text[body_start..];

    let mut anchors = Vec::with_capacity(dates.len());
    let mut missing_dates = Vec::new();
    for &date in dates {
        match last_anchor(body, date) {
            Some(range) => anchors.push((date, range)),
            None => {
                warn!(
                    "Skipping hearing day {} of {}: date anchor not found",
                    date, document_id
                );
                missing_dates.push(date);
            }
        }
    }

    let days = anchors
        .iter()
        .enumerate()
        .map(|(i, &(date, (_, end)))| {
            let stop = anchors
                .get(i + 1)
                .map_or(body.len(), |&(_, (next_start, _))| next_start);
            let text = body.get(end..stop).unwrap_or_default().to_string();
            HearingDay { date, text }
        })
        .collect();

    Some(SplitTranscript {
        heading,
        days,
        missing_dates,
    })
}

/// Cut a hearing day at its appendix, which is not attributed
pub fn strip_appendix(text: &str) -> &str {
    match APPENDIX.as_ref().and_then(|re| re.find(text)) {
        Some(m) => {
            debug!("Cutting appendix at byte {}", m.start());
            &text[..m.start()]
        }
        None => text,
    }
}

/// Find the committee chair listed in the front matter.
///
/// The roster below a committee title lists members as
/// "Name, State, Chairman" or as "Name, State" with the title on the next
/// line. The match against the roster uses state name and surname tail.
pub fn detect_chair(heading: &str, roster: &[Participant]) -> Option<Participant> {
    let lines: Vec<&str> = heading.lines().collect();
    let mut window = 0;

    for (index, line) in lines.iter().enumerate() {
        let words: Vec<&str> = line.split_whitespace().collect();
        let is_committee = match words.as_slice() {
            ["COMMITTEE", _, ..] => true,
            ["HOUSE" | "SELECT", "COMMITTEE", ..] => true,
            _ => false,
        };
        if is_committee {
            window = 4;
        }
        if window == 0 {
            continue;
        }
        window -= 1;

        let mut fields: Vec<&str> = line.trim().split(", ").collect();
        if fields.len() > 1 && matches!(fields[1], "Jr." | "Sr.") {
            fields.remove(1);
        }
        let listed = match fields.as_slice() {
            [name, state, title] if title.starts_with("Chair") => Some((*name, *state)),
            [name, state] => lines
                .get(index + 1)
                .filter(|next| next.trim().starts_with("Chair"))
                .map(|_| (*name, *state)),
            _ => None,
        };

        if let Some((name, state)) = listed {
            let surname = name.split_whitespace().last().unwrap_or_default();
            debug!("Front matter lists chair {} of {}", surname, state);
            return roster
                .iter()
                .find(|p| p.state_name == state && same_word(p.surname_tail(), surname))
                .cloned();
        }
    }
    None
}

/// Rejoin paragraphs whose lines were hard-wrapped: an unindented line
/// continues the previous paragraph, an indented or blank line starts a new one
pub fn reflow_paragraphs(text: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    for line in text.lines() {
        let starts_paragraph = line.starts_with(char::is_whitespace) || line.trim().is_empty();
        match paragraphs.last_mut() {
            Some(last) if !starts_paragraph && !last.is_empty() => {
                last.push(' ');
                last.push_str(line.trim());
            }
            _ => paragraphs.push(line.trim().to_string()),
        }
    }
    paragraphs.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_anchor() {
        assert_eq!(date_anchor(date(2021, 5, 18)), "Tuesday, May 18, 2021");
        assert_eq!(date_anchor(date(2018, 3, 6)), "Tuesday, March 6, 2018");
    }

    #[test]
    fn test_split_uses_last_occurrence_and_each_day() {
        let text = "CONTENTS\nTuesday, May 18, 2021 ..... 1\nWednesday, May 19, 2021 ..... 9\n\
                    front matter\n\
                    TUESDAY, MAY 18, 2021\n\
                    Mr. Smith. Day one.\n\
                    Wednesday, May 19, 2021\n\
                    Mr. Smith. Day two.\n";
        let split =
            split_hearing_days("CHRG-117hhrg46542", text, &[date(2021, 5, 18), date(2021, 5, 19)])
                .unwrap();

        assert!(split.heading.contains("front matter"));
        assert!(split.heading.contains("CONTENTS"));
        assert_eq!(split.days.len(), 2);
        assert_eq!(split.days[0].text.trim(), "Mr. Smith. Day one.");
        assert_eq!(split.days[1].date, date(2021, 5, 19));
        assert_eq!(split.days[1].text.trim(), "Mr. Smith. Day two.");
        assert!(split.missing_dates.is_empty());
    }

    #[test]
    fn test_split_missing_anchors() {
        let text = "Mr. Smith. No dates here.";
        assert!(split_hearing_days("CHRG-115hhrg31359", text, &[date(2021, 5, 18)]).is_none());
        assert!(split_hearing_days("CHRG-115hhrg31359", text, &[]).is_none());

        let text = "Tuesday, May 18, 2021\nMr. Smith. Only one day.";
        let split =
            split_hearing_days("CHRG-117hhrg46542", text, &[date(2021, 5, 18), date(2021, 5, 19)])
                .unwrap();
        assert_eq!(split.days.len(), 1);
        assert_eq!(split.days[0].text.trim(), "Mr. Smith. Only one day.");
        assert_eq!(split.missing_dates, vec![date(2021, 5, 19)]);
    }

    #[test]
    fn test_strip_appendix() {
        let text = "Mr. Smith. Adjourned.\n\nA P P E N D I X\nMaterial";
        assert_eq!(strip_appendix(text), "Mr. Smith. Adjourned.");
        let text = "Mr. Smith. Adjourned.\n   Submitted Statement by Mr. Jones\n...";
        assert_eq!(strip_appendix(text), "Mr. Smith. Adjourned.");
        assert_eq!(strip_appendix("No appendix"), "No appendix");
    }

    #[test]
    fn test_detect_chair() {
        let roster = vec![
            Participant::member("Smith, Adam", "Smith", "WA"),
            Participant::member("Kaptur, Marcy", "Kaptur", "OH"),
        ];

        let heading = "SUBCOMMITTEE ON ENERGY\n\
                       HOUSE COMMITTEE ON APPROPRIATIONS\n\
                       MARCY KAPTUR, Ohio, Chairwoman\n\
                       ADAM SMITH, Washington\n";
        let chair = detect_chair(heading, &roster).unwrap();
        assert_eq!(chair.full_name, "Kaptur, Marcy");

        let heading = "COMMITTEE ON ARMED SERVICES\n\
                       ADAM SMITH, Jr., Washington\n\
                       Chairman\n";
        let chair = detect_chair(heading, &roster).unwrap();
        assert_eq!(chair.full_name, "Smith, Adam");

        let heading = "COMMITTEE ON ARMED SERVICES\nline\nline\nline\n\
                       line\nADAM SMITH, Washington, Chairman\n";
        assert!(detect_chair(heading, &roster).is_none());
    }

    #[test]
    fn test_reflow_paragraphs() {
        let text = "    Mr. Smith. Thank you for\ncoming today.\n    Mr. Jones. Yes.\n\nNext";
        assert_eq!(
            reflow_paragraphs(text),
            "Mr. Smith. Thank you for coming today.\nMr. Jones. Yes.\n\nNext"
        );
    }
}
