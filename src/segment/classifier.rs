use super::RegionMarkers;
use super::region::Region;

/// Direction of a "Questions Submitted" block relative to the named participant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QaDirection {
    /// "Questions Submitted to X": X answers
    To,
    /// "Questions Submitted by X": X asks
    By,
}

/// Lines that open or close a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// A run of dashes at the start or end of the line
    SourceRule,
    /// The embedded-report marker phrase
    ReportOpen,
    /// A run of underscores
    BlockClose,
    /// A "Questions Submitted" header; `None` when it names no direction
    QuestionsSubmitted(Option<QaDirection>),
}

/// Label for one transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// Starts with a lowercase letter: always continues the current turn
    Continuation,
    /// Capitalised line that may name a new speaker
    Heading,
    Delimiter(Delimiter),
    /// Citation text inside a source block
    SourceContent,
}

/// Label one line given the region active before it.
///
/// Inside a source block, only lines carrying a continuation marker are
/// source content; anything else is classified as ordinary text, which the
/// region tracker takes as the (unmarked) end of the block.
pub fn classify(line: &str, region: Region, markers: &RegionMarkers) -> LineKind {
    let trimmed = line.trim();

    if markers.is_source_rule(trimmed) {
        return LineKind::Delimiter(Delimiter::SourceRule);
    }
    if region == Region::Source && markers.is_source_continuation(trimmed) {
        return LineKind::SourceContent;
    }
    if trimmed.contains(&markers.report_open) {
        return LineKind::Delimiter(Delimiter::ReportOpen);
    }
    if trimmed.contains(&markers.block_close) {
        return LineKind::Delimiter(Delimiter::BlockClose);
    }
    if let Some(direction) = markers.questions_header(trimmed) {
        return LineKind::Delimiter(Delimiter::QuestionsSubmitted(direction));
    }
    body_kind(trimmed)
}

/// Label a line by its leading character alone
pub fn body_kind(line: &str) -> LineKind {
    match line.trim().chars().next() {
        None => LineKind::Blank,
        Some(c) if c.is_lowercase() => LineKind::Continuation,
        Some(_) => LineKind::Heading,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_normal(line: &str) -> LineKind {
        classify(line, Region::Normal, &RegionMarkers::default())
    }

    #[test]
    fn test_body_lines() {
        assert_eq!(classify_normal("   "), LineKind::Blank);
        assert_eq!(classify_normal("and so forth."), LineKind::Continuation);
        assert_eq!(classify_normal("Mr. Smith. Thank you."), LineKind::Heading);
        assert_eq!(classify_normal("\u{e9}tude follows"), LineKind::Continuation);
    }

    #[test]
    fn test_delimiters() {
        let rule = "-".repeat(20);
        assert_eq!(
            classify_normal(&rule),
            LineKind::Delimiter(Delimiter::SourceRule)
        );
        assert_eq!(
            classify_normal(&format!("Source: Department of Energy {}", rule)),
            LineKind::Delimiter(Delimiter::SourceRule)
        );
        assert_eq!(
            classify_normal("[The information follows:]"),
            LineKind::Delimiter(Delimiter::ReportOpen)
        );
        assert_eq!(
            classify_normal("______"),
            LineKind::Delimiter(Delimiter::BlockClose)
        );
        assert_eq!(
            classify_normal("Questions Submitted by Mr. Smith"),
            LineKind::Delimiter(Delimiter::QuestionsSubmitted(Some(QaDirection::By)))
        );
        assert_eq!(
            classify_normal("Questions submitted to Hon. Jane Doe, Secretary"),
            LineKind::Delimiter(Delimiter::QuestionsSubmitted(Some(QaDirection::To)))
        );
        assert_eq!(
            classify_normal("Questions Submitted for the Record"),
            LineKind::Delimiter(Delimiter::QuestionsSubmitted(None))
        );
    }

    #[test]
    fn test_source_region_lines() {
        let markers = RegionMarkers::default();
        assert_eq!(
            classify(r"\\ Department of Energy, 2017", Region::Source, &markers),
            LineKind::SourceContent
        );
        assert_eq!(
            classify("-- continued", Region::Source, &markers),
            LineKind::SourceContent
        );
        assert_eq!(classify("", Region::Source, &markers), LineKind::SourceContent);
        assert_eq!(
            classify("Mr. Smith. Back to it.", Region::Source, &markers),
            LineKind::Heading
        );
    }
}
