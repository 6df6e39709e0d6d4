use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::SpeechTurn;

/// Output columns, in order
pub const COLUMNS: [&str; 10] = [
    "document",
    "congress",
    "committee",
    "subcommittee",
    "title",
    "date",
    "name",
    "state",
    "role",
    "text",
];

/// CSV sink for speech turns. The header row is written on creation, so an
/// empty batch still yields a valid file.
pub struct TurnWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl TurnWriter<File> {
    pub fn create(path: &Path) -> Result<Self> {
        let file =
            File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
        Self::new(file)
    }
}

impl<W: Write> TurnWriter<W> {
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer
            .write_record(COLUMNS)
            .context("Failed to write CSV header")?;
        Ok(Self { writer, rows: 0 })
    }

    /// Append turns and flush, so rows survive a later abort
    pub fn write_turns(&mut self, turns: &[SpeechTurn]) -> Result<()> {
        for turn in turns {
            self.writer
                .serialize(turn)
                .context("Failed to write speech turn")?;
            self.rows += 1;
        }
        self.writer.flush().context("Failed to flush output")?;
        Ok(())
    }

    /// Rows written so far, excluding the header
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush output: {}", e.error()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{Participant, TurnContext};

    fn context() -> TurnContext {
        TurnContext {
            document_id: "CHRG-117hhrg44244".to_string(),
            congress: "117".to_string(),
            committee: "Appropriations".to_string(),
            subcommittee: String::new(),
            title: "Budget Hearing".to_string(),
            date: NaiveDate::from_ymd_opt(2021, 5, 18).unwrap(),
        }
    }

    #[test]
    fn test_header_without_rows() {
        let writer = TurnWriter::new(Vec::new()).unwrap();
        let bytes = writer.into_inner().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "document,congress,committee,subcommittee,title,date,name,state,role,text\n"
        );
    }

    #[test]
    fn test_rows_follow_column_order() {
        let ctx = context();
        let mut member = SpeechTurn::new(&ctx, &Participant::member("Kaptur, Marcy", "Kaptur", "OH"));
        member.append_text("Good morning, everyone.");
        let mut unknown = SpeechTurn::unattributed(&ctx);
        unknown.append_text("Answer text.");

        let mut writer = TurnWriter::new(Vec::new()).unwrap();
        writer.write_turns(&[member, unknown]).unwrap();
        assert_eq!(writer.rows(), 2);

        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[1],
            "CHRG-117hhrg44244,117,Appropriations,,Budget Hearing,2021-05-18,\"Kaptur, Marcy\",OH,member,\"Good morning, everyone.\""
        );
        assert_eq!(
            lines[2],
            "CHRG-117hhrg44244,117,Appropriations,,Budget Hearing,2021-05-18,,,,Answer text."
        );
    }
}
