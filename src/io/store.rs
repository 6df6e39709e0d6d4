use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use super::document::{SplitTranscript, reflow_paragraphs, split_hearing_days};
use crate::error::StoreError;
use crate::models::{DocumentMetadata, Participant, state_code, state_name};

/// Source of hearing documents: metadata, roster and raw transcript
pub trait DocumentStore {
    /// Ids of every document the store holds, in processing order
    fn list_documents(&self) -> Result<Vec<String>, StoreError>;
    fn fetch_metadata(&self, document_id: &str) -> Result<DocumentMetadata, StoreError>;
    fn fetch_roster(&self, document_id: &str) -> Result<Vec<Participant>, StoreError>;
    fn fetch_raw_text(&self, document_id: &str) -> Result<String, StoreError>;

    /// The transcript separated into hearing days. `None` when the body
    /// cannot be located.
    fn fetch_transcript_text(
        &self,
        metadata: &DocumentMetadata,
    ) -> Result<Option<SplitTranscript>, StoreError> {
        let text = self.fetch_raw_text(&metadata.document_id)?;
        Ok(split_hearing_days(
            &metadata.document_id,
            &text,
            &metadata.dates,
        ))
    }
}

/// Metadata file layout: `<id>.json`
#[derive(Debug, Deserialize)]
struct DocumentRecord {
    congress: String,
    committee: String,
    #[serde(default)]
    subcommittee: String,
    title: String,
    dates: Vec<NaiveDate>,
    #[serde(default)]
    participants: Vec<Participant>,
}

/// Documents on disk: `<id>.json` for metadata and roster, `<id>.txt` for
/// the raw transcript
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
    reflow: bool,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            reflow: false,
        }
    }

    /// Rejoin hard-wrapped paragraphs when reading transcripts
    pub fn with_reflow(mut self, reflow: bool) -> Self {
        self.reflow = reflow;
        self
    }

    fn file(&self, document_id: &str, extension: &str) -> PathBuf {
        self.root.join(format!("{}.{}", document_id, extension))
    }

    fn read(&self, document_id: &str, extension: &str) -> Result<String, StoreError> {
        let path = self.file(document_id, extension);
        if !path.is_file() {
            return Err(StoreError::UnknownDocument(document_id.to_string()));
        }
        std::fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))
    }

    fn record(&self, document_id: &str) -> Result<DocumentRecord, StoreError> {
        let content = self.read(document_id, "json")?;
        serde_json::from_str(&content)
            .map_err(|e| StoreError::json(self.file(document_id, "json"), e))
    }
}

impl DocumentStore for FsDocumentStore {
    fn list_documents(&self) -> Result<Vec<String>, StoreError> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&self.root, e))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        info!("Found {} documents in {:?}", ids.len(), self.root);
        Ok(ids)
    }

    fn fetch_metadata(&self, document_id: &str) -> Result<DocumentMetadata, StoreError> {
        let record = self.record(document_id)?;
        Ok(DocumentMetadata {
            document_id: document_id.to_string(),
            congress: record.congress,
            committee: record.committee,
            subcommittee: record.subcommittee,
            title: record.title,
            dates: record.dates,
        })
    }

    fn fetch_roster(&self, document_id: &str) -> Result<Vec<Participant>, StoreError> {
        let mut roster = self.record(document_id)?.participants;
        for participant in &mut roster {
            if participant.state_name.is_empty() {
                if let Some(name) = state_name(&participant.state_code) {
                    participant.state_name = name.to_string();
                }
            }
            if participant.state_code.is_empty() {
                if let Some(code) = state_code(&participant.state_name) {
                    participant.state_code = code.to_string();
                }
            }
        }
        debug!("Roster of {} has {} participants", document_id, roster.len());
        Ok(roster)
    }

    fn fetch_raw_text(&self, document_id: &str) -> Result<String, StoreError> {
        let text = self.read(document_id, "txt")?;
        Ok(if self.reflow {
            reflow_paragraphs(&text)
        } else {
            text
        })
    }
}
