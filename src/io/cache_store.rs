use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::models::{HeuristicCache, InvalidHeading, Participant, Role};

/// Persistence for the cross-document heuristic caches and the per-document
/// chairperson table
pub trait HeuristicCacheStore {
    fn load_possible_speakers(&self) -> Result<Vec<Participant>, StoreError>;
    fn save_possible_speakers(&mut self, speakers: &[Participant]) -> Result<(), StoreError>;
    fn load_invalid_headings(&self) -> Result<Vec<InvalidHeading>, StoreError>;
    fn save_invalid_headings(&mut self, headings: &[InvalidHeading]) -> Result<(), StoreError>;
    fn load_chair_for(&self, document_id: &str) -> Result<Option<Participant>, StoreError>;
    fn save_chair_for(&mut self, document_id: &str, chair: &Participant) -> Result<(), StoreError>;

    /// Load both caches
    fn load_cache(&self) -> Result<HeuristicCache, StoreError> {
        Ok(HeuristicCache::new(
            self.load_possible_speakers()?,
            self.load_invalid_headings()?,
        ))
    }

    /// Save both caches
    fn save_cache(&mut self, cache: &HeuristicCache) -> Result<(), StoreError> {
        self.save_possible_speakers(cache.possible_speakers())?;
        self.save_invalid_headings(cache.invalid_headings())
    }
}

/// In-memory store, for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStore {
    pub possible_speakers: Vec<Participant>,
    pub invalid_headings: Vec<InvalidHeading>,
    pub chairs: HashMap<String, Participant>,
}

impl HeuristicCacheStore for MemoryCacheStore {
    fn load_possible_speakers(&self) -> Result<Vec<Participant>, StoreError> {
        Ok(self.possible_speakers.clone())
    }

    fn save_possible_speakers(&mut self, speakers: &[Participant]) -> Result<(), StoreError> {
        self.possible_speakers = speakers.to_vec();
        Ok(())
    }

    fn load_invalid_headings(&self) -> Result<Vec<InvalidHeading>, StoreError> {
        Ok(self.invalid_headings.clone())
    }

    fn save_invalid_headings(&mut self, headings: &[InvalidHeading]) -> Result<(), StoreError> {
        self.invalid_headings = headings.to_vec();
        Ok(())
    }

    fn load_chair_for(&self, document_id: &str) -> Result<Option<Participant>, StoreError> {
        Ok(self.chairs.get(document_id).cloned())
    }

    fn save_chair_for(&mut self, document_id: &str, chair: &Participant) -> Result<(), StoreError> {
        self.chairs.insert(document_id.to_string(), chair.clone());
        Ok(())
    }
}

const POSSIBLE_SPEAKERS_FILE: &str = "possible-speakers.csv";
const INVALID_HEADINGS_FILE: &str = "invalid-headings.txt";
const CHAIRS_FILE: &str = "chairs.csv";

/// One row of the chair table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChairRecord {
    document: String,
    name: String,
    role: Role,
    last_name: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    state_code: String,
}

impl ChairRecord {
    fn new(document_id: &str, chair: &Participant) -> Self {
        Self {
            document: document_id.to_string(),
            name: chair.full_name.clone(),
            role: chair.role,
            last_name: chair.last_name.clone(),
            state: chair.state_name.clone(),
            state_code: chair.state_code.clone(),
        }
    }

    fn into_participant(self) -> Participant {
        Participant {
            full_name: self.name,
            role: self.role,
            last_name: self.last_name,
            state_name: self.state,
            state_code: self.state_code,
        }
    }
}

/// Cache files in one directory. Missing files load as empty.
#[derive(Debug, Clone)]
pub struct FsCacheStore {
    dir: PathBuf,
}

impl FsCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))
    }

    fn read_csv<T: for<'de> Deserialize<'de>>(&self, file: &str) -> Result<Vec<T>, StoreError> {
        let path = self.path(file);
        let Some(reader) = open_if_exists(&path)? else {
            return Ok(Vec::new());
        };
        csv::Reader::from_reader(reader)
            .deserialize()
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| StoreError::csv(&path, e))
    }

    fn write_csv<T: Serialize>(&self, file: &str, rows: &[T]) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let path = self.path(file);
        let mut writer = csv::Writer::from_path(&path).map_err(|e| StoreError::csv(&path, e))?;
        for row in rows {
            writer.serialize(row).map_err(|e| StoreError::csv(&path, e))?;
        }
        writer.flush().map_err(|e| StoreError::io(&path, e))
    }
}

fn open_if_exists(path: &Path) -> Result<Option<File>, StoreError> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{:?} does not exist yet", path);
            Ok(None)
        }
        Err(e) => Err(StoreError::io(path, e)),
    }
}

impl HeuristicCacheStore for FsCacheStore {
    fn load_possible_speakers(&self) -> Result<Vec<Participant>, StoreError> {
        self.read_csv(POSSIBLE_SPEAKERS_FILE)
    }

    fn save_possible_speakers(&mut self, speakers: &[Participant]) -> Result<(), StoreError> {
        self.write_csv(POSSIBLE_SPEAKERS_FILE, speakers)
    }

    fn load_invalid_headings(&self) -> Result<Vec<InvalidHeading>, StoreError> {
        let path = self.path(INVALID_HEADINGS_FILE);
        let Some(file) = open_if_exists(&path)? else {
            return Ok(Vec::new());
        };

        let mut headings = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| StoreError::io(&path, e))?;
            headings.extend(InvalidHeading::parse(&line));
        }
        Ok(headings)
    }

    fn save_invalid_headings(&mut self, headings: &[InvalidHeading]) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let path = self.path(INVALID_HEADINGS_FILE);
        let mut file = File::create(&path).map_err(|e| StoreError::io(&path, e))?;
        for heading in headings {
            writeln!(file, "{}", heading).map_err(|e| StoreError::io(&path, e))?;
        }
        Ok(())
    }

    fn load_chair_for(&self, document_id: &str) -> Result<Option<Participant>, StoreError> {
        let records: Vec<ChairRecord> = self.read_csv(CHAIRS_FILE)?;
        Ok(records
            .into_iter()
            .find(|r| r.document == document_id)
            .map(ChairRecord::into_participant))
    }

    fn save_chair_for(&mut self, document_id: &str, chair: &Participant) -> Result<(), StoreError> {
        let mut records: Vec<ChairRecord> = self.read_csv(CHAIRS_FILE)?;
        records.retain(|r| r.document != document_id);
        records.push(ChairRecord::new(document_id, chair));
        self.write_csv(CHAIRS_FILE, &records)
    }
}
