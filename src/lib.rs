pub mod disambiguator;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod resolver;
pub mod segment;

pub use disambiguator::{Disambiguator, InteractiveDisambiguator, ScriptedDisambiguator};
pub use error::{DisambiguationError, SegmentError, StoreError};
pub use io::{
    DocumentStore, FsCacheStore, FsDocumentStore, HeuristicCacheStore, MemoryCacheStore,
    TurnWriter,
};
pub use models::{DocumentMetadata, HeuristicCache, Participant, Role, SpeechTurn};
pub use pipeline::{BatchSummary, analyze_document, process_documents};
pub use resolver::{HeadingScope, Resolution, SpeakerResolver};
pub use segment::{Segmenter, SegmenterConfig, SessionContext};
