//! Log ingestion: line sources and normalization into structured records.

pub mod normalizer;
pub mod source;

pub use normalizer::{normalize, NormalizedRecord};
pub use source::{FileSource, MemorySource, Source, SourceError, StdinSource};
