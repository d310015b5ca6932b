use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::lineup::PerformerId;

/// Rejections raised while applying a user action to the lineup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineupError {
    #[error("unknown performer `{0}`")]
    UnknownPerformer(PerformerId),
    #[error("unknown stage `{0}`")]
    UnknownStage(String),
    #[error("unknown time slot `{0}`")]
    UnknownTime(String),
    #[error("catalog must list at least one {0}")]
    EmptyCatalog(&'static str),
    #[error("duplicate {kind} `{value}` in catalog")]
    DuplicateCatalogEntry { kind: &'static str, value: String },
    #[error("seed group `{group}` lists a blank performer name")]
    BlankSeedName { group: String },
}

/// Failures at the key-value persistence boundary
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read record `{key}` from {path}: {source}")]
    Read {
        key: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write record `{key}` to {path}: {source}")]
    Write {
        key: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode record `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
