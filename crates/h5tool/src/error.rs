//! Error type shared by the adapter, the interactive components and the
//! batch pipelines.
use std::path::PathBuf;

use thiserror::Error;

use crate::value::ValueKind;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by `h5tool`.
///
/// Batch operations never return these for a single file; they are wrapped
/// into a [`FileFailure`](crate::batch::FileFailure) and the batch moves on.
#[derive(Debug, Error)]
pub enum Error {
    /// The file is missing, corrupt, not HDF5, or not accessible.
    #[error("cannot open {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    /// No object exists at the given path.
    #[error("no object at {0}")]
    NotFound(String),

    /// The object exists but is not a dataset.
    #[error("{0} is not a dataset")]
    NotADataset(String),

    /// The object exists but is not a group.
    #[error("{0} is not a group")]
    NotAGroup(String),

    /// Only rank 1 and rank 2 datasets can be paged or exported.
    #[error("dataset {path} has rank {rank}; only 1-D and 2-D datasets are supported")]
    UnsupportedRank { path: String, rank: usize },

    /// Edited text cannot be stored as the attribute's existing type.
    #[error("cannot store {text:?} in attribute {name:?} of type {kind}")]
    Conversion {
        name: String,
        text: String,
        kind: ValueKind,
    },

    /// A write was attempted through a read-only handle.
    #[error("{0} is opened read-only")]
    ReadOnly(String),

    /// A batch job was started with missing fields.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Failure reported by the HDF5 binding.
    #[error("hdf5: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
