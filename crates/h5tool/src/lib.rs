#![doc = include_str!("../README.md")]
//! h5tool — browse, edit, page and batch-process HDF5 files
//!
//! The crate is split along the components a viewer needs:
//!
//! - [`container`]: the adapter between this crate and an HDF5 binding.
//!   [`Container`] is one open file, [`Store`] opens files by path. Nodes are
//!   addressed by [`NodePath`] so nothing above the adapter holds a live
//!   HDF5 handle.
//! - [`tree`]: projects a container into a display tree.
//! - [`attrs`]: the editable attribute table with its confirm/revert policy.
//! - [`pager`]: fixed-size pages over 1-D and 2-D datasets.
//! - [`batch`]: folder-driven export and attribute-setting pipelines that
//!   keep going when single files fail.
//! - [`session`]: ties the above together for one browsed file.
//!
//! Two backends are provided: [`MemoryContainer`]/[`MemoryStore`] always,
//! and `Hdf5Container`/`Hdf5Store` with the `hdf5` feature.
//!
//! Example: exporting through a store
//!
//! ```rust
//! use h5tool::batch::{ExportJob, NoProgress, run_batch_export};
//! use h5tool::{MemoryContainer, MemoryStore};
//!
//! let source = tempfile::tempdir().unwrap();
//! let dest = tempfile::tempdir().unwrap();
//! let file = source.path().join("run1.h5");
//! std::fs::write(&file, b"").unwrap();
//!
//! let mut container = MemoryContainer::new();
//! container.add_dataset_1d("counts", vec![3i64, 1, 4]);
//! let mut store = MemoryStore::new();
//! store.insert(&file, container);
//!
//! let job = ExportJob {
//!     source: source.path().to_path_buf(),
//!     dest: dest.path().to_path_buf(),
//!     suffix: "h5".to_string(),
//! };
//! let summary = run_batch_export(&store, &job, &mut NoProgress).unwrap();
//! assert_eq!(summary.exported, 1);
//!
//! let text = std::fs::read_to_string(dest.path().join("counts.txt")).unwrap();
//! assert_eq!(text, "3\n1\n4\n");
//! ```
pub mod attrs;
pub mod batch;
pub mod container;
mod error;
#[cfg(feature = "hdf5")]
mod h5file;
mod memory;
pub mod pager;
pub mod session;
pub mod tree;
mod value;

pub use attrs::{AttributeTable, Confirm, EditOutcome, PendingEdit, SaveOutcome};
pub use container::{Container, NodeKind, NodePath, OpenMode, Store, UnavailableStore};
pub use error::{Error, Result};
#[cfg(feature = "hdf5")]
pub use h5file::{Hdf5Container, Hdf5Store};
pub use memory::{MemoryContainer, MemoryStore};
pub use pager::{DatasetPager, Page, PageWindow};
pub use session::{Selected, Session};
pub use tree::TreeItem;
pub use value::{Value, ValueKind};

/// The store for files on disk in this build: `Hdf5Store` with the `hdf5`
/// feature, otherwise [`UnavailableStore`].
pub fn default_store() -> Box<dyn Store> {
    #[cfg(feature = "hdf5")]
    {
        Box::new(Hdf5Store)
    }
    #[cfg(not(feature = "hdf5"))]
    {
        Box::new(UnavailableStore)
    }
}
