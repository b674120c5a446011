//! Interactive browsing of one file.
//!
//! A `Session` owns the open container for as long as the file is browsed,
//! together with the state of the components the selection drives: the
//! projected tree, the attribute table and, when a dataset is selected, its
//! pager.
use std::path::{Path, PathBuf};

use crate::attrs::{AttributeTable, Confirm, EditOutcome, SaveOutcome};
use crate::batch::{export_dataset, require};
use crate::container::{Container, NodeKind, NodePath, OpenMode, Store};
use crate::error::{Error, Result};
use crate::pager::{DatasetPager, Page};
use crate::tree::{self, TreeItem};

/// What selecting a node produced besides the attribute rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selected {
    Group,
    /// A dataset, with its first page.
    Dataset(Page),
    /// A dataset whose rank the viewer does not page.
    Unpageable { rank: usize },
}

pub struct Session {
    container: Box<dyn Container>,
    tree: Vec<TreeItem>,
    attributes: AttributeTable,
    pager: Option<DatasetPager>,
    page_size: usize,
}

impl Session {
    /// Open `path` for reading and writing and project its tree.
    pub fn open(store: &dyn Store, path: &Path, page_size: usize) -> Result<Self> {
        let container = store.open(path, OpenMode::ReadWrite)?;
        log::info!("opened {}", path.display());
        Self::with_container(container, page_size)
    }

    pub fn with_container(container: Box<dyn Container>, page_size: usize) -> Result<Self> {
        let tree = tree::project(container.as_ref())?;
        Ok(Self {
            container,
            tree,
            attributes: AttributeTable::new(),
            pager: None,
            page_size,
        })
    }

    pub fn location(&self) -> &Path {
        self.container.location()
    }

    pub fn tree(&self) -> &[TreeItem] {
        &self.tree
    }

    pub fn attributes(&self) -> &AttributeTable {
        &self.attributes
    }

    /// Pager of the selected dataset, if any.
    pub fn pager(&self) -> Option<&DatasetPager> {
        self.pager.as_ref()
    }

    /// Select `path`: show its attributes and, for a dataset, open a pager
    /// on page 0.
    pub fn select(&mut self, path: &NodePath) -> Result<Selected> {
        self.pager = None;
        self.attributes.select(self.container.as_ref(), path)?;
        match self.container.kind(path)? {
            NodeKind::Group => Ok(Selected::Group),
            NodeKind::Dataset => {
                match DatasetPager::open(self.container.as_ref(), path, self.page_size) {
                    Ok(pager) => {
                        let page = pager.current_page(self.container.as_ref())?;
                        self.pager = Some(pager);
                        Ok(Selected::Dataset(page))
                    }
                    Err(Error::UnsupportedRank { rank, .. }) => Ok(Selected::Unpageable { rank }),
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Forward a value-cell edit to the attribute table.
    pub fn edit(
        &mut self,
        row: usize,
        new_value: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<EditOutcome> {
        self.attributes
            .on_cell_edited(self.container.as_mut(), row, new_value, confirm)
    }

    pub fn save(&mut self) -> Result<SaveOutcome> {
        self.attributes.save_changes(self.container.as_mut())
    }

    /// Current page of the selected dataset.
    pub fn current_page(&self) -> Result<Option<Page>> {
        self.pager
            .as_ref()
            .map(|p| p.current_page(self.container.as_ref()))
            .transpose()
    }

    /// Advance the pager; `None` when no pageable dataset is selected.
    pub fn next_page(&mut self) -> Result<Option<Page>> {
        match self.pager.as_mut() {
            Some(pager) => pager.next_page(self.container.as_ref()).map(Some),
            None => Ok(None),
        }
    }

    pub fn go_to_page(&mut self, page: usize) -> Result<Option<Page>> {
        match self.pager.as_mut() {
            Some(pager) => pager.go_to(self.container.as_ref(), page).map(Some),
            None => Ok(None),
        }
    }

    /// Export the dataset at `path` to `{dest_dir}/{name}.txt`. A blank
    /// `dest_dir` is rejected with [`Error::InvalidInput`].
    pub fn export(&self, path: &NodePath, dest_dir: &Path) -> Result<PathBuf> {
        require("export folder", &dest_dir.to_string_lossy())?;
        let target = dest_dir.join(format!("{}.txt", path.name()));
        export_dataset(self.container.as_ref(), path, &target)?;
        Ok(target)
    }
}
