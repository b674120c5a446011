//! Paged view over 1-D and 2-D datasets.
//!
//! A page is `page_size` elements of a 1-D dataset, or `page_size` rows (all
//! columns) of a 2-D dataset. Paging only moves forward; stepping past the
//! last page yields empty pages rather than an error.
use crate::container::{Container, NodePath, dataset_shape};
use crate::error::{Error, Result};

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Current page index and page size of an open viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
}

impl PageWindow {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// `[start, end)` of `page` for a dataset with `total` rows/elements.
    /// `start >= total` gives an empty range.
    pub fn bounds(&self, page: usize, total: usize) -> (usize, usize) {
        let start = page.saturating_mul(self.page_size);
        let end = start.saturating_add(self.page_size).min(total).max(start);
        (start, end)
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// One rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Zero-based page index.
    pub page: usize,
    /// Index of the first row in the dataset.
    pub first_row: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Viewer state for one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPager {
    path: NodePath,
    shape: Vec<usize>,
    window: PageWindow,
}

impl DatasetPager {
    /// Open the dataset at `path` on page 0.
    ///
    /// Only rank 1 and rank 2 datasets can be paged; any other rank fails
    /// with [`Error::UnsupportedRank`].
    pub fn open(container: &dyn Container, path: &NodePath, page_size: usize) -> Result<Self> {
        let shape = dataset_shape(container, path)?;
        if !matches!(shape.len(), 1 | 2) {
            return Err(Error::UnsupportedRank {
                path: path.to_string(),
                rank: shape.len(),
            });
        }
        Ok(Self {
            path: path.clone(),
            shape,
            window: PageWindow::new(page_size),
        })
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    /// Elements (rank 1) or rows (rank 2) in the dataset.
    pub fn total(&self) -> usize {
        self.shape[0]
    }

    /// Render the current page.
    pub fn current_page(&self, container: &dyn Container) -> Result<Page> {
        self.display_page(container, self.window.page)
    }

    /// Move to `page` and render it.
    pub fn go_to(&mut self, container: &dyn Container, page: usize) -> Result<Page> {
        self.window.page = page;
        self.current_page(container)
    }

    /// Advance one page and render it. There is no upper bound: past the
    /// end the page is empty.
    pub fn next_page(&mut self, container: &dyn Container) -> Result<Page> {
        self.go_to(container, self.window.page.saturating_add(1))
    }

    /// Render `page` without moving the window.
    pub fn display_page(&self, container: &dyn Container, page: usize) -> Result<Page> {
        let (start, end) = self.window.bounds(page, self.total());
        let mut rendered = Page {
            page,
            first_row: start,
            headers: Vec::new(),
            rows: Vec::new(),
        };

        if self.shape.len() == 1 {
            rendered.headers = vec![format!("Data (Page {})", page + 1)];
            if start < end {
                rendered.rows = container
                    .read_elements(&self.path, start..end)?
                    .into_iter()
                    .map(|v| vec![v.to_string()])
                    .collect();
            }
        } else {
            let cols = self.shape[1];
            rendered.headers = (1..=cols).map(|i| format!("Column {}", i)).collect();
            if start < end {
                rendered.rows = container
                    .read_rows(&self.path, start..end)?
                    .into_iter()
                    .map(|row| row.into_iter().map(|v| v.to_string()).collect())
                    .collect();
            }
        }
        Ok(rendered)
    }
}
