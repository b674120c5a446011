//! The HDF5 access adapter.
//!
//! Everything above this module talks to files through [`Container`] and
//! opens them through [`Store`]. Nodes are addressed by [`NodePath`], the
//! absolute HDF5 path, so callers hold an index into the container rather
//! than a live object handle.
use std::fmt;
use std::ops::Range;
use std::path::Path;

use crate::error::{Error, Result};
use crate::value::Value;

/// Absolute path of a node inside a container (`/`, `/a`, `/a/x`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(String);

impl NodePath {
    pub fn root() -> Self {
        NodePath("/".to_string())
    }

    /// Normalise `path`: a leading `/` is added, empty segments and a
    /// trailing `/` are dropped.
    pub fn new(path: impl AsRef<str>) -> Self {
        let joined = path
            .as_ref()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        NodePath(format!("/{}", joined))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Path of the child `name` of this node.
    pub fn join(&self, name: &str) -> NodePath {
        if self.is_root() {
            NodePath::new(name)
        } else {
            NodePath::new(format!("{}/{}", self.0, name))
        }
    }

    /// Last path component; `/` for the root.
    pub fn name(&self) -> &str {
        if self.is_root() {
            return "/";
        }
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn parent(&self) -> Option<NodePath> {
        if self.is_root() {
            return None;
        }
        let cut = self.0.rfind('/').unwrap_or(0);
        Some(NodePath::new(&self.0[..cut]))
    }

    /// Path components from the root down, excluding the root itself.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodePath {
    fn from(s: &str) -> Self {
        NodePath::new(s)
    }
}

/// Group or dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Dataset,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Group => f.write_str("group"),
            NodeKind::Dataset => f.write_str("dataset"),
        }
    }
}

/// How a file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    ReadWrite,
}

/// One open HDF5 file.
///
/// Attribute maps are returned in the container's iteration order and
/// writes never reorder them: overwriting keeps the attribute's position,
/// creating appends.
pub trait Container {
    /// Filesystem location the container was opened from.
    fn location(&self) -> &Path;

    fn mode(&self) -> OpenMode;

    fn kind(&self, path: &NodePath) -> Result<NodeKind>;

    /// Immediate children of a group, in native enumeration order. Objects
    /// that are neither groups nor datasets are left out.
    fn children(&self, group: &NodePath) -> Result<Vec<(String, NodeKind)>>;

    fn attributes(&self, path: &NodePath) -> Result<Vec<(String, Value)>>;

    fn attribute(&self, path: &NodePath, name: &str) -> Result<Option<Value>> {
        Ok(self
            .attributes(path)?
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v))
    }

    /// Create or overwrite attribute `name` on the node at `path`.
    fn set_attribute(&mut self, path: &NodePath, name: &str, value: &Value) -> Result<()>;

    /// Dataset shape; its length is the rank.
    fn shape(&self, path: &NodePath) -> Result<Vec<usize>>;

    /// Elements `range` of a rank-1 dataset.
    fn read_elements(&self, path: &NodePath, range: Range<usize>) -> Result<Vec<Value>>;

    /// Rows `range` of a rank-2 dataset, every column.
    fn read_rows(&self, path: &NodePath, range: Range<usize>) -> Result<Vec<Vec<Value>>>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Opens containers by filesystem path.
pub trait Store {
    fn open(&self, path: &Path, mode: OpenMode) -> Result<Box<dyn Container>>;
}

/// Top-level nodes of `container`.
pub fn top_level(container: &dyn Container) -> Result<Vec<(NodePath, NodeKind)>> {
    let root = NodePath::root();
    Ok(container
        .children(&root)?
        .into_iter()
        .map(|(name, kind)| (root.join(&name), kind))
        .collect())
}

/// Fail with [`Error::NotADataset`] unless `path` is a dataset, and return
/// its shape.
pub fn dataset_shape(container: &dyn Container, path: &NodePath) -> Result<Vec<usize>> {
    match container.kind(path)? {
        NodeKind::Dataset => container.shape(path),
        NodeKind::Group => Err(Error::NotADataset(path.to_string())),
    }
}

/// Store used when the crate is built without an HDF5 backend; every open
/// fails with [`Error::Open`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl Store for UnavailableStore {
    fn open(&self, path: &Path, _mode: OpenMode) -> Result<Box<dyn Container>> {
        Err(Error::Open {
            path: path.to_path_buf(),
            reason: "built without HDF5 support (enable the `hdf5` feature)".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_path_normalises() {
        assert_eq!(NodePath::new("a//b/").as_str(), "/a/b");
        assert_eq!(NodePath::new("").as_str(), "/");
        assert!(NodePath::new("///").is_root());
    }

    #[test]
    fn node_path_navigation() {
        let p = NodePath::root().join("a").join("x");
        assert_eq!(p.as_str(), "/a/x");
        assert_eq!(p.name(), "x");
        assert_eq!(p.parent(), Some(NodePath::new("/a")));
        assert_eq!(NodePath::new("/a").parent(), Some(NodePath::root()));
        assert_eq!(NodePath::root().parent(), None);
        assert_eq!(p.components().collect::<Vec<_>>(), vec!["a", "x"]);
    }
}
