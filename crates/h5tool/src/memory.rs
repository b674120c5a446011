//! In-memory containers.
//!
//! `MemoryContainer` implements [`Container`] over a tree held in memory. It
//! doubles as a builder: groups, datasets and attributes are added with the
//! `add_*`/`set_attr` methods. Clones share the same tree, so a
//! [`MemoryStore`] can hand out handles whose writes are visible to every
//! other handle of the same "file".
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::container::{Container, NodeKind, NodePath, OpenMode, Store};
use crate::error::{Error, Result};
use crate::value::Value;

#[derive(Debug, Clone)]
enum Payload {
    Group(Vec<String>),
    Dataset { shape: Vec<usize>, data: Vec<Value> },
}

#[derive(Debug, Clone)]
struct MemNode {
    payload: Payload,
    attrs: Vec<(String, Value)>,
    fail_writes: bool,
}

impl MemNode {
    fn group() -> Self {
        Self {
            payload: Payload::Group(Vec::new()),
            attrs: Vec::new(),
            fail_writes: false,
        }
    }

    fn kind(&self) -> NodeKind {
        match self.payload {
            Payload::Group(_) => NodeKind::Group,
            Payload::Dataset { .. } => NodeKind::Dataset,
        }
    }
}

#[derive(Debug)]
struct Tree {
    nodes: HashMap<NodePath, MemNode>,
}

impl Tree {
    fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(NodePath::root(), MemNode::group());
        Self { nodes }
    }

    fn node(&self, path: &NodePath) -> Result<&MemNode> {
        self.nodes
            .get(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }

    /// Insert or replace the node at `path`, creating missing parent groups.
    /// A replaced node keeps its attributes and its position in the parent.
    fn insert(&mut self, path: &NodePath, payload: Payload) {
        if path.is_root() {
            return;
        }
        let mut parent = NodePath::root();
        for name in path.components() {
            let child = parent.join(name);
            if let Some(MemNode {
                payload: Payload::Group(children),
                ..
            }) = self.nodes.get_mut(&parent)
            {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
            if !self.nodes.contains_key(&child) {
                self.nodes.insert(child.clone(), MemNode::group());
            }
            parent = child;
        }
        if let Some(node) = self.nodes.get_mut(path) {
            if matches!(payload, Payload::Dataset { .. }) || node.kind() == NodeKind::Dataset {
                node.payload = payload;
            }
        }
    }
}

/// A container whose tree lives in memory.
#[derive(Debug, Clone)]
pub struct MemoryContainer {
    tree: Rc<RefCell<Tree>>,
    location: PathBuf,
    mode: OpenMode,
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryContainer {
    /// Empty container (root group only), writable, located at `memory`.
    pub fn new() -> Self {
        Self {
            tree: Rc::new(RefCell::new(Tree::new())),
            location: PathBuf::from("memory"),
            mode: OpenMode::ReadWrite,
        }
    }

    /// Another handle on the same tree with a different location and mode.
    pub fn handle(&self, location: &Path, mode: OpenMode) -> MemoryContainer {
        Self {
            tree: Rc::clone(&self.tree),
            location: location.to_path_buf(),
            mode,
        }
    }

    /// Add a group (and any missing parents).
    pub fn add_group(&mut self, path: &str) -> &mut Self {
        self.tree
            .borrow_mut()
            .insert(&NodePath::new(path), Payload::Group(Vec::new()));
        self
    }

    /// Add a dataset with an explicit shape; `data` is row-major.
    pub fn add_dataset<V: Into<Value>>(
        &mut self,
        path: &str,
        shape: &[usize],
        data: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let payload = Payload::Dataset {
            shape: shape.to_vec(),
            data: data.into_iter().map(Into::into).collect(),
        };
        self.tree.borrow_mut().insert(&NodePath::new(path), payload);
        self
    }

    pub fn add_dataset_1d<V: Into<Value>>(&mut self, path: &str, values: Vec<V>) -> &mut Self {
        let len = values.len();
        self.add_dataset(path, &[len], values)
    }

    /// Add a rank-2 dataset; the column count is taken from the first row.
    pub fn add_dataset_2d<V: Into<Value>>(&mut self, path: &str, rows: Vec<Vec<V>>) -> &mut Self {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let shape = [rows.len(), cols];
        self.add_dataset(path, &shape, rows.into_iter().flatten())
    }

    /// Set an attribute regardless of the handle's mode. Missing nodes are
    /// created as groups.
    pub fn set_attr(&mut self, path: &str, name: &str, value: impl Into<Value>) -> &mut Self {
        let path = NodePath::new(path);
        let mut tree = self.tree.borrow_mut();
        if !tree.nodes.contains_key(&path) {
            tree.insert(&path, Payload::Group(Vec::new()));
        }
        if let Some(node) = tree.nodes.get_mut(&path) {
            upsert(&mut node.attrs, name, value.into());
        }
        drop(tree);
        self
    }

    /// Make every later attribute write on `path` fail.
    pub fn fail_attribute_writes(&mut self, path: &str) -> &mut Self {
        if let Some(node) = self.tree.borrow_mut().nodes.get_mut(&NodePath::new(path)) {
            node.fail_writes = true;
        }
        self
    }

    fn with_dataset<R>(
        &self,
        path: &NodePath,
        rank: usize,
        f: impl FnOnce(&[usize], &[Value]) -> R,
    ) -> Result<R> {
        let tree = self.tree.borrow();
        match &tree.node(path)?.payload {
            Payload::Dataset { shape, data } if shape.len() == rank => Ok(f(shape, data)),
            Payload::Dataset { shape, .. } => Err(Error::UnsupportedRank {
                path: path.to_string(),
                rank: shape.len(),
            }),
            Payload::Group(_) => Err(Error::NotADataset(path.to_string())),
        }
    }
}

fn upsert(attrs: &mut Vec<(String, Value)>, name: &str, value: Value) {
    match attrs.iter_mut().find(|(n, _)| n == name) {
        Some((_, slot)) => *slot = value,
        None => attrs.push((name.to_string(), value)),
    }
}

fn clamp(range: Range<usize>, len: usize) -> Range<usize> {
    let end = range.end.min(len);
    range.start.min(end)..end
}

impl Container for MemoryContainer {
    fn location(&self) -> &Path {
        &self.location
    }

    fn mode(&self) -> OpenMode {
        self.mode
    }

    fn kind(&self, path: &NodePath) -> Result<NodeKind> {
        Ok(self.tree.borrow().node(path)?.kind())
    }

    fn children(&self, group: &NodePath) -> Result<Vec<(String, NodeKind)>> {
        let tree = self.tree.borrow();
        match &tree.node(group)?.payload {
            Payload::Group(names) => names
                .iter()
                .map(|name| -> Result<(String, NodeKind)> {
                    Ok((name.clone(), tree.node(&group.join(name))?.kind()))
                })
                .collect(),
            Payload::Dataset { .. } => Err(Error::NotAGroup(group.to_string())),
        }
    }

    fn attributes(&self, path: &NodePath) -> Result<Vec<(String, Value)>> {
        Ok(self.tree.borrow().node(path)?.attrs.clone())
    }

    fn set_attribute(&mut self, path: &NodePath, name: &str, value: &Value) -> Result<()> {
        if self.mode == OpenMode::Read {
            return Err(Error::ReadOnly(self.location.display().to_string()));
        }
        let mut tree = self.tree.borrow_mut();
        let node = tree
            .nodes
            .get_mut(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        if node.fail_writes {
            return Err(Error::Backend(format!(
                "unable to write attribute {:?} on {}",
                name, path
            )));
        }
        upsert(&mut node.attrs, name, value.clone());
        Ok(())
    }

    fn shape(&self, path: &NodePath) -> Result<Vec<usize>> {
        let tree = self.tree.borrow();
        match &tree.node(path)?.payload {
            Payload::Dataset { shape, .. } => Ok(shape.clone()),
            Payload::Group(_) => Err(Error::NotADataset(path.to_string())),
        }
    }

    fn read_elements(&self, path: &NodePath, range: Range<usize>) -> Result<Vec<Value>> {
        self.with_dataset(path, 1, |_, data| data[clamp(range, data.len())].to_vec())
    }

    fn read_rows(&self, path: &NodePath, range: Range<usize>) -> Result<Vec<Vec<Value>>> {
        self.with_dataset(path, 2, |shape, data| {
            let cols = shape[1];
            clamp(range, shape[0])
                .map(|row| {
                    let cells = clamp(row * cols..(row + 1) * cols, data.len());
                    data[cells].to_vec()
                })
                .collect()
        })
    }
}

/// A set of in-memory files keyed by filesystem path.
///
/// Paths that were never inserted fail to open, which is how tests model
/// corrupt or non-HDF5 files that a folder scan still picks up.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: HashMap<PathBuf, MemoryContainer>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, container: MemoryContainer) {
        self.files.insert(path.into(), container);
    }

    /// A writable handle on the file at `path`, for inspecting results.
    pub fn get(&self, path: &Path) -> Option<MemoryContainer> {
        self.files
            .get(path)
            .map(|c| c.handle(path, OpenMode::ReadWrite))
    }
}

impl Store for MemoryStore {
    fn open(&self, path: &Path, mode: OpenMode) -> Result<Box<dyn Container>> {
        match self.files.get(path) {
            Some(container) => Ok(Box::new(container.handle(path, mode))),
            None => Err(Error::Open {
                path: path.to_path_buf(),
                reason: "not an HDF5 file".to_string(),
            }),
        }
    }
}
