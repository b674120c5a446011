//! Display tree projected from a container's group/dataset hierarchy.
use crate::container::{Container, NodeKind, NodePath};
use crate::error::Result;

/// One node of the display tree.
///
/// The item refers back to its container object by [`NodePath`] only; kind
/// is cached, attributes and contents are fetched on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeItem {
    pub label: String,
    pub path: NodePath,
    pub kind: NodeKind,
    pub children: Vec<TreeItem>,
}

impl TreeItem {
    /// Find the item for `path` in this subtree.
    pub fn find(&self, path: &NodePath) -> Option<&TreeItem> {
        if &self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }

    /// Depth-first pre-order traversal; `visit` receives the depth (0 for
    /// this item).
    pub fn walk(&self, visit: &mut impl FnMut(usize, &TreeItem)) {
        self.walk_at(0, visit);
    }

    fn walk_at(&self, depth: usize, visit: &mut impl FnMut(usize, &TreeItem)) {
        visit(depth, self);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }
}

/// Project `container` into a display tree.
///
/// The returned items are the container's top-level nodes; groups are
/// expanded recursively in the order the container enumerates them. Only
/// structural metadata is read.
pub fn project(container: &dyn Container) -> Result<Vec<TreeItem>> {
    project_group(container, &NodePath::root())
}

fn project_group(container: &dyn Container, group: &NodePath) -> Result<Vec<TreeItem>> {
    let mut items = Vec::new();
    for (name, kind) in container.children(group)? {
        let path = group.join(&name);
        let children = match kind {
            NodeKind::Group => project_group(container, &path)?,
            NodeKind::Dataset => Vec::new(),
        };
        log::debug!("projected {} {}", kind, path);
        items.push(TreeItem {
            label: name,
            path,
            kind,
            children,
        });
    }
    Ok(items)
}

/// Look `path` up in a projected forest.
pub fn find<'a>(items: &'a [TreeItem], path: &NodePath) -> Option<&'a TreeItem> {
    items.iter().find_map(|item| item.find(path))
}
