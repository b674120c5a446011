use h5tool::tree::{self, TreeItem};
use h5tool::{Container, MemoryContainer, NodeKind, NodePath};

fn nested() -> MemoryContainer {
    let mut c = MemoryContainer::new();
    c.add_group("/zeta")
        .add_dataset_1d("/zeta/b", vec![1i64, 2])
        .add_dataset_1d("/zeta/a", vec![3i64])
        .add_group("/alpha/inner")
        .add_dataset_2d("/alpha/inner/grid", vec![vec![1.0f64, 2.0]])
        .add_dataset_1d("/top", vec!["x"]);
    c
}

#[test]
fn projection_mirrors_nesting_in_native_order() {
    let c = nested();
    let items = tree::project(&c).unwrap();

    let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
    // Insertion order, not alphabetical.
    assert_eq!(labels, vec!["zeta", "alpha", "top"]);

    let zeta = &items[0];
    assert_eq!(zeta.kind, NodeKind::Group);
    let zeta_children: Vec<&str> = zeta.children.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(zeta_children, vec!["b", "a"]);
    assert_eq!(zeta.children[0].path, NodePath::new("/zeta/b"));
    assert_eq!(zeta.children[0].kind, NodeKind::Dataset);
    assert!(zeta.children[0].children.is_empty());

    let grid = tree::find(&items, &NodePath::new("/alpha/inner/grid")).unwrap();
    assert_eq!(grid.label, "grid");
    assert_eq!(grid.kind, NodeKind::Dataset);
}

#[test]
fn items_resolve_back_to_container_nodes() {
    let mut c = nested();
    c.set_attr("/alpha/inner", "unit", "m");
    let items = tree::project(&c).unwrap();

    let inner = tree::find(&items, &NodePath::new("/alpha/inner")).unwrap();
    assert_eq!(c.kind(&inner.path).unwrap(), NodeKind::Group);
    let attrs = c.attributes(&inner.path).unwrap();
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs[0].0, "unit");
}

#[test]
fn walk_visits_depth_first_with_depths() {
    let c = nested();
    let items = tree::project(&c).unwrap();

    let mut seen: Vec<(usize, String)> = Vec::new();
    for item in &items {
        item.walk(&mut |depth: usize, node: &TreeItem| {
            seen.push((depth, node.path.to_string()));
        });
    }
    assert_eq!(
        seen,
        vec![
            (0, "/zeta".to_string()),
            (1, "/zeta/b".to_string()),
            (1, "/zeta/a".to_string()),
            (0, "/alpha".to_string()),
            (1, "/alpha/inner".to_string()),
            (2, "/alpha/inner/grid".to_string()),
            (0, "/top".to_string()),
        ]
    );
}

#[test]
fn empty_container_projects_to_empty_tree() {
    let c = MemoryContainer::new();
    assert!(tree::project(&c).unwrap().is_empty());
}
