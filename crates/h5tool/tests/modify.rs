use std::fs;
use std::path::{Path, PathBuf};

use h5tool::batch::{ModifyJob, NoProgress, ProgressLog, run_batch_modify};
use h5tool::{Container, Error, MemoryContainer, MemoryStore, NodePath, Value};

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"").unwrap();
    path
}

fn job(folder: &Path, name: &str, value: &str) -> ModifyJob {
    ModifyJob {
        folder: folder.to_path_buf(),
        suffix: "h5".to_string(),
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn attr(store: &MemoryStore, file: &Path, node: &str, name: &str) -> Option<Value> {
    store
        .get(file)
        .unwrap()
        .attribute(&NodePath::new(node), name)
        .unwrap()
}

#[test]
fn sets_the_attribute_on_every_top_level_node() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(dir.path(), "f.h5");

    let mut c = MemoryContainer::new();
    c.add_group("g")
        .add_dataset_1d("d", vec![1i64])
        .add_dataset_1d("g/inner", vec![2i64]);
    let mut store = MemoryStore::new();
    store.insert(&file, c);

    let summary = run_batch_modify(&store, &job(dir.path(), "owner", "lab"), &mut NoProgress).unwrap();

    assert_eq!(summary.modified, 1);
    assert_eq!(summary.nodes_modified, 2);
    assert_eq!(attr(&store, &file, "g", "owner"), Some(Value::from("lab")));
    assert_eq!(attr(&store, &file, "d", "owner"), Some(Value::from("lab")));
    assert_eq!(attr(&store, &file, "g/inner", "owner"), None);
}

#[test]
fn existing_attributes_keep_their_type() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(dir.path(), "f.h5");

    let mut c = MemoryContainer::new();
    c.add_group("g").set_attr("g", "version", 1i64);
    let mut store = MemoryStore::new();
    store.insert(&file, c);

    run_batch_modify(&store, &job(dir.path(), "version", "2"), &mut NoProgress).unwrap();
    assert_eq!(attr(&store, &file, "g", "version"), Some(Value::Int(2)));

    let summary = run_batch_modify(&store, &job(dir.path(), "version", "two"), &mut NoProgress).unwrap();
    assert_eq!(summary.modified, 0);
    assert!(matches!(summary.failures[0].error, Error::Conversion { .. }));
    assert_eq!(attr(&store, &file, "g", "version"), Some(Value::Int(2)));
}

#[test]
fn a_failing_node_keeps_earlier_writes_and_other_files_continue() {
    let dir = tempfile::tempdir().unwrap();
    let partial = touch(dir.path(), "a.h5");
    let unreadable = touch(dir.path(), "b.h5");
    let fine = touch(dir.path(), "c.h5");

    let mut a = MemoryContainer::new();
    a.add_group("first").add_group("second").add_group("third");
    a.fail_attribute_writes("second");
    let mut c = MemoryContainer::new();
    c.add_group("only");
    let mut store = MemoryStore::new();
    store.insert(&partial, a);
    store.insert(&fine, c);

    let mut progress = ProgressLog::default();
    let summary = run_batch_modify(&store, &job(dir.path(), "tag", "x"), &mut progress).unwrap();

    assert_eq!(summary.matched, 3);
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.modified, 1);
    assert_eq!(summary.nodes_modified, 2);
    let failed: Vec<_> = summary.failures.iter().map(|f| f.path.clone()).collect();
    assert_eq!(failed, vec![partial.clone(), unreadable]);

    // not rolled back
    assert_eq!(attr(&store, &partial, "first", "tag"), Some(Value::from("x")));
    assert_eq!(attr(&store, &partial, "second", "tag"), None);
    assert_eq!(attr(&store, &partial, "third", "tag"), None);
    assert_eq!(attr(&store, &fine, "only", "tag"), Some(Value::from("x")));

    assert_eq!(progress.processed, 3);
    assert!(progress.lines.iter().any(|l| l == "modified file: c.h5"));
}

#[test]
fn required_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();

    for bad in [
        job(dir.path(), "", "v"),
        job(dir.path(), "name", ""),
        ModifyJob {
            suffix: String::new(),
            ..job(dir.path(), "name", "v")
        },
        job(Path::new(""), "name", "v"),
    ] {
        assert!(matches!(
            run_batch_modify(&store, &bad, &mut NoProgress),
            Err(Error::InvalidInput(_))
        ));
    }
}
