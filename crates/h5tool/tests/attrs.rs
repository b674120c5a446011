use h5tool::attrs::{AttributeRow, AttributeTable, EditOutcome, PendingEdit, SaveOutcome};
use h5tool::{Container, Error, MemoryContainer, NodePath, OpenMode, Value};

fn scenario() -> MemoryContainer {
    let mut c = MemoryContainer::new();
    c.add_group("/a")
        .set_attr("/a", "unit", "m")
        .set_attr("/a", "scale", 2i64)
        .set_attr("/a", "offset", 0.5f64)
        .add_dataset_2d(
            "/a/x",
            vec![vec![1i64, 2], vec![3, 4], vec![5, 6]],
        );
    c
}

fn row(name: &str, value: &str) -> AttributeRow {
    AttributeRow {
        name: name.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn show_attributes_lists_map_in_order_as_text() {
    let c = scenario();
    let mut table = AttributeTable::new();
    table.select(&c, &NodePath::new("/a")).unwrap();

    assert_eq!(
        table.rows(),
        &[row("unit", "m"), row("scale", "2"), row("offset", "0.5")]
    );
    assert_eq!(table.current(), Some(&NodePath::new("/a")));
    assert!(!table.is_dirty());
}

#[test]
fn confirmed_edit_is_written_with_stored_type() {
    let mut c = scenario();
    let mut table = AttributeTable::new();
    let a = NodePath::new("/a");
    table.select(&c, &a).unwrap();

    let mut asked = Vec::new();
    let outcome = table
        .on_cell_edited(&mut c, 1, " 7 ", &mut |edit: &PendingEdit| {
            asked.push(edit.clone());
            true
        })
        .unwrap();

    assert_eq!(
        outcome,
        EditOutcome::Saved {
            name: "scale".to_string(),
            value: Value::Int(7),
        }
    );
    assert_eq!(
        asked,
        vec![PendingEdit {
            row: 1,
            name: "scale".to_string(),
            new_value: " 7 ".to_string(),
        }]
    );
    assert_eq!(c.attribute(&a, "scale").unwrap(), Some(Value::Int(7)));
    assert_eq!(table.rows()[1], row("scale", "7"));
    assert!(table.is_dirty());
    assert_eq!(table.modified(), &[("scale".to_string(), Value::Int(7))]);

    // Overwriting keeps the attribute's position.
    let names: Vec<String> = c.attributes(&a).unwrap().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["unit", "scale", "offset"]);
}

#[test]
fn cancelled_edit_leaves_map_untouched_and_restores_cell() {
    let mut c = scenario();
    let a = NodePath::new("/a");
    let before = c.attributes(&a).unwrap();
    let mut table = AttributeTable::new();
    table.select(&c, &a).unwrap();

    let outcome = table
        .on_cell_edited(&mut c, 0, "km", &mut |_: &PendingEdit| false)
        .unwrap();

    assert_eq!(
        outcome,
        EditOutcome::Reverted {
            name: "unit".to_string(),
            restored: "m".to_string(),
        }
    );
    assert_eq!(c.attributes(&a).unwrap(), before);
    assert_eq!(table.rows()[0], row("unit", "m"));
    assert!(!table.is_dirty());
    assert!(table.modified().is_empty());
}

#[test]
fn edit_without_selection_is_ignored() {
    let mut c = scenario();
    let mut table = AttributeTable::new();
    let mut called = false;

    let outcome = table
        .on_cell_edited(&mut c, 0, "x", &mut |_: &PendingEdit| {
            called = true;
            true
        })
        .unwrap();

    assert_eq!(outcome, EditOutcome::Ignored);
    assert!(!called);
}

#[test]
fn edit_of_missing_row_is_ignored() {
    let mut c = scenario();
    let mut table = AttributeTable::new();
    table.select(&c, &NodePath::new("/a")).unwrap();

    let outcome = table
        .on_cell_edited(&mut c, 10, "x", &mut |_: &PendingEdit| true)
        .unwrap();
    assert_eq!(outcome, EditOutcome::Ignored);
}

#[test]
fn unconvertible_text_is_rejected_and_cell_restored() {
    let mut c = scenario();
    let a = NodePath::new("/a");
    let mut table = AttributeTable::new();
    table.select(&c, &a).unwrap();

    let err = table
        .on_cell_edited(&mut c, 2, "half", &mut |_: &PendingEdit| true)
        .unwrap_err();

    assert!(matches!(err, Error::Conversion { .. }));
    assert_eq!(c.attribute(&a, "offset").unwrap(), Some(Value::Float(0.5)));
    assert_eq!(table.rows()[2], row("offset", "0.5"));
    assert!(!table.is_dirty());
}

#[test]
fn write_to_read_only_container_fails_and_restores() {
    let c = scenario();
    let mut read_only = c.handle(std::path::Path::new("ro.h5"), OpenMode::Read);
    let a = NodePath::new("/a");
    let mut table = AttributeTable::new();
    table.select(&read_only, &a).unwrap();

    let err = table
        .on_cell_edited(&mut read_only, 0, "km", &mut |_: &PendingEdit| true)
        .unwrap_err();

    assert!(matches!(err, Error::ReadOnly(_)));
    assert_eq!(table.rows()[0], row("unit", "m"));
}

#[test]
fn selecting_another_node_clears_edit_state() {
    let mut c = scenario();
    c.set_attr("/a/x", "long_name", "grid");
    let mut table = AttributeTable::new();
    table.select(&c, &NodePath::new("/a")).unwrap();
    table
        .on_cell_edited(&mut c, 0, "cm", &mut |_: &PendingEdit| true)
        .unwrap();
    assert!(table.is_dirty());

    table.select(&c, &NodePath::new("/a/x")).unwrap();
    assert!(!table.is_dirty());
    assert!(table.modified().is_empty());
    assert_eq!(table.rows(), &[row("long_name", "grid")]);
}

#[test]
fn save_reports_nothing_when_clean() {
    let mut c = scenario();
    let mut table = AttributeTable::new();
    assert_eq!(table.save_changes(&mut c).unwrap(), SaveOutcome::NothingToSave);

    table.select(&c, &NodePath::new("/a")).unwrap();
    assert_eq!(table.save_changes(&mut c).unwrap(), SaveOutcome::NothingToSave);
}

#[test]
fn save_writes_pending_changes_once() {
    let mut c = scenario();
    let a = NodePath::new("/a");
    let mut table = AttributeTable::new();
    table.select(&c, &a).unwrap();
    table
        .on_cell_edited(&mut c, 0, "cm", &mut |_: &PendingEdit| true)
        .unwrap();
    table
        .on_cell_edited(&mut c, 1, "3", &mut |_: &PendingEdit| true)
        .unwrap();

    assert_eq!(table.save_changes(&mut c).unwrap(), SaveOutcome::Saved(2));
    assert!(!table.is_dirty());
    assert_eq!(c.attribute(&a, "unit").unwrap(), Some(Value::from("cm")));
    assert_eq!(table.save_changes(&mut c).unwrap(), SaveOutcome::NothingToSave);
}
