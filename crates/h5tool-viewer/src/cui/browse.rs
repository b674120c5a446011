//! Headless browsing: tree, attributes, single attribute edits and pages.
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, ContentArrangement, Table, presets::NOTHING};
use unicode_width::UnicodeWidthStr;

use h5tool::pager::DatasetPager;
use h5tool::{Container, EditOutcome, NodePath, OpenMode, PendingEdit, SaveOutcome, Session, Store};

use super::pad_to_width;

fn open_read(store: &dyn Store, file: &Path) -> Result<Box<dyn Container>> {
    store
        .open(file, OpenMode::Read)
        .with_context(|| format!("failed to open {}", file.display()))
}

/// Print the tree, one node per line, indented by depth, with the node kind
/// in an aligned second column.
pub fn print_tree(store: &dyn Store, file: &Path) -> Result<()> {
    let container = open_read(store, file)?;
    let items = h5tool::tree::project(container.as_ref())?;

    let mut lines = Vec::new();
    for item in &items {
        item.walk(&mut |depth, node| {
            lines.push((format!("{}{}", "  ".repeat(depth), node.label), node.kind));
        });
    }
    let width = lines
        .iter()
        .map(|(label, _)| UnicodeWidthStr::width(label.as_str()))
        .max()
        .unwrap_or(0);

    println!("{}", file.display());
    for (label, kind) in lines {
        println!("  {}  {}", pad_to_width(&label, width), kind);
    }
    Ok(())
}

pub fn print_attrs(store: &dyn Store, file: &Path, node: &str) -> Result<()> {
    let container = open_read(store, file)?;
    let path = NodePath::new(node);
    let attrs = container
        .attributes(&path)
        .with_context(|| format!("failed to read attributes of {}", path))?;

    if attrs.is_empty() {
        println!("{}: no attributes", path);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Name"), Cell::new("Value"), Cell::new("Type")]);
    for (name, value) in attrs {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(value.to_string()),
            Cell::new(value.kind().to_string()),
        ]);
    }
    println!("{}", table);
    Ok(())
}

/// Ask `question` on stdin; anything but y/yes declines.
fn ask(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// Change an existing attribute through the same confirm/revert path the
/// browser uses.
pub fn set_attr(
    store: &dyn Store,
    file: &Path,
    node: &str,
    name: &str,
    value: &str,
    yes: bool,
) -> Result<()> {
    let mut session = Session::open(store, file, 1)
        .with_context(|| format!("failed to open {}", file.display()))?;
    let path = NodePath::new(node);
    session.select(&path)?;

    let Some(row) = session.attributes().rows().iter().position(|r| r.name == name) else {
        bail!(
            "{} has no attribute {:?}; use `modify` to create attributes",
            path,
            name
        );
    };
    let old = session.attributes().rows()[row].value.clone();

    let mut confirm = |edit: &PendingEdit| {
        yes || ask(&format!(
            "change {} of {} from {:?} to {:?}?",
            edit.name, path, old, edit.new_value
        ))
    };
    match session.edit(row, value, &mut confirm)? {
        EditOutcome::Saved { name, value } => {
            if let SaveOutcome::Saved(n) = session.save()? {
                log::debug!("flushed {} attribute(s)", n);
            }
            println!("{}: {} = {}", path, name, value);
        }
        EditOutcome::Reverted { name, restored } => {
            println!("{}: {} unchanged ({})", path, name, restored);
        }
        EditOutcome::Ignored => {}
    }
    Ok(())
}

/// Print page `page` of `dataset`, each row prefixed with its index.
pub fn view_page(
    store: &dyn Store,
    file: &Path,
    dataset: &str,
    page: usize,
    page_size: usize,
) -> Result<()> {
    let container = open_read(store, file)?;
    let path = NodePath::new(dataset);
    let pager = DatasetPager::open(container.as_ref(), &path, page_size)?;
    let rendered = pager.display_page(container.as_ref(), page)?;

    if rendered.is_empty() {
        println!(
            "{}: page {} is empty ({} row(s), {} per page)",
            path,
            page,
            pager.total(),
            pager.window().page_size
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = vec![Cell::new("#")];
    header.extend(rendered.headers.iter().map(Cell::new));
    table.set_header(header);
    for (i, row) in rendered.rows.iter().enumerate() {
        let mut cells = vec![Cell::new(rendered.first_row + i)];
        cells.extend(row.iter().map(Cell::new));
        table.add_row(cells);
    }
    println!("{}", table);
    Ok(())
}
