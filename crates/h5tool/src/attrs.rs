//! Editable attribute table for the selected node.
//!
//! The table mirrors the selected node's attribute map as `(name, text)`
//! rows. Edits are routed through [`AttributeTable::on_cell_edited`], which
//! asks a [`Confirm`] capability before touching the container and restores
//! the cell from the stored value when the edit is declined.
use crate::container::{Container, NodePath};
use crate::error::Result;
use crate::value::Value;

/// One row of the table: attribute name and its text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRow {
    pub name: String,
    pub value: String,
}

/// An edit waiting for the user's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub row: usize,
    pub name: String,
    pub new_value: String,
}

/// Yes/no decision on a pending edit.
pub trait Confirm {
    fn confirm(&mut self, edit: &PendingEdit) -> bool;
}

impl<F: FnMut(&PendingEdit) -> bool> Confirm for F {
    fn confirm(&mut self, edit: &PendingEdit) -> bool {
        self(edit)
    }
}

/// Result of [`AttributeTable::on_cell_edited`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The value was written to the container.
    Saved { name: String, value: Value },
    /// The user declined; the cell shows the stored value again.
    Reverted { name: String, restored: String },
    /// No node selected or no such row.
    Ignored,
}

/// Result of [`AttributeTable::save_changes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// This many modified attributes were written and flushed.
    Saved(usize),
    NothingToSave,
}

/// Attribute rows of the selected node plus its edit state.
#[derive(Debug, Default, Clone)]
pub struct AttributeTable {
    rows: Vec<AttributeRow>,
    current: Option<NodePath>,
    dirty: bool,
    modified: Vec<(String, Value)>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[AttributeRow] {
        &self.rows
    }

    /// Node whose attributes are shown.
    pub fn current(&self) -> Option<&NodePath> {
        self.current.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Attributes confirmed since the node was selected, in edit order.
    pub fn modified(&self) -> &[(String, Value)] {
        &self.modified
    }

    /// Make `path` the current node: resets the edit state and shows its
    /// attributes.
    pub fn select(&mut self, container: &dyn Container, path: &NodePath) -> Result<()> {
        self.dirty = false;
        self.modified.clear();
        self.current = Some(path.clone());
        self.show_attributes(container, path)
    }

    /// Replace the rows with the attribute map of `path`, in map order.
    ///
    /// Cells are written directly rather than through the edit path, so
    /// repopulating never produces an edit.
    pub fn show_attributes(&mut self, container: &dyn Container, path: &NodePath) -> Result<()> {
        self.rows.clear();
        self.rows = container
            .attributes(path)?
            .into_iter()
            .map(|(name, value)| AttributeRow {
                name,
                value: value.to_string(),
            })
            .collect();
        Ok(())
    }

    /// The value cell of `row` was changed to `new_value`.
    ///
    /// On confirmation the text is converted to the attribute's stored type
    /// and written (creating the attribute if it vanished meanwhile). On
    /// refusal, or if conversion or writing fails, the cell is reset to the
    /// stored value and the container is left as it was.
    pub fn on_cell_edited(
        &mut self,
        container: &mut dyn Container,
        row: usize,
        new_value: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<EditOutcome> {
        let Some(path) = self.current.clone() else {
            return Ok(EditOutcome::Ignored);
        };
        let Some(name) = self.rows.get(row).map(|r| r.name.clone()) else {
            return Ok(EditOutcome::Ignored);
        };

        self.rows[row].value = new_value.to_string();
        let pending = PendingEdit {
            row,
            name: name.clone(),
            new_value: new_value.to_string(),
        };
        if !confirm.confirm(&pending) {
            let restored = self.restore(container, &path, row)?;
            return Ok(EditOutcome::Reverted { name, restored });
        }

        let written = container
            .attribute(&path, &name)
            .and_then(|existing| Value::parse_like(&name, existing.as_ref(), new_value))
            .and_then(|value| {
                container.set_attribute(&path, &name, &value)?;
                Ok(value)
            });
        match written {
            Ok(value) => {
                self.rows[row].value = value.to_string();
                self.dirty = true;
                match self.modified.iter_mut().find(|(n, _)| *n == name) {
                    Some((_, slot)) => *slot = value.clone(),
                    None => self.modified.push((name.clone(), value.clone())),
                }
                log::info!("{}: set {} = {}", path, name, value);
                Ok(EditOutcome::Saved { name, value })
            }
            Err(e) => {
                self.restore(container, &path, row)?;
                Err(e)
            }
        }
    }

    /// Write the confirmed edits of the current node again and flush the
    /// container.
    pub fn save_changes(&mut self, container: &mut dyn Container) -> Result<SaveOutcome> {
        let Some(path) = self.current.as_ref().filter(|_| self.dirty) else {
            return Ok(SaveOutcome::NothingToSave);
        };
        for (name, value) in &self.modified {
            container.set_attribute(path, name, value)?;
        }
        container.flush()?;
        self.dirty = false;
        Ok(SaveOutcome::Saved(self.modified.len()))
    }

    /// Reset the cell of `row` to the value stored in the container.
    fn restore(&mut self, container: &dyn Container, path: &NodePath, row: usize) -> Result<String> {
        let name = &self.rows[row].name;
        let stored = container
            .attribute(path, name)?
            .map(|v| v.to_string())
            .unwrap_or_default();
        self.rows[row].value = stored.clone();
        Ok(stored)
    }
}
