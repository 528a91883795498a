//! View contract
//!
//! The rendering surface is external: anything that can show a list, a
//! total, and a two-state form implements [`Renderer`]. User actions come
//! back as [`Intent`] values for the coordinator to handle.
//!
//! ## Form modes
//!
//! ```text
//! Create --request-edit--> Edit --submit-update / request-delete / cancel-edit--> Create
//! ```

use crate::models::{Item, ItemId};

/// Raw text of the name and calories fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub name: String,
    pub calories: String,
}

impl FormInput {
    pub fn new(name: impl Into<String>, calories: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calories: calories.into(),
        }
    }

    /// Field values pre-populated from an existing item
    pub fn from_item(item: &Item) -> Self {
        Self::new(item.name.clone(), item.calories.to_string())
    }
}

/// A user action surfaced by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Add a new item from the form fields
    SubmitNew(FormInput),
    /// Start editing the item behind a row
    RequestEdit(ItemId),
    /// Save the form fields over the item being edited
    SubmitUpdate(FormInput),
    /// Delete the item being edited
    RequestDelete,
    /// Delete every item
    RequestClear,
    /// Leave edit mode without saving
    CancelEdit,
}

/// Which state the form is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(ItemId),
}

/// A surface the coordinator renders into
pub trait Renderer {
    /// Show the list, one distinguishable row per item, and make it visible
    fn render_list(&mut self, items: &[Item]);

    /// Show the total calorie count
    fn render_total(&mut self, total: u64);

    /// Hide the list area
    fn hide_list(&mut self);

    /// Switch the form to create mode with blank fields
    fn show_create_mode(&mut self);

    /// Switch the form to edit mode, fields filled from `item`
    fn show_edit_mode(&mut self, item: &Item);
}
