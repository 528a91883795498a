//! One-shot command handlers
//!
//! Each command opens a coordinator over the configured data directory,
//! drives it with intents, and prints what the `ListView` renderer was
//! last told to show.

pub mod config;
pub mod item;

use caltrack_core::{Config, Coordinator, FileSlots, FormInput, Item, ItemPersistence, Renderer};

/// Renderer that keeps the latest view state for printing afterwards
#[derive(Debug, Default)]
pub struct ListView {
    pub items: Vec<Item>,
    pub visible: bool,
    pub total: u64,
    pub form: FormInput,
}

impl Renderer for ListView {
    fn render_list(&mut self, items: &[Item]) {
        self.items = items.to_vec();
        self.visible = true;
    }

    fn render_total(&mut self, total: u64) {
        self.total = total;
    }

    fn hide_list(&mut self) {
        self.visible = false;
    }

    fn show_create_mode(&mut self) {
        self.form = FormInput::default();
    }

    fn show_edit_mode(&mut self, item: &Item) {
        self.form = FormInput::from_item(item);
    }
}

pub type CliCoordinator = Coordinator<ListView, FileSlots>;

/// Open a coordinator over the configured data directory
pub fn open(config: &Config) -> CliCoordinator {
    let persistence = ItemPersistence::new(config.items_slots());
    Coordinator::new(persistence, ListView::default())
}
