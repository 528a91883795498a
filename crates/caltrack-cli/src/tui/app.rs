//! Application state and key handling
//!
//! `App` is the TUI's renderer: the coordinator pushes list, total, and form
//! state into it, and it turns key presses into intents.

use std::time::{Duration, Instant};

use caltrack_core::{FormInput, FormMode, Intent, Item, ItemId, Renderer};
use crossterm::event::{KeyCode, KeyModifiers};

/// Which area has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Form,
}

/// Which form field receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Calories,
}

impl Field {
    pub fn toggle(self) -> Self {
        match self {
            Field::Name => Field::Calories,
            Field::Calories => Field::Name,
        }
    }
}

/// One rendered list row, tagged with the item it shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: ItemId,
    pub name: String,
    pub calories: u32,
}

impl From<&Item> for Row {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            calories: item.calories,
        }
    }
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Which area has focus
    pub focus: Focus,
    /// Active form field
    pub field: Field,
    /// Create or edit
    pub mode: FormMode,
    /// Name field buffer
    pub name_input: String,
    /// Calories field buffer
    pub calories_input: String,
    /// Rendered rows
    pub rows: Vec<Row>,
    /// Whether the list is shown at all
    pub list_visible: bool,
    /// Highlighted row
    pub selected: usize,
    /// Total calories as last rendered
    pub total: u64,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Modal error message; any key dismisses it
    pub error_message: Option<String>,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Waiting for y/N after asking to clear everything
    pub confirm_clear: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            focus: Focus::List,
            field: Field::Name,
            mode: FormMode::Create,
            name_input: String::new(),
            calories_input: String::new(),
            rows: Vec::new(),
            list_visible: false,
            selected: 0,
            total: 0,
            status_message: None,
            status_message_time: None,
            error_message: None,
            show_help: false,
            confirm_clear: false,
        }
    }

    // ==================== Status ====================

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ==================== Selection ====================

    /// The row under the cursor
    pub fn current_row(&self) -> Option<&Row> {
        if !self.list_visible {
            return None;
        }
        self.rows.get(self.selected)
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected < self.rows.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    pub fn move_to_first(&mut self) {
        self.selected = 0;
    }

    pub fn move_to_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    // ==================== Form ====================

    /// Current form field contents
    pub fn form(&self) -> FormInput {
        FormInput::new(self.name_input.clone(), self.calories_input.clone())
    }

    fn active_input(&mut self) -> &mut String {
        match self.field {
            Field::Name => &mut self.name_input,
            Field::Calories => &mut self.calories_input,
        }
    }

    fn focus_form(&mut self) {
        self.focus = Focus::Form;
        self.field = Field::Name;
    }

    // ==================== Keys ====================

    /// Translate a key press into an intent, updating local state as needed
    pub fn on_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<Intent> {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        if self.confirm_clear {
            self.confirm_clear = false;
            if matches!(code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                return Some(Intent::RequestClear);
            }
            self.set_status("Clear cancelled");
            return None;
        }

        match self.focus {
            Focus::List => self.on_list_key(code),
            Focus::Form => self.on_form_key(code, modifiers),
        }
    }

    fn on_list_key(&mut self, code: KeyCode) -> Option<Intent> {
        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('g') | KeyCode::Home => self.move_to_first(),
            KeyCode::Char('G') | KeyCode::End => self.move_to_last(),
            KeyCode::Enter | KeyCode::Char('e') => {
                return self.current_row().map(|row| Intent::RequestEdit(row.id));
            }
            KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Tab => {
                self.focus_form();
            }
            KeyCode::Char('C') => {
                if self.rows.is_empty() {
                    self.set_status("Nothing to clear");
                } else {
                    self.confirm_clear = true;
                    self.set_status("Clear all items? [y/N]");
                }
            }
            KeyCode::Char('?') => self.toggle_help(),
            _ => {}
        }
        None
    }

    fn on_form_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<Intent> {
        match code {
            KeyCode::Esc => match self.mode {
                FormMode::Edit(_) => return Some(Intent::CancelEdit),
                FormMode::Create => {
                    self.focus = Focus::List;
                }
            },
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.field = self.field.toggle();
            }
            KeyCode::Enter => {
                let form = self.form();
                return Some(match self.mode {
                    FormMode::Create => Intent::SubmitNew(form),
                    FormMode::Edit(_) => Intent::SubmitUpdate(form),
                });
            }
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                if let FormMode::Edit(_) = self.mode {
                    return Some(Intent::RequestDelete);
                }
            }
            KeyCode::Backspace => {
                self.active_input().pop();
            }
            KeyCode::Char(c) => {
                self.active_input().push(c);
            }
            _ => {}
        }
        None
    }
}

impl Renderer for App {
    fn render_list(&mut self, items: &[Item]) {
        self.rows = items.iter().map(Row::from).collect();
        self.list_visible = true;
        if self.rows.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.rows.len() - 1);
        }
    }

    fn render_total(&mut self, total: u64) {
        self.total = total;
    }

    fn hide_list(&mut self) {
        self.list_visible = false;
    }

    fn show_create_mode(&mut self) {
        // Leaving edit mode hands focus back to the list
        if let FormMode::Edit(_) = self.mode {
            self.focus = Focus::List;
        }
        self.mode = FormMode::Create;
        self.name_input.clear();
        self.calories_input.clear();
        self.field = Field::Name;
    }

    fn show_edit_mode(&mut self, item: &Item) {
        self.mode = FormMode::Edit(item.id);
        self.name_input = item.name.clone();
        self.calories_input = item.calories.to_string();
        self.focus_form();
        if let Some(pos) = self.rows.iter().position(|row| row.id == item.id) {
            self.selected = pos;
        }
    }
}
