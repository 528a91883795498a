//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use caltrack_core::FormMode;

use super::app::{App, Field, Focus};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    // Status bar at the bottom
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    // Form and total on top, list below
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(outer_chunks[0]);

    draw_form(frame, app, main_chunks[0]);
    draw_total(frame, app, main_chunks[1]);
    draw_list(frame, app, main_chunks[2]);
    draw_status_bar(frame, app, outer_chunks[1]);

    if app.show_help {
        draw_help_overlay(frame);
    }

    if let Some(msg) = &app.error_message {
        draw_error_overlay(frame, msg);
    }
}

/// Width of the "Meal:     " / "Calories: " labels
const FIELD_LABEL_WIDTH: u16 = 10;

fn border_style(active: bool) -> Style {
    if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// Draw the add/edit form
fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.focus == Focus::Form;

    let (title, title_style) = match app.mode {
        FormMode::Create => (" Add Meal / Food Item ".to_string(), Style::default()),
        FormMode::Edit(id) => (
            format!(" Edit Item {} ", id),
            Style::default().fg(Color::Yellow),
        ),
    };

    let block = Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    let field_line = |label: &'static str, value: &str, field: Field| {
        let selected = is_active && app.field == field;
        let label_style = if selected {
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        Line::from(vec![
            Span::styled(label, label_style),
            Span::raw(value.to_string()),
        ])
    };

    let hint = match app.mode {
        FormMode::Create => "Enter: add meal  Esc: back to list",
        FormMode::Edit(_) => "Enter: update  Ctrl-d: delete  Esc: back",
    };

    let lines = vec![
        field_line("Meal:     ", &app.name_input, Field::Name),
        field_line("Calories: ", &app.calories_input, Field::Calories),
        Line::from(""),
        Line::from(Span::styled(
            hint,
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(lines).block(block), area);

    // Place the cursor at the end of the active field
    if is_active && app.error_message.is_none() && !app.show_help {
        let (row, len) = match app.field {
            Field::Name => (0, app.name_input.chars().count()),
            Field::Calories => (1, app.calories_input.chars().count()),
        };
        frame.set_cursor_position((cursor_x(inner, len), inner.y + row));
    }
}

/// Draw the total calories line
fn draw_total(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            "Total Calories: ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.total.to_string(), Style::default().fg(Color::Green)),
    ]);

    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Draw the item list
fn draw_list(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.focus == Focus::List;

    let block = Block::default()
        .title(format!(" Items ({}) ", app.rows.len()))
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    if !app.list_visible {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No items yet. Press 'a' to add one.",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(empty, area);
        return;
    }

    let editing = match app.mode {
        FormMode::Edit(id) => Some(id),
        FormMode::Create => None,
    };

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| {
            let marker = if editing == Some(row.id) { "✎ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    format!("{}: ", row.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{} Calories", row.calories),
                    Style::default().add_modifier(Modifier::ITALIC),
                ),
                Span::styled(
                    format!("  #{}", row.id),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]))
        })
        .collect();

    let highlight_style = if is_active {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style);

    let mut state = ListState::default();
    if !app.rows.is_empty() {
        state.select(Some(app.selected));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        match app.focus {
            Focus::List => "a:add  e:edit  C:clear all  ?:help  q:quit".to_string(),
            Focus::Form => "Tab:next field  Enter:submit  Esc:back".to_string(),
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Centered popup area
/// Column of the cursor after `len` typed characters, kept inside `inner`
fn cursor_x(inner: Rect, len: usize) -> u16 {
    let len = u16::try_from(len).unwrap_or(u16::MAX);
    inner
        .x
        .saturating_add(FIELD_LABEL_WIDTH)
        .saturating_add(len)
        .min(inner.right().saturating_sub(1))
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = popup_area(frame.area(), 46, 19);
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("List:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  g/G         First/last item"),
        Line::from("  Enter, e    Edit selected item"),
        Line::from("  a, i, Tab   Add a new item"),
        Line::from("  C           Clear all items"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from("Form:"),
        Line::from("  Tab         Switch field"),
        Line::from("  Enter       Add / Update"),
        Line::from("  Ctrl-d      Delete (while editing)"),
        Line::from("  Esc         Back / Cancel edit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Draw an error popup
fn draw_error_overlay(frame: &mut Frame, message: &str) {
    let area = popup_area(frame.area(), 60, 7);
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(Span::styled(message, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
