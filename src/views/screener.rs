use bevy_ecs::prelude::*;
use ratatui::{layout::Rect, widgets::TableState, Frame};
use tui_input::InputRequest;

use crate::data::Dashboard;
use crate::helper::cycle;
use crate::system::Key;
use crate::ui::rect::take_top;
use crate::widgets::{Loading, LoadingWidget, TextField};

use super::{banner, cards, filters, stocks::stock_table, table};

/// Which part of the screener receives keys
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Table,
    Search,
    Columns,
}

/// Interaction state kept across polls; reset when the screener is left.
#[derive(Debug, Default, Resource)]
pub struct ScreenerUi {
    focus: Focus,
    search: TextField,
    column_cursor: usize,
    table: TableState,
}

impl ScreenerUi {
    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected(&self) -> Option<usize> {
        self.table.selected()
    }

    pub fn handle(&mut self, key: Key, dashboard: &mut Dashboard) {
        match self.focus {
            Focus::Search => match key {
                Key::Enter | Key::Esc | Key::Tab | Key::BackTab => self.focus = Focus::Table,
                _ => (),
            },
            Focus::Columns => self.handle_columns(key, dashboard),
            Focus::Table => self.handle_table(key, dashboard),
        }
    }

    fn handle_table(&mut self, key: Key, dashboard: &mut Dashboard) {
        let len = dashboard.filtered().len();
        match key {
            Key::Up => self.table.select(cycle::prev(self.table.selected(), len)),
            Key::Down => self.table.select(cycle::next(self.table.selected(), len)),
            Key::Search | Key::Tab => self.focus = Focus::Search,
            Key::Columns | Key::BackTab => self.focus_columns(dashboard),
            Key::Esc if !dashboard.screener().term().is_empty() => {
                self.search.reset();
                dashboard.set_term("");
            }
            _ => (),
        }
    }

    fn focus_columns(&mut self, dashboard: &Dashboard) {
        if !dashboard.optional_columns().is_empty() {
            self.focus = Focus::Columns;
        }
    }

    fn handle_columns(&mut self, key: Key, dashboard: &mut Dashboard) {
        let optional: Vec<_> = dashboard.optional_columns().iter().map(|c| c.id).collect();
        let len = optional.len();
        match key {
            Key::Left => {
                self.column_cursor = cycle::prev(Some(self.column_cursor), len).unwrap_or(0);
            }
            Key::Right => {
                self.column_cursor = cycle::next(Some(self.column_cursor), len).unwrap_or(0);
            }
            Key::Space | Key::Enter => {
                if let Some(&id) = optional.get(self.column_cursor) {
                    dashboard.toggle_column(id);
                }
            }
            Key::Esc | Key::Tab | Key::Columns => self.focus = Focus::Table,
            Key::BackTab | Key::Search => self.focus = Focus::Search,
            _ => (),
        }
    }

    /// Text edit while the search box is focused; the filter follows every change
    pub fn input(&mut self, request: InputRequest, dashboard: &mut Dashboard) {
        if self.focus != Focus::Search {
            return;
        }
        if self.search.handle(request) {
            dashboard.set_term(self.search.value());
        }
    }

    pub fn render(&mut self, frame: &mut Frame, rect: Rect, dashboard: &Dashboard, loading: &Loading) {
        if dashboard.state().is_loading() && dashboard.stocks().is_empty() {
            frame.render_widget(LoadingWidget::new(loading, t!("Screener.Loading")), rect);
            return;
        }

        let mut rest = rect;
        if let Some(error) = dashboard.state().error() {
            let (top, remaining) = take_top(1, rest);
            banner::render(frame, top, error, !dashboard.stocks().is_empty());
            rest = remaining;
        }

        let (top, remaining) = take_top(3, rest);
        cards::render(frame, top, &dashboard.summary());
        rest = remaining;

        let optional = dashboard.optional_columns();
        self.column_cursor = self.column_cursor.min(optional.len().saturating_sub(1));
        let (top, remaining) = take_top(3, rest);
        filters::render(
            frame,
            top,
            &self.search,
            self.focus == Focus::Search,
            &optional,
            dashboard.screener(),
            (self.focus == Focus::Columns).then_some(self.column_cursor),
        );
        rest = remaining;

        let filtered = dashboard.filtered();
        self.table
            .select(cycle::clamp(self.table.selected(), filtered.len()));
        let empty = if dashboard.missing_columns() {
            t!("Screener.NoColumns")
        } else if dashboard.stocks().is_empty() {
            t!("Screener.Empty")
        } else {
            t!("Screener.NoMatch", term = dashboard.screener().term())
        };
        let model = stock_table(&filtered, dashboard.visible_columns(), dashboard.columns());
        let title = t!(
            "Screener.Title",
            shown = filtered.len().to_string(),
            total = dashboard.stocks().len().to_string()
        );
        table::render(frame, rest, &model, &mut self.table, title, empty);
    }
}
