/// Terminal rendering of the consumer models

pub mod containers;
pub mod dashboard;
pub mod processes;
pub mod system;
pub mod terminal;
pub mod theme;

use std::io;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::widgets::{Scrollable, TableModel, TableRow};

pub use terminal::TerminalSink;
pub use theme::Theme;

/// Paints a model. Called once per model update and once per resize;
/// implementations must return within a frame.
pub trait RenderSink<M: ?Sized> {
    fn render(&mut self, model: &M) -> io::Result<()>;
}

/// Rectangle of `percent_x` by `percent_y` centered in `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Draw the visible window of `model` with its annotated header
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_table<R: TableRow + Clone>(
    frame: &mut Frame,
    area: Rect,
    model: &TableModel<R>,
    widths: &[Constraint],
    title: String,
    theme: &Theme,
    active: bool,
    killing: bool,
) {
    let header = Row::new(model.header()).style(theme.header_style()).bottom_margin(1);

    let rows: Vec<Row> = model
        .visible_rows()
        .map(|(idx, row)| {
            let cells: Vec<Cell> = row
                .cells()
                .into_iter()
                .enumerate()
                .map(|(col, text)| match theme.tone_color(row.tone(col)) {
                    Some(color) => Cell::from(text).style(Style::default().fg(color)),
                    None => Cell::from(text),
                })
                .collect();
            let r = Row::new(cells);
            if model.cursor_enabled() && idx == model.selected() {
                r.style(theme.cursor_style(killing))
            } else {
                r
            }
        })
        .collect();

    let table = Table::new(rows, widths.to_vec()).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(active))
            .title(title),
    );

    frame.render_widget(table, area);
}

/// " Title 1-20 of 312 "
pub(crate) fn location_title<R: TableRow + Clone>(name: &str, model: &TableModel<R>) -> String {
    let (first, last, total) = model.location();
    format!(" {} {}-{} of {} ", name, first, last, total)
}
