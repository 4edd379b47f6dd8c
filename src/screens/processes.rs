/// Process table, signal list, help popup and error box

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{Mode, ProcessController};
use crate::widgets::{ErrorBox, HelpMenu, Scrollable};

use super::{centered_rect, draw_table, location_title, Theme};

const SIGNAL_LIST_WIDTH: u16 = 34;

const PROC_WIDTHS: [Constraint; 8] = [
    Constraint::Length(8),
    Constraint::Min(20),
    Constraint::Length(8),
    Constraint::Length(8),
    Constraint::Length(8),
    Constraint::Length(22),
    Constraint::Length(20),
    Constraint::Length(12),
];

const SIGNAL_WIDTHS: [Constraint; 2] = [Constraint::Length(3), Constraint::Min(10)];

pub fn draw(frame: &mut Frame, controller: &ProcessController, theme: &Theme) {
    let area = frame.size();
    let mode = controller.mode();

    let table_area = if mode == Mode::KillPrompt {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIGNAL_LIST_WIDTH), Constraint::Min(0)])
            .split(area);
        draw_signals(frame, chunks[0], controller, theme);
        chunks[1]
    } else {
        area
    };

    let mut title = location_title("Processes", controller.table());
    if controller.is_paused() {
        title.push_str("[paused] ");
    }
    draw_table(
        frame,
        table_area,
        controller.table(),
        &PROC_WIDTHS,
        title,
        theme,
        mode == Mode::Normal,
        mode == Mode::KillPrompt,
    );

    match mode {
        Mode::HelpOverlay => draw_help(frame, controller.help(), theme),
        Mode::ErrorOverlay => {
            if let Some(error) = controller.error() {
                draw_error(frame, error);
            }
        }
        Mode::Normal | Mode::KillPrompt => {}
    }
}

fn draw_signals(frame: &mut Frame, area: Rect, controller: &ProcessController, theme: &Theme) {
    let title = match controller.kill_request() {
        Some(req) => format!(" Send signal to {} ", req.target),
        None => " Send signal ".to_string(),
    };
    // Number and name only; the description does not fit the side panel
    let signals = controller.signals();
    let rows: Vec<Row> = signals
        .table()
        .visible_rows()
        .map(|(idx, row)| {
            let r = Row::new(vec![row.0[0].clone(), row.0[1].clone()]);
            if idx == signals.selected() {
                r.style(theme.cursor_style(true))
            } else {
                r
            }
        })
        .collect();

    let list = Table::new(rows, SIGNAL_WIDTHS.to_vec()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(true))
            .title(title),
    );
    frame.render_widget(list, area);
}

pub(crate) fn draw_help(frame: &mut Frame, help: &HelpMenu, theme: &Theme) {
    let popup = centered_rect(70, 80, frame.size());

    let lines: Vec<Line> = help
        .lines()
        .map(|l| {
            if l.starts_with(' ') || l.is_empty() {
                Line::from(l.to_string())
            } else {
                Line::from(Span::styled(l.to_string(), theme.header_style()))
            }
        })
        .collect();

    frame.render_widget(Clear, popup);
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style(true))
            .title(Span::styled(" Help ", Style::default().add_modifier(Modifier::BOLD))),
    );
    frame.render_widget(widget, popup);
}

fn draw_error(frame: &mut Frame, error: &ErrorBox) {
    let popup = centered_rect(50, 30, frame.size());

    let mut lines: Vec<Line> = Vec::new();
    for (i, l) in error.lines().into_iter().enumerate() {
        let style = if i == 0 {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else if l == error.hint {
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(l, style)));
    }

    frame.render_widget(Clear, popup);
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(error.title.clone()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, popup);
}
