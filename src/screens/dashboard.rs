/// Totals gauges and usage history shared by the container and host views

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge, Sparkline},
    Frame,
};

use crate::app::{Dashboard, DASHBOARD_CHROME_ROWS};
use crate::utils::format_percent;

use super::Theme;

fn usage_color(percent: f64) -> Color {
    if percent > 80.0 {
        Color::Red
    } else if percent > 60.0 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// Draw CPU and memory gauges with their sparklines across the top of the
/// frame. Returns the area left for the table.
pub(crate) fn draw_overview<R>(frame: &mut Frame, dashboard: &Dashboard<R>, theme: &Theme) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(DASHBOARD_CHROME_ROWS - 3),
            Constraint::Min(0),
        ])
        .split(frame.size());

    let snapshot = dashboard.snapshot();
    let gauges = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);
    let history = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    for (i, (name, value)) in [("CPU", snapshot.total_cpu_percent), ("Memory", snapshot.total_mem_percent)]
        .into_iter()
        .enumerate()
    {
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style(false))
                    .title(format!(" {} ", name)),
            )
            .gauge_style(Style::default().fg(usage_color(value)))
            .ratio((value / 100.0).clamp(0.0, 1.0))
            .label(format_percent(value));
        frame.render_widget(gauge, gauges[i]);
    }

    let cpu_history = dashboard.cpu_history();
    let mem_history = dashboard.mem_history();
    for (i, (name, data)) in [("CPU history", &cpu_history), ("Memory history", &mem_history)]
        .into_iter()
        .enumerate()
    {
        let area = history[i];
        // Newest samples on the right edge
        let visible = area.width.saturating_sub(2) as usize;
        let start = data.len().saturating_sub(visible);
        let sparkline = Sparkline::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border_style(false))
                    .title(format!(" {} ", name)),
            )
            .data(&data[start..])
            .max(100)
            .style(Style::default().fg(theme.cursor));
        frame.render_widget(sparkline, area);
    }

    chunks[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_color_thresholds() {
        assert_eq!(usage_color(10.0), Color::Green);
        assert_eq!(usage_color(61.0), Color::Yellow);
        assert_eq!(usage_color(80.5), Color::Red);
    }
}
