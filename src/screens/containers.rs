/// Container dashboard: totals gauges, usage history and per-container table

use ratatui::{layout::Constraint, Frame};

use crate::app::ContainerDashboard;
use crate::utils::format_bytes;

use super::{dashboard::draw_overview, draw_table, location_title, processes::draw_help, Theme};

const CONTAINER_WIDTHS: [Constraint; 8] = [
    Constraint::Length(12),
    Constraint::Min(16),
    Constraint::Min(16),
    Constraint::Length(22),
    Constraint::Length(8),
    Constraint::Length(8),
    Constraint::Length(22),
    Constraint::Length(22),
];

pub fn draw(frame: &mut Frame, dashboard: &ContainerDashboard, theme: &Theme) {
    let table_area = draw_overview(frame, dashboard, theme);
    let snapshot = dashboard.snapshot();
    let running = dashboard.table().rows().iter().filter(|row| row.state().is_running()).count();

    let title = format!(
        "{}| {} running | Net I/O {} / {} | Block I/O {} / {} ",
        location_title(dashboard.title(), dashboard.table()),
        running,
        format_bytes(snapshot.total_net.rx),
        format_bytes(snapshot.total_net.tx),
        format_bytes(snapshot.total_blk.read),
        format_bytes(snapshot.total_blk.write),
    );
    draw_table(frame, table_area, dashboard.table(), &CONTAINER_WIDTHS, title, theme, true, false);

    if let Some(help) = dashboard.help() {
        draw_help(frame, help, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Consumer, Key};
    use crate::core::{NetStat, Sample, Snapshot, Subject};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(dashboard: &ContainerDashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 30)).unwrap();
        terminal.draw(|f| draw(f, dashboard, &Theme::default())).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_dashboard_renders_totals_and_rows() {
        let mut d = ContainerDashboard::new();
        d.on_resize(160, 30);
        let mut web = Sample::zeroed(&Subject::new("0123456789", "web"));
        web.image = Some("nginx:1.25".into());
        web.cpu_percent = 12.5;
        web.status = "Up 2 hours".into();
        let mut old = Sample::zeroed(&Subject::new("abcdefabcd", "old"));
        old.status = "Exited (1) 3 days ago".into();
        d.on_snapshot(Snapshot {
            total_cpu_percent: 12.5,
            total_net: NetStat { rx: 2048, tx: 0 },
            per_subject: vec![web, old],
            ..Snapshot::default()
        });

        let out = screen(&d);
        assert!(out.contains("12.50%"));
        assert!(out.contains("nginx:1.25"));
        assert!(out.contains("Net I/O 2.00 KB / 0 B"));
        assert!(out.contains("Containers 1-2 of 2 | 1 running"));

        d.handle_key(Key::Char('?'));
        assert!(screen(&d).contains("Quit"));
    }
}
