/// Host view: totals gauges, usage history and the device or per-core table

use ratatui::{layout::Constraint, Frame};

use crate::app::SystemDashboard;
use crate::core::SystemMetric;
use crate::utils::format_bytes;

use super::{dashboard::draw_overview, draw_table, location_title, processes::draw_help, Theme};

const SYSTEM_WIDTHS: [Constraint; 4] = [
    Constraint::Min(20),
    Constraint::Length(8),
    Constraint::Length(24),
    Constraint::Min(30),
];

const CPU_WIDTHS: [Constraint; 4] = [
    Constraint::Length(10),
    Constraint::Length(10),
    Constraint::Length(12),
    Constraint::Min(24),
];

pub fn draw(frame: &mut Frame, dashboard: &SystemDashboard, theme: &Theme) {
    let table_area = draw_overview(frame, dashboard, theme);
    let snapshot = dashboard.snapshot();
    let cores = snapshot
        .per_subject
        .iter()
        .filter(|s| matches!(SystemMetric::parse(&s.id), Some(SystemMetric::Core(_))))
        .count();

    let widths: &[Constraint] = if dashboard.cpu_only() { &CPU_WIDTHS } else { &SYSTEM_WIDTHS };

    let title = format!(
        "{}| {} cores | Net {} / {} ",
        location_title(dashboard.title(), dashboard.table()),
        cores,
        format_bytes(snapshot.total_net.rx),
        format_bytes(snapshot.total_net.tx),
    );
    draw_table(frame, table_area, dashboard.table(), widths, title, theme, true, false);

    if let Some(help) = dashboard.help() {
        draw_help(frame, help, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Consumer, Key};
    use crate::core::{DiskSpace, NetStat, Sample, Snapshot, Subject};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(dashboard: &SystemDashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
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

    fn host_snapshot() -> Snapshot {
        let mut core = Sample::zeroed(&Subject::new(SystemMetric::Core(0).id(), "cpu0"));
        core.cpu_percent = 40.0;
        core.status = "3100 MHz".into();

        let mut memory = Sample::zeroed(&Subject::new(SystemMetric::Memory.id(), "Memory"));
        memory.mem_percent = 25.0;

        let mut eth = Sample::zeroed(&Subject::new(SystemMetric::Network("eth0".into()).id(), "eth0"));
        eth.net = NetStat { rx: 4096, tx: 1024 };

        let mut root = Sample::zeroed(&Subject::new(SystemMetric::Disk("/".into()).id(), "/"));
        root.space = DiskSpace { used: 50, total: 200 };

        Snapshot {
            total_cpu_percent: 40.0,
            total_mem_percent: 25.0,
            total_net: NetStat { rx: 4096, tx: 1024 },
            per_subject: vec![core, memory, eth, root],
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_devices_view() {
        let mut d = SystemDashboard::new(false);
        d.on_resize(140, 30);
        d.on_snapshot(host_snapshot());

        let out = screen(&d);
        assert!(out.contains("System 1-3 of 3 | 1 cores | Net 4.00 KB / 1.00 KB"));
        assert!(out.contains("eth0"));
        assert!(out.contains("25.00%"));
        assert!(!out.contains("3100 MHz"));

        d.handle_key(Key::Char('?'));
        assert!(screen(&d).contains("Jump to top"));
    }

    #[test]
    fn test_cpuinfo_view() {
        let mut d = SystemDashboard::new(true);
        d.on_resize(140, 30);
        d.on_snapshot(host_snapshot());

        let out = screen(&d);
        assert!(out.contains("CPU cores 1-1 of 1"));
        assert!(out.contains("Frequency"));
        assert!(out.contains("3100 MHz"));
        assert!(!out.contains("eth0"));
    }
}
