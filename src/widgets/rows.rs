/// Typed table rows for processes, containers and host metrics

use std::cmp::Ordering;

use crate::core::{Sample, SystemMetric};
use crate::utils::{format_bytes, format_percent, format_timestamp, truncate_string, ContainerState};

use super::table::{TableRow, Tone};

const COMMAND_WIDTH: usize = 40;
const CONTAINER_STATUS_COLUMN: usize = 3;
const LOAD_BAR_WIDTH: usize = 20;

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn blk_total(s: &Sample) -> u64 {
    s.blk.read.saturating_add(s.blk.write)
}

fn net_total(s: &Sample) -> u64 {
    s.net.rx.saturating_add(s.net.tx)
}

/// A process sample; sorting compares the underlying values, not their text
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow(pub Sample);

impl ProcessRow {
    pub fn pid(&self) -> Option<u32> {
        self.0.id.parse().ok()
    }
}

impl From<Sample> for ProcessRow {
    fn from(sample: Sample) -> Self {
        Self(sample)
    }
}

impl TableRow for ProcessRow {
    fn cells(&self) -> Vec<String> {
        let s = &self.0;
        vec![
            s.id.clone(),
            truncate_string(&s.display_name, COMMAND_WIDTH),
            format_percent(s.cpu_percent),
            format_percent(s.mem_percent),
            s.status.clone(),
            format!("{} / {}", format_bytes(s.blk.read), format_bytes(s.blk.write)),
            s.started_at.map(format_timestamp).unwrap_or_default(),
            s.thread_count.to_string(),
        ]
    }

    fn unique_key(&self) -> String {
        self.0.id.clone()
    }

    fn compare(&self, other: &Self, column: usize) -> Ordering {
        let (a, b) = (&self.0, &other.0);
        match column {
            0 => self.pid().cmp(&other.pid()),
            1 => a.display_name.cmp(&b.display_name),
            2 => cmp_f64(a.cpu_percent, b.cpu_percent),
            3 => cmp_f64(a.mem_percent, b.mem_percent),
            4 => a.status.cmp(&b.status),
            5 => blk_total(a).cmp(&blk_total(b)),
            6 => a.started_at.cmp(&b.started_at),
            7 => a.thread_count.cmp(&b.thread_count),
            _ => Ordering::Equal,
        }
    }
}

/// A container sample as shown on the container dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerRow(pub Sample);

impl From<Sample> for ContainerRow {
    fn from(sample: Sample) -> Self {
        Self(sample)
    }
}

impl ContainerRow {
    pub fn state(&self) -> ContainerState {
        ContainerState::from(self.0.status.as_str())
    }
}

impl TableRow for ContainerRow {
    fn cells(&self) -> Vec<String> {
        let s = &self.0;
        vec![
            s.id.clone(),
            s.image.clone().unwrap_or_default(),
            s.display_name.clone(),
            s.status.clone(),
            format_percent(s.cpu_percent),
            format_percent(s.mem_percent),
            format!("{} / {}", format_bytes(s.net.rx), format_bytes(s.net.tx)),
            format!("{} / {}", format_bytes(s.blk.read), format_bytes(s.blk.write)),
        ]
    }

    fn unique_key(&self) -> String {
        self.0.id.clone()
    }

    fn compare(&self, other: &Self, column: usize) -> Ordering {
        let (a, b) = (&self.0, &other.0);
        match column {
            4 => cmp_f64(a.cpu_percent, b.cpu_percent),
            5 => cmp_f64(a.mem_percent, b.mem_percent),
            6 => net_total(a).cmp(&net_total(b)),
            7 => blk_total(a).cmp(&blk_total(b)),
            _ => self.cells().get(column).cmp(&other.cells().get(column)),
        }
    }
    fn tone(&self, column: usize) -> Tone {
        if column != CONTAINER_STATUS_COLUMN {
            return Tone::Plain;
        }
        match self.state() {
            ContainerState::Running => Tone::Good,
            ContainerState::Paused | ContainerState::Restarting => Tone::Warn,
            ContainerState::Stopped | ContainerState::Dead => Tone::Bad,
            ContainerState::Unknown => Tone::Plain,
        }
    }
}

/// A host sample. Cores fill the per-core layout, every other metric the
/// device layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemRow(pub Sample);

impl From<Sample> for SystemRow {
    fn from(sample: Sample) -> Self {
        Self(sample)
    }
}

impl SystemRow {
    pub fn metric(&self) -> Option<SystemMetric> {
        SystemMetric::parse(&self.0.id)
    }

    /// Percentage that drives the usage column and its color
    pub fn usage(&self) -> f64 {
        let s = &self.0;
        match self.metric() {
            Some(SystemMetric::Core(_)) => s.cpu_percent,
            Some(SystemMetric::Memory) => s.mem_percent,
            Some(SystemMetric::Disk(_)) => s.space.percent(),
            Some(SystemMetric::Network(_)) | None => 0.0,
        }
    }

    fn usage_column(&self) -> usize {
        match self.metric() {
            Some(SystemMetric::Core(_)) => 1,
            _ => 2,
        }
    }
}

fn load_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * LOAD_BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "|".repeat(filled), " ".repeat(LOAD_BAR_WIDTH - filled))
}

impl TableRow for SystemRow {
    fn cells(&self) -> Vec<String> {
        let s = &self.0;
        match self.metric() {
            Some(SystemMetric::Core(_)) => vec![
                s.display_name.clone(),
                format_percent(s.cpu_percent),
                s.status.clone(),
                load_bar(s.cpu_percent),
            ],
            Some(SystemMetric::Network(_)) => vec![
                s.display_name.clone(),
                "net".to_string(),
                format!("{} / {}", format_bytes(s.net.rx), format_bytes(s.net.tx)),
                "rx / tx per tick".to_string(),
            ],
            Some(metric) => vec![
                s.display_name.clone(),
                metric.kind().to_string(),
                format_percent(self.usage()),
                s.status.clone(),
            ],
            None => vec![s.display_name.clone(), String::new(), String::new(), s.status.clone()],
        }
    }

    fn unique_key(&self) -> String {
        self.0.id.clone()
    }

    fn compare(&self, other: &Self, column: usize) -> Ordering {
        match (self.metric(), other.metric()) {
            (Some(SystemMetric::Core(a)), Some(SystemMetric::Core(b))) if column == 0 => a.cmp(&b),
            _ if column == self.usage_column() => cmp_f64(self.usage(), other.usage()),
            _ => self.cells().get(column).cmp(&other.cells().get(column)),
        }
    }

    fn tone(&self, column: usize) -> Tone {
        if column != self.usage_column() {
            return Tone::Plain;
        }
        match self.usage() {
            u if u >= 90.0 => Tone::Bad,
            u if u >= 70.0 => Tone::Warn,
            _ => Tone::Plain,
        }
    }
}
