/// Host-wide metrics through sysinfo
///
/// Every logical core, machine memory, each network interface and each
/// mounted disk is a subject. `enumerate` refreshes all counters once per
/// tick; `fetch` only reads what that refresh cached.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use sysinfo::{Disks, Networks, System};

use crate::core::error::SourceError;
use crate::core::sample::{DiskSpace, NetStat, Sample, Subject};
use crate::core::source::SubjectSource;
use crate::utils::helpers::format_bytes;

/// What a host subject id refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemMetric {
    Core(usize),
    Memory,
    Network(String),
    Disk(PathBuf),
}

impl SystemMetric {
    pub fn id(&self) -> String {
        match self {
            SystemMetric::Core(index) => format!("cpu{}", index),
            SystemMetric::Memory => "memory".to_string(),
            SystemMetric::Network(iface) => format!("net:{}", iface),
            SystemMetric::Disk(mount) => format!("disk:{}", mount.display()),
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        if id == "memory" {
            return Some(SystemMetric::Memory);
        }
        if let Some(iface) = id.strip_prefix("net:") {
            return (!iface.is_empty()).then(|| SystemMetric::Network(iface.to_string()));
        }
        if let Some(mount) = id.strip_prefix("disk:") {
            return (!mount.is_empty()).then(|| SystemMetric::Disk(PathBuf::from(mount)));
        }
        id.strip_prefix("cpu")
            .and_then(|n| n.parse::<usize>().ok())
            .map(SystemMetric::Core)
    }

    /// Short label for the kind column
    pub fn kind(&self) -> &'static str {
        match self {
            SystemMetric::Core(_) => "cpu",
            SystemMetric::Memory => "memory",
            SystemMetric::Network(_) => "net",
            SystemMetric::Disk(_) => "disk",
        }
    }
}

struct Host {
    system: System,
    networks: Networks,
    disks: Disks,
}

impl Host {
    fn refresh(&mut self) {
        self.system.refresh_cpu();
        self.system.refresh_memory();
        self.networks.refresh();
        self.disks.refresh();
    }

    fn subjects(&self) -> Vec<Subject> {
        let mut subjects: Vec<Subject> = self
            .system
            .cpus()
            .iter()
            .enumerate()
            .map(|(index, cpu)| {
                let mut subject = Subject::new(SystemMetric::Core(index).id(), cpu.name());
                subject.status = format!("{} MHz", cpu.frequency());
                subject
            })
            .collect();

        subjects.push(Subject::new(SystemMetric::Memory.id(), "Memory"));

        let mut ifaces: Vec<&String> = self.networks.iter().map(|(name, _)| name).collect();
        ifaces.sort();
        subjects.extend(
            ifaces
                .into_iter()
                .map(|iface| Subject::new(SystemMetric::Network(iface.clone()).id(), iface.as_str())),
        );

        subjects.extend(self.disks.list().iter().map(|disk| {
            let mount = disk.mount_point().to_path_buf();
            let mut subject = Subject::new(
                SystemMetric::Disk(mount.clone()).id(),
                mount.display().to_string(),
            );
            subject.image = Some(disk.name().to_string_lossy().to_string());
            subject
        }));

        subjects
    }

    fn sample(&self, subject: &Subject) -> Result<Sample, SourceError> {
        let metric = SystemMetric::parse(&subject.id)
            .ok_or_else(|| SourceError::NotFound(subject.id.clone()))?;
        let mut sample = Sample::zeroed(subject);

        match metric {
            SystemMetric::Core(index) => {
                let cpu = self
                    .system
                    .cpus()
                    .get(index)
                    .ok_or_else(|| SourceError::NotFound(subject.id.clone()))?;
                sample.cpu_percent = cpu.cpu_usage() as f64;
                sample.status = format!("{} MHz", cpu.frequency());
            }
            SystemMetric::Memory => {
                let total = self.system.total_memory();
                let used = self.system.used_memory();
                if total > 0 {
                    sample.mem_percent = used as f64 / total as f64 * 100.0;
                }
                sample.space = DiskSpace { used, total };
                sample.status = format!("{} / {}", format_bytes(used), format_bytes(total));
            }
            SystemMetric::Network(iface) => {
                let data = self
                    .networks
                    .iter()
                    .find(|(name, _)| **name == iface)
                    .map(|(_, data)| data)
                    .ok_or_else(|| SourceError::NotFound(subject.id.clone()))?;
                sample.net = NetStat {
                    rx: data.received(),
                    tx: data.transmitted(),
                };
            }
            SystemMetric::Disk(mount) => {
                let disk = self
                    .disks
                    .list()
                    .iter()
                    .find(|disk| disk.mount_point() == mount.as_path())
                    .ok_or_else(|| SourceError::NotFound(subject.id.clone()))?;
                let total = disk.total_space();
                let used = total.saturating_sub(disk.available_space());
                sample.space = DiskSpace { used, total };
                sample.status = format!("{} / {}", format_bytes(used), format_bytes(total));
            }
        }

        Ok(sample)
    }
}

#[derive(Clone)]
pub struct SystemSource {
    host: Arc<Mutex<Host>>,
}

impl Default for SystemSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSource {
    pub fn new() -> Self {
        let mut system = System::new();
        // First CPU reading only sets the baseline for usage deltas
        system.refresh_cpu();
        system.refresh_memory();

        Self {
            host: Arc::new(Mutex::new(Host {
                system,
                networks: Networks::new_with_refreshed_list(),
                disks: Disks::new_with_refreshed_list(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Host> {
        self.host.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl SubjectSource for SystemSource {
    async fn enumerate(&self) -> Result<Vec<Subject>, SourceError> {
        let host = self.host.clone();
        tokio::task::spawn_blocking(move || {
            let mut host = host.lock().unwrap_or_else(|p| p.into_inner());
            host.refresh();
            host.subjects()
        })
        .await
        .map_err(|e| SourceError::Unavailable(format!("host metrics refresh failed: {}", e)))
    }

    async fn fetch(&self, subject: &Subject) -> Result<Sample, SourceError> {
        self.lock().sample(subject)
    }
}
