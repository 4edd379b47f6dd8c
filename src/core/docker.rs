/// Docker integration
///
/// Lists containers and reads one stats sample per container through the
/// Docker Engine API.

use anyhow::{Context, Result};
use bollard::container::{BlkioStatsEntry, ListContainersOptions, Stats, StatsOptions};
use bollard::models::ContainerSummary;
use bollard::Docker;
use futures::StreamExt;

use crate::core::error::SourceError;
use crate::core::sample::{BlkStat, DiskSpace, NetStat, Sample, Subject};
use crate::core::source::SubjectSource;

/// Length Docker ids are shortened to for display
const SHORT_ID_LEN: usize = 10;

#[derive(Clone)]
pub struct DockerSource {
    docker: Docker,
    all: bool,
}

impl DockerSource {
    /// Connect to the local Docker daemon; `all` includes stopped containers
    pub fn connect(all: bool) -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()
            .context("Failed to connect to Docker daemon. Is Docker running?")?;
        Ok(Self { docker, all })
    }

    /// Check if Docker daemon is accessible
    pub async fn check_docker(&self) -> bool {
        self.docker.ping().await.is_ok()
    }

    /// Convert ContainerSummary to a subject identity
    fn container_summary_to_subject(summary: ContainerSummary) -> Subject {
        let name = summary
            .names
            .as_ref()
            .map(|names| {
                names
                    .iter()
                    .map(|n| n.trim_start_matches('/'))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let id: String = summary
            .id
            .unwrap_or_default()
            .chars()
            .take(SHORT_ID_LEN)
            .collect();

        Subject {
            id,
            display_name: name,
            image: Some(summary.image.unwrap_or_else(|| "unknown".to_string())),
            status: summary.status.unwrap_or_else(|| "unknown".to_string()),
            started_at: summary.created,
        }
    }

    fn stats_to_sample(subject: &Subject, stats: &Stats) -> Sample {
        let cpu = &stats.cpu_stats;
        let precpu = &stats.precpu_stats;
        let online_cpus = cpu
            .online_cpus
            .or_else(|| cpu.cpu_usage.percpu_usage.as_ref().map(|v| v.len() as u64))
            .unwrap_or(1);

        let cpu_percent = cpu_percent(
            cpu.cpu_usage.total_usage,
            precpu.cpu_usage.total_usage,
            cpu.system_cpu_usage.unwrap_or(0),
            precpu.system_cpu_usage.unwrap_or(0),
            online_cpus,
        );

        let mem_percent = mem_percent(
            stats.memory_stats.usage.unwrap_or(0),
            stats.memory_stats.limit.unwrap_or(0),
        );

        let net = stats
            .networks
            .as_ref()
            .map(|networks| {
                networks.values().fold(NetStat::default(), |acc, n| NetStat {
                    rx: acc.rx.saturating_add(n.rx_bytes),
                    tx: acc.tx.saturating_add(n.tx_bytes),
                })
            })
            .unwrap_or_default();

        let blk = stats
            .blkio_stats
            .io_service_bytes_recursive
            .as_deref()
            .map(blkio_totals)
            .unwrap_or_default();

        Sample {
            id: subject.id.clone(),
            display_name: subject.display_name.clone(),
            image: subject.image.clone(),
            cpu_percent,
            mem_percent,
            net,
            blk,
            space: DiskSpace::default(),
            status: subject.status.clone(),
            started_at: subject.started_at,
            thread_count: stats.pids_stats.current.unwrap_or(0),
        }
    }
}

impl SubjectSource for DockerSource {
    async fn enumerate(&self) -> Result<Vec<Subject>, SourceError> {
        let options = Some(ListContainersOptions::<String> {
            all: self.all,
            ..Default::default()
        });

        let containers = self.docker.list_containers(options).await?;
        Ok(containers
            .into_iter()
            .map(Self::container_summary_to_subject)
            .collect())
    }

    async fn fetch(&self, subject: &Subject) -> Result<Sample, SourceError> {
        // Non-streaming read so the daemon fills in precpu_stats for the delta
        let mut stats_stream = self.docker.stats(
            &subject.id,
            Some(StatsOptions {
                stream: false,
                one_shot: false,
            }),
        );

        match stats_stream.next().await {
            Some(Ok(stats)) => Ok(Self::stats_to_sample(subject, &stats)),
            Some(Err(e)) => Err(e.into()),
            None => Err(SourceError::NotFound(subject.id.clone())),
        }
    }
}

/// Container CPU usage as a percentage of one core, summed over cores
pub fn cpu_percent(total: u64, pre_total: u64, system: u64, pre_system: u64, online_cpus: u64) -> f64 {
    let cpu_delta = total.saturating_sub(pre_total);
    let system_delta = system.saturating_sub(pre_system);

    if system_delta > 0 && cpu_delta > 0 {
        (cpu_delta as f64 / system_delta as f64) * online_cpus as f64 * 100.0
    } else {
        0.0
    }
}

pub fn mem_percent(usage: u64, limit: u64) -> f64 {
    if limit > 0 {
        usage as f64 / limit as f64 * 100.0
    } else {
        0.0
    }
}

/// Sum read and write bytes across block devices
pub fn blkio_totals(entries: &[BlkioStatsEntry]) -> BlkStat {
    entries.iter().fold(BlkStat::default(), |mut acc, entry| {
        match entry.op.to_lowercase().as_str() {
            "read" => acc.read = acc.read.saturating_add(entry.value),
            "write" => acc.write = acc.write.saturating_add(entry.value),
            _ => {}
        }
        acc
    })
}
