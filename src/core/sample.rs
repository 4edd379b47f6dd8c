/// Point-in-time measurements for processes and containers

/// Identity of a monitored subject, known at enumeration time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: String,
    pub display_name: String,
    pub image: Option<String>,
    pub status: String,
    pub started_at: Option<i64>,
}

impl Subject {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            image: None,
            status: String::new(),
            started_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetStat {
    pub rx: u64,
    pub tx: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlkStat {
    pub read: u64,
    pub write: u64,
}

/// Capacity of a mounted filesystem, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiskSpace {
    pub used: u64,
    pub total: u64,
}

impl DiskSpace {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used as f64 / self.total as f64 * 100.0
        }
    }
}

/// One subject's measurements at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub id: String,
    pub display_name: String,
    pub image: Option<String>,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub net: NetStat,
    pub blk: BlkStat,
    pub space: DiskSpace,
    pub status: String,
    pub started_at: Option<i64>,
    pub thread_count: u64,
}

impl Sample {
    /// Sample standing in for a subject whose fetch failed.
    /// Identity fields are kept, every measurement is zero.
    pub fn zeroed(subject: &Subject) -> Self {
        Self {
            id: subject.id.clone(),
            display_name: subject.display_name.clone(),
            image: subject.image.clone(),
            cpu_percent: 0.0,
            mem_percent: 0.0,
            net: NetStat::default(),
            blk: BlkStat::default(),
            space: DiskSpace::default(),
            status: subject.status.clone(),
            started_at: subject.started_at,
            thread_count: 0,
        }
    }

    pub fn is_zeroed(&self) -> bool {
        self.cpu_percent == 0.0
            && self.mem_percent == 0.0
            && self.net == NetStat::default()
            && self.blk == BlkStat::default()
            && self.space == DiskSpace::default()
            && self.thread_count == 0
    }
}

/// Aggregated measurements across all subjects for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub total_cpu_percent: f64,
    pub total_mem_percent: f64,
    pub total_net: NetStat,
    pub total_blk: BlkStat,
    /// In order of fetch completion; not stable across ticks
    pub per_subject: Vec<Sample>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.per_subject.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_subject.is_empty()
    }
}
