/// Process table access through sysinfo
///
/// One shared `System` serves the collector (enumerate + per-pid fetch), the
/// controller's existence probe, and signal delivery.

use std::sync::{Arc, Mutex, MutexGuard};

use sysinfo::{Pid, Process, Signal, System};

use crate::core::error::{SignalError, SourceError};
use crate::core::sample::{BlkStat, DiskSpace, NetStat, Sample, Subject};
use crate::core::source::SubjectSource;

/// Synchronous queries the process controller makes outside the collector
#[cfg_attr(test, mockall::automock)]
pub trait ProcessProbe: Send {
    /// Whether `pid` is still alive
    fn exists(&self, pid: u32) -> bool;

    /// Immediate full sample of the process table
    fn refresh(&self) -> Result<Vec<Sample>, SourceError>;
}

/// Delivery of a numbered POSIX signal to a process
#[cfg_attr(test, mockall::automock)]
pub trait SignalSender: Send {
    fn send_signal(&self, pid: u32, signal: i32) -> Result<(), SignalError>;
}

#[derive(Clone)]
pub struct ProcessSource {
    system: Arc<Mutex<System>>,
}

impl Default for ProcessSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSource {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        system.refresh_processes();
        Self {
            system: Arc::new(Mutex::new(system)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, System> {
        self.system.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn subject_of(pid: Pid, process: &Process) -> Subject {
        Subject {
            id: pid.as_u32().to_string(),
            display_name: process.name().to_string(),
            image: None,
            status: process.status().to_string(),
            started_at: Some(process.start_time() as i64),
        }
    }

    fn sample_of(pid: Pid, process: &Process, total_memory: u64) -> Sample {
        let disk = process.disk_usage();
        let mem_percent = if total_memory > 0 {
            process.memory() as f64 / total_memory as f64 * 100.0
        } else {
            0.0
        };

        Sample {
            id: pid.as_u32().to_string(),
            display_name: process.name().to_string(),
            image: None,
            cpu_percent: process.cpu_usage() as f64,
            mem_percent,
            net: NetStat::default(),
            blk: BlkStat {
                read: disk.total_read_bytes,
                write: disk.total_written_bytes,
            },
            space: DiskSpace::default(),
            status: process.status().to_string(),
            started_at: Some(process.start_time() as i64),
            thread_count: process.tasks().map(|t| t.len() as u64).unwrap_or(0),
        }
    }

    fn refresh_table(system: &mut System) {
        system.refresh_memory();
        system.refresh_processes();
    }

    fn parse_pid(subject: &Subject) -> Result<Pid, SourceError> {
        subject
            .id
            .parse::<u32>()
            .map(Pid::from_u32)
            .map_err(|_| SourceError::NotFound(subject.id.clone()))
    }
}

impl SubjectSource for ProcessSource {
    async fn enumerate(&self) -> Result<Vec<Subject>, SourceError> {
        let system = self.system.clone();
        tokio::task::spawn_blocking(move || {
            let mut system = system.lock().unwrap_or_else(|p| p.into_inner());
            Self::refresh_table(&mut system);

            let mut subjects: Vec<Subject> = system
                .processes()
                .iter()
                .map(|(pid, process)| Self::subject_of(*pid, process))
                .collect();
            subjects.sort_by_key(|s| s.id.parse::<u32>().unwrap_or(u32::MAX));
            subjects
        })
        .await
        .map_err(|e| SourceError::Unavailable(format!("process table refresh failed: {}", e)))
    }

    async fn fetch(&self, subject: &Subject) -> Result<Sample, SourceError> {
        let pid = Self::parse_pid(subject)?;
        let system = self.lock();
        system
            .process(pid)
            .map(|process| Self::sample_of(pid, process, system.total_memory()))
            .ok_or_else(|| SourceError::NotFound(subject.id.clone()))
    }
}

/// Run a blocking closure from async context without stalling the worker.
/// On a multi-thread runtime the worker hands its other tasks off first;
/// elsewhere (current-thread runtime, plain threads) it just runs inline.
fn blocking<T>(f: impl FnOnce() -> T) -> T {
    use tokio::runtime::{Handle, RuntimeFlavor};

    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

impl ProcessProbe for ProcessSource {
    fn exists(&self, pid: u32) -> bool {
        blocking(|| self.lock().refresh_process(Pid::from_u32(pid)))
    }

    fn refresh(&self) -> Result<Vec<Sample>, SourceError> {
        blocking(|| {
            let mut system = self.lock();
            Self::refresh_table(&mut system);
            let total_memory = system.total_memory();
            Ok(system
                .processes()
                .iter()
                .map(|(pid, process)| Self::sample_of(*pid, process, total_memory))
                .collect())
        })
    }
}

impl SignalSender for ProcessSource {
    fn send_signal(&self, pid: u32, signal: i32) -> Result<(), SignalError> {
        let sig = to_sysinfo_signal(signal)?;
        let mut system = self.lock();
        let target = Pid::from_u32(pid);

        if !system.refresh_process(target) {
            return Err(SignalError::NotFound(pid));
        }
        let process = system.process(target).ok_or(SignalError::NotFound(pid))?;

        match process.kill_with(sig) {
            Some(true) => Ok(()),
            Some(false) => Err(SignalError::Failed { pid, signal }),
            None => Err(SignalError::Unsupported(signal)),
        }
    }
}

/// Map a Linux signal number to sysinfo's signal enum
pub fn to_sysinfo_signal(signal: i32) -> Result<Signal, SignalError> {
    let sig = match signal {
        1 => Signal::Hangup,
        2 => Signal::Interrupt,
        3 => Signal::Quit,
        4 => Signal::Illegal,
        5 => Signal::Trap,
        6 => Signal::Abort,
        7 => Signal::Bus,
        8 => Signal::FloatingPointException,
        9 => Signal::Kill,
        10 => Signal::User1,
        11 => Signal::Segv,
        12 => Signal::User2,
        13 => Signal::Pipe,
        14 => Signal::Alarm,
        15 => Signal::Term,
        16 => return Err(SignalError::Unsupported(signal)),
        17 => Signal::Child,
        18 => Signal::Continue,
        19 => Signal::Stop,
        20 => Signal::TSTP,
        21 => Signal::TTIN,
        22 => Signal::TTOU,
        23 => Signal::Urgent,
        24 => Signal::XCPU,
        25 => Signal::XFSZ,
        26 => Signal::VirtualAlarm,
        27 => Signal::Profiling,
        28 => Signal::Winch,
        29 => Signal::IO,
        30 => Signal::Power,
        31 => Signal::Sys,
        _ => return Err(SignalError::InvalidSignal(signal)),
    };
    Ok(sig)
}
