pub mod aggregate;
pub mod bus;
pub mod collector;
pub mod docker;
pub mod error;
pub mod process;
pub mod sample;
pub mod source;
pub mod supervisor;
pub mod system;

pub use aggregate::aggregate;
pub use bus::{metric_bus, BusReceiver, BusSender};
pub use collector::Collector;
pub use docker::DockerSource;
pub use error::{MonitorError, MonitorResult, SignalError, SourceError};
pub use process::{ProcessProbe, ProcessSource, SignalSender};
pub use sample::{BlkStat, DiskSpace, NetStat, Sample, Snapshot, Subject};
pub use source::SubjectSource;
pub use supervisor::serve;
pub use system::{SystemMetric, SystemSource};
