/// Reduction of per-subject samples into a tick snapshot

use crate::core::sample::{BlkStat, NetStat, Sample, Snapshot};

/// Combine samples into totals.
///
/// CPU is normalized by `core_count` (a `core_count` of 0 is treated as 1),
/// memory is a plain sum since each sample is already a share of machine
/// memory. Network and block I/O are straight sums. Totals do not depend on
/// the order of `samples`, which keeps their arrival order.
pub fn aggregate(samples: Vec<Sample>, core_count: usize) -> Snapshot {
    let mut total_cpu = 0.0;
    let mut total_mem = 0.0;
    let mut total_net = NetStat::default();
    let mut total_blk = BlkStat::default();

    for sample in &samples {
        total_cpu += sample.cpu_percent;
        total_mem += sample.mem_percent;

        total_net.rx = total_net.rx.saturating_add(sample.net.rx);
        total_net.tx = total_net.tx.saturating_add(sample.net.tx);

        total_blk.read = total_blk.read.saturating_add(sample.blk.read);
        total_blk.write = total_blk.write.saturating_add(sample.blk.write);
    }

    Snapshot {
        total_cpu_percent: total_cpu / core_count.max(1) as f64,
        total_mem_percent: total_mem,
        total_net,
        total_blk,
        per_subject: samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample::Subject;

    fn sample(id: &str, cpu: f64, mem: f64, rx: u64, tx: u64, read: u64, write: u64) -> Sample {
        let mut s = Sample::zeroed(&Subject::new(id, id));
        s.cpu_percent = cpu;
        s.mem_percent = mem;
        s.net = NetStat { rx, tx };
        s.blk = BlkStat { read, write };
        s
    }

    fn fixture() -> Vec<Sample> {
        // Binary fractions keep float sums exact regardless of order
        vec![
            sample("a", 12.5, 3.25, 100, 10, 4096, 0),
            sample("b", 50.0, 0.5, 0, 20, 0, 512),
            sample("c", 0.75, 10.0, 7, 0, 1, 1),
            sample("d", 200.0, 1.125, 3, 3, 8192, 16),
        ]
    }

    fn permutations(items: Vec<Sample>) -> Vec<Vec<Sample>> {
        if items.len() <= 1 {
            return vec![items];
        }
        let mut out = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.clone();
            let head = rest.remove(i);
            for mut tail in permutations(rest) {
                tail.insert(0, head.clone());
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn test_cpu_is_normalized_by_core_count() {
        let snapshot = aggregate(fixture(), 4);
        assert_eq!(snapshot.total_cpu_percent, (12.5 + 50.0 + 0.75 + 200.0) / 4.0);
        assert_eq!(snapshot.total_mem_percent, 3.25 + 0.5 + 10.0 + 1.125);
    }

    #[test]
    fn test_io_totals_are_sums() {
        let snapshot = aggregate(fixture(), 2);
        assert_eq!(snapshot.total_net, NetStat { rx: 110, tx: 33 });
        assert_eq!(snapshot.total_blk, BlkStat { read: 12289, write: 529 });
        assert_eq!(snapshot.len(), 4);
    }

    #[test]
    fn test_totals_independent_of_order() {
        let expected = aggregate(fixture(), 8);
        for perm in permutations(fixture()) {
            let snapshot = aggregate(perm, 8);
            assert_eq!(snapshot.total_cpu_percent, expected.total_cpu_percent);
            assert_eq!(snapshot.total_mem_percent, expected.total_mem_percent);
            assert_eq!(snapshot.total_net, expected.total_net);
            assert_eq!(snapshot.total_blk, expected.total_blk);
        }
    }

    #[test]
    fn test_empty_and_zero_cores() {
        let snapshot = aggregate(Vec::new(), 0);
        assert_eq!(snapshot.total_cpu_percent, 0.0);
        assert!(snapshot.is_empty());

        let snapshot = aggregate(vec![sample("x", 30.0, 0.0, 0, 0, 0, 0)], 0);
        assert_eq!(snapshot.total_cpu_percent, 30.0);
    }

    #[test]
    fn test_per_subject_keeps_arrival_order() {
        let snapshot = aggregate(fixture(), 1);
        let ids: Vec<&str> = snapshot.per_subject.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }
}
