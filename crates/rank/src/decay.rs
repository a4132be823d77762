//! Exponential decay of borrow counts.
//!
//! `count' = floor(count × rate ^ (elapsed_days / window_days))`, with
//! `elapsed_days` measured fractionally from `last_borrowed`. A record that
//! was never borrowed (`last_borrowed == 0`) decays from the epoch.

use stacks_catalog::Catalog;
use stacks_common::elapsed_days;
use stacks_metrics::metrics;

/// Fraction of the count kept per window.
pub const DECAY_RATE: f64 = 0.9;

/// Window length in days.
pub const DECAY_WINDOW_DAYS: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayPolicy {
    pub rate: f64,
    pub window_days: f64,
}

impl Default for DecayPolicy {
    fn default() -> Self {
        Self {
            rate: DECAY_RATE,
            window_days: DECAY_WINDOW_DAYS,
        }
    }
}

impl DecayPolicy {
    pub fn factor(&self, last_borrowed: u64, now: u64) -> f64 {
        self.rate
            .powf(elapsed_days(last_borrowed, now) / self.window_days)
    }

    /// Decayed count. Never exceeds `borrow_count`; no elapsed time (or a
    /// factor of 1) leaves it exact even past f64's integer range.
    pub fn apply(&self, borrow_count: u64, last_borrowed: u64, now: u64) -> u64 {
        if now <= last_borrowed {
            return borrow_count;
        }
        let factor = self.factor(last_borrowed, now);
        if factor >= 1.0 {
            return borrow_count;
        }
        ((borrow_count as f64 * factor).floor() as u64).min(borrow_count)
    }
}

/// Summary of one pass over the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecayReport {
    pub visited: usize,
    pub changed: usize,
}

/// Decay every record with the default policy.
pub fn decay_all(catalog: &mut Catalog, now: u64) -> DecayReport {
    decay_all_with(catalog, now, &DecayPolicy::default())
}

pub fn decay_all_with(catalog: &mut Catalog, now: u64, policy: &DecayPolicy) -> DecayReport {
    let _timer = stacks_metrics::start_op_timer("decay");
    let mut report = DecayReport::default();

    catalog.for_each_record_mut(|record| {
        let decayed = policy.apply(record.borrow_count, record.last_borrowed, now);
        if decayed != record.borrow_count {
            report.changed += 1;
            record.borrow_count = decayed;
        }
        report.visited += 1;
    });

    metrics().decay_passes.inc();
    tracing::info!(
        "decay pass: {} record(s) visited, {} changed",
        report.visited,
        report.changed
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use stacks_common::SECS_PER_DAY;

    const NOW: u64 = 1_700_000_000;

    #[test]
    fn test_zero_elapsed_is_identity() {
        let policy = DecayPolicy::default();
        assert_eq!(policy.factor(NOW, NOW), 1.0);
        assert_eq!(policy.apply(123, NOW, NOW), 123);
    }

    #[test]
    fn test_one_window_keeps_ninety_percent() {
        let policy = DecayPolicy::default();
        assert_eq!(policy.apply(100, NOW - 30 * SECS_PER_DAY, NOW), 90);
        assert_eq!(policy.apply(100, NOW - 60 * SECS_PER_DAY, NOW), 81);
    }

    #[test]
    fn test_fractional_windows_decay_continuously() {
        let policy = DecayPolicy::default();
        let half = policy.factor(NOW - 15 * SECS_PER_DAY, NOW);
        assert!((half - 0.9f64.sqrt()).abs() < 1e-12);
        assert_eq!(policy.apply(1_000, NOW - 15 * SECS_PER_DAY, NOW), 948);
    }

    #[test]
    fn test_monotone_in_elapsed_time() {
        let policy = DecayPolicy::default();
        let mut previous = u64::MAX;
        for days in 0..400 {
            let value = policy.apply(1_000, NOW - days * SECS_PER_DAY, NOW);
            assert!(value <= previous, "day {}: {} > {}", days, value, previous);
            previous = value;
        }
        assert_eq!(policy.apply(1_000, NOW, NOW), 1_000);
    }

    #[test]
    fn test_future_borrow_time_is_identity() {
        let policy = DecayPolicy::default();
        assert_eq!(policy.apply(40, NOW + 5_000, NOW), 40);
    }

    #[test]
    fn test_large_counts_survive_zero_elapsed() {
        let policy = DecayPolicy::default();
        let big = (1u64 << 53) + 1;
        assert_eq!(policy.apply(big, NOW, NOW), big);
        assert_eq!(policy.apply(big, NOW + 60, NOW), big);
        assert_eq!(policy.apply(u64::MAX, NOW, NOW), u64::MAX);

        let no_decay = DecayPolicy {
            rate: 1.0,
            ..DecayPolicy::default()
        };
        assert_eq!(no_decay.apply(big, NOW - 90 * SECS_PER_DAY, NOW), big);
    }

    #[test]
    fn test_large_counts_never_grow() {
        let policy = DecayPolicy::default();
        let big = (1u64 << 53) + 3;
        assert!(policy.apply(big, NOW - 1, NOW) <= big);
    }

    #[test]
    fn test_never_borrowed_collapses() {
        let policy = DecayPolicy::default();
        assert_eq!(policy.apply(49, 0, NOW), 0);
    }

    #[test]
    fn test_decay_all_reports_changes() {
        let mut catalog = Catalog::new();
        let genre = vec!["Fiction".to_string()];
        catalog.add_record("Fresh", "Anon", &genre, 10).unwrap();
        catalog.add_record("Stale", "Anon", &genre, 10).unwrap();
        catalog.add_record("Never", "Anon", &genre, 10).unwrap();
        catalog.borrow("Fresh", "Fiction", NOW).unwrap();
        catalog
            .borrow("Stale", "Fiction", NOW - 30 * SECS_PER_DAY)
            .unwrap();

        let report = decay_all(&mut catalog, NOW);
        assert_eq!(report, DecayReport { visited: 3, changed: 2 });
        assert_eq!(catalog.find_record("Fresh", "Fiction").unwrap().borrow_count, 11);
        assert_eq!(catalog.find_record("Stale", "Fiction").unwrap().borrow_count, 9);
        assert_eq!(catalog.find_record("Never", "Fiction").unwrap().borrow_count, 0);
    }
}
