use crate::node::GenericAttributeType;
use dashmap::DashSet;
use logging::trace_generic;

/// Remembers which unrecognised generic attribute tags were already reported.
///
/// Restores running on many workers share one log through an `Arc`, so each
/// unknown tag produces exactly one warning per job no matter how many
/// entries carry it.
#[derive(Debug, Default)]
pub struct UnknownTypeLog {
    seen: DashSet<String>,
}

impl UnknownTypeLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `kind`, warning the first time it is seen.
    ///
    /// Returns `true` when this call was the first for `kind`.
    pub fn record(&self, kind: &GenericAttributeType) -> bool {
        let first = self.seen.insert(kind.as_str().to_owned());
        if first {
            trace_generic!(
                warn,
                "ignoring generic attribute type {} not supported on this platform",
                kind
            );
        }
        first
    }

    /// Reports whether `kind` has been recorded.
    #[must_use]
    pub fn contains(&self, kind: &GenericAttributeType) -> bool {
        self.seen.contains(kind.as_str())
    }

    /// Number of distinct unknown tags seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Reports whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Returns the recorded tags in sorted order.
    #[must_use]
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.seen.iter().map(|tag| tag.key().clone()).collect();
        types.sort();
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn first_record_wins() {
        let log = UnknownTypeLog::new();
        let kind = GenericAttributeType::new("vendor.experimental");
        assert!(log.record(&kind));
        assert!(!log.record(&kind));
        assert!(log.contains(&kind));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn concurrent_records_report_each_tag_once() {
        let log = Arc::new(UnknownTypeLog::new());
        let firsts = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let log = Arc::clone(&log);
                let firsts = Arc::clone(&firsts);
                thread::spawn(move || {
                    for round in 0..200 {
                        let name = format!("vendor.t{}", (worker + round) % 5);
                        let kind = GenericAttributeType::new(name);
                        if log.record(&kind) {
                            firsts.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker");
        }
        assert_eq!(firsts.load(Ordering::SeqCst), 5);
        assert_eq!(
            log.types(),
            ["vendor.t0", "vendor.t1", "vendor.t2", "vendor.t3", "vendor.t4"]
        );
    }
}
