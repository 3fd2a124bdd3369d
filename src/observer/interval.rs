//! Reload interval policy.

use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_RELOAD_INTERVAL_SECS: u64 = 60;
pub const MIN_RELOAD_INTERVAL_SECS: i64 = 1;
pub const MAX_RELOAD_INTERVAL_SECS: i64 = 3600;

/// Clamp a requested interval: anything outside [1, 3600] becomes 60.
pub fn clamp_reload_interval(secs: i64) -> u64 {
    if (MIN_RELOAD_INTERVAL_SECS..=MAX_RELOAD_INTERVAL_SECS).contains(&secs) {
        secs.unsigned_abs()
    } else {
        DEFAULT_RELOAD_INTERVAL_SECS
    }
}

/// Interval shared between the observer handle and its background task.
#[derive(Debug)]
pub(crate) struct ReloadInterval(AtomicU64);

impl ReloadInterval {
    pub fn new(secs: i64) -> Self {
        Self(AtomicU64::new(clamp_reload_interval(secs)))
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Returns the effective (clamped) value.
    pub fn set(&self, secs: i64) -> u64 {
        let secs = clamp_reload_interval(secs);
        self.0.store(secs, Ordering::Relaxed);
        secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp_reload_interval(0), 60);
        assert_eq!(clamp_reload_interval(-5), 60);
        assert_eq!(clamp_reload_interval(4000), 60);
        assert_eq!(clamp_reload_interval(30), 30);
        assert_eq!(clamp_reload_interval(1), 1);
        assert_eq!(clamp_reload_interval(3600), 3600);
        assert_eq!(clamp_reload_interval(3601), 60);
    }

    #[test]
    fn test_set_clamps() {
        let interval = ReloadInterval::new(30);
        assert_eq!(interval.get(), 30);
        assert_eq!(interval.set(7200), 60);
        assert_eq!(interval.get(), 60);
    }
}
