use tracing::info;

/// Scan progress reported through `tracing`, at most once per percent.
#[derive(Debug, Default)]
pub(super) struct Progress {
    enabled: bool,
    last_percent: Option<u64>,
}

impl Progress {
    pub(super) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_percent: None,
        }
    }

    pub(super) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(super) fn reset(&mut self) {
        self.last_percent = None;
    }

    /// Record `done` of `total` bytes consumed; returns the percentage when
    /// a new one was reported.
    pub(super) fn update(&mut self, done: u64, total: u64) -> Option<u64> {
        if !self.enabled || total == 0 {
            return None;
        }
        let percent = done.min(total).saturating_mul(100) / total;
        if self.last_percent.is_some_and(|last| percent <= last) {
            return None;
        }
        self.last_percent = Some(percent);
        info!(percent, done, total, "scan progress");
        Some(percent)
    }
}

#[cfg(test)]
mod tests {
    use super::Progress;

    #[test]
    fn reports_each_percent_once() {
        let mut progress = Progress::new(true);
        assert_eq!(progress.update(10, 1000), Some(1));
        assert_eq!(progress.update(15, 1000), None);
        assert_eq!(progress.update(20, 1000), Some(2));
        assert_eq!(progress.update(1000, 1000), Some(100));
    }

    #[test]
    fn disabled_progress_is_silent() {
        let mut progress = Progress::new(false);
        assert_eq!(progress.update(500, 1000), None);
        progress.set_enabled(true);
        assert_eq!(progress.update(500, 1000), Some(50));
        progress.reset();
        assert_eq!(progress.update(500, 1000), Some(50));
    }
}
