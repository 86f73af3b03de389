/// Tuning for the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeSettings {
    /// Delay used for `RequestFrame` timers.
    pub frame_interval_ms: u64,
    /// Upper bound on timers fired per wake-up before the view is published.
    pub max_batch: usize,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            max_batch: 64,
        }
    }
}
