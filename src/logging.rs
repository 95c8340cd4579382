/// Phase timing for the build pipeline
///
/// `PhaseTimer` logs how long a phase took at debug level, under the
/// `ordering_graph::perf` target. It only measures when the `perf_timing`
/// feature is enabled; otherwise it compiles to nothing (zero overhead).
///
/// # Examples
///
/// ```rust
/// use ordering_graph::logging::PhaseTimer;
///
/// let timer = PhaseTimer::start("route conflicts");
/// // ... work ...
/// timer.finish();
/// ```
pub struct PhaseTimer {
    #[cfg(feature = "perf_timing")]
    label: &'static str,
    #[cfg(feature = "perf_timing")]
    start: std::time::Instant,
}

impl PhaseTimer {
    #[must_use]
    #[allow(unused_variables)]
    pub fn start(label: &'static str) -> Self {
        Self {
            #[cfg(feature = "perf_timing")]
            label,
            #[cfg(feature = "perf_timing")]
            start: std::time::Instant::now(),
        }
    }

    /// Log the elapsed time of this phase
    pub fn finish(self) {
        #[cfg(feature = "perf_timing")]
        log::debug!(target: "ordering_graph::perf", "{}: {:?}", self.label, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_timer_finishes() {
        let _ = env_logger::builder().is_test(true).try_init();
        let timer = PhaseTimer::start("test phase");
        timer.finish();
    }
}
