//! Zero-cost phase timing.
//!
//! When the `timing` feature is enabled, `Timer` measures wall-clock time and
//! `report` logs it at debug level. When disabled, `Timer` is zero-sized and
//! every method compiles away.

use std::time::Duration;

#[cfg(feature = "timing")]
pub(crate) struct Timer(std::time::Instant);

#[cfg(feature = "timing")]
impl Timer {
    #[inline]
    pub fn start() -> Self {
        Self(std::time::Instant::now())
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }

    pub fn report(&self, phase: &str) {
        let d = self.elapsed();
        log::debug!("timing {:<18} {:9.1}ms", phase, d.as_secs_f64() * 1000.0);
    }
}

/// Dummy timer when `timing` is disabled (zero-sized).
#[cfg(not(feature = "timing"))]
pub(crate) struct Timer;

#[cfg(not(feature = "timing"))]
impl Timer {
    #[inline(always)]
    pub fn start() -> Self {
        Self
    }

    #[inline(always)]
    #[allow(dead_code)]
    pub fn elapsed(&self) -> Duration {
        Duration::ZERO
    }

    #[inline(always)]
    pub fn report(&self, _phase: &str) {}
}
