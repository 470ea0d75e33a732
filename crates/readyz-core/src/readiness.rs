//! Startup-delay readiness gate.
//!
//! The gate is UNREADY for `[0, delay)` after the process start and READY from
//! `delay` onwards. The transition is driven only by the monotonic clock, so it
//! happens once and never reverts.

use std::time::{Duration, Instant};

/// Outcome of a readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Unready,
    Ready,
}

impl Readiness {
    /// Suffix appended to the probe message.
    pub fn as_str(self) -> &'static str {
        match self {
            Readiness::Unready => "unready",
            Readiness::Ready => "ready",
        }
    }

    pub fn is_ready(self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

/// Result of probing the gate at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessCheck {
    pub elapsed: Duration,
    pub readiness: Readiness,
}

impl ReadinessCheck {
    /// Response body for the probe, newline terminated.
    pub fn message(&self) -> String {
        // Elapsed uses Duration's Debug form: one unit, so 65.2s rather than 1m5.2s.
        format!(
            "Received a readiness request after {:?} - {}\n",
            self.elapsed,
            self.readiness.as_str()
        )
    }
}

/// Immutable start timestamp plus the configured delay.
#[derive(Debug, Clone, Copy)]
pub struct ReadinessGate {
    started_at: Instant,
    delay: Duration,
}

impl ReadinessGate {
    /// Gate whose clock starts now.
    pub fn new(delay: Duration) -> Self {
        Self::starting_at(Instant::now(), delay)
    }

    pub fn starting_at(started_at: Instant, delay: Duration) -> Self {
        Self { started_at, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// State for a given time since start. Elapsed equal to the delay is ready.
    pub fn state_after(&self, elapsed: Duration) -> Readiness {
        if elapsed < self.delay {
            Readiness::Unready
        } else {
            Readiness::Ready
        }
    }

    /// Probe the gate at `now`. An instant before the start counts as zero elapsed.
    pub fn check_at(&self, now: Instant) -> ReadinessCheck {
        let elapsed = now.saturating_duration_since(self.started_at);
        ReadinessCheck {
            elapsed,
            readiness: self.state_after(elapsed),
        }
    }

    pub fn check(&self) -> ReadinessCheck {
        self.check_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delay_is_ready_immediately() {
        let gate = ReadinessGate::new(Duration::ZERO);
        assert_eq!(gate.state_after(Duration::ZERO), Readiness::Ready);
        assert!(gate.check().readiness.is_ready());
    }

    #[test]
    fn unready_until_delay_then_ready() {
        let gate = ReadinessGate::new(Duration::from_secs(2));
        assert_eq!(gate.state_after(Duration::ZERO), Readiness::Unready);
        assert_eq!(gate.state_after(Duration::from_millis(1999)), Readiness::Unready);
        assert_eq!(gate.state_after(Duration::from_secs(2)), Readiness::Ready);
        assert_eq!(gate.state_after(Duration::from_secs(3600)), Readiness::Ready);
    }

    #[test]
    fn check_at_measures_from_start() {
        let start = Instant::now();
        let gate = ReadinessGate::starting_at(start, Duration::from_secs(2));

        let early = gate.check_at(start + Duration::from_millis(500));
        assert_eq!(early.elapsed, Duration::from_millis(500));
        assert_eq!(early.readiness, Readiness::Unready);

        let exact = gate.check_at(start + Duration::from_secs(2));
        assert_eq!(exact.readiness, Readiness::Ready);
    }

    #[test]
    fn never_reverts_once_ready() {
        let start = Instant::now();
        let gate = ReadinessGate::starting_at(start, Duration::from_secs(1));
        let mut seen_ready = false;
        for ms in (0..5000).step_by(250) {
            let r = gate.check_at(start + Duration::from_millis(ms)).readiness;
            if seen_ready {
                assert_eq!(r, Readiness::Ready, "reverted at {ms}ms");
            }
            seen_ready |= r.is_ready();
        }
        assert!(seen_ready);
    }

    #[test]
    fn message_formats_elapsed_and_state() {
        let check = ReadinessCheck {
            elapsed: Duration::from_millis(1500),
            readiness: Readiness::Unready,
        };
        assert_eq!(
            check.message(),
            "Received a readiness request after 1.5s - unready\n"
        );

        let check = ReadinessCheck {
            elapsed: Duration::from_micros(250),
            readiness: Readiness::Ready,
        };
        assert_eq!(check.message(), "Received a readiness request after 250µs - ready\n");

        let check = ReadinessCheck {
            elapsed: Duration::from_millis(65_200),
            readiness: Readiness::Ready,
        };
        assert_eq!(check.message(), "Received a readiness request after 65.2s - ready\n");
    }
}
