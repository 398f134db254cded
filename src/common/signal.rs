use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation flag shared by all workers plus the global wall-clock
/// deadline. Both are polled between node expansions and at the top of
/// every worker loop.
#[derive(Clone, Debug)]
pub struct StopSignal {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl StopSignal {
    pub fn new(time_limit: Option<Duration>) -> Self {
        StopSignal {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: time_limit.map(|limit| Instant::now() + limit),
        }
    }

    pub fn unlimited() -> Self {
        StopSignal::new(None)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn should_stop(&self) -> bool {
        self.is_cancelled() || self.is_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_seen_by_clones() {
        let signal = StopSignal::unlimited();
        let other = signal.clone();
        assert!(!other.should_stop());
        signal.cancel();
        assert!(other.is_cancelled());
        assert!(other.should_stop());
    }

    #[test]
    fn test_expired_deadline() {
        let signal = StopSignal::new(Some(Duration::ZERO));
        assert!(signal.is_expired());
        assert!(!signal.is_cancelled());
        assert!(signal.should_stop());
    }
}
