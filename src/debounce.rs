use std::time::{Duration, Instant};

/// Trailing-edge debounce. Every `call` replaces the pending payload and
/// pushes the deadline out; `poll` fires at most once after the quiet window.
pub struct Debouncer<T> {
    wait: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    pub fn call(&mut self, args: T, now: Instant) {
        self.pending = Some((args, now + self.wait));
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => {
                self.pending.take().map(|(args, _)| args)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_last_call_fires() {
        let mut debounce = Debouncer::new(Duration::from_millis(300));
        let start = Instant::now();

        for (i, offset) in [0, 50, 100].into_iter().enumerate() {
            debounce.call(i, start + Duration::from_millis(offset));
        }

        // still inside the window of the last call
        assert_eq!(debounce.poll(start + Duration::from_millis(300)), None);

        let fired = debounce.poll(start + Duration::from_millis(400));
        assert_eq!(fired, Some(2));

        // one shot only
        assert_eq!(debounce.poll(start + Duration::from_millis(800)), None);
        assert!(!debounce.is_pending());
    }

    #[test]
    fn idle_debouncer_never_fires() {
        let mut debounce = Debouncer::<()>::new(Duration::from_millis(300));
        assert_eq!(debounce.poll(Instant::now()), None);
    }
}
