use std::time::{Duration, Instant};

/// Admits at most one action per window; repeats inside the window are
/// dropped rather than queued.
#[derive(Debug, Clone)]
pub struct Cooldown {
    window: Duration,
    last: Option<Instant>,
}

impl Cooldown {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        self.last
            .map_or(true, |last| now.saturating_duration_since(last) >= self.window)
    }

    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_inside_window_only() {
        let start = Instant::now();
        let mut cooldown = Cooldown::new(Duration::from_millis(1500));
        assert!(cooldown.is_ready(start));

        cooldown.mark(start);
        assert!(!cooldown.is_ready(start));
        assert!(!cooldown.is_ready(start + Duration::from_millis(1499)));
        assert!(cooldown.is_ready(start + Duration::from_millis(1500)));

        cooldown.reset();
        assert!(cooldown.is_ready(start));
    }

    #[test]
    fn zero_window_never_blocks() {
        let now = Instant::now();
        let mut cooldown = Cooldown::new(Duration::ZERO);
        cooldown.mark(now);
        assert!(cooldown.is_ready(now));
    }
}
