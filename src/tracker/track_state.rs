/// Tracking signals derived once per update cycle.
///
/// Only meaningful inside the status notification of the cycle that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackingStatus {
    /// A tracking session is active.
    pub is_tracking: bool,
    /// First update of a new tracking session.
    pub just_started: bool,
    /// The session target is considered lost in this update.
    pub just_lost: bool,
}

/// Debounce window for target loss.
///
/// Right after tracking starts the engine may need several frames before it
/// finds the target, so misses are tolerated up to a threshold. Once the
/// target has been seen the window closes and any miss counts as a loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossWindow {
    /// Misses are being counted against the tolerance.
    Grace { misses: u32 },
    /// The target was found; no more tolerance.
    Closed,
}

impl Default for LossWindow {
    fn default() -> Self {
        LossWindow::Grace { misses: 0 }
    }
}

impl LossWindow {
    /// Record a frame without the target and report whether it counts as lost.
    pub fn record_miss(&mut self, tolerance: u32) -> bool {
        match self {
            LossWindow::Grace { misses } => {
                *misses = misses.saturating_add(1);
                *misses > tolerance
            }
            LossWindow::Closed => true,
        }
    }

    /// Record a frame where the target was found.
    pub fn record_hit(&mut self) {
        *self = LossWindow::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grace_window_tolerates_misses() {
        let mut window = LossWindow::default();
        for _ in 0..15 {
            assert!(!window.record_miss(15));
        }
        assert!(window.record_miss(15));
        assert!(window.record_miss(15));
    }

    #[test]
    fn test_closed_window_has_no_tolerance() {
        let mut window = LossWindow::default();
        window.record_miss(15);
        window.record_hit();
        assert_eq!(window, LossWindow::Closed);
        assert!(window.record_miss(15));
    }

    #[test]
    fn test_counter_saturates() {
        let mut window = LossWindow::Grace { misses: u32::MAX };
        assert!(window.record_miss(15));
        assert_eq!(window, LossWindow::Grace { misses: u32::MAX });
    }
}
