use super::fade::FadeState;
use super::shake::ShakeState;

/// What the route cursor should do after the current command ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RouteStep {
    #[default]
    Advance,
    /// Re-run the same command next time the route is processed.
    Hold,
    /// Stop the route in place.
    Abort,
}

/// One-shot cursor signal plus the repeat counter for multi-step moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteContinuation {
    pending: RouteStep,
    consecutive_move_count: u32,
}

impl RouteContinuation {
    /// Abort wins over Hold; nothing downgrades a pending request.
    pub fn request(&mut self, step: RouteStep) {
        self.pending = match (self.pending, step) {
            (RouteStep::Abort, _) | (_, RouteStep::Abort) => RouteStep::Abort,
            (RouteStep::Hold, _) | (_, RouteStep::Hold) => RouteStep::Hold,
            _ => RouteStep::Advance,
        };
    }

    pub fn hold(&mut self) {
        self.request(RouteStep::Hold);
    }

    pub fn pending(&self) -> RouteStep {
        self.pending
    }

    pub fn take(&mut self) -> RouteStep {
        std::mem::take(&mut self.pending)
    }

    pub fn record_move(&mut self) -> u32 {
        self.consecutive_move_count = self.consecutive_move_count.saturating_add(1);
        self.consecutive_move_count
    }

    pub fn consecutive_move_count(&self) -> u32 {
        self.consecutive_move_count
    }

    pub(crate) fn reset_move_count(&mut self) {
        self.consecutive_move_count = 0;
    }
}

/// Per-character shake, fade and route-continuation state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionState {
    pub shake: ShakeState,
    pub fade: FadeState,
    pub continuation: RouteContinuation,
}

impl MotionState {
    pub fn is_shaking(&self) -> bool {
        self.shake.is_shaking()
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_fading()
    }

    /// True while an effect must keep the character from counting as stopped.
    pub fn holds_stop(&self) -> bool {
        self.is_shaking() || (self.fade.blocks_advance() && self.is_fading())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{FadeDirection, ShakeAxis};

    #[test]
    fn continuation_signal_is_one_shot() {
        let mut continuation = RouteContinuation::default();
        continuation.hold();
        assert_eq!(continuation.take(), RouteStep::Hold);
        assert_eq!(continuation.take(), RouteStep::Advance);
    }

    #[test]
    fn abort_is_not_downgraded_by_hold() {
        let mut continuation = RouteContinuation::default();
        continuation.request(RouteStep::Abort);
        continuation.hold();
        assert_eq!(continuation.pending(), RouteStep::Abort);
    }

    #[test]
    fn move_count_accumulates_until_reset() {
        let mut continuation = RouteContinuation::default();
        assert_eq!(continuation.record_move(), 1);
        assert_eq!(continuation.record_move(), 2);
        continuation.reset_move_count();
        assert_eq!(continuation.consecutive_move_count(), 0);
    }

    #[test]
    fn only_a_waiting_fade_holds_the_stop() {
        let mut motion = MotionState::default();
        motion.fade.start(FadeDirection::Out, 10.0, 255.0, false);
        assert!(!motion.holds_stop());

        motion.fade.start(FadeDirection::Out, 10.0, 255.0, true);
        assert!(motion.holds_stop());

        motion.fade = Default::default();
        motion.shake.start(ShakeAxis::Vertical, 1.0, 1.0, 2);
        assert!(motion.holds_stop());
    }
}
