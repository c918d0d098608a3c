use rand::Rng;
use tracing::debug;

use super::Character;
use crate::host::{ActorDirectory, CharacterBody};
use crate::motion::{FadeDirection, ShakeAxis};
use crate::route::{Direction, Invocation, InvocationError, InvocationTarget, TilePos};

impl<B: CharacterBody> Character<B> {
    /// Runs a compiled mnemonic. Arguments are checked here, not at compile
    /// time.
    pub fn invoke(
        &mut self,
        invocation: &Invocation,
        actors: &dyn ActorDirectory,
    ) -> Result<(), InvocationError> {
        match invocation.target {
            InvocationTarget::MoveStraightRepeat { direction } => {
                let repeat_count = invocation.optional_number(0)?.unwrap_or(1.0);
                self.move_straight_repeat(direction, repeat_count);
            }
            InvocationTarget::StartShake { axis } => {
                let power = invocation.non_negative(0)?;
                let speed = invocation.non_negative(1)?;
                let duration = invocation.integer(2)?;
                self.start_shake(axis, power, speed, saturate_i32(duration));
            }
            InvocationTarget::StartFade { direction } => {
                let duration = invocation.number(0)?;
                let wait = invocation.truthy(1)?;
                self.start_fade(direction, duration, wait)?;
            }
            InvocationTarget::SetActorImage => {
                self.set_actor_image(invocation.integer(0)?, actors);
            }
            InvocationTarget::SetMemberImage => {
                self.set_member_image(invocation.integer(0)?, actors);
            }
            InvocationTarget::MoveTowardTarget => {
                let x = saturate_i32(invocation.integer(0)?);
                let y = saturate_i32(invocation.integer(1)?);
                self.move_toward_target(TilePos::new(x, y));
            }
            InvocationTarget::RandomWait => {
                let min = invocation.integer(0)?;
                let max = invocation.integer(1)?;
                self.random_wait(min, max)?;
            }
        }
        Ok(())
    }

    /// One step of a multi-step straight move. The route cursor is held on
    /// the calling command while fewer than `repeat_count` steps succeeded,
    /// or forever while blocked on a route that is not skippable.
    pub fn move_straight_repeat(&mut self, direction: Direction, repeat_count: f64) {
        if self.move_straight(direction) {
            let moved = self.motion.continuation.record_move();
            if f64::from(moved) < repeat_count {
                self.motion.continuation.hold();
            }
            return;
        }

        let skippable = self
            .player
            .route()
            .is_some_and(|route| route.skippable_on_block);
        if self.player.has_route() && !skippable {
            self.motion.continuation.hold();
        }
    }

    pub fn start_shake(&mut self, axis: ShakeAxis, power: f64, speed: f64, duration: i32) {
        self.motion.shake.start(axis, power, speed, duration);
    }

    /// Fades over `duration` ticks; a fractional duration runs its last,
    /// partial tick in full.
    pub fn start_fade(
        &mut self,
        direction: FadeDirection,
        duration: f64,
        wait: bool,
    ) -> Result<(), InvocationError> {
        if duration <= 0.0 {
            return Err(InvocationError::NonPositiveFadeDuration { duration });
        }
        self.motion
            .fade
            .start(direction, duration, self.config.opacity_span, wait);
        Ok(())
    }

    /// Returns whether the image changed.
    pub fn set_actor_image(&mut self, actor_id: i64, actors: &dyn ActorDirectory) -> bool {
        let Some(portrait) = actors.portrait(actor_id) else {
            debug!(character = self.label.as_str(), actor_id, "actor_image_missing");
            return false;
        };
        self.body.set_image(&portrait);
        true
    }

    /// Returns whether the image changed; slots past the party size do not.
    pub fn set_member_image(&mut self, slot: i64, actors: &dyn ActorDirectory) -> bool {
        let Some(portrait) = actors.portrait_by_slot(slot) else {
            debug!(character = self.label.as_str(), slot, "member_image_missing");
            return false;
        };
        self.body.set_image(&portrait);
        true
    }

    /// One step toward `target`, holding the route cursor until the
    /// character stands on it. There is no step limit.
    pub fn move_toward_target(&mut self, target: TilePos) {
        let Some(direction) = self.body.direction_toward(target) else {
            return;
        };
        self.move_straight(direction);
        if self.body.position() != target {
            self.motion.continuation.hold();
        }
    }

    /// Sets the route wait counter to a value drawn from `[min, max)`.
    pub fn random_wait(&mut self, min: i64, max: i64) -> Result<u32, InvocationError> {
        if max <= min {
            return Err(InvocationError::EmptyWaitRange { min, max });
        }
        let frames = min.saturating_add(self.rng.gen_range(0..max.saturating_sub(min)));
        let frames = u32::try_from(frames.max(0)).unwrap_or(u32::MAX);
        self.player.set_wait_count(frames);
        Ok(frames)
    }
}

fn saturate_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
