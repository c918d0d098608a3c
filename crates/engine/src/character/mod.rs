mod invoke;
mod route;

use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::MotionConfig;
use crate::host::{CharacterBody, HostServices};
use crate::motion::MotionState;
use crate::route::RouteCompiler;

use route::RoutePlayer;

/// A host body extended with shake, fade and the compiled move-route hook.
pub struct Character<B> {
    label: String,
    body: B,
    motion: MotionState,
    player: RoutePlayer,
    compiler: Rc<RouteCompiler>,
    config: MotionConfig,
    rng: StdRng,
}

impl<B: CharacterBody> Character<B> {
    pub fn new(
        label: impl Into<String>,
        body: B,
        compiler: Rc<RouteCompiler>,
        config: MotionConfig,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            label: label.into(),
            body,
            motion: MotionState::default(),
            player: RoutePlayer::default(),
            compiler,
            config,
            rng,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn is_shaking(&self) -> bool {
        self.motion.is_shaking()
    }

    pub fn is_fading(&self) -> bool {
        self.motion.is_fading()
    }

    /// The body has nothing in flight and no effect is holding it.
    pub fn is_stopping(&self) -> bool {
        !self.body.is_moving() && !self.body.is_jumping() && !self.motion.holds_stop()
    }

    /// One simulation frame. The step order is fixed: stop handling, then
    /// shake or jump or move, then animation, then fade.
    pub fn tick(&mut self, services: &mut HostServices<'_>) {
        if self.is_stopping() {
            self.update_stop(services);
        }
        if self.motion.is_shaking() {
            self.motion.shake.update();
        } else if self.body.is_jumping() {
            self.body.update_jump();
        } else if self.body.is_moving() {
            self.body.update_move();
        }
        self.body.update_animation();
        self.update_fade();
    }

    fn update_stop(&mut self, services: &mut HostServices<'_>) {
        if self.player.has_route() {
            self.update_routine_move(services);
        }
    }

    fn update_fade(&mut self) {
        if let Some(delta) = self.motion.fade.update() {
            let opacity = self.body.opacity();
            self.body.set_opacity(opacity + delta);
        }
    }

    pub fn opacity(&self) -> f64 {
        self.body.opacity()
    }

    /// `(horizontal, vertical)` shake displacement in pixels.
    pub fn shake_screen_offset_px(&self) -> (f64, f64) {
        self.motion.shake.screen_offset_px()
    }

    pub fn scrolled_x(&self) -> f64 {
        let (shake_x, _) = self
            .motion
            .shake
            .scroll_offset(self.config.tile_width, self.config.tile_height);
        self.body.base_scroll_position().0 + shake_x
    }

    pub fn scrolled_y(&self) -> f64 {
        let (_, shake_y) = self
            .motion
            .shake
            .scroll_offset(self.config.tile_width, self.config.tile_height);
        self.body.base_scroll_position().1 + shake_y
    }
}

impl<B> std::fmt::Debug for Character<B>
where
    B: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Character")
            .field("label", &self.label)
            .field("body", &self.body)
            .field("motion", &self.motion)
            .field("player", &self.player)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::rc::Rc;

    use crate::config::MotionConfig;
    use crate::host::{ActorRoster, GridBody, GridMap, HostServices, ScriptLog};
    use crate::route::{RouteCompiler, TilePos};

    use super::Character;

    pub(crate) fn character_on(map: GridMap, start: TilePos) -> Character<GridBody> {
        let body = GridBody::new(Rc::new(map), start);
        Character::new(
            "tester",
            body,
            Rc::new(RouteCompiler::default()),
            MotionConfig::seeded(11),
        )
    }

    pub(crate) fn open_character(start: TilePos) -> Character<GridBody> {
        character_on(GridMap::new(10, 10).expect("grid"), start)
    }

    pub(crate) fn tick_n(
        character: &mut Character<GridBody>,
        roster: &ActorRoster,
        scripts: &mut ScriptLog,
        ticks: usize,
    ) {
        for _ in 0..ticks {
            let mut services = HostServices::new(roster, &mut *scripts);
            character.tick(&mut services);
        }
    }
}
