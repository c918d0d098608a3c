//! Seams to the host game: the moving body, the actor registry and the native
//! script evaluator. `grid` and `roster` are in-memory implementations used by
//! the sandbox and the tests.

mod grid;
mod roster;

use serde::{Deserialize, Serialize};

use crate::route::{Direction, TilePos};

pub use grid::{GridBody, GridError, GridMap, DEFAULT_SEARCH_LIMIT};
pub use roster::{ActorRoster, ScriptLog};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portrait {
    pub image_name: String,
    pub image_index: u32,
}

/// The host's base character: grid movement, jump/move interpolation,
/// animation and rendered opacity.
pub trait CharacterBody {
    fn position(&self) -> TilePos;
    /// Attempts one grid step. Returns whether the step happened.
    fn step_in_direction(&mut self, direction: Direction) -> bool;
    /// First step of a path toward `target`, or `None` when already there.
    fn direction_toward(&self, target: TilePos) -> Option<Direction>;
    fn set_facing(&mut self, direction: Direction);

    fn is_moving(&self) -> bool;
    fn is_jumping(&self) -> bool;
    fn update_move(&mut self);
    fn update_jump(&mut self);
    fn update_animation(&mut self);

    fn opacity(&self) -> f64;
    fn set_opacity(&mut self, opacity: f64);
    fn set_image(&mut self, portrait: &Portrait);

    /// Interpolated position in tile units, before any shake displacement.
    fn base_scroll_position(&self) -> (f64, f64);
}

/// Read-only view of the actor database and current party order.
pub trait ActorDirectory {
    fn portrait(&self, actor_id: i64) -> Option<Portrait>;
    fn portrait_by_slot(&self, slot: i64) -> Option<Portrait>;
}

/// Receives script commands that are not registered mnemonics.
pub trait ScriptEvaluator {
    fn evaluate(&mut self, character: &str, text: &str);
}

/// Collaborators a character reaches through during a tick.
pub struct HostServices<'a> {
    pub actors: &'a dyn ActorDirectory,
    pub scripts: &'a mut dyn ScriptEvaluator,
}

impl<'a> HostServices<'a> {
    pub fn new(actors: &'a dyn ActorDirectory, scripts: &'a mut dyn ScriptEvaluator) -> Self {
        Self { actors, scripts }
    }
}
