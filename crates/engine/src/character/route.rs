use tracing::{debug, info, warn};

use super::Character;
use crate::host::{CharacterBody, HostServices};
use crate::motion::RouteStep;
use crate::route::{Direction, MoveRoute, RouteCommand};

#[derive(Debug, Clone)]
struct SavedRoute {
    route: Option<MoveRoute>,
    index: usize,
}

/// Cursor over the installed route, as kept by the host's route player.
#[derive(Debug, Clone, Default)]
pub(super) struct RoutePlayer {
    route: Option<MoveRoute>,
    index: usize,
    forcing: bool,
    original: Option<SavedRoute>,
    wait_count: u32,
    movement_succeeded: bool,
}

impl RoutePlayer {
    pub(super) fn has_route(&self) -> bool {
        self.route.is_some()
    }

    pub(super) fn route(&self) -> Option<&MoveRoute> {
        self.route.as_ref()
    }

    pub(super) fn set_wait_count(&mut self, frames: u32) {
        self.wait_count = frames;
    }
}

/// Commands the cursor cycles through on a repeating route. A trailing `End`
/// is not part of the cycle.
fn playable_len(route: &MoveRoute) -> usize {
    match route.commands.last() {
        Some(RouteCommand::End) => route.len() - 1,
        _ => route.len(),
    }
}

impl<B: CharacterBody> Character<B> {
    /// Compiles and installs `route`. `None` clears the current route.
    pub fn install_route(&mut self, route: Option<MoveRoute>) {
        let route = route.map(|route| self.compiler.compile(&route));
        if let Some(route) = &route {
            info!(
                character = self.label.as_str(),
                commands = route.len(),
                repeat = route.repeats_when_done,
                "route_installed"
            );
        }
        self.base_install_route(route);
    }

    /// Compiles `route` and runs it in place of the current one, which is
    /// restored once the forced route ends. `None` leaves everything as is.
    pub fn force_install_route(&mut self, route: Option<MoveRoute>) {
        let Some(route) = route else {
            debug!(character = self.label.as_str(), "forced_route_missing");
            return;
        };
        let route = self.compiler.compile(&route);
        info!(
            character = self.label.as_str(),
            commands = route.len(),
            wait = route.waits_for_completion,
            "route_forced"
        );
        self.base_force_install_route(route);
    }

    fn base_install_route(&mut self, route: Option<MoveRoute>) {
        self.player.route = route;
        self.player.index = 0;
        self.player.forcing = false;
        self.motion.continuation.take();
        self.motion.continuation.reset_move_count();
    }

    fn base_force_install_route(&mut self, route: MoveRoute) {
        if self.player.original.is_none() {
            self.player.original = Some(SavedRoute {
                route: self.player.route.take(),
                index: self.player.index,
            });
        }
        self.base_install_route(Some(route));
        self.player.forcing = true;
        self.player.wait_count = 0;
    }

    pub fn route(&self) -> Option<&MoveRoute> {
        self.player.route()
    }

    pub fn route_index(&self) -> usize {
        self.player.index
    }

    pub fn is_route_forcing(&self) -> bool {
        self.player.forcing
    }

    /// A forced route that the caller asked to wait on is still running.
    pub fn is_waiting_for_forced_route(&self) -> bool {
        self.player.forcing
            && self
                .player
                .route
                .as_ref()
                .is_some_and(|route| route.waits_for_completion)
    }

    pub fn wait_count(&self) -> u32 {
        self.player.wait_count
    }

    pub fn movement_succeeded(&self) -> bool {
        self.player.movement_succeeded
    }

    pub(super) fn update_routine_move(&mut self, services: &mut HostServices<'_>) {
        if self.player.wait_count > 0 {
            self.player.wait_count -= 1;
            return;
        }

        self.player.movement_succeeded = true;
        let command = self
            .player
            .route
            .as_ref()
            .and_then(|route| route.command_at(self.player.index))
            .cloned();
        match command {
            None | Some(RouteCommand::End) => self.process_route_end(),
            Some(command) => {
                self.process_route_command(&command, services);
                self.advance_route_index();
            }
        }
    }

    fn process_route_command(&mut self, command: &RouteCommand, services: &mut HostServices<'_>) {
        match command {
            RouteCommand::End => {}
            RouteCommand::Move { direction } => {
                self.move_straight(*direction);
            }
            RouteCommand::Turn { direction } => self.body.set_facing(*direction),
            RouteCommand::Wait { frames } => {
                self.player.set_wait_count(frames.saturating_sub(1));
            }
            RouteCommand::Script { text } => services.scripts.evaluate(&self.label, text),
            RouteCommand::Invocation(invocation) => {
                if let Err(error) = self.invoke(invocation, services.actors) {
                    warn!(
                        character = self.label.as_str(),
                        index = self.player.index,
                        invocation = %invocation,
                        error = %error,
                        "invocation_failed"
                    );
                }
            }
        }
    }

    /// Host grid step that also records the outcome for route advancement.
    pub(super) fn move_straight(&mut self, direction: Direction) -> bool {
        let succeeded = self.body.step_in_direction(direction);
        self.player.movement_succeeded = succeeded;
        succeeded
    }

    /// Cursor advance, honoring a hold or abort requested by the command that
    /// just ran. The signal is consumed either way.
    pub(super) fn advance_route_index(&mut self) {
        match self.motion.continuation.take() {
            RouteStep::Hold => {}
            RouteStep::Abort => {
                info!(
                    character = self.label.as_str(),
                    index = self.player.index,
                    "route_aborted"
                );
                self.finish_route();
            }
            RouteStep::Advance => {
                if self.base_advance_route_index() {
                    self.motion.continuation.reset_move_count();
                }
            }
        }
    }

    fn base_advance_route_index(&mut self) -> bool {
        let Some(route) = self.player.route.as_ref() else {
            return false;
        };
        if !self.player.movement_succeeded && !route.skippable_on_block {
            return false;
        }
        self.player.index += 1;
        if route.repeats_when_done && self.player.index >= playable_len(route) {
            self.player.index = 0;
        }
        true
    }

    fn process_route_end(&mut self) {
        let repeats = self
            .player
            .route
            .as_ref()
            .is_some_and(|route| route.repeats_when_done);
        if repeats {
            self.player.index = 0;
            self.motion.continuation.reset_move_count();
            return;
        }
        self.finish_route();
    }

    fn finish_route(&mut self) {
        if self.player.forcing {
            let saved = self.player.original.take();
            let (route, index) = match saved {
                Some(saved) => (saved.route, saved.index),
                None => (None, 0),
            };
            self.base_install_route(route);
            self.player.index = index;
            debug!(
                character = self.label.as_str(),
                restored = self.player.route.is_some(),
                "forced_route_finished"
            );
            return;
        }
        self.base_install_route(None);
        debug!(character = self.label.as_str(), "route_finished");
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::host::{ActorRoster, CharacterBody, ScriptLog};
    use crate::motion::RouteStep;
    use crate::route::{Direction, MoveRoute, RouteCommand, TilePos};

    fn step(direction: Direction) -> RouteCommand {
        RouteCommand::Move { direction }
    }

    #[test]
    fn install_compiles_scripts_and_starts_at_zero() {
        let mut character = open_character(TilePos::new(0, 0));
        character.install_route(Some(MoveRoute::new(vec![
            RouteCommand::script("MOVE_R 2"),
            RouteCommand::End,
        ])));

        let route = character.route().expect("route");
        assert!(route.is_compiled());
        assert!(matches!(route.commands[0], RouteCommand::Invocation(_)));
        assert_eq!(character.route_index(), 0);
        assert!(!character.is_route_forcing());
    }

    #[test]
    fn install_none_clears_the_route() {
        let mut character = open_character(TilePos::new(0, 0));
        character.install_route(Some(MoveRoute::new(vec![RouteCommand::End])));
        character.install_route(None);
        assert!(character.route().is_none());
    }

    #[test]
    fn plain_route_walks_and_finishes() {
        let mut character = open_character(TilePos::new(0, 0));
        character.install_route(Some(MoveRoute::new(vec![
            step(Direction::Right),
            step(Direction::Down),
            RouteCommand::End,
        ])));

        tick_n(
            &mut character,
            &ActorRoster::new(),
            &mut ScriptLog::default(),
            3,
        );

        assert_eq!(character.body().position(), TilePos::new(1, 1));
        assert!(character.route().is_none());
    }

    #[test]
    fn blocked_step_retries_unless_skippable() {
        let mut character = open_character(TilePos::new(0, 0));
        character.install_route(Some(MoveRoute::new(vec![
            step(Direction::Up),
            RouteCommand::End,
        ])));
        tick_n(
            &mut character,
            &ActorRoster::new(),
            &mut ScriptLog::default(),
            5,
        );
        assert_eq!(character.route_index(), 0);

        character.install_route(Some(
            MoveRoute::new(vec![step(Direction::Up), RouteCommand::End]).skippable(true),
        ));
        tick_n(
            &mut character,
            &ActorRoster::new(),
            &mut ScriptLog::default(),
            1,
        );
        assert_eq!(character.route_index(), 1);
    }

    #[test]
    fn repeating_route_wraps_before_end() {
        let mut character = open_character(TilePos::new(0, 0));
        character.install_route(Some(
            MoveRoute::new(vec![
                step(Direction::Right),
                step(Direction::Left),
                RouteCommand::End,
            ])
            .repeating(true),
        ));

        tick_n(
            &mut character,
            &ActorRoster::new(),
            &mut ScriptLog::default(),
            5,
        );

        assert_eq!(character.route_index(), 1);
        assert_eq!(character.body().position(), TilePos::new(1, 0));
        assert!(character.route().is_some());
    }

    #[test]
    fn wait_command_counts_down_frames() {
        let mut character = open_character(TilePos::new(0, 0));
        character.install_route(Some(MoveRoute::new(vec![
            RouteCommand::Wait { frames: 3 },
            step(Direction::Right),
            RouteCommand::End,
        ])));

        tick_n(
            &mut character,
            &ActorRoster::new(),
            &mut ScriptLog::default(),
            3,
        );
        assert_eq!(character.body().position(), TilePos::new(0, 0));
        tick_n(
            &mut character,
            &ActorRoster::new(),
            &mut ScriptLog::default(),
            1,
        );
        assert_eq!(character.body().position(), TilePos::new(1, 0));
    }

    #[test]
    fn unknown_scripts_reach_the_evaluator() {
        let mut character = open_character(TilePos::new(0, 0));
        let mut scripts = ScriptLog::default();
        character.install_route(Some(MoveRoute::new(vec![
            RouteCommand::script("FOO 1 2"),
            RouteCommand::script("this.setOpacity(0)"),
            RouteCommand::End,
        ])));

        tick_n(&mut character, &ActorRoster::new(), &mut scripts, 2);

        assert_eq!(
            scripts.scripts_for("tester").collect::<Vec<_>>(),
            vec!["FOO 1 2", "this.setOpacity(0)"]
        );
    }

    #[test]
    fn failed_invocation_is_logged_and_skipped() {
        let mut character = open_character(TilePos::new(0, 0));
        character.install_route(Some(MoveRoute::new(vec![
            RouteCommand::script("FADE_IN 0 true"),
            RouteCommand::script("SHAKE_V x 1 1"),
            step(Direction::Right),
            RouteCommand::End,
        ])));

        tick_n(
            &mut character,
            &ActorRoster::new(),
            &mut ScriptLog::default(),
            3,
        );

        assert!(!character.is_fading());
        assert!(!character.is_shaking());
        assert_eq!(character.body().position(), TilePos::new(1, 0));
    }

    #[test]
    fn forced_route_restores_the_original() {
        let mut character = open_character(TilePos::new(0, 0));
        character.install_route(Some(
            MoveRoute::new(vec![
                step(Direction::Right),
                step(Direction::Left),
                RouteCommand::End,
            ])
            .repeating(true),
        ));
        tick_n(
            &mut character,
            &ActorRoster::new(),
            &mut ScriptLog::default(),
            1,
        );
        assert_eq!(character.route_index(), 1);

        character.force_install_route(Some(
            MoveRoute::new(vec![step(Direction::Down), RouteCommand::End]).waiting(true),
        ));
        assert!(character.is_waiting_for_forced_route());

        tick_n(
            &mut character,
            &ActorRoster::new(),
            &mut ScriptLog::default(),
            2,
        );

        assert!(!character.is_route_forcing());
        assert!(!character.is_waiting_for_forced_route());
        assert_eq!(character.route_index(), 1);
        assert!(character.route().is_some_and(|route| route.repeats_when_done));
        assert_eq!(character.body().position(), TilePos::new(1, 1));
    }

    #[test]
    fn forced_route_compiles_mnemonics_before_restoring() {
        let mut character = open_character(TilePos::new(0, 0));
        character.install_route(Some(MoveRoute::new(vec![
            step(Direction::Right),
            RouteCommand::End,
        ])));

        character.force_install_route(Some(MoveRoute::new(vec![
            RouteCommand::script("MOVE_D 2"),
            RouteCommand::End,
        ])));

        let forced = character.route().expect("forced route");
        assert!(forced.is_compiled());
        assert!(matches!(forced.commands[0], RouteCommand::Invocation(_)));
        assert!(character.is_route_forcing());

        let mut scripts = ScriptLog::default();
        tick_n(&mut character, &ActorRoster::new(), &mut scripts, 2);
        assert_eq!(character.body().position(), TilePos::new(0, 2));
        assert!(character.is_route_forcing());

        tick_n(&mut character, &ActorRoster::new(), &mut scripts, 1);
        assert!(!character.is_route_forcing());
        assert_eq!(character.route_index(), 0);
        assert!(scripts.entries().is_empty());

        tick_n(&mut character, &ActorRoster::new(), &mut scripts, 1);
        assert_eq!(character.body().position(), TilePos::new(1, 2));
    }

    #[test]
    fn force_install_none_is_ignored() {
        let mut character = open_character(TilePos::new(0, 0));
        character.install_route(Some(MoveRoute::new(vec![RouteCommand::End])));
        character.force_install_route(None);
        assert!(!character.is_route_forcing());
        assert!(character.route().is_some());
    }

    #[test]
    fn abort_stops_the_route_in_place() {
        let mut character = open_character(TilePos::new(0, 0));
        character.install_route(Some(MoveRoute::new(vec![
            step(Direction::Right),
            step(Direction::Right),
            RouteCommand::End,
        ])));
        character.motion.continuation.request(RouteStep::Abort);
        character.advance_route_index();

        assert!(character.route().is_none());
        assert_eq!(character.motion().continuation.pending(), RouteStep::Advance);
    }
}
