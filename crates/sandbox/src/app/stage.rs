use std::rc::Rc;

use route_engine::{
    ActorRoster, Character, CharacterBody, Direction, GridBody, HostServices, RouteCompiler,
    ScriptLog, TilePos, DEFAULT_SEARCH_LIMIT,
};
use serde::Serialize;
use tracing::{debug, info};

use super::scenario::{Scenario, ScenarioError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CharacterSnapshot {
    pub(crate) label: String,
    pub(crate) position: TilePos,
    pub(crate) facing: Direction,
    pub(crate) opacity: f64,
    pub(crate) shake_offset_px: (f64, f64),
    pub(crate) scrolled: (f64, f64),
    pub(crate) route_index: Option<usize>,
    pub(crate) forcing: bool,
    pub(crate) image: Option<String>,
}

/// Every character of a scenario sharing one map, roster and compiler.
pub(crate) struct Stage {
    characters: Vec<Character<GridBody>>,
    roster: ActorRoster,
    scripts: ScriptLog,
    tick: u64,
}

impl Stage {
    pub(crate) fn from_scenario(scenario: Scenario) -> Result<Self, ScenarioError> {
        let map = Rc::new(scenario.build_map()?);
        let compiler = Rc::new(RouteCompiler::default());
        let mut characters = Vec::with_capacity(scenario.characters.len());
        for spec in scenario.characters {
            let mut body = GridBody::new(Rc::clone(&map), spec.start)
                .with_frames_per_step(spec.frames_per_step)
                .with_search_limit(spec.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT));
            if let Some(opacity) = spec.opacity {
                body = body.with_opacity(opacity);
            }
            let mut character = Character::new(
                spec.label,
                body,
                Rc::clone(&compiler),
                scenario.motion.clone(),
            );
            if spec.forced {
                character.force_install_route(spec.route);
            } else {
                character.install_route(spec.route);
            }
            characters.push(character);
        }
        info!(
            width = map.width(),
            height = map.height(),
            characters = characters.len(),
            "stage_built"
        );
        Ok(Self {
            characters,
            roster: scenario.roster,
            scripts: ScriptLog::default(),
            tick: 0,
        })
    }

    pub(crate) fn tick(&mut self) {
        self.tick += 1;
        for character in &mut self.characters {
            let mut services = HostServices::new(&self.roster, &mut self.scripts);
            character.tick(&mut services);
        }
        debug!(tick = self.tick, "stage_ticked");
    }

    pub(crate) fn tick_count(&self) -> u64 {
        self.tick
    }

    pub(crate) fn scripts(&self) -> &ScriptLog {
        &self.scripts
    }

    /// No route left to play and no effect still running.
    pub(crate) fn is_idle(&self) -> bool {
        self.characters.iter().all(|character| {
            character.route().is_none()
                && !character.is_shaking()
                && !character.is_fading()
                && character.is_stopping()
        })
    }

    pub(crate) fn snapshots(&self) -> Vec<CharacterSnapshot> {
        self.characters
            .iter()
            .map(|character| CharacterSnapshot {
                label: character.label().to_string(),
                position: character.body().position(),
                facing: character.body().facing(),
                opacity: character.opacity(),
                shake_offset_px: character.shake_screen_offset_px(),
                scrolled: (character.scrolled_x(), character.scrolled_y()),
                route_index: character.route().map(|_| character.route_index()),
                forcing: character.is_route_forcing(),
                image: character
                    .body()
                    .image()
                    .map(|portrait| format!("{}#{}", portrait.image_name, portrait.image_index)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::app::scenario::parse_scenario_json;

    fn stage_from(value: serde_json::Value) -> Stage {
        let scenario = parse_scenario_json(&value.to_string()).expect("scenario");
        Stage::from_scenario(scenario).expect("stage")
    }

    fn run_until_idle(stage: &mut Stage, limit: u64) {
        while !stage.is_idle() && stage.tick_count() < limit {
            stage.tick();
        }
    }

    #[test]
    fn walker_reaches_goal_and_goes_idle() {
        let mut stage = stage_from(json!({
            "map": { "width": 5, "height": 5 },
            "roster": { "actors": { "1": { "image_name": "Actor1", "image_index": 3 } } },
            "characters": [{
                "label": "hero",
                "start": { "x": 0, "y": 0 },
                "route": { "commands": [
                    { "kind": "script", "text": "move_r 2" },
                    { "kind": "script", "text": "ACTOR_IMG 1" },
                    { "kind": "script", "text": "this.say('hi')" },
                    { "kind": "end" }
                ]}
            }]
        }));

        run_until_idle(&mut stage, 50);

        assert!(stage.is_idle());
        let snapshot = &stage.snapshots()[0];
        assert_eq!(snapshot.position, TilePos::new(2, 0));
        assert_eq!(snapshot.facing, Direction::Right);
        assert_eq!(snapshot.image.as_deref(), Some("Actor1#3"));
        assert_eq!(snapshot.route_index, None);
        assert_eq!(
            stage.scripts().scripts_for("hero").collect::<Vec<_>>(),
            vec!["this.say('hi')"]
        );
    }

    #[test]
    fn fading_character_is_not_idle_until_done() {
        let mut stage = stage_from(json!({
            "map": { "width": 3, "height": 3 },
            "characters": [{
                "label": "ghost",
                "start": { "x": 1, "y": 1 },
                "route": { "commands": [
                    { "kind": "script", "text": "FADE_OUT 6 false" },
                    { "kind": "end" }
                ]}
            }]
        }));

        stage.tick();
        assert!(!stage.is_idle());

        run_until_idle(&mut stage, 20);
        assert_eq!(stage.tick_count(), 6);
        assert_eq!(stage.snapshots()[0].opacity, 0.0);
    }

    #[test]
    fn starting_opacity_comes_from_the_scenario() {
        let mut stage = stage_from(json!({
            "map": { "width": 3, "height": 1 },
            "characters": [{
                "label": "ghost",
                "start": { "x": 0, "y": 0 },
                "opacity": 0.0,
                "search_limit": 4,
                "route": { "commands": [
                    { "kind": "script", "text": "FADE_IN 5" },
                    { "kind": "script", "text": "TOWARD_TARGET 2 0" },
                    { "kind": "end" }
                ]}
            }]
        }));
        assert_eq!(stage.snapshots()[0].opacity, 0.0);

        stage.tick();
        assert_eq!(stage.snapshots()[0].opacity, 51.0);

        run_until_idle(&mut stage, 20);
        assert_eq!(stage.snapshots()[0].opacity, 255.0);
        assert_eq!(stage.snapshots()[0].position, TilePos::new(2, 0));
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let stage = stage_from(json!({
            "map": { "width": 2, "height": 2 },
            "characters": [{ "label": "idle", "start": { "x": 1, "y": 0 } }]
        }));

        let value = serde_json::to_value(stage.snapshots()).expect("json");

        assert_eq!(value[0]["label"], "idle");
        assert_eq!(value[0]["position"], json!({ "x": 1, "y": 0 }));
        assert_eq!(value[0]["facing"], "down");
        assert!(stage.is_idle());
    }
}
