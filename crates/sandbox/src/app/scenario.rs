use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use route_engine::{ActorRoster, GridError, GridMap, MotionConfig, MoveRoute, TilePos};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse scenario json: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
    #[error("parse scenario json at {path}: {source}")]
    ParseAt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid map: {0}")]
    Map(#[from] GridError),
    #[error("validation failed at {path}: {message}")]
    Validation { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct MapSpec {
    pub(crate) width: u32,
    pub(crate) height: u32,
    #[serde(default)]
    pub(crate) blocked: Vec<TilePos>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct CharacterSpec {
    pub(crate) label: String,
    pub(crate) start: TilePos,
    #[serde(default)]
    pub(crate) frames_per_step: u32,
    #[serde(default)]
    pub(crate) forced: bool,
    /// Starting opacity; fully opaque when absent.
    pub(crate) opacity: Option<f64>,
    /// Path search depth for goal-seeking moves.
    pub(crate) search_limit: Option<u32>,
    pub(crate) route: Option<MoveRoute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Scenario {
    pub(crate) map: MapSpec,
    #[serde(default)]
    pub(crate) motion: MotionConfig,
    #[serde(default)]
    pub(crate) roster: ActorRoster,
    pub(crate) characters: Vec<CharacterSpec>,
}

impl Scenario {
    pub(crate) fn build_map(&self) -> Result<GridMap, ScenarioError> {
        let mut map = GridMap::new(self.map.width, self.map.height)?;
        for tile in &self.map.blocked {
            map.block(*tile)?;
        }
        Ok(map)
    }
}

pub(crate) fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let raw = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scenario_json(&raw)
}

pub(crate) fn parse_scenario_json(raw: &str) -> Result<Scenario, ScenarioError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let scenario = serde_path_to_error::deserialize::<_, Scenario>(&mut deserializer).map_err(
        |error| {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                ScenarioError::Parse { source }
            } else {
                ScenarioError::ParseAt { path, source }
            }
        },
    )?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

fn validation_err(path: impl Into<String>, message: impl Into<String>) -> ScenarioError {
    ScenarioError::Validation {
        path: path.into(),
        message: message.into(),
    }
}

fn validate_scenario(scenario: &Scenario) -> Result<(), ScenarioError> {
    let map = scenario.build_map()?;
    if scenario.motion.tile_width <= 0.0 || scenario.motion.tile_height <= 0.0 {
        return Err(validation_err("motion", "tile dimensions must be positive"));
    }

    let mut labels = HashSet::new();
    for (index, character) in scenario.characters.iter().enumerate() {
        let path = format!("characters[{index}]");
        if character.label.trim().is_empty() {
            return Err(validation_err(format!("{path}.label"), "label is empty"));
        }
        if !labels.insert(character.label.as_str()) {
            return Err(validation_err(
                format!("{path}.label"),
                format!("duplicate label '{}'", character.label),
            ));
        }
        if !map.is_passable(character.start) {
            return Err(validation_err(
                format!("{path}.start"),
                format!(
                    "start tile ({}, {}) is blocked or outside the map",
                    character.start.x, character.start.y
                ),
            ));
        }
    }
    Ok(())
}
