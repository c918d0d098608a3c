use std::process::ExitCode;

use route_engine::RouteCompiler;
use tracing::{error, info};

use super::bootstrap::{usage_text, CliRequest, SandboxConfig};
use super::scenario::{load_scenario, ScenarioError};
use super::stage::{CharacterSnapshot, Stage};

pub(crate) fn run(request: CliRequest) -> ExitCode {
    match request {
        CliRequest::Help => {
            println!("{}", usage_text());
            ExitCode::SUCCESS
        }
        CliRequest::ListMnemonics => {
            for line in RouteCompiler::default().registry().usage_lines() {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        CliRequest::Run(config) => match run_scenario(&config) {
            Ok(snapshots) => match serde_json::to_string_pretty(&snapshots) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    error!(error = %err, "snapshot_encode_failed");
                    ExitCode::FAILURE
                }
            },
            Err(err) => {
                error!(error = %err, "startup_failed");
                ExitCode::FAILURE
            }
        },
    }
}

pub(crate) fn run_scenario(config: &SandboxConfig) -> Result<Vec<CharacterSnapshot>, ScenarioError> {
    let scenario = load_scenario(&config.scenario)?;
    let mut stage = Stage::from_scenario(scenario)?;
    Ok(run_stage(&mut stage, config.ticks, config.log_every))
}

/// Ticks until `max_ticks` or until the stage goes idle, whichever is first.
pub(crate) fn run_stage(stage: &mut Stage, max_ticks: u64, log_every: u64) -> Vec<CharacterSnapshot> {
    while stage.tick_count() < max_ticks {
        if stage.is_idle() {
            info!(tick = stage.tick_count(), "stage_idle");
            break;
        }
        stage.tick();
        if log_every > 0 && stage.tick_count() % log_every == 0 {
            for snapshot in stage.snapshots() {
                info!(
                    tick = stage.tick_count(),
                    character = snapshot.label.as_str(),
                    x = snapshot.position.x,
                    y = snapshot.position.y,
                    shake_x = snapshot.shake_offset_px.0,
                    shake_y = snapshot.shake_offset_px.1,
                    opacity = snapshot.opacity,
                    route_index = ?snapshot.route_index,
                    "character_snapshot"
                );
            }
        }
    }
    info!(
        ticks = stage.tick_count(),
        scripts = stage.scripts().entries().len(),
        "run_finished"
    );
    stage.snapshots()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use route_engine::TilePos;
    use serde_json::json;

    use super::*;
    use crate::app::scenario::parse_scenario_json;

    fn patrol() -> serde_json::Value {
        json!({
            "map": { "width": 4, "height": 1 },
            "characters": [{
                "label": "guard",
                "start": { "x": 0, "y": 0 },
                "route": {
                    "repeats_when_done": true,
                    "commands": [
                        { "kind": "script", "text": "MOVE_R 3" },
                        { "kind": "script", "text": "MOVE_L 3" },
                        { "kind": "end" }
                    ]
                }
            }]
        })
    }

    #[test]
    fn repeating_route_runs_to_the_tick_limit() {
        let scenario = parse_scenario_json(&patrol().to_string()).expect("scenario");
        let mut stage = Stage::from_scenario(scenario).expect("stage");

        let snapshots = run_stage(&mut stage, 4, 2);

        assert_eq!(stage.tick_count(), 4);
        assert_eq!(snapshots[0].position, TilePos::new(2, 0));
        assert_eq!(snapshots[0].route_index, Some(1));
    }

    #[test]
    fn idle_stage_stops_early() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("walk.json");
        let mut value = patrol();
        value["characters"][0]["route"]["repeats_when_done"] = json!(false);
        fs::write(&path, value.to_string()).expect("write");

        let snapshots = run_scenario(&SandboxConfig {
            scenario: path,
            ticks: 100,
            log_every: 0,
        })
        .expect("run");

        assert_eq!(snapshots[0].position, TilePos::new(0, 0));
        assert_eq!(snapshots[0].route_index, None);
    }

    #[test]
    fn missing_scenario_is_reported() {
        let error = run_scenario(&SandboxConfig {
            scenario: "/nonexistent/route-sandbox.json".into(),
            ticks: 1,
            log_every: 0,
        })
        .expect_err("missing file");

        assert!(matches!(error, ScenarioError::Read { .. }));
    }
}
