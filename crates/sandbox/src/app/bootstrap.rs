use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

const TICKS_ENV_VAR: &str = "ROUTE_SANDBOX_TICKS";
const DEFAULT_TICKS: u64 = 600;
const DEFAULT_LOG_EVERY: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SandboxConfig {
    pub(crate) scenario: PathBuf,
    pub(crate) ticks: u64,
    pub(crate) log_every: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliRequest {
    Run(SandboxConfig),
    ListMnemonics,
    Help,
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

pub(crate) fn build_config(args: &[String]) -> Result<CliRequest, String> {
    let ticks_from_env = std::env::var(TICKS_ENV_VAR).ok();
    let request = parse_args(args, ticks_from_env.as_deref())?;
    if let CliRequest::Run(config) = &request {
        info!(
            scenario = %config.scenario.display(),
            ticks = config.ticks,
            log_every = config.log_every,
            "=== Route Sandbox Startup ==="
        );
    }
    Ok(request)
}

pub(crate) fn parse_args(args: &[String], ticks_from_env: Option<&str>) -> Result<CliRequest, String> {
    let mut scenario = None;
    let mut ticks = match ticks_from_env {
        Some(raw) => Some(parse_u64(TICKS_ENV_VAR, raw.trim())?),
        None => None,
    };
    let mut log_every = DEFAULT_LOG_EVERY;

    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => return Ok(CliRequest::Help),
            "--list-mnemonics" => return Ok(CliRequest::ListMnemonics),
            "--scenario" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --scenario".to_string())?;
                scenario = Some(PathBuf::from(value));
                index += 2;
            }
            "--ticks" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --ticks".to_string())?;
                ticks = Some(parse_u64("--ticks", value)?);
                index += 2;
            }
            "--log-every" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --log-every".to_string())?;
                log_every = parse_u64("--log-every", value)?;
                index += 2;
            }
            other => return Err(format!("unknown argument '{other}'\n\n{}", usage_text())),
        }
    }

    let scenario = scenario.ok_or_else(|| format!("missing --scenario\n\n{}", usage_text()))?;
    Ok(CliRequest::Run(SandboxConfig {
        scenario,
        ticks: ticks.unwrap_or(DEFAULT_TICKS),
        log_every,
    }))
}

fn parse_u64(name: &str, value: &str) -> Result<u64, String> {
    value
        .parse::<u64>()
        .map_err(|_| format!("invalid {name} value '{value}' (expected u64)"))
}

pub(crate) fn usage_text() -> String {
    format!(
        "usage:\n  route_sandbox --scenario <path> [--ticks <n>] [--log-every <n>]\n  route_sandbox --list-mnemonics\n\n\
         --ticks defaults to {DEFAULT_TICKS} (or ${TICKS_ENV_VAR}); --log-every 0 disables periodic snapshots"
    )
}
