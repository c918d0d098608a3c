mod app;

use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    app::bootstrap::init_tracing();
    let args = env::args().skip(1).collect::<Vec<_>>();
    match app::bootstrap::build_config(&args) {
        Ok(request) => app::loop_runner::run(request),
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(2)
        }
    }
}
