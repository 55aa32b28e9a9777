use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sarf::construct::Database;
use sarf::error::Result;
use sarf::import;
use sarf::script::Interpreter;
use sarf::settings::Settings;

fn main() -> ExitCode {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = match Settings::load(config_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "sarf stopped");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<()> {
    let db = Database::new();
    let interpreter = Interpreter::new(&db).with_page_size(settings.page_size);
    if let Some(path) = &settings.roots_file {
        let report = import::import_roots_file(interpreter.engine(), path)?;
        info!(file = %path.display(), added = report.added, skipped = report.skipped, "seeded roots");
    }
    if let Some(path) = &settings.schemes_file {
        let report = import::import_schemes_file(interpreter.engine(), path)?;
        info!(file = %path.display(), added = report.added, skipped = report.skipped, "seeded schemes");
    }

    // every input line is a script of its own, so a bad line only costs itself
    let stdin = io::stdin();
    for (number, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        match interpreter.execute_collect(&line) {
            Ok(results) => {
                for value in results {
                    println!("{}", value);
                }
            }
            Err(e) => warn!(line = number + 1, error = %e, "command failed"),
        }
    }
    Ok(())
}
