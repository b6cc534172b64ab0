use std::process::ExitCode;

use forum_pageviews::config::{Config, DEFAULT_CONFIG_FILE};
use forum_pageviews::logging::{init_logger, log_stage_failure, LogLevel, Stage};

fn main() -> ExitCode {
    let config = match Config::load_or_default(DEFAULT_CONFIG_FILE) {
        Ok(config) => config,
        Err(e) => {
            init_logger(LogLevel::Info, None, false);
            log_stage_failure(Stage::System, "Reading configuration", &e);
            return ExitCode::FAILURE;
        }
    };

    let logging = &config.logging;
    init_logger(logging.level, logging.log_file.as_deref(), logging.timestamps);
    log::info!(
        target: Stage::System.target(),
        "Analyzing page views from {}",
        config.input_path.display()
    );

    match forum_pageviews::run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
