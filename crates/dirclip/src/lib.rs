pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod ui;

/// Install logging as configured. Returns the log file in use, if any.
pub fn init(config: &infra::config::Config) -> anyhow::Result<Option<std::path::PathBuf>> {
    infra::logging::init(&config.logging)
}
