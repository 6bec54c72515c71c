pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod ui;

pub use infra::logging::LogTarget;

/// Install the tracing subscriber for the process.
pub fn init(target: LogTarget) -> anyhow::Result<()> {
    infra::logging::init(target)
}
