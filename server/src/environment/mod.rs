#[allow(clippy::module_inception)]
mod environment;
mod environment_config;
mod send_report;

pub use environment::Environment;
pub use environment_config::EnvironmentConfig;
pub use send_report::SendReport;
