// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod alert;
pub mod app_dirs;
pub mod chart;
pub mod config;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod util;
