//! Concurrent request server for the staff management tool.
//!
//! Clients connect over TCP and exchange one JSON envelope per line. Each
//! connection is served by a session running on a bounded worker pool; each
//! request is routed by its action name to a handler backed by a shared
//! [`staffd_store::DataStore`]. A client's malformed input, slow request, or
//! disconnect never affects another client.
//!
//! The crate is organised leaf-first:
//!
//! - `transport` binds the endpoint, accepts connections, and hands them to
//!   the worker pool, turning clients away when the queue is full.
//! - [`dispatch`] runs the per-connection session loop and the action router.
//! - [`Server`] ties the two together and owns the start/stop lifecycle.
//! - [`bootstrap_with`] and [`run_daemon`] load configuration, install
//!   telemetry, and supervise the process until a termination signal.

mod bootstrap;
pub mod dispatch;
mod health;
mod process;
mod server;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon};
pub use server::{Server, ServerHandle};
pub use telemetry::TelemetryError;
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
