//! Daemon bootstrap orchestration.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use staffd_config::{Config, ConfigError};
use staffd_store::DataStore;

use crate::health::HealthReporter;
use crate::server::{Server, ServerHandle};
use crate::telemetry::{self, TelemetryError};
use crate::transport::ListenerError;

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the daemon configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when no configuration can be resolved.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that layers configuration files, `STAFFD_*` variables and
/// command-line flags over the built-in defaults.
#[derive(Debug, Default, Clone)]
pub struct SystemConfigLoader {
    args: Option<Vec<OsString>>,
}

impl SystemConfigLoader {
    /// Loader reading the process command line.
    #[must_use]
    pub const fn new() -> Self {
        Self { args: None }
    }

    /// Loader reading `args` in place of the process command line. The first
    /// item is the program name.
    #[must_use]
    pub fn with_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            args: Some(args.into_iter().map(Into::into).collect()),
        }
    }
}

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        match &self.args {
            Some(args) => Config::load_from_iter(args.iter().cloned()),
            None => Config::load(),
        }
    }
}

/// Loader that always yields a preloaded configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Builds a loader around `config`.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Configuration loaded but holds values the server cannot run with.
    #[error("invalid configuration: {source}")]
    InvalidConfiguration {
        /// Validation failure.
        #[source]
        source: ConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

/// Result of a successful bootstrap invocation: configured, instrumented, and
/// holding the store, but not yet listening.
pub struct Daemon {
    config: Config,
    store: Arc<dyn DataStore>,
    reporter: Arc<dyn HealthReporter>,
}

impl std::fmt::Debug for Daemon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Daemon")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Daemon {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Binds the configured endpoint and starts serving requests.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`] when the server cannot be started. The
    /// store is released in that case.
    pub fn serve(self) -> Result<ServerHandle, ListenerError> {
        match Server::start(&self.config, Arc::clone(&self.store)) {
            Ok(server) => {
                self.reporter.server_listening(server.local_addr());
                Ok(server)
            }
            Err(error) => {
                self.store.close();
                Err(error)
            }
        }
    }

    /// Lifecycle reporter shared with the supervisor.
    #[must_use]
    pub fn reporter(&self) -> Arc<dyn HealthReporter> {
        Arc::clone(&self.reporter)
    }
}

/// Bootstraps the daemon using the supplied collaborators.
///
/// # Errors
///
/// Returns a [`BootstrapError`] when configuration cannot be loaded or
/// validated, or telemetry cannot be installed. The failure is reported to
/// `reporter` before returning.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    store: Arc<dyn DataStore>,
) -> Result<Daemon, BootstrapError> {
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    if let Err(source) = config.validate() {
        let error = BootstrapError::InvalidConfiguration { source };
        reporter.bootstrap_failed(&error);
        return Err(error);
    }

    if let Err(source) = telemetry::initialise(&config) {
        let error = BootstrapError::Telemetry { source };
        reporter.bootstrap_failed(&error);
        return Err(error);
    }

    reporter.bootstrap_succeeded(&config);

    Ok(Daemon {
        config,
        store,
        reporter,
    })
}
