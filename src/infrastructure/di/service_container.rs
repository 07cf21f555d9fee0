//! Service container for dependency injection
//!
//! Wires up services with their dependencies.

use std::sync::Arc;

use crate::application::services::{UnbindOptions, UnbindService};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O boundaries.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    /// Build the unbind service from the configured marker vocabulary.
    pub fn unbind_service(&self, dry_run: bool) -> ApplicationResult<UnbindService> {
        let table = self.settings.rules.marker_table()?;
        let options = UnbindOptions {
            existing: self.settings.existing_policy(),
            make_writable: self.settings.make_writable,
            dry_run,
        };
        Ok(UnbindService::new(Arc::clone(&self.fs), table, options))
    }
}
