//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{CatalogRepository, GuideLibrary, GuideRepository};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
///
/// Services are cheap handles over the shared settings and filesystem, so
/// they are built on demand.
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
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    pub fn guides(&self) -> GuideRepository {
        GuideRepository::new(self.fs.clone(), self.settings.clone())
    }

    pub fn catalog(&self) -> CatalogRepository {
        CatalogRepository::new(self.fs.clone(), self.settings.clone())
    }

    pub fn library(&self) -> GuideLibrary {
        GuideLibrary::new(self.fs.clone(), self.settings.clone())
    }
}
