//! Catalog persistence service
//!
//! The catalog is never allowed to block the user: a missing or corrupt file
//! yields the bundled default catalog instead of an error.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::envelope;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::Catalog;
use crate::infrastructure::traits::FileSystem;

pub struct CatalogRepository {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl CatalogRepository {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    pub fn path(&self) -> PathBuf {
        self.settings.catalog_path()
    }

    /// Strict read of the catalog file.
    pub fn read(&self) -> ApplicationResult<Catalog> {
        let path = self.path();
        let content = self
            .fs
            .read_to_string(&path)
            .with_path_context("read catalog", &path)?;
        let malformed = |e: serde_json::Error| ApplicationError::MalformedCatalog {
            path: path.clone(),
            message: e.to_string(),
        };
        let mut doc: serde_json::Value = serde_json::from_str(&content).map_err(malformed)?;
        envelope::strip(&mut doc);
        serde_json::from_value(doc).map_err(malformed)
    }

    /// Load the catalog, falling back to [`Catalog::default_catalog`].
    pub fn load(&self) -> Catalog {
        let path = self.path();
        if !self.fs.is_file(&path) {
            warn!("no catalog at {}, using default catalog", path.display());
            return Catalog::default_catalog();
        }
        match self.read() {
            Ok(catalog) => {
                info!(
                    "loaded catalog with {} products from {}",
                    catalog.products.len(),
                    path.display()
                );
                catalog
            }
            Err(e) => {
                error!("failed to load catalog: {}, using default catalog", e);
                Catalog::default_catalog()
            }
        }
    }

    pub fn save(&self, catalog: &Catalog) -> ApplicationResult<PathBuf> {
        let path = self.path();
        let doc = envelope::wrap(catalog, &self.settings.app_name)
            .with_path_context("serialize catalog", &path)?;
        let json =
            serde_json::to_string_pretty(&doc).with_path_context("serialize catalog", &path)?;
        self.fs
            .ensure_parent(&path)
            .with_path_context("create directory for", &path)?;
        self.fs
            .write_atomic(&path, &json)
            .with_path_context("write catalog", &path)?;
        info!("saved catalog to {}", path.display());
        Ok(path)
    }
}
