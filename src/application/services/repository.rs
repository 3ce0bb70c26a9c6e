//! Guide persistence service
//!
//! Reads and writes guide files as pretty JSON wrapped in the save envelope.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::application::envelope;
use crate::application::services::export::{render_html, render_text, ExportFormat};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::Guide;
use crate::infrastructure::traits::FileSystem;
use crate::util::path::guide_file_name;

/// Service for loading, saving and exporting guides.
pub struct GuideRepository {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl GuideRepository {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Where a guide is saved when no path is given.
    pub fn default_path(&self, guide: &Guide) -> PathBuf {
        self.settings.guides_dir().join(guide_file_name(
            &guide.metadata.title,
            &self.settings.guide_extension,
        ))
    }

    /// Write the guide, creating parent directories. Returns the path written.
    #[instrument(level = "debug", skip(self, guide), fields(title = %guide.metadata.title))]
    pub fn save(&self, guide: &Guide, path: Option<&Path>) -> ApplicationResult<PathBuf> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_path(guide));

        let doc = envelope::wrap(guide, &self.settings.app_name)
            .with_path_context("serialize guide", &path)?;
        let json = serde_json::to_string_pretty(&doc).with_path_context("serialize guide", &path)?;

        self.fs
            .ensure_parent(&path)
            .with_path_context("create directory for", &path)?;
        self.fs
            .write_atomic(&path, &json)
            .with_path_context("write guide", &path)?;

        info!("saved guide '{}' to {}", guide.metadata.title, path.display());
        Ok(path)
    }

    /// Read a guide, dropping the save envelope.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Guide> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::GuideNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read guide", path)?;

        let malformed = |e: serde_json::Error| ApplicationError::MalformedGuide {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        let mut doc: serde_json::Value = serde_json::from_str(&content).map_err(malformed)?;
        if envelope::strip(&mut doc).is_some() {
            debug!("stripped save envelope from {}", path.display());
        }
        let guide: Guide = serde_json::from_value(doc).map_err(malformed)?;

        info!(
            "loaded guide '{}' ({} nodes) from {}",
            guide.metadata.title,
            guide.len(),
            path.display()
        );
        Ok(guide)
    }

    /// Load, logging and swallowing any failure.
    pub fn try_load(&self, path: &Path) -> Option<Guide> {
        match self.load(path) {
            Ok(guide) => Some(guide),
            Err(e) => {
                error!("failed to load guide {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write a one-way rendering of the guide. `Json` is a regular save.
    pub fn export(&self, guide: &Guide, format: ExportFormat, path: &Path) -> ApplicationResult<()> {
        let content = match format {
            ExportFormat::Json => {
                self.save(guide, Some(path))?;
                return Ok(());
            }
            ExportFormat::Text => render_text(guide),
            ExportFormat::Html => render_html(guide),
        };

        self.fs
            .ensure_parent(path)
            .with_path_context("create directory for", path)?;
        self.fs
            .write_atomic(path, &content)
            .with_path_context("write export", path)?;
        info!("exported guide '{}' as {} to {}", guide.metadata.title, format, path.display());
        Ok(())
    }
}
