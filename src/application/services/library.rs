//! Guide library directory service
//!
//! Layout under `data_dir`: `guides/` (user authored), `examples/` (bundled samples)
//! and the catalog file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::services::GuideRepository;
use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::sample_guides;
use crate::infrastructure::traits::FileSystem;
use crate::util::path::has_extension;

/// One guide file found in the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    pub path: PathBuf,
    /// Title from the file, `None` if it could not be loaded.
    pub title: Option<String>,
}

/// Guide files of the library, per subdirectory.
#[derive(Debug, Clone, Default)]
pub struct LibraryListing {
    pub guides: Vec<LibraryEntry>,
    pub examples: Vec<LibraryEntry>,
}

pub struct GuideLibrary {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl GuideLibrary {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Create `guides/` and `examples/` if missing and write the sample guides
    /// that are not there yet. Returns directories and files created.
    pub fn init(&self) -> ApplicationResult<Vec<PathBuf>> {
        let mut created = Vec::new();
        for dir in [self.settings.guides_dir(), self.settings.examples_dir()] {
            if self.fs.is_dir(&dir) {
                continue;
            }
            self.fs
                .create_dir_all(&dir)
                .with_path_context("create library directory", &dir)?;
            debug!("created {}", dir.display());
            created.push(dir);
        }
        created.extend(self.write_samples()?);
        Ok(created)
    }

    /// Save each sample guide as `examples/<guide_id><ext>`. Existing files are
    /// left untouched.
    pub fn write_samples(&self) -> ApplicationResult<Vec<PathBuf>> {
        let repo = GuideRepository::new(self.fs.clone(), self.settings.clone());
        let examples = self.settings.examples_dir();
        let mut written = Vec::new();
        for (guide_id, guide) in sample_guides() {
            let path = examples.join(format!("{}{}", guide_id, self.settings.guide_extension));
            if self.fs.exists(&path) {
                debug!("sample {} already present", path.display());
                continue;
            }
            written.push(repo.save(&guide, Some(&path))?);
        }
        if !written.is_empty() {
            info!("wrote {} sample guides to {}", written.len(), examples.display());
        }
        Ok(written)
    }

    /// Guide files directly inside `dir`, sorted by path. A missing directory
    /// yields an empty list.
    pub fn guide_files(&self, dir: &Path) -> Vec<PathBuf> {
        if !self.fs.is_dir(dir) {
            return Vec::new();
        }
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| has_extension(p, &self.settings.library_extensions))
            .collect();
        files.sort();
        debug!("found {} guide files in {}", files.len(), dir.display());
        files
    }

    pub fn list_guides(&self) -> Vec<PathBuf> {
        self.guide_files(&self.settings.guides_dir())
    }

    pub fn list_examples(&self) -> Vec<PathBuf> {
        self.guide_files(&self.settings.examples_dir())
    }

    /// Both subdirectories with titles read from each file.
    pub fn listing(&self) -> LibraryListing {
        let repo = GuideRepository::new(self.fs.clone(), self.settings.clone());
        let entries = |paths: Vec<PathBuf>| -> Vec<LibraryEntry> {
            paths
                .into_iter()
                .map(|path| {
                    let title = repo.try_load(&path).map(|g| g.metadata.title);
                    LibraryEntry { path, title }
                })
                .collect()
        };
        LibraryListing {
            guides: entries(self.list_guides()),
            examples: entries(self.list_examples()),
        }
    }
}
