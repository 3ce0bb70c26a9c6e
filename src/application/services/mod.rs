//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod catalog;
pub mod export;
mod library;
mod repository;

pub use catalog::CatalogRepository;
pub use export::{render_html, render_text, step_tree, ExportFormat};
pub use library::{GuideLibrary, LibraryEntry, LibraryListing};
pub use repository::GuideRepository;
