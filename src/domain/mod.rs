//! Domain layer: guides, nodes, catalog and the algorithms over them
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod analysis;
pub mod catalog;
pub mod error;
pub mod guide;
pub mod ids;
pub mod metadata;
pub mod node;
pub mod samples;
pub mod session;
pub mod timestamp;

pub use analysis::{GuideIssue, GuideStatistics, ValidationReport};
pub use catalog::{Catalog, CatalogStatistics, ProblemCategory, Product};
pub use error::DomainError;
pub use guide::{Guide, GuideRecord, REMOVED_PATH_SOLUTION};
pub use ids::{AnswerId, CategoryId, GuideId, NodeId, ProductId};
pub use metadata::{GuideMetadata, SemVer, VersionBump};
pub use node::{Answer, Node, NodeDefect, MIN_ANSWERS};
pub use samples::sample_guides;
pub use session::{GuideSession, Step};
