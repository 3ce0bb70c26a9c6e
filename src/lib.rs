//! treeguide: author, validate and run decision-tree troubleshooting guides.
//!
//! Layers, innermost first: `domain` (guides, nodes, catalog, traversal),
//! `application` (persistence and export over the [`infrastructure::traits::FileSystem`]
//! boundary), `infrastructure` (real filesystem, service wiring) and `cli`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
