//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::services::ExportFormat;
use crate::domain::VersionBump;

/// Author, validate and run decision-tree troubleshooting guides
#[derive(Parser, Debug)]
#[command(name = "treeguide")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Library directory (default: ~/.treeguide)
    #[arg(short = 'D', long, global = true, env = "TREEGUIDE_DATA_DIR", value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, inspect and run guides
    Guide {
        #[command(subcommand)]
        command: GuideCommands,
    },

    /// Edit the questions of a guide
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Edit the answers of a question
    Answer {
        #[command(subcommand)]
        command: AnswerCommands,
    },

    /// Product and problem category index
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Guide library directory
    Library {
        #[command(subcommand)]
        command: LibraryCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Guide file argument shared by most subcommands.
#[derive(Args, Debug, Clone)]
pub struct GuideFile {
    /// Guide file (.tsg or .json)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum GuideCommands {
    /// Create an empty guide
    New {
        /// Guide title
        title: String,
        /// Short description
        #[arg(long, default_value = "")]
        description: String,
        /// Author (default from config)
        #[arg(long)]
        author: Option<String>,
        /// Output file (default: <data_dir>/guides/<title>.tsg)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },

    /// Check structure; exits 65 when invalid
    Validate(GuideFile),

    /// Show node, path and solution counts
    Stats(GuideFile),

    /// List every path from the starting question
    Paths(GuideFile),

    /// Show the guide as a tree
    Tree(GuideFile),

    /// Render the guide to another format
    Export {
        #[command(flatten)]
        guide: GuideFile,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormatArg::Text)]
        format: ExportFormatArg,
        /// Output file (default: guide file with the format's extension)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },

    /// Increment the version (patch by default)
    Bump {
        #[command(flatten)]
        guide: GuideFile,
        /// Bump major version
        #[arg(long, conflicts_with = "minor")]
        major: bool,
        /// Bump minor version
        #[arg(long)]
        minor: bool,
    },

    /// Add or remove tags
    Tag {
        #[command(flatten)]
        guide: GuideFile,
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Walk through the guide interactively
    Run(GuideFile),
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Add a tag
    Add { tag: String },
    /// Remove a tag
    Remove { tag: String },
}

#[derive(Subcommand, Debug)]
pub enum NodeCommands {
    /// Add a question
    Add {
        #[command(flatten)]
        guide: GuideFile,
        /// Question text
        question: String,
        /// Node id (default: random)
        #[arg(long)]
        id: Option<String>,
        /// Make this the starting question
        #[arg(long)]
        root: bool,
        /// Help text shown with the question
        #[arg(long)]
        help_text: Option<String>,
        /// Longer description
        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a question; answers leading to it become placeholder solutions
    Remove {
        #[command(flatten)]
        guide: GuideFile,
        /// Node id
        node_id: String,
    },

    /// List questions with their answers
    List(GuideFile),
}

#[derive(Subcommand, Debug)]
pub enum AnswerCommands {
    /// Add an answer to a question
    Add {
        #[command(flatten)]
        guide: GuideFile,
        /// Node id of the question
        node_id: String,
        /// Answer text
        text: String,
        /// Node the answer leads to
        #[arg(long, conflicts_with = "solution", required_unless_present = "solution")]
        next: Option<String>,
        /// Solution text ending the walk-through
        #[arg(long)]
        solution: Option<String>,
    },

    /// Remove an answer
    Remove {
        #[command(flatten)]
        guide: GuideFile,
        /// Node id of the question
        node_id: String,
        /// Answer id
        answer_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// Show products, categories and guide ids
    Show,

    /// Write the default catalog (refuses to overwrite without --force)
    Init {
        /// Overwrite existing catalog
        #[arg(short, long)]
        force: bool,
    },

    /// Find the product and category listing a guide
    Locate {
        /// Guide id
        guide_id: String,
    },

    /// List a guide under a product category
    AddGuide {
        /// Product id
        product: String,
        /// Category id
        category: String,
        /// Guide id
        guide_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum LibraryCommands {
    /// Create guides/ and examples/ directories
    Init,
    /// List guide files
    List,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormatArg {
    Text,
    Html,
    Json,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Text => ExportFormat::Text,
            ExportFormatArg::Html => ExportFormat::Html,
            ExportFormatArg::Json => ExportFormat::Json,
        }
    }
}

/// `--major` wins over `--minor`; neither means patch.
pub fn version_bump(major: bool, minor: bool) -> VersionBump {
    if major {
        VersionBump::Major
    } else if minor {
        VersionBump::Minor
    } else {
        VersionBump::Patch
    }
}
