//! Command dispatch: maps parsed arguments onto services.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::ExportFormat;
use crate::application::ApplicationError;
use crate::cli::args::{
    version_bump, AnswerCommands, CatalogCommands, Cli, Commands, ConfigCommands, GuideCommands,
    LibraryCommands, NodeCommands, TagCommands,
};
use crate::cli::output;
use crate::cli::runner::{run_session, RunOutcome};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Guide, GuideMetadata, Node, NodeId};
use crate::infrastructure::{InfraError, ServiceContainer};

/// Execute the parsed command line.
pub fn execute(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(());
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.data_dir.as_deref())?;
    debug!("data_dir={}", settings.data_dir.display());
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Guide { command } => guide_command(&container, command),
        Commands::Node { command } => node_command(&container, command),
        Commands::Answer { command } => answer_command(&container, command),
        Commands::Catalog { command } => catalog_command(&container, command),
        Commands::Library { command } => library_command(&container, command),
        Commands::Config { command } => config_command(&container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

// ============================================================
// GUIDE
// ============================================================

fn guide_command(c: &ServiceContainer, command: &GuideCommands) -> CliResult<()> {
    match command {
        GuideCommands::New {
            title,
            description,
            author,
            out,
        } => guide_new(c, title, description, author.as_deref(), out.as_deref()),
        GuideCommands::Validate(g) => guide_validate(c, &g.file),
        GuideCommands::Stats(g) => guide_stats(c, &g.file),
        GuideCommands::Paths(g) => guide_paths(c, &g.file),
        GuideCommands::Tree(g) => guide_tree(c, &g.file),
        GuideCommands::Export { guide, format, out } => {
            guide_export(c, &guide.file, (*format).into(), out.as_deref())
        }
        GuideCommands::Bump {
            guide,
            major,
            minor,
        } => guide_bump(c, &guide.file, *major, *minor),
        GuideCommands::Tag { guide, command } => guide_tag(c, &guide.file, command),
        GuideCommands::Run(g) => guide_run(c, &g.file),
    }
}

#[instrument(skip(c))]
fn guide_new(
    c: &ServiceContainer,
    title: &str,
    description: &str,
    author: Option<&str>,
    out: Option<&Path>,
) -> CliResult<()> {
    let author = author.unwrap_or(&c.settings.default_author);
    let guide = Guide::new(GuideMetadata::new(title, description).with_author(author));
    let path = c.guides().save(&guide, out)?;
    output::action("Created", &path.display());
    Ok(())
}

fn guide_validate(c: &ServiceContainer, file: &Path) -> CliResult<()> {
    let guide = c.guides().load(file)?;
    let report = guide.validate();
    if report.is_valid() {
        output::success(&format!("{} is valid", guide.metadata.title));
        return Ok(());
    }

    output::header(&format!("{}: {} issues", guide.metadata.title, report.issues.len()));
    for message in report.messages() {
        output::failure(&message);
    }
    Err(CliError::InvalidGuide(report.issues.len()))
}

fn guide_stats(c: &ServiceContainer, file: &Path) -> CliResult<()> {
    let guide = c.guides().load(file)?;
    let stats = guide.get_statistics();
    output::header(&guide.metadata.title);
    output::detail(&format!("nodes:          {}", stats.total_nodes));
    output::detail(&format!("paths:          {}", stats.total_paths));
    output::detail(&format!("shortest path:  {}", stats.shortest_path));
    output::detail(&format!("longest path:   {}", stats.longest_path));
    output::detail(&format!("average path:   {:.2}", stats.average_path_length));
    output::detail(&format!("solutions:      {}", stats.total_solutions));
    Ok(())
}

fn guide_paths(c: &ServiceContainer, file: &Path) -> CliResult<()> {
    let guide = c.guides().load(file)?;
    let paths = guide.get_all_paths();
    if paths.is_empty() {
        output::warning("guide has no paths");
        return Ok(());
    }
    for (i, path) in paths.iter().enumerate() {
        output::info(&format!("{:>3}. {}", i + 1, path.iter().join(" -> ")));
    }
    Ok(())
}

fn guide_tree(c: &ServiceContainer, file: &Path) -> CliResult<()> {
    let guide = c.guides().load(file)?;
    match crate::application::services::step_tree(&guide) {
        Some(tree) => output::info(&tree),
        None => output::warning("guide has no starting question"),
    }
    Ok(())
}

fn guide_export(
    c: &ServiceContainer,
    file: &Path,
    format: ExportFormat,
    out: Option<&Path>,
) -> CliResult<()> {
    let guide = c.guides().load(file)?;
    let out = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| file.with_extension(format.extension()));
    c.guides().export(&guide, format, &out)?;
    output::action("Exported", &out.display());
    Ok(())
}

fn guide_bump(c: &ServiceContainer, file: &Path, major: bool, minor: bool) -> CliResult<()> {
    let repo = c.guides();
    let mut guide = repo.load(file)?;
    let before = guide.metadata.version.clone();
    guide.metadata.increment_version(version_bump(major, minor));
    repo.save(&guide, Some(file))?;
    output::action("Version", &format!("{} -> {}", before, guide.metadata.version));
    Ok(())
}

fn guide_tag(c: &ServiceContainer, file: &Path, command: &TagCommands) -> CliResult<()> {
    let repo = c.guides();
    let mut guide = repo.load(file)?;
    match command {
        TagCommands::Add { tag } => {
            guide.metadata.add_tag(tag.as_str());
        }
        TagCommands::Remove { tag } => {
            if !guide.metadata.remove_tag(tag) {
                return Err(CliError::Usage(format!("tag not present: {}", tag)));
            }
        }
    }
    guide.touch();
    repo.save(&guide, Some(file))?;
    output::action("Tags", &guide.metadata.tags.join(", "));
    Ok(())
}

fn guide_run(c: &ServiceContainer, file: &Path) -> CliResult<()> {
    let guide = c.guides().load(file)?;
    let report = guide.validate();
    if !report.is_valid() {
        output::warning(&format!(
            "guide has {} structural issues, run `treeguide guide validate`",
            report.issues.len()
        ));
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = run_session(&guide, &mut stdin.lock(), &mut stdout.lock())?;
    debug!("session ended: {:?}", outcome);
    if outcome == RunOutcome::Quit {
        output::info("Session ended without a solution");
    }
    Ok(())
}

// ============================================================
// NODE / ANSWER
// ============================================================

fn node_command(c: &ServiceContainer, command: &NodeCommands) -> CliResult<()> {
    let repo = c.guides();
    match command {
        NodeCommands::Add {
            guide: g,
            question,
            id,
            root,
            help_text,
            description,
        } => {
            let mut guide = repo.load(&g.file)?;
            let node_id = id.clone().map(NodeId::from).unwrap_or_else(NodeId::generate);
            if guide.contains(&node_id) {
                output::warning(&format!("replacing existing node {}", node_id));
            }
            let mut node = Node::with_id(node_id.clone(), question.as_str());
            node.help_text = help_text.clone();
            node.description = description.clone();
            guide.add_node(node, *root);
            repo.save(&guide, Some(&g.file))?;
            output::action("Added node", &node_id);
        }
        NodeCommands::Remove { guide: g, node_id } => {
            let mut guide = repo.load(&g.file)?;
            if guide.root_node_id().is_some_and(|r| r == node_id.as_str()) {
                return Err(CliError::Usage(format!(
                    "cannot remove the starting question {}",
                    node_id
                )));
            }
            if !guide.remove_node(node_id) {
                return Err(ApplicationError::NodeNotFound(node_id.clone()).into());
            }
            repo.save(&guide, Some(&g.file))?;
            output::action("Removed node", node_id);
        }
        NodeCommands::List(g) => {
            let guide = repo.load(&g.file)?;
            node_list(&guide);
        }
    }
    Ok(())
}

fn node_list(guide: &Guide) {
    let root = guide.root_node_id();
    for node in guide.nodes() {
        let marker = if root == Some(&node.node_id) { " (start)" } else { "" };
        output::header(&format!("{}{}: {}", node.node_id, marker, node.question));
        for answer in &node.answers {
            let target = if answer.is_solution {
                format!("=> {}", answer.solution_text.as_deref().unwrap_or_default())
            } else {
                format!(
                    "-> {}",
                    answer.next_node_id.as_deref().unwrap_or("(unlinked)")
                )
            };
            output::detail(&format!("{}  {} {}", answer.answer_id, answer.answer_text, target));
        }
    }
}

fn answer_command(c: &ServiceContainer, command: &AnswerCommands) -> CliResult<()> {
    let repo = c.guides();
    match command {
        AnswerCommands::Add {
            guide: g,
            node_id,
            text,
            next,
            solution,
        } => {
            let mut guide = repo.load(&g.file)?;
            if let Some(next) = next {
                if !guide.contains(next) {
                    output::warning(&format!("node {} does not exist yet", next));
                }
            }
            let node = guide
                .node_mut(node_id)
                .ok_or_else(|| ApplicationError::NodeNotFound(node_id.clone()))?;
            let answer_id = match (next, solution) {
                (_, Some(solution)) => node.add_solution(text.as_str(), solution.as_str()),
                (Some(next), None) => node.add_continuation(text.as_str(), next.as_str()),
                (None, None) => {
                    return Err(CliError::InvalidArgs(
                        "either --next or --solution is required".into(),
                    ))
                }
            }
            .answer_id
            .clone();
            guide.touch();
            repo.save(&guide, Some(&g.file))?;
            output::action("Added answer", &answer_id);
        }
        AnswerCommands::Remove {
            guide: g,
            node_id,
            answer_id,
        } => {
            let mut guide = repo.load(&g.file)?;
            let node = guide
                .node_mut(node_id)
                .ok_or_else(|| ApplicationError::NodeNotFound(node_id.clone()))?;
            if !node.remove_answer(answer_id) {
                return Err(CliError::Usage(format!(
                    "answer {} not found in node {}",
                    answer_id, node_id
                )));
            }
            guide.touch();
            repo.save(&guide, Some(&g.file))?;
            output::action("Removed answer", answer_id);
        }
    }
    Ok(())
}

// ============================================================
// CATALOG / LIBRARY
// ============================================================

fn catalog_command(c: &ServiceContainer, command: &CatalogCommands) -> CliResult<()> {
    let repo = c.catalog();
    match command {
        CatalogCommands::Show => {
            let catalog = repo.load();
            let stats = catalog.statistics();
            output::info(&format!(
                "{} products, {} categories, {} guides",
                stats.total_products, stats.total_categories, stats.total_guides
            ));
            for product in catalog.products.values() {
                output::header(&format!(
                    "{} ({}, {} v{})",
                    product.product_name, product.product_id, product.manufacturer, product.version
                ));
                for category in product.problem_categories.values() {
                    output::detail(&format!(
                        "{} [{}]: {}",
                        category.category_name,
                        category.category_id,
                        category.guide_ids.iter().join(", ")
                    ));
                }
            }
        }
        CatalogCommands::Init { force } => {
            let path = repo.path();
            if c.fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "catalog already exists: {} (use --force)",
                    path.display()
                )));
            }
            let path = repo.save(&crate::domain::Catalog::default_catalog())?;
            output::action("Created", &path.display());
        }
        CatalogCommands::Locate { guide_id } => match repo.load().find_guide_location(guide_id) {
            Some((product, category)) => output::info(&format!("{}/{}", product, category)),
            None => {
                return Err(CliError::Usage(format!(
                    "guide {} is not listed in the catalog",
                    guide_id
                )))
            }
        },
        CatalogCommands::AddGuide {
            product,
            category,
            guide_id,
        } => {
            let mut catalog = repo.load();
            let entry = catalog
                .product_mut(product)
                .ok_or_else(|| CliError::Usage(format!("unknown product: {}", product)))?
                .category_mut(category)
                .ok_or_else(|| CliError::Usage(format!("unknown category: {}", category)))?;
            entry.add_guide(guide_id.as_str());
            catalog.touch();
            repo.save(&catalog)?;
            output::action("Listed", &format!("{} under {}/{}", guide_id, product, category));
        }
    }
    Ok(())
}

fn library_command(c: &ServiceContainer, command: &LibraryCommands) -> CliResult<()> {
    let library = c.library();
    match command {
        LibraryCommands::Init => {
            for path in library.init()? {
                output::success_detail(&path.display());
            }
            let catalog = c.catalog();
            if !c.fs.exists(&catalog.path()) {
                let path = catalog.save(&crate::domain::Catalog::default_catalog())?;
                output::success_detail(&path.display());
            }
            output::success(&format!("library ready at {}", c.settings.data_dir.display()));
        }
        LibraryCommands::List => {
            let listing = library.listing();
            print_entries("Guides", &c.settings.guides_dir(), &listing.guides);
            print_entries("Examples", &c.settings.examples_dir(), &listing.examples);
        }
    }
    Ok(())
}

fn print_entries(label: &str, dir: &Path, entries: &[crate::application::services::LibraryEntry]) {
    output::header(&format!("{} ({})", label, dir.display()));
    if entries.is_empty() {
        output::detail("(none)");
    }
    for entry in entries {
        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match &entry.title {
            Some(title) => output::detail(&format!("{}  {}", name, title)),
            None => output::failure(&format!("{}  (unreadable)", name)),
        }
    }
}

// ============================================================
// CONFIG
// ============================================================

fn config_command(c: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&c.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let describe = |label: &str, path: Option<PathBuf>| match path {
                Some(p) => {
                    let state = if p.exists() { "exists" } else { "not found" };
                    output::detail(&format!("{}: {} ({})", label, p.display(), state));
                }
                None => output::detail(&format!("{}: unavailable", label)),
            };
            describe("global", global_config_path());
            describe("local", Some(local_config_path(&c.settings.data_dir)));
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| ApplicationError::Config {
                    message: "cannot determine config directory".into(),
                })?
            } else {
                local_config_path(&c.settings.data_dir)
            };
            if c.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            c.fs.ensure_parent(&path)
                .and_then(|_| c.fs.write(&path, &Settings::template()))
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
    }
    io::stdout()
        .flush()
        .map_err(|e| InfraError::io("flush stdout", e))?;
    Ok(())
}
