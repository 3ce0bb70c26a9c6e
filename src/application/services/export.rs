//! One-way renderings of a guide for reading or printing.

use std::collections::HashSet;
use std::fmt;

use termtree::Tree;

use crate::domain::{Guide, GuideMetadata, Node, NodeId};

/// Deepest node level expanded by the text rendering (root is level 1).
pub const MAX_TEXT_DEPTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Html,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

fn estimated_time(metadata: &GuideMetadata) -> String {
    metadata
        .estimated_time_minutes
        .map(|m| format!("{} minutes", m))
        .unwrap_or_else(|| "not specified".to_string())
}

// ============================================================
// TEXT
// ============================================================

/// Metadata header followed by the tree below the root node.
pub fn render_text(guide: &Guide) -> String {
    TextExport(guide).to_string()
}

struct TextExport<'g>(&'g Guide);

impl fmt::Display for TextExport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guide = self.0;
        let meta = &guide.metadata;
        writeln!(f, "{}", meta.title)?;
        writeln!(f, "{}", "=".repeat(meta.title.chars().count().max(1)))?;
        if !meta.description.is_empty() {
            writeln!(f, "{}", meta.description)?;
        }
        writeln!(f)?;
        writeln!(f, "Author: {}", meta.author)?;
        writeln!(f, "Version: {}", meta.version)?;
        writeln!(f, "Difficulty: {}", meta.difficulty_level)?;
        writeln!(f, "Estimated time: {}", estimated_time(meta))?;
        if !meta.tags.is_empty() {
            writeln!(f, "Tags: {}", meta.tags.join(", "))?;
        }
        writeln!(f)?;
        writeln!(f, "Troubleshooting steps:")?;

        match step_tree(guide) {
            Some(tree) => write!(f, "{}", tree),
            None => writeln!(f, "(no starting question)"),
        }
    }
}

/// Tree for the steps reachable from the root node only.
pub fn step_tree(guide: &Guide) -> Option<Tree<String>> {
    guide.get_root_node().map(|root| node_tree(guide, root, 1))
}

fn node_label(node: &Node) -> String {
    match node.help_text.as_deref().filter(|h| !h.is_empty()) {
        Some(help) => format!("{} ({})", node.question, help),
        None => node.question.clone(),
    }
}

fn node_tree(guide: &Guide, node: &Node, level: usize) -> Tree<String> {
    let mut tree = Tree::new(node_label(node));
    for answer in &node.answers {
        let mut branch = Tree::new(format!("[{}]", answer.answer_text));
        if answer.is_solution {
            branch.push(Tree::new(format!(
                "Solution: {}",
                answer.solution_text.as_deref().unwrap_or_default()
            )));
        } else if let Some(next) = answer.linked_node().and_then(|id| guide.get_node(id)) {
            if level < MAX_TEXT_DEPTH {
                branch.push(node_tree(guide, next, level + 1));
            }
        }
        tree.push(branch);
    }
    tree
}

// ============================================================
// HTML
// ============================================================

const STYLE: &str = "body { font-family: sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
h1 { color: #2c3e50; }
.metadata { background: #ecf0f1; padding: 10px; border-radius: 5px; }
.question { background: #3498db; color: white; padding: 10px; margin: 10px 0; border-radius: 5px; }
.answer { margin-left: 20px; padding: 5px; }
.solution { background: #2ecc71; color: white; padding: 10px; border-radius: 5px; }";

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Self-contained HTML page. Each node is rendered at most once.
pub fn render_html(guide: &Guide) -> String {
    HtmlExport(guide).to_string()
}

struct HtmlExport<'g>(&'g Guide);

impl fmt::Display for HtmlExport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guide = self.0;
        let meta = &guide.metadata;
        let title = escape_html(&meta.title);
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html>")?;
        writeln!(f, "<head>")?;
        writeln!(f, "<meta charset=\"utf-8\">")?;
        writeln!(f, "<title>{}</title>", title)?;
        writeln!(f, "<style>\n{}\n</style>", STYLE)?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        writeln!(f, "<h1>{}</h1>", title)?;
        writeln!(f, "<div class=\"metadata\">")?;
        writeln!(f, "<p>{}</p>", escape_html(&meta.description))?;
        writeln!(f, "<p><strong>Author:</strong> {}</p>", escape_html(&meta.author))?;
        writeln!(
            f,
            "<p><strong>Difficulty:</strong> {}</p>",
            escape_html(&meta.difficulty_level)
        )?;
        writeln!(
            f,
            "<p><strong>Estimated Time:</strong> {}</p>",
            estimated_time(meta)
        )?;
        writeln!(f, "</div>")?;
        writeln!(f, "<h2>Troubleshooting Steps</h2>")?;

        if let Some(root) = guide.get_root_node() {
            let mut visited = HashSet::new();
            node_html(f, guide, root, &mut visited)?;
        }

        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

fn node_html<'g>(
    f: &mut fmt::Formatter<'_>,
    guide: &'g Guide,
    node: &'g Node,
    visited: &mut HashSet<&'g NodeId>,
) -> fmt::Result {
    if !visited.insert(&node.node_id) {
        return Ok(());
    }

    writeln!(f, "<div class=\"question\">{}</div>", escape_html(&node.question))?;
    if let Some(help) = node.help_text.as_deref().filter(|h| !h.is_empty()) {
        writeln!(f, "<p class=\"help\">{}</p>", escape_html(help))?;
    }

    for answer in &node.answers {
        write!(f, "<div class=\"answer\">{}", escape_html(&answer.answer_text))?;
        if answer.is_solution {
            write!(
                f,
                "<div class=\"solution\">Solution: {}</div>",
                escape_html(answer.solution_text.as_deref().unwrap_or_default())
            )?;
        } else if let Some(next) = answer.linked_node().and_then(|id| guide.get_node(id)) {
            writeln!(f)?;
            node_html(f, guide, next, visited)?;
        }
        writeln!(f, "</div>")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_markup_when_escaping_then_entities() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn given_guide_without_root_when_rendering_text_then_placeholder_line() {
        let guide = Guide::new(GuideMetadata::new("Empty", ""));

        let text = render_text(&guide);

        assert!(text.starts_with("Empty\n=====\n\n"));
        assert!(text.ends_with("Troubleshooting steps:\n(no starting question)\n"));
    }

    #[test]
    fn given_guide_without_root_when_rendering_html_then_closed_document() {
        let guide = Guide::new(GuideMetadata::new("Empty", ""));

        let html = render_html(&guide);

        assert!(html.contains("<h2>Troubleshooting Steps</h2>\n</body>\n</html>\n"));
    }

    #[test]
    fn given_formats_when_displayed_then_lowercase_names() {
        assert_eq!(ExportFormat::Html.to_string(), "html");
        assert_eq!(ExportFormat::Text.extension(), "txt");
    }
}
