//! Interactive walk-through of a guide on a line-based terminal.

use std::io::{BufRead, Write};

use colored::Colorize;
use tracing::debug;

use crate::application::ApplicationError;
use crate::cli::{CliError, CliResult};
use crate::domain::{Guide, GuideSession, Node, Step};
use crate::infrastructure::InfraError;

/// How an interactive run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The walk reached a solution (possibly one of the fallback messages).
    Solved(String),
    /// The user quit or input ended before a solution.
    Quit,
}

enum Command {
    Choose(usize),
    Back,
    Restart,
    Quit,
    Unknown,
}

fn parse_command(line: &str) -> Command {
    match line.trim().to_lowercase().as_str() {
        "q" | "quit" => Command::Quit,
        "b" | "back" => Command::Back,
        "r" | "restart" => Command::Restart,
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Choose(n - 1),
            _ => Command::Unknown,
        },
    }
}

fn io_err(e: std::io::Error) -> CliError {
    CliError::Infra(InfraError::io("interactive session", e))
}

fn show_node<W: Write>(out: &mut W, node: &Node, step: usize) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{} {}", format!("Step {}:", step).cyan().bold(), node.question)?;
    if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
        writeln!(out, "  {}", description)?;
    }
    if let Some(help) = node.help_text.as_deref().filter(|h| !h.is_empty()) {
        writeln!(out, "  {} {}", "hint:".yellow(), help)?;
    }
    for (i, answer) in node.answers.iter().enumerate() {
        writeln!(out, "  {}) {}", i + 1, answer.answer_text)?;
    }
    Ok(())
}

/// Run a session reading commands from `input`: a number picks an answer,
/// `b` goes back, `r` restarts, `q` (or end of input) quits.
pub fn run_session<R: BufRead, W: Write>(
    guide: &Guide,
    input: &mut R,
    out: &mut W,
) -> CliResult<RunOutcome> {
    let mut session = GuideSession::start(guide).map_err(ApplicationError::from)?;

    writeln!(out, "{}", guide.metadata.title.bold()).map_err(io_err)?;
    if !guide.metadata.description.is_empty() {
        writeln!(out, "{}", guide.metadata.description).map_err(io_err)?;
    }
    show_node(out, session.current(), session.step_count()).map_err(io_err)?;

    let mut line = String::new();
    loop {
        if session.is_finished() {
            write!(out, "[b]ack, [r]estart or [q]uit: ").map_err(io_err)?;
        } else {
            write!(
                out,
                "Choose 1-{}, [b]ack, [r]estart or [q]uit: ",
                session.current().answers.len()
            )
            .map_err(io_err)?;
        }
        out.flush().map_err(io_err)?;

        line.clear();
        if input.read_line(&mut line).map_err(io_err)? == 0 {
            writeln!(out).map_err(io_err)?;
            break;
        }

        match parse_command(&line) {
            Command::Quit => break,
            Command::Back => {
                if session.back() {
                    show_node(out, session.current(), session.step_count()).map_err(io_err)?;
                } else {
                    writeln!(out, "Already at the first question").map_err(io_err)?;
                }
            }
            Command::Restart => {
                session.restart().map_err(ApplicationError::from)?;
                show_node(out, session.current(), session.step_count()).map_err(io_err)?;
            }
            Command::Choose(index) if !session.is_finished() => match session.choose(index) {
                Ok(Step::Node(node)) => {
                    show_node(out, node, session.step_count()).map_err(io_err)?;
                }
                Ok(Step::Solution(text)) => {
                    writeln!(out).map_err(io_err)?;
                    writeln!(out, "{} {}", "Solution:".green().bold(), text).map_err(io_err)?;
                }
                Err(e) => {
                    debug!("rejected choice: {}", e);
                    writeln!(out, "Invalid choice").map_err(io_err)?;
                }
            },
            Command::Choose(_) | Command::Unknown => {
                writeln!(out, "Invalid choice").map_err(io_err)?;
            }
        }
    }

    Ok(match session.outcome() {
        Some(text) => RunOutcome::Solved(text.to_string()),
        None => RunOutcome::Quit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_inputs_when_parsing_then_commands() {
        assert!(matches!(parse_command("2\n"), Command::Choose(1)));
        assert!(matches!(parse_command(" B "), Command::Back));
        assert!(matches!(parse_command("restart"), Command::Restart));
        assert!(matches!(parse_command("q"), Command::Quit));
        assert!(matches!(parse_command("0"), Command::Unknown));
        assert!(matches!(parse_command("yes"), Command::Unknown));
    }
}
