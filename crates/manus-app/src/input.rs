//! Command-line input mapping
//!
//! The interactive runner reads one command per line. Each verb maps to a
//! single [`Message`]; the table below is also the `help` text.

use std::path::PathBuf;

use manus_core::prelude::*;

use crate::message::Message;
use crate::state::ViewMode;

/// `(verb, arguments, description)` for every accepted command
pub const COMMANDS: &[(&str, &str, &str)] = &[
    ("add", "<path>...", "Stage local files"),
    ("remove", "<n>", "Unstage the n-th file (1-based)"),
    ("clear", "", "Unstage all files"),
    ("upload", "", "Upload the staged files"),
    ("task", "<text>", "Set the task description"),
    ("analyze", "[text]", "Submit the task (optionally setting it first)"),
    ("next", "", "Complete the current step"),
    ("step", "<1|2|3>", "Go to a wizard step"),
    ("new", "", "Start a new analysis"),
    ("files", "", "Open the session file explorer"),
    ("search", "[query]", "Filter the explorer"),
    ("view", "<list|grid>", "Explorer layout"),
    ("open", "<path>", "Preview a session file"),
    ("close", "", "Close the explorer"),
    ("download", "", "Download the session archive"),
    ("export", "", "Export the result as JSON"),
    ("health", "", "Check the backend"),
    ("status", "", "Print the wizard state"),
    ("help", "", "List commands"),
    ("quit", "", "Exit"),
];

/// What a line asks for
#[derive(Debug, Clone)]
pub enum Command {
    /// Feed this message to the engine
    Message(Message),
    /// Print the wizard state
    Status,
    Help,
}

/// Parse one input line. Blank lines and `#` comments give `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let message = match verb.to_ascii_lowercase().as_str() {
        "add" => {
            if rest.is_empty() {
                return Err(usage("add"));
            }
            Message::AddPaths(rest.split_whitespace().map(PathBuf::from).collect())
        }
        "remove" | "rm" => {
            let index: usize = rest.parse().map_err(|_| usage("remove"))?;
            if index == 0 {
                return Err(usage("remove"));
            }
            Message::RemoveFile(index - 1)
        }
        "clear" => Message::ClearFiles,
        "upload" => Message::StartUpload,
        "task" => Message::SetTaskDescription(rest.to_string()),
        "analyze" => {
            if rest.is_empty() {
                Message::SubmitTask
            } else {
                Message::SubmitTaskWith(rest.to_string())
            }
        }
        "next" => Message::Proceed,
        "step" => {
            let n: u8 = rest.parse().map_err(|_| usage("step"))?;
            Message::GoToStep(n)
        }
        "new" | "reset" => Message::NewAnalysis,
        "files" => Message::OpenExplorer,
        "search" => Message::SearchFiles(rest.to_string()),
        "view" => {
            let mode: ViewMode = rest.parse().map_err(|_| usage("view"))?;
            Message::SetViewMode(mode)
        }
        "open" => {
            if rest.is_empty() {
                return Err(usage("open"));
            }
            Message::SelectFile(rest.to_string())
        }
        "close" => Message::CloseExplorer,
        "download" => Message::Download,
        "export" => Message::Export,
        "health" => Message::CheckHealth,
        "quit" | "exit" => Message::Quit,
        "status" => return Ok(Some(Command::Status)),
        "help" | "?" => return Ok(Some(Command::Help)),
        other => {
            return Err(Error::validation(format!(
                "Unknown command '{}' (try 'help')",
                other
            )))
        }
    };

    Ok(Some(Command::Message(message)))
}

fn usage(verb: &str) -> Error {
    let args = COMMANDS
        .iter()
        .find(|(name, _, _)| *name == verb)
        .map(|(_, args, _)| *args)
        .unwrap_or("");
    Error::validation(format!("Usage: {} {}", verb, args).trim_end().to_string())
}

/// The `help` listing
pub fn help_text() -> String {
    COMMANDS
        .iter()
        .map(|(verb, args, about)| {
            let invocation = format!("{} {}", verb, args);
            format!("  {:<22} {}", invocation.trim_end(), about)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
