//! Line-oriented front end: one line in, one intent dispatched, the list
//! rendered again.

use crate::command::{Command, HELP};
use crate::controller::{Notice, TodoController};
use crate::view::render;
use checklist_runtime::StoreError;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Answer to a line that is not UTF-8
pub const NOT_UTF8_MESSAGE: &str = "Input must be UTF-8 text";

const PROMPT: &str = "> ";

/// Errors that end an interactive session
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Reading input or writing output failed
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The Store stopped accepting actions
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What to print after a line, and whether to stop
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    /// Text for the user
    pub output: String,
    /// True after `quit`
    pub quit: bool,
}

impl Reply {
    const fn text(output: String) -> Self {
        Self {
            output,
            quit: false,
        }
    }
}

/// Drives a [`TodoController`] from text commands
pub struct Shell {
    controller: TodoController,
}

impl Shell {
    /// Wrap `controller`
    #[must_use]
    pub const fn new(controller: TodoController) -> Self {
        Self { controller }
    }

    /// The wrapped controller
    #[must_use]
    pub const fn controller(&self) -> &TodoController {
        &self.controller
    }

    /// Current list as text
    pub async fn render(&self) -> String {
        render(&self.controller.view_model().await)
    }

    /// Run one line
    ///
    /// Unparseable lines answer with the parse error; they are not failures.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the Store stops accepting actions.
    pub async fn handle_line(&mut self, line: &str) -> Result<Reply, StoreError> {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(error) => {
                tracing::debug!(%error, line, "Rejected command");
                return Ok(Reply::text(format!("{error}")));
            },
        };

        let notice = match command {
            Command::Add(text) => {
                self.controller.open_panel();
                self.controller.set_draft(text);
                let notice = self.controller.submit().await?;
                // The terminal has no panel to leave open
                self.controller.close_panel();
                Some(notice)
            },
            Command::Toggle(id) => Some(self.controller.toggle(id).await?),
            Command::Remove(id) => Some(self.controller.delete(id).await?),
            Command::Filter(filter) => {
                self.controller.set_filter(filter);
                None
            },
            Command::List => None,
            Command::Help => return Ok(Reply::text(HELP.to_string())),
            Command::Quit => {
                return Ok(Reply {
                    output: String::new(),
                    quit: true,
                });
            },
        };

        Ok(Reply::text(self.frame(notice).await))
    }

    /// Read commands from `input` until `quit` or end of input
    ///
    /// Prints the list first and a prompt before every line. A line that is
    /// not UTF-8 is answered and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError`] if the terminal fails or the Store stops.
    pub async fn run<R, W>(&mut self, mut input: R, out: &mut W) -> Result<(), ShellError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{}", self.render().await)?;
        prompt(out)?;

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                return Ok(());
            }

            let Ok(line) = std::str::from_utf8(&buf) else {
                tracing::warn!(bytes = buf.len(), "Skipped input line that is not UTF-8");
                writeln!(out, "{NOT_UTF8_MESSAGE}")?;
                prompt(out)?;
                continue;
            };
            let line = line.trim_end_matches(['\r', '\n']);

            if !line.trim().is_empty() {
                let reply = self.handle_line(line).await?;
                if reply.quit {
                    return Ok(());
                }
                writeln!(out, "{}", reply.output)?;
            }
            prompt(out)?;
        }
    }

    async fn frame(&self, notice: Option<Notice>) -> String {
        let list = self.render().await;
        match notice {
            Some(notice) => format!("{notice}\n{list}"),
            None => list,
        }
    }
}

fn prompt(out: &mut impl Write) -> std::io::Result<()> {
    write!(out, "{PROMPT}")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use crate::controller::open_store;
    use checklist_testing::{InMemoryStore, test_clock};
    use std::sync::Arc;

    fn shell() -> (Shell, InMemoryStore) {
        let slot = InMemoryStore::new();
        let store = open_store(Arc::new(test_clock()), Arc::new(slot.clone()), "todos");
        (Shell::new(TodoController::new(store)), slot)
    }

    #[tokio::test]
    async fn add_prints_notice_and_list() {
        let (mut shell, slot) = shell();

        let reply = shell.handle_line("add Buy milk").await.unwrap();

        assert!(!reply.quit);
        assert!(reply.output.starts_with("[ok] Todo added successfully\n"));
        assert!(reply.output.contains("[ ] 1735689600000  Buy milk"));
        assert_eq!(slot.write_count(), 1);
    }

    #[tokio::test]
    async fn empty_add_is_rejected_without_writing() {
        let (mut shell, slot) = shell();

        let reply = shell.handle_line("add   ").await.unwrap();

        assert!(reply.output.starts_with("[error] Cannot add empty todo"));
        assert!(!shell.controller().view().panel_open);
        assert_eq!(slot.write_count(), 0);
    }

    #[tokio::test]
    async fn parse_errors_are_replies() {
        let (mut shell, _) = shell();

        let reply = shell.handle_line("toggle abc").await.unwrap();

        assert!(reply.output.starts_with("Invalid todo id \"abc\""));
    }

    #[tokio::test]
    async fn filter_then_quit() {
        let (mut shell, slot) = shell();
        shell.handle_line("add a").await.unwrap();

        let reply = shell.handle_line("filter completed").await.unwrap();
        assert!(reply.output.contains("There are no tasks matching this filter."));

        assert!(shell.handle_line("quit").await.unwrap().quit);
        assert_eq!(slot.write_count(), 1);
    }

    #[tokio::test]
    async fn session_skips_lines_that_are_not_utf8() {
        let (mut shell, slot) = shell();
        let input: &[u8] = b"add a\n\xff\xfe\n\nadd b\r\nquit\nadd never\n";
        let mut out = Vec::new();

        shell.run(input, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Filter: all (all 0, active 0, completed 0)"));
        assert_eq!(out.matches(NOT_UTF8_MESSAGE).count(), 1);
        assert!(out.contains("  b"));
        let texts: Vec<String> = shell
            .controller()
            .store()
            .state(|s| s.todos.iter().map(|t| t.text.clone()).collect())
            .await;
        assert_eq!(texts, vec!["a", "b"]);
        assert_eq!(slot.write_count(), 2);
    }

    #[tokio::test]
    async fn session_ends_at_end_of_input() {
        let (mut shell, _) = shell();
        let mut out = Vec::new();

        shell.run(&b"list"[..], &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches(PROMPT).count(), 2);
    }

    #[tokio::test]
    async fn help_lists_commands() {
        let (mut shell, _) = shell();
        assert_eq!(shell.handle_line("help").await.unwrap().output, HELP);
    }
}
