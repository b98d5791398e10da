use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};
use tracing::debug;

use toolgate_tool_runtime::approval::APPROVAL_MESSAGE;
use toolgate_tool_runtime::{ApprovalDecision, ApprovalPrompt, InvocationRequest};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const USER_PROMPT: Color = Color::Green;
    const ASSISTANT_TEXT: Color = Color::Cyan;
    const APPROVAL: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
}

/// Manages terminal I/O for the interactive REPL.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    /// Print the startup lines.
    pub fn print_banner(&self) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print("Press enter to exit\n"),
            ResetColor,
        )?;
        self.print_reply("How may I help you?")
    }

    /// Read a line of user input with prompt.
    /// Returns None when the session should end.
    pub fn read_input(&self) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::USER_PROMPT),
            Print("User: "),
            ResetColor,
        )?;
        stdout.flush()?;

        let mut input = String::new();
        let read = io::stdin().read_line(&mut input)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(parse_input(&input))
    }

    /// Print an assistant reply.
    pub fn print_reply(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ASSISTANT_TEXT),
            Print("Assistant: "),
            ResetColor,
            Print(format!("{}\n", text)),
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Print an error message.
    pub fn print_error(&self, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ERROR),
            Print(format!("Error: {}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl ApprovalPrompt for Terminal {
    fn ask(&self, request: &InvocationRequest) -> io::Result<ApprovalDecision> {
        debug!(operation = %request.operation(), "Asking operator for approval");
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::APPROVAL),
            Print(format!("{}\n", APPROVAL_MESSAGE)),
            SetForegroundColor(Colors::USER_PROMPT),
            Print("User: "),
            ResetColor,
        )?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        Ok(ApprovalDecision::from_response(&answer))
    }
}

/// Strip the line terminator; a blank line ends the session.
fn parse_input(line: &str) -> Option<String> {
    let text = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
